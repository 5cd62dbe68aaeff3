use crate::error::Result;
use crate::score::ScoringRules;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".triage.yaml";

// ---------------------------------------------------------------------------
// TriageConfig
// ---------------------------------------------------------------------------

/// Project-level overrides, loaded from `.triage.yaml` at the root. Every
/// field is optional; a missing file means pure defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    pub scoring: ScoringRules,
}

impl TriageConfig {
    pub fn path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: TriageConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
