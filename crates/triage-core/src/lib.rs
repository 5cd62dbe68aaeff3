pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod issue;
pub mod rank;
pub mod score;
pub mod types;

pub use error::{Result, TriageError};
