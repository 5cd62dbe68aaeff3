pub mod deps;
pub mod explain;
pub mod next;
pub mod rank;
