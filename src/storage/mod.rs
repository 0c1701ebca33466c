pub mod database;
pub mod records;

pub use database::{Database, PoolConfig, SharedDatabase};
pub use records::{AnalysisRecord, AnalysisStatus};
