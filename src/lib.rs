pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod evaluation;
pub mod export;
pub mod extract;
pub mod gateway;
pub mod paths;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use dashboard::{AnalysisOutcome, ChatTurn, Dashboard};
pub use error::{ExtractionError, GenerationError, PersistenceError};
pub use gateway::{GenerationGateway, GenerationParams, ModelId};
pub use storage::{EvaluationRecord, InteractionRecord, RecordStore, Role};
