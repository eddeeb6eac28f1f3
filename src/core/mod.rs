// コアレイヤー - 基盤となるトレイト、型、エラー定義
// 他のレイヤーから参照される基本的な抽象化を提供

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ErrorCategory, HttpStatusError, OrchestratorState, ProcessingError, ProcessingResult};
pub use traits::{ProcessingConfig, ProgressReporter};
pub use types::{ArtifactKind, ImageDescriptor, ItemOutcome, OutputFormat, ProcessingSummary, WorkItem};
