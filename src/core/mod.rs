pub mod books;
pub mod orchestrator;
pub mod preview;
pub mod venv;

pub use crate::domain::model::{Book, CommandStatus, Invocation, PreviewOutcome, Step};
pub use crate::domain::ports::CommandRunner;
pub use crate::utils::error::Result;
