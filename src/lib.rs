// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod assets;
pub mod config;
pub mod confusion;
pub mod distance;
pub mod error;
pub mod feedback;
pub mod headless;
pub mod matching_policy;
pub mod normalizer;
pub mod passages;
pub mod progress;
pub mod recital;
pub mod runtime;
pub mod session;
pub mod speech;
pub mod tokenizer;
pub mod util;

pub use error::{ReciteError, Result};
pub use recital::{Outcome, Recital, Snapshot, Transition};
pub use session::{Session, SessionConfig, SessionSnapshot};
