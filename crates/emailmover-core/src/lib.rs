pub mod config;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod normalize;
pub mod progress;
pub mod relocate;
pub mod report;
pub mod subject;

pub use config::AppConfig;
pub use engine::{MatchingEngine, ScanStats};
pub use error::Error;
pub use manifest::{Directory, ManifestIndex, Subject};
pub use progress::{ProgressReporter, SilentReporter};
pub use relocate::{RelocationOutcome, RelocationReport, RelocationSummary, Relocator};
