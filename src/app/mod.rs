pub mod bootstrap;
pub mod controller;
pub mod preview;
pub mod report;

pub use bootstrap::{run, run_with};
pub use controller::BatchController;
pub use report::{BatchSummary, FetchOutcome};
