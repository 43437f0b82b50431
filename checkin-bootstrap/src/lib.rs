pub mod context;
pub mod lifecycle;
pub mod logging;

pub use context::AppContext;
pub use lifecycle::{print_recent, run_scans, run_standalone};
