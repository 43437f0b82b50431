pub mod check_in_handlers;
pub mod ops_handlers;
pub mod scan_handlers;

pub use check_in_handlers::*;
pub use ops_handlers::*;
pub use scan_handlers::*;
