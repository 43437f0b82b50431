// Domain value objects
pub mod identifiers;
pub mod scan_event;

pub use identifiers::*;
pub use scan_event::*;
