// Pure domain services
pub mod decoder;
pub mod rejection;
pub mod scan_gate;

pub use decoder::*;
pub use rejection::*;
pub use scan_gate::*;
