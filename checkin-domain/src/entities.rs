// Domain entities
pub mod attendance;
pub mod context;
pub mod model;
pub mod outcome;

pub use attendance::*;
pub use context::*;
pub use model::*;
pub use outcome::*;
