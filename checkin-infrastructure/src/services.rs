pub mod credentials;
pub mod http_check_in_service;

pub use credentials::*;
pub use http_check_in_service::*;
