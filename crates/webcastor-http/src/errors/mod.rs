pub mod channel_error;
pub mod http_error;
pub mod responses;

pub use channel_error::*;
pub use http_error::*;
