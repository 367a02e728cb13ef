//! API middleware components

pub mod client_ip;
pub mod logging;

pub use client_ip::ClientIp;
pub use logging::{logging_middleware, REQUEST_ID_HEADER};
