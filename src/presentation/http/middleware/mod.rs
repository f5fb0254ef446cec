pub mod correlation;
pub mod lifecycle;
pub mod request_log;
