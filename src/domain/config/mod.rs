pub mod error;
pub mod local;
pub mod retrieval;
pub mod secrets;
