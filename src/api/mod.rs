pub mod client;
pub mod digest;
pub mod response;
pub mod vendor;
