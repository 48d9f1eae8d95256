pub mod descriptive;
pub mod device;
