pub mod assets;
pub mod log;
pub mod response;
