pub mod host;
pub mod interface;
pub mod port;
pub mod range;
pub mod target;
