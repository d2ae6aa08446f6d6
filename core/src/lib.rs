pub mod classify;
pub mod discovery;
pub mod network;
pub mod scanner;
pub mod vulns;
