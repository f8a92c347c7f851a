pub mod config;
pub mod debug;
pub mod exception;
pub mod logger;
