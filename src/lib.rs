pub mod checks;
pub mod cmd;
pub mod config;
pub mod errors;
pub mod http;
pub mod log;
pub mod mock;
pub mod model;
pub mod suite;
