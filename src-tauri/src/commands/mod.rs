pub mod config;
pub mod export;
