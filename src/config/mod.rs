//! Configuration file support

pub mod config;

pub use config::Config;
