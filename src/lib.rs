pub mod cli;
pub mod components;
pub mod config;
pub mod error;
pub mod publisher;
pub mod utils;
