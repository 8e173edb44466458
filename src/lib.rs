pub mod api;
pub mod catalog;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod directory;
pub mod errors;
pub mod geocoder;
pub mod insights;
pub mod links;
pub mod llm;
pub mod logging;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod retry;
pub mod services;
pub mod session;
pub mod support;

#[cfg(test)]
mod errors_tests;

pub use config::AppConfig;
pub use errors::*;
pub use services::PincodeServices;
