#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod http;
pub mod logging;
pub mod normalize;

pub use error::{Error, Result};
