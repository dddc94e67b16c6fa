// Ambient: errors, configuration and logging
pub mod error;
pub mod config;
pub mod logging;

// MVC architecture
pub mod model;
pub mod view;
pub mod controller;

pub mod app;

pub use error::{Error, Result};
