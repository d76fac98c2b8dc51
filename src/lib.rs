pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod orders;
pub mod payments;
pub mod services;
