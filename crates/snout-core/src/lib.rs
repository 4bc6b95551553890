pub mod config;
pub mod logging;

pub mod classify;
pub mod fetch;
pub mod resolver;
pub mod session;
pub mod validate;
