// Core infrastructure modules
pub mod core;

// Request boundary and transports
pub mod catalog;
pub mod cli;
pub mod config;
pub mod console;
pub mod logging;
pub mod protocol;
pub mod repl;

#[cfg(test)]
mod test_utils;
