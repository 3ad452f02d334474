//! Application module
//!
//! Command line front end: argument parsing, configuration loading and the
//! startup sequence that assembles a bridge host over the loopback transport.

pub mod args;
pub mod assembly;
pub mod config;
pub mod error;
pub mod startup;
