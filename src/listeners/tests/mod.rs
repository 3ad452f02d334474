//! Test modules for the listener registry
