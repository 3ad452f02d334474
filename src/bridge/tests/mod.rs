//! Test modules for the bridge

mod dispatch;
mod sender;
mod support;
