//! HTTP surface for the open leads pool.

pub mod config;
pub mod server;
