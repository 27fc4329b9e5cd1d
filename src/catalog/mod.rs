//! The catalog client and the transport boundary it runs on.

pub mod config;
pub mod iter;
pub mod memory;
pub mod tables;
pub mod transport;
