//! Adapters behind the domain ports.

pub mod broker;
pub mod http_catalog;
pub mod in_memory;
#[cfg(feature = "transport-kafka")]
pub mod kafka;
pub mod locks;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
