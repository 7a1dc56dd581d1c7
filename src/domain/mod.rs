//! Domain types and the ports the saga talks through.

pub mod account;
pub mod catalog;
pub mod event;
pub mod ledger;
pub mod order;
pub mod ports;
