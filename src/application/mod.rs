//! Application layer containing the saga's two halves.
//!
//! `OrderOrchestrator` is the order side: catalog validation, the pending
//! write and the debit event. `WalletEngine` is the wallet side, fed by the
//! `DebitConsumer` loop. The halves share nothing but the event transport.

pub mod consumer;
pub mod notify;
pub mod orchestrator;
pub mod wallet;
