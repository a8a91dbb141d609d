//! In-memory host adapters.
//!
//! Back the host ports with `tokio::sync::RwLock` maps. Used by tests and by
//! the bundled callback server when no database is configured.

mod clients;
mod config_store;
mod gateway_log;
mod invoices;
mod settlement_ledger;

pub use clients::InMemoryClientRepository;
pub use config_store::InMemoryGatewayConfigStore;
pub use gateway_log::InMemoryGatewayLog;
pub use invoices::InMemoryInvoiceRepository;
pub use settlement_ledger::InMemorySettlementLedger;
