//! PostgreSQL adapters.
//!
//! Persistent storage for the billing host records and gateway settlements
//! using sqlx. The schema lives in `migrations/`.

mod clients;
mod gateway_log;
mod ids;
mod invoices;
mod settlement_ledger;

pub use clients::PostgresClientRepository;
pub use gateway_log::PostgresGatewayLog;
pub use invoices::PostgresInvoiceRepository;
pub use settlement_ledger::PostgresSettlementLedger;
