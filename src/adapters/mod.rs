//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the gateway to external systems:
//! - `voguepay` - Command API client (reqwest) and mock processor
//! - `memory` - In-memory host (invoices, clients, ledger, log, settings)
//! - `postgres` - Host records, gateway log and settlement ledger on PostgreSQL
//! - `http` - Axum callback routes

pub mod http;
pub mod memory;
pub mod postgres;
pub mod voguepay;

pub use http::{callback_router, CallbackAppState};
pub use memory::{
    InMemoryClientRepository, InMemoryGatewayConfigStore, InMemoryGatewayLog,
    InMemoryInvoiceRepository, InMemorySettlementLedger,
};
pub use postgres::{
    PostgresClientRepository, PostgresGatewayLog, PostgresInvoiceRepository,
    PostgresSettlementLedger,
};
pub use voguepay::{MockPaymentProcessor, VoguePayClient, VoguePayConfig};
