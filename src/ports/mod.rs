//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the gateway and the billing host or the processor. Adapters implement
//! these ports.
//!
//! ## Processor
//!
//! - `PaymentProcessor` - Submits signed requests to the command API
//!
//! ## Host
//!
//! - `GatewayConfigStore` - Activated module settings and credentials
//! - `InvoiceRepository` - Invoice resolution
//! - `ClientRepository` - Client tokens and card-on-file details
//! - `SettlementLedger` - Idempotent payment application
//! - `GatewayLog` - Gateway transaction log

mod client_repository;
mod gateway_config_store;
mod gateway_log;
mod invoice_repository;
mod payment_processor;
mod settlement_ledger;

pub use client_repository::{Client, ClientRepository, StoredCard};
pub use gateway_config_store::{
    GatewayConfigStore, GatewaySettings, NOTIFICATION_PATH, REDIRECT_PATH,
};
pub use gateway_log::{GatewayLog, GatewayLogEntry};
pub use invoice_repository::{Invoice, InvoiceRepository, InvoiceStatus};
pub use payment_processor::PaymentProcessor;
pub use settlement_ledger::{SaveResult, SettlementLedger};
