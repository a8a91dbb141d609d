//! Integration tests for the PostgreSQL host adapters.
//!
//! These run the callback handler against the same adapters the server binary
//! wires up:
//! 1. An approved callback settles once and marks the invoice paid
//! 2. A replay short-circuits on the paid invoice
//! 3. A declined callback clears the stored card
//!
//! Requires PostgreSQL at `VOGUEPAY_TEST_DATABASE_URL`; run with
//! `cargo test -- --ignored`.

use std::sync::Arc;

use rust_decimal_macros::dec;
use secrecy::SecretString;
use serde_json::json;
use sqlx::PgPool;

use voguepay_gateway::adapters::{
    InMemoryGatewayConfigStore, MockPaymentProcessor, PostgresClientRepository,
    PostgresGatewayLog, PostgresInvoiceRepository, PostgresSettlementLedger,
};
use voguepay_gateway::application::{CallbackPorts, HandleCallbackCommand, HandleCallbackHandler};
use voguepay_gateway::domain::foundation::{ClientId, InvoiceId};
use voguepay_gateway::domain::gateway::{
    response_hash, CallbackPayload, MerchantCredentials, Resolution, SignedTransaction,
    TransactionReport,
};
use voguepay_gateway::ports::{ClientRepository, GatewaySettings, InvoiceRepository};

// =============================================================================
// Test Infrastructure
// =============================================================================

const SALT: &str = "9d2e41";

fn credentials() -> MerchantCredentials {
    MerchantCredentials::new(
        "5501-0001",
        "shop@example.com",
        SecretString::new("command-token".to_string()),
        true,
    )
}

async fn pool() -> PgPool {
    let url = std::env::var("VOGUEPAY_TEST_DATABASE_URL")
        .expect("VOGUEPAY_TEST_DATABASE_URL must point at a test database");
    let pool = PgPool::connect(&url).await.unwrap();
    PostgresSettlementLedger::new(pool.clone())
        .migrate()
        .await
        .unwrap();
    pool
}

struct Seeded {
    invoice_id: InvoiceId,
    client_id: ClientId,
    transaction_id: String,
}

/// Inserts a client with a stored card and one unpaid invoice under fresh ids.
async fn seed(pool: &PgPool) -> Seeded {
    let client_id = i64::from(rand::random::<u32>());
    let invoice_id = i64::from(rand::random::<u32>());

    sqlx::query(
        "INSERT INTO clients (id, first_name, card_last_four, card_expiry) VALUES ($1, 'Ada', '0008', '0530')",
    )
    .bind(client_id)
    .execute(pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO invoices (id, client_id, status, total, currency) VALUES ($1, $2, 'unpaid', 2500.00, 'NGN')",
    )
    .bind(invoice_id)
    .bind(client_id)
    .execute(pool)
    .await
    .unwrap();

    Seeded {
        invoice_id: InvoiceId::new(invoice_id as u64),
        client_id: ClientId::new(client_id as u64),
        transaction_id: format!("pg-{}", invoice_id),
    }
}

struct Host {
    handler: HandleCallbackHandler,
    processor: Arc<MockPaymentProcessor>,
    invoices: PostgresInvoiceRepository,
    clients: PostgresClientRepository,
}

fn host(pool: &PgPool) -> Host {
    let processor = Arc::new(MockPaymentProcessor::new());
    let ports = CallbackPorts {
        config_store: Arc::new(InMemoryGatewayConfigStore::with_gateway(GatewaySettings {
            module_name: "voguepay".to_string(),
            display_name: "VoguePay".to_string(),
            credentials: credentials(),
            developer_code: None,
            system_url: "https://billing.example.com/".to_string(),
            callback_url: None,
        })),
        processor: processor.clone(),
        invoices: Arc::new(PostgresInvoiceRepository::new(pool.clone())),
        clients: Arc::new(PostgresClientRepository::new(pool.clone())),
        ledger: Arc::new(PostgresSettlementLedger::new(pool.clone())),
        gateway_log: Arc::new(PostgresGatewayLog::new(pool.clone())),
    };

    Host {
        handler: HandleCallbackHandler::new(ports, "voguepay"),
        processor,
        invoices: PostgresInvoiceRepository::new(pool.clone()),
        clients: PostgresClientRepository::new(pool.clone()),
    }
}

fn report(seeded: &Seeded, status: &str) -> TransactionReport {
    serde_json::from_value(json!({
        "transaction_id": seeded.transaction_id,
        "merchant_id": "demo",
        "merchant_ref": format!("{}##{}", seeded.invoice_id, seeded.client_id),
        "status": status,
        "total_amount": "2500.00",
        "charges": "37.50",
    }))
    .unwrap()
}

impl Host {
    async fn deliver(&self, report: TransactionReport) -> Resolution {
        let mut record = serde_json::to_value(&report).unwrap();
        record["salt"] = SALT.into();
        record["hash"] = response_hash(&credentials(), SALT).into();
        self.processor
            .respond_with(format!("OK:{}", record).into_bytes());

        self.handler
            .handle(HandleCallbackCommand {
                payload: CallbackPayload::Notification(SignedTransaction {
                    transaction: report,
                    salt: SALT.to_string(),
                    hash: response_hash(&credentials(), SALT),
                }),
            })
            .await
            .unwrap()
            .resolution
    }
}

// =============================================================================
// Settlement
// =============================================================================

#[tokio::test]
#[ignore = "requires PostgreSQL at VOGUEPAY_TEST_DATABASE_URL"]
async fn approved_callback_settles_and_marks_invoice_paid() {
    let pool = pool().await;
    let seeded = seed(&pool).await;
    let host = host(&pool);

    let resolution = host.deliver(report(&seeded, "Approved")).await;

    assert_eq!(resolution, Resolution::Settled);
    let invoice = host
        .invoices
        .resolve(seeded.invoice_id, "VoguePay")
        .await
        .unwrap()
        .unwrap();
    assert!(invoice.is_paid());

    let (amount,): (rust_decimal::Decimal,) =
        sqlx::query_as("SELECT amount FROM gateway_settlements WHERE transaction_id = $1")
            .bind(&seeded.transaction_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(amount, dec!(2500.00));
}

#[tokio::test]
#[ignore = "requires PostgreSQL at VOGUEPAY_TEST_DATABASE_URL"]
async fn replay_short_circuits_on_paid_invoice() {
    let pool = pool().await;
    let seeded = seed(&pool).await;
    let host = host(&pool);

    host.deliver(report(&seeded, "Approved")).await;
    let second = host.deliver(report(&seeded, "Approved")).await;

    assert_eq!(second, Resolution::AlreadyPaid);
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM gateway_settlements WHERE invoice_id = $1")
            .bind(seeded.invoice_id.as_u64() as i64)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "requires PostgreSQL at VOGUEPAY_TEST_DATABASE_URL"]
async fn declined_callback_clears_stored_card() {
    let pool = pool().await;
    let seeded = seed(&pool).await;
    let host = host(&pool);

    let resolution = host.deliver(report(&seeded, "Declined")).await;

    assert!(matches!(resolution, Resolution::Rejected(_)));
    let client = host.clients.find(seeded.client_id).await.unwrap().unwrap();
    assert!(client.stored_card.is_none());
}
