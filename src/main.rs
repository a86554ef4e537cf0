use axum::Router;
use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use payrail::application::bank::BankCore;
use payrail::application::payments::PaymentService;
use payrail::application::tokens::MobileTokenService;
use payrail::application::transactions::TransactionService;
use payrail::domain::identity::ClaimsVerifier;
use payrail::domain::ports::{CardStoreRef, PaymentStoreRef, TokenStoreRef, TransactionStoreRef};
use payrail::infrastructure::in_memory::{
    InMemoryCardStore, InMemoryPaymentStore, InMemoryTokenStore, InMemoryTransactionStore,
};
#[cfg(feature = "storage-rocksdb")]
use payrail::infrastructure::rocksdb::RocksDbStore;
use payrail::interfaces::client::bank::BankClient;
use payrail::interfaces::client::transactions::TransactionClient;
use payrail::interfaces::csv::card_reader::CardReader;
use payrail::interfaces::http::bank::{BankState, bank_router};
use payrail::interfaces::http::payments::{PaymentsState, payments_router};
use payrail::interfaces::http::transactions::{TransactionsState, transactions_router};
use std::fs::File;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "payrail", version, about = "Card payment authorization services", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the bank core: the authoritative card ledger.
    Bank(BankArgs),
    /// Run the transaction processing service.
    Transactions(TransactionsArgs),
    /// Run the caller-facing payment gateway.
    Payments(PaymentsArgs),
}

#[derive(Args)]
struct BankArgs {
    /// Socket address to bind, e.g. 127.0.0.1:8083
    #[arg(long, default_value = "127.0.0.1:8083", env = "PAYRAIL_BANK_LISTEN")]
    listen: SocketAddr,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "PAYRAIL_BANK_DB")]
    db_path: Option<std::path::PathBuf>,

    /// CSV file of card accounts loaded into the store at startup.
    #[arg(long)]
    seed_cards: Option<std::path::PathBuf>,
}

#[derive(Args)]
struct TransactionsArgs {
    /// Socket address to bind, e.g. 127.0.0.1:8082
    #[arg(long, default_value = "127.0.0.1:8082", env = "PAYRAIL_TRANSACTIONS_LISTEN")]
    listen: SocketAddr,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "PAYRAIL_TRANSACTIONS_DB")]
    db_path: Option<std::path::PathBuf>,

    /// Base URL of the bank core service.
    #[arg(long, default_value = "http://127.0.0.1:8083", env = "PAYRAIL_BANK_URL")]
    bank_url: String,

    /// Timeout in seconds for calls to the bank core.
    #[arg(long, default_value_t = 10, env = "PAYRAIL_CALL_TIMEOUT_SECS")]
    call_timeout_secs: u64,
}

#[derive(Args)]
struct PaymentsArgs {
    /// Socket address to bind, e.g. 127.0.0.1:8081
    #[arg(long, default_value = "127.0.0.1:8081", env = "PAYRAIL_PAYMENTS_LISTEN")]
    listen: SocketAddr,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "PAYRAIL_PAYMENTS_DB")]
    db_path: Option<std::path::PathBuf>,

    /// Base URL of the transaction processing service.
    #[arg(
        long,
        default_value = "http://127.0.0.1:8082",
        env = "PAYRAIL_TRANSACTIONS_URL"
    )]
    transactions_url: String,

    /// Timeout in seconds for calls to the transaction service.
    #[arg(long, default_value_t = 10, env = "PAYRAIL_CALL_TIMEOUT_SECS")]
    call_timeout_secs: u64,

    /// Secret material for the session signing key.
    #[arg(long, env = "PAYRAIL_SESSION_KEY")]
    session_key: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "payrail=info,info".to_string()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Bank(args) => run_bank(args).await,
        Command::Transactions(args) => run_transactions(args).await,
        Command::Payments(args) => run_payments(args).await,
    }
}

async fn run_bank(args: BankArgs) -> Result<()> {
    let cards: CardStoreRef = match args.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => Arc::new(RocksDbStore::open(db_path).into_diagnostic()?),
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => return Err(no_persistent_storage()),
        None => Arc::new(InMemoryCardStore::new()),
    };

    if let Some(path) = args.seed_cards {
        let file = File::open(path).into_diagnostic()?;
        let mut seeded = 0usize;
        for card in CardReader::new(file).cards() {
            cards.store(card.into_diagnostic()?).await.into_diagnostic()?;
            seeded += 1;
        }
        info!(count = seeded, "seeded card accounts");
    }

    let bank = Arc::new(BankCore::new(cards));
    let app = bank_router(BankState { bank });
    serve(args.listen, app, "bank core").await
}

async fn run_transactions(args: TransactionsArgs) -> Result<()> {
    let transactions: TransactionStoreRef = match args.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => Arc::new(RocksDbStore::open(db_path).into_diagnostic()?),
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => return Err(no_persistent_storage()),
        None => Arc::new(InMemoryTransactionStore::new()),
    };

    let bank = Arc::new(
        BankClient::new(args.bank_url, Duration::from_secs(args.call_timeout_secs))
            .into_diagnostic()?,
    );
    let service = Arc::new(TransactionService::new(transactions, bank));
    let app = transactions_router(TransactionsState {
        transactions: service,
    });
    serve(args.listen, app, "transaction service").await
}

async fn run_payments(args: PaymentsArgs) -> Result<()> {
    let (payments_store, token_store): (PaymentStoreRef, TokenStoreRef) = match args.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => {
            let store = RocksDbStore::open(db_path).into_diagnostic()?;
            (Arc::new(store.clone()), Arc::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => return Err(no_persistent_storage()),
        None => (
            Arc::new(InMemoryPaymentStore::new()),
            Arc::new(InMemoryTokenStore::new()),
        ),
    };

    let processor = Arc::new(
        TransactionClient::new(
            args.transactions_url,
            Duration::from_secs(args.call_timeout_secs),
        )
        .into_diagnostic()?,
    );
    let payments = Arc::new(PaymentService::new(payments_store, processor));
    let tokens = Arc::new(MobileTokenService::new(token_store));
    let verifier = Arc::new(ClaimsVerifier::from_secret(&args.session_key));

    let app = payments_router(PaymentsState {
        payments,
        tokens,
        verifier,
    });
    serve(args.listen, app, "payment gateway").await
}

async fn serve(listen: SocketAddr, app: Router, name: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen).await.into_diagnostic()?;
    info!("{name} listening on {}", listener.local_addr().into_diagnostic()?);
    axum::serve(listener, app).await.into_diagnostic()?;
    Ok(())
}

#[cfg(not(feature = "storage-rocksdb"))]
fn no_persistent_storage() -> miette::Report {
    miette::miette!("this build has no persistent storage; rebuild with --features storage-rocksdb")
}
