use bookpay::config::{PipelineArgs, PipelineConfig};
use bookpay::domain::ports::{CatalogClientBox, LedgerStoreBox, OrderStoreBox};
use bookpay::infrastructure::http_catalog::HttpCatalogClient;
use bookpay::infrastructure::in_memory::{InMemoryLedgerStore, InMemoryOrderStore};
use bookpay::interfaces::csv::balance_writer::BalanceWriter;
use bookpay::interfaces::csv::catalog_reader::load_catalog;
use bookpay::interfaces::csv::command_reader::CommandReader;
use bookpay::interfaces::replay::ReplayPipeline;
use bookpay::logging::init_logging;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level filter, overridden by RUST_LOG
    #[arg(long, env = "BOOKPAY_LOG", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a CSV of wallet and order commands and print final balances
    Replay(ReplayArgs),
    /// Run the wallet debit worker against Kafka
    #[cfg(feature = "transport-kafka")]
    Consume(ConsumeArgs),
}

#[derive(clap::Args)]
struct ReplayArgs {
    /// Input commands CSV file
    input: PathBuf,

    /// Catalog snapshot CSV (id,title,price,status)
    #[arg(long, required_unless_present = "catalog_url", conflicts_with = "catalog_url")]
    catalog: Option<PathBuf>,

    /// Base URL of the book service
    #[arg(long, env = "BOOK_SERVICE_URL")]
    catalog_url: Option<String>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    #[command(flatten)]
    pipeline: PipelineArgs,
}

#[cfg(feature = "transport-kafka")]
#[derive(clap::Args)]
struct ConsumeArgs {
    /// Kafka bootstrap servers
    #[arg(long, env = "KAFKA_URL")]
    brokers: String,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    #[command(flatten)]
    pipeline: PipelineArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Command::Replay(args) => replay(args).await,
        #[cfg(feature = "transport-kafka")]
        Command::Consume(args) => consume(args).await,
    }
}

fn open_stores(db_path: Option<&Path>) -> Result<(LedgerStoreBox, OrderStoreBox)> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = bookpay::infrastructure::rocksdb::RocksDBStore::open(path).into_diagnostic()?;
            Ok((Box::new(store.clone()), Box::new(store)))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            warn!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok((
                Box::new(InMemoryLedgerStore::new()),
                Box::new(InMemoryOrderStore::new()),
            ))
        }
        None => Ok((
            Box::new(InMemoryLedgerStore::new()),
            Box::new(InMemoryOrderStore::new()),
        )),
    }
}

async fn replay(args: ReplayArgs) -> Result<()> {
    let config = PipelineConfig::from(&args.pipeline);

    let catalog: CatalogClientBox = match (&args.catalog, &args.catalog_url) {
        (Some(path), _) => Box::new(load_catalog(File::open(path).into_diagnostic()?).into_diagnostic()?),
        (None, Some(url)) => {
            Box::new(HttpCatalogClient::new(url.as_str(), config.catalog_timeout).into_diagnostic()?)
        }
        (None, None) => return Err(miette::miette!("either --catalog or --catalog-url is required")),
    };

    let (ledger, orders) = open_stores(args.db_path.as_deref())?;
    let mut pipeline = ReplayPipeline::new(catalog, orders, ledger, &config);

    let file = File::open(&args.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for command in reader.commands() {
        match command {
            Ok(command) => {
                if let Err(e) = pipeline.apply(command).await {
                    warn!("Error processing command: {}", e);
                }
            }
            Err(e) => {
                warn!("Error reading command: {}", e);
            }
        }
    }

    let balances = pipeline.into_balances().await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = BalanceWriter::new(stdout.lock());
    writer.write_balances(balances).into_diagnostic()?;

    Ok(())
}

#[cfg(feature = "transport-kafka")]
async fn consume(args: ConsumeArgs) -> Result<()> {
    use bookpay::application::consumer::DebitConsumer;
    use bookpay::application::wallet::WalletEngine;
    use bookpay::infrastructure::kafka::{KafkaConfig, KafkaSubscriber};
    use std::sync::Arc;

    let config = PipelineConfig::from(&args.pipeline);
    let (ledger, _orders) = open_stores(args.db_path.as_deref())?;
    let wallet = Arc::new(WalletEngine::new(ledger));

    let kafka = KafkaConfig::new(args.brokers, config.consumer_group.clone());
    let mut subscriber = KafkaSubscriber::new(&kafka, &config.topic).into_diagnostic()?;

    let consumer = DebitConsumer::new(wallet);
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    consumer.run(&mut subscriber, shutdown).await;
    Ok(())
}
