mod config;
mod demo;
mod items;
mod provision;
mod storage;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{DemoSettings, DEFAULT_FILLER_LENGTH, DEFAULT_ITEM_COUNT};
use crate::storage::dynamodb::{create_local_client, LocalClientConfig, DEFAULT_PORT, DEFAULT_REGION};
use crate::storage::DynamoDbStore;

/// DynamoDB reference workflow against DynamoDB Local
#[derive(Parser, Debug)]
#[command(name = "dynamodb_reference")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Port DynamoDB Local listens on
    #[arg(long, short, default_value_t = DEFAULT_PORT, env = "DYNAMODB_LOCAL_PORT")]
    port: u16,

    /// Full endpoint URL, overriding http://localhost:<port>
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// AWS region label
    #[arg(long, default_value = DEFAULT_REGION, env = "AWS_REGION")]
    region: String,

    /// Table to provision and operate on
    #[arg(long, default_value = dynamodb_reference_core::storage::DEFAULT_TABLE_NAME, env = "DYNAMODB_TABLE_NAME")]
    table_name: String,

    /// Number of items to seed before the purge
    #[arg(long, default_value_t = DEFAULT_ITEM_COUNT, env = "SEED_ITEM_COUNT")]
    item_count: usize,

    /// Characters of random filler per seeded item
    #[arg(long, default_value_t = DEFAULT_FILLER_LENGTH, env = "SEED_FILLER_LENGTH")]
    filler_length: usize,

    /// Seed for the filler generator
    #[arg(long, env = "SEED_RNG_SEED")]
    seed: Option<u64>,
}

impl Cli {
    fn client_config(&self) -> LocalClientConfig {
        LocalClientConfig {
            port: self.port,
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
        }
    }

    fn demo_settings(&self) -> DemoSettings {
        DemoSettings {
            table_name: self.table_name.clone(),
            item_count: self.item_count,
            filler_length: self.filler_length,
            rng_seed: self.seed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dynamodb_reference=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client_config = cli.client_config();
    tracing::info!(target = %client_config.target_display(), "Starting");

    let client = create_local_client(&client_config)
        .await
        .context("failed to create DynamoDB client")?;
    let store = DynamoDbStore::new(client);

    let report = demo::run(&store, &cli.demo_settings())
        .await
        .context("reference workflow failed")?;

    tracing::info!(
        table_created = report.table_created,
        conflict_detected = report.conflict_detected,
        transactional_conflict_detected = report.transactional_conflict_detected,
        seeded = report.seeded,
        deleted = report.deleted,
        remaining = report.remaining,
        "Completed"
    );
    Ok(())
}
