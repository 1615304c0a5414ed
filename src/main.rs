mod cli;

use passsync::{config, remote, scheduler, sync};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::sync::Arc;

use passsync_db::pool::init_pool;

fn build_engine(config: &config::Config) -> Result<sync::SyncEngine> {
    let db_path = config.local.db_path.to_string_lossy();
    tracing::info!("Opening pass database at {}", db_path);
    let pool = init_pool(&db_path)?;

    let client = remote::SupabaseClient::new(&config.remote);

    Ok(sync::SyncEngine::new(
        pool,
        Arc::new(client),
        config.local.images_dir.clone(),
    ))
}

async fn start_daemon(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    tracing::info!("Starting passsync daemon");
    tracing::info!(
        "Syncing {:?} and {:?} to {} every {} minutes",
        config.local.db_path,
        config.local.images_dir,
        config.remote.url,
        config.schedule.interval_mins
    );

    let engine = build_engine(&config)?;
    scheduler::run(engine, config.schedule.interval_mins).await;
    Ok(())
}

async fn sync_once(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let engine = build_engine(&config)?;

    let report = engine.run_cycle().await?;
    println!(
        "Synced {} passes ({} skipped, {} failed)",
        report.synced, report.skipped, report.failed
    );

    if report.failed > 0 {
        anyhow::bail!("{} passes failed to sync", report.failed);
    }
    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Pass database: {:?}", config.local.db_path);
            println!("  Images directory: {:?}", config.local.images_dir);
            println!("  Remote: {}", config.remote.url);
            println!("  Interval: {} minutes", config.schedule.interval_mins);
        }
        None => {
            let config = config::load_config_or_default(None)?;
            println!("✓ Configuration is valid (default locations / environment)");
            println!("  Remote: {}", config.remote.url);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    // Credentials may live in a .env next to the binary on the station.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "passsync=trace,passsync_db=debug,passsync_common=debug".to_string()
        } else {
            "passsync=info,passsync_db=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_daemon(cli.config.as_deref()))
        }
        Commands::Sync => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(sync_once(cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("passsync {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
