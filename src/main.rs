use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // a missing .env is fine, the credential may come from the environment
    dotenvy::dotenv().ok();

    let args = steam_pricehistory::Args::parse();

    let filter = match args.verbose {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("steam_pricehistory=info")),
        1 => EnvFilter::new("steam_pricehistory=debug"),
        _ => EnvFilter::new("trace"),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = steam_pricehistory::Config::load(args)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    tracing::info!("Starting");

    let summary = match runtime.block_on(steam_pricehistory::collect(&config)) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Collecting {:?}", e);
            return Err(e.into());
        }
    };

    if !summary.unavailable.is_empty() {
        tracing::warn!("No price history for {:?}", summary.unavailable);
    }

    Ok(())
}
