use anyhow::Result;
use clap::Parser;
use prenoms::{
    config::{Args, DashboardSettings},
    context::DashboardContext,
    data::{load_boundaries, load_table},
    layout::DashboardLayout,
    server,
};
use reqwest::Client;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let args = Args::parse();
    let settings = DashboardSettings::load(args.settings.as_deref())?;
    info!(table = %args.table.display(), boundaries = %args.boundaries, "configuration");

    // ─── 3) load the name table ──────────────────────────────────────
    let table = tokio::task::spawn_blocking({
        let path = args.table.clone();
        move || load_table(&path)
    })
    .await??;
    info!(rows = table.len(), years = ?table.year_bounds(), "name table ready");

    // ─── 4) load department boundaries ───────────────────────────────
    let client = Client::new();
    let boundaries = load_boundaries(&client, &args.boundaries, &settings.feature_key).await?;

    // ─── 5) build the page and serve ─────────────────────────────────
    let ctx = Arc::new(DashboardContext::new(table, boundaries, settings));
    let layout = Arc::new(DashboardLayout::build(&ctx)?);
    server::serve(args.socket_addr(), ctx, layout).await
}
