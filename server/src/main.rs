use anyhow::{anyhow, Result};
use axum::Router;
use boolsearch_core::builder::BuildConfig;
use boolsearch_core::persist::DEFAULT_INDEX_FILE;
use boolsearch_core::service::ServiceConfig;
use boolsearch_core::tokenizer::normalizer_for;
use clap::Parser;
use server::build_app;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Index file path; built from --lemmas/--pages if missing
    #[arg(long, default_value = DEFAULT_INDEX_FILE)]
    index: PathBuf,
    /// Directory of per-document lemma files
    #[arg(long, default_value = "./lemmas")]
    lemmas: PathBuf,
    /// Directory of raw pages used for titles
    #[arg(long, default_value = "./pages")]
    pages: PathBuf,
    /// Snowball stemmer for query terms (ru, en); must match how the index was built
    #[arg(long)]
    stem: Option<String>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let normalizer = normalizer_for(args.stem.as_deref())
        .ok_or_else(|| anyhow!("unsupported stemmer language: {}", args.stem.as_deref().unwrap_or_default()))?;
    let config = ServiceConfig { index_path: args.index.clone(), build: BuildConfig::new(&args.lemmas, &args.pages) };
    let app: Router = build_app(&config, normalizer)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
