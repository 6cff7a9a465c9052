use anyhow::{anyhow, Result};
use boolsearch_core::builder::{BuildConfig, IndexBuilder};
use boolsearch_core::persist::{self, DEFAULT_INDEX_FILE};
use boolsearch_core::service::{SearchHit, SearchService, ServiceConfig};
use boolsearch_core::tokenizer::{normalizer_for, Normalizer};
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query a boolean inverted index over lemma files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct SourceArgs {
    /// Directory of per-document lemma files
    #[arg(long, default_value = "./lemmas")]
    lemmas: PathBuf,
    /// Directory of raw pages used for titles
    #[arg(long, default_value = "./pages")]
    pages: PathBuf,
    /// File name prefix before the document number
    #[arg(long, default_value = "page_")]
    prefix: String,
    /// Stem lemmas and query terms with a Snowball stemmer (ru, en)
    #[arg(long)]
    stem: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from lemma files and write it as JSON
    Build {
        #[command(flatten)]
        source: SourceArgs,
        /// Output index file
        #[arg(long, default_value = DEFAULT_INDEX_FILE)]
        output: PathBuf,
    },
    /// Run a single boolean query
    Query {
        #[command(flatten)]
        source: SourceArgs,
        /// Index file; built from the sources if missing
        #[arg(long, default_value = DEFAULT_INDEX_FILE)]
        index: PathBuf,
        /// Query, e.g. "город AND (рим OR NOT море)"
        query: String,
    },
    /// Read queries from stdin until `exit`
    Shell {
        #[command(flatten)]
        source: SourceArgs,
        /// Index file; built from the sources if missing
        #[arg(long, default_value = DEFAULT_INDEX_FILE)]
        index: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { source, output } => build_index(&source, &output),
        Commands::Query { source, index, query } => {
            let svc = open_service(&source, index)?;
            print_hits(&mut io::stdout().lock(), &svc.search(&query))?;
            Ok(())
        }
        Commands::Shell { source, index } => {
            let svc = open_service(&source, index)?;
            run_shell(&svc, io::stdin().lock(), &mut io::stdout().lock())
        }
    }
}

fn normalizer(source: &SourceArgs) -> Result<Box<dyn Normalizer>> {
    normalizer_for(source.stem.as_deref())
        .ok_or_else(|| anyhow!("unsupported stemmer language: {}", source.stem.as_deref().unwrap_or_default()))
}

fn build_config(source: &SourceArgs) -> BuildConfig {
    BuildConfig {
        file_prefix: source.prefix.clone(),
        ..BuildConfig::new(&source.lemmas, &source.pages)
    }
}

fn build_index(source: &SourceArgs, output: &Path) -> Result<()> {
    let normalizer = normalizer(source)?;
    let (index, catalog) = IndexBuilder::new(build_config(source), &*normalizer).build()?;
    persist::save(&index, &catalog, output)?;
    tracing::info!(output = %output.display(), "index build complete");
    Ok(())
}

fn open_service(source: &SourceArgs, index_path: PathBuf) -> Result<SearchService> {
    let config = ServiceConfig { index_path, build: build_config(source) };
    let svc = SearchService::open(&config, normalizer(source)?)?;
    tracing::info!(num_docs = svc.num_docs(), num_lemmas = svc.num_lemmas(), "index ready");
    Ok(svc)
}

fn print_hits<W: Write>(out: &mut W, hits: &[SearchHit]) -> io::Result<()> {
    if hits.is_empty() {
        writeln!(out, "no results")?;
        return Ok(());
    }
    writeln!(out, "found: {}", hits.len())?;
    for (rank, hit) in hits.iter().enumerate() {
        writeln!(out, "{}. {} ({})", rank + 1, hit.title, hit.file)?;
    }
    Ok(())
}

fn run_shell<R: BufRead, W: Write>(svc: &SearchService, input: R, out: &mut W) -> Result<()> {
    writeln!(out, "boolean search: AND, OR, NOT, parentheses; `exit` to quit")?;
    write!(out, ">> ")?;
    out.flush()?;
    for line in input.lines() {
        let line = line?;
        let query = line.trim();
        if query.eq_ignore_ascii_case("exit") { break; }
        if !query.is_empty() {
            print_hits(out, &svc.search(query))?;
        }
        write!(out, ">> ")?;
        out.flush()?;
    }
    Ok(())
}
