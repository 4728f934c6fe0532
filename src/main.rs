use faqsense::cli::{Cli, Commands, ConfigAction};
use faqsense::config::Config;
use faqsense::embedding::{build_provider, codec};
use faqsense::error::{FaqError, Result};
use faqsense::indexing::{IndexSummary, Indexer};
use faqsense::retrieval::Retriever;
use faqsense::seed;
use faqsense::server::{self, AppState};
use faqsense::storage::{open_store, DbStats, Neighbor};
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();

    init_logging(cli.verbose);

    let rt = tokio::runtime::Runtime::new().map_err(|e| FaqError::Io {
        source: e,
        context: "Failed to create tokio runtime".to_string(),
    })?;

    rt.block_on(run(cli))
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "faqsense=debug" } else { "faqsense=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt().with_env_filter(filter).with_target(false).init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { bind } => cmd_serve(load_config(cli.config, cli.profile)?, bind).await,
        Commands::Setup => cmd_setup(load_config(cli.config, cli.profile)?).await,
        Commands::Seed { file } => cmd_seed(load_config(cli.config, cli.profile)?, file).await,
        Commands::Index { texts } => cmd_index(load_config(cli.config, cli.profile)?, texts).await,
        Commands::Search {
            question,
            limit,
            json,
        } => cmd_search(load_config(cli.config, cli.profile)?, &question, limit, json).await,
        Commands::Neighbors { vector, limit } => {
            cmd_neighbors(load_config(cli.config, cli.profile)?, &vector, limit).await
        }
        Commands::Stats => cmd_stats(load_config(cli.config, cli.profile)?).await,
        Commands::Config { action } => cmd_config(cli.config, cli.profile, action),
    }
}

async fn cmd_serve(config: Config, bind: Option<String>) -> Result<()> {
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let retriever = build_retriever(&config)?;

    tracing::info!(
        "Serving {} documents with {}",
        retriever.store().count().await?,
        config.embedding.model
    );

    server::serve(&bind, AppState::new(Arc::new(retriever))).await
}

async fn cmd_setup(config: Config) -> Result<()> {
    let (_, store) = open_store(&config)?;
    let path = config.storage.database_path()?;

    println!("✓ Store ready at: {}", path.display());
    println!("  Dimension: {}", store.dimension());
    println!("  Documents: {}", store.count().await?);
    Ok(())
}

async fn cmd_seed(config: Config, file: Option<PathBuf>) -> Result<()> {
    let questions: Vec<String> = match file {
        Some(path) => seed::load_questions(&path)?,
        None => seed::TRAVEL_FAQ.iter().map(|q| q.to_string()).collect(),
    };

    let indexer = build_indexer(&config)?;
    println!("Seeding {} questions...", questions.len());

    let (results, summary) = indexer.index_with_summary(&questions).await;

    for (question, result) in questions.iter().zip(&results) {
        if let Err(e) = result {
            println!("  ✗ {}: {}", question, e);
        }
    }
    print_summary(&summary);
    Ok(())
}

async fn cmd_index(config: Config, texts: Vec<String>) -> Result<()> {
    let indexer = build_indexer(&config)?;

    let (results, summary) = indexer.index_with_summary(&texts).await;

    for (text, result) in texts.iter().zip(&results) {
        match result {
            Ok(id) => println!("  ✓ [{}] {}", id, text),
            Err(e) => println!("  ✗ {}: {}", text, e),
        }
    }
    print_summary(&summary);
    Ok(())
}

async fn cmd_search(
    config: Config,
    question: &str,
    limit: Option<u8>,
    json: bool,
) -> Result<()> {
    let mut retriever = build_retriever(&config)?;
    if let Some(limit) = limit {
        retriever = retriever.with_top_k(limit as usize);
    }

    let result = retriever.search(question).await?;

    if json {
        let output = serde_json::json!({
            "question": question,
            "results": result,
        });
        let rendered = serde_json::to_string_pretty(&output).map_err(|e| FaqError::Json {
            source: e,
            context: "Failed to serialize search results".to_string(),
        })?;
        println!("{}", rendered);
        return Ok(());
    }

    if result.is_empty() {
        println!("No documents indexed yet. Run 'faqsense seed' first.");
        return Ok(());
    }
    print_neighbors(&result.hits);
    Ok(())
}

async fn cmd_neighbors(config: Config, literal: &str, limit: usize) -> Result<()> {
    let vector = codec::parse_literal(literal)?;
    let (_, store) = open_store(&config)?;

    let hits = store.nearest_neighbors(&vector, limit).await?;
    println!("Query: {}", codec::to_literal(&vector));
    if hits.is_empty() {
        println!("No documents indexed yet.");
        return Ok(());
    }
    print_neighbors(&hits);
    Ok(())
}

async fn cmd_stats(config: Config) -> Result<()> {
    let (database, store) = open_store(&config)?;
    let stats = database.stats()?;

    println!("faqsense Store");
    println!("==============");
    println!("\nDatabase: {}", config.storage.database_path()?.display());
    println!("Documents: {}", stats.document_count);
    println!("Size: {}", DbStats::format_size(stats.total_size_bytes));
    println!("Dimension: {}", store.dimension());
    println!("Strategy: {}", store.strategy().as_str());
    println!(
        "Embedding: {} ({})",
        config.embedding.model, config.embedding.provider
    );
    Ok(())
}

fn cmd_config(
    config_path: Option<PathBuf>,
    profile: Option<String>,
    action: ConfigAction,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path, profile)?;
            let json = serde_json::to_string_pretty(&config).map_err(|e| FaqError::Json {
                source: e,
                context: "Failed to serialize config".to_string(),
            })?;
            println!("{}", json);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| FaqError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            Config::default().save(&path)?;
            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>, profile: Option<String>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };
    Config::load_or_default(&path, profile.as_deref())
}

fn build_retriever(config: &Config) -> Result<Retriever> {
    let (_, store) = open_store(config)?;
    let provider = build_provider(&config.embedding)?;
    Ok(Retriever::new(provider, Arc::new(store)).with_top_k(config.retrieval.top_k))
}

fn build_indexer(config: &Config) -> Result<Indexer> {
    let (_, store) = open_store(config)?;
    let provider = build_provider(&config.embedding)?;
    Indexer::new(provider, Arc::new(store), config.indexing.max_concurrent)
}

fn print_neighbors(hits: &[Neighbor]) {
    let width = hits.iter().map(|h| h.title.len()).max().unwrap_or(0);
    for (rank, hit) in hits.iter().enumerate() {
        println!(
            "{:>2}. {:<width$}  {:.4}",
            rank + 1,
            hit.title,
            hit.distance,
            width = width
        );
    }
}

fn print_summary(summary: &IndexSummary) {
    println!(
        "✓ {} indexed, {} failed ({}ms)",
        summary.processed, summary.failed, summary.duration_ms
    );
}
