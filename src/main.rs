// src/main.rs

use std::io::{BufRead, Write as _};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use triage::config::CONFIG;
use triage::llm::GeminiProvider;
use triage::pipeline::{Classifier, ClassifyOutcome};
use triage::session::SessionContext;
use triage::state::AppState;
use triage::taxonomy::store::TaxonomyStore;

#[derive(Parser)]
#[command(name = "triage", about = "LLM-backed IT support ticket classifier")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP classification server
    Serve,
    /// Classify ticket descriptions interactively (or one, if given)
    Classify {
        /// Single ticket description; omit for an interactive session
        description: Option<String>,
    },
    /// Inspect or replace the persisted taxonomy
    Taxonomy {
        #[command(subcommand)]
        command: TaxonomyCommand,
    },
}

#[derive(Subcommand)]
enum TaxonomyCommand {
    /// Print the current taxonomy and the prompt blocks built from it
    Show,
    /// Validate a CSV file and persist it as the new taxonomy
    Upload { file: PathBuf },
    /// Re-read the persisted taxonomy and report what loaded
    Reload,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(CONFIG.log_level.clone()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve => serve().await,
        Command::Classify { description } => classify(description).await,
        Command::Taxonomy { command } => taxonomy(command),
    }
}

async fn serve() -> anyhow::Result<()> {
    let provider = Arc::new(GeminiProvider::from_env()?);
    let store = TaxonomyStore::new(&CONFIG.taxonomy_path);
    let state = AppState::new(provider, store)?;

    info!(model = %CONFIG.model, taxonomy = %CONFIG.taxonomy_path, "starting triage server");

    // Outer request timeout sits above the LLM call timeout.
    let request_timeout = Duration::from_secs(CONFIG.llm_timeout_secs + 5);
    let app = triage::api::app(state, request_timeout);

    let bind_address = format!("{}:{}", CONFIG.host, CONFIG.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("listening on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn classify(description: Option<String>) -> anyhow::Result<()> {
    let provider = Arc::new(GeminiProvider::from_env()?);
    let store = TaxonomyStore::new(&CONFIG.taxonomy_path);
    let taxonomy = store.load()?;
    let classifier = Classifier::new(provider);
    let mut session = SessionContext::new();

    if let Some(description) = description {
        let outcome = classifier
            .classify(&taxonomy, &mut session, &description)
            .await?;
        print_outcome(&outcome);
        return Ok(());
    }

    println!("Enter ticket descriptions. Blank line to re-prompt, 'quit' to exit.");
    let stdin = std::io::stdin();
    loop {
        print!("Ticket> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.is_empty() {
            println!("Please enter a ticket description.");
            continue;
        }
        match classifier.classify(&taxonomy, &mut session, line).await {
            Ok(outcome) => print_outcome(&outcome),
            Err(err) => eprintln!("Classification failed: {err}"),
        }
    }
    Ok(())
}

fn print_outcome(outcome: &ClassifyOutcome) {
    println!("  Category    | {}", outcome.classification.category);
    println!("  Subcategory | {}", outcome.classification.subcategory);
    if let Some(usage) = outcome.usage {
        println!(
            "  Tokens      | in: {}, out: {}",
            usage.input_tokens, usage.output_tokens
        );
    }
}

fn taxonomy(command: TaxonomyCommand) -> anyhow::Result<()> {
    let store = TaxonomyStore::new(&CONFIG.taxonomy_path);
    match command {
        TaxonomyCommand::Show => {
            let taxonomy = store.load()?;
            println!("{} rows from {}", taxonomy.len(), store.path().display());
            println!("\nCategories:\n{}", taxonomy.category_block());
            println!("\nSubcategories:\n{}", taxonomy.pair_block());
        }
        TaxonomyCommand::Upload { file } => {
            let bytes = std::fs::read(&file)?;
            let replaced = store.replace(&bytes)?;
            println!(
                "Uploaded {} rows to {}",
                replaced.len(),
                store.path().display()
            );
        }
        TaxonomyCommand::Reload => {
            let taxonomy = store.load()?;
            println!(
                "Reloaded {} rows from {}",
                taxonomy.len(),
                store.path().display()
            );
        }
    }
    Ok(())
}
