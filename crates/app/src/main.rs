use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use doc_graph_core::{
    sync_folder, FileExtractor, Neo4jStore, QueryEngine, SentenceMatch, SyncOptions,
};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "doc-graph", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Neo4j HTTP transaction URL
    #[arg(long, default_value = "http://localhost:7474")]
    neo4j_url: String,

    /// Neo4j database name
    #[arg(long, default_value = "neo4j")]
    neo4j_db: String,

    /// Neo4j username
    #[arg(long, default_value = "neo4j")]
    neo4j_user: String,

    /// Neo4j password
    #[arg(long, default_value = "password")]
    neo4j_password: String,

    /// File that persists the configured root folder.
    #[arg(long)]
    path_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Index new documents under the root folder into the graph.
    Sync {
        /// Folder to scan; defaults to the persisted root path.
        #[arg(long)]
        folder: Option<String>,
    },
    /// Persist the root folder used by future sync passes.
    SetRoot {
        /// Folder that will be scanned by `sync`.
        folder: String,
    },
    /// Print every (document, sentence) pair whose stored sentence contains the term.
    Search {
        /// Search term
        #[arg(long)]
        term: String,
    },
    /// Interactive search loop; `quit`, `q` or `exit` terminates.
    Prompt,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let path_file = cli.path_file.clone().unwrap_or_else(default_path_file);

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "doc-graph boot"
    );

    match cli.command {
        Command::Sync { folder } => {
            let root = match folder {
                Some(folder) => PathBuf::from(folder),
                None => read_root(&path_file)?,
            };

            let store = Arc::new(Neo4jStore::new(
                &cli.neo4j_url,
                &cli.neo4j_db,
                &cli.neo4j_user,
                &cli.neo4j_password,
            ));

            info!(root = %root.display(), "starting sync pass");
            let report = sync_folder(
                store,
                Arc::new(FileExtractor),
                &root,
                SyncOptions::default(),
            )
            .await
            .map_err(|error| anyhow::anyhow!(error.to_string()))?;

            println!("{report}");
        }
        Command::SetRoot { folder } => {
            write_root(&path_file, &folder)?;
            println!("root folder set to {folder}");
        }
        Command::Search { term } => {
            let engine = QueryEngine::new(Neo4jStore::new(
                &cli.neo4j_url,
                &cli.neo4j_db,
                &cli.neo4j_user,
                &cli.neo4j_password,
            ));
            let matches = engine
                .search(&term)
                .await
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            print_matches(&matches);
        }
        Command::Prompt => {
            let engine = QueryEngine::new(Neo4jStore::new(
                &cli.neo4j_url,
                &cli.neo4j_db,
                &cli.neo4j_user,
                &cli.neo4j_password,
            ));

            loop {
                print!("Find me documents that have the word: ");
                io::stdout().flush()?;

                let mut input = String::new();
                if io::stdin().read_line(&mut input)? == 0 {
                    break;
                }
                let term = input.trim();

                if term.is_empty() {
                    continue;
                }
                if matches!(term, "quit" | "q" | "exit") {
                    break;
                }

                match engine.search(term).await {
                    Ok(matches) => print_matches(&matches),
                    Err(error) => eprintln!("search failed: {error}"),
                }
            }
        }
    }

    Ok(())
}

fn default_path_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".doc-graph")
        .join("root_path")
}

fn read_root(path_file: &Path) -> anyhow::Result<PathBuf> {
    let contents = fs::read_to_string(path_file).with_context(|| {
        format!(
            "no root folder configured; pass --folder or run set-root (missing {})",
            path_file.display()
        )
    })?;
    Ok(PathBuf::from(contents.trim()))
}

fn write_root(path_file: &Path, folder: &str) -> anyhow::Result<()> {
    if let Some(parent) = path_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path_file, folder)?;
    Ok(())
}

fn print_matches(matches: &[SentenceMatch]) {
    for hit in matches {
        println!("{}\t{}", hit.document, hit.sentence);
    }
}
