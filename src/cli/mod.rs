use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "codegraph",
    about = "Detects source language, splits files into chunks, and normalizes them into a language-agnostic entity/relationship graph",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Detect the language and recommended chunking strategy for a file")]
    Detect {
        #[arg(help = "File to inspect")]
        path: PathBuf,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Split a file into chunks via the strategy fallback ladder")]
    Chunk {
        #[arg(help = "File to chunk")]
        path: PathBuf,

        #[arg(long, help = "Force a starting strategy instead of using detection")]
        strategy: Option<String>,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Normalize a file's AST into entities and relationships")]
    Normalize {
        #[arg(help = "File to normalize")]
        path: PathBuf,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Run the full detect -> chunk -> post-process -> normalize pipeline over paths")]
    Pipeline {
        #[arg(help = "Files or directories to process")]
        paths: Vec<PathBuf>,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Merge a JSON array of scored chunks using a query-time merge strategy")]
    Merge {
        #[arg(help = "Path to a JSON file containing scored chunks")]
        input: PathBuf,

        #[arg(long, help = "Override the configured merge strategy (conservative|aggressive|semantic)")]
        strategy: Option<String>,
    },

    #[command(about = "Manage configuration")]
    Config {
        #[arg(long, help = "Set a configuration value, e.g. --set chunking.max_chunk_size=4000")]
        set: Option<String>,

        #[arg(long, help = "Print the current configuration")]
        print: bool,
    },
}
