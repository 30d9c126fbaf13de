#![deny(missing_docs)]

//! # XmlDoc OpenAPI CLI
//!
//! Command Line Interface for merging XML documentation comments into OpenAPI documents.
//!
//! Supported Commands:
//! - `enrich`: Applies comment files to an OpenAPI document using a host manifest.
//! - `comment-id`: Prints the documentation comment identifier of a member.

use clap::{Parser, Subcommand};
use xmldoc_core::AppResult;

mod comment_id;
mod enrich;
mod logging;

#[derive(Parser, Debug)]
#[clap(author, version, about = "XML documentation comments for OpenAPI")]
struct Cli {
    #[clap(flatten)]
    log: logging::LogArgs,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge XML documentation comments into an OpenAPI document.
    Enrich(enrich::EnrichArgs),
    /// Print the documentation comment identifier of a member.
    CommentId(comment_id::CommentIdArgs),
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    logging::init(&cli.log);

    match &cli.command {
        Commands::Enrich(args) => {
            enrich::execute(args)?;
        }
        Commands::CommentId(args) => comment_id::execute(args),
    }

    Ok(())
}
