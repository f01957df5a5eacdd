//! classroom - command-line access to the classroom store
//!
//! Loads users, flashcards, tests, chat messages, system status and logs
//! from the configured backend (local storage, static resource with local
//! fallback, or a hosted JSON document) and runs one command against them.

use classroom_store::{cli, logging};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    color_eyre::install()?;
    logging::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    cli::execute_cli(&args).await
}
