//! Command-line front end for the classroom store.
//! Every command loads the configured backend, performs one operation and
//! exits; `sync` keeps the remote flush running until interrupted.

pub mod commands;
pub mod display;

use colored::Colorize;
use std::error::Error;
use std::sync::Arc;

use crate::{DataStore, StoreConfig, open_backend};

/// Executes CLI commands based on the provided arguments
pub async fn execute_cli(args: &[String]) -> Result<(), Box<dyn Error>> {
    // Help needs no config or storage
    if args.is_empty() || args[0] == "help" {
        print_help();
        return Ok(());
    }

    let command = args[0].as_str();
    let rest = &args[1..];

    // Every other command works on a loaded store; a fresh backend seeds
    // and saves its default accounts here
    let config = StoreConfig::load_and_validate()?;
    let store = open_store(&config).await?;

    match command {
        "users" => commands::list_users(&store).await,
        "add-user" => commands::add_user(&store, rest).await,
        "login" => commands::login(&store, rest).await,
        "cards" => commands::list_cards(&store).await,
        "add-card" => commands::add_card(&store, rest).await,
        "delete-card" | "rm-card" => commands::delete_card(&store, rest).await,
        "status" => commands::show_status(&store).await,
        "set-status" => commands::set_status(&store, rest).await,
        "log" => commands::add_log(&store, rest).await,
        "logs" => commands::list_logs(&store).await,
        "export" => commands::export(&store, rest).await,
        "import" => commands::import(&store, rest).await,
        "backup" => commands::backup(&store, &config).await,
        // Listing backups only reads the directory
        "backups" => commands::list_backups(&config),
        "sync" => commands::sync(store, &config).await,
        _ => {
            println!("{}  Unknown command: {}", "┃".bright_magenta(), command);
            print_help();
            Ok(())
        }
    }
}

async fn open_store(config: &StoreConfig) -> Result<Arc<DataStore>, Box<dyn Error>> {
    let backend = open_backend(config)?;
    let store = Arc::new(DataStore::new(backend));
    store.load().await;
    Ok(store)
}

/// Prints the help message with available commands
fn print_help() {
    let commands = [
        ("users", "List all accounts"),
        ("add-user <LOGIN> <PASSWORD> <ROLE> <NAME> <EMAIL> [CLASS]", "Create or replace an account"),
        ("login <LOGIN> <PASSWORD>", "Check a login and password"),
        ("cards", "List all flashcards"),
        ("add-card <FRONT> <BACK>", "Add a flashcard"),
        ("delete-card, rm-card <ID>", "Delete every card with this id"),
        ("status", "Show teacher/student access"),
        ("set-status <on|off> <on|off>", "Set teacher and student access"),
        ("log <MESSAGE>", "Append a log entry"),
        ("logs", "List log entries"),
        ("export [DIR]", "Write data_backup_<date>.json"),
        ("import <FILE>", "Replace all data with a JSON file"),
        ("backup", "Write a timestamped backup to the data directory"),
        ("backups", "List backups in the data directory"),
        ("sync", "Keep flushing to the remote document until Ctrl-C"),
        ("help", "Display this help message"),
    ];

    println!(
        "{}  {}",
        "┃".bright_magenta(),
        "CLASSROOM STORE".bold()
    );
    println!("{}  {}", "┃".bright_magenta(), "USAGE:".bright_yellow());
    println!("{}  classroom [COMMAND] [ARGS]", "┃".bright_magenta());
    println!("{}  {}", "┃".bright_magenta(), "COMMANDS:".bright_yellow());
    for (usage, description) in commands {
        println!(
            "{}  {:<58} {}",
            "┃".bright_magenta(),
            usage.bright_white(),
            description
        );
    }

    println!("{}  {}", "┃".bright_magenta(), "CONFIG:".bright_green());
    println!(
        "{}  Set {} to a TOML file selecting the local, fetch or remote backend",
        "┃".bright_magenta(),
        crate::config::CONFIG_PATH_ENV
    );
}
