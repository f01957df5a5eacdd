use chrono::Utc;
use colored::Colorize;
use serde_json::json;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::display::{self, margin};
use crate::config::StoreConfig;
use crate::models::export;
use crate::models::{Card, CardId, Record, Role, SystemStatus, User};
use crate::DataStore;

type CliResult = Result<(), Box<dyn Error>>;

fn usage(message: &str, usage: &str) -> CliResult {
    println!("{}  Error: {}", margin(), message);
    println!("{}  Usage: classroom {}", margin(), usage);
    Ok(())
}

pub async fn list_users(store: &DataStore) -> CliResult {
    println!("{}  {}", margin(), "USERS".bright_green().bold());
    display::rule();
    display::print_users(&store.users().await);
    Ok(())
}

pub async fn add_user(store: &DataStore, args: &[String]) -> CliResult {
    if args.len() < 5 {
        return usage(
            "Missing account fields",
            "add-user <LOGIN> <PASSWORD> <ROLE> <NAME> <EMAIL> [CLASS]",
        );
    }

    // Args after the command: login, password, role, name, email, class
    let role: Role = args[2].parse()?;
    // Only students carry a class; it is ignored for other roles
    let mut user = match (role, args.get(5)) {
        (Role::Student, Some(class)) => User::student(&args[1], &args[3], &args[4], class),
        _ => User::new(&args[1], &args[3], role, &args[4]),
    };
    // Re-saving a student keeps their points and completed cards, since
    // set_user replaces the whole record
    if let Some(existing) = store.user(&args[0]).await {
        if existing.role == Role::Student && role == Role::Student {
            user.points = existing.points.or(user.points);
            user.completed_cards = existing.completed_cards.or(user.completed_cards);
        }
    }

    store.set_user(args[0].clone(), user).await;
    println!("{}  Saved account {}", margin(), args[0].bright_white());
    Ok(())
}

pub async fn login(store: &DataStore, args: &[String]) -> CliResult {
    if args.len() < 2 {
        return usage("Missing login or password", "login <LOGIN> <PASSWORD>");
    }

    match store.authenticate(&args[0], &args[1]).await {
        Some(user) => println!(
            "{}  {} {} ({})",
            margin(),
            "Welcome".bright_green(),
            user.name.bold(),
            user.role
        ),
        None => println!("{}  {}", margin(), "Invalid login or password".red()),
    }
    Ok(())
}

pub async fn list_cards(store: &DataStore) -> CliResult {
    println!("{}  {}", margin(), "CARDS".bright_green().bold());
    display::rule();
    display::print_cards(&store.cards().await);
    Ok(())
}

pub async fn add_card(store: &DataStore, args: &[String]) -> CliResult {
    if args.len() < 2 {
        return usage("Missing card content", "add-card <FRONT> <BACK>");
    }

    // Millisecond timestamps serve as card ids
    let id = Utc::now().timestamp_millis();
    let card = Card::new(id)
        .with_field("front", args[0].as_str())
        .with_field("back", args[1].as_str());
    store.add_card(card).await;
    println!("{}  Added card {}", margin(), id.to_string().yellow());
    Ok(())
}

pub async fn delete_card(store: &DataStore, args: &[String]) -> CliResult {
    let Some(raw) = args.first() else {
        return usage("Missing card id", "delete-card <ID>");
    };

    // "42" deletes numeric id 42, anything non-numeric is matched as text
    let id: CardId = raw.parse()?;
    let removed = store.delete_card(&id).await;
    println!("{}  Removed {} card(s) with id {}", margin(), removed, id);
    Ok(())
}

pub async fn show_status(store: &DataStore) -> CliResult {
    println!("{}  {}", margin(), "SYSTEM STATUS".bright_green().bold());
    display::rule();
    display::print_status(&store.system_status().await);
    Ok(())
}

pub async fn set_status(store: &DataStore, args: &[String]) -> CliResult {
    let parsed = match args {
        [teachers, students, ..] => parse_switch(teachers).zip(parse_switch(students)),
        _ => None,
    };
    let Some((teachers, students)) = parsed else {
        return usage("Expected two on/off values", "set-status <on|off> <on|off>");
    };

    let status = SystemStatus { teachers, students };
    store.set_system_status(status).await;
    display::print_status(&status);
    Ok(())
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

pub async fn add_log(store: &DataStore, args: &[String]) -> CliResult {
    if args.is_empty() {
        return usage("Missing log message", "log <MESSAGE>");
    }

    let entry = json!({
        "time": Utc::now().to_rfc3339(),
        "message": args.join(" "),
    });
    store.add_log(entry).await;
    println!("{}  Logged", margin());
    Ok(())
}

pub async fn list_logs(store: &DataStore) -> CliResult {
    println!("{}  {}", margin(), "LOGS".bright_green().bold());
    display::rule();
    let logs: Vec<Record> = store.logs().await;
    display::print_records(&logs);
    Ok(())
}

pub async fn export(store: &DataStore, args: &[String]) -> CliResult {
    // Export into the given directory, or the working directory by default
    let dir = match args.first() {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };

    let path = store.export().await?.write_to(&dir)?;
    println!("{}  Exported to {}", margin(), path.display().to_string().bright_white());
    Ok(())
}

pub async fn import(store: &DataStore, args: &[String]) -> CliResult {
    let Some(file) = args.first() else {
        return usage("Missing file to import", "import <FILE>");
    };

    let snapshot = store.import_file(file).await?;
    println!(
        "{}  Imported {} users, {} cards, {} tests, {} messages, {} log entries",
        margin(),
        snapshot.users.len(),
        snapshot.cards.len(),
        snapshot.tests.len(),
        snapshot.chat_messages.len(),
        snapshot.logs.len()
    );
    Ok(())
}

pub async fn backup(store: &DataStore, config: &StoreConfig) -> CliResult {
    let path = store.backup_to(&config.backups_dir()?).await?;
    println!("{}  Backup written to {}", margin(), path.display().to_string().bright_white());
    Ok(())
}

pub fn list_backups(config: &StoreConfig) -> CliResult {
    let backups = export::list_backups(&config.backups_dir()?)?;
    println!("{}  {}", margin(), "BACKUPS".bright_green().bold());
    display::rule();
    if backups.is_empty() {
        println!("{}  No backups found.", margin());
    }
    for (idx, path) in backups.iter().enumerate() {
        println!(
            "{}  {}. {}",
            margin(),
            (idx + 1).to_string().yellow(),
            path.display()
        );
    }
    Ok(())
}

pub async fn sync(store: Arc<DataStore>, config: &StoreConfig) -> CliResult {
    // Local and fetch backends already persist on every mutation
    let Some(period) = config.autosync_interval() else {
        println!(
            "{}  The {} backend writes on every change; nothing to sync",
            margin(),
            store.backend_kind()
        );
        return Ok(());
    };

    println!(
        "{}  Flushing every {}s, press Ctrl-C to stop",
        margin(),
        period.as_secs()
    );
    let handle = store.clone().spawn_autosync(period);
    tokio::signal::ctrl_c().await?;
    handle.abort();
    // Aborting can cut a tick short, so flush once more before exiting
    store.save().await;
    println!("{}  Stopped", margin());
    Ok(())
}
