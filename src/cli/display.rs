use colored::Colorize;
use std::collections::BTreeMap;

use crate::models::{Card, Record, Role, SystemStatus, User};

pub fn margin() -> colored::ColoredString {
    "┃".bright_magenta()
}

pub fn rule() {
    println!("{}", "─".repeat(60).bright_magenta());
}

/// Prints accounts grouped by role in a tree layout
pub fn print_users(users: &BTreeMap<String, User>) {
    if users.is_empty() {
        println!("{}  No users found.", margin());
        return;
    }

    for role in [Role::Admin, Role::Teacher, Role::Student] {
        let members: Vec<(&String, &User)> =
            users.iter().filter(|(_, user)| user.role == role).collect();
        if members.is_empty() {
            continue;
        }

        println!("{}  {} ({})", margin(), role.as_str().to_uppercase().bold(), members.len());
        for (i, (login, user)) in members.iter().enumerate() {
            let connector = if i == members.len() - 1 { "└──" } else { "├──" };
            let class = user
                .class
                .as_deref()
                .map(|class| format!(" [{class}]"))
                .unwrap_or_default();
            let points = user
                .points
                .map(|points| format!(" {points} pts"))
                .unwrap_or_default();
            println!(
                "{}  {} {} {}{}{} {}",
                margin(),
                connector,
                login.bright_white(),
                user.name,
                class.bright_blue(),
                points.yellow(),
                user.email.bright_black().italic()
            );
        }
    }
}

pub fn print_cards(cards: &[Card]) {
    if cards.is_empty() {
        println!("{}  No cards found.", margin());
        return;
    }

    for (i, card) in cards.iter().enumerate() {
        let connector = if i == cards.len() - 1 { "└──" } else { "├──" };
        let front = card.text("front").unwrap_or("");
        let back = card.text("back").unwrap_or("");
        println!(
            "{}  {} {} {} {} {}",
            margin(),
            connector,
            card.id.to_string().yellow(),
            front.bright_white(),
            "→".bright_black(),
            back
        );
    }
}

pub fn print_status(status: &SystemStatus) {
    println!("{}  {}: {}", margin(), "Teachers".bright_blue(), on_off(status.teachers));
    println!("{}  {}: {}", margin(), "Students".bright_cyan(), on_off(status.students));
}

pub fn print_records(records: &[Record]) {
    if records.is_empty() {
        println!("{}  Nothing recorded.", margin());
        return;
    }

    for (idx, record) in records.iter().enumerate() {
        let line = match record {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        println!("{}  {}. {}", margin(), (idx + 1).to_string().yellow(), line);
    }
}

fn on_off(enabled: bool) -> colored::ColoredString {
    if enabled { "on".bright_green() } else { "off".red() }
}
