//! Memory CLI commands: list, add, block.
//!
//! Operate on the memory store directly; no agent gateway is constructed.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use webchat_core::memory::formatter::{render_memory_block, MEMORY_TIMESTAMP_FORMAT};
use webchat_core::memory::store::MemoryStore;
use webchat_types::memory::{Actor, MemoryRecord};

/// Longest text shown in a table cell before truncation.
const TEXT_PREVIEW_CHARS: usize = 60;

/// List a user's most recent memory records.
///
/// # Examples
///
/// ```bash
/// webchat-ai memory list --user u-42
/// webchat-ai memory list --user u-42 --limit 10 --json
/// ```
pub async fn list_memories<M: MemoryStore>(
    store: &M,
    user_id: &str,
    limit: i64,
    json: bool,
) -> Result<()> {
    let records = store.recent_by_user(user_id, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!();
        println!(
            "  {} No memories for user '{}'.",
            style("i").blue().bold(),
            style(user_id).cyan(),
        );
        println!();
        return Ok(());
    }

    let total = store.count_by_user(user_id).await?;

    println!();
    println!("  Memories for user '{}'", style(user_id).cyan().bold());
    println!();
    println!("{}", records_table(&records));
    println!();
    println!(
        "  {} of {} record{}",
        style(records.len()).bold(),
        total,
        if total == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Append one record.
///
/// # Examples
///
/// ```bash
/// webchat-ai memory add --user u-42 --session s-1 --actor user "I prefer email"
/// ```
pub async fn add_memory<M: MemoryStore>(
    store: &M,
    user_id: &str,
    session_id: &str,
    actor: Actor,
    text: &str,
    json: bool,
) -> Result<()> {
    let stored = store.append(user_id, session_id, actor, text, None).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"stored": stored, "user_id": user_id, "session_id": session_id})
        );
    } else if stored {
        println!(
            "  {} Memory saved for user '{}'",
            style("*").green().bold(),
            style(user_id).cyan()
        );
        println!("  {}", style(text).dim());
    } else {
        println!(
            "  {} Blank text, nothing stored.",
            style("i").blue().bold()
        );
    }

    Ok(())
}

/// Print the memory block as the chat prompt would see it.
pub async fn print_block<M: MemoryStore>(
    store: &M,
    user_id: &str,
    limit: i64,
    json: bool,
) -> Result<()> {
    let records = store.recent_by_user(user_id, limit).await?;
    let block = render_memory_block(user_id, &records);

    if json {
        println!(
            "{}",
            serde_json::json!({"user_id": user_id, "records": records.len(), "block": block})
        );
    } else if block.is_empty() {
        println!(
            "  {} No memories for user '{}'; the MEMORY section would be omitted.",
            style("i").blue().bold(),
            style(user_id).cyan()
        );
    } else {
        print!("{block}");
    }

    Ok(())
}

fn records_table(records: &[MemoryRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("When (UTC)").fg(Color::White),
        Cell::new("Actor").fg(Color::White),
        Cell::new("Session").fg(Color::White),
        Cell::new("Text").fg(Color::White),
    ]);

    for record in records {
        let actor_cell = match record.actor {
            Actor::User => Cell::new("user").fg(Color::Cyan),
            Actor::Agent => Cell::new("agent").fg(Color::Yellow),
            Actor::Bot => Cell::new("bot").fg(Color::Magenta),
        };

        table.add_row(vec![
            Cell::new(record.created_at.format(MEMORY_TIMESTAMP_FORMAT)).fg(Color::DarkGrey),
            actor_cell,
            Cell::new(&record.session_id).fg(Color::DarkGrey),
            Cell::new(preview(&record.text)).fg(Color::White),
        ]);
    }

    table
}

fn preview(text: &str) -> String {
    if text.chars().count() > TEXT_PREVIEW_CHARS {
        let head: String = text.chars().take(TEXT_PREVIEW_CHARS - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
