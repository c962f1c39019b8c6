//! Saved conversation CLI commands: list and show.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use personachat_types::turn::TurnRole;

use crate::state::AppState;

/// List saved conversations, newest first.
///
/// # Examples
///
/// ```bash
/// pchat records list
/// pchat records ls --json
/// ```
pub async fn list_records(state: &AppState, json: bool) -> Result<()> {
    let records = state.orchestrator.list_records().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!();
        println!(
            "  {} No saved conversations yet.",
            style("i").blue().bold()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Persona").fg(Color::White),
        Cell::new("Turns").fg(Color::White),
        Cell::new("Saved").fg(Color::White),
    ]);

    for record in &records {
        table.add_row(vec![
            Cell::new(record.id.to_string()).fg(Color::DarkGrey),
            Cell::new(&record.persona_key).fg(Color::Cyan),
            Cell::new(record.turn_count.to_string()).fg(Color::White),
            Cell::new(record.saved_at.format("%Y-%m-%d %H:%M").to_string()).fg(Color::White),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} conversation{}",
        style(records.len()).bold(),
        if records.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Show a saved conversation as a readable transcript.
///
/// # Examples
///
/// ```bash
/// pchat records show <record-id>
/// pchat records show <record-id> --json
/// ```
pub async fn show_record(state: &AppState, id: &str, json: bool) -> Result<()> {
    let record_id = id
        .parse()
        .with_context(|| format!("'{id}' is not a valid record id"))?;

    let record = state
        .orchestrator
        .record(record_id)
        .await
        .with_context(|| format!("Record '{id}' not found"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!();
    println!(
        "  Conversation with '{}' saved {}",
        style(&record.persona_key).cyan().bold(),
        record.saved_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!();

    for turn in &record.turns {
        let label = match turn.role {
            TurnRole::System => style("system").dim(),
            TurnRole::User => style("you").green().bold(),
            TurnRole::Assistant => style("assistant").cyan().bold(),
        };

        println!("  [{}] {}", label, turn.created_at.format("%H:%M"));
        println!("  {}", turn.content);
        println!();
    }

    Ok(())
}
