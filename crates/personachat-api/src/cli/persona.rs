//! Persona catalog CLI commands.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use crate::state::AppState;

/// List the configured personas with model and sampling settings.
///
/// # Examples
///
/// ```bash
/// pchat personas
/// pchat personas --json
/// ```
pub fn list_personas(state: &AppState, json: bool) -> Result<()> {
    let personas = state.orchestrator.catalog().list();

    if json {
        println!("{}", serde_json::to_string_pretty(personas)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Key").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Model").fg(Color::White),
        Cell::new("Temp").fg(Color::White),
    ]);

    for persona in personas {
        table.add_row(vec![
            Cell::new(&persona.key).fg(Color::Cyan),
            Cell::new(&persona.name).fg(Color::White),
            Cell::new(&persona.model).fg(Color::DarkGrey),
            Cell::new(format!("{:.1}", persona.temperature)).fg(Color::White),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} persona{}",
        style(personas.len()).bold(),
        if personas.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}
