//! Table formatting and output utilities
//!
//! This module renders config entries as tables or JSON and styles
//! console messages for the command-line tool.

use crate::error::Result;
use crate::store::{Value, ValueStore};
use crossterm::style::{Color as CrosstermColor, Stylize};
use crossterm::terminal::size;
use tabled::{
    settings::{object::Rows, Alignment, Color, Modify, Padding, Style, Width},
    Table, Tabled,
};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// One row of a rendered config
#[derive(Debug, Clone, Tabled)]
pub struct EntryRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Type")]
    pub value_type: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl EntryRow {
    pub fn new(key: &str, value: &Value) -> Self {
        Self {
            key: key.to_string(),
            value_type: value.value_type().to_string(),
            value: value.to_string(),
        }
    }
}

/// Formatter for config stores and values
pub struct TableFormatter {
    format: OutputFormat,
    no_color: bool,
}

impl TableFormatter {
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        Self { format, no_color }
    }

    /// Render every entry of `store`
    pub fn format_store(&self, store: &ValueStore) -> Result<String> {
        match self.format {
            OutputFormat::Table => {
                let rows: Vec<EntryRow> = store
                    .snapshot()
                    .iter()
                    .map(|(key, value)| EntryRow::new(key, value))
                    .collect();
                if rows.is_empty() {
                    return Ok(format!("Config '{}' has no entries", store.name()));
                }
                Ok(self.format_rows(&rows))
            }
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&store.serialize())?),
        }
    }

    /// Render a single value
    pub fn format_value(&self, value: &Value) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(value.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&value.to_json())?),
        }
    }

    fn format_rows<T: Tabled>(&self, rows: &[T]) -> String {
        let mut table = Table::new(rows);

        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .with(Padding::new(1, 1, 0, 0));

        if !self.no_color {
            table.with(Modify::new(Rows::first()).with(Color::FG_BLUE));
        }

        // Auto-adjust width to terminal
        if let Ok((width, _)) = size() {
            table.with(Width::wrap(width as usize));
        }

        table.to_string()
    }
}

/// Console message styling
pub struct DisplayUtils {
    no_color: bool,
}

impl DisplayUtils {
    pub fn new(no_color: bool) -> Self {
        Self { no_color }
    }

    pub fn success(&self, message: &str) -> String {
        if self.no_color {
            format!("✓ {}", message)
        } else {
            format!("✓ {}", message.with(CrosstermColor::Green))
        }
    }

    pub fn print_error(&self, message: &str) {
        if self.no_color {
            eprintln!("✗ {}", message);
        } else {
            eprintln!("✗ {}", message.with(CrosstermColor::Red));
        }
    }
}
