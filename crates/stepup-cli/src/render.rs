use anstyle::{AnsiColor, Style};
use serde_json::json;
use stepup_core::UpgradeUnit;
use stepup_ledger::LedgerEntry;

pub fn format_pending_lines(pending: &[UpgradeUnit]) -> Vec<String> {
    pending
        .iter()
        .map(|unit| {
            let info = unit.info();
            if info.is_empty() {
                format!(" * {}", unit.id)
            } else {
                format!(" * {} ({info})", unit.id)
            }
        })
        .collect()
}

pub fn format_applied_lines(entries: &[LedgerEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| format!(" * {} ({})", entry.id, entry.applied_at.to_rfc3339()))
        .collect()
}

pub fn pending_json(pending: &[UpgradeUnit]) -> serde_json::Value {
    json!(pending
        .iter()
        .map(|unit| {
            json!({
                "id": unit.id,
                "repository": unit.repository,
                "depends_on": unit.depends_on,
                "info": unit.info(),
                "estimate_seconds": unit.estimate(),
            })
        })
        .collect::<Vec<_>>())
}

pub fn applied_json(entries: &[LedgerEntry]) -> serde_json::Value {
    json!(entries
        .iter()
        .map(|entry| {
            json!({
                "id": entry.id,
                "applied_at": entry.applied_at.to_rfc3339(),
            })
        })
        .collect::<Vec<_>>())
}

pub fn success_line(text: &str) -> String {
    styled(Style::new().fg_color(Some(AnsiColor::Green.into())).bold(), text)
}

pub fn warning_line(text: &str) -> String {
    styled(Style::new().fg_color(Some(AnsiColor::Yellow.into())).bold(), text)
}

pub fn error_line(text: &str) -> String {
    styled(Style::new().fg_color(Some(AnsiColor::Red.into())).bold(), text)
}

fn styled(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
