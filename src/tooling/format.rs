//! Text and JSON rendering of command results.

use crate::commands::{
    preview, PublishResult, RecordListResult, RecordShowResult, RecordSummary, WhoAmIResult,
};
use crate::error::ApiError;
use crate::registry::{Record, RecordKind, RegistryStats};
use crate::search::SearchResults;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

/// Output format accepted by `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(format: &str) -> Result<Self, ApiError> {
        match format {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ApiError::ConfigError(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }
}

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn plural(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Agent => "Agents",
        RecordKind::Context => "Contexts",
        RecordKind::Prompt => "Prompts",
    }
}

fn detail_header(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Prompt => "Preview",
        _ => "Files",
    }
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Table of records; `None` when there is nothing to show.
pub fn record_table(kind: RecordKind, items: &[RecordSummary]) -> Option<Table> {
    if items.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Description", detail_header(kind), "Tags"]);
    for item in items {
        table.add_row(vec![
            item.name.clone(),
            preview(&item.description, 60),
            item.detail.clone(),
            item.tags.join(", "),
        ]);
    }
    Some(table)
}

pub fn format_list_text(result: &RecordListResult) -> String {
    match record_table(result.kind, &result.items) {
        None => format!(
            "No {} found. Add one with 'agenco {} add'.",
            plural(result.kind).to_lowercase(),
            result.kind
        ),
        Some(table) => format!(
            "{}\n\n{}\n\nTotal: {} {}(s)",
            format_section_heading(plural(result.kind)),
            table,
            result.items.len(),
            result.kind
        ),
    }
}

pub fn format_list_json(result: &RecordListResult) -> String {
    pretty(&json!({
        plural(result.kind).to_lowercase(): result.items,
        "total": result.items.len(),
    }))
}

/// Full record view. `max_content` truncates the body (the menu shows a preview).
pub fn format_show_text(result: &RecordShowResult, max_content: Option<usize>) -> String {
    let mut out = format!("{}: {}\n", result.kind.label(), result.name);
    if !result.description.is_empty() {
        out.push_str(&format!("Description: {}\n", result.description));
    }
    if let Some(category) = &result.category {
        out.push_str(&format!("Category: {}\n", category));
    }
    if let Some(content_type) = &result.content_type {
        out.push_str(&format!("Content type: {}\n", content_type));
    }
    if !result.tags.is_empty() {
        out.push_str(&format!("Tags: {}\n", result.tags.join(", ")));
    }
    if result.kind != RecordKind::Prompt {
        out.push_str(&format!("Files ({}):\n", result.files.len()));
        for file in &result.files {
            out.push_str(&format!("  - {}\n", file));
        }
    }

    let body = match max_content {
        Some(max) => preview(&result.content, max),
        None => result.content.clone(),
    };
    out.push_str(&format!("\n{}\n{}", format_section_heading("Content"), body));
    out
}

pub fn format_show_json(result: &RecordShowResult) -> String {
    pretty(&json!(result))
}

fn names<R: Record>(records: &[R]) -> Vec<String> {
    records.iter().map(|r| r.name().to_string()).collect()
}

pub fn format_search_text(query: &str, results: &SearchResults) -> String {
    if results.is_empty() {
        return format!("No results for '{}'.", query);
    }
    let mut out = format!(
        "{}\n",
        format_section_heading(&format!("Results for '{}' ({})", query, results.total()))
    );
    let groups = [
        (RecordKind::Agent, names(&results.agents)),
        (RecordKind::Context, names(&results.contexts)),
        (RecordKind::Prompt, names(&results.prompts)),
    ];
    for (kind, group) in groups {
        if group.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{} ({}):\n", plural(kind), group.len()));
        for name in group {
            out.push_str(&format!("  - {}\n", name));
        }
    }
    out.trim_end().to_string()
}

pub fn format_search_json(query: &str, results: &SearchResults) -> String {
    pretty(&json!({
        "query": query,
        "agents": results.agents,
        "contexts": results.contexts,
        "prompts": results.prompts,
        "total": results.total(),
    }))
}

/// One-line summary used by the menu header.
pub fn format_stats_line(stats: &RegistryStats) -> String {
    format!(
        "{} agents | {} contexts | {} prompts",
        stats.agents, stats.contexts, stats.prompts
    )
}

pub fn format_stats_text(stats: &RegistryStats) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Kind", "Count"]);
    table.add_row(vec!["Agents".to_string(), stats.agents.to_string()]);
    table.add_row(vec!["Contexts".to_string(), stats.contexts.to_string()]);
    table.add_row(vec!["Prompts".to_string(), stats.prompts.to_string()]);
    format!(
        "{}\n\n{}\n\nTotal: {}",
        format_section_heading("Registry"),
        table,
        stats.total()
    )
}

pub fn format_stats_json(stats: &RegistryStats) -> String {
    pretty(&json!({
        "agents": stats.agents,
        "contexts": stats.contexts,
        "prompts": stats.prompts,
        "total": stats.total(),
    }))
}

pub fn format_publish_result(result: &PublishResult) -> String {
    let mut out = format!("Published {} '{}'", result.kind, result.name);
    for line in result.response.summary_lines() {
        out.push_str(&format!("\n  {}", line));
    }
    out
}

pub fn format_whoami(result: &WhoAmIResult) -> String {
    match result {
        WhoAmIResult::LoggedIn { user, api_url } => {
            let mut out = format!("Logged in as {}", user.email);
            if !user.name.is_empty() {
                out.push_str(&format!(" ({})", user.name));
            }
            out.push_str(&format!("\nMarketplace: {}", api_url));
            out
        }
        WhoAmIResult::TokenOnly => "Not logged in; using token from AGENCO_TOKEN".to_string(),
        WhoAmIResult::LoggedOut => "Not logged in".to_string(),
    }
}
