//! Output formatting for human and JSON modes
//!
//! CLI commands produce structured results that render either as
//! human-readable text or machine-parseable JSON.

use colored::Colorize;
use serde::Serialize;

use crate::api::DutyPreviewData;
use crate::core::models::DutyMember;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Result of creating the first super-admin
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapResult {
    /// Officer username
    pub username: String,
    /// Whether the account was created (false when it already existed)
    pub created: bool,
    /// Data directory used
    pub data_dir: String,
}

impl BootstrapResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                if self.created {
                    println!("{} super-admin '{}'", "Created".green(), self.username);
                } else {
                    println!("{} officer '{}' already exists", "Skipped:".yellow(), self.username);
                }
                println!("Data directory: {}", self.data_dir);
                println!("\nIssue a token with: idir token issue {}", self.username);
            },
            OutputMode::Json => print_json(self),
        }
    }
}

/// A freshly issued bearer token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResult {
    /// Officer the token is for
    pub username: String,
    /// The token
    pub token: String,
    /// Expiry (RFC3339)
    pub expires_at: String,
}

impl TokenResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                println!("Token for {} (expires {}):\n", self.username.bold(), self.expires_at);
                println!("{}", self.token);
            },
            OutputMode::Json => print_json(self),
        }
    }
}

/// Planned duties for the next funeral
#[derive(Debug, Serialize)]
pub struct DutyPreviewResult(pub DutyPreviewData);

impl DutyPreviewResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(&self.0),
        }
    }

    fn render_human(&self) {
        let preview = &self.0;
        let plan = &preview.plan;
        println!("Next funeral starts after member {}", preview.start_after_id);
        if !preview.carry_over.is_empty() {
            let ids: Vec<String> = preview.carry_over.iter().map(ToString::to_string).collect();
            println!("Carry-over: {}", ids.join(", "));
        }
        println!();
        render_list("Cemetery", &plan.cemetery_assignments);
        render_list("Funeral parade", &plan.funeral_assignments);
        render_list("Released", &plan.released_members);

        if plan.is_complete() {
            println!("Next cursor: {}", plan.next_cursor);
        } else {
            println!(
                "{} {} slot(s) unfilled; the rotation will restart from the top",
                "Short:".yellow(),
                plan.shortfall
            );
        }
    }
}

fn render_list(title: &str, members: &[DutyMember]) {
    println!("{} ({}):", title.bold(), members.len());
    if members.is_empty() {
        println!("  (none)");
    }
    for m in members {
        println!("  {:>5}  {}", m.id, m.name);
    }
    println!();
}
