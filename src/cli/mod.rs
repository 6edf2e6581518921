//! `crewboard` command line: every subcommand drives the same
//! [`CollectionController`](crewboard::controller::CollectionController)
//! a page would, against the file-backed local store.

mod commands;

pub use commands::Workspace;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use crewboard::screens::Screen;
use crewboard::session::Role;
use serde_json::Value as JsonValue;

#[derive(Parser, Debug)]
#[command(name = "crewboard")]
#[command(about = "Role-based dashboard over mock collections")]
pub struct Cli {
    /// Demo account to act as
    #[arg(long, global = true, default_value = "admin")]
    pub user: String,

    /// Password for the demo account
    #[arg(long, global = true, default_value = "admin123")]
    pub password: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screens in a role's navigation
    Screens {
        #[arg(long)]
        role: Option<Role>,
    },
    /// One page of a collection screen, as JSON
    List {
        screen: Screen,
        #[arg(long)]
        search: Option<String>,
        /// `field=value`, repeatable
        #[arg(long = "filter")]
        filters: Vec<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// `field` or `field:desc`
        #[arg(long)]
        sort: Option<String>,
    },
    Add {
        screen: Screen,
        #[arg(long = "set", required = true)]
        assignments: Vec<String>,
    },
    Edit {
        screen: Screen,
        id: u64,
        #[arg(long = "set", required = true)]
        assignments: Vec<String>,
    },
    Delete {
        screen: Screen,
        id: u64,
    },
    /// Show or change the stored settings
    Settings {
        #[arg(long = "set")]
        assignments: Vec<String>,
    },
    /// Recent create/update/delete activity
    Audit {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

/// Splits `field=value`.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected field=value, got '{}'", raw))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(anyhow!("missing field name in '{}'", raw));
    }
    Ok((field.to_string(), value.to_string()))
}

/// `--set` values are JSON when they parse as JSON, plain strings otherwise,
/// so `members=3` stores a number and `name=Ops` a string.
pub fn assignment_value(raw: &str) -> JsonValue {
    serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()))
}
