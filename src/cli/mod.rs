//! Command-line interface for tickit
//!
//! This module defines the CLI structure using clap derive macros.
//! Task subcommands live in `task`; `ui` hands off to the terminal view.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::filter::FilterMode;

mod task;

/// tickit - a small to-do list for the terminal
///
/// Tasks are kept in a local JSON store and listed with overdue work first.
#[derive(Parser, Debug)]
#[command(name = "tickit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the task store
    #[arg(long, global = true, env = "TICKIT_STORE")]
    pub store: Option<PathBuf>,

    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true, env = "TICKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task
    Add {
        /// Task text
        #[arg(required = true)]
        text: Vec<String>,

        /// Due date: YYYY-MM-DD, today or tomorrow
        #[arg(long)]
        date: Option<String>,

        /// Due time: HH:MM
        #[arg(long)]
        time: Option<String>,
    },

    /// Change a task's text or due date
    Edit {
        /// Task id or unique prefix
        id: String,

        /// New text (keeps the current text when omitted)
        text: Vec<String>,

        /// New due date: YYYY-MM-DD, today or tomorrow
        #[arg(long, conflicts_with = "clear_date")]
        date: Option<String>,

        /// New due time: HH:MM
        #[arg(long, conflicts_with = "clear_time")]
        time: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_date: bool,

        /// Remove the due time
        #[arg(long)]
        clear_time: bool,
    },

    /// Flip a task between active and completed
    #[command(visible_alias = "done")]
    Toggle {
        /// Task id or unique prefix
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task id or unique prefix
        id: String,
    },

    /// Show one task
    Show {
        /// Task id or unique prefix
        id: String,
    },

    /// List tasks, overdue first
    List {
        /// Which tasks to show
        #[arg(long, value_enum)]
        filter: Option<FilterMode>,
    },

    /// Print the count summary
    Count {
        /// Which count line to print
        #[arg(long, value_enum)]
        filter: Option<FilterMode>,
    },

    /// Interactive terminal view
    Ui {
        /// Initial filter
        #[arg(long, value_enum)]
        filter: Option<FilterMode>,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        let context = task::Context {
            store_dir: config.store_dir(self.store.as_deref()),
            config,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Add { text, date, time } => task::run_add(
                &context,
                task::AddOptions {
                    text: text.join(" "),
                    date,
                    time,
                },
            ),
            Commands::Edit {
                id,
                text,
                date,
                time,
                clear_date,
                clear_time,
            } => task::run_edit(
                &context,
                task::EditOptions {
                    id,
                    text: if text.is_empty() {
                        None
                    } else {
                        Some(text.join(" "))
                    },
                    date,
                    time,
                    clear_date,
                    clear_time,
                },
            ),
            Commands::Toggle { id } => task::run_toggle(&context, &id),
            Commands::Rm { id } => task::run_rm(&context, &id),
            Commands::Show { id } => task::run_show(&context, &id),
            Commands::List { filter } => task::run_list(&context, filter),
            Commands::Count { filter } => task::run_count(&context, filter),
            Commands::Ui { filter } => {
                let filter = filter.unwrap_or(context.config.display.default_filter);
                crate::ui::run(context.open_app()?.with_filter(filter), &context.config)
            }
        }
    }
}

/// An explicit config path must load cleanly; the default location is optional
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::load_or_default(None)),
    }
}
