//! Output for tickit CLI commands.
//!
//! Every command reports through one of two shapes:
//!
//! ```text
//! --json   {"schema_version": "tickit.v1", "command": "add", "status": "success", "data": {...}}
//!          {"schema_version": "tickit.v1", "command": "add", "status": "error", "error": {...}}
//! human    header line, aligned key/value summary, then "next:" hints
//! ```
//!
//! Human-mode warnings always go to stderr so stdout stays pipeable.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::task::MAX_TEXT_LEN;

pub const SCHEMA_VERSION: &str = "tickit.v1";

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Human-readable report built up by a command before it is printed
#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            warnings: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Success,
    Error,
}

#[derive(Serialize)]
struct Envelope<'a, B: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: Status,
    #[serde(flatten)]
    body: B,
    #[serde(skip_serializing_if = "is_empty")]
    warnings: &'a [String],
    #[serde(skip_serializing_if = "is_empty")]
    next_steps: &'a [String],
}

fn is_empty(items: &&[String]) -> bool {
    items.is_empty()
}

#[derive(Serialize)]
struct DataBody<'a, T: Serialize> {
    data: &'a T,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorPayload<'a>,
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    message: &'a str,
    code: i32,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

fn print_json<B: Serialize>(envelope: &Envelope<'_, B>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(())
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    let (warnings, next_steps) = match human {
        Some(human) => (human.warnings.as_slice(), human.next_steps.as_slice()),
        None => (&[][..], &[][..]),
    };

    if options.json {
        return print_json(&Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: Status::Success,
            body: DataBody { data },
            warnings,
            next_steps,
        });
    }

    for warning in warnings {
        eprintln!("warning: {warning}");
    }
    if options.quiet {
        return Ok(());
    }
    if let Some(human) = human {
        println!("{}", format_human(human));
    }
    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);

    if json {
        let message = err.to_string();
        return print_json(&Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: Status::Error,
            body: ErrorBody {
                error: ErrorPayload {
                    message: &message,
                    code: err.exit_code(),
                    kind: err.kind().as_str(),
                    details: err.details(),
                },
            },
            warnings: &[],
            next_steps: &next_steps,
        });
    }

    eprintln!("error: {err}");
    if let Some(hint) = next_steps.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

/// Header, then the summary with keys padded to one column, then hints.
///
/// Warnings are not included; they are written to stderr separately.
pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = vec![output.header.clone()];

    let width = output
        .summary
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);
    for (key, value) in &output.summary {
        let pad = " ".repeat(width - key.chars().count());
        lines.push(format!("  {key}:{pad} {value}").trim_end().to_string());
    }

    if !output.next_steps.is_empty() {
        lines.push(String::new());
        for step in &output.next_steps {
            lines.push(format!("next: {step}"));
        }
    }

    lines.join("\n")
}

/// First positional argument, used to label errors raised before dispatch
pub fn infer_command_name_from_args() -> String {
    std::env::args()
        .skip(1)
        .find(|arg| !arg.starts_with('-'))
        .unwrap_or_else(|| "tickit".to_string())
}

fn error_next_steps(err: &Error) -> Vec<String> {
    match err {
        Error::EmptyText | Error::TooLong { .. } => {
            vec![format!("use 1 to {MAX_TEXT_LEN} characters of task text")]
        }
        Error::TaskNotFound(_) => vec!["tickit list".to_string()],
        Error::AmbiguousId { prefix, .. } => {
            vec![format!("use more characters than '{prefix}' (see tickit list)")]
        }
        Error::InvalidConfig(_) => vec!["fix tickit.toml then retry".to_string()],
        Error::LockFailed(_) => vec!["retry when no other tickit process is running".to_string()],
        _ => Vec::new(),
    }
}
