//! Terminal output for the `sitepub` commands.
//!
//! Results go to stdout (text or JSON); warnings and failures go to stderr so
//! `-o json` output stays machine-readable. Colour is only applied when the
//! target stream supports it.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use sitepub_lib::publish::PublishError;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const CAUSE: &str = "→";
}

/// Leading hex digits of a digest, enough to tell publishes apart.
pub fn short_digest(digest: &str) -> &str {
  digest.get(..12).unwrap_or(digest)
}

pub fn format_bytes(bytes: u64) -> String {
  const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

  if bytes < 1024 {
    return format!("{} B", bytes);
  }
  let mut value = bytes as f64 / 1024.0;
  let mut unit = 0;
  while value >= 1024.0 && unit < UNITS.len() - 1 {
    value /= 1024.0;
    unit += 1;
  }
  format!("{:.1} {}", value, UNITS[unit])
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  match secs {
    0 => format!("{}ms", duration.subsec_millis()),
    1..60 => format!("{:.2}s", duration.as_secs_f64()),
    _ => format!("{}m {}s", secs / 60, secs % 60),
  }
}

pub fn presence(exists: bool) -> &'static str {
  if exists { "(exists)" } else { "(missing)" }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Print a command failure and its causes to stderr.
pub fn report_error(err: &anyhow::Error) {
  let lines = error_lines(err);
  if let Some((headline, causes)) = lines.split_first() {
    print_error(headline);
    for cause in causes {
      eprintln!(
        "  {} {}",
        symbols::CAUSE.if_supports_color(Stream::Stderr, |s| s.dimmed()),
        cause
      );
    }
  }
}

/// Headline plus one line per cause. Publish failures are prefixed with their
/// failure kind. A cause already quoted at the end of the line above is
/// dropped.
fn error_lines(err: &anyhow::Error) -> Vec<String> {
  let kind = err
    .chain()
    .find_map(|e| e.downcast_ref::<PublishError>())
    .map(PublishError::kind);

  let mut lines: Vec<String> = Vec::new();
  for cause in err.chain() {
    let text = cause.to_string();
    if lines.last().is_some_and(|prev| prev.ends_with(&text)) {
      continue;
    }
    lines.push(text);
  }

  if let (Some(kind), Some(headline)) = (kind, lines.first_mut()) {
    *headline = format!("{}: {}", kind, headline);
  }
  lines
}
