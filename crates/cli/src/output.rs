//! What pagekit prints.
//!
//! Results (hashes, written files, the watch event) go to stdout so scripts
//! can capture them. Warnings go to stderr next to the log lines.

use std::fmt::Display;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

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

/// Size of a rendered page or template. Pages never reach gigabytes.
pub fn format_size(bytes: u64) -> String {
  const UNITS: [&str; 2] = ["KiB", "MiB"];

  if bytes < 1024 {
    return format!("{bytes} B");
  }
  let mut size = bytes as f64 / 1024.0;
  let mut unit = 0;
  while size >= 1024.0 && unit + 1 < UNITS.len() {
    size /= 1024.0;
    unit += 1;
  }
  format!("{size:.1} {}", UNITS[unit])
}

/// Time spent in `watch`, which can block for hours between edits.
pub fn format_elapsed(elapsed: Duration) -> String {
  let secs = elapsed.as_secs();
  match secs {
    0 => format!("{}ms", elapsed.as_millis()),
    1..60 => format!("{:.1}s", elapsed.as_secs_f64()),
    60..3600 => format!("{}m{:02}s", secs / 60, secs % 60),
    _ => format!("{}h{:02}m", secs / 3600, (secs % 3600) / 60),
  }
}

fn wrote_message(path: &Path, bytes: Option<u64>) -> String {
  match bytes {
    Some(bytes) => format!("wrote {} ({})", path.display(), format_size(bytes)),
    None => format!("wrote {}", path.display()),
  }
}

fn kept_message(path: &Path) -> String {
  format!("{} already exists, not overwriting (use --force)", path.display())
}

fn event_message(event: &dyn Display, waited: Duration) -> String {
  format!("{event} (after {})", format_elapsed(waited))
}

/// A file pagekit created or replaced.
pub fn print_wrote(path: &Path, bytes: Option<u64>) {
  println!(
    "{} {}",
    "✓".if_supports_color(Stream::Stdout, |s| s.green()),
    wrote_message(path, bytes)
  );
}

/// An existing file left alone because `--force` was not given.
pub fn print_kept(path: &Path) {
  let message = kept_message(path);
  eprintln!(
    "{} {}",
    "⚠".if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

/// The change that ended a `watch`.
pub fn print_event(event: &dyn Display, waited: Duration) {
  println!(
    "{} {}",
    "•".if_supports_color(Stream::Stdout, |s| s.blue()),
    event_message(event, waited)
  );
}

pub fn print_detail(label: &str, value: &dyn Display) {
  println!("  {}: {value}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()));
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
  println!("{json}");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn small_pages_are_counted_in_bytes() {
    assert_eq!(format_size(0), "0 B");
    assert_eq!(format_size(742), "742 B");
  }

  #[test]
  fn larger_pages_use_binary_units() {
    assert_eq!(format_size(2048), "2.0 KiB");
    assert_eq!(format_size(3 * 1024 * 1024 + 512 * 1024), "3.5 MiB");
    assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5120.0 MiB");
  }

  #[test]
  fn elapsed_scales_with_wait() {
    assert_eq!(format_elapsed(Duration::from_millis(12)), "12ms");
    assert_eq!(format_elapsed(Duration::from_millis(2500)), "2.5s");
    assert_eq!(format_elapsed(Duration::from_secs(125)), "2m05s");
    assert_eq!(format_elapsed(Duration::from_secs(3 * 3600 + 7 * 60)), "3h07m");
  }

  #[test]
  fn wrote_message_mentions_size_when_known() {
    let path = Path::new("public/index.html");
    assert_eq!(wrote_message(path, Some(1536)), "wrote public/index.html (1.5 KiB)");
    assert_eq!(wrote_message(path, None), "wrote public/index.html");
  }

  #[test]
  fn kept_message_points_at_force() {
    assert_eq!(
      kept_message(Path::new("page.tmpl")),
      "page.tmpl already exists, not overwriting (use --force)"
    );
  }

  #[test]
  fn event_message_includes_wait() {
    let event = "Create(File) web/app.js";
    assert_eq!(
      event_message(&event, Duration::from_secs(61)),
      "Create(File) web/app.js (after 1m01s)"
    );
  }

  #[test]
  fn text_is_the_default_format() {
    assert!(OutputFormat::Json.is_json());
    assert!(!OutputFormat::default().is_json());
  }
}
