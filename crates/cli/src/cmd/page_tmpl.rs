//! Implementation of the `pagekit page-tmpl` command.
//!
//! Either exports the built-in template (`--tmpl-out`) or renders a page
//! from a template and a set of fingerprinted asset files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use pagekit_lib::page::{ExportOutcome, RenderOptions, export_default_template, render_page};

use crate::output::{print_detail, print_kept, print_wrote};

pub fn cmd_page_tmpl(
  input: Option<PathBuf>,
  out: Option<PathBuf>,
  tmpl_out: Option<PathBuf>,
  force: bool,
  files: Vec<PathBuf>,
) -> Result<()> {
  if let Some(path) = tmpl_out {
    return export_template(&path, force);
  }

  let result = render_page(&RenderOptions {
    input,
    output: out,
    files,
  })
  .context("Failed to render page template")?;

  print_wrote(&result.output, Some(result.bytes_written as u64));
  print_detail("page", &result.page_base_name);
  print_detail("assets", &result.manifest.len());

  Ok(())
}

fn export_template(path: &Path, force: bool) -> Result<()> {
  let outcome = export_default_template(path, force)
    .with_context(|| format!("Failed to write template file {}", path.display()))?;

  match outcome {
    ExportOutcome::Written => print_wrote(path, None),
    ExportOutcome::AlreadyExists => print_kept(path),
  }

  Ok(())
}
