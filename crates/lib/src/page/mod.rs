//! Render an HTML entry page against a fingerprint manifest.
//!
//! This module provides the core logic for the `page-tmpl` command:
//! - Export the built-in template so a project can customize it
//! - Build a manifest from the given asset files
//! - Render the chosen template with that manifest and write the page

mod templates;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::DEFAULT_PAGE_BASE_NAME;
use crate::manifest::{self, Manifest, ManifestError};
use crate::slug::split_extension;
use crate::template::{RenderError, Template, TemplateError};

pub use templates::DEFAULT_PAGE_TEMPLATE;

/// Errors that can occur while exporting or rendering a page template.
#[derive(Debug, Error)]
pub enum PageError {
  #[error("--out output file is required")]
  MissingOutput,

  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error("failed to read template {}: {source}", path.display())]
  ReadTemplate { path: PathBuf, source: io::Error },

  #[error("failed to check template file {}: {source}", path.display())]
  StatTemplate { path: PathBuf, source: io::Error },

  #[error("template {name}: {source}")]
  Template { name: String, source: TemplateError },

  #[error("failed to render template {name}: {source}")]
  Render { name: String, source: RenderError },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: io::Error },
}

/// Result of exporting the default template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
  Written,
  /// The file was already there and `force` was not set; nothing was written
  AlreadyExists,
}

/// Write [`DEFAULT_PAGE_TEMPLATE`] to `path`.
///
/// An existing file is left untouched unless `force` is set. That case is
/// not an error.
pub fn export_default_template(path: &Path, force: bool) -> Result<ExportOutcome, PageError> {
  if !force {
    match fs::metadata(path) {
      Ok(_) => {
        debug!(path = %path.display(), "template file already exists, not overwriting");
        return Ok(ExportOutcome::AlreadyExists);
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(e) => {
        return Err(PageError::StatTemplate {
          path: path.to_path_buf(),
          source: e,
        });
      }
    }
  }

  fs::write(path, DEFAULT_PAGE_TEMPLATE).map_err(|e| PageError::WriteFile {
    path: path.to_path_buf(),
    source: e,
  })?;
  info!(path = %path.display(), "wrote template file");
  Ok(ExportOutcome::Written)
}

/// Page base name for an optional input document.
///
/// `somepath/about.tmpl` becomes `about`; without an input document the page
/// is `index`.
pub fn page_base_name(input: Option<&Path>) -> String {
  let Some(input) = input else {
    return DEFAULT_PAGE_BASE_NAME.to_string();
  };
  let base = input
    .file_name()
    .map(|name| name.to_string_lossy())
    .unwrap_or_default();
  split_extension(&base).0.to_string()
}

/// Options for rendering a page.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
  /// Template document; the built-in default when `None`
  pub input: Option<PathBuf>,
  /// Where to write the rendered page
  pub output: Option<PathBuf>,
  /// Asset files the template can refer to
  pub files: Vec<PathBuf>,
}

/// Result of a successful render.
#[derive(Debug)]
pub struct RenderResult {
  pub output: PathBuf,
  pub page_base_name: String,
  pub manifest: Manifest,
  pub bytes_written: usize,
}

/// Render a page and write it to the output path.
///
/// # Errors
///
/// Returns an error if:
/// - No output path was given (checked before anything is read)
/// - An input file exists but cannot be inspected
/// - The template cannot be read, parsed, or rendered
/// - The output cannot be written
pub fn render_page(options: &RenderOptions) -> Result<RenderResult, PageError> {
  let output = options.output.clone().ok_or(PageError::MissingOutput)?;

  let manifest = manifest::build(&options.files)?;
  debug!(manifest = ?manifest, "manifest after reading inputs");

  let page_base_name = page_base_name(options.input.as_deref());
  let (name, source) = match &options.input {
    Some(path) => {
      let source = fs::read_to_string(path).map_err(|e| PageError::ReadTemplate {
        path: path.clone(),
        source: e,
      })?;
      (path.display().to_string(), source)
    }
    None => {
      info!("no --in template specified, using default");
      ("default".to_string(), DEFAULT_PAGE_TEMPLATE.to_string())
    }
  };

  let template = Template::parse(&source).map_err(|e| PageError::Template {
    name: name.clone(),
    source: e,
  })?;
  let rendered = template
    .render(&page_base_name, &manifest)
    .map_err(|e| PageError::Render { name, source: e })?;

  fs::write(&output, &rendered).map_err(|e| PageError::WriteFile {
    path: output.clone(),
    source: e,
  })?;
  info!(path = %output.display(), page = %page_base_name, "wrote page");

  Ok(RenderResult {
    output,
    page_base_name,
    manifest,
    bytes_written: rendered.len(),
  })
}
