//! Page template parsing and rendering.
//!
//! Templates are plain text with `{{ ... }}` actions. The only names a
//! template can call are the page bindings:
//!
//! - `{{ PageBaseName }}` - name of the page being rendered, e.g. `index`
//! - `{{ FileName "app" ".css" }}` - fingerprinted file for the joined key, or empty
//! - `{{ FileExists "app.css" }}` - whether the joined key is known
//!
//! Arguments are string literals, bare function names (called with no
//! arguments), or parenthesized calls, so `{{ FileName PageBaseName ".js" }}`
//! resolves the script belonging to the current page.
//!
//! # Control Flow
//!
//! `{{ if expr }} ... {{ else }} ... {{ end }}` renders one branch. `false`
//! and the empty string are false; anything else is true.
//!
//! # Whitespace and Comments
//!
//! `{{- ` trims whitespace before the action and ` -}}` trims whitespace
//! after it. `{{/* ... */}}` is a comment.
//!
//! # Example
//!
//! ```
//! use pagekit_lib::lookup::AssetLookup;
//! use pagekit_lib::template::Template;
//!
//! struct OneFile;
//!
//! impl AssetLookup for OneFile {
//!   fn resolve_name(&self, parts: &[&str]) -> String {
//!     if parts.concat() == "index.js" { "index-cafe1234.js".into() } else { String::new() }
//!   }
//!   fn exists(&self, parts: &[&str]) -> bool {
//!     parts.concat() == "index.js"
//!   }
//! }
//!
//! let tmpl = Template::parse(r#"{{ if FileExists PageBaseName ".js" }}<script src="{{ FileName PageBaseName ".js" }}"></script>{{ end }}"#).unwrap();
//! assert_eq!(tmpl.render("index", &OneFile).unwrap(), r#"<script src="index-cafe1234.js"></script>"#);
//! ```
//!
//! Output of every action is HTML-escaped.

mod error;
mod parse;
mod render;

pub use error::{RenderError, TemplateError};

use crate::lookup::AssetLookup;

/// A function a template may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Func {
  PageBaseName,
  FileName,
  FileExists,
}

impl Func {
  pub(crate) fn from_name(name: &str) -> Option<Self> {
    match name {
      "PageBaseName" => Some(Func::PageBaseName),
      "FileName" => Some(Func::FileName),
      "FileExists" => Some(Func::FileExists),
      _ => None,
    }
  }

  pub(crate) fn name(self) -> &'static str {
    match self {
      Func::PageBaseName => "PageBaseName",
      Func::FileName => "FileName",
      Func::FileExists => "FileExists",
    }
  }
}

/// An expression inside an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Expr {
  Literal(String),
  Call { func: Func, args: Vec<Expr>, line: usize },
}

/// A node of the parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
  Text(String),
  Output(Expr),
  If {
    cond: Expr,
    then: Vec<Node>,
    otherwise: Vec<Node>,
  },
}

/// A parsed template, ready to render any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
  nodes: Vec<Node>,
}

impl Template {
  /// Parse template source.
  ///
  /// # Errors
  ///
  /// Returns a [`TemplateError`] for malformed actions, unbalanced
  /// `if`/`else`/`end`, or calls to names that are not bound.
  pub fn parse(source: &str) -> Result<Self, TemplateError> {
    Ok(Self {
      nodes: parse::parse(source)?,
    })
  }

  /// Render the template for `page_base_name`, resolving files through `assets`.
  ///
  /// # Errors
  ///
  /// Returns a [`RenderError`] if a function is called with the wrong number
  /// or type of arguments.
  pub fn render(&self, page_base_name: &str, assets: &impl AssetLookup) -> Result<String, RenderError> {
    render::render(&self.nodes, page_base_name, assets)
  }
}
