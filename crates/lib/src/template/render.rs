//! Node tree -> output text.

use std::fmt;

use super::error::RenderError;
use super::{Expr, Func, Node};
use crate::lookup::AssetLookup;

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
  Str(String),
  Bool(bool),
}

impl Value {
  fn is_truthy(&self) -> bool {
    match self {
      Value::Str(s) => !s.is_empty(),
      Value::Bool(b) => *b,
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Str(s) => f.write_str(s),
      Value::Bool(b) => write!(f, "{b}"),
    }
  }
}

struct Renderer<'a, L: ?Sized> {
  page_base_name: &'a str,
  assets: &'a L,
}

pub(super) fn render<L: AssetLookup + ?Sized>(
  nodes: &[Node],
  page_base_name: &str,
  assets: &L,
) -> Result<String, RenderError> {
  let renderer = Renderer { page_base_name, assets };
  let mut out = String::new();
  renderer.render_nodes(nodes, &mut out)?;
  Ok(out)
}

impl<L: AssetLookup + ?Sized> Renderer<'_, L> {
  fn render_nodes(&self, nodes: &[Node], out: &mut String) -> Result<(), RenderError> {
    for node in nodes {
      match node {
        Node::Text(text) => out.push_str(text),
        Node::Output(expr) => {
          let value = self.eval(expr)?;
          escape_html_into(&value.to_string(), out);
        }
        Node::If { cond, then, otherwise } => {
          let branch = if self.eval(cond)?.is_truthy() { then } else { otherwise };
          self.render_nodes(branch, out)?;
        }
      }
    }
    Ok(())
  }

  fn eval(&self, expr: &Expr) -> Result<Value, RenderError> {
    let (func, args, line) = match expr {
      Expr::Literal(s) => return Ok(Value::Str(s.clone())),
      Expr::Call { func, args, line } => (*func, args, *line),
    };

    match func {
      Func::PageBaseName => {
        if !args.is_empty() {
          return Err(RenderError::Arity {
            line,
            function: func.name(),
            expected: "0",
            got: args.len(),
          });
        }
        Ok(Value::Str(self.page_base_name.to_string()))
      }
      Func::FileName | Func::FileExists => {
        if args.is_empty() {
          return Err(RenderError::Arity {
            line,
            function: func.name(),
            expected: "at least 1",
            got: 0,
          });
        }
        let parts = self.string_args(func, args, line)?;
        let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
        if func == Func::FileName {
          Ok(Value::Str(self.assets.resolve_name(&parts)))
        } else {
          Ok(Value::Bool(self.assets.exists(&parts)))
        }
      }
    }
  }

  fn string_args(&self, func: Func, args: &[Expr], line: usize) -> Result<Vec<String>, RenderError> {
    args
      .iter()
      .enumerate()
      .map(|(idx, arg)| match self.eval(arg)? {
        Value::Str(s) => Ok(s),
        Value::Bool(_) => Err(RenderError::ArgumentType {
          line,
          function: func.name(),
          position: idx + 1,
        }),
      })
      .collect()
  }
}

fn escape_html_into(text: &str, out: &mut String) {
  for ch in text.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&#34;"),
      '\'' => out.push_str("&#39;"),
      c => out.push(c),
    }
  }
}
