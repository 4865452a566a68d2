use thiserror::Error;

/// Errors found while parsing a template document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
  #[error("line {line}: {message}")]
  Syntax { line: usize, message: String },

  #[error("line {line}: unclosed action, missing '}}}}'")]
  UnclosedAction { line: usize },

  #[error("line {line}: unclosed comment, missing '*/'")]
  UnclosedComment { line: usize },

  #[error("line {line}: function \"{name}\" not defined")]
  UnknownFunction { line: usize, name: String },

  #[error("line {line}: unexpected {{{{ {keyword} }}}}")]
  UnexpectedKeyword { line: usize, keyword: String },

  #[error("line {line}: {{{{ if }}}} is never closed by {{{{ end }}}}")]
  UnclosedIf { line: usize },
}

/// Errors raised while executing a parsed template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
  #[error("line {line}: {function} expects {expected} argument(s), got {got}")]
  Arity {
    line: usize,
    function: &'static str,
    expected: &'static str,
    got: usize,
  },

  #[error("line {line}: argument {position} of {function} must be a string")]
  ArgumentType {
    line: usize,
    function: &'static str,
    position: usize,
  },
}
