//! Template source -> node tree.
//!
//! Parsing happens in three passes: split the source into text and action
//! items (applying trim markers and dropping comments), tokenize each action,
//! then fold the actions into a tree of `if` blocks.

use super::error::TemplateError;
use super::{Expr, Func, Node};

#[derive(Debug, PartialEq, Eq)]
enum Item<'a> {
  Text(&'a str),
  Action { content: &'a str, line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
  Ident(String),
  Str(String),
  LParen,
  RParen,
}

pub(super) fn parse(source: &str) -> Result<Vec<Node>, TemplateError> {
  let items = split(source)?;
  build_tree(items)
}

fn is_space(c: char) -> bool {
  matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn trim_start_space(s: &str) -> &str {
  s.trim_start_matches(is_space)
}

fn trim_end_space(s: &str) -> &str {
  s.trim_end_matches(is_space)
}

fn line_at(source: &str, offset: usize) -> usize {
  source[..offset].matches('\n').count() + 1
}

/// `-` followed by whitespace right after `{{`.
fn has_left_trim(after_open: &str) -> bool {
  after_open
    .strip_prefix('-')
    .and_then(|rest| rest.chars().next())
    .is_some_and(is_space)
}

fn split(source: &str) -> Result<Vec<Item<'_>>, TemplateError> {
  let mut items = Vec::new();
  let mut offset = 0;
  let mut trim_next = false;

  loop {
    let rest = &source[offset..];
    let Some(open) = rest.find("{{") else {
      let text = if trim_next { trim_start_space(rest) } else { rest };
      if !text.is_empty() {
        items.push(Item::Text(text));
      }
      break;
    };

    let line = line_at(source, offset + open);
    let after_open = &rest[open + 2..];
    let left_trim = has_left_trim(after_open);

    let mut text = &rest[..open];
    if trim_next {
      text = trim_start_space(text);
    }
    if left_trim {
      text = trim_end_space(text);
    }
    if !text.is_empty() {
      items.push(Item::Text(text));
    }

    let body_start = if left_trim { 1 } else { 0 };
    let scanned = scan_action(&after_open[body_start..], line)?;
    if let Some(content) = scanned.content {
      items.push(Item::Action { content, line });
    }
    trim_next = scanned.right_trim;
    offset += open + 2 + body_start + scanned.consumed;
  }

  Ok(items)
}

struct Scanned<'a> {
  /// Action text between the delimiters; `None` for comments
  content: Option<&'a str>,
  /// Bytes of `body` up to and including the closing `}}`
  consumed: usize,
  right_trim: bool,
}

fn scan_action(body: &str, line: usize) -> Result<Scanned<'_>, TemplateError> {
  let lead = body.len() - trim_start_space(body).len();
  if body[lead..].starts_with("/*") {
    return scan_comment(body, lead, line);
  }

  let mut in_string = false;
  let mut escaped = false;
  for (idx, ch) in body.char_indices() {
    if in_string {
      if escaped {
        escaped = false;
      } else if ch == '\\' {
        escaped = true;
      } else if ch == '"' {
        in_string = false;
      }
      continue;
    }
    match ch {
      '"' => in_string = true,
      '}' if body[idx..].starts_with("}}") => {
        let mut content = &body[..idx];
        let mut right_trim = false;
        if let Some(stripped) = content.strip_suffix('-')
          && stripped.ends_with(is_space)
        {
          content = stripped;
          right_trim = true;
        }
        return Ok(Scanned {
          content: Some(content),
          consumed: idx + 2,
          right_trim,
        });
      }
      _ => {}
    }
  }

  Err(TemplateError::UnclosedAction { line })
}

fn scan_comment(body: &str, lead: usize, line: usize) -> Result<Scanned<'_>, TemplateError> {
  let comment_start = lead + 2;
  let close = body[comment_start..]
    .find("*/")
    .ok_or(TemplateError::UnclosedComment { line })?;
  let after = comment_start + close + 2;
  let tail = &body[after..];

  if tail.starts_with("}}") {
    return Ok(Scanned {
      content: None,
      consumed: after + 2,
      right_trim: false,
    });
  }

  let trimmed = trim_start_space(tail);
  let gap = tail.len() - trimmed.len();
  if gap > 0 && trimmed.starts_with("-}}") {
    return Ok(Scanned {
      content: None,
      consumed: after + gap + 3,
      right_trim: true,
    });
  }

  Err(TemplateError::Syntax {
    line,
    message: "comment must be followed directly by '}}'".to_string(),
  })
}

fn tokenize(content: &str, line: usize) -> Result<Vec<Token>, TemplateError> {
  let mut tokens = Vec::new();
  let mut chars = content.chars().peekable();

  while let Some(ch) = chars.next() {
    match ch {
      c if is_space(c) => {}
      '(' => tokens.push(Token::LParen),
      ')' => tokens.push(Token::RParen),
      '"' => {
        let mut value = String::new();
        let mut closed = false;
        while let Some(c) = chars.next() {
          match c {
            '"' => {
              closed = true;
              break;
            }
            '\\' => match chars.next() {
              Some('"') => value.push('"'),
              Some('\\') => value.push('\\'),
              Some('n') => value.push('\n'),
              Some('t') => value.push('\t'),
              Some(other) => {
                return Err(TemplateError::Syntax {
                  line,
                  message: format!("unknown escape sequence '\\{other}'"),
                });
              }
              None => break,
            },
            other => value.push(other),
          }
        }
        if !closed {
          return Err(TemplateError::Syntax {
            line,
            message: "unterminated string literal".to_string(),
          });
        }
        tokens.push(Token::Str(value));
      }
      c if c.is_alphabetic() || c == '_' => {
        let mut ident = String::from(c);
        while let Some(&next) = chars.peek() {
          if next.is_alphanumeric() || next == '_' {
            ident.push(next);
            chars.next();
          } else {
            break;
          }
        }
        tokens.push(Token::Ident(ident));
      }
      other => {
        return Err(TemplateError::Syntax {
          line,
          message: format!("unexpected character '{other}' in action"),
        });
      }
    }
  }

  Ok(tokens)
}

const KEYWORDS: [&str; 3] = ["if", "else", "end"];

struct ExprParser<'a> {
  tokens: &'a [Token],
  pos: usize,
  line: usize,
}

impl<'a> ExprParser<'a> {
  fn new(tokens: &'a [Token], line: usize) -> Self {
    Self { tokens, pos: 0, line }
  }

  fn peek(&self) -> Option<&'a Token> {
    self.tokens.get(self.pos)
  }

  fn at_end(&self) -> bool {
    self.pos >= self.tokens.len()
  }

  fn syntax(&self, message: impl Into<String>) -> TemplateError {
    TemplateError::Syntax {
      line: self.line,
      message: message.into(),
    }
  }

  fn func(&self, name: &str) -> Result<Func, TemplateError> {
    if KEYWORDS.contains(&name) {
      return Err(TemplateError::UnexpectedKeyword {
        line: self.line,
        keyword: name.to_string(),
      });
    }
    Func::from_name(name).ok_or_else(|| TemplateError::UnknownFunction {
      line: self.line,
      name: name.to_string(),
    })
  }

  /// Parse a whole action expression; every token must be consumed.
  fn parse_all(mut self) -> Result<Expr, TemplateError> {
    if self.at_end() {
      return Err(self.syntax("missing value for command"));
    }
    let expr = self.command()?;
    if !self.at_end() {
      return Err(self.syntax("unexpected ')' in command"));
    }
    Ok(expr)
  }

  /// `Name operand*` or a single operand.
  fn command(&mut self) -> Result<Expr, TemplateError> {
    let Some(Token::Ident(name)) = self.peek() else {
      let operand = self.operand()?;
      if matches!(self.peek(), Some(Token::Str(_) | Token::Ident(_) | Token::LParen)) {
        return Err(self.syntax("can't give argument to non-function"));
      }
      return Ok(operand);
    };

    let func = self.func(name)?;
    self.pos += 1;
    let mut args = Vec::new();
    while matches!(self.peek(), Some(Token::Str(_) | Token::Ident(_) | Token::LParen)) {
      args.push(self.operand()?);
    }
    Ok(Expr::Call {
      func,
      args,
      line: self.line,
    })
  }

  /// String literal, bare function name, or parenthesized command.
  fn operand(&mut self) -> Result<Expr, TemplateError> {
    match self.peek() {
      Some(Token::Str(value)) => {
        self.pos += 1;
        Ok(Expr::Literal(value.clone()))
      }
      Some(Token::Ident(name)) => {
        let func = self.func(name)?;
        self.pos += 1;
        Ok(Expr::Call {
          func,
          args: Vec::new(),
          line: self.line,
        })
      }
      Some(Token::LParen) => {
        self.pos += 1;
        if matches!(self.peek(), Some(Token::RParen) | None) {
          return Err(self.syntax("missing value in parenthesized command"));
        }
        let inner = self.command()?;
        match self.peek() {
          Some(Token::RParen) => {
            self.pos += 1;
            Ok(inner)
          }
          _ => Err(self.syntax("unclosed left paren")),
        }
      }
      Some(Token::RParen) => Err(self.syntax("unexpected right paren")),
      None => Err(self.syntax("missing value for command")),
    }
  }
}

/// An `if` block still collecting its branches.
struct OpenIf {
  cond: Expr,
  then: Vec<Node>,
  otherwise: Option<Vec<Node>>,
  line: usize,
}

impl OpenIf {
  fn target(&mut self) -> &mut Vec<Node> {
    match self.otherwise {
      Some(ref mut otherwise) => otherwise,
      None => &mut self.then,
    }
  }
}

fn build_tree(items: Vec<Item<'_>>) -> Result<Vec<Node>, TemplateError> {
  let mut root = Vec::new();
  let mut stack: Vec<OpenIf> = Vec::new();

  for item in items {
    let node = match item {
      Item::Text(text) => Node::Text(text.to_string()),
      Item::Action { content, line } => {
        let tokens = tokenize(content, line)?;
        match tokens.first() {
          Some(Token::Ident(word)) if word == "if" => {
            let cond = ExprParser::new(&tokens[1..], line).parse_all()?;
            stack.push(OpenIf {
              cond,
              then: Vec::new(),
              otherwise: None,
              line,
            });
            continue;
          }
          Some(Token::Ident(word)) if word == "else" => {
            if tokens.len() > 1 {
              return Err(TemplateError::Syntax {
                line,
                message: "unexpected arguments after else".to_string(),
              });
            }
            match stack.last_mut() {
              Some(open) if open.otherwise.is_none() => open.otherwise = Some(Vec::new()),
              _ => {
                return Err(TemplateError::UnexpectedKeyword {
                  line,
                  keyword: "else".to_string(),
                });
              }
            }
            continue;
          }
          Some(Token::Ident(word)) if word == "end" => {
            if tokens.len() > 1 {
              return Err(TemplateError::Syntax {
                line,
                message: "unexpected arguments after end".to_string(),
              });
            }
            let open = stack.pop().ok_or_else(|| TemplateError::UnexpectedKeyword {
              line,
              keyword: "end".to_string(),
            })?;
            Node::If {
              cond: open.cond,
              then: open.then,
              otherwise: open.otherwise.unwrap_or_default(),
            }
          }
          _ => Node::Output(ExprParser::new(&tokens, line).parse_all()?),
        }
      }
    };

    match stack.last_mut() {
      Some(open) => open.target().push(node),
      None => root.push(node),
    }
  }

  if let Some(open) = stack.pop() {
    return Err(TemplateError::UnclosedIf { line: open.line });
  }

  Ok(root)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn call(func: Func, args: Vec<Expr>, line: usize) -> Expr {
    Expr::Call { func, args, line }
  }

  fn lit(s: &str) -> Expr {
    Expr::Literal(s.to_string())
  }

  #[test]
  fn plain_text_is_one_node() {
    assert_eq!(parse("<p>hi</p>").unwrap(), vec![Node::Text("<p>hi</p>".to_string())]);
  }

  #[test]
  fn empty_source_has_no_nodes() {
    assert!(parse("").unwrap().is_empty());
  }

  #[test]
  fn call_with_literal_args() {
    let nodes = parse(r#"a{{ FileName "app" ".css" }}b"#).unwrap();
    assert_eq!(
      nodes,
      vec![
        Node::Text("a".to_string()),
        Node::Output(call(Func::FileName, vec![lit("app"), lit(".css")], 1)),
        Node::Text("b".to_string()),
      ]
    );
  }

  #[test]
  fn bare_function_argument_is_zero_arg_call() {
    let nodes = parse(r#"{{FileName PageBaseName ".js"}}"#).unwrap();
    assert_eq!(
      nodes,
      vec![Node::Output(call(
        Func::FileName,
        vec![call(Func::PageBaseName, vec![], 1), lit(".js")],
        1
      ))]
    );
  }

  #[test]
  fn parenthesized_argument() {
    let nodes = parse(r#"{{ FileExists (FileName "a.css") }}"#).unwrap();
    assert_eq!(
      nodes,
      vec![Node::Output(call(
        Func::FileExists,
        vec![call(Func::FileName, vec![lit("a.css")], 1)],
        1
      ))]
    );
  }

  #[test]
  fn literal_action() {
    assert_eq!(parse(r#"{{ "x\"y" }}"#).unwrap(), vec![Node::Output(lit("x\"y"))]);
  }

  #[test]
  fn if_else_end() {
    let nodes = parse(r#"{{ if FileExists "a.css" }}yes{{ else }}no{{ end }}"#).unwrap();
    assert_eq!(
      nodes,
      vec![Node::If {
        cond: call(Func::FileExists, vec![lit("a.css")], 1),
        then: vec![Node::Text("yes".to_string())],
        otherwise: vec![Node::Text("no".to_string())],
      }]
    );
  }

  #[test]
  fn nested_if() {
    let nodes = parse("{{if PageBaseName}}{{if FileExists \"x\"}}x{{end}}{{end}}").unwrap();
    let Node::If { then, otherwise, .. } = &nodes[0] else {
      panic!("expected if node");
    };
    assert!(otherwise.is_empty());
    assert!(matches!(then[0], Node::If { .. }));
  }

  #[test]
  fn trim_markers_remove_adjacent_whitespace() {
    let nodes = parse("a  \n {{- PageBaseName -}} \n\t b").unwrap();
    assert_eq!(
      nodes,
      vec![
        Node::Text("a".to_string()),
        Node::Output(call(Func::PageBaseName, vec![], 2)),
        Node::Text("b".to_string()),
      ]
    );
  }

  #[test]
  fn dash_without_space_is_not_a_trim_marker() {
    let err = parse("{{-PageBaseName}}").unwrap_err();
    assert!(matches!(err, TemplateError::Syntax { .. }));
  }

  #[test]
  fn comments_are_dropped() {
    let nodes = parse("a {{/* note */}} b {{- /* trimmed */ -}} c").unwrap();
    assert_eq!(
      nodes,
      vec![Node::Text("a ".to_string()), Node::Text(" b".to_string()), Node::Text("c".to_string())]
    );
  }

  #[test]
  fn braces_inside_strings_do_not_close_action() {
    let nodes = parse(r#"{{ FileName "odd}}name" }}"#).unwrap();
    assert_eq!(nodes, vec![Node::Output(call(Func::FileName, vec![lit("odd}}name")], 1))]);
  }

  #[test]
  fn line_numbers_are_tracked() {
    let err = parse("line one\nline two\n{{ Nope }}").unwrap_err();
    assert_eq!(
      err,
      TemplateError::UnknownFunction {
        line: 3,
        name: "Nope".to_string()
      }
    );
  }

  #[test]
  fn unknown_function_in_argument() {
    let err = parse(r#"{{ FileName Missing ".css" }}"#).unwrap_err();
    assert!(matches!(err, TemplateError::UnknownFunction { ref name, .. } if name == "Missing"));
  }

  #[test]
  fn unclosed_action() {
    assert_eq!(parse("abc {{ PageBaseName").unwrap_err(), TemplateError::UnclosedAction { line: 1 });
  }

  #[test]
  fn unclosed_comment() {
    assert_eq!(parse("{{/* never").unwrap_err(), TemplateError::UnclosedComment { line: 1 });
  }

  #[test]
  fn unclosed_if() {
    assert_eq!(
      parse("\n{{ if PageBaseName }}x").unwrap_err(),
      TemplateError::UnclosedIf { line: 2 }
    );
  }

  #[test]
  fn stray_end_and_else() {
    assert!(matches!(
      parse("{{ end }}").unwrap_err(),
      TemplateError::UnexpectedKeyword { ref keyword, .. } if keyword == "end"
    ));
    assert!(matches!(
      parse("{{ else }}").unwrap_err(),
      TemplateError::UnexpectedKeyword { ref keyword, .. } if keyword == "else"
    ));
    assert!(matches!(
      parse("{{ if PageBaseName }}{{ else }}{{ else }}{{ end }}").unwrap_err(),
      TemplateError::UnexpectedKeyword { .. }
    ));
  }

  #[test]
  fn empty_action_is_an_error() {
    assert!(matches!(parse("{{ }}").unwrap_err(), TemplateError::Syntax { .. }));
    assert!(matches!(parse("{{ if }}{{ end }}").unwrap_err(), TemplateError::Syntax { .. }));
  }

  #[test]
  fn unterminated_string() {
    assert!(matches!(
      parse("{{ FileName \"abc }}").unwrap_err(),
      TemplateError::UnclosedAction { .. }
    ));
  }

  #[test]
  fn unbalanced_parens() {
    assert!(matches!(
      parse(r#"{{ FileName ("a" }}"#).unwrap_err(),
      TemplateError::Syntax { .. }
    ));
    assert!(matches!(
      parse(r#"{{ FileName "a") }}"#).unwrap_err(),
      TemplateError::Syntax { .. }
    ));
  }

  #[test]
  fn literal_cannot_take_arguments() {
    assert!(matches!(parse(r#"{{ "a" "b" }}"#).unwrap_err(), TemplateError::Syntax { .. }));
  }
}
