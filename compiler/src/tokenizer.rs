use regex::Regex;
use lazy_static::lazy_static;
use crate::utils::{quote, syntax_error};
use crate::error::CompileError;

lazy_static! {
    pub static ref TOKEN_REGEX:   Regex = Regex::new(r#"("[^"\n]*"|[=;{}]|\[\]|[A-Za-z0-9_.\-]+|//[^\n]*|\s+)"#).unwrap();
    pub static ref WHITESPACE_RX: Regex = Regex::new(r"^(//.*|\s+)$").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text:   String,
    pub line:   usize,
    pub column: usize,
}

impl Token {
    /// Column just past the last character of this token.
    pub fn end_column(&self) -> usize {
        self.column + self.text.len()
    }
}

/// Splits schema source into tokens, dropping whitespace and `//` comments.
/// Any character that cannot start a token is a syntax error on its line.
pub fn tokenize_schema(text: &str) -> Result<Vec<Token>, CompileError> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut column = 1;
    let mut last_end = 0;

    for mat in TOKEN_REGEX.find_iter(text) {
        let start = mat.start();
        let end   = mat.end();
        let part  = mat.as_str();

        if start > last_end {
            let unexpected = &text[last_end..start];
            return Err(syntax_error(
                &format!("unexpected {}", quote(unexpected)),
                line,
                column,
            ));
        }

        if !WHITESPACE_RX.is_match(part) {
            tokens.push(Token {
                text: part.to_string(),
                line,
                column,
            });
        }

        let newline_count = part.matches('\n').count();
        if newline_count > 0 {
            line += newline_count;
            if let Some(last_line_part) = part.split('\n').last() {
                column = last_line_part.len() + 1;
            }
        } else {
            column += part.len();
        }

        last_end = end;
    }

    if last_end != text.len() {
        let unexpected = &text[last_end..];
        return Err(syntax_error(
            &format!("unexpected {}", quote(unexpected)),
            line,
            column,
        ));
    }

    Ok(tokens)
}
