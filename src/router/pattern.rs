//! Fragment pattern parsing and compilation.
//!
//! Patterns follow the application-router conventions used by the player:
//!
//! - `:name` matches one non-empty segment containing neither `/` nor `?`
//! - `*name` matches any run of characters except `?`, including `/`
//! - `( ... )` wraps an optional part
//! - everything else matches literally
//!
//! Every compiled pattern is anchored and accepts a trailing query string,
//! so `logout` matches both `logout` and `logout?next=home`.

use std::sync::Arc;

use regex::Regex;

use crate::table::RouteTableError;

/// Regex fragment for a `:name` segment.
const PARAM_RE: &str = "([^/?]+)";
/// Regex fragment for a `*name` splat.
const SPLAT_RE: &str = "([^?]*?)";
/// Trailing query capture appended to every pattern.
const QUERY_RE: &str = r"(?:\?([\s\S]*))?$";

/// One lexical element of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Param(String),
    Splat(String),
    Optional(Vec<Token>),
}

/// A pattern compiled to an anchored regex.
///
/// Capture groups `1..=param_names.len()` hold the parameters in declaration
/// order; the group after them holds the raw query string.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub regex: Regex,
    pub param_names: Vec<Arc<str>>,
}

fn current<'a>(
    tokens: &'a mut Vec<Token>,
    group: &'a mut Option<(usize, Vec<Token>)>,
) -> &'a mut Vec<Token> {
    match group.as_mut() {
        Some((_, inner)) => inner,
        None => tokens,
    }
}

fn flush(literal: &mut String, into: &mut Vec<Token>) {
    if !literal.is_empty() {
        into.push(Token::Literal(std::mem::take(literal)));
    }
}

/// Split a pattern into tokens, rejecting malformed groups and parameters.
pub fn parse_pattern(pattern: &str) -> Result<Vec<Token>, RouteTableError> {
    let mut tokens = Vec::new();
    let mut group: Option<(usize, Vec<Token>)> = None;
    let mut literal = String::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '(' => {
                if group.is_some() {
                    return Err(RouteTableError::UnbalancedGroup {
                        pattern: pattern.to_string(),
                        position: pos,
                    });
                }
                flush(&mut literal, &mut tokens);
                group = Some((pos, Vec::new()));
            }
            ')' => match group.take() {
                Some((_, mut inner)) => {
                    flush(&mut literal, &mut inner);
                    tokens.push(Token::Optional(inner));
                }
                None => {
                    return Err(RouteTableError::UnbalancedGroup {
                        pattern: pattern.to_string(),
                        position: pos,
                    })
                }
            },
            ':' | '*' => {
                flush(&mut literal, current(&mut tokens, &mut group));
                let mut name = String::new();
                while let Some(&(_, n)) = chars.peek() {
                    if n.is_ascii_alphanumeric() || n == '_' {
                        name.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    return Err(RouteTableError::EmptyParamName {
                        pattern: pattern.to_string(),
                        position: pos,
                    });
                }
                let token = if c == ':' {
                    Token::Param(name)
                } else {
                    Token::Splat(name)
                };
                current(&mut tokens, &mut group).push(token);
            }
            other => literal.push(other),
        }
    }

    if let Some((pos, _)) = group {
        return Err(RouteTableError::UnbalancedGroup {
            pattern: pattern.to_string(),
            position: pos,
        });
    }
    flush(&mut literal, &mut tokens);
    Ok(tokens)
}

/// Parameter names in the order their capture groups appear.
#[must_use]
pub fn param_names(tokens: &[Token]) -> Vec<String> {
    let mut names = Vec::new();
    collect_names(tokens, &mut names);
    names
}

fn collect_names(tokens: &[Token], names: &mut Vec<String>) {
    for token in tokens {
        match token {
            Token::Param(name) | Token::Splat(name) => names.push(name.clone()),
            Token::Optional(inner) => collect_names(inner, names),
            Token::Literal(_) => {}
        }
    }
}

fn push_regex(tokens: &[Token], out: &mut String) {
    for token in tokens {
        match token {
            Token::Literal(text) => out.push_str(&regex::escape(text)),
            Token::Param(_) => out.push_str(PARAM_RE),
            Token::Splat(_) => out.push_str(SPLAT_RE),
            Token::Optional(inner) => {
                out.push_str("(?:");
                push_regex(inner, out);
                out.push_str(")?");
            }
        }
    }
}

/// Build the regex source for a tokenized pattern.
#[must_use]
pub fn regex_source(tokens: &[Token]) -> String {
    let mut source = String::with_capacity(64);
    source.push('^');
    push_regex(tokens, &mut source);
    source.push_str(QUERY_RE);
    source
}

/// Parse and compile a pattern in one step.
pub fn compile_pattern(pattern: &str) -> Result<CompiledPattern, RouteTableError> {
    let tokens = parse_pattern(pattern)?;
    let regex = Regex::new(&regex_source(&tokens)).map_err(|e| RouteTableError::Compile {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    let param_names = param_names(&tokens)
        .into_iter()
        .map(|n| Arc::from(n.as_str()))
        .collect();
    Ok(CompiledPattern { regex, param_names })
}

/// Reduce a URL, hash or bare fragment to the fragment the router matches.
///
/// - `http://host/app#reset/abc` → `reset/abc`
/// - `http://host/logout?x=1` → `logout?x=1`
/// - `#logout`, `/logout` → `logout`
///
/// Exactly one leading `#` or `/` is removed, plus trailing whitespace.
#[must_use]
pub fn normalize_fragment(input: &str) -> String {
    let raw: String = if let Some((_, hash)) = input.split_once('#') {
        hash.to_string()
    } else if input.contains("://") {
        match url::Url::parse(input) {
            Ok(parsed) => match parsed.query() {
                Some(q) => format!("{}?{}", parsed.path(), q),
                None => parsed.path().to_string(),
            },
            Err(_) => input.to_string(),
        }
    } else {
        input.to_string()
    };

    let stripped = raw
        .strip_prefix('#')
        .or_else(|| raw.strip_prefix('/'))
        .unwrap_or(&raw);
    stripped.trim_end().to_string()
}
