use std::fmt;

/// Route table validation error
///
/// Returned by [`RouteTable::new`](super::RouteTable::new) when the declared
/// routes cannot form a consistent table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTableError {
    /// Two entries share the same pattern text
    DuplicatePattern {
        pattern: String,
        first: usize,
        second: usize,
    },
    /// Handler name is empty or not an identifier
    InvalidHandlerName { pattern: String, handler: String },
    /// A parameter name appears twice in one pattern
    DuplicateParam { pattern: String, param: String },
    /// `:` or `*` not followed by a parameter name
    EmptyParamName { pattern: String, position: usize },
    /// Optional group parentheses do not balance, or are nested
    UnbalancedGroup { pattern: String, position: usize },
    /// Pattern begins with `/` or `#`, which are stripped from every fragment
    LeadingSeparator { pattern: String },
    /// The generated matcher failed to compile
    Compile { pattern: String, message: String },
}

impl fmt::Display for RouteTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteTableError::DuplicatePattern {
                pattern,
                first,
                second,
            } => write!(
                f,
                "route table error: pattern '{}' declared twice (entries {} and {})",
                pattern, first, second
            ),
            RouteTableError::InvalidHandlerName { pattern, handler } => write!(
                f,
                "route table error: handler name '{}' for pattern '{}' is not a valid identifier",
                handler, pattern
            ),
            RouteTableError::DuplicateParam { pattern, param } => write!(
                f,
                "route table error: parameter '{}' appears more than once in '{}'",
                param, pattern
            ),
            RouteTableError::EmptyParamName { pattern, position } => write!(
                f,
                "route table error: missing parameter name at byte {} of '{}'",
                position, pattern
            ),
            RouteTableError::UnbalancedGroup { pattern, position } => write!(
                f,
                "route table error: unbalanced or nested optional group at byte {} of '{}'",
                position, pattern
            ),
            RouteTableError::LeadingSeparator { pattern } => write!(
                f,
                "route table error: pattern '{}' starts with '/' or '#' and can never match",
                pattern
            ),
            RouteTableError::Compile { pattern, message } => write!(
                f,
                "route table error: pattern '{}' failed to compile: {}",
                pattern, message
            ),
        }
    }
}

impl std::error::Error for RouteTableError {}
