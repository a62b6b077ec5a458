//! Token: the formatted result of one keyword on one entry.

use std::fmt;

/// A `name=value` string, or empty when the keyword does not apply.
///
/// An empty token tells the caller to omit the keyword from the manifest
/// line; it is not an error.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Token(String);

impl Token {
    /// The empty token (keyword inapplicable to this entry).
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Format `keyword=value`.
    pub fn new(keyword: &str, value: impl fmt::Display) -> Self {
        Self(format!("{keyword}={value}"))
    }

    /// Join several tokens with single spaces, skipping empty ones.
    pub fn join(tokens: impl IntoIterator<Item = Token>) -> Self {
        let mut joined = String::new();
        for token in tokens.into_iter().filter(|t| !t.is_empty()) {
            if !joined.is_empty() {
                joined.push(' ');
            }
            joined.push_str(&token.0);
        }
        Self(joined)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The keyword part of a single `name=value` token.
    pub fn keyword(&self) -> Option<&str> {
        self.0.split_once('=').map(|(name, _)| name)
    }

    /// The value part of a single `name=value` token.
    pub fn value(&self) -> Option<&str> {
        self.0.split_once('=').map(|(_, value)| value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({:?})", self.0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_format() {
        let token = Token::new("size", 42);
        assert_eq!(token.as_str(), "size=42");
        assert_eq!(token.keyword(), Some("size"));
        assert_eq!(token.value(), Some("42"));
    }

    #[test]
    fn test_empty_token() {
        let token = Token::empty();
        assert!(token.is_empty());
        assert_eq!(token.keyword(), None);
        assert_eq!(token.to_string(), "");
    }

    #[test]
    fn test_join_skips_empty() {
        let joined = Token::join([Token::new("a", 1), Token::empty(), Token::new("b", 2)]);
        assert_eq!(joined.as_str(), "a=1 b=2");
        assert!(Token::join([Token::empty()]).is_empty());
    }

    #[test]
    fn test_value_keeps_later_equals() {
        let token = Token::new("link", "a=b");
        assert_eq!(token.value(), Some("a=b"));
    }
}
