use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of random bytes behind a freshly issued token.
pub const TOKEN_BYTES: usize = 8;

/// Shortest token accepted from a URL.
pub const TOKEN_MIN_LEN: usize = 6;

/// Longest token accepted from a URL.
pub const TOKEN_MAX_LEN: usize = 19;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TokenError {
    #[error("token length {0} is outside {TOKEN_MIN_LEN}..={TOKEN_MAX_LEN}")]
    Length(usize),

    #[error("token contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Anonymous respondent identifier carried in the form URL.
///
/// Tokens are not authenticated and not checked for uniqueness; eight random
/// bytes make collisions negligible for a single course.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Token(String);

impl Token {
    /// Issues a new random token (8 bytes, base64url without padding).
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Validates a token taken from a request path.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Length` when the token is shorter than 6 or longer
    /// than 19 characters, and `TokenError::InvalidCharacter` for anything
    /// outside the URL-safe base64 alphabet.
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        let len = raw.chars().count();
        if !(TOKEN_MIN_LEN..=TOKEN_MAX_LEN).contains(&len) {
            return Err(TokenError::Length(len));
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(TokenError::InvalidCharacter(bad));
        }
        Ok(Self(raw.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self.0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Token {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Token {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_is_eleven_url_safe_chars() {
        let token = Token::generate();
        assert_eq!(token.as_str().len(), 11);
        assert!(Token::parse(token.as_str()).is_ok());
    }

    #[test]
    fn generated_tokens_differ() {
        assert_ne!(Token::generate(), Token::generate());
    }

    #[test]
    fn rejects_short_and_long_tokens() {
        assert_eq!(Token::parse("abcde"), Err(TokenError::Length(5)));
        assert_eq!(Token::parse(""), Err(TokenError::Length(0)));
        let long = "a".repeat(20);
        assert_eq!(Token::parse(&long), Err(TokenError::Length(20)));
    }

    #[test]
    fn accepts_length_bounds() {
        assert!(Token::parse("abcdef").is_ok());
        assert!(Token::parse(&"A".repeat(19)).is_ok());
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        assert_eq!(
            Token::parse("abc/def"),
            Err(TokenError::InvalidCharacter('/'))
        );
        assert!(Token::parse("abc def").is_err());
        assert!(Token::parse("abc_de-f").is_ok());
    }

    #[test]
    fn display_is_raw_value() {
        let token: Token = "qwerty12".parse().unwrap();
        assert_eq!(token.to_string(), "qwerty12");
        assert_eq!(format!("{token:?}"), "Token(qwerty12)");
    }
}
