//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use std::fmt;

/// Integration token for Notion API authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct NotionToken(String);

impl NotionToken {
    /// Create a new token with validation
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into().trim().to_string();

        if token.is_empty() {
            return Err(ValidationError::InvalidToken {
                reason: "token cannot be empty".to_string(),
            });
        }

        if token.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidToken {
                reason: "token must not contain whitespace".to_string(),
            });
        }

        if !token.starts_with("secret_") && !token.starts_with("ntn_") {
            log::warn!("Notion token does not start with 'secret_' or 'ntn_'; using it anyway");
        }

        Ok(Self(token))
    }

    /// Get the token as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible: String = self.0.chars().take(4).collect();
        write!(f, "{}...", visible)
    }
}

impl fmt::Debug for NotionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NotionToken({})", self)
    }
}

/// Title for a newly created page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTitle(String);

impl PageTitle {
    pub fn new(title: impl Into<String>) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_trimmed_and_redacted() {
        let token = NotionToken::new("  secret_abcdefghijklmnop \n").unwrap();
        assert_eq!(token.as_str(), "secret_abcdefghijklmnop");
        assert_eq!(token.to_string(), "secr...");
        assert!(!format!("{:?}", token).contains("abcdefghijklmnop"));
    }

    #[test]
    fn token_rejects_empty_and_spaced_values() {
        assert!(NotionToken::new("").is_err());
        assert!(NotionToken::new("   ").is_err());
        assert!(NotionToken::new("ntn_abc def").is_err());
    }

    #[test]
    fn title_must_have_content() {
        assert_eq!(
            PageTitle::new(" ").unwrap_err(),
            ValidationError::EmptyField("title")
        );
        assert_eq!(PageTitle::new("Release notes").unwrap().as_str(), "Release notes");
    }
}
