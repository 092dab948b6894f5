use thiserror::Error;

mod domain_types;
mod ids;
mod rich_text;

pub use domain_types::*;
pub use ids::*;
pub use rich_text::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid Notion token: {reason}")]
    InvalidToken { reason: String },
}
