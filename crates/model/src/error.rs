use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Duplicate element id: {0}")]
    DuplicateElement(String),

    #[error("Element '{element}' is bound to '{field}' but no value was supplied")]
    MissingField { element: String, field: String },

    #[error("Invalid element '{id}': {reason}")]
    InvalidElement { id: String, reason: String },
}
