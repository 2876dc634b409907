use placard_model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF generation error: {0}")]
    Pdf(String),
    #[error("Element '{element}' is bound to '{field}' but no value was supplied")]
    MissingField { element: String, field: String },
    #[error("Invalid layout: {0}")]
    Layout(String),
    #[error("Vector markup error: {0}")]
    Markup(String),
    #[error("Graphics state stack underflow")]
    StateUnderflow,
    #[error("Other rendering error: {0}")]
    Other(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}

impl From<ModelError> for RenderError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::MissingField { element, field } => RenderError::MissingField { element, field },
            other => RenderError::Layout(other.to_string()),
        }
    }
}

impl From<&str> for RenderError {
    fn from(s: &str) -> Self {
        RenderError::Other(s.to_string())
    }
}
