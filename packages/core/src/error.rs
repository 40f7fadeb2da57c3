//! Error taxonomy shared by every stage of the pipeline.

use thiserror::Error;

/// Errors raised while turning a remote result into a representation.
///
/// None of these are retried. They propagate unchanged to whatever layer
/// transmits errors to the caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The remote service reported a fatal message (code starting with `E`).
    #[error("{code}: {text}")]
    Domain { code: String, text: String },

    /// The remote result broke the single-entry wrapper contract.
    #[error("malformed remote result: {0}")]
    MalformedResult(String),

    /// None of the accepted media types is produced by the operation.
    #[error("none of the accepted media types ({accepted}) is available; available: {available}")]
    NotAcceptable { accepted: String, available: String },

    /// An operation needs a template that was never registered.
    #[error("no template registered under {0:?}")]
    TemplateNotFound(String),

    /// A template source failed to compile.
    #[error("template failed to compile: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    /// A registered template failed while rendering.
    #[error("template failed to render: {0}")]
    Render(#[from] Box<handlebars::RenderError>),

    #[error("failed to serialize result: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Shorthand for [`PipelineError::Domain`].
    pub fn domain(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Domain {
            code: code.into(),
            text: text.into(),
        }
    }
}
