use thiserror::Error;

use crate::config::ConfigError;
use crate::surface::ElementId;

/// Unified result type for the bento grid crate.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors surfaced by the placement engine and its runtime.
///
/// Every variant indicates an embedding or adapter mistake and aborts the
/// pass. An unmeasurable container is deliberately not in this list: the
/// runtime reports it as a skipped pass and retries on the next trigger.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("item spans {span} columns but the grid only has {columns}")]
    SpanExceedsColumns { span: usize, columns: usize },
    #[error("invalid span tag `{0}`, expected `<columns>x<rows>`")]
    InvalidSpanTag(String),
    #[error("surface does not hold element {0}")]
    UnknownElement(ElementId),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
