//! Fatal error taxonomy.
//!
//! Anything in here aborts the whole conversion. Recoverable problems are
//! reported through [`crate::warning::Diagnostics`] instead.

use thiserror::Error;

/// A failure to map a namespace URI onto a prefix during tree post-processing.
///
/// Either variant indicates a bug in the generator, not bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamespaceError {
    /// No in-scope declaration binds the namespace.
    #[error("no namespace declaration in scope for {{{namespace}}}{local}")]
    Unresolved {
        /// Namespace URI of the unresolved name.
        namespace: String,
        /// Local part of the unresolved name.
        local: String,
    },
    /// The nearest declaration is the default namespace, which attributes cannot use.
    #[error("cannot qualify attribute {{{namespace}}}{local}: namespace is only bound as the default")]
    CannotQualifyAttribute {
        /// Namespace URI of the attribute.
        namespace: String,
        /// Local part of the attribute name.
        local: String,
    },
}

/// A fatal conversion error.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A required attribute or blob is missing or cannot be parsed.
    #[error("malformed input in {context}: {message}")]
    MalformedInput {
        /// Where the problem was found (layer id, graphic class, key).
        context: String,
        /// What was wrong.
        message: String,
    },
    /// Namespace resolution of the generated tree failed.
    #[error(transparent)]
    Namespace(#[from] NamespaceError),
    /// The record store could not produce the requested data.
    #[error("record store error: {0}")]
    Store(String),
}

impl ConvertError {
    /// Shorthand for [`ConvertError::MalformedInput`].
    #[must_use]
    pub fn malformed(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            context: context.into(),
            message: message.into(),
        }
    }
}
