//! Generation-time failures.
//!
//! Configuration problems surface directly as spanned [`syn::Error`] values
//! from the reader. Everything that goes wrong while handlers assemble and
//! inject members is a [`BuilderStateError`], wrapped with the failing
//! handler's name in a [`GenerationError`] so the single `compile_error!`
//! emitted for the pass says where generation stopped.

use proc_macro2::Span;
use thiserror::Error;

use super::tree::Namespace;

/// Misuse of a builder or an injection conflict.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum BuilderStateError {
    #[error("{builder} was used after it was finished")]
    AlreadyFinished { builder: &'static str },

    #[error("method `{method}` declares a return type but has no return expression")]
    MissingReturn { method: String },

    #[error("a return expression is already set")]
    ReturnAlreadySet,

    #[error("a failure type is already declared")]
    FailureAlreadySet,

    #[error("variadic parameter `{parameter}` of `{method}` must be the last parameter")]
    VariadicNotLast { method: String, parameter: String },

    #[error("generated {namespace} `{name}` collides with an existing one")]
    DuplicateMember { name: String, namespace: Namespace },
}

/// A pass aborted by one of its handlers.
#[derive(Debug, Error)]
pub(crate) enum GenerationError {
    #[error("domain_model: {handler} handler failed: {source}")]
    Handler {
        handler: &'static str,
        #[source]
        source: BuilderStateError,
    },
}

impl GenerationError {
    pub(crate) fn into_syn_error(self, span: Span) -> syn::Error {
        syn::Error::new(span, self.to_string())
    }
}
