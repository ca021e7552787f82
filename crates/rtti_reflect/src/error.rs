use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// ReflectError

/// Failure reported by the checked (`try_*`) reflection operations.
///
/// The unchecked counterparts (`get`, `set`, `invoke`, ...) swallow these
/// and return an empty [`Value`](crate::Value) or do nothing instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReflectError {
    #[error("instance of `{actual}` is not a `{expected}`")]
    InstanceMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("value mismatch: expected `{expected}`, found `{found}`")]
    ValueMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("arity mismatch: expected {expected} arguments, received {received}")]
    ArityMismatch { expected: usize, received: usize },

    #[error("argument {index} mismatch: expected `{expected}`, found `{found}`")]
    ArgumentMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("property `{0}` has no getter")]
    NotReadable(&'static str),

    #[error("property `{0}` has no setter")]
    NotWritable(&'static str),

    #[error("method `{0}` needs a mutable instance")]
    NotConst(&'static str),

    #[error("type `{0}` has no factory")]
    NoFactory(&'static str),

    #[error("type `{ty}` has no property `{name}`")]
    PropertyNotFound { ty: &'static str, name: String },

    #[error("type `{ty}` has no method `{name}`")]
    MethodNotFound { ty: &'static str, name: String },

    #[error("type `{0}` is not registered")]
    UnknownType(String),
}
