use thiserror::Error;

/// Reasons why a field path operation produced nothing.
///
/// The default API reports these as absence (`None`, or a skipped item); the `try_` variants return them.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FieldPathError {
    /// A composition or downcast expected one type and found another.
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// A type-erased path was applied to a value that is not of its root type.
    #[error("field path rooted at `{expected}` applied to a value of another type")]
    RootMismatch { expected: &'static str },
    /// A type-erased write was given a value that is not of the path's target type.
    #[error("cannot store a value of another type through a field path to `{expected}`")]
    ValueMismatch { expected: &'static str },
    #[error("field path `{path}` is read-only")]
    ReadOnly { path: String },
}
