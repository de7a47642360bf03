//! Typed, composable paths to the fields of a value.
//!
//! A _field path_ is a reified accessor from a _root_ value to one of its stored fields (the _target_). It can read
//! the field, write it if the field is mutable, and be composed with a path rooted at its target type to reach
//! further into the value.
//!
//! Types that implement [`FieldPathIterable`] list the paths to their own fields (_direct_ paths). From those,
//! [`FieldPathIterable::recursive_paths`] computes the _recursive_ paths: every direct path, followed by the
//! composed paths into the field's value whenever that value is itself iterable. The traversal inspects the
//! current field values, so two instances of the same type can expand differently.
//!
//! # Example
//!
//! ```
//! use field_paths::FieldPathIterable;
//!
//! #[derive(FieldPathIterable)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! #[derive(FieldPathIterable)]
//! struct Line {
//!     a: Point,
//!     b: Point,
//! }
//!
//! let mut line = Line {
//!     a: Point { x: 1, y: 2 },
//!     b: Point { x: 3, y: 4 },
//! };
//!
//! let names: Vec<String> = line.recursive_paths().iter().map(|p| p.to_string()).collect();
//! assert_eq!(names, ["a", "a.x", "a.y", "b", "b.x", "b.y"]);
//!
//! for path in line.recursive_writable_paths_to::<i32>() {
//!     *path.get_mut(&mut line) *= 10;
//! }
//! assert_eq!(line.b.y, 40);
//! ```
//!
//! # Failures
//!
//! Path discovery is best-effort: compositions and downcasts between mismatched types produce no path rather than
//! an error. The `try_` variants of those operations return a [`FieldPathError`] describing the mismatch.
//!
//! Traversals do not detect cycles. See [`recursive_paths`].

// Lets the derive macro refer to `::field_paths` from within this crate.
extern crate self as field_paths;

mod any_path;
mod error;
#[cfg(feature = "std-impls")]
mod impls;
mod iterable;
mod path;
mod traverse;
mod type_info;

pub use crate::{
    any_path::AnyFieldPath,
    error::FieldPathError,
    iterable::{DynIterable, FieldPathIterable},
    path::{FieldPath, PartialFieldPath, WritableFieldPath},
    traverse::recursive_paths,
    type_info::TypeInfo,
};
#[cfg(feature = "derive")]
pub use field_paths_macros::FieldPathIterable;

/// Items used by code generated by `#[derive(FieldPathIterable)]`.
#[doc(hidden)]
pub mod __private {
    pub use crate::iterable::{FieldValue, ViaIterable, ViaLeaf};
}
