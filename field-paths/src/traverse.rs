//! Recursive field path expansion.
use crate::{
    any_path::AnyFieldPath,
    iterable::FieldPathIterable,
    path::PartialFieldPath,
};
use tracing::{debug, trace};

/// Returns the recursive field paths of `value`.
///
/// The result is a pre-order, depth-first listing: each direct path of `value` (in the order given by
/// [`FieldPathIterable::direct_paths`]) is immediately followed by its composition with every recursive path of
/// the field's value, provided that the path's probe accepts the _current_ value of the field. Child paths whose
/// root type is not the parent path's target type cannot be composed and are left out.
///
/// Nothing is cached: the expansion reads the current field values on every call.
///
/// # Termination
///
/// There is no cycle detection. If a value can reach itself by following fields accepted by probes (e.g. through
/// a shared pointer set up after construction), this function recurses until the stack is exhausted. Callers must
/// only traverse acyclic value graphs.
pub fn recursive_paths<R: FieldPathIterable>(value: &R) -> Vec<PartialFieldPath<R>> {
    let mut paths = Vec::new();
    for path in value.direct_paths() {
        let expanded = expand(&path, value);
        paths.push(path);
        paths.extend(expanded);
    }
    paths
}

/// Composes `path` with the recursive paths of the value it reaches in `root`.
fn expand<R: 'static>(path: &PartialFieldPath<R>, root: &R) -> Vec<PartialFieldPath<R>> {
    let Some(child) = path.probe(root) else {
        return Vec::new();
    };
    trace!(path = %path, child = %child.dyn_type(), "expanding field value");
    child
        .dyn_recursive_paths()
        .iter()
        .filter_map(|child_path| compose(path, child_path))
        .collect()
}

fn compose<R: 'static>(path: &PartialFieldPath<R>, child_path: &AnyFieldPath) -> Option<PartialFieldPath<R>> {
    match path.try_appending(child_path) {
        Ok(composed) => Some(composed),
        Err(err) => {
            debug!(path = %path, child = %child_path, "dropping field path: {err}");
            None
        }
    }
}
