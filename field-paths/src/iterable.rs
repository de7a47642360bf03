//! The field path capability contract.
use crate::{
    any_path::AnyFieldPath,
    path::{FieldPath, PartialFieldPath, WritableFieldPath},
    traverse,
    type_info::TypeInfo,
};
use std::any::Any;

/// Trait implemented by types that can enumerate the field paths to their own fields.
///
/// The only required item is [`declared_paths`](FieldPathIterable::declared_paths): one path per stored field, in
/// declaration order. It is usually generated with `#[derive(FieldPathIterable)]`, but can be written by hand.
/// Everything else has a default implementation built on top of it.
///
/// Types that don't implement this trait don't participate: fields of those types are leaves.
pub trait FieldPathIterable: Sized + 'static {
    /// Paths to the declared fields of this type, in declaration order.
    fn declared_paths() -> Vec<PartialFieldPath<Self>>;

    /// Synthetic paths that are not derived from declared fields. They come after the declared ones.
    fn additional_paths() -> Vec<PartialFieldPath<Self>> {
        Vec::new()
    }

    /// Declared paths followed by additional paths.
    fn all_paths() -> Vec<PartialFieldPath<Self>> {
        let mut paths = Self::declared_paths();
        paths.extend(Self::additional_paths());
        paths
    }

    fn all_any_paths() -> Vec<AnyFieldPath> {
        Self::all_paths().into_iter().map(AnyFieldPath::from).collect()
    }

    /// Direct paths of this particular value. Same as [`all_paths`](FieldPathIterable::all_paths) unless
    /// overridden.
    fn direct_paths(&self) -> Vec<PartialFieldPath<Self>> {
        Self::all_paths()
    }

    fn direct_any_paths(&self) -> Vec<AnyFieldPath> {
        self.direct_paths().into_iter().map(AnyFieldPath::from).collect()
    }

    /// Direct paths, each followed by the composed paths into its field's value if that value is itself
    /// iterable. See [`recursive_paths`](crate::recursive_paths).
    fn recursive_paths(&self) -> Vec<PartialFieldPath<Self>> {
        traverse::recursive_paths(self)
    }

    fn recursive_any_paths(&self) -> Vec<AnyFieldPath> {
        self.recursive_paths().into_iter().map(AnyFieldPath::from).collect()
    }

    /// Direct paths to fields of type `T`.
    fn paths_to<T: 'static>(&self) -> Vec<FieldPath<Self, T>> {
        self.direct_paths().into_iter().filter_map(PartialFieldPath::downcast::<T>).collect()
    }

    /// Recursive paths to values of type `T`.
    fn recursive_paths_to<T: 'static>(&self) -> Vec<FieldPath<Self, T>> {
        self.recursive_paths()
            .into_iter()
            .filter_map(PartialFieldPath::downcast::<T>)
            .collect()
    }

    /// Writable direct paths to fields of type `T`.
    fn writable_paths_to<T: 'static>(&self) -> Vec<WritableFieldPath<Self, T>> {
        self.direct_paths()
            .into_iter()
            .filter_map(PartialFieldPath::downcast_writable::<T>)
            .collect()
    }

    /// Writable recursive paths to values of type `T`.
    fn recursive_writable_paths_to<T: 'static>(&self) -> Vec<WritableFieldPath<Self, T>> {
        self.recursive_paths()
            .into_iter()
            .filter_map(PartialFieldPath::downcast_writable::<T>)
            .collect()
    }
}

/// Object-safe face of [`FieldPathIterable`].
///
/// Probes return field values as `&dyn DynIterable` when they support field path enumeration. It is implemented
/// for every `FieldPathIterable` type.
pub trait DynIterable: Any {
    /// Type of the value, which is the root type of the paths it returns.
    fn dyn_type(&self) -> TypeInfo;
    fn dyn_direct_paths(&self) -> Vec<AnyFieldPath>;
    fn dyn_recursive_paths(&self) -> Vec<AnyFieldPath>;
}

impl<T: FieldPathIterable> DynIterable for T {
    fn dyn_type(&self) -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn dyn_direct_paths(&self) -> Vec<AnyFieldPath> {
        self.direct_any_paths()
    }

    fn dyn_recursive_paths(&self) -> Vec<AnyFieldPath> {
        self.recursive_any_paths()
    }
}

//==================================================================================================
// Field value detection

/// Wraps a field value so that derived paths can tell, at the field's concrete type, whether the value is
/// iterable.
///
/// `(&&FieldValue(value)).iterable()` resolves to [`ViaIterable`] when the type implements `FieldPathIterable`,
/// and to [`ViaLeaf`] otherwise. This is intended for use by `#[derive(FieldPathIterable)]`. In a generic
/// context, a type parameter resolves to `ViaLeaf` unless it is bounded.
#[doc(hidden)]
pub struct FieldValue<'a, T>(pub &'a T);

#[doc(hidden)]
pub trait ViaIterable<'a> {
    fn iterable(&self) -> Option<&'a dyn DynIterable>;
}

impl<'a, T: FieldPathIterable> ViaIterable<'a> for &FieldValue<'a, T> {
    fn iterable(&self) -> Option<&'a dyn DynIterable> {
        Some(self.0 as &dyn DynIterable)
    }
}

#[doc(hidden)]
pub trait ViaLeaf<'a> {
    fn iterable(&self) -> Option<&'a dyn DynIterable>;
}

impl<'a, T> ViaLeaf<'a> for FieldValue<'a, T> {
    fn iterable(&self) -> Option<&'a dyn DynIterable> {
        None
    }
}
