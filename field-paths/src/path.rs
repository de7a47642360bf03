//! Typed field paths.
//!
//! A field path is a reified accessor from a _root_ value to one of the values stored within it (the _target_).
//! Paths come in three flavors, depending on how much of their type is known statically:
//!
//! - [`FieldPath<R, T>`]: both root and target types are known,
//! - [`PartialFieldPath<R>`]: the root type is known, the target type is erased,
//! - [`AnyFieldPath`]: both types are erased.
//!
//! All three share the same representation: a list of name segments and reference-counted accessor closures that
//! produce `&dyn Any`. Converting between them never loses information; going from an erased form back to a typed
//! one is a checked downcast.
use crate::{
    any_path::AnyFieldPath,
    error::FieldPathError,
    iterable::{DynIterable, FieldPathIterable},
    type_info::TypeInfo,
};
use smallvec::{smallvec, SmallVec};
use std::{
    any::{type_name, Any},
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    ops::Deref,
    rc::Rc,
};

pub(crate) type Segments = SmallVec<[Cow<'static, str>; 4]>;
pub(crate) type ReadFn<R> = Rc<dyn for<'a> Fn(&'a R) -> &'a dyn Any>;
pub(crate) type WriteFn<R> = Rc<dyn for<'a> Fn(&'a mut R) -> &'a mut dyn Any>;
pub(crate) type ProbeFn = Rc<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn DynIterable>>;

// The helpers below pin down the higher-ranked signature of the closures passed to them.

pub(crate) fn read_fn<R, F>(f: F) -> ReadFn<R>
where
    F: 'static + for<'a> Fn(&'a R) -> &'a dyn Any,
{
    Rc::new(f)
}

pub(crate) fn write_fn<R, F>(f: F) -> WriteFn<R>
where
    F: 'static + for<'a> Fn(&'a mut R) -> &'a mut dyn Any,
{
    Rc::new(f)
}

pub(crate) fn probe_fn<F>(f: F) -> ProbeFn
where
    F: 'static + for<'a> Fn(&'a dyn Any) -> Option<&'a dyn DynIterable>,
{
    Rc::new(f)
}

pub(crate) fn downcast_target<T: 'static>(value: &dyn Any) -> &T {
    value
        .downcast_ref()
        .expect("field path resolved to a value that is not of its target type")
}

pub(crate) fn downcast_target_mut<T: 'static>(value: &mut dyn Any) -> &mut T {
    value
        .downcast_mut()
        .expect("field path resolved to a value that is not of its target type")
}

pub(crate) fn fmt_segments(segments: &Segments, f: &mut fmt::Formatter) -> fmt::Result {
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            f.write_str(".")?;
        }
        f.write_str(segment)?;
    }
    Ok(())
}

//==================================================================================================

/// The target type of a path, with the operations that need to know it statically.
#[derive(Copy, Clone)]
pub(crate) struct Target {
    pub(crate) info: TypeInfo,
    pub(crate) assign: fn(&mut dyn Any, Box<dyn Any>) -> Result<(), FieldPathError>,
}

impl Target {
    pub(crate) fn of<T: 'static>() -> Target {
        Target {
            info: TypeInfo::of::<T>(),
            assign: assign::<T>,
        }
    }
}

fn assign<T: 'static>(slot: &mut dyn Any, value: Box<dyn Any>) -> Result<(), FieldPathError> {
    let value = value.downcast::<T>().map_err(|_| FieldPathError::ValueMismatch {
        expected: type_name::<T>(),
    })?;
    *downcast_target_mut::<T>(slot) = *value;
    Ok(())
}

//==================================================================================================

/// A field path whose root type `R` is known but whose target type is erased.
///
/// This is the element type of the field path lists returned by [`FieldPathIterable`], since the fields of a type
/// have heterogeneous types.
pub struct PartialFieldPath<R> {
    pub(crate) segments: Segments,
    pub(crate) target: Target,
    pub(crate) read: ReadFn<R>,
    pub(crate) write: Option<WriteFn<R>>,
    /// Runtime capability check applied to the target value.
    pub(crate) probe: Option<ProbeFn>,
}

// #26925
impl<R> Clone for PartialFieldPath<R> {
    fn clone(&self) -> Self {
        PartialFieldPath {
            segments: self.segments.clone(),
            target: self.target,
            read: self.read.clone(),
            write: self.write.clone(),
            probe: self.probe.clone(),
        }
    }
}

impl<R: 'static> PartialFieldPath<R> {
    pub fn root_type(&self) -> TypeInfo {
        TypeInfo::of::<R>()
    }

    pub fn target_type(&self) -> TypeInfo {
        self.target.info
    }

    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    /// Names of the fields traversed by this path, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().map(|s| s.as_ref())
    }

    /// Number of fields traversed by this path (1 for a direct path).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Reads the target value.
    pub fn get_any<'a>(&self, root: &'a R) -> &'a dyn Any {
        (self.read)(root)
    }

    /// Returns a mutable reference to the target value, or `None` if the path is read-only.
    pub fn get_any_mut<'a>(&self, root: &'a mut R) -> Option<&'a mut dyn Any> {
        self.write.as_ref().map(|write| write(root))
    }

    /// Stores a type-erased value through this path.
    pub fn try_set_any(&self, root: &mut R, value: Box<dyn Any>) -> Result<(), FieldPathError> {
        let slot = self
            .get_any_mut(root)
            .ok_or_else(|| FieldPathError::ReadOnly { path: self.to_string() })?;
        (self.target.assign)(slot, value)
    }

    /// Returns the target value as an iterable value, if the _live_ value supports field path enumeration.
    ///
    /// Paths without a probe always return `None`: their target is a leaf.
    pub fn probe<'a>(&self, root: &'a R) -> Option<&'a dyn DynIterable> {
        let probe = self.probe.as_ref()?;
        probe(self.get_any(root))
    }

    /// Composes this path with a path rooted at this path's target type.
    ///
    /// Fails with [`FieldPathError::TypeMismatch`] if `child` is rooted at another type.
    pub fn try_appending(&self, child: &AnyFieldPath) -> Result<PartialFieldPath<R>, FieldPathError> {
        if child.root != self.target.info {
            return Err(FieldPathError::TypeMismatch {
                expected: self.target.info.name(),
                found: child.root.name(),
            });
        }
        Ok(self.compose_unchecked(child))
    }

    /// Composes this path with a path rooted at this path's target type, or returns `None` if `child` is rooted
    /// at another type.
    pub fn appending(&self, child: &AnyFieldPath) -> Option<PartialFieldPath<R>> {
        self.try_appending(child).ok()
    }

    /// Composition, assuming `child.root == self.target`.
    pub(crate) fn compose_unchecked(&self, child: &AnyFieldPath) -> PartialFieldPath<R> {
        let parent_read = self.read.clone();
        let child_read = child.read.clone();
        let read = read_fn(move |root: &R| {
            child_read(parent_read(root)).expect("composed field path: intermediate type was checked on composition")
        });

        let write = match (&self.write, &child.write) {
            (Some(parent_write), Some(child_write)) => {
                let parent_write = parent_write.clone();
                let child_write = child_write.clone();
                Some(write_fn(move |root: &mut R| {
                    child_write(parent_write(root))
                        .expect("composed field path: intermediate type was checked on composition")
                }))
            }
            _ => None,
        };

        let mut segments = self.segments.clone();
        segments.extend(child.segments.iter().cloned());

        PartialFieldPath {
            segments,
            target: child.target,
            read,
            write,
            probe: child.probe.clone(),
        }
    }

    /// Recovers the typed path, failing with [`FieldPathError::TypeMismatch`] if the target type is not `T`.
    pub fn try_downcast<T: 'static>(self) -> Result<FieldPath<R, T>, FieldPathError> {
        if !self.target.info.is::<T>() {
            return Err(FieldPathError::TypeMismatch {
                expected: type_name::<T>(),
                found: self.target.info.name(),
            });
        }
        Ok(FieldPath {
            inner: self,
            _marker: PhantomData,
        })
    }

    /// Recovers the typed path, or returns `None` if the target type is not `T`.
    pub fn downcast<T: 'static>(self) -> Option<FieldPath<R, T>> {
        self.try_downcast().ok()
    }

    /// Recovers the typed path if the target type is `T` and the path is writable.
    pub fn downcast_writable<T: 'static>(self) -> Option<WritableFieldPath<R, T>> {
        self.downcast::<T>()?.into_writable()
    }

    /// Erases the root type.
    pub fn to_any(&self) -> AnyFieldPath {
        AnyFieldPath::from(self.clone())
    }

    /// Returns this path applied to a `Q` that holds an `R`, keeping the segments unchanged.
    pub(crate) fn rerooted<Q: 'static>(
        self,
        outer: fn(&Q) -> &R,
        outer_mut: fn(&mut Q) -> &mut R,
    ) -> PartialFieldPath<Q> {
        let read = self.read;
        let write = self.write.map(|write| write_fn(move |root: &mut Q| write(outer_mut(root))));
        PartialFieldPath {
            segments: self.segments,
            target: self.target,
            read: read_fn(move |root: &Q| read(outer(root))),
            write,
            probe: self.probe,
        }
    }

    /// Same as `rerooted`, for holders that only give shared access to their contents.
    pub(crate) fn rerooted_readonly<Q: 'static>(self, outer: fn(&Q) -> &R) -> PartialFieldPath<Q> {
        let read = self.read;
        PartialFieldPath {
            segments: self.segments,
            target: self.target,
            read: read_fn(move |root: &Q| read(outer(root))),
            write: None,
            probe: self.probe,
        }
    }
}

impl<R: 'static> PartialEq for PartialFieldPath<R> {
    fn eq(&self, other: &Self) -> bool {
        self.target.info == other.target.info && self.segments == other.segments
    }
}

impl<R: 'static> Eq for PartialFieldPath<R> {}

impl<R: 'static> Hash for PartialFieldPath<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.target.info.hash(state);
        self.segments.hash(state);
    }
}

impl<R: 'static> fmt::Display for PartialFieldPath<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_segments(&self.segments, f)
    }
}

impl<R: 'static> fmt::Debug for PartialFieldPath<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PartialFieldPath")
            .field("root", &self.root_type())
            .field("path", &format_args!("{}", self))
            .field("target", &self.target.info)
            .field("writable", &self.is_writable())
            .finish()
    }
}

//==================================================================================================

/// A field path from a value of type `R` to a value of type `T` stored within it.
///
/// # Example
///
/// ```
/// use field_paths::FieldPath;
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let x = FieldPath::new("x", |p: &Point| &p.x).writable(|p| &mut p.x);
/// let mut p = Point { x: 1, y: 2 };
/// assert_eq!(*x.get(&p), 1);
/// x.set(&mut p, 5).unwrap();
/// assert_eq!(p.x, 5);
/// assert_eq!(p.y, 2);
/// ```
pub struct FieldPath<R, T> {
    inner: PartialFieldPath<R>,
    _marker: PhantomData<fn(&R) -> &T>,
}

// #26925
impl<R, T> Clone for FieldPath<R, T> {
    fn clone(&self) -> Self {
        FieldPath {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<R: 'static, T: 'static> FieldPath<R, T> {
    /// Creates a read-only path to a leaf field.
    pub fn new<G>(name: impl Into<Cow<'static, str>>, get: G) -> FieldPath<R, T>
    where
        G: 'static + for<'a> Fn(&'a R) -> &'a T,
    {
        FieldPath {
            inner: PartialFieldPath {
                segments: smallvec![name.into()],
                target: Target::of::<T>(),
                read: read_fn(move |root: &R| get(root) as &dyn Any),
                write: None,
                probe: None,
            },
            _marker: PhantomData,
        }
    }

    /// Makes the path writable through the given mutable accessor.
    #[must_use]
    pub fn writable<S>(mut self, get_mut: S) -> FieldPath<R, T>
    where
        S: 'static + for<'a> Fn(&'a mut R) -> &'a mut T,
    {
        self.inner.write = Some(write_fn(move |root: &mut R| get_mut(root) as &mut dyn Any));
        self
    }

    /// Sets the runtime capability check used to decide whether to descend into the target value.
    ///
    /// This is for fields whose declared type may or may not hold an iterable value depending on what is stored
    /// in it (e.g. trait objects).
    #[must_use]
    pub fn probe_with<P>(mut self, probe: P) -> FieldPath<R, T>
    where
        P: 'static + for<'a> Fn(&'a T) -> Option<&'a dyn DynIterable>,
    {
        self.inner.probe = Some(probe_fn(move |value: &dyn Any| {
            value.downcast_ref::<T>().and_then(|value| probe(value))
        }));
        self
    }

    /// Marks the target as an iterable value: recursive queries descend into it.
    #[must_use]
    pub fn nested(self) -> FieldPath<R, T>
    where
        T: FieldPathIterable,
    {
        self.probe_with(|value: &T| Some(value as &dyn DynIterable))
    }

    pub fn get<'a>(&self, root: &'a R) -> &'a T {
        downcast_target(self.inner.get_any(root))
    }

    /// Returns a mutable reference to the target, or `None` if the path is read-only.
    pub fn get_mut<'a>(&self, root: &'a mut R) -> Option<&'a mut T> {
        self.inner.get_any_mut(root).map(downcast_target_mut)
    }

    /// Stores a value through this path.
    pub fn set(&self, root: &mut R, value: T) -> Result<(), FieldPathError> {
        let slot = self
            .get_mut(root)
            .ok_or_else(|| FieldPathError::ReadOnly { path: self.to_string() })?;
        *slot = value;
        Ok(())
    }

    pub fn is_writable(&self) -> bool {
        self.inner.is_writable()
    }

    pub fn root_type(&self) -> TypeInfo {
        self.inner.root_type()
    }

    pub fn target_type(&self) -> TypeInfo {
        self.inner.target_type()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.segments()
    }

    /// Composes two paths. The result is writable iff both are.
    pub fn appending<U: 'static>(&self, child: &FieldPath<T, U>) -> FieldPath<R, U> {
        FieldPath {
            inner: self.inner.compose_unchecked(&child.to_any()),
            _marker: PhantomData,
        }
    }

    pub fn as_partial(&self) -> &PartialFieldPath<R> {
        &self.inner
    }

    /// Erases the target type.
    pub fn into_partial(self) -> PartialFieldPath<R> {
        self.inner
    }

    /// Erases both root and target types.
    pub fn to_any(&self) -> AnyFieldPath {
        self.inner.to_any()
    }

    /// Returns the writable form of this path, or [`FieldPathError::ReadOnly`].
    pub fn try_into_writable(self) -> Result<WritableFieldPath<R, T>, FieldPathError> {
        match self.inner.write.clone() {
            Some(write) => Ok(WritableFieldPath { path: self, write }),
            None => Err(FieldPathError::ReadOnly { path: self.to_string() }),
        }
    }

    pub fn into_writable(self) -> Option<WritableFieldPath<R, T>> {
        self.try_into_writable().ok()
    }
}

impl<R: 'static, T: 'static> From<FieldPath<R, T>> for PartialFieldPath<R> {
    fn from(path: FieldPath<R, T>) -> Self {
        path.inner
    }
}

impl<R: 'static, T: 'static> PartialEq for FieldPath<R, T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<R: 'static, T: 'static> Eq for FieldPath<R, T> {}

impl<R: 'static, T: 'static> Hash for FieldPath<R, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state)
    }
}

impl<R: 'static, T: 'static> fmt::Display for FieldPath<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl<R: 'static, T: 'static> fmt::Debug for FieldPath<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FieldPath")
            .field("root", &self.root_type())
            .field("path", &format_args!("{}", self))
            .field("target", &self.target_type())
            .field("writable", &self.is_writable())
            .finish()
    }
}

//==================================================================================================

/// A typed field path that is known to support writing.
pub struct WritableFieldPath<R, T> {
    path: FieldPath<R, T>,
    write: WriteFn<R>,
}

// #26925
impl<R, T> Clone for WritableFieldPath<R, T> {
    fn clone(&self) -> Self {
        WritableFieldPath {
            path: self.path.clone(),
            write: self.write.clone(),
        }
    }
}

impl<R: 'static, T: 'static> WritableFieldPath<R, T> {
    pub fn get_mut<'a>(&self, root: &'a mut R) -> &'a mut T {
        downcast_target_mut((self.write)(root))
    }

    pub fn set(&self, root: &mut R, value: T) {
        *self.get_mut(root) = value;
    }

    pub fn into_path(self) -> FieldPath<R, T> {
        self.path
    }
}

impl<R, T> Deref for WritableFieldPath<R, T> {
    type Target = FieldPath<R, T>;

    fn deref(&self) -> &FieldPath<R, T> {
        &self.path
    }
}

impl<R: 'static, T: 'static> PartialEq for WritableFieldPath<R, T> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<R: 'static, T: 'static> Eq for WritableFieldPath<R, T> {}

impl<R: 'static, T: 'static> fmt::Display for WritableFieldPath<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.path, f)
    }
}

impl<R: 'static, T: 'static> fmt::Debug for WritableFieldPath<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.path, f)
    }
}

//==================================================================================================
