//! Fully type-erased field paths.
use crate::{
    error::FieldPathError,
    iterable::DynIterable,
    path::{fmt_segments, read_fn, write_fn, FieldPath, PartialFieldPath, ProbeFn, Segments, Target},
    type_info::TypeInfo,
};
use std::{
    any::{type_name, Any},
    fmt,
    hash::{Hash, Hasher},
    rc::Rc,
};

pub(crate) type AnyReadFn = Rc<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any>>;
pub(crate) type AnyWriteFn = Rc<dyn for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any>>;

fn any_read_fn<F>(f: F) -> AnyReadFn
where
    F: 'static + for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any>,
{
    Rc::new(f)
}

fn any_write_fn<F>(f: F) -> AnyWriteFn
where
    F: 'static + for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any>,
{
    Rc::new(f)
}

/// A field path with both its root and target types erased.
///
/// Applying it to a value of another type than its root type returns `None`. The typed path can be recovered
/// with [`AnyFieldPath::downcast`].
#[derive(Clone)]
pub struct AnyFieldPath {
    pub(crate) root: TypeInfo,
    pub(crate) segments: Segments,
    pub(crate) target: Target,
    pub(crate) read: AnyReadFn,
    pub(crate) write: Option<AnyWriteFn>,
    pub(crate) probe: Option<ProbeFn>,
}

impl AnyFieldPath {
    pub fn root_type(&self) -> TypeInfo {
        self.root
    }

    pub fn target_type(&self) -> TypeInfo {
        self.target.info
    }

    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().map(|s| s.as_ref())
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Reads the target value, or returns `None` if `root` is not of the root type.
    pub fn get<'a>(&self, root: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.read)(root)
    }

    /// Returns a mutable reference to the target value, or `None` if the path is read-only or `root` is not of
    /// the root type.
    pub fn get_mut<'a>(&self, root: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let write = self.write.as_ref()?;
        write(root)
    }

    /// Stores a type-erased value through this path.
    pub fn try_set(&self, root: &mut dyn Any, value: Box<dyn Any>) -> Result<(), FieldPathError> {
        let write = self
            .write
            .as_ref()
            .ok_or_else(|| FieldPathError::ReadOnly { path: self.to_string() })?;
        let slot = write(root).ok_or(FieldPathError::RootMismatch {
            expected: self.root.name(),
        })?;
        (self.target.assign)(slot, value)
    }

    /// Runtime capability check of the target value. See [`PartialFieldPath::probe`].
    pub fn probe<'a>(&self, root: &'a dyn Any) -> Option<&'a dyn DynIterable> {
        let probe = self.probe.as_ref()?;
        probe(self.get(root)?)
    }

    /// Composes this path with a path rooted at this path's target type.
    pub fn try_appending(&self, child: &AnyFieldPath) -> Result<AnyFieldPath, FieldPathError> {
        if child.root != self.target.info {
            return Err(FieldPathError::TypeMismatch {
                expected: self.target.info.name(),
                found: child.root.name(),
            });
        }

        let parent_read = self.read.clone();
        let child_read = child.read.clone();
        let read = any_read_fn(move |root| parent_read(root).and_then(|value| child_read(value)));

        let write = match (&self.write, &child.write) {
            (Some(parent_write), Some(child_write)) => {
                let parent_write = parent_write.clone();
                let child_write = child_write.clone();
                Some(any_write_fn(move |root| {
                    parent_write(root).and_then(|value| child_write(value))
                }))
            }
            _ => None,
        };

        let mut segments = self.segments.clone();
        segments.extend(child.segments.iter().cloned());

        Ok(AnyFieldPath {
            root: self.root,
            segments,
            target: child.target,
            read,
            write,
            probe: child.probe.clone(),
        })
    }

    /// Composes this path with a path rooted at this path's target type, or returns `None` on a type mismatch.
    pub fn appending(&self, child: &AnyFieldPath) -> Option<AnyFieldPath> {
        self.try_appending(child).ok()
    }

    /// Recovers the path with a known root type.
    pub fn try_downcast_partial<R: 'static>(&self) -> Result<PartialFieldPath<R>, FieldPathError> {
        if !self.root.is::<R>() {
            return Err(FieldPathError::TypeMismatch {
                expected: type_name::<R>(),
                found: self.root.name(),
            });
        }

        let read = self.read.clone();
        let write = self.write.clone().map(|write| {
            write_fn(move |root: &mut R| {
                write(root as &mut dyn Any).expect("erased field path: root type was checked on downcast")
            })
        });

        Ok(PartialFieldPath {
            segments: self.segments.clone(),
            target: self.target,
            read: read_fn(move |root: &R| {
                read(root as &dyn Any).expect("erased field path: root type was checked on downcast")
            }),
            write,
            probe: self.probe.clone(),
        })
    }

    pub fn downcast_partial<R: 'static>(&self) -> Option<PartialFieldPath<R>> {
        self.try_downcast_partial().ok()
    }

    /// Recovers the typed path, failing if either the root or the target type differs.
    pub fn try_downcast<R: 'static, T: 'static>(&self) -> Result<FieldPath<R, T>, FieldPathError> {
        self.try_downcast_partial::<R>()?.try_downcast::<T>()
    }

    pub fn downcast<R: 'static, T: 'static>(&self) -> Option<FieldPath<R, T>> {
        self.try_downcast().ok()
    }
}

impl<R: 'static> From<PartialFieldPath<R>> for AnyFieldPath {
    fn from(path: PartialFieldPath<R>) -> Self {
        let PartialFieldPath {
            segments,
            target,
            read,
            write,
            probe,
        } = path;

        let write = write.map(|write| {
            any_write_fn(move |root: &mut dyn Any| root.downcast_mut::<R>().map(|root| write(root)))
        });

        AnyFieldPath {
            root: TypeInfo::of::<R>(),
            segments,
            target,
            read: any_read_fn(move |root: &dyn Any| root.downcast_ref::<R>().map(|root| read(root))),
            write,
            probe,
        }
    }
}

impl<R: 'static, T: 'static> From<FieldPath<R, T>> for AnyFieldPath {
    fn from(path: FieldPath<R, T>) -> Self {
        AnyFieldPath::from(path.into_partial())
    }
}

impl PartialEq for AnyFieldPath {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root && self.target.info == other.target.info && self.segments == other.segments
    }
}

impl Eq for AnyFieldPath {}

impl Hash for AnyFieldPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.hash(state);
        self.target.info.hash(state);
        self.segments.hash(state);
    }
}

impl fmt::Display for AnyFieldPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_segments(&self.segments, f)
    }
}

impl fmt::Debug for AnyFieldPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AnyFieldPath")
            .field("root", &self.root)
            .field("path", &format_args!("{}", self))
            .field("target", &self.target.info)
            .field("writable", &self.is_writable())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{AnyFieldPath, FieldPath, FieldPathError};
    use std::any::Any;

    struct Inner {
        value: u8,
    }

    struct Outer {
        inner: Inner,
        label: &'static str,
    }

    fn inner() -> AnyFieldPath {
        FieldPath::new("inner", |o: &Outer| &o.inner)
            .writable(|o| &mut o.inner)
            .to_any()
    }

    fn value() -> AnyFieldPath {
        FieldPath::new("value", |i: &Inner| &i.value)
            .writable(|i| &mut i.value)
            .to_any()
    }

    #[test]
    fn apply_to_erased_roots() {
        let mut outer = Outer {
            inner: Inner { value: 7 },
            label: "outer",
        };
        let path = inner().appending(&value()).unwrap();
        assert_eq!(path.to_string(), "inner.value");
        assert!(path.root_type().is::<Outer>());
        assert!(path.target_type().is::<u8>());

        let read = path.get(&outer).and_then(|v| v.downcast_ref::<u8>()).copied();
        assert_eq!(read, Some(7));
        // not an `Outer`
        assert!(path.get(&outer.label).is_none());

        path.try_set(&mut outer, Box::new(9u8)).unwrap();
        assert_eq!(outer.inner.value, 9);

        let mut not_outer = 5u8;
        assert!(matches!(
            path.try_set(&mut not_outer as &mut dyn Any, Box::new(1u8)),
            Err(FieldPathError::RootMismatch { .. })
        ));
        assert!(matches!(
            path.try_set(&mut outer, Box::new(1u32)),
            Err(FieldPathError::ValueMismatch { .. })
        ));
        assert_eq!(outer.inner.value, 9);
    }

    #[test]
    fn erased_composition_checks_types() {
        let label = FieldPath::new("label", |o: &Outer| &o.label).to_any();
        assert!(label.appending(&value()).is_none());
        assert!(value().appending(&inner()).is_none());
        assert!(matches!(
            label.try_appending(&value()),
            Err(FieldPathError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn downcast_round_trip() {
        let path = inner().appending(&value()).unwrap();
        let typed = path.downcast::<Outer, u8>().unwrap();
        let outer = Outer {
            inner: Inner { value: 3 },
            label: "outer",
        };
        assert_eq!(*typed.get(&outer), 3);
        assert!(typed.is_writable());
        assert_eq!(typed.to_any(), path);

        assert!(path.downcast::<Outer, u16>().is_none());
        assert!(path.downcast::<Inner, u8>().is_none());
        assert!(path.downcast_partial::<Inner>().is_none());
    }
}
