//! `FieldPathIterable` impls for standard library types.
use crate::{FieldPath, FieldPathIterable, PartialFieldPath};
use std::{rc::Rc, sync::Arc};

fn boxed<T: 'static>(path: PartialFieldPath<T>) -> PartialFieldPath<Box<T>> {
    path.rerooted(|b: &Box<T>| &**b, |b: &mut Box<T>| &mut **b)
}

/// Paths of the boxed value, as if the box wasn't there.
impl<T: FieldPathIterable> FieldPathIterable for Box<T> {
    fn declared_paths() -> Vec<PartialFieldPath<Self>> {
        T::all_paths().into_iter().map(boxed).collect()
    }

    fn direct_paths(&self) -> Vec<PartialFieldPath<Self>> {
        (**self).direct_paths().into_iter().map(boxed).collect()
    }
}

/// Paths of the shared value. They are read-only.
impl<T: FieldPathIterable> FieldPathIterable for Rc<T> {
    fn declared_paths() -> Vec<PartialFieldPath<Self>> {
        T::all_paths()
            .into_iter()
            .map(|path| path.rerooted_readonly(|rc: &Rc<T>| &**rc))
            .collect()
    }

    fn direct_paths(&self) -> Vec<PartialFieldPath<Self>> {
        (**self)
            .direct_paths()
            .into_iter()
            .map(|path| path.rerooted_readonly(|rc: &Rc<T>| &**rc))
            .collect()
    }
}

/// Paths of the shared value. They are read-only.
impl<T: FieldPathIterable> FieldPathIterable for Arc<T> {
    fn declared_paths() -> Vec<PartialFieldPath<Self>> {
        T::all_paths()
            .into_iter()
            .map(|path| path.rerooted_readonly(|arc: &Arc<T>| &**arc))
            .collect()
    }

    fn direct_paths(&self) -> Vec<PartialFieldPath<Self>> {
        (**self)
            .direct_paths()
            .into_iter()
            .map(|path| path.rerooted_readonly(|arc: &Arc<T>| &**arc))
            .collect()
    }
}

/// Tuple elements are writable leaves named after their index.
macro_rules! impl_tuple_paths {
    ($($t:ident : $idx:tt),+) => {
        impl<$($t: 'static),+> FieldPathIterable for ($($t,)+) {
            fn declared_paths() -> Vec<PartialFieldPath<Self>> {
                vec![$(
                    FieldPath::<Self, $t>::new(stringify!($idx), |tuple: &Self| &tuple.$idx)
                        .writable(|tuple: &mut Self| &mut tuple.$idx)
                        .into_partial()
                ),+]
            }
        }
    };
}

impl_tuple_paths!(T0: 0);
impl_tuple_paths!(T0: 0, T1: 1);
impl_tuple_paths!(T0: 0, T1: 1, T2: 2);
impl_tuple_paths!(T0: 0, T1: 1, T2: 2, T3: 3);

#[cfg(test)]
mod tests {
    use crate::{FieldPath, FieldPathIterable, PartialFieldPath};
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    struct Node {
        value: u32,
        child: Option<u32>,
    }

    impl FieldPathIterable for Node {
        fn declared_paths() -> Vec<PartialFieldPath<Self>> {
            vec![
                FieldPath::new("value", |n: &Node| &n.value)
                    .writable(|n| &mut n.value)
                    .into_partial(),
                FieldPath::new("child", |n: &Node| &n.child)
                    .writable(|n| &mut n.child)
                    .into_partial(),
            ]
        }
    }

    struct Tree {
        root: Box<Node>,
        shared: Rc<Node>,
    }

    impl FieldPathIterable for Tree {
        fn declared_paths() -> Vec<PartialFieldPath<Self>> {
            vec![
                FieldPath::new("root", |t: &Tree| &t.root)
                    .writable(|t| &mut t.root)
                    .nested()
                    .into_partial(),
                FieldPath::new("shared", |t: &Tree| &t.shared).nested().into_partial(),
            ]
        }
    }

    #[test]
    fn boxed_and_shared_values_are_transparent() {
        let mut tree = Tree {
            root: Box::new(Node { value: 1, child: None }),
            shared: Rc::new(Node {
                value: 2,
                child: Some(3),
            }),
        };
        let names: Vec<String> = tree.recursive_paths().iter().map(|p| p.to_string()).collect();
        assert_eq!(names, ["root", "root.value", "root.child", "shared", "shared.value", "shared.child"]);

        let writable: Vec<String> = tree
            .recursive_writable_paths_to::<u32>()
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(writable, ["root.value"]);

        let values: Vec<u32> = tree.recursive_paths_to::<u32>().iter().map(|p| *p.get(&tree)).collect();
        assert_eq!(values, [1, 2]);

        tree.recursive_writable_paths_to::<u32>()[0].set(&mut tree, 5);
        assert_eq!(tree.root.value, 5);
    }

    #[test]
    fn tuple_elements() {
        let mut pair = (1u8, "two");
        let paths = pair.direct_paths();
        assert_eq!(paths.iter().map(|p| p.to_string()).collect::<Vec<_>>(), ["0", "1"]);
        assert!(paths.iter().all(|p| p.is_writable()));

        let first = pair.writable_paths_to::<u8>().remove(0);
        first.set(&mut pair, 9);
        assert_eq!(pair, (9, "two"));
        assert_eq!(pair.recursive_paths(), pair.direct_paths());
    }
}
