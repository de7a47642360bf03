use field_paths::{DynIterable, FieldPath, FieldPathIterable, PartialFieldPath};

#[derive(Clone, Debug, PartialEq, FieldPathIterable)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Debug, FieldPathIterable)]
struct Line {
    #[field_paths(nested)]
    a: Point,
    #[field_paths(nested, readonly)]
    b: Point,
    label: String,
}

#[derive(FieldPathIterable)]
struct Segment {
    start: Point,
    end: Box<Point>,
    weight: f32,
}

#[derive(FieldPathIterable)]
struct Tuple(i32, #[field_paths(readonly)] f32, String);

#[derive(FieldPathIterable)]
struct Keywords {
    r#type: u8,
}

#[derive(FieldPathIterable)]
struct Wrapper<T> {
    #[field_paths(nested)]
    inner: T,
    count: usize,
}

#[derive(FieldPathIterable)]
#[field_paths(additional = Rect::extra_paths)]
struct Rect {
    #[field_paths(nested)]
    origin: Point,
    width: i32,
}

impl Rect {
    fn extra_paths() -> Vec<PartialFieldPath<Self>> {
        vec![FieldPath::new("left", |r: &Rect| &r.origin.x).into_partial()]
    }
}

trait Component: 'static {
    fn fields(&self) -> Option<&dyn DynIterable>;
}

impl Component for Point {
    fn fields(&self) -> Option<&dyn DynIterable> {
        Some(self)
    }
}

fn component_fields(component: &Box<dyn Component>) -> Option<&dyn DynIterable> {
    component.fields()
}

#[derive(FieldPathIterable)]
struct Entity {
    id: u64,
    #[field_paths(probe = component_fields, readonly)]
    component: Box<dyn Component>,
}

fn names<R: 'static>(paths: &[PartialFieldPath<R>]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

#[test]
fn one_path_per_field_in_declaration_order() {
    let paths = Point::declared_paths();
    assert_eq!(names(&paths), ["x", "y"]);
    assert!(paths.iter().all(|p| p.root_type().is::<Point>()));
    assert!(paths.iter().all(|p| p.target_type().is::<i32>()));
    assert!(paths.iter().all(|p| p.is_writable()));
    assert!(Point::additional_paths().is_empty());
}

#[test]
fn named_struct() {
    let mut line = Line {
        a: Point { x: 1, y: 2 },
        b: Point { x: 3, y: 4 },
        label: "line".to_string(),
    };

    assert_eq!(names(&Line::declared_paths()), ["a", "b", "label"]);
    assert_eq!(
        names(&line.recursive_paths()),
        ["a", "a.x", "a.y", "b", "b.x", "b.y", "label"]
    );

    let ints: Vec<i32> = line.recursive_paths_to::<i32>().iter().map(|p| *p.get(&line)).collect();
    assert_eq!(ints, [1, 2, 3, 4]);

    let writable: Vec<String> = line
        .recursive_writable_paths_to::<i32>()
        .iter()
        .map(|p| p.to_string())
        .collect();
    assert_eq!(writable, ["a.x", "a.y"]);

    let label = line.writable_paths_to::<String>().remove(0);
    label.set(&mut line, "renamed".to_string());
    assert_eq!(line.label, "renamed");
}

#[test]
fn iterable_fields_are_descended_without_attributes() {
    let mut segment = Segment {
        start: Point { x: 1, y: 2 },
        end: Box::new(Point { x: 3, y: 4 }),
        weight: 0.5,
    };
    assert_eq!(
        names(&segment.recursive_paths()),
        ["start", "start.x", "start.y", "end", "end.x", "end.y", "weight"]
    );

    let ints: Vec<i32> = segment
        .recursive_paths_to::<i32>()
        .iter()
        .map(|p| *p.get(&segment))
        .collect();
    assert_eq!(ints, [1, 2, 3, 4]);

    for path in segment.recursive_writable_paths_to::<i32>() {
        *path.get_mut(&mut segment) += 10;
    }
    assert_eq!(segment.end.y, 14);

    let paths = segment.direct_paths();
    assert!(paths[0].probe(&segment).is_some());
    assert!(paths[2].probe(&segment).is_none());
}

#[test]
fn tuple_struct() {
    let mut tuple = Tuple(4, 5.0, "sixth".to_string());
    let paths = tuple.direct_paths();
    assert_eq!(names(&paths), ["0", "1", "2"]);
    assert!(paths[0].is_writable());
    assert!(!paths[1].is_writable());

    assert_eq!(*tuple.paths_to::<f32>()[0].get(&tuple), 5.0);
    let last = tuple.writable_paths_to::<String>().remove(0);
    *last.get_mut(&mut tuple) = "eighth".to_string();
    assert_eq!(tuple.2, "eighth");
}

#[test]
fn raw_identifiers_are_unescaped() {
    let k = Keywords { r#type: 3 };
    let paths = k.paths_to::<u8>();
    assert_eq!(paths[0].to_string(), "type");
    assert_eq!(*paths[0].get(&k), 3);
}

#[test]
fn generic_struct() {
    let w = Wrapper {
        inner: Point { x: 7, y: 8 },
        count: 1,
    };
    assert_eq!(names(&w.recursive_paths()), ["inner", "inner.x", "inner.y", "count"]);

    let boxed = Wrapper {
        inner: Box::new(Point { x: 1, y: 2 }),
        count: 2,
    };
    let values: Vec<i32> = boxed.recursive_paths_to::<i32>().iter().map(|p| *p.get(&boxed)).collect();
    assert_eq!(values, [1, 2]);
}

#[test]
fn additional_paths_come_last() {
    let rect = Rect {
        origin: Point { x: -1, y: -2 },
        width: 10,
    };
    assert_eq!(names(&Rect::declared_paths()), ["origin", "width"]);
    assert_eq!(names(&Rect::all_paths()), ["origin", "width", "left"]);
    assert_eq!(
        names(&rect.recursive_paths()),
        ["origin", "origin.x", "origin.y", "width", "left"]
    );
    let left = rect.paths_to::<i32>().into_iter().find(|p| p.to_string() == "left").unwrap();
    assert_eq!(*left.get(&rect), -1);
    assert!(!left.is_writable());
}

#[test]
fn probed_field() {
    let entity = Entity {
        id: 1,
        component: Box::new(Point { x: 0, y: 0 }),
    };
    let paths = entity.direct_paths();
    assert_eq!(names(&paths), ["id", "component"]);
    assert!(!paths[1].is_writable());
    assert!(paths[1].probe(&entity).is_some());
    assert!(paths[0].probe(&entity).is_none());
    // the component's paths are rooted at `Point`, which is not the field type
    assert_eq!(entity.recursive_paths(), entity.direct_paths());
}
