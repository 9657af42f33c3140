use super::*;
use crate::Unravel;

fn resolved<T: Unravel>(tag_key: &str) -> Vec<(&'static str, Vec<usize>)> {
    let Def::Struct(def) = T::SHAPE.def else {
        panic!("{} is not a struct", T::SHAPE);
    };
    resolve_fields(&def, tag_key)
        .into_iter()
        .map(|field| (field.name, field.path))
        .collect()
}

#[derive(Unravel)]
struct Plain {
    pub name: String,
    #[unravel(json = "age")]
    pub age_in_years: i64,
    #[unravel(json = "-")]
    pub skip_this: String,
    #[unravel(json = ",omitempty")]
    pub height: f32,
    #[allow(dead_code)]
    note: String,
}

#[unravel_testhelpers::test]
fn tag_rules() {
    assert_eq!(
        resolved::<Plain>("json"),
        vec![("name", vec![0]), ("age", vec![1]), ("height", vec![3])]
    );
}

#[unravel_testhelpers::test]
fn other_tag_key_ignores_json_tags() {
    assert_eq!(
        resolved::<Plain>("url"),
        vec![
            ("name", vec![0]),
            ("age_in_years", vec![1]),
            ("skip_this", vec![2]),
            ("height", vec![3]),
        ]
    );
}

#[derive(Unravel)]
struct ExplicitOverride {
    pub a: String,
    #[unravel(json = "a")]
    pub b: String,
}

#[unravel_testhelpers::test]
fn explicit_wins_at_same_depth() {
    assert_eq!(resolved::<ExplicitOverride>("json"), vec![("a", vec![1])]);
}

#[derive(Unravel)]
struct First {
    pub a: String,
}

#[derive(Unravel)]
struct Second {
    pub a: String,
}

#[derive(Unravel)]
struct SecondTagged {
    #[unravel(json = "a")]
    pub a: String,
}

#[derive(Unravel)]
struct Conflict {
    #[unravel(embed)]
    pub first: First,
    #[unravel(embed)]
    pub second: Second,
}

#[unravel_testhelpers::test]
fn ambiguous_embedded_names_are_dropped() {
    assert_eq!(resolved::<Conflict>("json"), vec![]);
}

#[derive(Unravel)]
struct ConflictWithTag {
    #[unravel(embed)]
    pub first: First,
    #[unravel(embed)]
    pub second: SecondTagged,
}

#[unravel_testhelpers::test]
fn explicit_embedded_name_breaks_tie() {
    assert_eq!(resolved::<ConflictWithTag>("json"), vec![("a", vec![1, 0])]);
}

#[derive(Unravel)]
struct Shallow {
    #[unravel(embed)]
    pub first: First,
    pub a: String,
}

#[unravel_testhelpers::test]
fn shallower_field_wins() {
    assert_eq!(resolved::<Shallow>("json"), vec![("a", vec![1])]);
}

#[derive(Unravel)]
struct DeepTagged {
    #[unravel(embed)]
    pub second: SecondTagged,
    pub a: String,
}

#[unravel_testhelpers::test]
fn shallower_field_wins_over_deeper_explicit() {
    assert_eq!(resolved::<DeepTagged>("json"), vec![("a", vec![1])]);
}

#[derive(Unravel)]
struct NamedEmbedding {
    #[unravel(embed, json = "first")]
    pub first: First,
    pub a: String,
}

#[unravel_testhelpers::test]
fn embedding_with_explicit_name_is_a_plain_field() {
    assert_eq!(
        resolved::<NamedEmbedding>("json"),
        vec![("first", vec![0]), ("a", vec![1])]
    );
}

#[derive(Unravel)]
struct EmbeddingNamedLikeField {
    #[unravel(embed, json = "a")]
    pub first: First,
    pub a: String,
}

#[unravel_testhelpers::test]
fn embedding_with_explicit_name_wins_over_implicit_field() {
    assert_eq!(
        resolved::<EmbeddingNamedLikeField>("json"),
        vec![("a", vec![0])]
    );
}

#[derive(Unravel)]
struct EmbeddedPointer {
    #[unravel(embed)]
    pub first: Option<Box<First>>,
}

#[unravel_testhelpers::test]
fn embedded_non_struct_is_a_named_field() {
    assert_eq!(resolved::<EmbeddedPointer>("json"), vec![("first", vec![0])]);
}

#[derive(Unravel)]
struct ManyFirst {
    pub a: String,
    pub b: String,
    #[unravel(json = "d")]
    pub d: String,
}

#[derive(Unravel)]
struct ManySecond {
    pub a: String,
    #[unravel(json = "c")]
    pub b: String,
    pub d: String,
}

#[derive(Unravel)]
struct Many {
    #[unravel(embed)]
    pub first: ManyFirst,
    #[unravel(embed)]
    pub second: ManySecond,
}

#[unravel_testhelpers::test]
fn multiple_embedded_structs() {
    assert_eq!(
        resolved::<Many>("json"),
        vec![("b", vec![0, 1]), ("d", vec![0, 2]), ("c", vec![1, 1])]
    );
}

#[derive(Unravel)]
struct Inner {
    pub z: String,
}

#[derive(Unravel)]
struct Middle {
    #[unravel(embed)]
    pub inner: Inner,
    pub y: String,
}

#[derive(Unravel)]
struct Outer {
    pub x: String,
    #[unravel(embed)]
    pub middle: Middle,
}

#[unravel_testhelpers::test]
fn promotion_is_transitive_and_ordered_by_discovery() {
    assert_eq!(
        resolved::<Outer>("json"),
        vec![("x", vec![0]), ("y", vec![1, 1]), ("z", vec![1, 0, 0])]
    );
}

#[unravel_testhelpers::test]
fn slot_reaches_promoted_field() {
    let Def::Struct(def) = Outer::SHAPE.def else {
        unreachable!()
    };
    let fields = resolve_fields(&def, "json");
    let z = fields.iter().find(|f| f.name == "z").unwrap();
    assert_eq!(z.depth(), 2);

    let mut outer = Outer::zero();
    let slot = z.slot(&mut outer).unwrap();
    *slot.downcast_mut::<String>().unwrap() = "deep".to_owned();
    assert_eq!(outer.middle.inner.z, "deep");

    let mut wrong = 0u8;
    assert!(z.slot(&mut wrong).is_none());
}

#[unravel_testhelpers::test]
fn cache_returns_the_same_resolution() {
    let cache = FieldCache::new();
    let a = cache.fields_of(Many::SHAPE, "json").unwrap();
    let b = cache.fields_of(Many::SHAPE, "json").unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    let url = cache.fields_of(Many::SHAPE, "url").unwrap();
    assert!(!Arc::ptr_eq(&a, &url));

    assert!(cache.fields_of(u8::SHAPE, "json").is_none());
}
