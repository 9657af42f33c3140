use core::any::Any;

use super::{Field, Shape};

/// The semantic definition of a shape: is it a scalar, a struct, a list?
///
/// Composite definitions refer to their inner shapes through
/// `fn() -> &'static Shape` and carry type-erased operations on
/// `&mut dyn Any` slots. Every operation reports a slot of the wrong type by
/// returning `None`/`false` rather than panicking.
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub enum Def {
    /// Scalar, decoded by one of the scalar methods of a source.
    Scalar(ScalarType),

    /// Something that owns exactly one value of another shape and may be
    /// replaced wholesale, e.g. `Box<T>`, `Option<T>`, `Arc<T>`.
    Pointer(PointerDef),

    /// Struct with named fields.
    Struct(StructDef),

    /// Growable list, e.g. `Vec<T>`.
    List(ListDef),

    /// Fixed-size array, e.g. `[T; 3]`.
    Array(ArrayDef),

    /// Key/value map, e.g. `HashMap<K, V>`.
    Map(MapDef),

    /// No structure the decoder can work with. Types with a text constructor
    /// use this and are decoded from a string.
    Opaque,
}

/// Scalar kinds understood by the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ScalarType {
    /// `bool`
    Bool,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `String`
    String,
}

/// Installs a freshly decoded pointee into a pointer slot.
pub type PointerSetFn = fn(target: &mut dyn Any, pointee: Box<dyn Any>) -> bool;

/// Describes a pointer-like shape.
#[derive(Clone, Copy, Debug)]
pub struct PointerDef {
    /// shape of the pointee
    pub pointee: fn() -> &'static Shape,

    /// replaces the pointer in `target` with one owning `pointee`
    pub set: PointerSetFn,
}

/// Describes a struct shape.
#[derive(Clone, Copy, Debug)]
pub struct StructDef {
    /// all decodable fields, in declaration order
    pub fields: &'static [Field],
}

/// Appends a zero element to a list and returns it.
pub type ListPushFn = fn(target: &mut dyn Any) -> Option<&mut dyn Any>;

/// Describes a list shape.
#[derive(Clone, Copy, Debug)]
pub struct ListDef {
    /// shape of the elements
    pub element: fn() -> &'static Shape,

    /// appends a zero element and hands out the new slot
    pub push_zero: ListPushFn,
}

/// Returns the element at `index` of a fixed-size array.
pub type ArrayGetFn = fn(target: &mut dyn Any, index: usize) -> Option<&mut dyn Any>;

/// Describes a fixed-size array shape.
#[derive(Clone, Copy, Debug)]
pub struct ArrayDef {
    /// shape of the elements
    pub element: fn() -> &'static Shape,

    /// number of elements
    pub len: usize,

    /// mutable access to one element
    pub get_mut: ArrayGetFn,
}

/// Inserts a decoded key and value into a map.
pub type MapInsertFn = fn(target: &mut dyn Any, key: Box<dyn Any>, value: Box<dyn Any>) -> bool;

/// Replaces a value wholesale.
pub type AssignFn = fn(target: &mut dyn Any, value: Box<dyn Any>) -> bool;

/// Describes a map shape.
#[derive(Clone, Copy, Debug)]
pub struct MapDef {
    /// shape of the keys
    pub key: fn() -> &'static Shape,

    /// shape of the values
    pub value: fn() -> &'static Shape,

    /// inserts one pair
    pub insert: MapInsertFn,

    /// replaces the map in `target` with another map of the same type
    pub assign: AssignFn,
}
