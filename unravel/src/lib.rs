#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

// Lets the derive output (which names `::unravel`) work inside this crate too.
extern crate self as unravel;

mod error;
pub use error::*;

mod shape;
pub use shape::*;

// Shapes of std types
mod impls;

mod source;
pub use source::*;

mod fields;
pub use fields::{FieldCache, ResolvedField, resolve_fields};

mod setter;
pub use setter::Setter;

mod cache;
mod compile;

mod decoder;
pub use decoder::*;

pub use unravel_macros::Unravel;

/// Gives access to the [`Shape`] of a type, which is what the [`Decoder`]
/// walks to build a setter for it.
///
/// Implement it with `#[derive(Unravel)]` for structs; the crate provides it
/// for scalars, `String`, `Box`/`Option`/`Rc`/`Arc`, `Vec`, arrays, `HashMap`,
/// `BTreeMap` and a handful of std types that parse from text.
pub trait Unravel: Sized + 'static {
    /// The shape of this type.
    const SHAPE: &'static Shape;

    /// The value a fresh slot of this type starts out with before decoding.
    fn zero() -> Self;
}

/// Returns the shape of `T`.
///
/// Usable as a `fn() -> &'static Shape`, which is how fields and containers
/// refer to inner shapes without creating const cycles for recursive types.
#[inline]
pub fn shape_of<T: Unravel>() -> &'static Shape {
    T::SHAPE
}
