//! Setters for scalars and text constructors.

use core::any::Any;
use core::fmt::Display;
use std::sync::Arc;

use crate::{Error, ParseFn, ScalarType, SizedSource, Source, Unravel};

/// A compiled decoding procedure for one shape: reads `source` and writes the
/// result into `target`, which must hold a value of that shape.
pub type Setter = Arc<dyn Fn(&dyn Source, &mut dyn Any) -> Result<(), Error> + Send + Sync>;

/// Boxes a closure as a [`Setter`], pinning down its higher-ranked signature.
pub(crate) fn setter<F>(f: F) -> Setter
where
    F: Fn(&dyn Source, &mut dyn Any) -> Result<(), Error> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Writes `value` into a slot of type `T`.
fn store<T: Unravel>(target: &mut dyn Any, value: T) -> Result<(), Error> {
    let slot = target
        .downcast_mut::<T>()
        .ok_or_else(|| Error::wrong_shape(T::SHAPE))?;
    *slot = value;
    Ok(())
}

/// Narrows a value read through the generic accessors, failing with
/// out-of-range instead of truncating.
fn narrow<T, V>(value: V) -> Result<T, Error>
where
    T: Unravel + TryFrom<V>,
    V: Copy + Display,
{
    T::try_from(value).map_err(|_| Error::out_of_range(T::SHAPE, value))
}

/// Narrows to `f32`. Finite values too large for `f32` are out of range,
/// precision loss is not.
fn narrow_float(value: f64) -> Result<f32, Error> {
    let narrowed = value as f32;
    match value.is_finite() && !narrowed.is_finite() {
        true => Err(Error::out_of_range(f32::SHAPE, value)),
        false => Ok(narrowed),
    }
}

fn signed<T>(read: fn(&dyn SizedSource) -> Result<T, Error>) -> Setter
where
    T: Unravel + TryFrom<i64>,
{
    setter(move |source, target| {
        let value = match source.sized() {
            Some(sized) => read(sized)?,
            None => narrow(source.int()?)?,
        };
        store(target, value)
    })
}

fn unsigned<T>(read: fn(&dyn SizedSource) -> Result<T, Error>) -> Setter
where
    T: Unravel + TryFrom<u64>,
{
    setter(move |source, target| {
        let value = match source.sized() {
            Some(sized) => read(sized)?,
            None => narrow(source.uint()?)?,
        };
        store(target, value)
    })
}

/// Returns the setter for a scalar type.
pub(crate) fn scalar(ty: ScalarType) -> Setter {
    match ty {
        ScalarType::Bool => setter(|source, target| store(target, source.bool()?)),
        ScalarType::String => setter(|source, target| store(target, source.string()?)),

        ScalarType::I8 => signed::<i8>(|s| s.i8()),
        ScalarType::I16 => signed::<i16>(|s| s.i16()),
        ScalarType::I32 => signed::<i32>(|s| s.i32()),
        ScalarType::I64 => signed::<i64>(|s| s.i64()),
        ScalarType::Isize => signed::<isize>(|s| narrow(s.i64()?)),

        ScalarType::U8 => unsigned::<u8>(|s| s.u8()),
        ScalarType::U16 => unsigned::<u16>(|s| s.u16()),
        ScalarType::U32 => unsigned::<u32>(|s| s.u32()),
        ScalarType::U64 => unsigned::<u64>(|s| s.u64()),
        ScalarType::Usize => unsigned::<usize>(|s| narrow(s.u64()?)),

        ScalarType::F32 => setter(|source, target| {
            let value = match source.sized() {
                Some(sized) => sized.f32()?,
                None => narrow_float(source.float()?)?,
            };
            store(target, value)
        }),
        ScalarType::F64 => setter(|source, target| {
            let value = match source.sized() {
                Some(sized) => sized.f64()?,
                None => source.float()?,
            };
            store(target, value)
        }),
    }
}

/// Returns a setter that reads a string and hands it to a text constructor.
pub(crate) fn text(parse: ParseFn) -> Setter {
    setter(move |source, target| {
        let text = source.string()?;
        parse(&text, target)
    })
}
