//! The capability contract a data adapter implements so the decoder can pull
//! values out of it.

use crate::Error;

mod string;
pub use string::*;

/// A boxed source, as handed out by [`Source::get`] and the iterators.
pub type SourceBox<'a> = Box<dyn Source + 'a>;

/// Lazy, finite, single-pass sequence of child values.
pub type Values<'a> = Box<dyn Iterator<Item = Result<SourceBox<'a>, Error>> + 'a>;

/// Lazy, finite, single-pass sequence of key/value pairs.
pub type KeyValues<'a> = Box<dyn Iterator<Item = Result<(SourceBox<'a>, SourceBox<'a>), Error>> + 'a>;

/// One node of the data being decoded.
///
/// Every method defaults to [`Error::not_supported`], so an adapter only
/// implements the capabilities its data actually has. Methods need not be pure:
/// a source may produce fresh (even random) values on every call, or consume a
/// stream.
pub trait Source {
    /// Reads the value as a boolean.
    fn bool(&self) -> Result<bool, Error> {
        Err(Error::not_supported())
    }

    /// Reads the value as a signed integer.
    fn int(&self) -> Result<i64, Error> {
        Err(Error::not_supported())
    }

    /// Reads the value as an unsigned integer.
    fn uint(&self) -> Result<u64, Error> {
        Err(Error::not_supported())
    }

    /// Reads the value as a float.
    fn float(&self) -> Result<f64, Error> {
        Err(Error::not_supported())
    }

    /// Reads the value as a string.
    fn string(&self) -> Result<String, Error> {
        Err(Error::not_supported())
    }

    /// Returns the child named `key`.
    ///
    /// Fails with [`Error::no_value`] if the value has children but not this
    /// one, and with [`Error::not_supported`] if it has no children at all.
    fn get(&self, key: &str) -> Result<SourceBox<'_>, Error> {
        let _ = key;
        Err(Error::not_supported())
    }

    /// Iterates the value as a sequence.
    fn iterate(&self) -> Result<Values<'_>, Error> {
        Err(Error::not_supported())
    }

    /// Iterates the value as a mapping.
    fn iterate_key_values(&self) -> Result<KeyValues<'_>, Error> {
        Err(Error::not_supported())
    }

    /// Exposes exact-width numeric access, if the source has it. The decoder
    /// prefers it over [`int`](Source::int), [`uint`](Source::uint) and
    /// [`float`](Source::float).
    fn sized(&self) -> Option<&dyn SizedSource> {
        None
    }
}

/// Exact-width numeric access, e.g. for binary protocols.
pub trait SizedSource {
    /// Reads an `i8`.
    fn i8(&self) -> Result<i8, Error>;
    /// Reads an `i16`.
    fn i16(&self) -> Result<i16, Error>;
    /// Reads an `i32`.
    fn i32(&self) -> Result<i32, Error>;
    /// Reads an `i64`.
    fn i64(&self) -> Result<i64, Error>;
    /// Reads a `u8`.
    fn u8(&self) -> Result<u8, Error>;
    /// Reads a `u16`.
    fn u16(&self) -> Result<u16, Error>;
    /// Reads a `u32`.
    fn u32(&self) -> Result<u32, Error>;
    /// Reads a `u64`.
    fn u64(&self) -> Result<u64, Error>;
    /// Reads an `f32`.
    fn f32(&self) -> Result<f32, Error>;
    /// Reads an `f64`.
    fn f64(&self) -> Result<f64, Error>;
}

macro_rules! forward_source {
    ($($ty:ty),*) => {$(
        impl<S: Source + ?Sized> Source for $ty {
            fn bool(&self) -> Result<bool, Error> {
                (**self).bool()
            }

            fn int(&self) -> Result<i64, Error> {
                (**self).int()
            }

            fn uint(&self) -> Result<u64, Error> {
                (**self).uint()
            }

            fn float(&self) -> Result<f64, Error> {
                (**self).float()
            }

            fn string(&self) -> Result<String, Error> {
                (**self).string()
            }

            fn get(&self, key: &str) -> Result<SourceBox<'_>, Error> {
                (**self).get(key)
            }

            fn iterate(&self) -> Result<Values<'_>, Error> {
                (**self).iterate()
            }

            fn iterate_key_values(&self) -> Result<KeyValues<'_>, Error> {
                (**self).iterate_key_values()
            }

            fn sized(&self) -> Option<&dyn SizedSource> {
                (**self).sized()
            }
        }
    )*};
}

forward_source!(&S, Box<S>);
