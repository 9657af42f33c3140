use core::num::{IntErrorKind, ParseIntError};
use core::str::FromStr;

use super::{SizedSource, Source};
use crate::{Error, Unravel};

/// Reads scalars out of a piece of text.
///
/// Integers are parsed in base 10, booleans accept `1 t T TRUE true True` and
/// `0 f F FALSE false False`. Text that does not parse is [`Error::not_supported`],
/// numbers that do not fit are [`Error::out_of_range`]. The text has no
/// children and cannot be iterated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StringSource<'a>(pub &'a str);

impl<'a> StringSource<'a> {
    /// Wraps `text`.
    pub fn new(text: &'a str) -> Self {
        Self(text)
    }

    /// The wrapped text.
    pub fn text(&self) -> &'a str {
        self.0
    }
}

fn parse_int<T>(text: &str) -> Result<T, Error>
where
    T: Unravel + FromStr<Err = ParseIntError>,
{
    text.parse::<T>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            Error::out_of_range(T::SHAPE, text)
        }
        _ => Error::not_supported(),
    })
}

fn parse_f32(text: &str) -> Result<f32, Error> {
    let value = text.parse::<f32>().map_err(|_| Error::not_supported())?;
    // Out-of-range text rounds to infinity instead of failing.
    if value.is_infinite() && !text.to_ascii_lowercase().contains("inf") {
        return Err(Error::out_of_range(f32::SHAPE, text));
    }
    Ok(value)
}

fn parse_f64(text: &str) -> Result<f64, Error> {
    let value = text.parse::<f64>().map_err(|_| Error::not_supported())?;
    if value.is_infinite() && !text.to_ascii_lowercase().contains("inf") {
        return Err(Error::out_of_range(f64::SHAPE, text));
    }
    Ok(value)
}

impl Source for StringSource<'_> {
    fn bool(&self) -> Result<bool, Error> {
        match self.0 {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(Error::not_supported()),
        }
    }

    fn int(&self) -> Result<i64, Error> {
        parse_int(self.0)
    }

    fn uint(&self) -> Result<u64, Error> {
        parse_int(self.0)
    }

    fn float(&self) -> Result<f64, Error> {
        parse_f64(self.0)
    }

    fn string(&self) -> Result<String, Error> {
        Ok(self.0.to_owned())
    }

    fn sized(&self) -> Option<&dyn SizedSource> {
        Some(self)
    }
}

impl SizedSource for StringSource<'_> {
    fn i8(&self) -> Result<i8, Error> {
        parse_int(self.0)
    }

    fn i16(&self) -> Result<i16, Error> {
        parse_int(self.0)
    }

    fn i32(&self) -> Result<i32, Error> {
        parse_int(self.0)
    }

    fn i64(&self) -> Result<i64, Error> {
        parse_int(self.0)
    }

    fn u8(&self) -> Result<u8, Error> {
        parse_int(self.0)
    }

    fn u16(&self) -> Result<u16, Error> {
        parse_int(self.0)
    }

    fn u32(&self) -> Result<u32, Error> {
        parse_int(self.0)
    }

    fn u64(&self) -> Result<u64, Error> {
        parse_int(self.0)
    }

    fn f32(&self) -> Result<f32, Error> {
        parse_f32(self.0)
    }

    fn f64(&self) -> Result<f64, Error> {
        parse_f64(self.0)
    }
}
