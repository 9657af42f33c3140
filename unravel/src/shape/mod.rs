mod const_typeid;
pub use const_typeid::*;

mod def;
pub use def::*;

mod field;
pub use field::*;

use core::any::Any;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;

use crate::{Error, Unravel};

/// Produces a boxed zero value of a shape.
pub type ZeroFn = fn() -> Box<dyn Any>;

/// Constructs a value from text and writes it into `target`.
pub type ParseFn = fn(text: &str, target: &mut dyn Any) -> Result<(), Error>;

/// Schema for reflection of a type: everything the decoder needs to build a
/// setter for it.
///
/// Shapes are immutable, live in static memory and are compared by identity
/// (`id`).
#[derive(Clone, Copy)]
pub struct Shape {
    /// Unique type identifier from the compiler.
    pub id: ConstTypeId,

    /// Type name without generic parameters (e.g. `Vec`, not `Vec<String>`).
    pub type_identifier: &'static str,

    /// Full type name, as given by [`core::any::type_name`].
    pub type_name: fn() -> &'static str,

    /// What the type looks like structurally.
    pub def: Def,

    /// Allocates a zero value of the type.
    pub zero: ZeroFn,

    /// Text constructor. When present it takes priority over `def`.
    pub parse: Option<ParseFn>,
}

impl Shape {
    /// Starts building the shape of `T`.
    pub const fn builder<T: Unravel>(type_identifier: &'static str, def: Def) -> ShapeBuilder {
        ShapeBuilder {
            shape: Shape {
                id: ConstTypeId::of::<T>(),
                type_identifier,
                type_name: core::any::type_name::<T>,
                def,
                zero: zero_boxed::<T>,
                parse: None,
            },
        }
    }

    /// Returns true if this is the shape of `T`.
    #[inline]
    pub fn is_type<T: Unravel>(&self) -> bool {
        self.id == ConstTypeId::of::<T>()
    }

    /// Full type name, e.g. `alloc::vec::Vec<u8>`.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Returns true if the type can be constructed from text.
    #[inline]
    pub fn has_text_constructor(&self) -> bool {
        self.parse.is_some()
    }
}

impl PartialEq for Shape {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Shape {}

impl Hash for Shape {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl fmt::Debug for Shape {
    // Inner shapes are not followed: they may lead back here.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.def {
            Def::Scalar(_) => "scalar",
            Def::Pointer(_) => "pointer",
            Def::Struct(_) => "struct",
            Def::List(_) => "list",
            Def::Array(_) => "array",
            Def::Map(_) => "map",
            Def::Opaque => "opaque",
        };
        f.debug_struct("Shape")
            .field("type_name", &self.type_name())
            .field("kind", &kind)
            .field("text_constructor", &self.has_text_constructor())
            .finish()
    }
}

/// Builder for [`Shape`], usable in const contexts.
#[derive(Clone, Copy)]
pub struct ShapeBuilder {
    shape: Shape,
}

impl ShapeBuilder {
    /// Gives the shape a text constructor.
    pub const fn parse(mut self, parse: ParseFn) -> Self {
        self.shape.parse = Some(parse);
        self
    }

    /// Builds the final [`Shape`].
    pub const fn build(self) -> Shape {
        self.shape
    }
}

fn zero_boxed<T: Unravel>() -> Box<dyn Any> {
    Box::new(T::zero())
}

/// Text constructor backed by [`FromStr`], used by `#[unravel(from_str)]` and
/// the std types that parse from text.
pub fn parse_from_str<T>(text: &str, target: &mut dyn Any) -> Result<(), Error>
where
    T: Unravel + FromStr,
    T::Err: Into<Box<dyn core::error::Error + Send + Sync>>,
{
    let slot = target
        .downcast_mut::<T>()
        .ok_or_else(|| Error::wrong_shape(T::SHAPE))?;

    *slot = text
        .parse::<T>()
        .map_err(|err| Error::parse(T::SHAPE, err))?;

    Ok(())
}
