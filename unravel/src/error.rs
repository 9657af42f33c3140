use core::fmt;

use crate::Shape;

type BoxError = Box<dyn core::error::Error + Send + Sync>;

/// Error returned by sources, setters and the decoder.
///
/// The [`kind`](Error::kind) is the root cause and is never replaced while the
/// error travels up through nested setters; each level only prepends its
/// location to the [`path`](Error::path).
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    path: Vec<PathSegment>,
}

/// What went wrong.
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The source has children, but not the requested one.
    NoValue,

    /// The source value cannot be read the requested way: it is not a number,
    /// has no children, is not iterable...
    NotSupported,

    /// No setter can be built for this shape.
    UnsupportedShape {
        /// The offending shape.
        shape: &'static Shape,
    },

    /// A number does not fit into the target width.
    OutOfRange {
        /// The target shape.
        shape: &'static Shape,
        /// The value as read from the source.
        value: String,
    },

    /// A text constructor rejected its input.
    Parse {
        /// The shape whose text constructor failed.
        shape: &'static Shape,
        /// The error returned by the text constructor.
        error: BoxError,
    },

    /// A cycle thunk ran before the setter of its shape was committed.
    Unresolved {
        /// The shape the thunk stands in for.
        shape: &'static Shape,
    },

    /// A type-erased slot did not hold the expected type.
    WrongShape {
        /// The shape the slot was expected to have.
        expected: &'static Shape,
    },

    /// Any other failure, typically raised by a source (I/O, decoding...).
    Custom(BoxError),
}

/// One step on the way from the decoded value to the place an error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A struct field, by resolved name.
    Field(&'static str),
    /// An element of a list or an array.
    Index(usize),
    /// The key of the n-th pair of a map.
    MapKey(usize),
    /// The value of the n-th pair of a map.
    MapValue(usize),
}

impl Error {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
        }
    }

    /// The source has children, but not the requested one.
    pub fn no_value() -> Self {
        Self::new(ErrorKind::NoValue)
    }

    /// The source value cannot be read the requested way.
    pub fn not_supported() -> Self {
        Self::new(ErrorKind::NotSupported)
    }

    /// No setter can be built for `shape`.
    pub fn unsupported_shape(shape: &'static Shape) -> Self {
        Self::new(ErrorKind::UnsupportedShape { shape })
    }

    /// `value` does not fit into `shape`.
    pub fn out_of_range(shape: &'static Shape, value: impl fmt::Display) -> Self {
        Self::new(ErrorKind::OutOfRange {
            shape,
            value: value.to_string(),
        })
    }

    /// The text constructor of `shape` failed.
    pub fn parse(shape: &'static Shape, error: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::Parse {
            shape,
            error: error.into(),
        })
    }

    /// Wraps any other error, e.g. an I/O error inside a source.
    pub fn custom(error: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::Custom(error.into()))
    }

    pub(crate) fn unresolved(shape: &'static Shape) -> Self {
        Self::new(ErrorKind::Unresolved { shape })
    }

    pub(crate) fn wrong_shape(expected: &'static Shape) -> Self {
        Self::new(ErrorKind::WrongShape { expected })
    }

    /// Prepends `segment` to the path of this error.
    #[must_use]
    pub fn within(mut self, segment: PathSegment) -> Self {
        self.path.insert(0, segment);
        self
    }

    /// The root cause.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Where the error occurred, outermost first. Empty if it occurred at the
    /// top-level value.
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Returns true if the root cause is [`ErrorKind::NoValue`].
    pub fn is_no_value(&self) -> bool {
        matches!(self.kind, ErrorKind::NoValue)
    }

    /// Returns true if the root cause is [`ErrorKind::NotSupported`] or
    /// [`ErrorKind::UnsupportedShape`].
    pub fn is_not_supported(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::NotSupported | ErrorKind::UnsupportedShape { .. }
        )
    }

    /// Returns true if the root cause is [`ErrorKind::OutOfRange`].
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind, ErrorKind::OutOfRange { .. })
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, ".{name}"),
            PathSegment::Index(index) => write!(f, "[{index}]"),
            PathSegment::MapKey(index) => write!(f, "{{key #{index}}}"),
            PathSegment::MapValue(index) => write!(f, "{{value #{index}}}"),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NoValue => write!(f, "no value"),
            ErrorKind::NotSupported => write!(f, "not supported"),
            ErrorKind::UnsupportedShape { shape } => {
                write!(f, "not supported: cannot decode into {shape}")
            }
            ErrorKind::OutOfRange { shape, value } => {
                write!(f, "value {value} out of range for {shape}")
            }
            ErrorKind::Parse { shape, error } => write!(f, "parse {shape}: {error}"),
            ErrorKind::Unresolved { shape } => {
                write!(f, "setter for {shape} used before it was compiled")
            }
            ErrorKind::WrongShape { expected } => {
                write!(f, "wrong shape: expected a slot of type {expected}")
            }
            ErrorKind::Custom(error) => write!(f, "{error}"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.path.is_empty() {
            write!(f, "$")?;
            for segment in &self.path {
                write!(f, "{segment}")?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{}", self.kind)
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Parse { error, .. } | ErrorKind::Custom(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}
