use core::any::Any;
use core::fmt;

use super::Shape;

/// Projects a type-erased struct onto one of its fields.
///
/// Returns `None` if `target` is not the struct the field belongs to.
pub type FieldAccessFn = fn(target: &mut dyn Any) -> Option<&mut dyn Any>;

/// Describes a field in a struct
#[derive(Clone, Copy)]
pub struct Field {
    /// name of the field as written in the struct
    pub name: &'static str,

    /// shape of the inner type
    ///
    /// the layer of indirection allows for cyclic type definitions
    pub shape: fn() -> &'static Shape,

    /// tags attached via `#[unravel(key = "value")]`, in declaration order
    pub tags: &'static [Tag],

    /// embedding and other per-field flags
    pub flags: FieldFlags,

    /// mutable access to this field within its struct
    pub access: FieldAccessFn,
}

impl Field {
    /// Returns the shape of the inner type
    #[inline]
    pub fn shape(&self) -> &'static Shape {
        (self.shape)()
    }

    /// Looks up the value of the first tag with the given key.
    #[inline]
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags.iter().find(|tag| tag.key == key).map(|tag| tag.value)
    }

    /// Returns true if the field is an anonymous (embedded) member whose
    /// fields may be promoted into the enclosing struct.
    #[inline]
    pub fn is_embedded(&self) -> bool {
        self.flags.contains(FieldFlags::EMBEDDED)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("shape", &self.shape())
            .field("tags", &self.tags)
            .field("flags", &self.flags)
            .finish()
    }
}

/// One `key = "value"` entry of a field's tag list, e.g. `json = "age,omitempty"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tag {
    /// the tag key, matched against [`DecoderConfig::tag`](crate::DecoderConfig::tag)
    pub key: &'static str,

    /// the raw tag value: `name[,options...]` or `-`
    pub value: &'static str,
}

/// Bit flags for fields.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldFlags(u8);

impl FieldFlags {
    /// No flags set.
    pub const EMPTY: Self = Self(0);

    /// The field is embedded (`#[unravel(embed)]`).
    pub const EMBEDDED: Self = Self(1 << 0);

    /// Returns true if all flags in `other` are set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of both flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl fmt::Debug for FieldFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(Self::EMBEDDED) {
            write!(f, "EMBEDDED")
        } else {
            write!(f, "EMPTY")
        }
    }
}
