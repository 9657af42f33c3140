use core::any::Any;
use std::borrow::Cow;
use std::sync::{Arc, LazyLock};

use crate::cache::SetterCache;
use crate::compile::Compiler;
use crate::{Error, FieldCache, Setter, Shape, Source, Unravel};

/// Tag key used when none is configured.
pub const DEFAULT_TAG: &str = "json";

/// Immutable decoder configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    tag: Cow<'static, str>,
    require_values: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            tag: Cow::Borrowed(DEFAULT_TAG),
            require_values: false,
        }
    }
}

impl DecoderConfig {
    /// Uses `tag` as the key of the field tags that rename fields. An empty
    /// key falls back to [`DEFAULT_TAG`].
    pub fn with_tag(mut self, tag: impl Into<Cow<'static, str>>) -> Self {
        let tag = tag.into();
        self.tag = match tag.is_empty() {
            true => Cow::Borrowed(DEFAULT_TAG),
            false => tag,
        };
        self
    }

    /// Makes absent struct fields an error instead of leaving them untouched.
    pub fn with_require_values(mut self, require_values: bool) -> Self {
        self.require_values = require_values;
        self
    }

    /// The tag key.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whether absent struct fields are an error.
    pub fn require_values(&self) -> bool {
        self.require_values
    }
}

struct DecoderInner {
    config: DecoderConfig,
    setters: SetterCache,
    fields: FieldCache,
}

/// Decodes sources into values of any [`Unravel`] type.
///
/// Setters are compiled on first use of a type and cached for the lifetime of
/// the decoder. Cloning a decoder shares its cache; it can be used from many
/// threads at once.
#[derive(Clone)]
pub struct Decoder {
    inner: Arc<DecoderInner>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Decoder")
            .field("config", &self.inner.config)
            .field("setters", &self.inner.setters.len())
            .field("fields", &self.inner.fields)
            .finish()
    }
}

impl Decoder {
    /// Creates a decoder with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Creates a decoder with the given configuration.
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            inner: Arc::new(DecoderInner {
                config,
                setters: SetterCache::default(),
                fields: FieldCache::new(),
            }),
        }
    }

    /// The configuration of this decoder.
    pub fn config(&self) -> &DecoderConfig {
        &self.inner.config
    }

    /// Returns a decoder using `tag` as the tag key, with a cache of its own.
    /// Returns a clone of this decoder if it already uses `tag`.
    pub fn with_tag(&self, tag: impl Into<Cow<'static, str>>) -> Self {
        let config = self.config().clone().with_tag(tag);
        self.derive(config)
    }

    /// Returns a decoder that fails with [`ErrorKind::NoValue`](crate::ErrorKind::NoValue)
    /// when a struct field is absent from the source.
    pub fn require_values(&self) -> Self {
        let config = self.config().clone().with_require_values(true);
        self.derive(config)
    }

    fn derive(&self, config: DecoderConfig) -> Self {
        match config == self.inner.config {
            true => self.clone(),
            false => Self::with_config(config),
        }
    }

    /// Returns the setter for `shape`, compiling it on first use.
    ///
    /// The setter stays usable after the decoder is dropped. Asking again for
    /// the same shape returns the same setter.
    pub fn setter_for(&self, shape: &'static Shape) -> Result<Setter, Error> {
        let inner = &*self.inner;
        if let Some(setter) = inner.setters.exported(shape) {
            return Ok(setter);
        }

        let committed = match inner.setters.get(shape) {
            Some(setter) => setter,
            None => Compiler::new(&inner.config, &inner.setters, &inner.fields).compile(shape)?,
        };

        Ok(inner.setters.export(shape, committed))
    }

    /// Decodes `source` into `target`.
    ///
    /// On failure, `target` may already hold part of the decoded data.
    pub fn decode<T: Unravel>(&self, source: &dyn Source, target: &mut T) -> Result<(), Error> {
        let setter = self.setter_for(T::SHAPE)?;
        let target: &mut dyn Any = target;
        setter(source, target)
    }

    /// Decodes `source` into a new value of type `T`.
    pub fn decode_new<T: Unravel>(&self, source: &dyn Source) -> Result<T, Error> {
        let mut target = T::zero();
        self.decode(source, &mut target)?;
        Ok(target)
    }
}

static DEFAULT_DECODER: LazyLock<Decoder> = LazyLock::new(Decoder::new);

/// The process-wide decoder with the default configuration.
pub fn default_decoder() -> &'static Decoder {
    &DEFAULT_DECODER
}

/// Decodes `source` into `target` using the [`default_decoder`].
pub fn decode<T: Unravel>(source: &dyn Source, target: &mut T) -> Result<(), Error> {
    default_decoder().decode(source, target)
}

/// Decodes `source` into a new `T` using the [`default_decoder`].
pub fn decode_new<T: Unravel>(source: &dyn Source) -> Result<T, Error> {
    default_decoder().decode_new(source)
}
