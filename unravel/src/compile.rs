//! Turns shapes into setters.

use core::any::TypeId;
use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::cache::SetterCache;
use crate::setter::{self, Setter, setter};
use crate::{
    ArrayDef, DecoderConfig, Def, Error, FieldCache, ListDef, MapDef, PathSegment, PointerDef,
    Shape,
};

/// State of one compilation, started from a single top-level shape.
///
/// Setters compiled along the way are staged and committed to the shared cache
/// only after the top-level shape compiled successfully. A failed compilation
/// commits nothing.
pub(crate) struct Compiler<'d> {
    config: &'d DecoderConfig,
    setters: &'d SetterCache,
    fields: &'d FieldCache,
    staged: HashMap<TypeId, (&'static Shape, Setter)>,
    in_construction: HashSet<TypeId>,
}

impl<'d> Compiler<'d> {
    pub(crate) fn new(
        config: &'d DecoderConfig,
        setters: &'d SetterCache,
        fields: &'d FieldCache,
    ) -> Self {
        Self {
            config,
            setters,
            fields,
            staged: HashMap::new(),
            in_construction: HashSet::new(),
        }
    }

    /// Compiles `shape` and everything it depends on, commits the results to
    /// the cache and returns the committed setter of `shape`.
    pub(crate) fn compile(mut self, shape: &'static Shape) -> Result<Setter, Error> {
        let compiled = self.setter_of(shape)?;

        for (_, (staged_shape, staged)) in self.staged.drain() {
            self.setters.commit(staged_shape, staged);
        }

        Ok(self.setters.commit(shape, compiled))
    }

    fn setter_of(&mut self, shape: &'static Shape) -> Result<Setter, Error> {
        let id = shape.id.get();

        if let Some(cached) = self.setters.get(shape) {
            trace!(%shape, "setter cache hit");
            return Ok(cached);
        }

        if let Some((_, staged)) = self.staged.get(&id) {
            return Ok(staged.clone());
        }

        if self.in_construction.contains(&id) {
            trace!(%shape, "cycle detected, deferring to the cache");
            return Ok(self.setters.thunk(shape));
        }

        self.in_construction.insert(id);
        let compiled = self.make_setter(shape)?;
        self.in_construction.remove(&id);

        debug!(%shape, tag = self.config.tag(), "compiled setter");
        self.staged.insert(id, (shape, compiled.clone()));

        Ok(compiled)
    }

    fn make_setter(&mut self, shape: &'static Shape) -> Result<Setter, Error> {
        // a text constructor takes priority over the structure
        if let Some(parse) = shape.parse {
            return Ok(setter::text(parse));
        }

        match shape.def {
            Def::Scalar(ty) => Ok(setter::scalar(ty)),
            Def::Pointer(def) => self.pointer_setter(shape, def),
            Def::Struct(_) => self.struct_setter(shape),
            Def::List(def) => self.list_setter(shape, def),
            Def::Array(def) => self.array_setter(shape, def),
            Def::Map(def) => self.map_setter(shape, def),
            Def::Opaque => Err(Error::unsupported_shape(shape)),
        }
    }

    fn pointer_setter(&mut self, shape: &'static Shape, def: PointerDef) -> Result<Setter, Error> {
        let pointee = (def.pointee)();
        let pointee_setter = self.setter_of(pointee)?;
        let set = def.set;

        Ok(setter(move |source, target| {
            // decode into a fresh pointee first, the target stays untouched on failure
            let mut value = (pointee.zero)();
            pointee_setter(source, &mut *value)?;

            match set(target, value) {
                true => Ok(()),
                false => Err(Error::wrong_shape(shape)),
            }
        }))
    }

    fn struct_setter(&mut self, shape: &'static Shape) -> Result<Setter, Error> {
        let fields = self
            .fields
            .fields_of(shape, self.config.tag())
            .ok_or_else(|| Error::unsupported_shape(shape))?;

        let mut setters = Vec::with_capacity(fields.len());
        for field in fields.iter() {
            let field_setter = self
                .setter_of(field.shape)
                .map_err(|err| err.within(PathSegment::Field(field.name)))?;
            setters.push(field_setter);
        }

        let require_values = self.config.require_values();

        Ok(setter(move |source, target| {
            for (field, field_setter) in fields.iter().zip(&setters) {
                let child = match source.get(field.name) {
                    Ok(child) => child,
                    Err(err) if err.is_no_value() && !require_values => {
                        trace!(field = field.name, "no value, skipping field");
                        continue;
                    }
                    Err(err) => return Err(err.within(PathSegment::Field(field.name))),
                };

                let slot = field
                    .slot(&mut *target)
                    .ok_or_else(|| Error::wrong_shape(shape))?;

                field_setter(&*child, slot).map_err(|err| err.within(PathSegment::Field(field.name)))?;
            }

            Ok(())
        }))
    }

    fn list_setter(&mut self, shape: &'static Shape, def: ListDef) -> Result<Setter, Error> {
        let element_setter = self.setter_of((def.element)())?;
        let push_zero = def.push_zero;

        Ok(setter(move |source, target| {
            for (index, element) in source.iterate()?.enumerate() {
                let element = element.map_err(|err| err.within(PathSegment::Index(index)))?;

                // grow by one zero element, then decode into it
                let slot = push_zero(&mut *target).ok_or_else(|| Error::wrong_shape(shape))?;
                element_setter(&*element, slot)
                    .map_err(|err| err.within(PathSegment::Index(index)))?;
            }

            Ok(())
        }))
    }

    fn array_setter(&mut self, shape: &'static Shape, def: ArrayDef) -> Result<Setter, Error> {
        let element_setter = self.setter_of((def.element)())?;
        let ArrayDef { len, get_mut, .. } = def;

        Ok(setter(move |source, target| {
            // takes at most `len` elements, the rest is not drained
            let mut elements = source.iterate()?;

            for index in 0..len {
                let Some(element) = elements.next() else {
                    break;
                };
                let element = element.map_err(|err| err.within(PathSegment::Index(index)))?;

                let slot = get_mut(&mut *target, index).ok_or_else(|| Error::wrong_shape(shape))?;
                element_setter(&*element, slot)
                    .map_err(|err| err.within(PathSegment::Index(index)))?;
            }

            Ok(())
        }))
    }

    fn map_setter(&mut self, shape: &'static Shape, def: MapDef) -> Result<Setter, Error> {
        let key_shape = (def.key)();
        let value_shape = (def.value)();
        let key_setter = self.setter_of(key_shape)?;
        let value_setter = self.setter_of(value_shape)?;
        let MapDef { insert, assign, .. } = def;

        Ok(setter(move |source, target| {
            // collect into a fresh map and replace the target only on success
            let mut map = (shape.zero)();

            for (index, pair) in source.iterate_key_values()?.enumerate() {
                let (key_source, value_source) =
                    pair.map_err(|err| err.within(PathSegment::MapKey(index)))?;

                let mut key = (key_shape.zero)();
                key_setter(&*key_source, &mut *key)
                    .map_err(|err| err.within(PathSegment::MapKey(index)))?;

                let mut value = (value_shape.zero)();
                value_setter(&*value_source, &mut *value)
                    .map_err(|err| err.within(PathSegment::MapValue(index)))?;

                if !insert(&mut *map, key, value) {
                    return Err(Error::wrong_shape(shape));
                }
            }

            match assign(target, map) {
                true => Ok(()),
                false => Err(Error::wrong_shape(shape)),
            }
        }))
    }
}
