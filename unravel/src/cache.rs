use core::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::setter::{Setter, setter};
use crate::{Error, Shape};

type SetterMap = RwLock<HashMap<TypeId, Setter>>;

/// Compiled setters by shape. Entries are written once and never replaced.
#[derive(Default)]
pub(crate) struct SetterCache {
    setters: Arc<SetterMap>,

    /// Setters handed out to callers. Each one holds on to `setters`, so cycle
    /// thunks inside it resolve even after the decoder is gone.
    exported: SetterMap,
}

impl SetterCache {
    pub(crate) fn get(&self, shape: &'static Shape) -> Option<Setter> {
        self.setters.read().get(&shape.id.get()).cloned()
    }

    /// Stores the setter for `shape` unless another caller got there first,
    /// and returns whichever setter ends up in the cache.
    pub(crate) fn commit(&self, shape: &'static Shape, compiled: Setter) -> Setter {
        let mut setters = self.setters.write();
        Arc::clone(setters.entry(shape.id.get()).or_insert(compiled))
    }

    /// Returns a setter that looks up the real setter of `shape` when it runs.
    ///
    /// Stands in for a shape that is reached again while it is still being
    /// compiled. By the time it runs, the outer compilation has committed.
    /// Holds the cache weakly: cached setters must not own their own cache.
    pub(crate) fn thunk(&self, shape: &'static Shape) -> Setter {
        let setters: Weak<SetterMap> = Arc::downgrade(&self.setters);
        setter(move |source, target| {
            let resolved = setters
                .upgrade()
                .and_then(|setters| setters.read().get(&shape.id.get()).cloned());

            match resolved {
                Some(resolved) => resolved(source, target),
                None => Err(Error::unresolved(shape)),
            }
        })
    }

    /// Returns the setter previously handed out for `shape`, if any.
    pub(crate) fn exported(&self, shape: &'static Shape) -> Option<Setter> {
        self.exported.read().get(&shape.id.get()).cloned()
    }

    /// Wraps the committed setter of `shape` so it keeps the cache alive, and
    /// returns the same wrapper on every call.
    pub(crate) fn export(&self, shape: &'static Shape, committed: Setter) -> Setter {
        let mut exported = self.exported.write();
        let entry = exported.entry(shape.id.get()).or_insert_with(|| {
            let setters = Arc::clone(&self.setters);
            setter(move |source, target| {
                let _cache = &setters;
                committed(source, target)
            })
        });
        Arc::clone(entry)
    }

    pub(crate) fn len(&self) -> usize {
        self.setters.read().len()
    }
}
