//! Struct field resolution: which source key feeds which (possibly promoted)
//! field of a struct.

use core::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::trace;

use crate::{Def, Field, FieldAccessFn, Shape, StructDef};

#[cfg(test)]
mod tests;

/// A decodable field of a struct, after renaming and embedding promotion.
#[derive(Clone)]
pub struct ResolvedField {
    /// The key looked up in the source.
    pub name: &'static str,

    /// Shape of the field.
    pub shape: &'static Shape,

    /// Position of the field: index into the outer struct's fields, then into
    /// the fields of each embedded struct on the way down.
    pub path: Vec<usize>,

    access: Vec<FieldAccessFn>,
}

impl ResolvedField {
    /// Walks from the outer struct down to this field.
    ///
    /// Returns `None` if `target` is not the struct this field was resolved for.
    pub fn slot<'t>(&self, target: &'t mut dyn Any) -> Option<&'t mut dyn Any> {
        self.access
            .iter()
            .try_fold(target, |slot, access| access(slot))
    }

    /// Nesting depth: 0 for a direct field of the outer struct.
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }
}

impl core::fmt::Debug for ResolvedField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResolvedField")
            .field("name", &self.name)
            .field("shape", &self.shape.type_name())
            .field("path", &self.path)
            .finish()
    }
}

/// How a field got its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Naming {
    /// From the tag.
    Explicit,
    /// From the field itself.
    Implicit,
}

/// Returns the name under which `field` is looked up, or `None` if the tag
/// says to skip it.
fn name_of(field: &Field, tag_key: &str) -> Option<(&'static str, Naming)> {
    let tag = match field.tag(tag_key) {
        None | Some("") => return Some((field.name, Naming::Implicit)),
        Some("-") => return None,
        Some(tag) => tag,
    };

    match tag.split_once(',') {
        None => Some((tag, Naming::Explicit)),
        Some(("", _)) => Some((field.name, Naming::Implicit)),
        Some((name, _)) => Some((name, Naming::Explicit)),
    }
}

struct Candidate {
    naming: Naming,
    field: ResolvedField,
}

/// Resolves the fields of a struct for the given tag key.
///
/// Fields of embedded structs are promoted into the outer namespace,
/// breadth-first. For each name the shallowest candidate wins; among several
/// at the same depth the only explicitly tagged one wins; otherwise the name
/// is ambiguous and dropped. The result is ordered by first appearance.
pub fn resolve_fields(def: &StructDef, tag_key: &str) -> Vec<ResolvedField> {
    struct Queued {
        fields: &'static [Field],
        path: Vec<usize>,
        access: Vec<FieldAccessFn>,
    }

    let mut queue = std::collections::VecDeque::from([Queued {
        fields: def.fields,
        path: Vec::new(),
        access: Vec::new(),
    }]);

    let mut candidates: IndexMap<&'static str, Vec<Candidate>> = IndexMap::new();

    while let Some(item) = queue.pop_front() {
        for (index, field) in item.fields.iter().enumerate() {
            let Some((name, naming)) = name_of(field, tag_key) else {
                continue;
            };

            let mut path = item.path.clone();
            path.push(index);
            let mut access = item.access.clone();
            access.push(field.access);

            // promote the fields of embedded structs, anything else embedded is
            // an ordinary named field
            if field.is_embedded()
                && naming == Naming::Implicit
                && let Def::Struct(inner) = field.shape().def
            {
                queue.push_back(Queued {
                    fields: inner.fields,
                    path,
                    access,
                });
                continue;
            }

            candidates.entry(name).or_default().push(Candidate {
                naming,
                field: ResolvedField {
                    name,
                    shape: field.shape(),
                    path,
                    access,
                },
            });
        }
    }

    let mut fields = Vec::with_capacity(candidates.len());

    for (name, candidates) in candidates {
        // breadth-first discovery keeps candidates ordered by depth
        debug_assert!(
            candidates
                .windows(2)
                .all(|w| w[0].field.path.len() <= w[1].field.path.len())
        );

        let depth = candidates[0].field.path.len();
        let mut visible: Vec<Candidate> = candidates
            .into_iter()
            .take_while(|c| c.field.path.len() == depth)
            .collect();

        if visible.len() == 1 {
            fields.extend(visible.pop().map(|c| c.field));
            continue;
        }

        visible.retain(|c| c.naming == Naming::Explicit);
        if visible.len() == 1 {
            fields.extend(visible.pop().map(|c| c.field));
            continue;
        }

        trace!(name, depth, "dropping ambiguous field");
    }

    fields
}

/// Memoizes [`resolve_fields`] per (struct type, tag key).
#[derive(Default)]
pub struct FieldCache {
    resolved: RwLock<HashMap<(TypeId, String), Arc<[ResolvedField]>>>,
}

impl FieldCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the resolved fields of `shape`, which must be a struct shape.
    /// Returns `None` for any other shape.
    pub fn fields_of(&self, shape: &'static Shape, tag_key: &str) -> Option<Arc<[ResolvedField]>> {
        let Def::Struct(def) = shape.def else {
            return None;
        };

        let key = (shape.id.get(), tag_key.to_owned());

        {
            let resolved = self.resolved.read();
            if let Some(fields) = resolved.get(&key) {
                return Some(Arc::clone(fields));
            }
        }

        let fields: Arc<[ResolvedField]> = resolve_fields(&def, tag_key).into();
        let mut resolved = self.resolved.write();
        Some(Arc::clone(resolved.entry(key).or_insert(fields)))
    }
}

impl core::fmt::Debug for FieldCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let len = self.resolved.read().len();
        f.debug_struct("FieldCache").field("entries", &len).finish()
    }
}
