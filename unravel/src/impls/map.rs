use core::any::Any;
use core::hash::Hash;
use std::collections::{BTreeMap, HashMap};

use super::assign;
use crate::{Def, MapDef, Shape, Unravel, shape_of};

trait MapInsert<K, V> {
    fn insert_pair(&mut self, key: K, value: V);
}

impl<K: Eq + Hash, V> MapInsert<K, V> for HashMap<K, V> {
    fn insert_pair(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

impl<K: Ord, V> MapInsert<K, V> for BTreeMap<K, V> {
    fn insert_pair(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

fn insert<M, K, V>(target: &mut dyn Any, key: Box<dyn Any>, value: Box<dyn Any>) -> bool
where
    M: MapInsert<K, V> + 'static,
    K: 'static,
    V: 'static,
{
    match (
        target.downcast_mut::<M>(),
        key.downcast::<K>(),
        value.downcast::<V>(),
    ) {
        (Some(map), Ok(key), Ok(value)) => {
            map.insert_pair(*key, *value);
            true
        }
        _ => false,
    }
}

impl<K, V> Unravel for HashMap<K, V>
where
    K: Unravel + Eq + Hash,
    V: Unravel,
{
    const SHAPE: &'static Shape = &const {
        Shape::builder::<Self>(
            "HashMap",
            Def::Map(MapDef {
                key: shape_of::<K>,
                value: shape_of::<V>,
                insert: insert::<Self, K, V>,
                assign: assign::<Self>,
            }),
        )
        .build()
    };

    fn zero() -> Self {
        HashMap::new()
    }
}

impl<K, V> Unravel for BTreeMap<K, V>
where
    K: Unravel + Ord,
    V: Unravel,
{
    const SHAPE: &'static Shape = &const {
        Shape::builder::<Self>(
            "BTreeMap",
            Def::Map(MapDef {
                key: shape_of::<K>,
                value: shape_of::<V>,
                insert: insert::<Self, K, V>,
                assign: assign::<Self>,
            }),
        )
        .build()
    };

    fn zero() -> Self {
        BTreeMap::new()
    }
}
