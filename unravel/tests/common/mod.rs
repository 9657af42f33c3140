//! A source over a flat map of dotted paths, e.g. `$.address.city`.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use unravel::{Error, KeyValues, Source, SourceBox, StringSource, Unravel, Values};

pub const ROOT: &str = "$";

#[derive(Clone, Copy, Debug)]
pub enum Value {
    Str(&'static str),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(&'static [&'static str]),
    /// Present, but explicitly without value.
    Null,
}

/// A node of a tree stored as a map from path to leaf value.
///
/// A node exists if there is a value at its path or below it. Scalars are only
/// readable from the exact kind stored at the path.
#[derive(Clone, Debug)]
pub struct PathSource {
    values: Arc<BTreeMap<String, Value>>,
    path: String,
}

impl PathSource {
    pub fn new(values: &[(&str, Value)]) -> Self {
        let values = values
            .iter()
            .map(|(path, value)| (path.to_string(), *value))
            .collect();

        Self {
            values: Arc::new(values),
            path: ROOT.to_owned(),
        }
    }

    fn value(&self) -> Option<Value> {
        self.values.get(&self.path).copied()
    }

    fn child(&self, key: &str) -> Self {
        Self {
            values: Arc::clone(&self.values),
            path: format!("{}.{key}", self.path),
        }
    }

    fn exists(&self) -> bool {
        let prefix = format!("{}.", self.path);
        self.values
            .keys()
            .any(|path| *path == self.path || path.starts_with(&prefix))
    }
}

impl Source for PathSource {
    fn bool(&self) -> Result<bool, Error> {
        match self.value() {
            Some(Value::Bool(value)) => Ok(value),
            _ => Err(Error::not_supported()),
        }
    }

    fn int(&self) -> Result<i64, Error> {
        match self.value() {
            Some(Value::Int(value)) => Ok(value),
            _ => Err(Error::not_supported()),
        }
    }

    fn uint(&self) -> Result<u64, Error> {
        match self.value() {
            Some(Value::Int(value)) => {
                u64::try_from(value).map_err(|_| Error::out_of_range(u64::SHAPE, value))
            }
            _ => Err(Error::not_supported()),
        }
    }

    fn float(&self) -> Result<f64, Error> {
        match self.value() {
            Some(Value::Float(value)) => Ok(value),
            _ => Err(Error::not_supported()),
        }
    }

    fn string(&self) -> Result<String, Error> {
        match self.value() {
            Some(Value::Str(value)) => Ok(value.to_owned()),
            _ => Err(Error::not_supported()),
        }
    }

    fn get(&self, key: &str) -> Result<SourceBox<'_>, Error> {
        let child = self.child(key);
        match child.value() {
            Some(Value::Null) => Err(Error::no_value()),
            _ if child.exists() => Ok(Box::new(child)),
            _ => Err(Error::no_value()),
        }
    }

    fn iterate(&self) -> Result<Values<'_>, Error> {
        match self.value() {
            Some(Value::List(items)) => Ok(Box::new(
                items
                    .iter()
                    .map(|item| Ok::<_, Error>(Box::new(StringSource(item)) as SourceBox<'_>)),
            )),
            _ => Err(Error::not_supported()),
        }
    }

    fn iterate_key_values(&self) -> Result<KeyValues<'_>, Error> {
        let prefix = format!("{}.", self.path);
        let mut keys: Vec<&str> = self
            .values
            .keys()
            .filter_map(|path| path.strip_prefix(&prefix))
            .map(|rest| rest.split('.').next().unwrap_or(rest))
            .collect();
        keys.sort_unstable();
        keys.dedup();

        if keys.is_empty() {
            return Err(Error::not_supported());
        }

        Ok(Box::new(keys.into_iter().map(move |key| {
            let value = self.child(key);
            Ok::<_, Error>((
                Box::new(StringSource(key)) as SourceBox<'_>,
                Box::new(value) as SourceBox<'_>,
            ))
        })))
    }
}

/// A source without any children.
pub struct Empty;

impl Source for Empty {
    fn get(&self, _key: &str) -> Result<SourceBox<'_>, Error> {
        Err(Error::no_value())
    }
}
