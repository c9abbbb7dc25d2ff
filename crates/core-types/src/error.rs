use crate::enums::Field;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field-level validation failures, at most one message per field.
///
/// Only the first failing rule of a field is kept, which is what the form
/// shows under each input.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{} field(s) failed validation", .0.len())]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field` unless the field already has an error.
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The error of the first field in form order, if any.
    pub fn first(&self) -> Option<(Field, &str)> {
        self.0.iter().next().map(|(f, m)| (*f, m.as_str()))
    }
}
