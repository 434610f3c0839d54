//! Discriminator-keyed decoding of polymorphic definitions.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::answer_type::AnswerType;
use crate::error::{ConfigError, SpecError};
use crate::input::{InputItemBuilder, InputItemType};

pub type Factory<T> = Box<dyn Fn(Value) -> Result<T, SpecError> + Send + Sync>;

/// Maps `"type"` discriminators to factories. Registering an existing
/// discriminator replaces its factory.
pub struct PolymorphicSerializer<T> {
    kind: &'static str,
    factories: BTreeMap<String, Factory<T>>,
}

impl<T> PolymorphicSerializer<T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            factories: BTreeMap::new(),
        }
    }

    pub fn register<F>(&mut self, type_name: impl Into<String>, factory: F)
    where
        F: Fn(Value) -> Result<T, SpecError> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        tracing::debug!(kind = self.kind, type_name = %type_name, "registering factory");
        self.factories.insert(type_name, Box::new(factory));
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn decode(&self, value: Value) -> Result<T, SpecError> {
        let Some(type_name) = value.get("type").and_then(Value::as_str) else {
            return Err(ConfigError::MissingType { kind: self.kind }.into());
        };
        let Some(factory) = self.factories.get(type_name) else {
            tracing::warn!(kind = self.kind, type_name, "no factory registered");
            return Err(ConfigError::UnknownType {
                kind: self.kind,
                type_name: type_name.to_string(),
            }
            .into());
        };
        tracing::debug!(kind = self.kind, type_name, "decoding definition");
        factory(value)
    }

    pub fn decode_str(&self, text: &str) -> Result<T, SpecError> {
        self.decode(serde_json::from_str(text)?)
    }
}

impl<T> std::fmt::Debug for PolymorphicSerializer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolymorphicSerializer")
            .field("kind", &self.kind)
            .field("types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Serializer for the nine answer types.
pub fn answer_type_serializer() -> PolymorphicSerializer<AnswerType> {
    let mut serializer = PolymorphicSerializer::new("answer");
    for type_name in AnswerType::type_names() {
        serializer.register(type_name, AnswerType::from_value);
    }
    serializer
}

/// Serializer for the twelve input item types.
pub fn input_item_serializer() -> PolymorphicSerializer<InputItemBuilder> {
    let mut serializer = PolymorphicSerializer::new("input item");
    for item_type in InputItemType::BUILDERS {
        serializer.register(item_type.as_str(), InputItemBuilder::from_value);
    }
    serializer
}
