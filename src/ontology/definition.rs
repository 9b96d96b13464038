//! Typed view of the JSON ontology definition document.
//!
//! Every mapping in the document keeps its declaration order, which drives the
//! order in which the builder mutates the ontology.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::{Error, Result};

/// Mapping that preserves the declaration order of the source document and
/// rejects duplicate keys.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Iterates over entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0
            .iter()
            .find_map(|(candidate, value)| (candidate == key).then_some(value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<(String, V)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            if entries.iter().any(|(existing, _)| *existing == key) {
                return Err(de::Error::custom(format!("duplicate key `{key}`")));
            }
            entries.push((key, value));
        }
        Ok(OrderedMap(entries))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Declaration of an object or data property.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PropertySpec {
    pub domain: Vec<String>,
    pub range: Vec<String>,
    pub property_type: Vec<String>,
    pub inverse_property: Option<String>,
}

/// Literal or reference supplied as an attribute value.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IndividualSpec {
    pub name: String,
    pub class: String,
    #[serde(default)]
    pub attributes: OrderedMap<Vec<AttributeValue>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EquivalenceSpec {
    pub class: String,
    pub equivalent_to: Vec<String>,
}

/// Closed set of general axioms the builder understands.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Eq)]
pub enum AxiomType {
    TransitiveProperty,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeneralAxiomSpec {
    pub axiom_type: AxiomType,
    pub properties: Vec<String>,
}

/// Complete ontology definition document.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OntologyDefinition {
    pub ontology_iri: String,
    /// Class name to parent class name.
    pub classes: OrderedMap<String>,
    #[serde(default)]
    pub object_properties: OrderedMap<PropertySpec>,
    #[serde(default)]
    pub data_properties: OrderedMap<PropertySpec>,
    #[serde(default)]
    pub individuals: Vec<IndividualSpec>,
    #[serde(default)]
    pub disjoint_classes: Vec<String>,
    #[serde(default)]
    pub equivalent_classes: Vec<EquivalenceSpec>,
    #[serde(default)]
    pub general_axioms: Vec<GeneralAxiomSpec>,
    /// Annotation property to target entity to values.
    #[serde(default)]
    pub annotations: OrderedMap<OrderedMap<Vec<String>>>,
}

impl OntologyDefinition {
    /// Parses the raw document into a JSON value for schema validation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDocument`] when the text is not valid JSON.
    pub fn parse_value(text: &str) -> Result<serde_json::Value> {
        serde_json::from_str(text).map_err(Error::MalformedDocument)
    }

    /// Parses an already validated document. Deserialization runs straight
    /// from the text so that mapping order survives.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDocument`] when the text does not describe a
    /// definition document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(Error::MalformedDocument)
    }
}
