use std::fmt::{self, Display, Formatter};

use oxrdf::{NamedNode, NamedNodeRef};
use thiserror::Error;

/// Value object ensuring that supplied text represents a valid IRI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri {
    value: String,
}

impl Iri {
    /// Validates and constructs a new [`Iri`] value object.
    ///
    /// The constructor rejects malformed identifiers in order to guarantee that
    /// every entity uses canonical identifiers.
    pub fn new(value: impl Into<String>) -> Result<Self, IriError> {
        let value = value.into();
        NamedNode::new(value.as_str()).map_err(|_| IriError::Invalid {
            value: value.clone(),
        })?;
        Ok(Self { value })
    }

    /// Returns the underlying textual representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Borrows the identifier as an RDF named node.
    #[must_use]
    pub fn as_named_node(&self) -> NamedNodeRef<'_> {
        NamedNodeRef::new_unchecked(&self.value)
    }

    /// Returns the fragment or last path segment, i.e. the entity name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.value
            .rfind(['#', '/'])
            .map_or(self.value.as_str(), |index| &self.value[index + 1..])
    }

    /// Namespace under which entities of an ontology with this identifier are
    /// minted: the identifier itself when it ends in `#` or `/`, otherwise the
    /// identifier followed by `#`.
    #[must_use]
    pub fn base(&self) -> String {
        if self.value.ends_with('#') || self.value.ends_with('/') {
            self.value.clone()
        } else {
            format!("{}#", self.value)
        }
    }

    /// Mints the identifier of a named entity inside this namespace.
    pub fn join(&self, name: &str) -> Result<Self, IriError> {
        Self::new(format!("{}{name}", self.base()))
    }
}

impl Display for Iri {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<NamedNodeRef<'_>> for Iri {
    fn from(node: NamedNodeRef<'_>) -> Self {
        Self {
            value: node.as_str().to_string(),
        }
    }
}

impl From<NamedNode> for Iri {
    fn from(node: NamedNode) -> Self {
        Self {
            value: node.into_string(),
        }
    }
}

/// Errors produced when validating an [`Iri`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IriError {
    /// The provided text could not be parsed as an IRI.
    #[error("invalid IRI: {value}")]
    Invalid { value: String },
}

#[cfg(test)]
mod tests {
    use super::Iri;

    #[test]
    fn accepts_valid_iri() {
        let iri = Iri::new("https://example.org/resource").expect("valid IRI");
        assert_eq!(iri.as_str(), "https://example.org/resource");
    }

    #[test]
    fn rejects_invalid_iri() {
        let err = Iri::new("not an iri").expect_err("invalid IRI");
        assert!(matches!(err, super::IriError::Invalid { value } if value == "not an iri"));
    }

    #[test]
    fn mints_entities_under_the_ontology_namespace() {
        let ontology = Iri::new("http://example.org/test_ontology.owl").expect("valid IRI");
        let person = ontology.join("Person").expect("valid entity");
        assert_eq!(person.as_str(), "http://example.org/test_ontology.owl#Person");
        assert_eq!(person.local_name(), "Person");

        let slash = Iri::new("http://example.org/onto/").expect("valid IRI");
        assert_eq!(
            slash.join("Course").expect("valid entity").as_str(),
            "http://example.org/onto/Course"
        );
    }

    #[test]
    fn names_with_spaces_cannot_be_minted() {
        let ontology = Iri::new("http://example.org/onto").expect("valid IRI");
        assert!(ontology.join("Not A Name").is_err());
    }
}
