//! Read-only questions asked of a loaded ontology.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{
    entities::{thing, Characteristic, Datatype, Ontology, PropertyKind},
    reasoner::{ReasonerError, ReasonerHandle},
    repositories::OntologyMetrics,
    value_objects::Iri,
};
use crate::{Error, Result};

/// Domains and ranges of a property, by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DomainsAndRanges {
    pub domains: Vec<String>,
    /// Class names for object properties, primitive tags for data properties.
    pub ranges: Vec<String>,
}

/// Query facade over an ontology and a reasoner.
///
/// Every lookup takes entity names and fails with [`Error::EntityNotFound`]
/// when the name is not declared.
#[derive(Clone)]
pub struct OntologyQuery {
    ontology: Ontology,
    reasoner: Arc<ReasonerHandle>,
    reasoning_enabled: bool,
}

impl OntologyQuery {
    #[must_use]
    pub fn new(ontology: Ontology, reasoner: Arc<ReasonerHandle>, reasoning_enabled: bool) -> Self {
        Self {
            ontology,
            reasoner,
            reasoning_enabled,
        }
    }

    /// Returns the underlying ontology.
    #[must_use]
    pub fn ontology(&self) -> &Ontology {
        &self.ontology
    }

    fn not_found(&self, name: &str) -> Error {
        Error::EntityNotFound {
            ontology: self.ontology.id().to_string(),
            name: name.to_string(),
        }
    }

    fn class_id(&self, name: &str) -> Result<Iri> {
        self.ontology
            .find_class(name)
            .ok_or_else(|| self.not_found(name))
    }

    fn property_id(&self, name: &str) -> Result<Iri> {
        self.ontology
            .find_property(name)
            .ok_or_else(|| self.not_found(name))
    }

    fn names<'a>(iris: impl IntoIterator<Item = &'a Iri>) -> Vec<String> {
        iris.into_iter()
            .map(|iri| iri.local_name().to_string())
            .collect()
    }

    /// Names of all declared classes.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        Self::names(self.ontology.classes().keys())
    }

    fn properties(&self, kind: PropertyKind) -> Vec<String> {
        self.ontology
            .properties_of_kind(kind)
            .map(|property| property.name().to_string())
            .collect()
    }

    #[must_use]
    pub fn object_properties(&self) -> Vec<String> {
        self.properties(PropertyKind::Object)
    }

    #[must_use]
    pub fn data_properties(&self) -> Vec<String> {
        self.properties(PropertyKind::Data)
    }

    #[must_use]
    pub fn annotation_properties(&self) -> Vec<String> {
        self.properties(PropertyKind::Annotation)
    }

    /// Names of classes followed by names of properties.
    #[must_use]
    pub fn entities(&self) -> Vec<String> {
        let mut names = self.classes();
        names.extend(Self::names(self.ontology.properties().keys()));
        names
    }

    /// Individuals of `class`, including members of its subclasses when
    /// reasoning is enabled.
    ///
    /// # Errors
    ///
    /// Fails when the class is unknown or the reasoner fails.
    pub async fn individuals_of(&self, class: &str) -> Result<Vec<String>> {
        let id = self.class_id(class)?;
        if !self.reasoning_enabled {
            return Ok(self
                .ontology
                .individuals()
                .values()
                .filter(|individual| individual.types().contains(&id))
                .map(|individual| individual.name().to_string())
                .collect());
        }
        let members = self.reasoner.instances_of(&self.ontology, &id).await?;
        Ok(Self::names(&members))
    }

    /// Direct subclasses of `class`.
    ///
    /// # Errors
    ///
    /// Fails when the class is unknown.
    pub fn subclasses_of(&self, class: &str) -> Result<Vec<String>> {
        let id = self.class_id(class)?;
        Ok(self
            .ontology
            .classes()
            .values()
            .filter(|candidate| candidate.parents().contains(&id))
            .map(|candidate| candidate.name().to_string())
            .collect())
    }

    /// Superclasses of `concept`. With reasoning enabled this is the inferred
    /// closure ending with `Thing`; otherwise only the declared parents.
    ///
    /// # Errors
    ///
    /// Fails when the class is unknown or the reasoner fails.
    pub async fn ancestors(&self, concept: &str) -> Result<Vec<String>> {
        let id = self.class_id(concept)?;
        if !self.reasoning_enabled {
            let parents = self
                .ontology
                .class(&id)
                .map(|class| Self::names(class.parents()))
                .unwrap_or_default();
            return Ok(parents);
        }
        let ancestors = self.reasoner.ancestors_of(&self.ontology, &id).await?;
        Ok(Self::names(&ancestors))
    }

    /// # Errors
    ///
    /// Fails when the property is unknown.
    pub fn property_characteristics(&self, property: &str) -> Result<Vec<Characteristic>> {
        let id = self.property_id(property)?;
        Ok(self
            .ontology
            .property(&id)
            .map(|p| p.characteristics().iter().copied().collect())
            .unwrap_or_default())
    }

    /// # Errors
    ///
    /// Fails when the property is unknown.
    pub fn domains_and_ranges(&self, property: &str) -> Result<DomainsAndRanges> {
        let id = self.property_id(property)?;
        let Some(property) = self.ontology.property(&id) else {
            return Err(self.not_found(property));
        };
        Ok(DomainsAndRanges {
            domains: Self::names(property.domains()),
            ranges: property
                .ranges()
                .iter()
                .map(|range| match Datatype::from_iri(range) {
                    Some(datatype) => datatype.tag().to_string(),
                    None => range.local_name().to_string(),
                })
                .collect(),
        })
    }

    /// Annotation values per entity name, then per annotation property name.
    #[must_use]
    pub fn annotations(&self) -> BTreeMap<String, BTreeMap<String, Vec<String>>> {
        self.ontology
            .annotations()
            .iter()
            .map(|(target, values)| {
                let values = values
                    .iter()
                    .map(|(property, texts)| (property.local_name().to_string(), texts.clone()))
                    .collect();
                (target.local_name().to_string(), values)
            })
            .collect()
    }

    /// Direct children per parent name, rooted at `Thing`.
    #[must_use]
    pub fn class_hierarchy(&self) -> BTreeMap<String, Vec<String>> {
        let mut hierarchy: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for class in self.ontology.classes().values() {
            let parents = class.parents();
            if parents.is_empty() {
                hierarchy
                    .entry(thing().local_name().to_string())
                    .or_default()
                    .push(class.name().to_string());
            }
            for parent in parents {
                hierarchy
                    .entry(parent.local_name().to_string())
                    .or_default()
                    .push(class.name().to_string());
            }
        }
        hierarchy
    }

    /// # Errors
    ///
    /// Fails when the class is unknown.
    pub fn disjoint_with(&self, class: &str) -> Result<Vec<String>> {
        let id = self.class_id(class)?;
        Ok(Self::names(&self.ontology.disjoint_with(&id)))
    }

    /// # Errors
    ///
    /// Fails when the class is unknown.
    pub fn equivalent_to(&self, class: &str) -> Result<Vec<String>> {
        let id = self.class_id(class)?;
        Ok(self
            .ontology
            .class(&id)
            .map(|class| Self::names(class.equivalents()))
            .unwrap_or_default())
    }

    #[must_use]
    pub fn metrics(&self) -> OntologyMetrics {
        OntologyMetrics::from(&self.ontology)
    }

    /// Whether the reasoner finds a model. An inconsistency is `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Propagates reasoner failures other than inconsistency.
    pub async fn is_consistent(&self) -> Result<bool> {
        match self.reasoner.check_consistency(&self.ontology).await {
            Ok(()) => Ok(true),
            Err(ReasonerError::Inconsistency { reason }) => {
                tracing::warn!(ontology = %self.ontology.id(), reason, "ontology is inconsistent");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OntologyQuery;
    use crate::ontology::{
        builder::build, definition::OntologyDefinition, entities::Characteristic,
        reasoner::StructuralReasoner,
    };
    use crate::Error;
    use std::sync::Arc;

    fn query(reasoning_enabled: bool) -> OntologyQuery {
        let definition = OntologyDefinition::from_json_str(
            r#"{"ontology_iri": "http://example.org/test_ontology.owl",
                "classes": {"Person": "Thing", "Student": "Person", "Professor": "Person", "Course": "Thing"},
                "object_properties": {"teaches": {"domain": ["Professor"], "range": ["Course"], "property_type": ["InverseFunctionalProperty"]}},
                "data_properties": {"hasAge": {"domain": ["Person"], "range": ["int"], "property_type": ["FunctionalProperty"]}},
                "individuals": [{"name": "john", "class": "Student", "attributes": {"hasAge": [30]}}],
                "disjoint_classes": ["Person", "Course"],
                "equivalent_classes": [{"class": "Student", "equivalent_to": ["Professor"]}]}"#,
        )
        .expect("definition");
        let ontology = build(&definition).expect("build").ontology;
        OntologyQuery::new(ontology, Arc::new(StructuralReasoner::new()), reasoning_enabled)
    }

    #[tokio::test]
    async fn individuals_include_subclass_members() {
        let facade = query(true);
        assert_eq!(
            facade.individuals_of("Person").await.expect("individuals"),
            ["john"]
        );
        assert!(query(false)
            .individuals_of("Person")
            .await
            .expect("individuals")
            .is_empty());
    }

    #[tokio::test]
    async fn ancestors_depend_on_reasoning() {
        let inferred = query(true).ancestors("Student").await.expect("ancestors");
        assert!(inferred.contains(&"Person".to_string()));
        assert!(inferred.contains(&"Thing".to_string()));
        assert_eq!(
            query(false).ancestors("Student").await.expect("ancestors"),
            ["Person"]
        );
    }

    #[test]
    fn listings_and_lookups() {
        let facade = query(true);
        assert_eq!(facade.classes(), ["Course", "Person", "Professor", "Student"]);
        assert_eq!(facade.object_properties(), ["teaches"]);
        assert_eq!(facade.data_properties(), ["hasAge"]);
        assert_eq!(
            facade.subclasses_of("Person").expect("subclasses"),
            ["Professor", "Student"]
        );
        assert_eq!(facade.disjoint_with("Course").expect("disjoint"), ["Person"]);
        assert_eq!(facade.equivalent_to("Professor").expect("equivalent"), ["Student"]);
        assert_eq!(
            facade.property_characteristics("teaches").expect("characteristics"),
            [Characteristic::InverseFunctional]
        );
        let hasage = facade.domains_and_ranges("hasAge").expect("domains");
        assert_eq!(hasage.domains, ["Person"]);
        assert_eq!(hasage.ranges, ["int"]);
        assert_eq!(
            facade.class_hierarchy()["Thing"],
            ["Course".to_string(), "Person".to_string()]
        );
        assert_eq!(facade.metrics().num_individuals, 1);
    }

    #[test]
    fn unknown_names_are_not_found() {
        let facade = query(true);
        let err = facade.subclasses_of("Robot").expect_err("missing");
        assert!(matches!(err, Error::EntityNotFound { ref name, .. } if name == "Robot"));
        assert!(matches!(
            facade.domains_and_ranges("flies"),
            Err(Error::EntityNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn consistency_is_reported_as_a_flag() {
        assert!(query(true).is_consistent().await.expect("consistency"));
    }
}
