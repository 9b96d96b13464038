//! Turns an [`OntologyDefinition`] into an [`Ontology`] aggregate.
//!
//! Mutations run in a fixed order: classes, object properties, data
//! properties, individuals, disjointness, equivalence, general axioms and
//! annotations. The first four phases are structural and abort on the first
//! unresolved name. The remaining phases enrich the ontology on a best effort
//! basis: unresolved names are logged, recorded in the [`BuildReport`] and
//! skipped.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use super::{
    definition::{AttributeValue, AxiomType, OntologyDefinition, PropertySpec},
    entities::{
        thing, Characteristic, Class, Datatype, Individual, Ontology, OntologyError, Property,
        PropertyAssertion, PropertyKind,
    },
    value_objects::{Iri, IriError},
};

/// Enrichment phases that may skip items.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Enrichment {
    Equivalence,
    GeneralAxiom,
    Annotation,
}

impl fmt::Display for Enrichment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Equivalence => "equivalence",
            Self::GeneralAxiom => "general axiom",
            Self::Annotation => "annotation",
        })
    }
}

/// An enrichment item that could not be applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skipped {
    pub enrichment: Enrichment,
    /// Name that failed to resolve.
    pub name: String,
    pub reason: String,
}

/// Outcome of a build besides the ontology itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    skipped: Vec<Skipped>,
}

impl BuildReport {
    /// Items skipped by the enrichment phases, in the order they were met.
    #[must_use]
    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, enrichment: Enrichment, name: &str, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(%enrichment, name, reason = reason.as_str(), "skipping ontology enrichment");
        self.skipped.push(Skipped {
            enrichment,
            name: name.to_string(),
            reason,
        });
    }
}

/// Ontology together with its [`BuildReport`].
#[derive(Clone, Debug)]
pub struct BuildOutcome {
    pub ontology: Ontology,
    pub report: BuildReport,
}

/// Structural failures aborting a build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("class `{class}` declares unknown parent `{parent}`")]
    UnknownParent { class: String, parent: String },
    #[error("unknown class `{class}` referenced by {context}")]
    UnknownClass { context: String, class: String },
    #[error("individual `{individual}` uses unknown property `{property}`")]
    UnknownProperty { individual: String, property: String },
    #[error("property `{property}` declares unknown range `{range}`")]
    UnknownRangeType { property: String, range: String },
    #[error("property `{property}` declares unknown characteristic `{characteristic}`")]
    UnknownCharacteristic {
        property: String,
        characteristic: String,
    },
    #[error("invalid value `{value}` for property `{property}` of individual `{individual}`: {reason}")]
    InvalidValue {
        individual: String,
        property: String,
        value: String,
        reason: String,
    },
    #[error("entity `{name}` is declared more than once")]
    DuplicateEntity { name: String },
    #[error(transparent)]
    InvalidIri(#[from] IriError),
    #[error(transparent)]
    Ontology(#[from] OntologyError),
}

/// Builds the ontology described by `definition`.
///
/// # Errors
///
/// Returns the first structural [`BuildError`]; nothing is returned for
/// persistence in that case.
pub fn build(definition: &OntologyDefinition) -> Result<BuildOutcome, BuildError> {
    let id = Iri::new(definition.ontology_iri.as_str())?;
    let mut builder = Builder::new(id);

    builder.classes(definition)?;
    builder.properties(definition, PropertyKind::Object)?;
    builder.properties(definition, PropertyKind::Data)?;
    builder.individuals(definition)?;
    builder.disjointness(definition)?;
    builder.equivalences(definition)?;
    builder.general_axioms(definition)?;
    builder.annotations(definition)?;

    tracing::info!(
        ontology = %builder.ontology.id(),
        classes = builder.ontology.classes().len(),
        properties = builder.ontology.properties().len(),
        individuals = builder.ontology.individuals().len(),
        skipped = builder.report.skipped.len(),
        "ontology built"
    );
    Ok(BuildOutcome {
        ontology: builder.ontology,
        report: builder.report,
    })
}

/// Name tables mapping document names to minted identifiers.
struct Builder {
    ontology: Ontology,
    classes: BTreeMap<String, Iri>,
    properties: BTreeMap<String, Iri>,
    individuals: BTreeMap<String, Iri>,
    report: BuildReport,
}

impl Builder {
    fn new(id: Iri) -> Self {
        Self {
            ontology: Ontology::new(id),
            classes: BTreeMap::new(),
            properties: BTreeMap::new(),
            individuals: BTreeMap::new(),
            report: BuildReport::default(),
        }
    }

    fn mint(&self, name: &str) -> Result<Iri, BuildError> {
        if self.classes.contains_key(name)
            || self.properties.contains_key(name)
            || self.individuals.contains_key(name)
            || name == "Thing"
        {
            return Err(BuildError::DuplicateEntity {
                name: name.to_string(),
            });
        }
        Ok(self.ontology.id().join(name)?)
    }

    fn class(&self, name: &str) -> Option<Iri> {
        if name == "Thing" {
            return Some(thing());
        }
        self.classes.get(name).cloned()
    }

    fn classes(&mut self, definition: &OntologyDefinition) -> Result<(), BuildError> {
        for (name, parent) in definition.classes.iter() {
            let Some(parent_id) = self.class(parent) else {
                return Err(BuildError::UnknownParent {
                    class: name.to_string(),
                    parent: parent.clone(),
                });
            };
            let id = self.mint(name)?;
            self.ontology
                .add_class(Class::subclass_of(id.clone(), parent_id))?;
            self.classes.insert(name.to_string(), id);
        }
        tracing::debug!(count = self.classes.len(), "classes created");
        Ok(())
    }

    fn properties(
        &mut self,
        definition: &OntologyDefinition,
        kind: PropertyKind,
    ) -> Result<(), BuildError> {
        let declarations = match kind {
            PropertyKind::Data => &definition.data_properties,
            _ => &definition.object_properties,
        };
        for (name, spec) in declarations.iter() {
            let id = self.declare_property(name, kind)?;
            self.describe_property(name, &id, kind, spec)?;
        }
        tracing::debug!(?kind, count = declarations.len(), "properties created");
        Ok(())
    }

    /// Creates the property handle, reusing one created earlier as the inverse
    /// of another property.
    fn declare_property(&mut self, name: &str, kind: PropertyKind) -> Result<Iri, BuildError> {
        if let Some(existing) = self.properties.get(name) {
            let reusable = self
                .ontology
                .property(existing)
                .is_some_and(|property| property.kind() == kind);
            if reusable {
                return Ok(existing.clone());
            }
        }
        let id = self.mint(name)?;
        self.ontology.add_property(Property::new(id.clone(), kind))?;
        self.properties.insert(name.to_string(), id.clone());
        Ok(id)
    }

    fn describe_property(
        &mut self,
        name: &str,
        id: &Iri,
        kind: PropertyKind,
        spec: &PropertySpec,
    ) -> Result<(), BuildError> {
        for tag in &spec.property_type {
            let Some(characteristic) = Characteristic::from_tag(tag) else {
                return Err(BuildError::UnknownCharacteristic {
                    property: name.to_string(),
                    characteristic: tag.clone(),
                });
            };
            self.ontology.add_characteristic(id, characteristic)?;
        }

        for domain in &spec.domain {
            let Some(class) = self.class(domain) else {
                return Err(BuildError::UnknownClass {
                    context: format!("the domain of `{name}`"),
                    class: domain.clone(),
                });
            };
            self.ontology.add_domain(id, class)?;
        }

        for range in &spec.range {
            let resolved = match kind {
                PropertyKind::Data => Datatype::from_tag(range).map(Datatype::iri),
                _ => self.class(range),
            };
            let Some(range_id) = resolved else {
                return Err(BuildError::UnknownRangeType {
                    property: name.to_string(),
                    range: range.clone(),
                });
            };
            self.ontology.add_range(id, range_id)?;
        }

        if let Some(inverse) = &spec.inverse_property {
            if kind != PropertyKind::Object {
                tracing::warn!(property = name, inverse, "data properties have no inverse");
                return Ok(());
            }
            let inverse_id = self.declare_property(inverse, PropertyKind::Object)?;
            self.ontology.link_inverse(id, &inverse_id)?;
        }
        Ok(())
    }

    fn individuals(&mut self, definition: &OntologyDefinition) -> Result<(), BuildError> {
        let mut pending = Vec::with_capacity(definition.individuals.len());
        for spec in &definition.individuals {
            let Some(class) = self.class(&spec.class) else {
                return Err(BuildError::UnknownClass {
                    context: format!("individual `{}`", spec.name),
                    class: spec.class.clone(),
                });
            };
            let id = self.mint(&spec.name)?;
            self.individuals.insert(spec.name.clone(), id.clone());
            let mut individual = Individual::new(id);
            individual.assert_type(class);
            pending.push((spec, individual));
        }

        for (spec, individual) in &mut pending {
            for (attribute, values) in spec.attributes.iter() {
                let property = self
                    .properties
                    .get(attribute)
                    .and_then(|id| self.ontology.property(id))
                    .ok_or_else(|| BuildError::UnknownProperty {
                        individual: spec.name.clone(),
                        property: attribute.to_string(),
                    })?;
                let retained = if property.is_functional() {
                    &values[..values.len().min(1)]
                } else {
                    &values[..]
                };
                for value in retained {
                    let assertion = self.assertion(&spec.name, property, value)?;
                    individual.add_property_assertion(property.id().clone(), assertion);
                }
            }
        }

        let count = pending.len();
        for (_, individual) in pending {
            self.ontology.add_individual(individual)?;
        }
        tracing::debug!(count, "individuals created");
        Ok(())
    }

    fn assertion(
        &self,
        individual: &str,
        property: &Property,
        value: &AttributeValue,
    ) -> Result<PropertyAssertion, BuildError> {
        let invalid = |reason: &str| BuildError::InvalidValue {
            individual: individual.to_string(),
            property: property.name().to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        if property.kind() == PropertyKind::Object {
            let AttributeValue::Text(name) = value else {
                return Err(invalid("object property values name individuals"));
            };
            let Some(target) = self.individuals.get(name) else {
                return Err(invalid("no individual with that name"));
            };
            return Ok(PropertyAssertion::Individual(target.clone()));
        }

        let datatype = property.datatype().unwrap_or_else(|| infer_datatype(value));
        let lexical = literal_lexical(datatype, value).map_err(|reason| invalid(&reason))?;
        Ok(PropertyAssertion::literal(lexical, datatype))
    }

    fn disjointness(&mut self, definition: &OntologyDefinition) -> Result<(), BuildError> {
        if definition.disjoint_classes.is_empty() {
            return Ok(());
        }
        let mut group = BTreeSet::new();
        for name in &definition.disjoint_classes {
            let Some(class) = self.class(name) else {
                return Err(BuildError::UnknownClass {
                    context: "disjoint_classes".to_string(),
                    class: name.clone(),
                });
            };
            group.insert(class);
        }
        if group.len() < 2 {
            return Err(BuildError::UnknownClass {
                context: "disjoint_classes, which needs two distinct classes".to_string(),
                class: definition.disjoint_classes.join(", "),
            });
        }
        self.ontology.add_disjoint_group(group)?;
        Ok(())
    }

    fn equivalences(&mut self, definition: &OntologyDefinition) -> Result<(), BuildError> {
        for spec in &definition.equivalent_classes {
            let Some(class) = self.classes.get(&spec.class).cloned() else {
                self.report
                    .skip(Enrichment::Equivalence, &spec.class, "class is not declared");
                continue;
            };
            for target in &spec.equivalent_to {
                let Some(other) = self.classes.get(target).cloned() else {
                    self.report
                        .skip(Enrichment::Equivalence, target, "class is not declared");
                    continue;
                };
                self.ontology.add_equivalence(&class, &other)?;
            }
        }
        Ok(())
    }

    fn general_axioms(&mut self, definition: &OntologyDefinition) -> Result<(), BuildError> {
        for axiom in &definition.general_axioms {
            match axiom.axiom_type {
                AxiomType::TransitiveProperty => {
                    for name in &axiom.properties {
                        let object = self
                            .properties
                            .get(name)
                            .filter(|id| {
                                self.ontology
                                    .property(id)
                                    .is_some_and(|p| p.kind() == PropertyKind::Object)
                            })
                            .cloned();
                        let Some(id) = object else {
                            self.report.skip(
                                Enrichment::GeneralAxiom,
                                name,
                                "no object property with that name",
                            );
                            continue;
                        };
                        self.ontology
                            .add_characteristic(&id, Characteristic::Transitive)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn annotations(&mut self, definition: &OntologyDefinition) -> Result<(), BuildError> {
        for (name, targets) in definition.annotations.iter() {
            let Some(property) = self.annotation_property(name)? else {
                self.report.skip(
                    Enrichment::Annotation,
                    name,
                    "name is taken by another kind of entity",
                );
                continue;
            };
            for (target, values) in targets.iter() {
                let resolved = self
                    .classes
                    .get(target)
                    .or_else(|| self.properties.get(target))
                    .or_else(|| self.individuals.get(target))
                    .cloned();
                let Some(target_id) = resolved else {
                    self.report
                        .skip(Enrichment::Annotation, target, "no entity with that name");
                    continue;
                };
                for value in values {
                    self.ontology
                        .annotate(&target_id, &property, value.as_str())?;
                }
            }
        }
        Ok(())
    }

    fn annotation_property(&mut self, name: &str) -> Result<Option<Iri>, BuildError> {
        if let Some(existing) = self.properties.get(name) {
            let is_annotation = self
                .ontology
                .property(existing)
                .is_some_and(|p| p.kind() == PropertyKind::Annotation);
            return Ok(is_annotation.then(|| existing.clone()));
        }
        if self.classes.contains_key(name) || self.individuals.contains_key(name) {
            return Ok(None);
        }
        let id = self.mint(name)?;
        self.ontology
            .add_property(Property::new(id.clone(), PropertyKind::Annotation))?;
        self.properties.insert(name.to_string(), id.clone());
        Ok(Some(id))
    }
}

fn infer_datatype(value: &AttributeValue) -> Datatype {
    match value {
        AttributeValue::Bool(_) => Datatype::Boolean,
        AttributeValue::Integer(_) => Datatype::Integer,
        AttributeValue::Float(_) => Datatype::Double,
        AttributeValue::Text(_) => Datatype::String,
    }
}

/// Canonical lexical form of `value` as an instance of `datatype`.
fn literal_lexical(datatype: Datatype, value: &AttributeValue) -> Result<String, String> {
    match (datatype, value) {
        (Datatype::String, value) => Ok(value.to_string()),
        (Datatype::Integer, AttributeValue::Integer(number)) => Ok(number.to_string()),
        (Datatype::Integer, AttributeValue::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map(|number| number.to_string())
            .map_err(|err| err.to_string()),
        (Datatype::Double, AttributeValue::Integer(number)) => Ok(format!("{number}.0")),
        (Datatype::Double, AttributeValue::Float(number)) => Ok(number.to_string()),
        (Datatype::Double, AttributeValue::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(|number| number.to_string())
            .map_err(|err| err.to_string()),
        (Datatype::Boolean, AttributeValue::Bool(flag)) => Ok(flag.to_string()),
        (Datatype::Boolean, AttributeValue::Text(text)) => text
            .trim()
            .parse::<bool>()
            .map(|flag| flag.to_string())
            .map_err(|err| err.to_string()),
        (Datatype::Date, AttributeValue::Text(text)) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(|date| date.format("%Y-%m-%d").to_string())
            .map_err(|err| err.to_string()),
        (Datatype::Time, AttributeValue::Text(text)) => text
            .parse::<NaiveTime>()
            .map(|time| time.format("%H:%M:%S%.f").to_string())
            .map_err(|err| err.to_string()),
        (Datatype::DateTime, AttributeValue::Text(text)) => match DateTime::parse_from_rfc3339(text) {
            Ok(moment) => Ok(moment.to_rfc3339()),
            Err(_) => text
                .parse::<NaiveDateTime>()
                .map(|moment| moment.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
                .map_err(|err| err.to_string()),
        },
        (datatype, _) => Err(format!("expected a value of type {datatype}")),
    }
}

#[cfg(test)]
mod tests {
    use super::{build, BuildError, Enrichment};
    use crate::ontology::{
        definition::OntologyDefinition,
        entities::{thing, Characteristic, PropertyAssertion},
    };
    use rstest::rstest;

    fn definition(text: &str) -> OntologyDefinition {
        OntologyDefinition::from_json_str(text).expect("valid definition")
    }

    #[test]
    fn classes_are_created_under_their_parents() {
        let outcome = build(&definition(
            r#"{"ontology_iri": "http://example.org/onto",
                "classes": {"Person": "Thing", "Student": "Person"}}"#,
        ))
        .expect("build");
        let ontology = outcome.ontology;
        let person = ontology.find_class("Person").expect("person");
        let student = ontology.find_class("Student").expect("student");
        assert_eq!(person.as_str(), "http://example.org/onto#Person");
        assert!(ontology.class(&person).expect("class").parents().contains(&thing()));
        assert!(ontology.class(&student).expect("class").parents().contains(&person));
    }

    #[test]
    fn forward_parent_reference_is_rejected() {
        let err = build(&definition(
            r#"{"ontology_iri": "http://example.org/onto",
                "classes": {"Student": "Person", "Person": "Thing"}}"#,
        ))
        .expect_err("forward reference");
        assert!(matches!(err, BuildError::UnknownParent { ref class, ref parent }
            if class == "Student" && parent == "Person"));
    }

    #[test]
    fn functional_properties_keep_only_the_first_value() {
        let outcome = build(&definition(
            r#"{"ontology_iri": "http://example.org/onto",
                "classes": {"Person": "Thing"},
                "data_properties": {
                    "hasAge": {"domain": ["Person"], "range": ["int"], "property_type": ["FunctionalProperty"]},
                    "hasNickname": {"domain": ["Person"], "range": ["string"]}
                },
                "individuals": [{"name": "john", "class": "Person",
                    "attributes": {"hasAge": [30, 31], "hasNickname": ["Johnny", "J"]}}]}"#,
        ))
        .expect("build");
        let ontology = outcome.ontology;
        let john = ontology
            .individual(&ontology.find_individual("john").expect("john"))
            .expect("individual")
            .clone();
        let age: Vec<&str> = john
            .values(&ontology.find_property("hasAge").expect("hasAge"))
            .iter()
            .map(PropertyAssertion::lexical)
            .collect();
        let nicknames: Vec<&str> = john
            .values(&ontology.find_property("hasNickname").expect("hasNickname"))
            .iter()
            .map(PropertyAssertion::lexical)
            .collect();
        assert_eq!(age, ["30"]);
        assert_eq!(nicknames, ["Johnny", "J"]);
    }

    #[test]
    fn inverse_properties_are_created_and_linked() {
        let outcome = build(&definition(
            r#"{"ontology_iri": "http://example.org/onto",
                "classes": {"Person": "Thing"},
                "object_properties": {
                    "hasParent": {"domain": ["Person"], "range": ["Person"], "inverse_property": "hasChild"},
                    "hasChild": {"domain": ["Person"], "range": ["Person"]}
                }}"#,
        ))
        .expect("build");
        let ontology = outcome.ontology;
        let parent = ontology.find_property("hasParent").expect("hasParent");
        let child = ontology.find_property("hasChild").expect("hasChild");
        assert_eq!(ontology.property(&parent).and_then(|p| p.inverse()), Some(&child));
        assert_eq!(ontology.property(&child).and_then(|p| p.inverse()), Some(&parent));
        assert_eq!(ontology.property(&child).map(|p| p.domains().len()), Some(1));
    }

    #[test]
    fn object_values_may_reference_later_individuals() {
        let outcome = build(&definition(
            r#"{"ontology_iri": "http://example.org/onto",
                "classes": {"Person": "Thing"},
                "object_properties": {"knows": {"domain": ["Person"], "range": ["Person"]}},
                "individuals": [
                    {"name": "alice", "class": "Person", "attributes": {"knows": ["bob"]}},
                    {"name": "bob", "class": "Person"}
                ]}"#,
        ))
        .expect("build");
        let ontology = outcome.ontology;
        let alice = ontology.find_individual("alice").expect("alice");
        let knows = ontology.find_property("knows").expect("knows");
        assert_eq!(
            ontology.individual(&alice).expect("alice").values(&knows),
            [PropertyAssertion::Individual(
                ontology.find_individual("bob").expect("bob")
            )]
        );
    }

    #[rstest]
    #[case("int", r#""thirty""#)]
    #[case("date", r#""2024-13-01""#)]
    #[case("bool", "1")]
    fn mistyped_values_are_rejected(#[case] range: &str, #[case] value: &str) {
        let text = format!(
            r#"{{"ontology_iri": "http://example.org/onto",
                "classes": {{"Person": "Thing"}},
                "data_properties": {{"p": {{"range": ["{range}"]}}}},
                "individuals": [{{"name": "x", "class": "Person", "attributes": {{"p": [{value}]}}}}]}}"#
        );
        let err = build(&definition(&text)).expect_err("invalid value");
        assert!(matches!(err, BuildError::InvalidValue { .. }));
    }

    #[test]
    fn undeclared_attribute_is_an_unknown_property() {
        let err = build(&definition(
            r#"{"ontology_iri": "http://example.org/onto",
                "classes": {"Person": "Thing"},
                "individuals": [{"name": "x", "class": "Person", "attributes": {"hasAge": [1]}}]}"#,
        ))
        .expect_err("unknown property");
        assert!(matches!(err, BuildError::UnknownProperty { ref property, .. } if property == "hasAge"));
    }

    #[test]
    fn unknown_object_range_is_rejected() {
        let err = build(&definition(
            r#"{"ontology_iri": "http://example.org/onto",
                "classes": {"Person": "Thing"},
                "object_properties": {"owns": {"range": ["Car"]}}}"#,
        ))
        .expect_err("unknown range");
        assert!(matches!(err, BuildError::UnknownRangeType { ref range, .. } if range == "Car"));
    }

    #[test]
    fn unknown_characteristic_is_named() {
        let err = build(&definition(
            r#"{"ontology_iri": "http://example.org/onto",
                "classes": {"Person": "Thing"},
                "object_properties": {"knows": {"range": ["Person"], "property_type": ["Reflexive"]}}}"#,
        ))
        .expect_err("unknown characteristic");
        assert!(matches!(
            err,
            BuildError::UnknownCharacteristic { ref property, ref characteristic }
                if property == "knows" && characteristic == "Reflexive"
        ));
    }

    #[test]
    fn names_are_unique_across_entity_kinds() {
        let err = build(&definition(
            r#"{"ontology_iri": "http://example.org/onto",
                "classes": {"Person": "Thing"},
                "individuals": [{"name": "Person", "class": "Person"}]}"#,
        ))
        .expect_err("duplicate");
        assert!(matches!(err, BuildError::DuplicateEntity { ref name } if name == "Person"));
    }

    #[test]
    fn enrichment_misses_are_reported() {
        let outcome = build(&definition(
            r#"{"ontology_iri": "http://example.org/onto",
                "classes": {"Person": "Thing", "Human": "Thing"},
                "object_properties": {"hasAncestor": {}},
                "equivalent_classes": [{"class": "Person", "equivalent_to": ["Human", "Mensch"]}],
                "general_axioms": [{"axiom_type": "TransitiveProperty", "properties": ["hasAncestor", "missing"]}],
                "annotations": {"hasDescription": {"Person": ["A human"], "Ghost": ["boo"]}}}"#,
        ))
        .expect("build");
        let skipped: Vec<(Enrichment, &str)> = outcome
            .report
            .skipped()
            .iter()
            .map(|item| (item.enrichment, item.name.as_str()))
            .collect();
        assert_eq!(
            skipped,
            [
                (Enrichment::Equivalence, "Mensch"),
                (Enrichment::GeneralAxiom, "missing"),
                (Enrichment::Annotation, "Ghost"),
            ]
        );

        let ontology = outcome.ontology;
        let person = ontology.find_class("Person").expect("person");
        let human = ontology.find_class("Human").expect("human");
        assert!(ontology.class(&human).expect("human").equivalents().contains(&person));
        let ancestor = ontology.find_property("hasAncestor").expect("property");
        assert!(ontology
            .property(&ancestor)
            .expect("property")
            .characteristics()
            .contains(&Characteristic::Transitive));
    }
}
