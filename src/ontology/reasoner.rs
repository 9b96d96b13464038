use std::collections::{BTreeMap, BTreeSet, VecDeque};

use async_trait::async_trait;
use thiserror::Error;

use super::{
    entities::{thing, Ontology, PropertyAssertion},
    value_objects::Iri,
};

/// Type alias simplifying reasoner trait object usage inside the services.
pub type ReasonerHandle = dyn Reasoner<Error = ReasonerError> + Send + Sync + 'static;

/// Conclusions drawn by a reasoner over a whole ontology.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inferences {
    /// Every class with its inferred superclasses, `owl:Thing` included.
    pub subsumers: BTreeMap<Iri, BTreeSet<Iri>>,
    /// Every individual with its asserted and inferred classes.
    pub memberships: BTreeMap<Iri, BTreeSet<Iri>>,
}

impl Inferences {
    /// Individuals that are members of `class`, directly or through a subclass.
    #[must_use]
    pub fn instances_of(&self, class: &Iri) -> Vec<Iri> {
        self.memberships
            .iter()
            .filter(|(_, classes)| classes.contains(class))
            .map(|(individual, _)| individual.clone())
            .collect()
    }
}

/// Abstraction over ontology reasoning engines.
#[async_trait]
pub trait Reasoner {
    /// Associated error type allowing engine specific failures.
    type Error;

    /// Classifies the ontology and checks it for consistency.
    async fn synchronize(&self, ontology: &Ontology) -> Result<Inferences, Self::Error>;

    /// Returns the inferred superclasses of `class`, nearest first, ending with
    /// `owl:Thing`.
    async fn ancestors_of(&self, ontology: &Ontology, class: &Iri) -> Result<Vec<Iri>, Self::Error>;

    /// Returns the individuals belonging to `class` or any of its subclasses.
    async fn instances_of(&self, ontology: &Ontology, class: &Iri) -> Result<Vec<Iri>, Self::Error>;

    /// Succeeds when the ontology admits a model.
    async fn check_consistency(&self, ontology: &Ontology) -> Result<(), Self::Error>;
}

/// Errors raised by reasoning engines.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReasonerError {
    /// The ontology is contradictory.
    #[error("ontology is inconsistent: {reason}")]
    Inconsistency { reason: String },
    /// Referenced class was not found in the ontology.
    #[error("class `{class}` missing in ontology `{ontology}`")]
    MissingClass { ontology: Iri, class: Iri },
    /// The engine itself failed.
    #[error("reasoner failure: {0}")]
    Engine(String),
}

impl ReasonerError {
    fn inconsistency(reason: String) -> Self {
        Self::Inconsistency { reason }
    }

    fn missing_class(ontology: &Ontology, class: &Iri) -> Self {
        Self::MissingClass {
            ontology: ontology.id().clone(),
            class: class.clone(),
        }
    }
}

/// Reasoner working on the told class hierarchy.
///
/// Subsumption follows `rdfs:subClassOf` and `owl:equivalentClass` edges.
/// Inconsistency is reported for classes or individuals falling under two
/// disjoint classes and for functional data properties holding distinct
/// values.
#[derive(Clone, Debug, Default)]
pub struct StructuralReasoner;

impl StructuralReasoner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Breadth first walk over parents and equivalents, `owl:Thing` last.
    fn closure(ontology: &Ontology, start: &Iri) -> Vec<Iri> {
        let mut visited = BTreeSet::from([start.clone()]);
        let mut to_visit = VecDeque::from([start.clone()]);
        let mut result = Vec::new();

        while let Some(current) = to_visit.pop_front() {
            let Some(class) = ontology.class(&current) else {
                continue;
            };
            for next in class.parents().iter().chain(class.equivalents()) {
                if visited.insert(next.clone()) {
                    to_visit.push_back(next.clone());
                    if *next != thing() {
                        result.push(next.clone());
                    }
                }
            }
        }

        result.push(thing());
        result
    }

    fn classify(ontology: &Ontology) -> Inferences {
        let subsumers = ontology
            .classes()
            .keys()
            .map(|class| (class.clone(), Self::closure(ontology, class).into_iter().collect()))
            .collect::<BTreeMap<Iri, BTreeSet<Iri>>>();

        let memberships = ontology
            .individuals()
            .values()
            .map(|individual| {
                let mut classes = BTreeSet::from([thing()]);
                for class in individual.types() {
                    classes.insert(class.clone());
                    if let Some(inferred) = subsumers.get(class) {
                        classes.extend(inferred.iter().cloned());
                    }
                }
                (individual.id().clone(), classes)
            })
            .collect();

        Inferences {
            subsumers,
            memberships,
        }
    }

    fn clash(ontology: &Ontology, classes: &BTreeSet<Iri>) -> Option<(Iri, Iri)> {
        classes.iter().find_map(|class| {
            ontology
                .disjoint_with(class)
                .into_iter()
                .find(|other| classes.contains(other))
                .map(|other| (class.clone(), other))
        })
    }

    fn verify(ontology: &Ontology, inferences: &Inferences) -> Result<(), ReasonerError> {
        for (class, subsumers) in &inferences.subsumers {
            let mut classes = subsumers.clone();
            classes.insert(class.clone());
            if let Some((left, right)) = Self::clash(ontology, &classes) {
                return Err(ReasonerError::inconsistency(format!(
                    "class `{class}` is subsumed by disjoint classes `{left}` and `{right}`"
                )));
            }
        }

        for (individual, classes) in &inferences.memberships {
            if let Some((left, right)) = Self::clash(ontology, classes) {
                return Err(ReasonerError::inconsistency(format!(
                    "individual `{individual}` belongs to disjoint classes `{left}` and `{right}`"
                )));
            }
        }

        for individual in ontology.individuals().values() {
            for (property, assertions) in individual.properties() {
                let functional = ontology
                    .property(property)
                    .is_some_and(|p| p.is_functional());
                if !functional {
                    continue;
                }
                let distinct: BTreeSet<&str> = assertions
                    .iter()
                    .filter_map(|assertion| match assertion {
                        PropertyAssertion::Literal { lexical, .. } => Some(lexical.as_str()),
                        PropertyAssertion::Individual(_) => None,
                    })
                    .collect();
                if distinct.len() > 1 {
                    return Err(ReasonerError::inconsistency(format!(
                        "functional property `{property}` has {} values on `{}`",
                        distinct.len(),
                        individual.id()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Reasoner for StructuralReasoner {
    type Error = ReasonerError;

    async fn synchronize(&self, ontology: &Ontology) -> Result<Inferences, Self::Error> {
        let inferences = Self::classify(ontology);
        Self::verify(ontology, &inferences)?;
        tracing::info!(
            ontology = %ontology.id(),
            classes = inferences.subsumers.len(),
            individuals = inferences.memberships.len(),
            "reasoner synchronized"
        );
        Ok(inferences)
    }

    async fn ancestors_of(&self, ontology: &Ontology, class: &Iri) -> Result<Vec<Iri>, Self::Error> {
        if *class == thing() {
            return Ok(Vec::new());
        }
        if ontology.class(class).is_none() {
            return Err(ReasonerError::missing_class(ontology, class));
        }
        Ok(Self::closure(ontology, class))
    }

    async fn instances_of(&self, ontology: &Ontology, class: &Iri) -> Result<Vec<Iri>, Self::Error> {
        if !ontology.contains_class(class) {
            return Err(ReasonerError::missing_class(ontology, class));
        }
        Ok(Self::classify(ontology).instances_of(class))
    }

    async fn check_consistency(&self, ontology: &Ontology) -> Result<(), Self::Error> {
        let inferences = Self::classify(ontology);
        Self::verify(ontology, &inferences)
    }
}

#[cfg(test)]
mod tests {
    use super::{Reasoner, ReasonerError, StructuralReasoner};
    use crate::ontology::{
        entities::{thing, Class, Individual, Ontology},
        value_objects::Iri,
    };
    use std::collections::BTreeSet;

    fn iri(name: &str) -> Iri {
        Iri::new(format!("https://example.org/onto#{name}")).expect("valid iri")
    }

    fn university() -> Ontology {
        let mut ontology =
            Ontology::new(Iri::new("https://example.org/onto").expect("valid iri"));
        ontology
            .add_class(Class::subclass_of(iri("Person"), thing()))
            .expect("person");
        ontology
            .add_class(Class::subclass_of(iri("Student"), iri("Person")))
            .expect("student");
        ontology
            .add_class(Class::subclass_of(iri("Course"), thing()))
            .expect("course");
        let mut alice = Individual::new(iri("alice"));
        alice.assert_type(iri("Student"));
        ontology.add_individual(alice).expect("alice");
        ontology
    }

    #[tokio::test]
    async fn ancestors_walk_up_to_thing() {
        let ontology = university();
        let ancestors = StructuralReasoner::new()
            .ancestors_of(&ontology, &iri("Student"))
            .await
            .expect("ancestors");
        assert_eq!(ancestors, vec![iri("Person"), thing()]);
    }

    #[tokio::test]
    async fn instances_include_subclass_members() {
        let ontology = university();
        let reasoner = StructuralReasoner::new();
        assert_eq!(
            reasoner
                .instances_of(&ontology, &iri("Person"))
                .await
                .expect("instances"),
            vec![iri("alice")]
        );
        assert!(reasoner
            .instances_of(&ontology, &iri("Course"))
            .await
            .expect("instances")
            .is_empty());
    }

    #[tokio::test]
    async fn members_of_disjoint_classes_are_inconsistent() {
        let mut ontology = university();
        ontology
            .add_disjoint_group(BTreeSet::from([iri("Person"), iri("Course")]))
            .expect("disjointness");
        let reasoner = StructuralReasoner::new();
        reasoner
            .check_consistency(&ontology)
            .await
            .expect("consistent so far");

        let mut odd = Individual::new(iri("odd"));
        odd.assert_type(iri("Student"));
        odd.assert_type(iri("Course"));
        ontology.add_individual(odd).expect("odd");
        let err = reasoner
            .synchronize(&ontology)
            .await
            .expect_err("inconsistent");
        assert!(matches!(err, ReasonerError::Inconsistency { .. }));
    }

    #[tokio::test]
    async fn unknown_classes_are_reported() {
        let ontology = university();
        let err = StructuralReasoner::new()
            .ancestors_of(&ontology, &iri("Robot"))
            .await
            .expect_err("missing");
        assert!(matches!(err, ReasonerError::MissingClass { .. }));
    }
}
