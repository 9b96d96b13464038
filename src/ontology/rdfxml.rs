//! RDF/XML encoding of the [`Ontology`] aggregate.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};

use oxrdf::{
    vocab::{rdf, rdfs},
    Literal, NamedNodeRef, Term, TermRef, Triple, TripleRef,
};
use oxrdfxml::{RdfXmlParser, RdfXmlSerializer};

use super::{
    entities::{
        thing, Characteristic, Class, Individual, Ontology, Property, PropertyAssertion,
        PropertyKind,
    },
    value_objects::Iri,
    vocab::owl,
};
use crate::{Error, Result};

/// Serializes `ontology` as RDF/XML into `writer`.
///
/// Disjointness groups are written as pairwise `owl:disjointWith` statements
/// and equivalences in both directions.
///
/// # Errors
///
/// Returns [`Error::Serialization`] when the writer fails.
pub fn write<W: Write>(ontology: &Ontology, writer: W) -> Result<W> {
    let mut serializer = RdfXmlSerializer::new().for_writer(writer);
    let mut emit = |subject: NamedNodeRef<'_>, predicate: NamedNodeRef<'_>, object: TermRef<'_>| {
        serializer
            .serialize_triple(TripleRef::new(subject, predicate, object))
            .map_err(|err| Error::Serialization(err.to_string()))
    };

    let id = ontology.id().as_named_node();
    emit(id, rdf::TYPE, owl::ONTOLOGY.into())?;
    if let Some(label) = ontology.label() {
        emit(id, rdfs::LABEL, Literal::new_simple_literal(label).as_ref().into())?;
    }

    for class in ontology.classes().values() {
        let subject = class.id().as_named_node();
        emit(subject, rdf::TYPE, owl::CLASS.into())?;
        if let Some(label) = class.label() {
            emit(subject, rdfs::LABEL, Literal::new_simple_literal(label).as_ref().into())?;
        }
        if let Some(comment) = class.comment() {
            emit(subject, rdfs::COMMENT, Literal::new_simple_literal(comment).as_ref().into())?;
        }
        for parent in class.parents() {
            emit(subject, rdfs::SUB_CLASS_OF, parent.as_named_node().into())?;
        }
        for equivalent in class.equivalents() {
            emit(subject, owl::EQUIVALENT_CLASS, equivalent.as_named_node().into())?;
        }
    }

    let mut pairs = BTreeSet::new();
    for group in ontology.disjoint_groups() {
        for left in group {
            for right in group.range(left..).skip(1) {
                pairs.insert((left, right));
            }
        }
    }
    for (left, right) in pairs {
        emit(left.as_named_node(), owl::DISJOINT_WITH, right.as_named_node().into())?;
    }

    for property in ontology.properties().values() {
        let subject = property.id().as_named_node();
        emit(subject, rdf::TYPE, property.kind().owl_type().into())?;
        if let Some(label) = property.label() {
            emit(subject, rdfs::LABEL, Literal::new_simple_literal(label).as_ref().into())?;
        }
        for characteristic in property.characteristics() {
            emit(subject, rdf::TYPE, characteristic.owl_type().into())?;
        }
        for domain in property.domains() {
            emit(subject, rdfs::DOMAIN, domain.as_named_node().into())?;
        }
        for range in property.ranges() {
            emit(subject, rdfs::RANGE, range.as_named_node().into())?;
        }
        if let Some(inverse) = property.inverse() {
            emit(subject, owl::INVERSE_OF, inverse.as_named_node().into())?;
        }
    }

    for individual in ontology.individuals().values() {
        let subject = individual.id().as_named_node();
        emit(subject, rdf::TYPE, owl::NAMED_INDIVIDUAL.into())?;
        for class in individual.types() {
            emit(subject, rdf::TYPE, class.as_named_node().into())?;
        }
        for (property, assertions) in individual.properties() {
            for assertion in assertions {
                match assertion {
                    PropertyAssertion::Individual(target) => {
                        emit(subject, property.as_named_node(), target.as_named_node().into())?;
                    }
                    PropertyAssertion::Literal { lexical, datatype } => {
                        let literal =
                            Literal::new_typed_literal(lexical.as_str(), datatype.as_named_node());
                        emit(subject, property.as_named_node(), literal.as_ref().into())?;
                    }
                }
            }
        }
    }

    for (target, values) in ontology.annotations() {
        for (property, texts) in values {
            for text in texts {
                let literal = Literal::new_simple_literal(text.as_str());
                emit(target.as_named_node(), property.as_named_node(), literal.as_ref().into())?;
            }
        }
    }

    serializer
        .finish()
        .map_err(|err| Error::Serialization(err.to_string()))
}

/// Statements of one subject, grouped by predicate in document order.
type Statements = BTreeMap<Iri, Vec<Term>>;

/// Parses an RDF/XML document produced by [`write`] or any OWL tool emitting
/// the same vocabulary. Statements outside the supported model are ignored.
///
/// # Errors
///
/// Returns [`Error::Serialization`] for syntax errors or when the document does
/// not declare an `owl:Ontology`, and [`Error::Ontology`] when the statements
/// break the aggregate invariants (a class hierarchy cycle, for instance).
pub fn read<R: Read>(reader: R) -> Result<Ontology> {
    let mut subjects: BTreeMap<Iri, Statements> = BTreeMap::new();
    for triple in RdfXmlParser::new().for_reader(reader) {
        let Triple {
            subject,
            predicate,
            object,
            ..
        } = triple.map_err(|err| Error::Serialization(err.to_string()))?;
        let Term::NamedNode(subject) = Term::from(subject) else {
            continue;
        };
        subjects
            .entry(Iri::from(subject))
            .or_default()
            .entry(Iri::from(predicate))
            .or_default()
            .push(object);
    }

    let documents = Document { subjects };
    documents.into_ontology()
}

struct Document {
    subjects: BTreeMap<Iri, Statements>,
}

impl Document {
    fn objects<'a>(&'a self, subject: &Iri, predicate: NamedNodeRef<'_>) -> impl Iterator<Item = &'a Term> {
        self.subjects
            .get(subject)
            .and_then(|statements| statements.get(&Iri::from(predicate)))
            .into_iter()
            .flatten()
    }

    fn named_objects(&self, subject: &Iri, predicate: NamedNodeRef<'_>) -> Vec<Iri> {
        self.objects(subject, predicate)
            .filter_map(|term| match term {
                Term::NamedNode(node) => Some(Iri::from(node.clone())),
                _ => None,
            })
            .collect()
    }

    fn literal(&self, subject: &Iri, predicate: NamedNodeRef<'_>) -> Option<String> {
        self.objects(subject, predicate).find_map(|term| match term {
            Term::Literal(literal) => Some(literal.value().to_string()),
            _ => None,
        })
    }

    fn typed(&self, kind: NamedNodeRef<'_>) -> Vec<Iri> {
        self.subjects
            .keys()
            .filter(|subject| {
                self.named_objects(subject, rdf::TYPE)
                    .iter()
                    .any(|class| class.as_str() == kind.as_str())
            })
            .cloned()
            .collect()
    }

    fn into_ontology(self) -> Result<Ontology> {
        let Some(id) = self.typed(owl::ONTOLOGY).into_iter().next() else {
            return Err(Error::Serialization(
                "document does not declare an owl:Ontology".to_string(),
            ));
        };
        let mut ontology = Ontology::new(id.clone());
        if let Some(label) = self.literal(&id, rdfs::LABEL) {
            ontology = ontology.with_label(label);
        }

        let classes: BTreeSet<Iri> = self
            .typed(owl::CLASS)
            .into_iter()
            .filter(|class| *class != thing())
            .collect();
        self.add_classes(&mut ontology, &classes)?;

        let mut inverses = Vec::new();
        for kind in [PropertyKind::Object, PropertyKind::Data, PropertyKind::Annotation] {
            for id in self.typed(kind.owl_type()) {
                self.add_property(&mut ontology, &id, kind)?;
                inverses.extend(
                    self.named_objects(&id, owl::INVERSE_OF)
                        .into_iter()
                        .map(|inverse| (id.clone(), inverse)),
                );
            }
        }
        for (property, inverse) in inverses {
            if let Err(err) = ontology.link_inverse(&property, &inverse) {
                tracing::warn!(%property, %inverse, error = %err, "ignoring inverse declaration");
            }
        }

        self.add_individuals(&mut ontology, &classes)?;

        for class in &classes {
            for other in self.named_objects(class, owl::EQUIVALENT_CLASS) {
                if let Err(err) = ontology.add_equivalence(class, &other) {
                    tracing::warn!(%class, %other, error = %err, "ignoring equivalence");
                }
            }
            for other in self.named_objects(class, owl::DISJOINT_WITH) {
                if let Err(err) = ontology.add_disjoint_group(BTreeSet::from([class.clone(), other.clone()])) {
                    tracing::warn!(%class, %other, error = %err, "ignoring disjointness");
                }
            }
        }

        let annotation_properties: Vec<Iri> = ontology
            .properties_of_kind(PropertyKind::Annotation)
            .map(|property| property.id().clone())
            .collect();
        for (subject, statements) in &self.subjects {
            if !ontology.contains_entity(subject) {
                continue;
            }
            for property in &annotation_properties {
                for term in statements.get(property).into_iter().flatten() {
                    if let Term::Literal(literal) = term {
                        ontology.annotate(subject, property, literal.value())?;
                    }
                }
            }
        }

        Ok(ontology)
    }

    /// Inserts classes parents first. Parents outside the document are dropped.
    fn add_classes(&self, ontology: &mut Ontology, classes: &BTreeSet<Iri>) -> Result<()> {
        let mut remaining: Vec<Class> = classes
            .iter()
            .map(|id| {
                let mut class = Class::new(id.clone());
                if let Some(label) = self.literal(id, rdfs::LABEL) {
                    class = class.with_label(label);
                }
                if let Some(comment) = self.literal(id, rdfs::COMMENT) {
                    class = class.with_comment(comment);
                }
                for parent in self.named_objects(id, rdfs::SUB_CLASS_OF) {
                    if parent == thing() || classes.contains(&parent) {
                        class.add_parent(parent);
                    } else {
                        tracing::warn!(class = %id, %parent, "ignoring undeclared parent class");
                    }
                }
                class
            })
            .collect();

        while !remaining.is_empty() {
            let (ready, blocked): (Vec<Class>, Vec<Class>) = remaining
                .into_iter()
                .partition(|class| class.parents().iter().all(|parent| ontology.contains_class(parent)));
            if ready.is_empty() {
                let Some(class) = blocked.first() else {
                    break;
                };
                return Err(Error::Serialization(format!(
                    "class hierarchy contains a cycle through `{}`",
                    class.id()
                )));
            }
            for class in ready {
                ontology.add_class(class)?;
            }
            remaining = blocked;
        }
        Ok(())
    }

    fn add_property(&self, ontology: &mut Ontology, id: &Iri, kind: PropertyKind) -> Result<()> {
        if ontology.property(id).is_some() {
            return Ok(());
        }
        let mut property = Property::new(id.clone(), kind);
        if let Some(label) = self.literal(id, rdfs::LABEL) {
            property = property.with_label(label);
        }
        ontology.add_property(property)?;

        for class in self.named_objects(id, rdf::TYPE) {
            if let Some(characteristic) = Characteristic::from_owl_type(class.as_named_node()) {
                ontology.add_characteristic(id, characteristic)?;
            }
        }
        for domain in self.named_objects(id, rdfs::DOMAIN) {
            if let Err(err) = ontology.add_domain(id, domain) {
                tracing::warn!(property = %id, error = %err, "ignoring domain");
            }
        }
        for range in self.named_objects(id, rdfs::RANGE) {
            if let Err(err) = ontology.add_range(id, range) {
                tracing::warn!(property = %id, error = %err, "ignoring range");
            }
        }
        Ok(())
    }

    fn add_individuals(&self, ontology: &mut Ontology, classes: &BTreeSet<Iri>) -> Result<()> {
        for (subject, statements) in &self.subjects {
            let types = self.named_objects(subject, rdf::TYPE);
            let named = types
                .iter()
                .any(|class| class.as_str() == owl::NAMED_INDIVIDUAL.as_str());
            let memberships: Vec<Iri> = types
                .into_iter()
                .filter(|class| classes.contains(class) || *class == thing())
                .collect();
            if !named && memberships.is_empty() {
                continue;
            }
            if classes.contains(subject) || ontology.property(subject).is_some() {
                continue;
            }

            let mut individual = Individual::new(subject.clone());
            for class in memberships {
                individual.assert_type(class);
            }
            for (predicate, objects) in statements {
                let Some(kind) = ontology.property(predicate).map(Property::kind) else {
                    continue;
                };
                for object in objects {
                    let assertion = match (kind, object) {
                        (PropertyKind::Object, Term::NamedNode(target)) => {
                            PropertyAssertion::Individual(Iri::from(target.clone()))
                        }
                        (PropertyKind::Data, Term::Literal(literal)) => PropertyAssertion::Literal {
                            lexical: literal.value().to_string(),
                            datatype: Iri::from(literal.datatype()),
                        },
                        _ => continue,
                    };
                    individual.add_property_assertion(predicate.clone(), assertion);
                }
            }
            ontology.add_individual(individual)?;
        }
        Ok(())
    }
}
