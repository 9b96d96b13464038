use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use oxrdf::{vocab::xsd, NamedNodeRef};
use thiserror::Error;

use super::{value_objects::Iri, vocab::owl};

/// Identifier of `owl:Thing`, the implicit root of every class hierarchy.
#[must_use]
pub fn thing() -> Iri {
    Iri::from(owl::THING)
}

/// Ontology class definition capturing parent relationships and metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Class {
    id: Iri,
    label: Option<String>,
    comment: Option<String>,
    super_classes: BTreeSet<Iri>,
    equivalents: BTreeSet<Iri>,
}

impl Class {
    /// Creates a new [`Class`] with the supplied identifier.
    #[must_use]
    pub fn new(id: Iri) -> Self {
        Self {
            id,
            label: None,
            comment: None,
            super_classes: BTreeSet::new(),
            equivalents: BTreeSet::new(),
        }
    }

    /// Creates a class placed directly under `parent`.
    #[must_use]
    pub fn subclass_of(id: Iri, parent: Iri) -> Self {
        let mut class = Self::new(id);
        class.add_parent(parent);
        class
    }

    /// Sets a human friendly label for the class.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets a textual description for the class.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Adds a new parent class relation.
    pub fn add_parent(&mut self, parent: Iri) -> bool {
        self.super_classes.insert(parent)
    }

    /// Returns the unique identifier of the class.
    #[must_use]
    pub fn id(&self) -> &Iri {
        &self.id
    }

    /// Returns the local name of the class.
    #[must_use]
    pub fn name(&self) -> &str {
        self.id.local_name()
    }

    /// Returns the optional label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the optional comment.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns the parent classes in lexical order.
    #[must_use]
    pub fn parents(&self) -> &BTreeSet<Iri> {
        &self.super_classes
    }

    /// Returns the classes declared equivalent to this one.
    #[must_use]
    pub fn equivalents(&self) -> &BTreeSet<Iri> {
        &self.equivalents
    }
}

/// Classifies the type of values a property can hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PropertyKind {
    /// Object properties link individuals.
    Object,
    /// Data properties capture literal values.
    Data,
    /// Annotation properties attach free text to any entity.
    Annotation,
}

impl PropertyKind {
    /// OWL declaration type of the kind.
    #[must_use]
    pub fn owl_type(self) -> NamedNodeRef<'static> {
        match self {
            Self::Object => owl::OBJECT_PROPERTY,
            Self::Data => owl::DATATYPE_PROPERTY,
            Self::Annotation => owl::ANNOTATION_PROPERTY,
        }
    }
}

/// Logical characteristics a property may carry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Characteristic {
    Functional,
    InverseFunctional,
    Transitive,
}

impl Characteristic {
    pub const ALL: [Self; 3] = [Self::Functional, Self::InverseFunctional, Self::Transitive];

    /// Parses the characteristic tags used by definition documents. Both the
    /// OWL names (`FunctionalProperty`) and short forms (`Functional`) are
    /// accepted.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "FunctionalProperty" | "Functional" => Some(Self::Functional),
            "InverseFunctionalProperty" | "InverseFunctional" => Some(Self::InverseFunctional),
            "TransitiveProperty" | "Transitive" => Some(Self::Transitive),
            _ => None,
        }
    }

    /// Canonical OWL tag.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Functional => "FunctionalProperty",
            Self::InverseFunctional => "InverseFunctionalProperty",
            Self::Transitive => "TransitiveProperty",
        }
    }

    /// OWL class typing a property with this characteristic.
    #[must_use]
    pub fn owl_type(self) -> NamedNodeRef<'static> {
        match self {
            Self::Functional => owl::FUNCTIONAL_PROPERTY,
            Self::InverseFunctional => owl::INVERSE_FUNCTIONAL_PROPERTY,
            Self::Transitive => owl::TRANSITIVE_PROPERTY,
        }
    }

    /// Inverse of [`Characteristic::owl_type`].
    #[must_use]
    pub fn from_owl_type(node: NamedNodeRef<'_>) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|characteristic| characteristic.owl_type() == node)
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Primitive value types a data property may range over.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Datatype {
    Integer,
    Double,
    String,
    Boolean,
    Date,
    Time,
    DateTime,
}

impl Datatype {
    pub const ALL: [Self; 7] = [
        Self::Integer,
        Self::Double,
        Self::String,
        Self::Boolean,
        Self::Date,
        Self::Time,
        Self::DateTime,
    ];

    /// Parses the primitive range tags used by definition documents.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "int" | "integer" => Some(Self::Integer),
            "float" | "double" => Some(Self::Double),
            "string" | "str" => Some(Self::String),
            "bool" | "boolean" => Some(Self::Boolean),
            "date" | "datetime.date" => Some(Self::Date),
            "time" | "datetime.time" => Some(Self::Time),
            "datetime" | "datetime.datetime" => Some(Self::DateTime),
            _ => None,
        }
    }

    /// Canonical range tag.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Integer => "int",
            Self::Double => "float",
            Self::String => "string",
            Self::Boolean => "bool",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
        }
    }

    /// XSD datatype backing the primitive.
    #[must_use]
    pub fn xsd(self) -> NamedNodeRef<'static> {
        match self {
            Self::Integer => xsd::INTEGER,
            Self::Double => xsd::DOUBLE,
            Self::String => xsd::STRING,
            Self::Boolean => xsd::BOOLEAN,
            Self::Date => xsd::DATE,
            Self::Time => xsd::TIME,
            Self::DateTime => xsd::DATE_TIME,
        }
    }

    /// XSD datatype IRI.
    #[must_use]
    pub fn iri(self) -> Iri {
        Iri::from(self.xsd())
    }

    /// Datatype whose XSD IRI is `iri`, if it is one of the supported primitives.
    #[must_use]
    pub fn from_iri(iri: &Iri) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|datatype| datatype.xsd().as_str() == iri.as_str())
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Ontology property definition supporting object, data and annotation
/// properties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    id: Iri,
    label: Option<String>,
    kind: PropertyKind,
    characteristics: BTreeSet<Characteristic>,
    domains: BTreeSet<Iri>,
    ranges: BTreeSet<Iri>,
    inverse: Option<Iri>,
}

impl Property {
    /// Creates a new property with the provided identifier and kind.
    #[must_use]
    pub fn new(id: Iri, kind: PropertyKind) -> Self {
        Self {
            id,
            label: None,
            kind,
            characteristics: BTreeSet::new(),
            domains: BTreeSet::new(),
            ranges: BTreeSet::new(),
            inverse: None,
        }
    }

    /// Sets a human readable label for the property.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Declares that the property applies to the supplied domain class.
    pub fn add_domain(&mut self, class: Iri) -> bool {
        self.domains.insert(class)
    }

    /// Declares the range: a class for object properties, an XSD datatype for
    /// data properties.
    pub fn add_range(&mut self, range: Iri) -> bool {
        self.ranges.insert(range)
    }

    /// Attaches a characteristic. Returns `false` when it was already present.
    pub fn add_characteristic(&mut self, characteristic: Characteristic) -> bool {
        self.characteristics.insert(characteristic)
    }

    /// Records the formal inverse of this property.
    pub fn set_inverse(&mut self, inverse: Iri) {
        self.inverse = Some(inverse);
    }

    /// Returns the property identifier.
    #[must_use]
    pub fn id(&self) -> &Iri {
        &self.id
    }

    /// Local name of the property IRI.
    #[must_use]
    pub fn name(&self) -> &str {
        self.id.local_name()
    }

    /// Returns the optional label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the property kind.
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Returns the declared characteristics.
    #[must_use]
    pub fn characteristics(&self) -> &BTreeSet<Characteristic> {
        &self.characteristics
    }

    /// Whether the property holds at most one value per individual.
    #[must_use]
    pub fn is_functional(&self) -> bool {
        self.characteristics.contains(&Characteristic::Functional)
    }

    /// Returns the registered domain classes.
    #[must_use]
    pub fn domains(&self) -> &BTreeSet<Iri> {
        &self.domains
    }

    /// Returns the registered ranges.
    #[must_use]
    pub fn ranges(&self) -> &BTreeSet<Iri> {
        &self.ranges
    }

    /// Datatype of the first registered range that is a known primitive.
    #[must_use]
    pub fn datatype(&self) -> Option<Datatype> {
        self.ranges.iter().find_map(Datatype::from_iri)
    }

    /// Returns the linked inverse property, if any.
    #[must_use]
    pub fn inverse(&self) -> Option<&Iri> {
        self.inverse.as_ref()
    }
}

/// Property assertions attached to individuals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyAssertion {
    /// Object properties target another individual.
    Individual(Iri),
    /// Data properties store typed literal values.
    Literal { lexical: String, datatype: Iri },
}

impl PropertyAssertion {
    /// Builds a literal assertion of a known primitive type.
    #[must_use]
    pub fn literal(lexical: impl Into<String>, datatype: Datatype) -> Self {
        Self::Literal {
            lexical: lexical.into(),
            datatype: datatype.iri(),
        }
    }

    /// Textual form of the value: the lexical form of literals, the local name
    /// of referenced individuals.
    #[must_use]
    pub fn lexical(&self) -> &str {
        match self {
            Self::Individual(target) => target.local_name(),
            Self::Literal { lexical, .. } => lexical,
        }
    }
}

/// An ontology individual containing class memberships and property assertions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Individual {
    id: Iri,
    types: BTreeSet<Iri>,
    properties: BTreeMap<Iri, Vec<PropertyAssertion>>,
}

impl Individual {
    /// Creates a new individual with the supplied identifier.
    #[must_use]
    pub fn new(id: Iri) -> Self {
        Self {
            id,
            types: BTreeSet::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Declares that the individual is an instance of the given class.
    pub fn assert_type(&mut self, class: Iri) -> bool {
        self.types.insert(class)
    }

    /// Associates the individual with a property assertion.
    pub fn add_property_assertion(&mut self, property: Iri, assertion: PropertyAssertion) {
        self.properties.entry(property).or_default().push(assertion);
    }

    /// Returns the identifier of the individual.
    #[must_use]
    pub fn id(&self) -> &Iri {
        &self.id
    }

    /// Local name of the individual IRI.
    #[must_use]
    pub fn name(&self) -> &str {
        self.id.local_name()
    }

    /// Returns the declared types.
    #[must_use]
    pub fn types(&self) -> &BTreeSet<Iri> {
        &self.types
    }

    /// Returns the property assertions.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<Iri, Vec<PropertyAssertion>> {
        &self.properties
    }

    /// Returns the values asserted for one property, in assertion order.
    #[must_use]
    pub fn values(&self, property: &Iri) -> &[PropertyAssertion] {
        self.properties.get(property).map_or(&[], Vec::as_slice)
    }
}

/// Annotation values keyed by annotation property, in insertion order.
pub type AnnotationValues = BTreeMap<Iri, Vec<String>>;

/// Aggregates ontology classes, properties, individuals and axioms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ontology {
    id: Iri,
    label: Option<String>,
    classes: BTreeMap<Iri, Class>,
    properties: BTreeMap<Iri, Property>,
    individuals: BTreeMap<Iri, Individual>,
    disjoint_groups: Vec<BTreeSet<Iri>>,
    annotations: BTreeMap<Iri, AnnotationValues>,
}

impl Ontology {
    /// Creates a new ontology aggregate with the supplied identifier.
    #[must_use]
    pub fn new(id: Iri) -> Self {
        Self {
            id,
            label: None,
            classes: BTreeMap::new(),
            properties: BTreeMap::new(),
            individuals: BTreeMap::new(),
            disjoint_groups: Vec::new(),
            annotations: BTreeMap::new(),
        }
    }

    /// Sets a human readable label for the ontology.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Adds a class to the ontology, enforcing unique identifiers and known
    /// parents.
    pub fn add_class(&mut self, class: Class) -> Result<(), OntologyError> {
        let id = class.id().clone();
        if self.classes.contains_key(&id) || id == thing() {
            return Err(OntologyError::DuplicateClass(id));
        }
        for parent in class.parents() {
            self.require_class(parent)?;
        }
        self.classes.insert(id, class);
        Ok(())
    }

    /// Adds a property to the ontology, validating references to known classes
    /// and datatypes.
    pub fn add_property(&mut self, property: Property) -> Result<(), OntologyError> {
        let id = property.id().clone();
        if self.properties.contains_key(&id) {
            return Err(OntologyError::DuplicateProperty(id));
        }

        for class in property.domains() {
            self.require_class(class)?;
        }
        for range in property.ranges() {
            match property.kind() {
                PropertyKind::Object => self.require_class(range)?,
                PropertyKind::Data => {
                    if Datatype::from_iri(range).is_none() {
                        return Err(OntologyError::UnsupportedDatatype {
                            property: id,
                            datatype: range.clone(),
                        });
                    }
                }
                PropertyKind::Annotation => {}
            }
        }

        self.properties.insert(id, property);
        Ok(())
    }

    /// Adds an individual ensuring it references known classes and properties.
    pub fn add_individual(&mut self, individual: Individual) -> Result<(), OntologyError> {
        let id = individual.id().clone();
        if self.individuals.contains_key(&id) {
            return Err(OntologyError::DuplicateIndividual(id));
        }

        for class in individual.types() {
            self.require_class(class)?;
        }

        for (property_id, assertions) in individual.properties() {
            let Some(property) = self.properties.get(property_id) else {
                return Err(OntologyError::MissingProperty {
                    ontology: self.id.clone(),
                    property: property_id.clone(),
                });
            };

            for assertion in assertions {
                match (property.kind(), assertion) {
                    (PropertyKind::Object, PropertyAssertion::Individual(_))
                    | (PropertyKind::Data, PropertyAssertion::Literal { .. }) => {}
                    _ => {
                        return Err(OntologyError::InvalidPropertyAssertion {
                            ontology: self.id.clone(),
                            property: property_id.clone(),
                        });
                    }
                }
            }
        }

        self.individuals.insert(id, individual);
        Ok(())
    }

    /// Attaches a characteristic to an existing property. Returns `false`
    /// when the property already carried it.
    pub fn add_characteristic(
        &mut self,
        property: &Iri,
        characteristic: Characteristic,
    ) -> Result<bool, OntologyError> {
        let ontology = self.id.clone();
        let Some(existing) = self.properties.get_mut(property) else {
            return Err(OntologyError::MissingProperty {
                ontology,
                property: property.clone(),
            });
        };
        Ok(existing.add_characteristic(characteristic))
    }

    /// Extends the domain of an existing property with a known class.
    pub fn add_domain(&mut self, property: &Iri, class: Iri) -> Result<bool, OntologyError> {
        self.require_class(&class)?;
        let ontology = self.id.clone();
        let Some(existing) = self.properties.get_mut(property) else {
            return Err(OntologyError::MissingProperty {
                ontology,
                property: property.clone(),
            });
        };
        Ok(existing.add_domain(class))
    }

    /// Extends the range of an existing property. Object properties range over
    /// known classes, data properties over supported datatypes.
    pub fn add_range(&mut self, property: &Iri, range: Iri) -> Result<bool, OntologyError> {
        let kind = match self.properties.get(property) {
            Some(existing) => existing.kind(),
            None => {
                return Err(OntologyError::MissingProperty {
                    ontology: self.id.clone(),
                    property: property.clone(),
                })
            }
        };
        match kind {
            PropertyKind::Object => self.require_class(&range)?,
            PropertyKind::Data if Datatype::from_iri(&range).is_none() => {
                return Err(OntologyError::UnsupportedDatatype {
                    property: property.clone(),
                    datatype: range,
                });
            }
            PropertyKind::Data | PropertyKind::Annotation => {}
        }
        Ok(self
            .properties
            .get_mut(property)
            .is_some_and(|existing| existing.add_range(range)))
    }

    /// Links two existing properties as formal inverses of each other.
    pub fn link_inverse(&mut self, property: &Iri, inverse: &Iri) -> Result<(), OntologyError> {
        for id in [property, inverse] {
            if !self.properties.contains_key(id) {
                return Err(OntologyError::MissingProperty {
                    ontology: self.id.clone(),
                    property: id.clone(),
                });
            }
        }
        if let Some(existing) = self.properties.get_mut(property) {
            existing.set_inverse(inverse.clone());
        }
        if let Some(existing) = self.properties.get_mut(inverse) {
            existing.set_inverse(property.clone());
        }
        Ok(())
    }

    /// Declares the classes mutually disjoint. Groups need at least two
    /// distinct known classes; an identical group is only recorded once.
    pub fn add_disjoint_group(&mut self, classes: BTreeSet<Iri>) -> Result<bool, OntologyError> {
        if classes.len() < 2 {
            return Err(OntologyError::DegenerateDisjointness {
                ontology: self.id.clone(),
            });
        }
        for class in &classes {
            self.require_class(class)?;
        }
        if self.disjoint_groups.contains(&classes) {
            return Ok(false);
        }
        self.disjoint_groups.push(classes);
        Ok(true)
    }

    /// Records a bidirectional equivalence between two known classes.
    pub fn add_equivalence(&mut self, class: &Iri, other: &Iri) -> Result<bool, OntologyError> {
        self.require_declared_class(class)?;
        self.require_declared_class(other)?;
        let mut added = false;
        if let Some(existing) = self.classes.get_mut(class) {
            added |= existing.equivalents.insert(other.clone());
        }
        if let Some(existing) = self.classes.get_mut(other) {
            added |= existing.equivalents.insert(class.clone());
        }
        Ok(added)
    }

    /// Attaches an annotation value to a class, property or individual.
    /// Returns `false` when the exact value was already attached.
    pub fn annotate(
        &mut self,
        target: &Iri,
        property: &Iri,
        value: impl Into<String>,
    ) -> Result<bool, OntologyError> {
        match self.properties.get(property) {
            Some(existing) if existing.kind() == PropertyKind::Annotation => {}
            _ => {
                return Err(OntologyError::MissingProperty {
                    ontology: self.id.clone(),
                    property: property.clone(),
                })
            }
        }
        if !self.contains_entity(target) {
            return Err(OntologyError::MissingEntity {
                ontology: self.id.clone(),
                entity: target.clone(),
            });
        }

        let value = value.into();
        let values = self
            .annotations
            .entry(target.clone())
            .or_default()
            .entry(property.clone())
            .or_default();
        if values.contains(&value) {
            return Ok(false);
        }
        values.push(value);
        Ok(true)
    }

    fn require_class(&self, class: &Iri) -> Result<(), OntologyError> {
        if self.contains_class(class) {
            Ok(())
        } else {
            Err(OntologyError::MissingClass {
                ontology: self.id.clone(),
                class: class.clone(),
            })
        }
    }

    fn require_declared_class(&self, class: &Iri) -> Result<(), OntologyError> {
        if self.classes.contains_key(class) {
            Ok(())
        } else {
            Err(OntologyError::MissingClass {
                ontology: self.id.clone(),
                class: class.clone(),
            })
        }
    }

    /// Returns the ontology identifier.
    #[must_use]
    pub fn id(&self) -> &Iri {
        &self.id
    }

    /// Returns the optional label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Whether the class is declared or is `owl:Thing`.
    #[must_use]
    pub fn contains_class(&self, id: &Iri) -> bool {
        self.classes.contains_key(id) || *id == thing()
    }

    /// Whether any class, property or individual carries the identifier.
    #[must_use]
    pub fn contains_entity(&self, id: &Iri) -> bool {
        self.classes.contains_key(id)
            || self.properties.contains_key(id)
            || self.individuals.contains_key(id)
    }

    /// Retrieves a class by identifier.
    #[must_use]
    pub fn class(&self, id: &Iri) -> Option<&Class> {
        self.classes.get(id)
    }

    /// Retrieves a property by identifier.
    #[must_use]
    pub fn property(&self, id: &Iri) -> Option<&Property> {
        self.properties.get(id)
    }

    /// Retrieves an individual by identifier.
    #[must_use]
    pub fn individual(&self, id: &Iri) -> Option<&Individual> {
        self.individuals.get(id)
    }

    /// Resolves a class by local name. `Thing` names the root.
    #[must_use]
    pub fn find_class(&self, name: &str) -> Option<Iri> {
        if name == "Thing" {
            return Some(thing());
        }
        find_by_name(self.id(), &self.classes, name)
    }

    /// Resolves a property of any kind by local name.
    #[must_use]
    pub fn find_property(&self, name: &str) -> Option<Iri> {
        find_by_name(self.id(), &self.properties, name)
    }

    /// Resolves an individual by local name.
    #[must_use]
    pub fn find_individual(&self, name: &str) -> Option<Iri> {
        find_by_name(self.id(), &self.individuals, name)
    }

    /// Resolves any named entity, trying classes, then properties, then
    /// individuals.
    #[must_use]
    pub fn find_entity(&self, name: &str) -> Option<Iri> {
        find_by_name(self.id(), &self.classes, name)
            .or_else(|| self.find_property(name))
            .or_else(|| self.find_individual(name))
    }

    /// Returns all classes ordered by identifier.
    #[must_use]
    pub fn classes(&self) -> &BTreeMap<Iri, Class> {
        &self.classes
    }

    /// Returns all properties ordered by identifier.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<Iri, Property> {
        &self.properties
    }

    /// Returns the properties of one kind.
    pub fn properties_of_kind(&self, kind: PropertyKind) -> impl Iterator<Item = &Property> {
        self.properties
            .values()
            .filter(move |property| property.kind() == kind)
    }

    /// Returns all individuals ordered by identifier.
    #[must_use]
    pub fn individuals(&self) -> &BTreeMap<Iri, Individual> {
        &self.individuals
    }

    /// Returns the declared disjointness groups.
    #[must_use]
    pub fn disjoint_groups(&self) -> &[BTreeSet<Iri>] {
        &self.disjoint_groups
    }

    /// Classes declared disjoint with the supplied one, across all groups.
    #[must_use]
    pub fn disjoint_with(&self, class: &Iri) -> BTreeSet<Iri> {
        self.disjoint_groups
            .iter()
            .filter(|group| group.contains(class))
            .flat_map(|group| group.iter().filter(|member| *member != class).cloned())
            .collect()
    }

    /// Returns annotation values per annotated entity.
    #[must_use]
    pub fn annotations(&self) -> &BTreeMap<Iri, AnnotationValues> {
        &self.annotations
    }
}

/// Resolves `name` against the entity IRIs minted under `ontology`, falling
/// back to a local name match for entities read from foreign documents.
fn find_by_name<V>(ontology: &Iri, entities: &BTreeMap<Iri, V>, name: &str) -> Option<Iri> {
    if let Ok(candidate) = ontology.join(name) {
        if entities.contains_key(&candidate) {
            return Some(candidate);
        }
    }
    entities
        .keys()
        .find(|id| id.local_name() == name)
        .cloned()
}

/// Errors raised when manipulating an ontology aggregate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OntologyError {
    /// Attempted to add a class with an existing identifier.
    #[error("class `{0}` already exists")]
    DuplicateClass(Iri),
    /// Attempted to add a property with an existing identifier.
    #[error("property `{0}` already exists")]
    DuplicateProperty(Iri),
    /// Attempted to add an individual with an existing identifier.
    #[error("individual `{0}` already exists")]
    DuplicateIndividual(Iri),
    /// Referenced class was not part of the ontology.
    #[error("class `{class}` does not exist in ontology `{ontology}`")]
    MissingClass { ontology: Iri, class: Iri },
    /// Referenced property was not part of the ontology.
    #[error("property `{property}` does not exist in ontology `{ontology}`")]
    MissingProperty { ontology: Iri, property: Iri },
    /// Referenced entity was not part of the ontology.
    #[error("entity `{entity}` does not exist in ontology `{ontology}`")]
    MissingEntity { ontology: Iri, entity: Iri },
    /// Property assertion type did not match the property definition.
    #[error("property assertion does not match property `{property}` in ontology `{ontology}`")]
    InvalidPropertyAssertion { ontology: Iri, property: Iri },
    /// Data property range is not a supported primitive.
    #[error("property `{property}` ranges over unsupported datatype `{datatype}`")]
    UnsupportedDatatype { property: Iri, datatype: Iri },
    /// Disjointness needs two distinct classes.
    #[error("disjointness in ontology `{ontology}` needs at least two distinct classes")]
    DegenerateDisjointness { ontology: Iri },
}

#[cfg(test)]
mod tests {
    use super::{
        thing, Characteristic, Class, Datatype, Individual, Ontology, OntologyError, Property,
        PropertyAssertion, PropertyKind,
    };
    use crate::ontology::value_objects::Iri;
    use std::collections::BTreeSet;

    fn iri(text: &str) -> Iri {
        Iri::new(text).expect("valid iri")
    }

    fn ontology_with_class() -> Ontology {
        let mut ontology = Ontology::new(iri("https://example.org/onto"));
        ontology
            .add_class(Class::subclass_of(iri("https://example.org/onto#Class"), thing()))
            .expect("class inserted");
        ontology
    }

    #[test]
    fn class_parents_are_tracked() {
        let mut class = Class::new(iri("https://example.org/Class"))
            .with_label("Example")
            .with_comment("Demo");
        assert_eq!(class.label(), Some("Example"));
        assert_eq!(class.comment(), Some("Demo"));
        assert!(class.add_parent(iri("https://example.org/Base")));
        assert!(!class.add_parent(iri("https://example.org/Base")));
        assert!(class.parents().contains(&iri("https://example.org/Base")));
    }

    #[test]
    fn classes_require_known_parents() {
        let mut ontology = Ontology::new(iri("https://example.org/onto"));
        let err = ontology
            .add_class(Class::subclass_of(
                iri("https://example.org/onto#Student"),
                iri("https://example.org/onto#Person"),
            ))
            .expect_err("unknown parent");
        assert!(matches!(err, OntologyError::MissingClass { .. }));
    }

    #[test]
    fn property_definitions_require_known_classes() {
        let mut ontology = ontology_with_class();
        let mut property = Property::new(iri("https://example.org/onto#prop"), PropertyKind::Object);
        property.add_domain(iri("https://example.org/onto#Class"));
        property.add_range(iri("https://example.org/onto#Class"));
        ontology
            .add_property(property.clone())
            .expect("property inserted");
        assert_eq!(ontology.property(property.id()), Some(&property));

        let mut dangling = Property::new(iri("https://example.org/onto#other"), PropertyKind::Object);
        dangling.add_domain(iri("https://example.org/onto#Missing"));
        let err = ontology.add_property(dangling).expect_err("missing class");
        assert!(matches!(err, OntologyError::MissingClass { .. }));
    }

    #[test]
    fn data_properties_range_over_datatypes() {
        let mut ontology = ontology_with_class();
        let mut age = Property::new(iri("https://example.org/onto#hasAge"), PropertyKind::Data);
        age.add_range(Datatype::Integer.iri());
        ontology.add_property(age).expect("property inserted");
        assert_eq!(
            ontology
                .property(&iri("https://example.org/onto#hasAge"))
                .and_then(Property::datatype),
            Some(Datatype::Integer)
        );

        let mut odd = Property::new(iri("https://example.org/onto#odd"), PropertyKind::Data);
        odd.add_range(iri("https://example.org/onto#Class"));
        let err = ontology.add_property(odd).expect_err("class is not a datatype");
        assert!(matches!(err, OntologyError::UnsupportedDatatype { .. }));
    }

    #[test]
    fn characteristics_are_never_duplicated() {
        let mut ontology = ontology_with_class();
        let id = iri("https://example.org/onto#hasParent");
        ontology
            .add_property(Property::new(id.clone(), PropertyKind::Object))
            .expect("property inserted");
        assert!(ontology
            .add_characteristic(&id, Characteristic::Transitive)
            .expect("known property"));
        assert!(!ontology
            .add_characteristic(&id, Characteristic::Transitive)
            .expect("known property"));
        assert_eq!(
            ontology.property(&id).map(|p| p.characteristics().len()),
            Some(1)
        );
    }

    #[test]
    fn individual_insertion_rejects_mismatched_property_kind() {
        let mut ontology = ontology_with_class();
        let property = Property::new(iri("https://example.org/onto#prop"), PropertyKind::Data);
        ontology.add_property(property).expect("property inserted");

        let mut individual = Individual::new(iri("https://example.org/onto#alice"));
        individual.assert_type(iri("https://example.org/onto#Class"));
        individual.add_property_assertion(
            iri("https://example.org/onto#prop"),
            PropertyAssertion::Individual(iri("https://example.org/onto#bob")),
        );

        let err = ontology
            .add_individual(individual)
            .expect_err("mismatched property kind");
        assert!(matches!(err, OntologyError::InvalidPropertyAssertion { .. }));
    }

    #[test]
    fn disjointness_is_symmetric() {
        let mut ontology = ontology_with_class();
        let other = iri("https://example.org/onto#Other");
        ontology
            .add_class(Class::subclass_of(other.clone(), thing()))
            .expect("class inserted");
        let class = iri("https://example.org/onto#Class");
        let group = BTreeSet::from([class.clone(), other.clone()]);
        assert!(ontology.add_disjoint_group(group.clone()).expect("group"));
        assert!(!ontology.add_disjoint_group(group).expect("group"));
        assert_eq!(ontology.disjoint_with(&class), BTreeSet::from([other.clone()]));
        assert_eq!(ontology.disjoint_with(&other), BTreeSet::from([class]));
    }

    #[test]
    fn annotations_are_idempotent() {
        let mut ontology = ontology_with_class();
        let description = iri("https://example.org/onto#hasDescription");
        ontology
            .add_property(Property::new(description.clone(), PropertyKind::Annotation))
            .expect("annotation property");
        let class = iri("https://example.org/onto#Class");
        assert!(ontology
            .annotate(&class, &description, "A class")
            .expect("annotated"));
        assert!(!ontology
            .annotate(&class, &description, "A class")
            .expect("annotated"));
        assert_eq!(
            ontology.annotations()[&class][&description],
            vec!["A class".to_string()]
        );
    }

    #[test]
    fn entities_resolve_by_local_name() {
        let ontology = ontology_with_class();
        assert_eq!(
            ontology.find_class("Class"),
            Some(iri("https://example.org/onto#Class"))
        );
        assert_eq!(ontology.find_class("Thing"), Some(thing()));
        assert_eq!(ontology.find_entity("Missing"), None);
    }
}
