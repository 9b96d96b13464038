use crate::{
    align::readable_name,
    ontology::{entities::thing, Iri, Ontology},
};

/// A class rendered as text together with its parents' labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedEntity {
    pub iri: Iri,
    pub name: String,
    pub label: String,
    pub parents: Vec<String>,
}

impl EncodedEntity {
    /// Label followed by the parent labels, the text handed to retrievers and
    /// judges.
    #[must_use]
    pub fn context(&self) -> String {
        if self.parents.is_empty() {
            self.label.clone()
        } else {
            format!("{} (a kind of {})", self.label, self.parents.join(", "))
        }
    }
}

/// Encodes every class of `ontology`, in identifier order.
#[must_use]
pub fn encode(ontology: &Ontology) -> Vec<EncodedEntity> {
    ontology
        .classes()
        .values()
        .map(|class| EncodedEntity {
            iri: class.id().clone(),
            name: class.name().to_string(),
            label: readable_name(class),
            parents: class
                .parents()
                .iter()
                .filter(|parent| **parent != thing())
                .filter_map(|parent| ontology.class(parent))
                .map(readable_name)
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::encode;
    use crate::ontology::{entities::thing, Class, Iri, Ontology};

    #[test]
    fn entities_carry_their_parents() {
        let id = Iri::new("http://example.org/o").expect("iri");
        let mut ontology = Ontology::new(id.clone());
        let person = id.join("Person").expect("iri");
        ontology
            .add_class(Class::subclass_of(person.clone(), thing()))
            .expect("person");
        ontology
            .add_class(Class::subclass_of(id.join("GraduateStudent").expect("iri"), person))
            .expect("student");

        let encoded = encode(&ontology);
        assert_eq!(encoded[0].name, "GraduateStudent");
        assert_eq!(encoded[0].context(), "graduate student (a kind of person)");
        assert_eq!(encoded[1].context(), "person");
    }
}
