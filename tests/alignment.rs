use std::sync::Arc;

use async_trait::async_trait;
use ontology_agent::{
    align::{Aligner, AlignmentAdapter, Correspondence},
    config::{AlignerSettings, AlignmentMethod},
    ontology::{entities::thing, Class, Iri, Ontology},
    Result,
};

/// Proposes the same correspondences whatever the input.
struct ScriptedAligner;

#[async_trait]
impl Aligner for ScriptedAligner {
    async fn align(&self, _source: &Ontology, _target: &Ontology) -> Result<Vec<Correspondence>> {
        Ok(vec![
            Correspondence::new("Person", "Human", 0.9),
            Correspondence::new("Course", "Room", 0.4),
        ])
    }
}

fn ontology(base: &str, classes: &[&str]) -> Ontology {
    let id = Iri::new(base).expect("valid iri");
    let mut ontology = Ontology::new(id.clone());
    for name in classes {
        ontology
            .add_class(Class::subclass_of(id.join(name).expect("iri"), thing()))
            .expect("class");
    }
    ontology
}

#[tokio::test]
async fn only_confident_correspondences_are_persisted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let destination = dir.path().join("reports").join("alignment.txt");
    let settings = AlignerSettings {
        alignment_method: AlignmentMethod::Lexical,
        confidence_threshold: 0.7,
    };
    let adapter = AlignmentAdapter::new(Arc::new(ScriptedAligner), &settings);

    let alignment = adapter
        .align(
            &ontology("http://example.org/a", &["Person", "Course"]),
            &ontology("http://example.org/b", &["Human", "Room"]),
        )
        .await
        .expect("align");
    alignment.save(&destination).expect("save");

    let contents = std::fs::read_to_string(&destination).expect("read");
    assert_eq!(contents, "Person <-> Human: 0.9\n");
}

#[tokio::test]
async fn threshold_is_inclusive() {
    let settings = AlignerSettings {
        alignment_method: AlignmentMethod::Lexical,
        confidence_threshold: 0.4,
    };
    let adapter = AlignmentAdapter::new(Arc::new(ScriptedAligner), &settings);
    let alignment = adapter
        .align(
            &ontology("http://example.org/a", &[]),
            &ontology("http://example.org/b", &[]),
        )
        .await
        .expect("align");
    assert_eq!(alignment.correspondences.len(), 2);
}
