use std::sync::Arc;

use ontology_agent::{
    config::{CreatorSettings, ProcessorSettings},
    ontology::{
        build, Characteristic, OntologyDefinition, OntologyQuery, OntologyService, ReasonerError,
        ReasonerHandle, StructuralReasoner,
    },
    Error,
};
use rstest::rstest;

const CAMPUS: &str = r#"{
    "ontology_iri": "http://example.org/campus",
    "classes": {"Person": "Thing", "Student": "Person", "Course": "Thing"},
    "object_properties": {"enrolledIn": {"domain": ["Student"], "range": ["Course"]}},
    "data_properties": {
        "hasAge": {"domain": ["Person"], "range": ["integer"], "property_type": ["Functional"]}
    },
    "individuals": [
        {"name": "algebra", "class": "Course"},
        {"name": "john", "class": "Student", "attributes": {"hasAge": [30], "enrolledIn": ["algebra"]}}
    ],
    "disjoint_classes": ["Person", "Course"]
}"#;

/// `Hybrid` is a `Person` equivalent to `Course`, which is disjoint from `Person`.
const CONTRADICTION: &str = r#"{
    "ontology_iri": "http://example.org/contradiction",
    "classes": {"Person": "Thing", "Course": "Thing", "Hybrid": "Person"},
    "disjoint_classes": ["Person", "Course"],
    "equivalent_classes": [{"class": "Hybrid", "equivalent_to": ["Course"]}]
}"#;

fn query(definition: &str, reasoning_enabled: bool) -> OntologyQuery {
    let definition = OntologyDefinition::from_json_str(definition).expect("definition");
    let outcome = build(&definition).expect("build");
    let reasoner: Arc<ReasonerHandle> = Arc::new(StructuralReasoner::new());
    OntologyQuery::new(outcome.ontology, reasoner, reasoning_enabled)
}

#[rstest]
#[case(true, &["john"], &["Person", "Thing"])]
#[case(false, &[], &["Person"])]
#[tokio::test]
async fn reasoning_toggle_controls_inferred_answers(
    #[case] reasoning_enabled: bool,
    #[case] members: &[&str],
    #[case] ancestors: &[&str],
) {
    let facade = query(CAMPUS, reasoning_enabled);
    assert_eq!(facade.individuals_of("Person").await.expect("individuals"), members);
    assert_eq!(facade.ancestors("Student").await.expect("ancestors"), ancestors);
}

#[test]
fn property_queries_report_declared_axioms() {
    let facade = query(CAMPUS, true);
    assert_eq!(facade.object_properties(), ["enrolledIn"]);
    assert_eq!(facade.data_properties(), ["hasAge"]);
    assert_eq!(
        facade.property_characteristics("hasAge").expect("characteristics"),
        [Characteristic::Functional]
    );

    let signature = facade.domains_and_ranges("hasAge").expect("domains and ranges");
    assert_eq!(signature.domains, ["Person"]);
    assert_eq!(signature.ranges, ["int"]);

    let hierarchy = facade.class_hierarchy();
    assert_eq!(hierarchy["Thing"], ["Course", "Person"]);
    assert_eq!(hierarchy["Person"], ["Student"]);
}

#[test]
fn unknown_names_are_reported() {
    let facade = query(CAMPUS, true);
    let err = facade.subclasses_of("Robot").expect_err("unknown class");
    assert!(matches!(err, Error::EntityNotFound { ref name, .. } if name == "Robot"));
    assert!(facade.domains_and_ranges("hasWheels").is_err());
}

#[tokio::test]
async fn consistency_check_detects_injected_contradiction() {
    assert!(query(CAMPUS, true).is_consistent().await.expect("consistency"));
    assert!(!query(CONTRADICTION, true)
        .is_consistent()
        .await
        .expect("inconsistency is an answer, not an error"));
}

#[tokio::test]
async fn inconsistent_definitions_fail_creation_after_saving() {
    let dir = tempfile::tempdir().expect("tempdir");
    let destination = dir.path().join("contradiction.owl");
    let service =
        OntologyService::from_settings(&CreatorSettings::default(), &ProcessorSettings::default());

    let err = service
        .create(CONTRADICTION, &destination)
        .await
        .expect_err("inconsistent ontology");
    assert!(matches!(
        err,
        Error::Reasoner(ReasonerError::Inconsistency { .. })
    ));
    assert!(destination.exists());
}
