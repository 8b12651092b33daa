use serde_json::json;
use versioned_rust::{Change, InMemoryModelStore, VersionQuery, VersionStore};

use crate::support::fixtures::{self, Camper, Student};
use crate::support::init_tracing;

#[test]
fn except_ignores_listed_attributes() {
    init_tracing();
    let versioning = fixtures::versioning();
    let students = versioning
        .repository::<Student, _>(InMemoryModelStore::new())
        .unwrap();
    let mut student = students.create(Student::new("s1")).unwrap();

    students
        .update(
            &mut student,
            [("name", json!("ignored")), ("is_werewolf", json!(true))],
        )
        .unwrap();

    let previous = students.previous_version(&student).unwrap().unwrap();
    assert_eq!(previous.changeset().len(), 1);
    assert_eq!(
        previous.changeset().get("is_werewolf"),
        Some(&Change::new(json!(false), json!(true)))
    );
}

#[test]
fn except_only_changes_create_no_version() {
    init_tracing();
    let versioning = fixtures::versioning();
    let students = versioning
        .repository::<Student, _>(InMemoryModelStore::new())
        .unwrap();
    let mut student = students.create(Student::new("s1")).unwrap();

    let written = students
        .update(&mut student, [("name", json!("ignored")), ("age", json!(20))])
        .unwrap();
    assert!(written.is_none());
    assert_eq!(student.age, 20);

    let store = versioning.store("Version").unwrap().unwrap();
    assert_eq!(store.all(&VersionQuery::new()).unwrap().len(), 1);
}

#[test]
fn only_includes_listed_attributes() {
    init_tracing();
    let versioning = fixtures::versioning();
    let campers = versioning
        .repository::<Camper, _>(InMemoryModelStore::new())
        .unwrap();
    let mut camper = campers.create(Camper::new("c1")).unwrap();

    campers
        .update(&mut camper, [("is_werewolf", json!(true)), ("age", json!(20))])
        .unwrap();

    let previous = campers.previous_version(&camper).unwrap().unwrap();
    assert_eq!(previous.changeset().len(), 1);
    assert_eq!(
        previous.changeset().get("age"),
        Some(&Change::new(json!(5), json!(20)))
    );
}

#[test]
fn only_ignored_changes_create_no_version() {
    init_tracing();
    let versioning = fixtures::versioning();
    let campers = versioning
        .repository::<Camper, _>(InMemoryModelStore::new())
        .unwrap();
    let mut camper = campers.create(Camper::new("c1")).unwrap();

    campers
        .update(&mut camper, [("is_werewolf", json!(true))])
        .unwrap();

    let store = versioning.store("Version").unwrap().unwrap();
    assert_eq!(store.all(&VersionQuery::new()).unwrap().len(), 1);
    assert_eq!(
        campers
            .versioned_properties()
            .iter()
            .map(|p| p.name)
            .collect::<Vec<_>>(),
        vec!["name", "age"]
    );
}
