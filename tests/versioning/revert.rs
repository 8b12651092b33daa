use serde_json::json;
use versioned_rust::{InMemoryModelStore, ModelStore, VersionQuery, VersionedRepository, Watched};

use crate::support::fixtures::{self, Pig};
use crate::support::init_tracing;

/// A pig renamed first -> second -> third -> fourth.
fn setup() -> (VersionedRepository<InMemoryModelStore, Pig>, Watched<Pig>) {
    init_tracing();
    let versioning = fixtures::versioning();
    let pigs = versioning
        .repository::<Pig, _>(InMemoryModelStore::new())
        .unwrap();

    let mut pig = pigs.create(Pig::new("p1", "first")).unwrap();
    for name in ["second", "third", "fourth"] {
        pigs.update(&mut pig, [("name", json!(name))]).unwrap();
    }
    (pigs, pig)
}

#[test]
fn revert_one_version() {
    let (pigs, mut pig) = setup();
    pigs.reload(&mut pig).unwrap();
    pigs.revert(&mut pig, 1).unwrap();
    assert_eq!(pig.name, "third");
}

#[test]
fn revert_several_versions() {
    let (pigs, mut pig) = setup();
    pigs.revert(&mut pig, 2).unwrap();
    assert_eq!(pig.name, "second");
    pigs.revert(&mut pig, 3).unwrap();
    assert_eq!(pig.name, "first");
}

#[test]
fn revert_past_history_restores_oldest_value() {
    let (pigs, mut pig) = setup();
    pigs.revert(&mut pig, 10).unwrap();
    assert_eq!(pig.name, "first");
}

#[test]
fn revert_does_not_save() {
    let (pigs, mut pig) = setup();
    pigs.revert(&mut pig, 1).unwrap();

    let stored = pigs.models().get_model::<Pig>("p1").unwrap().unwrap();
    assert_eq!(stored.name, "fourth");
    assert_eq!(pigs.versions(&pig, VersionQuery::new()).unwrap().len(), 3);
}

#[test]
fn revert_and_save_records_a_new_version() {
    let (pigs, mut pig) = setup();
    let version = pigs.revert_and_save(&mut pig, 2).unwrap().unwrap();

    assert_eq!(version.number, 4);
    assert_eq!(
        version.changeset().get("name").map(|c| c.new_value().clone()),
        Some(json!("second"))
    );

    let stored = pigs.models().get_model::<Pig>("p1").unwrap().unwrap();
    assert_eq!(stored.name, "second");
}
