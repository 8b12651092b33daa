use serde_json::json;
use versioned_rust::{
    InMemoryModelStore, ModelStore, VersionQuery, VersionStore, VersionedRepository, Versioning,
    VersioningConfig, VersioningError,
};

use crate::support::fixtures::Pig;
use crate::support::init_tracing;

fn pigs(config: VersioningConfig<Pig>) -> (Versioning, VersionedRepository<InMemoryModelStore, Pig>) {
    init_tracing();
    let mut versioning = Versioning::new();
    versioning.enable::<Pig>(config).unwrap();
    let pigs = versioning
        .repository::<Pig, _>(InMemoryModelStore::new())
        .unwrap();
    (versioning, pigs)
}

fn total(versioning: &Versioning) -> usize {
    versioning
        .store("Version")
        .unwrap()
        .unwrap()
        .all(&VersionQuery::new())
        .unwrap()
        .len()
}

#[test]
fn if_condition_true_creates_version() {
    let (versioning, pigs) = pigs(VersioningConfig::new().when(|pig: &Pig| pig.name.contains("success")));
    let mut pig = pigs.create(Pig::new("p1", "success")).unwrap();

    pigs.update(&mut pig, [("name", json!("success_"))]).unwrap();
    assert_eq!(pigs.versions(&pig, VersionQuery::new()).unwrap().len(), 1);
    assert_eq!(total(&versioning), 2);
}

#[test]
fn if_condition_false_creates_nothing() {
    let (versioning, pigs) = pigs(VersioningConfig::new().when(|pig: &Pig| pig.name.contains("success")));
    let mut pig = pigs.create(Pig::new("p1", "success")).unwrap();

    pigs.update(&mut pig, [("name", json!("fail"))]).unwrap();
    assert!(pigs.versions(&pig, VersionQuery::new()).unwrap().is_empty());
    assert_eq!(total(&versioning), 1);
}

#[test]
fn unless_condition_false_creates_version() {
    let (versioning, pigs) = pigs(VersioningConfig::new().unless(|pig: &Pig| pig.name.contains("fail")));
    let mut pig = pigs.create(Pig::new("p1", "success")).unwrap();

    pigs.update(&mut pig, [("name", json!("success_"))]).unwrap();
    assert_eq!(pigs.versions(&pig, VersionQuery::new()).unwrap().len(), 1);
    assert_eq!(total(&versioning), 2);
}

#[test]
fn unless_condition_true_creates_nothing() {
    let (versioning, pigs) = pigs(VersioningConfig::new().unless(|pig: &Pig| pig.name.contains("fail")));
    let mut pig = pigs.create(Pig::new("p1", "success")).unwrap();

    pigs.update(&mut pig, [("name", json!("fail"))]).unwrap();
    assert!(pigs.versions(&pig, VersionQuery::new()).unwrap().is_empty());
    assert_eq!(total(&versioning), 1);
}

#[test]
fn condition_applies_to_creation() {
    let (versioning, pigs) = pigs(VersioningConfig::new().unless(|pig: &Pig| pig.name.contains("fail")));
    pigs.create(Pig::new("p1", "fail")).unwrap();
    assert_eq!(total(&versioning), 0);
}

#[test]
fn failing_condition_surfaces_after_entity_write() {
    let (versioning, pigs) = pigs(VersioningConfig::new().try_when(|pig: &Pig| {
        if pig.name == "boom" {
            Err("condition exploded".into())
        } else {
            Ok(true)
        }
    }));
    let mut pig = pigs.create(Pig::new("p1", "calm")).unwrap();

    let err = pigs
        .update(&mut pig, [("name", json!("boom"))])
        .unwrap_err();
    assert!(matches!(err, VersioningError::Predicate(_)));

    let stored = pigs.models().get_model::<Pig>("p1").unwrap().unwrap();
    assert_eq!(stored.name, "boom");
    assert_eq!(total(&versioning), 1);
    assert!(pig.pending_changes().is_empty());
}
