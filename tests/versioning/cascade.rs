use serde_json::json;
use versioned_rust::{InMemoryModelStore, ModelStore, VersionQuery, VersionStore};

use crate::support::fixtures::{self, Baby, Pig};
use crate::support::init_tracing;

#[test]
fn destroying_parent_and_children_removes_every_version() {
    init_tracing();
    let versioning = fixtures::versioning();
    let models = InMemoryModelStore::new();
    let pigs = versioning.repository::<Pig, _>(models.clone()).unwrap();
    let babies = versioning.repository::<Baby, _>(models.clone()).unwrap();

    let mut pig = pigs.create(Pig::new("p1", "piggins")).unwrap();
    let mut litter = Vec::new();
    for n in 1..=3 {
        let baby = Baby {
            id: format!("b{}", n),
            name: n.to_string(),
            pig_id: pig.id(),
        };
        litter.push(babies.create(baby).unwrap());
    }

    pigs.update(&mut pig, [("name", json!("tubbs"))]).unwrap();
    for baby in litter.iter_mut() {
        let name = format!("{}_", baby.name);
        babies.update(baby, [("name", json!(name))]).unwrap();
    }

    let store = versioning.store("Version").unwrap().unwrap();
    assert_eq!(store.all(&VersionQuery::new()).unwrap().len(), 8);

    let children = models
        .find_models::<Baby>(&|baby: &Baby| baby.pig_id == pig.id())
        .unwrap();
    assert_eq!(children.len(), 3);
    for child in children {
        let mut child = babies.find(&child.id).unwrap().unwrap();
        assert!(babies.destroy(&mut child).unwrap());
    }
    assert!(pigs.destroy(&mut pig).unwrap());

    assert!(store.all(&VersionQuery::new()).unwrap().is_empty());
}

#[test]
fn destroy_leaves_other_entities_alone() {
    init_tracing();
    let versioning = fixtures::versioning();
    let pigs = versioning
        .repository::<Pig, _>(InMemoryModelStore::new())
        .unwrap();

    let mut first = pigs.create(Pig::new("p1", "first")).unwrap();
    let second = pigs.create(Pig::new("p2", "second")).unwrap();
    pigs.destroy(&mut first).unwrap();

    let store = pigs.version_store();
    assert_eq!(store.count("Pig", "p1").unwrap(), 0);
    assert_eq!(store.count("Pig", "p2").unwrap(), 1);
    assert!(pigs.find(&second.id()).unwrap().is_some());
}
