use serde_json::json;
use versioned_rust::{
    Change, ChangeSet, InMemoryModelStore, ModelStore, NewVersion, VersionQuery,
    VersionStore, VersionedRepository, Versioning, VersioningError, Watched,
};

use crate::support::fixtures::{self, Article, CURRENT_USER};
use crate::support::init_tracing;

struct Setup {
    versioning: Versioning,
    articles: VersionedRepository<InMemoryModelStore, Article>,
    article: Watched<Article>,
}

/// An article created, retitled twice, then given a body.
fn setup() -> Setup {
    init_tracing();
    let versioning = fixtures::versioning();
    let articles = versioning
        .repository::<Article, _>(InMemoryModelStore::new())
        .unwrap();

    let mut article = articles.create(Article::new("a1", "article")).unwrap();
    articles
        .update(&mut article, [("title", json!("changed"))])
        .unwrap();
    articles
        .update(&mut article, [("title", json!("changed1"))])
        .unwrap();
    articles
        .update(&mut article, [("body", json!("body"))])
        .unwrap();

    Setup {
        versioning,
        articles,
        article,
    }
}

fn changes(entries: &[(&str, serde_json::Value, serde_json::Value)]) -> ChangeSet {
    entries
        .iter()
        .map(|(attribute, old, new)| (*attribute, Change::new(old.clone(), new.clone())))
        .collect()
}

#[test]
fn registry_knows_versioned_types() {
    let versioning = fixtures::versioning();
    assert!(versioning.is_versioned("Article"));
    assert!(!versioning.is_versioned("Unwatched"));
    assert_eq!(versioning.config_store_name::<Article>().unwrap(), "Version");
}

#[test]
fn unsaved_article_has_no_versions() {
    let versioning = fixtures::versioning();
    let articles = versioning
        .repository::<Article, _>(InMemoryModelStore::new())
        .unwrap();
    let article = articles.build(Article::new("a1", "article"));
    assert!(articles.versions(&article, VersionQuery::new()).unwrap().is_empty());
}

#[test]
fn records_changes_as_new_versions() {
    let s = setup();
    let store = s.versioning.store("Version").unwrap().unwrap();
    assert_eq!(store.all(&VersionQuery::new()).unwrap().len(), 4);
    assert_eq!(
        s.articles.versions(&s.article, VersionQuery::new()).unwrap().len(),
        3
    );
}

#[test]
fn changesets_hold_old_and_new_values() {
    let s = setup();
    let versions = s.articles.versions(&s.article, VersionQuery::new()).unwrap();

    assert_eq!(
        versions[2].data,
        changes(&[("title", json!("article"), json!("changed"))])
    );
    assert_eq!(
        versions[1].data,
        changes(&[("title", json!("changed"), json!("changed1"))])
    );
    assert_eq!(
        versions[0].data,
        changes(&[("body", json!(null), json!("body"))])
    );
}

#[test]
fn version_numbers_have_no_gaps() {
    let s = setup();
    let numbers: Vec<u64> = s
        .articles
        .versions(&s.article, VersionQuery::new())
        .unwrap()
        .iter()
        .map(|v| v.number)
        .collect();
    assert_eq!(numbers, vec![3, 2, 1]);

    let initial = s
        .articles
        .version_store()
        .for_entity("Article", "a1", VersionQuery::new().limit(10))
        .unwrap()
        .into_iter()
        .find(|v| v.is_initial())
        .unwrap();
    assert!(initial.changeset().is_empty());
}

#[test]
fn previous_version_names_the_user() {
    let s = setup();
    let previous = s.articles.previous_version(&s.article).unwrap().unwrap();
    assert_eq!(previous.number, 3);
    assert_eq!(previous.user_reference.as_deref(), Some(CURRENT_USER));
}

#[test]
fn version_resolves_its_object() {
    let s = setup();
    let latest = s.articles.latest(VersionQuery::new()).unwrap();
    assert_eq!(latest.len(), 4);

    let object = latest[0]
        .object::<Article, _>(s.articles.models())
        .unwrap()
        .unwrap();
    assert_eq!(&object, s.article.record());
}

#[test]
fn destroy_removes_all_versions() {
    let mut s = setup();
    assert!(s.articles.destroy(&mut s.article).unwrap());

    let store = s.versioning.store("Version").unwrap().unwrap();
    assert!(store.all(&VersionQuery::new()).unwrap().is_empty());
    assert!(s.articles.models().get_model::<Article>("a1").unwrap().is_none());
}

#[test]
fn timestamps_are_never_versioned() {
    let mut s = setup();
    s.article.created_at = Some(1);
    s.article.updated_at = Some(2);
    s.article.title = "timestamped".into();
    s.articles.save(&mut s.article).unwrap();

    let previous = s.articles.previous_version(&s.article).unwrap().unwrap();
    for attribute in ["created_at", "created_on", "updated_at", "updated_on"] {
        assert!(previous.changeset().get(attribute).is_none());
    }
    assert!(previous.changeset().contains("title"));
}

#[test]
fn clean_updates_create_no_versions() {
    init_tracing();
    let versioning = fixtures::versioning();
    let articles = versioning
        .repository::<Article, _>(InMemoryModelStore::new())
        .unwrap();

    let mut article = Article::new("a1", "article");
    article.number = Some(1);
    let mut article = articles.create(article).unwrap();

    let written = articles
        .update(&mut article, [("title", json!("article")), ("number", json!(1))])
        .unwrap();
    assert!(written.is_none());
    let written = articles
        .update(&mut article, [("title", json!("article")), ("number", json!("1"))])
        .unwrap();
    assert!(written.is_none());

    let store = versioning.store("Version").unwrap().unwrap();
    assert_eq!(store.all(&VersionQuery::new()).unwrap().len(), 1);
    assert!(articles.versions(&article, VersionQuery::new()).unwrap().is_empty());
}

#[test]
fn changing_back_before_save_records_nothing() {
    let mut s = setup();
    s.article.title = "draft".into();
    s.article.title = "changed1".into();
    assert!(s.articles.save(&mut s.article).unwrap().is_none());
}

#[test]
fn duplicate_number_is_a_constraint_violation() {
    let s = setup();
    let store = s.articles.version_store();

    let err = store
        .create(NewVersion::new("Article", "a1"), 2)
        .unwrap_err();
    let err = VersioningError::from(err);
    assert!(matches!(
        err,
        VersioningError::ConstraintViolation { number: 2, .. }
    ));

    let fresh = store.create(NewVersion::new("Article", "a1"), 4).unwrap();
    assert_eq!(fresh.number, 4);
}

#[test]
fn invalid_assignment_is_rejected() {
    let mut s = setup();
    let err = s
        .articles
        .update(&mut s.article, [("number", json!("many"))])
        .unwrap_err();
    assert!(matches!(err, VersioningError::Attribute(_)));

    let err = s
        .articles
        .update(&mut s.article, [("colour", json!("red"))])
        .unwrap_err();
    assert!(matches!(err, VersioningError::Attribute(_)));
}
