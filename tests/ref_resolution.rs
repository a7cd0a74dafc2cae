mod common;

use common::Fixture;
use pretty_assertions::assert_eq;
use quay::EngineError;
use quay::artifacts::refs::RefResolver;

#[tokio::test]
async fn local_branch_name_resolves_to_tip() {
    let f = Fixture::initialized();
    let tip = f.store.commit_on("main", "first", &[("a.txt", "hello\n")]);

    let resolver = RefResolver::new(&f.project);
    assert_eq!(resolver.resolve("main").await.unwrap(), tip);
}

#[tokio::test]
async fn remote_short_form_resolves_through_known_remote() {
    let f = Fixture::initialized();
    let tip = f.store.commit_on("main", "first", &[("a.txt", "hello\n")]);
    f.store.add_ref("remotes/origin/main", &tip);

    let resolver = RefResolver::new(&f.project);
    assert_eq!(resolver.resolve("origin/main").await.unwrap(), tip);
}

#[tokio::test]
async fn full_commit_id_resolves_literally() {
    let f = Fixture::initialized();
    let tip = f.store.commit_on("main", "first", &[("a.txt", "hello\n")]);

    let resolver = RefResolver::new(&f.project);
    assert_eq!(resolver.resolve(tip.as_str()).await.unwrap(), tip);
}

#[tokio::test]
async fn abbreviated_commit_id_expands_when_unambiguous() {
    let f = Fixture::initialized();
    let first = f.store.commit_on("main", "first", &[("a.txt", "one\n")]);
    let second = f.store.commit_on("main", "second", &[("a.txt", "two\n")]);

    let resolver = RefResolver::new(&f.project);
    assert_eq!(
        resolver.resolve(&first.as_str()[..8]).await.unwrap(),
        first
    );
    assert_eq!(
        resolver.resolve(&second.as_str()[..8]).await.unwrap(),
        second
    );
}

#[tokio::test]
async fn unknown_ref_error_lists_known_branches() {
    let f = Fixture::initialized();
    f.store.commit_on("main", "first", &[("a.txt", "hello\n")]);

    let resolver = RefResolver::new(&f.project);
    let err = resolver.resolve("ghost").await.unwrap_err();

    match err {
        EngineError::RefNotFound { name, known } => {
            assert_eq!(name, "ghost");
            assert_eq!(known, vec!["main"]);
        }
        other => panic!("expected RefNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn branch_listing_filters_symbolic_head_pointers() {
    let f = Fixture::initialized();
    let tip = f.store.commit_on("main", "first", &[("a.txt", "hello\n")]);
    f.store.create_branch("dev", &tip);
    f.store.add_ref("remotes/origin/main", &tip);
    f.store.add_ref("remotes/origin/HEAD", &tip);

    let branches = RefResolver::new(&f.project).list_branches().await.unwrap();

    assert_eq!(branches.local, vec!["dev", "main"]);
    assert_eq!(branches.remote, vec!["origin/main"]);
}
