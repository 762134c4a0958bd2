use mediatree_graph::MediaTypeId;
use mediatree_history::{BranchId, CommitId};
use mediatree_store::{
    ConcurrencyControl, InMemoryBranchLog, InMemoryEventStore, InMemoryRepository, SingleStreamRepository,
    StoreConfig, StoreError, TreeRepository,
};
use mediatree_tree::{Tree, UserId};
use pretty_assertions::assert_eq;

fn id(raw: &str) -> MediaTypeId {
    MediaTypeId::from(raw)
}

fn repository() -> InMemoryRepository<MediaTypeId> {
    InMemoryRepository::new(InMemoryBranchLog::new(), StoreConfig::default())
}

async fn create(repo: &InMemoryRepository<MediaTypeId>, name: &str, base: Option<&str>) -> Tree<MediaTypeId> {
    let base = match base {
        Some(base) => Some(repo.get(&BranchId::from(base)).await.unwrap()),
        None => None,
    };
    let mut tree = Tree::new(BranchId::from(name));
    tree.create(name, UserId::from("tester"), base.as_ref()).unwrap();
    repo.commit(&mut tree).await.unwrap();
    tree
}

#[tokio::test]
async fn test_save_and_replay() {
    let repo = repository();
    let mut tree = create(&repo, "main", None).await;
    tree.add_media_type(id("audio"), "Audio").unwrap();
    tree.add_media_type(id("flac"), "FLAC").unwrap();
    tree.add_parent_to_media_type(&id("flac"), &id("audio")).unwrap();

    assert_eq!(repo.commit(&mut tree).await.unwrap(), 4);
    assert!(tree.uncommitted_events().is_empty());

    let loaded = repo.get(tree.id()).await.unwrap();
    assert_eq!(loaded.state(), tree.state());
    assert_eq!(loaded.history().head_id(), tree.history().head_id());
    assert_eq!(loaded.version(), 4);
    assert!(repo.exists(tree.id()).await.unwrap());
}

#[tokio::test]
async fn test_missing_branch() {
    let repo = repository();
    let branch = BranchId::from("nowhere");

    let err = repo.get(&branch).await.unwrap_err();
    assert!(matches!(err, StoreError::BranchNotFound(ref b) if b == &branch));
    assert!(!repo.exists(&branch).await.unwrap());
}

#[tokio::test]
async fn test_stale_save_conflicts() {
    let repo = repository();
    create(&repo, "main", None).await;

    let mut first = repo.get(&BranchId::from("main")).await.unwrap();
    let mut second = repo.get(&BranchId::from("main")).await.unwrap();

    first.add_media_type(id("a"), "A").unwrap();
    repo.commit(&mut first).await.unwrap();

    second.add_media_type(id("b"), "B").unwrap();
    let err = repo.commit(&mut second).await.unwrap_err();
    assert!(err.is_conflict());
    assert!(matches!(
        err,
        StoreError::VersionConflict {
            expected: 1,
            actual: 2,
            ..
        }
    ));
    // Rejected events stay uncommitted
    assert_eq!(second.uncommitted_events().len(), 1);
}

#[tokio::test]
async fn test_unchecked_appends_regardless_of_version() {
    let config = StoreConfig::default().with_concurrency(ConcurrencyControl::Unchecked);
    let repo: InMemoryRepository<MediaTypeId> = InMemoryRepository::new(InMemoryBranchLog::new(), config);
    let branch = BranchId::from("main");

    let mut tree: Tree<MediaTypeId> = Tree::new(branch.clone());
    tree.add_media_type(id("a"), "A").unwrap();
    let events = tree.take_uncommitted_events();

    repo.save(&branch, 0, events.clone()).await.unwrap();
    assert!(repo.save(&branch, 0, vec![]).await.is_ok());
    assert_eq!(repo.log().len(&branch), 1);
}

#[tokio::test]
async fn test_get_to_commit() {
    let repo = repository();
    let mut tree = create(&repo, "main", None).await;
    let first = tree.add_media_type(id("a"), "A").unwrap();
    tree.add_media_type(id("b"), "B").unwrap();
    repo.commit(&mut tree).await.unwrap();

    let commit = first.commit_id().unwrap();
    let earlier = repo.get_to_commit(tree.id(), commit).await.unwrap();
    assert!(earlier.state().contains(&id("a")));
    assert!(!earlier.state().contains(&id("b")));
    assert_eq!(earlier.history().head_id(), Some(commit));

    let err = repo.get_to_commit(tree.id(), CommitId::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::CommitNotFound { .. }));
}

#[tokio::test]
async fn test_get_to_commit_inherited_and_merged_commits() {
    let repo = repository();
    let mut main = create(&repo, "main", None).await;
    let a = main.add_media_type(id("a"), "A").unwrap().commit_id().unwrap();
    main.add_media_type(id("b"), "B").unwrap();
    repo.commit(&mut main).await.unwrap();

    let mut feature = create(&repo, "feature", Some("main")).await;
    let c = feature.add_media_type(id("c"), "C").unwrap().commit_id().unwrap();
    repo.commit(&mut feature).await.unwrap();

    // Commit feature inherited from main before it branched off
    let inherited = repo.get_to_commit(feature.id(), a).await.unwrap();
    assert_eq!(inherited.id(), feature.id());
    assert_eq!(inherited.history().head_id(), Some(a));
    assert!(inherited.state().contains(&id("a")));
    assert!(!inherited.state().contains(&id("b")));
    assert!(inherited.uncommitted_events().is_empty());

    // Commit main only has through merging feature
    main.merge(&feature).unwrap().unwrap();
    repo.commit(&mut main).await.unwrap();
    let merged_in = repo.get_to_commit(main.id(), c).await.unwrap();
    assert_eq!(merged_in.history().head_id(), Some(c));
    assert_eq!(merged_in.state(), &feature.state_at(c).unwrap());

    // Merge base with feature, which later only reaches through main's merge
    let mut later = create(&repo, "later", Some("main")).await;
    later.add_media_type(id("d"), "D").unwrap();
    repo.commit(&mut later).await.unwrap();
    let common = later.history().last_common_commit(feature.history()).unwrap().id();
    let base = repo.get_to_commit(later.id(), common).await.unwrap();
    assert_eq!(base.history().head_id(), Some(common));

    let err = repo.get_to_commit(main.id(), CommitId::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::CommitNotFound { .. }));
}

#[tokio::test]
async fn test_replay_of_merged_branches() {
    let repo = repository();
    let mut main = create(&repo, "main", None).await;
    main.add_media_type(id("audio"), "Audio").unwrap();
    repo.commit(&mut main).await.unwrap();

    let mut feature = create(&repo, "feature", Some("main")).await;
    feature.add_media_type(id("flac"), "FLAC").unwrap();
    feature.add_parent_to_media_type(&id("flac"), &id("audio")).unwrap();
    repo.commit(&mut feature).await.unwrap();

    main.add_media_type(id("video"), "Video").unwrap();
    main.merge(&feature).unwrap().unwrap();
    repo.commit(&mut main).await.unwrap();

    // Feature keeps editing after the merge; main's replay must stop at the merged tip
    feature.add_media_type(id("opus"), "Opus").unwrap();
    repo.commit(&mut feature).await.unwrap();

    let loaded = repo.get(&BranchId::from("main")).await.unwrap();
    assert_eq!(loaded.state(), main.state());
    assert!(!loaded.state().contains(&id("opus")));
    assert_eq!(loaded.history().head_id(), main.history().head_id());

    let merge = loaded.head().unwrap();
    assert!(merge.is_merge());
    assert!(merge.parents()[0].event().commit_id().is_some());
}

#[tokio::test]
async fn test_replay_through_branch_chain() {
    let repo = repository();
    let mut main = create(&repo, "main", None).await;
    main.add_media_type(id("audio"), "Audio").unwrap();
    repo.commit(&mut main).await.unwrap();

    // Second branch has no commits of its own when it is merged
    let mut first = create(&repo, "first", Some("main")).await;
    first.add_media_type(id("flac"), "FLAC").unwrap();
    repo.commit(&mut first).await.unwrap();

    let mut second = create(&repo, "second", Some("first")).await;
    let mut third = create(&repo, "third", None).await;
    assert!(third.merge(&second).unwrap().is_some());
    repo.commit(&mut third).await.unwrap();

    second.add_media_type(id("opus"), "Opus").unwrap();
    repo.commit(&mut second).await.unwrap();

    let loaded = repo.get(&BranchId::from("third")).await.unwrap();
    assert_eq!(loaded.state(), third.state());
    assert!(loaded.state().contains(&id("flac")));
    assert!(!loaded.state().contains(&id("opus")));
    assert_eq!(repo.branches().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_single_stream_repository() {
    let branch = BranchId::from("only");
    let repo: SingleStreamRepository<InMemoryEventStore<MediaTypeId>, MediaTypeId> =
        SingleStreamRepository::new(branch.clone(), InMemoryEventStore::new(), StoreConfig::default());
    assert!(!repo.exists(&branch).await.unwrap());

    let mut tree: Tree<MediaTypeId> = Tree::new(branch.clone());
    tree.add_media_type(id("audio"), "Audio").unwrap();
    tree.add_media_type(id("flac"), "FLAC").unwrap();
    assert_eq!(repo.commit(&mut tree).await.unwrap(), 2);

    let loaded = repo.get(&branch).await.unwrap();
    assert_eq!(loaded.state(), tree.state());

    let err = repo.save(&branch, 0, vec![]).await.unwrap_err();
    assert!(err.is_conflict());
    assert!(repo.get(&BranchId::from("other")).await.unwrap_err().is_not_found());
}
