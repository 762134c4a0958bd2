use mediatree_graph::MediaTypeId;
use mediatree_history::BranchId;
use mediatree_tree::{NoSources, ResolvedSources, Tree, TreeError, TreeEvent, UserId};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn id(raw: &str) -> MediaTypeId {
    MediaTypeId::from(raw)
}

fn replay(tree: &Tree<MediaTypeId>, events: Vec<TreeEvent<MediaTypeId>>) -> Tree<MediaTypeId> {
    Tree::from_events(tree.id().clone(), events, &NoSources).unwrap()
}

#[test]
fn test_replay_reproduces_state_and_head() {
    let mut tree = Tree::new(BranchId::from("main"));
    tree.create("Formats", UserId::from("alice"), None).unwrap();
    tree.add_media_type(id("audio"), "Audio").unwrap();
    tree.add_media_type(id("lossless"), "Lossless").unwrap();
    tree.add_media_type(id("flac"), "FLAC").unwrap();
    tree.add_parent_to_media_type(&id("lossless"), &id("audio")).unwrap();
    tree.add_parent_to_media_type(&id("flac"), &id("lossless")).unwrap();
    tree.remove_media_type(&id("lossless")).unwrap();

    let events = tree.take_uncommitted_events();
    let replayed = replay(&tree, events);

    assert_eq!(replayed.state(), tree.state());
    assert_eq!(replayed.history().head_id(), tree.history().head_id());
    assert_eq!(replayed.version(), tree.version());
    assert_eq!(replayed.meta(), tree.meta());
    assert!(replayed.uncommitted_events().is_empty());
    assert_eq!(replayed.state().children_of(&id("audio")), vec![id("flac")]);
}

#[test]
fn test_replay_resolves_base_branch() {
    let mut main = Tree::new(BranchId::from("main"));
    main.add_media_type(id("audio"), "Audio").unwrap();

    let mut feature = Tree::new(BranchId::from("feature"));
    feature.create("Feature", UserId::from("bob"), Some(&main)).unwrap();
    feature.add_media_type(id("flac"), "FLAC").unwrap();

    let events = feature.uncommitted_events().to_vec();
    let replayed = Tree::from_events(feature.id().clone(), events, &main).unwrap();

    assert_eq!(replayed.state(), feature.state());
    assert_eq!(replayed.history().head_id(), feature.history().head_id());
    assert!(replayed.history().contains(main.history().head_id().unwrap()));
}

#[test]
fn test_replay_resolves_merge_source() {
    let mut main = Tree::new(BranchId::from("main"));
    main.add_media_type(id("audio"), "Audio").unwrap();

    let mut feature = Tree::new(BranchId::from("feature"));
    feature.create("Feature", UserId::from("bob"), Some(&main)).unwrap();
    feature.add_media_type(id("flac"), "FLAC").unwrap();
    feature.add_parent_to_media_type(&id("flac"), &id("audio")).unwrap();

    main.add_media_type(id("video"), "Video").unwrap();
    main.merge(&feature).unwrap().unwrap();

    let events = main.uncommitted_events().to_vec();
    let replayed = Tree::from_events(main.id().clone(), events, &feature).unwrap();

    assert_eq!(replayed.state(), main.state());
    let head = replayed.head().unwrap();
    assert!(head.is_merge());
    assert_eq!(Some(head.parents()[0].id()), feature.history().head_id());
}

#[test]
fn test_replay_fails_without_merge_source() {
    let mut source = Tree::new(BranchId::from("source"));
    source.add_media_type(id("a"), "A").unwrap();

    let mut target = Tree::new(BranchId::from("target"));
    target.merge(&source).unwrap().unwrap();

    let events = target.uncommitted_events().to_vec();
    let err = Tree::from_events(target.id().clone(), events.clone(), &NoSources).unwrap_err();
    assert!(matches!(err, TreeError::UnresolvedSource(_)));
    assert!(!err.is_recoverable());

    // Supplying the commit explicitly works as well
    let source_ref = events[0].source_ref().unwrap().clone();
    let sources = ResolvedSources::single(source_ref, source.head().unwrap().clone());
    let replayed = Tree::from_events(target.id().clone(), events, &sources).unwrap();
    assert!(replayed.state().contains(&id("a")));
}

#[test]
fn test_replay_survives_json() {
    let mut tree = Tree::new(BranchId::from("main"));
    tree.add_media_type(id("parent"), "Parent").unwrap();
    tree.add_media_type(id("child"), "Child").unwrap();
    tree.add_parent_to_media_type(&id("child"), &id("parent")).unwrap();

    let json = serde_json::to_string(tree.uncommitted_events()).unwrap();
    let events: Vec<TreeEvent<MediaTypeId>> = serde_json::from_str(&json).unwrap();
    let replayed = replay(&tree, events);

    assert_eq!(replayed.state(), tree.state());
    assert_eq!(replayed.history().head_id(), tree.history().head_id());
}

#[derive(Debug, Clone)]
enum Command {
    Add(u8),
    Parent(u8, u8),
    Remove(u8),
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        2 => (0..12u8).prop_map(Command::Add),
        3 => (0..12u8, 0..12u8).prop_map(|(c, p)| Command::Parent(c, p)),
        1 => (0..12u8).prop_map(Command::Remove),
    ]
}

proptest! {
    #[test]
    fn prop_replay_is_idempotent(commands in proptest::collection::vec(command(), 0..60)) {
        let mut tree: Tree<u8> = Tree::new(BranchId::from("prop"));
        for command in commands {
            let _ = match command {
                Command::Add(id) => tree.add_media_type(id, "node"),
                Command::Parent(child, parent) => tree.add_parent_to_media_type(&child, &parent),
                Command::Remove(id) => tree.remove_media_type(&id),
            };
            prop_assert!(tree.state().is_acyclic());
        }

        let events = tree.uncommitted_events().to_vec();
        let once = Tree::from_events(tree.id().clone(), events.clone(), &NoSources).unwrap();
        let twice = Tree::from_events(tree.id().clone(), events, &NoSources).unwrap();

        prop_assert_eq!(once.state(), tree.state());
        prop_assert_eq!(twice.state(), once.state());
        prop_assert_eq!(once.history().head_id(), tree.history().head_id());
        prop_assert_eq!(once.version(), tree.version());
    }
}
