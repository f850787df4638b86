//! Integration tests for loading and querying the room graph.

use hearth_rooms::{Room, RoomGraph, RoomKey, WorldError, describe};

// =========================================================================
// Helpers
// =========================================================================

const TAVERN_JSON: &str = r#"{
    "tavern": {
        "name": "Tavern",
        "description": "You're in a cozy tavern warmed by an open fire.",
        "exits": { "outside": "outside" }
    },
    "outside": {
        "name": "Outside the tavern",
        "description": "You're standing outside a tavern. It's raining.",
        "exits": { "inside": "tavern", "north": "road" }
    },
    "road": {
        "name": "North road",
        "description": "A muddy road.",
        "exits": {}
    }
}"#;

fn key(k: &str) -> RoomKey {
    RoomKey::from(k)
}

// =========================================================================
// Loading
// =========================================================================

#[test]
fn test_from_json_str_valid_graph() {
    let graph = RoomGraph::from_json_str(TAVERN_JSON).unwrap();
    assert_eq!(graph.len(), 3);
    assert!(graph.contains(&key("tavern")));

    let outside = graph.lookup(&key("outside")).unwrap();
    assert_eq!(outside.name, "Outside the tavern");
    assert_eq!(outside.exit("north"), Some(&key("road")));
}

#[test]
fn test_every_exit_resolves() {
    let graph = RoomGraph::from_json_str(TAVERN_JSON).unwrap();
    for room in graph.rooms() {
        for target in room.exits.values() {
            assert!(
                graph.lookup(target).is_ok(),
                "exit target {target} of {} should resolve",
                room.key
            );
        }
    }
}

#[test]
fn test_exits_field_is_optional() {
    let graph = RoomGraph::from_json_str(
        r#"{ "cell": { "name": "Cell", "description": "Bare stone." } }"#,
    )
    .unwrap();
    assert!(graph.lookup(&key("cell")).unwrap().exits.is_empty());
}

#[test]
fn test_dangling_exit_is_config_error() {
    let err = RoomGraph::from_json_str(
        r#"{ "tavern": { "name": "T", "description": "d", "exits": { "cellar": "cellar" } } }"#,
    )
    .unwrap_err();
    assert!(err.is_config_error());
    match err {
        WorldError::DanglingExit { room, exit, target } => {
            assert_eq!(room, key("tavern"));
            assert_eq!(exit, "cellar");
            assert_eq!(target, key("cellar"));
        }
        other => panic!("expected DanglingExit, got {other:?}"),
    }
}

#[test]
fn test_uppercase_exit_name_rejected() {
    let err = RoomGraph::from_rooms([
        Room::new("a", "A", "").with_exit("North", "a"),
    ])
    .unwrap_err();
    assert!(matches!(err, WorldError::InvalidExitName { .. }));
}

#[test]
fn test_empty_exit_name_rejected() {
    let err =
        RoomGraph::from_rooms([Room::new("a", "A", "").with_exit("", "a")])
            .unwrap_err();
    assert!(matches!(err, WorldError::InvalidExitName { .. }));
}

#[test]
fn test_missing_field_is_malformed() {
    let err = RoomGraph::from_json_str(r#"{ "a": { "name": "A" } }"#)
        .unwrap_err();
    assert!(matches!(err, WorldError::Malformed(_)));
    assert!(err.is_config_error());
}

#[test]
fn test_unknown_field_is_malformed() {
    let err = RoomGraph::from_json_str(
        r#"{ "a": { "name": "A", "description": "", "items": [] } }"#,
    )
    .unwrap_err();
    assert!(matches!(err, WorldError::Malformed(_)));
}

#[test]
fn test_empty_graph_rejected() {
    let err = RoomGraph::from_json_str("{}").unwrap_err();
    assert!(matches!(err, WorldError::Empty));
}

#[test]
fn test_duplicate_room_rejected() {
    let err = RoomGraph::from_rooms([
        Room::new("a", "A", ""),
        Room::new("a", "Another A", ""),
    ])
    .unwrap_err();
    assert!(matches!(err, WorldError::DuplicateRoom(k) if k == key("a")));
}

#[test]
fn test_repeated_key_in_json_rejected() {
    let json = r#"{
        "tavern": {
            "name": "Tavern",
            "description": "Warm.",
            "exits": { "outside": "outside" }
        },
        "outside": { "name": "Outside", "description": "Wet." },
        "tavern": { "name": "Shadow Tavern", "description": "Cold.", "exits": {} }
    }"#;
    let err = RoomGraph::from_json_str(json).unwrap_err();
    assert!(matches!(err, WorldError::DuplicateRoom(ref k) if *k == key("tavern")));
    assert!(err.is_config_error());
}

#[test]
fn test_non_object_json_is_malformed() {
    let err = RoomGraph::from_json_str(r#"["tavern"]"#).unwrap_err();
    assert!(matches!(err, WorldError::Malformed(_)));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let err = RoomGraph::load("/definitely/not/here/rooms.json").unwrap_err();
    assert!(matches!(err, WorldError::Io { .. }));
    assert!(err.is_config_error());
}

#[test]
fn test_load_from_disk() {
    let path = std::env::temp_dir()
        .join(format!("hearth-rooms-{}.json", std::process::id()));
    std::fs::write(&path, TAVERN_JSON).unwrap();

    let graph = RoomGraph::load(&path).unwrap();
    assert_eq!(graph.len(), 3);

    let _ = std::fs::remove_file(&path);
}

// =========================================================================
// Lookup and describe
// =========================================================================

#[test]
fn test_lookup_not_found() {
    let graph = RoomGraph::from_json_str(TAVERN_JSON).unwrap();
    let err = graph.lookup(&key("attic")).unwrap_err();
    assert!(matches!(err, WorldError::NotFound(_)));
    assert!(!err.is_config_error());
}

#[test]
fn test_describe_combines_name_and_description() {
    let graph = RoomGraph::from_json_str(TAVERN_JSON).unwrap();
    let tavern = graph.lookup(&key("tavern")).unwrap();
    assert_eq!(
        describe(tavern),
        "Tavern\nYou're in a cozy tavern warmed by an open fire."
    );
}
