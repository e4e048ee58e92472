use replicator_reflection::parse::{parse_module_manifest_file, parse_snapshot_file};
use replicator_reflection::{ClassKind, IgnoreList, PropertyAccess, ReflectionProvider, RpcKind};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_parse_door_game_snapshot() {
    let snapshot =
        parse_snapshot_file(fixture_path("door_game.json")).expect("should parse door_game.json");
    assert_eq!(snapshot.classes().len(), 4, "door game should have 4 classes");

    let door = snapshot
        .class("/Script/DoorGame.Door")
        .expect("door should exist");
    assert_eq!(door.cpp_name(), "ADoor");
    assert_eq!(door.properties[1].access, PropertyAccess::Private);
    assert_eq!(door.properties[1].ty.type_key(), "array<name>");
    assert_eq!(door.rpcs[0].kind, RpcKind::Multicast);
    assert!(!door.rpcs[0].reliable);

    let game_state = snapshot
        .find("ADoorGameState")
        .expect("game state should be found by C++ name");
    assert_eq!(game_state.kind, ClassKind::GameState);
    assert!(game_state.is_singleton());

    let sliding = snapshot
        .find("BP_SlidingDoor_C")
        .expect("blueprint should be found by name");
    assert!(sliding.blueprint);
    assert_eq!(sliding.cpp_prefix, "");
    assert_eq!(sliding.parent.as_deref(), Some("/Script/DoorGame.Door"));
}

#[test]
fn test_snapshot_ignore_list() {
    let snapshot = parse_snapshot_file(fixture_path("door_game.json"))
        .expect("should parse door_game.json")
        .with_ignore_list(
            IgnoreList::new()
                .with_class("/Script/DoorGame.HingeComponent")
                .with_path_pattern("/Game/Doors/*")
                .expect("pattern should compile"),
        );

    let ignored: Vec<&str> = snapshot
        .classes()
        .iter()
        .filter(|c| snapshot.is_ignored(c))
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(ignored, vec!["HingeComponent", "BP_SlidingDoor_C"]);
}

#[test]
fn test_parse_door_modules() {
    let manifest =
        parse_module_manifest_file(fixture_path("door_modules.json")).expect("should parse door_modules.json");
    assert_eq!(manifest.modules.len(), 1);

    let module = &manifest.modules[0];
    let includes: Vec<String> = module
        .headers
        .iter()
        .map(|h| module.include_path(h))
        .collect();
    assert_eq!(
        includes,
        vec!["Door.h", "Parts/HingeComponent.h", "DoorGameState.h"]
    );
}
