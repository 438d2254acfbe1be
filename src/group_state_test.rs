use super::*;
use crate::protocol_objects::Role;

fn update(age: u64, user_id: &str, activity: &str) -> UserUpdate {
    UserUpdate {
        update_age_ms: age,
        user_id: user_id.to_owned(),
        activity: Some(activity.to_owned()).filter(|a| !a.is_empty()),
        role: None,
    }
}

fn ids(states: &[UserState]) -> Vec<&str> {
    states.iter().map(UserState::user_id).collect()
}

#[test]
fn first_appearance_inserts_later_ones_update() {
    let mut group = GroupState::new();

    assert!(group.apply_user(&update(10, "alice", "walking")));
    assert!(!group.apply_user(&update(20, "alice", "running")));
    assert!(!group.apply_user(&update(30, "alice", "")));

    assert_eq!(group.len(), 1);
    let alice = group.get("alice").expect("alice");
    assert_eq!(alice.update_age_ms, 30);
    assert_eq!(alice.activity, None);
}

#[test]
fn role_is_kept_when_update_has_none() {
    let mut group = GroupState::new();
    group.apply_user(&UserUpdate {
        role: Some(Role::Moderator),
        ..update(1, "bob", "sitting")
    });
    group.apply_user(&update(2, "bob", "standing"));

    let bob = group.get("bob").expect("bob");
    assert_eq!(bob.role, Some(Role::Moderator));
    assert_eq!(bob.activity.as_deref(), Some("standing"));
}

#[test]
fn snapshot_grows_in_ascending_order() {
    let mut group = GroupState::new();
    let arrivals = ["mike", "anna", "zoe", "bert", "kim"];

    for (n, user_id) in arrivals.iter().enumerate() {
        group.apply_line(&ServerLine {
            room: None,
            users: vec![update(0, user_id, "walking")],
        });
        let snapshot = group.snapshot();
        assert_eq!(snapshot.len(), n + 1);
        assert!(ids(&snapshot).is_sorted());
    }

    assert_eq!(
        ids(&group.snapshot()),
        vec!["anna", "bert", "kim", "mike", "zoe"]
    );
}

#[test]
fn sort_cache_is_rebuilt_only_after_insertion() {
    let mut group = GroupState::new();
    group.apply_user(&update(0, "b", "x"));
    group.apply_user(&update(0, "a", "x"));
    assert!(group.needs_sort());

    group.snapshot();
    assert!(!group.needs_sort());

    group.apply_user(&update(5, "a", "y"));
    assert!(!group.needs_sort());

    // values in a cached snapshot still reflect the latest update
    let snapshot = group.snapshot();
    assert_eq!(ids(&snapshot), vec!["a", "b"]);
    assert_eq!(snapshot[0].activity.as_deref(), Some("y"));

    group.apply_user(&update(0, "c", "x"));
    assert!(group.needs_sort());
}

#[test]
fn room_field_updates_room_state() {
    let mut group = GroupState::new();
    assert_eq!(group.room(), None);

    group.apply_line(&ServerLine {
        room: Some(RoomState::Meeting),
        users: Vec::new(),
    });
    assert_eq!(group.room(), Some(RoomState::Meeting));

    group.apply_line(&ServerLine::default());
    assert_eq!(group.room(), Some(RoomState::Meeting));
    assert!(group.is_empty());
}
