use super::*;

fn strict() -> LineParser {
    LineParser::new(LineFormat::default())
}

fn lenient() -> LineParser {
    LineParser::new(LineFormat {
        policy: FormatPolicy::Lenient,
        ..LineFormat::default()
    })
}

fn update(age: u64, user_id: &str, activity: Option<&str>, role: Option<Role>) -> UserUpdate {
    UserUpdate {
        update_age_ms: age,
        user_id: user_id.to_owned(),
        activity: activity.map(str::to_owned),
        role,
    }
}

#[test]
fn parses_room_and_basic_segments() {
    let line = strict()
        .parse("quiet,(1200:alice:walking),(0:bob:sitting)")
        .expect("parse");

    assert_eq!(line.room, Some(RoomState::Quiet));
    assert_eq!(
        line.users,
        vec![
            update(1200, "alice", Some("walking"), None),
            update(0, "bob", Some("sitting"), None),
        ]
    );
}

#[test]
fn parses_role_segments() {
    let line = strict()
        .parse("meeting,(5:carol:standing:speaker),(7:dave::listener)")
        .expect("parse");

    assert_eq!(line.room, Some(RoomState::Meeting));
    assert_eq!(
        line.users,
        vec![
            update(5, "carol", Some("standing"), Some(Role::Speaker)),
            update(7, "dave", None, Some(Role::Listener)),
        ]
    );
}

#[test]
fn room_only_line_has_no_users() {
    let line = strict().parse("open").expect("parse");
    assert_eq!(line.room, Some(RoomState::Open));
    assert!(line.users.is_empty());
}

#[test]
fn empty_room_field_leaves_room_unset() {
    let line = strict().parse(",(1:a:x)").expect("parse");
    assert_eq!(line.room, None);
    assert_eq!(line.users.len(), 1);
}

#[test]
fn flat_format_treats_every_field_as_user() {
    let parser = LineParser::new(LineFormat {
        room_prefixed: false,
        arity: SegmentArity::Basic,
        policy: FormatPolicy::Strict,
    });

    let line = parser.parse("(1:a:x),(2:b:y)").expect("parse");
    assert_eq!(line.room, None);
    assert_eq!(line.users.len(), 2);
}

#[test]
fn quoted_user_id_may_contain_separators() {
    let line = strict().parse(r#"open,(3:"team:red":running)"#).expect("parse");
    assert_eq!(line.users, vec![update(3, "team:red", Some("running"), None)]);
}

#[test]
fn strict_rejects_wrong_field_count() {
    let err = strict()
        .parse("open,(1:a)")
        .expect_err("two fields should be rejected");
    assert!(matches!(
        err,
        MalformedInput::FieldCount {
            found: 2,
            expected: "3 or 4",
            ..
        }
    ));
}

#[test]
fn basic_arity_rejects_role_segment() {
    let parser = LineParser::new(LineFormat {
        arity: SegmentArity::Basic,
        ..LineFormat::default()
    });
    let err = parser
        .parse("open,(1:a:x:speaker)")
        .expect_err("four fields should be rejected");
    assert!(matches!(err, MalformedInput::FieldCount { found: 4, .. }));
}

#[test]
fn with_role_arity_rejects_basic_segment() {
    let parser = LineParser::new(LineFormat {
        arity: SegmentArity::WithRole,
        ..LineFormat::default()
    });
    assert!(parser.parse("open,(1:a:x)").is_err());
}

#[test]
fn strict_rejects_bad_age_and_unknown_values() {
    assert_eq!(
        strict().parse("open,(soon:a:x)").expect_err("age"),
        MalformedInput::InvalidAge("soon".to_owned())
    );
    assert_eq!(
        strict().parse("party,(1:a:x)").expect_err("room"),
        MalformedInput::UnknownRoomState("party".to_owned())
    );
    assert_eq!(
        strict().parse("open,(1:a:x:boss)").expect_err("role"),
        MalformedInput::UnknownRole("boss".to_owned())
    );
    assert!(matches!(
        strict().parse("open,(1::x)").expect_err("user id"),
        MalformedInput::EmptyUserId(_)
    ));
}

#[test]
fn lenient_skips_bad_segments_and_keeps_good_ones() {
    let line = lenient()
        .parse("open,(1:a),(2:b:walking),(x:c:y),(3:d:z:boss)")
        .expect("parse");
    assert_eq!(line.room, Some(RoomState::Open));
    assert_eq!(line.users, vec![update(2, "b", Some("walking"), None)]);
}

#[test]
fn lenient_ignores_unknown_room() {
    let line = lenient().parse("party,(1:a:x)").expect("parse");
    assert_eq!(line.room, None);
    assert_eq!(line.users.len(), 1);
}

#[test]
fn strict_rejects_unclosed_segment() {
    assert!(matches!(
        strict().parse("open,(1:a:x"),
        Err(MalformedInput::QuoteNotClosed { .. })
    ));
}
