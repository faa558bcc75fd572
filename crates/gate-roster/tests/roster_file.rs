use std::fs;

use gate_roster::{load_roster, parse_roster, RosterError, OTHER_PURPOSE};
use tempfile::TempDir;

const SMALL_ROSTER: &str = r#"{
  "schema_version": 1,
  "authorities": [
    {
      "id": 1,
      "name": "Gate Supervisor",
      "designation": "Supervisor",
      "department": "Security",
      "phone": "+1-555-0100",
      "email": "gate@example.org",
      "purposes": ["Delivery", "Courier"]
    },
    {
      "id": 2,
      "name": "Facilities Desk",
      "designation": "Coordinator",
      "department": "Facilities",
      "phone": "+1-555-0101",
      "email": "facilities@example.org",
      "purposes": ["delivery", "repair"]
    }
  ]
}"#;

#[test]
fn roster_file_loads_and_keeps_builtin_fallback() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("roster.json");
    fs::write(&path, SMALL_ROSTER).expect("write roster");

    let roster = load_roster(&path).expect("load roster");

    assert_eq!(roster.authorities().len(), 2);
    assert_eq!(roster.authorities()[0].purposes, vec!["delivery", "courier"]);
    assert_eq!(roster.fallback().id, 999);

    let matched: Vec<u32> = roster.resolve("parcel delivery").iter().map(|a| a.id).collect();
    assert_eq!(matched, vec![1, 2]);
    assert_eq!(roster.resolve(OTHER_PURPOSE)[0].id, 999);
}

#[test]
fn unsupported_schema_version_is_rejected() {
    let raw = SMALL_ROSTER.replace("\"schema_version\": 1", "\"schema_version\": 2");

    let result = parse_roster(&raw);

    assert!(matches!(
        result,
        Err(RosterError::Parse(message)) if message.contains("schema_version")
    ));
}

#[test]
fn fallback_id_must_not_collide_with_roster() {
    let raw = r#"{
      "authorities": [
        {"id": 7, "name": "A", "designation": "D", "department": "X",
         "phone": "1", "email": "a@example.org", "purposes": ["repair"]}
      ],
      "fallback": {"id": 7, "name": "Head", "designation": "Director", "department": "X",
         "phone": "2", "email": "h@example.org", "purposes": ["other"]}
    }"#;

    assert!(matches!(parse_roster(raw), Err(RosterError::DuplicateId(7))));
}

#[test]
fn missing_file_is_an_io_error() {
    let temp_dir = TempDir::new().expect("create temp dir");

    let result = load_roster(&temp_dir.path().join("absent.json"));

    assert!(matches!(result, Err(RosterError::Io(_))));
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(parse_roster("{not json"), Err(RosterError::Parse(_))));
}
