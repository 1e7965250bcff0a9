use std::fs;
use std::path::{Path, PathBuf};

use form_schema_core::{FieldKind, FormError, SubmitStatus};
use form_schema_db::{DatabaseError, SchemaDatabase, load_request, save_request};
use serde_json::json;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const USER_YAML: &str = r#"
name: user
fields:
  - key: username
    type: string
    label: Username
    placeholder: Enter username
    min: 3
    message: Username must be at least 3 characters
  - key: email
    type: email
    label: Email
  - key: status
    type: select
    label: Status
    optional: true
    options:
      - { value: ACTIVE, label: Active }
      - { value: INACTIVE, label: Inactive }
  - key: roles
    type: multi-select
    label: Roles
    options:
      - { value: admin, label: Admin }
      - { value: user, label: User }
  - key: id
    hidden: true
    optional: true
"#;

const REQUEST_YAML: &str = r#"
overrides:
  username:
    label: Login name
defaultValues:
  - roles: { value: admin, label: Admin }
    status: { value: ACTIVE, label: Active }
"#;

fn write(dir: &Path, file: &str, contents: &str) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, contents).unwrap();
    path
}

fn user_db(dir: &Path) -> SchemaDatabase {
    write(dir, "user.yaml", USER_YAML);
    SchemaDatabase::from_dir(dir).unwrap()
}

// ---------------------------------------------------------------------------
// Descriptor generation from files
// ---------------------------------------------------------------------------

#[test]
fn test_user_schema_descriptors() {
    let dir = TempDir::new().unwrap();
    let db = user_db(dir.path());
    let request = load_request(write(dir.path(), "user.request.yaml", REQUEST_YAML)).unwrap();

    let plan = db.registry().build_form("user", &request).unwrap();
    let names: Vec<_> = plan.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["username", "email", "status", "roles", "id"]);

    let username = plan.field("username").unwrap();
    assert_eq!(username.label, "Login name");
    assert_eq!(username.placeholder.as_deref(), Some("Enter username"));

    let status = plan.field("status").unwrap();
    assert_eq!(status.kind, FieldKind::Select);
    assert_eq!(status.options.as_ref().unwrap().len(), 2);

    assert!(plan.field("id").unwrap().hidden);
    assert_eq!(plan.visible_fields().count(), 4);
}

#[test]
fn test_user_schema_defaults_and_required() {
    let dir = TempDir::new().unwrap();
    let db = user_db(dir.path());
    let request = load_request(write(dir.path(), "user.request.yaml", REQUEST_YAML)).unwrap();
    let plan = db.registry().build_form("user", &request).unwrap();

    assert_eq!(
        plan.default_values["roles"],
        json!([{"value": "admin", "label": "Admin"}])
    );
    assert_eq!(plan.default_values["status"], json!("ACTIVE"));
    assert_eq!(plan.default_values["username"], json!(""));

    assert!(plan.is_required("username"));
    assert!(plan.is_required("email"));
    assert!(plan.is_required("roles"));
    assert!(!plan.is_required("status"));
    assert!(!plan.is_required("id"));
}

#[test]
fn test_user_schema_submission() {
    let dir = TempDir::new().unwrap();
    let db = user_db(dir.path());
    let plan = db
        .registry()
        .build_form("user", &Default::default())
        .unwrap();

    let ok = plan.check_submission(&json!({
        "username": "ada",
        "email": "ada@example.com",
        "roles": [{"label": "Admin", "value": "admin"}],
    }));
    assert_eq!(ok.status, SubmitStatus::Success);

    let rejected = plan.check_submission(&json!({
        "username": "ada",
        "email": "ada@example.com",
        "status": "DELETED",
        "roles": [{"label": "Admin", "value": "admin"}],
    }));
    assert_eq!(rejected.status, SubmitStatus::Error);
    assert!(rejected.message.contains("status"));
}

#[test]
fn test_unknown_schema_is_not_found() {
    let dir = TempDir::new().unwrap();
    let db = user_db(dir.path());
    let err = db
        .registry()
        .build_form("nonexistent-schema", &Default::default())
        .unwrap_err();
    assert_eq!(err, FormError::SchemaNotFound("nonexistent-schema".into()));
}

// ---------------------------------------------------------------------------
// Loading failures
// ---------------------------------------------------------------------------

#[test]
fn test_misconfigured_field_fails_load() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "bad.yaml",
        "name: bad\nfields:\n  - key: agree\n    type: checkbox\n    pattern: '^y'\n",
    );
    let err = SchemaDatabase::from_dir(dir.path()).unwrap_err();
    match err {
        DatabaseError::InvalidDeclaration { schema, source } => {
            assert_eq!(schema, "bad");
            assert_eq!(source.field, "agree");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_yaml_fails_load() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "broken.yaml", "name: [unclosed");
    assert!(matches!(
        SchemaDatabase::from_dir(dir.path()),
        Err(DatabaseError::YamlError(_))
    ));
}

#[test]
fn test_builder_skips_broken_source() {
    let broken = TempDir::new().unwrap();
    write(broken.path(), "broken.json", "{ not json");
    let good = TempDir::new().unwrap();
    write(good.path(), "user.yaml", USER_YAML);

    let db = SchemaDatabase::builder()
        .from_dir(broken.path())
        .from_dir(good.path())
        .build()
        .unwrap();
    assert!(db.contains("user"));
}

// ---------------------------------------------------------------------------
// Request files
// ---------------------------------------------------------------------------

#[test]
fn test_request_yaml_to_json_roundtrip() {
    let dir = TempDir::new().unwrap();
    let request = load_request(write(dir.path(), "user.request.yaml", REQUEST_YAML)).unwrap();

    let json_path = dir.path().join("user.request.json");
    save_request(&request, &json_path).unwrap();
    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(raw["overrides"]["username"]["label"], json!("Login name"));
    assert!(raw["defaultValues"].is_array());

    assert_eq!(load_request(&json_path).unwrap(), request);
}
