// Datasite folder layout and permission policy tests

use cpu_tracker::datasite::{Datasite, PERMISSION_FILE_NAME, PermissionPolicy};

const OWNER: &str = "owner@example.org";
const AGGREGATOR: &str = "aggregator@openmined.org";

fn read_policy(folder: &std::path::Path) -> PermissionPolicy {
    let content = std::fs::read_to_string(folder.join(PERMISSION_FILE_NAME)).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn test_restricted_public_folder_layout_and_policy() {
    let dir = tempfile::TempDir::new().unwrap();
    let datasite = Datasite::new(dir.path(), OWNER);

    let folder = datasite
        .create_restricted_public_folder(&[AGGREGATOR.to_string()])
        .unwrap();

    assert_eq!(folder, dir.path().join("app_pipelines/cpu_tracker"));
    assert!(folder.is_dir());

    let policy = read_policy(&folder);
    assert_eq!(policy.admin, vec![OWNER.to_string()]);
    assert_eq!(policy.write, vec![OWNER.to_string()]);
    assert_eq!(
        policy.read,
        vec![OWNER.to_string(), AGGREGATOR.to_string()]
    );
}

#[test]
fn test_private_folder_is_owner_only() {
    let dir = tempfile::TempDir::new().unwrap();
    let datasite = Datasite::new(dir.path(), OWNER);

    let folder = datasite.create_private_folder().unwrap();

    assert_eq!(folder, dir.path().join("private/cpu_tracker"));
    let policy = read_policy(&folder);
    assert_eq!(policy.admin, vec![OWNER.to_string()]);
    assert_eq!(policy.read, vec![OWNER.to_string()]);
    assert_eq!(policy.write, vec![OWNER.to_string()]);
}

#[test]
fn test_folder_creation_is_idempotent() {
    let dir = tempfile::TempDir::new().unwrap();
    let datasite = Datasite::new(dir.path(), OWNER);

    let first = datasite
        .create_restricted_public_folder(&[AGGREGATOR.to_string()])
        .unwrap();
    let second = datasite
        .create_restricted_public_folder(&[AGGREGATOR.to_string()])
        .unwrap();

    assert_eq!(first, second);
    assert!(second.join(PERMISSION_FILE_NAME).is_file());
}

#[test]
fn test_reader_already_present_is_not_duplicated() {
    let dir = tempfile::TempDir::new().unwrap();
    let datasite = Datasite::new(dir.path(), OWNER);

    let folder = datasite
        .create_restricted_public_folder(&[OWNER.to_string(), AGGREGATOR.to_string()])
        .unwrap();

    let policy = read_policy(&folder);
    assert_eq!(
        policy.read,
        vec![OWNER.to_string(), AGGREGATOR.to_string()]
    );
}
