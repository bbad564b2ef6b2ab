// Sink tests: JSON shape, overwrite semantics, isolated dual writes

use cpu_tracker::models::{AggregateRecord, TIMESTAMP_FORMAT};
use cpu_tracker::sink::{SinkError, write_both, write_record};

#[test]
fn test_record_round_trip_preserves_value_and_timestamp() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("cpu_tracker.json");

    let record = AggregateRecord::new(42.57);
    write_record(&record, &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let back: AggregateRecord = serde_json::from_str(&content).unwrap();
    assert_eq!(back.cpu, 42.57);
    chrono::NaiveDateTime::parse_from_str(&back.timestamp, TIMESTAMP_FORMAT)
        .expect("timestamp should parse in the declared UTC format");
}

#[test]
fn test_record_is_written_with_four_space_indent() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("cpu_tracker.json");

    write_record(&AggregateRecord::new(12.0), &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\n    \"cpu\""), "got: {}", content);
    assert!(content.contains("\n    \"timestamp\""), "got: {}", content);
}

#[test]
fn test_write_overwrites_existing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("cpu_tracker.json");

    write_record(&AggregateRecord::new(10.0), &path).unwrap();
    write_record(&AggregateRecord::new(20.0), &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let back: AggregateRecord = serde_json::from_str(&content).unwrap();
    assert_eq!(back.cpu, 20.0);
}

#[test]
fn test_missing_directory_surfaces_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("no_such_dir").join("cpu_tracker.json");

    let err = write_record(&AggregateRecord::new(1.0), &path).unwrap_err();
    assert!(matches!(err, SinkError::Io { .. }));
}

#[test]
fn test_one_failing_sink_does_not_suppress_the_other() {
    let dir = tempfile::TempDir::new().unwrap();
    let public_path = dir.path().join("missing").join("cpu_tracker.json");
    let private_path = dir.path().join("cpu_tracker.json");

    let noised = AggregateRecord::new(51.3);
    let exact = AggregateRecord::new(50.0);
    let (public_result, private_result) = write_both(&noised, &public_path, &exact, &private_path);

    assert!(public_result.is_err());
    assert!(private_result.is_ok());
    let back: AggregateRecord =
        serde_json::from_str(&std::fs::read_to_string(&private_path).unwrap()).unwrap();
    assert_eq!(back.cpu, 50.0);
}
