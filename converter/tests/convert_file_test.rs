//! End-to-end conversion over real files.

use credits_jsonl::{convert_file, ConvertError, RunConfig, SetupError};
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn read_lines(path: &std::path::Path) -> Vec<Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = tempdir().unwrap();
    let config = RunConfig::new(dir.path().join("nope.csv"), dir.path().join("out/movies.jsonl"));

    let err = convert_file(&config).unwrap_err();
    assert!(matches!(err, ConvertError::Setup(SetupError::InputMissing { .. })));
    assert!(err.to_string().starts_with("CSV not found at"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_empty_input_is_fatal_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("credits.csv");
    fs::write(&input, "").unwrap();
    let config = RunConfig::new(&input, dir.path().join("out/movies.jsonl"));

    let err = convert_file(&config).unwrap_err();
    assert!(matches!(err, ConvertError::Setup(SetupError::InputEmpty { .. })));
    assert!(err.is_setup());
    assert!(!config.output.exists());
}

#[test]
fn test_creates_output_directory_and_writes_one_line_per_row() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("credits.csv");
    fs::write(
        &input,
        "cast,crew,id\n\
         \"[{'cast_id': 14, 'character': 'Woody (voice)', 'name': 'Tom Hanks', 'order': 0}, {'name': 'Tim Allen', 'order': 1}]\",\
         \"[{'department': 'Directing', 'job': 'Director', 'name': 'John Lasseter'}, {'job': 'Screenplay', 'name': 'Joss Whedon'}, {'job': 'Screenplay', 'name': 'Andrew Stanton'}]\",\
         862\n\
         not a list,,8844\n",
    )
    .unwrap();
    let output = dir.path().join("src/data/movies.raw.jsonl");

    let summary = convert_file(&RunConfig::new(&input, &output)).unwrap();
    assert_eq!(summary.written, 2);

    let records = read_lines(&output);
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first["id"], 862);
    assert_eq!(first["cast"][0]["character"], "Woody (voice)");
    assert_eq!(first["cast_names"], serde_json::json!(["Tom Hanks", "Tim Allen"]));
    assert_eq!(first["top_cast"], first["cast_names"]);
    assert_eq!(
        first["crew_by_job"],
        serde_json::json!({"Director": ["John Lasseter"], "Screenplay": ["Joss Whedon", "Andrew Stanton"]})
    );
    let keys: Vec<&String> = first.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["id", "cast", "crew", "cast_names", "top_cast", "crew_by_job"]);

    let second = &records[1];
    assert_eq!(second["id"], 8844);
    assert_eq!(second["cast"], serde_json::json!([]));
    assert_eq!(second["crew"], serde_json::json!([]));
    assert_eq!(second["crew_by_job"], serde_json::json!({}));
}

#[test]
fn test_overwrites_previous_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("credits.csv");
    let output = dir.path().join("movies.jsonl");
    fs::write(&input, "cast,crew,id\n[],[],1\n").unwrap();
    fs::write(&output, "stale\nstale\nstale\n").unwrap();

    convert_file(&RunConfig::new(&input, &output)).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(!text.contains("stale"));
}

#[test]
fn test_fallback_id_and_unicode_names() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("credits.csv");
    let output = dir.path().join("movies.jsonl");
    fs::write(
        &input,
        "\u{feff}actors,people,tmdb\n\"[{'name': 'Zoë Saldaña'}]\",\"[{'name': 'Björk', 'job': 'Composer'}]\",\" 862 \"\n",
    )
    .unwrap();

    convert_file(&RunConfig::new(&input, &output)).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("Zoë Saldaña"));
    let record: Value = serde_json::from_str(text.trim_end()).unwrap();
    assert_eq!(record["id"], 862);
    assert_eq!(record["cast_names"], serde_json::json!(["Zoë Saldaña"]));
    assert_eq!(record["crew_by_job"], serde_json::json!({"Composer": ["Björk"]}));
}
