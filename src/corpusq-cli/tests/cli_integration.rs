use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CATALOG: &str = "\
Title,Author,Type,Magazine,Published date,Status
Kanyasulkam,Gurajada,నాటకం,Bharati,1892-01-01,True
Maro Prapancham,Sri Sri,కవిత,Bharati,1950-01-01,True
Maro Prapancham,Sri Sri,కవిత,Andhra Patrika,1950-06-01,False
Barrister Parvateesam,Mokkapati,కథ,Bharati,1995-03-01,True
";

fn workspace() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.csv");
    fs::write(&path, CATALOG).unwrap();
    (dir, path)
}

fn corpusq(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("corpusq").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("CORPUSQ_VERBOSITY")
        .env_remove("CORPUSQ_SEPARATOR")
        .env_remove("CORPUSQ_FORMAT")
        .env_remove("CORPUSQ_LIMIT");
    cmd
}

#[test]
fn test_queries_lists_sections() {
    let (dir, _) = workspace();
    corpusq(&dir)
        .arg("queries")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Author analysis"))
        .stdout(predicate::str::contains("top_authors"))
        .stdout(predicate::str::contains("Data quality"));
}

#[test]
fn test_ask_counts_stories() {
    let (dir, path) = workspace();
    corpusq(&dir)
        .args(["ask", path.to_str().unwrap(), "stories_after_1990"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with(": 1\n"));
}

#[test]
fn test_ask_with_filter_flags_as_json() {
    let (dir, path) = workspace();
    let output = corpusq(&dir)
        .args([
            "ask",
            path.to_str().unwrap(),
            "top_magazines",
            "--status",
            "active",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["records"], 3);
    assert_eq!(parsed["result"]["rows"][0][0], "Bharati");
    assert_eq!(parsed["result"]["rows"][0][1], 3);
}

#[test]
fn test_unknown_query_fails() {
    let (dir, path) = workspace();
    corpusq(&dir)
        .args(["ask", path.to_str().unwrap(), "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("Unknown query: nonexistent"));
}

#[test]
fn test_missing_mandatory_column_fails() {
    let (dir, _) = workspace();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "Name,Year\nX,1990\n").unwrap();
    corpusq(&dir)
        .args(["summary", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required column(s)"));
}

#[test]
fn test_filter_by_year_range() {
    let (dir, path) = workspace();
    corpusq(&dir)
        .args(["filter", path.to_str().unwrap(), "--year-range", "1900..1960"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("2 of 4 records"))
        .stdout(predicate::str::contains("Kanyasulkam").not());
}

#[test]
fn test_author_year_count_and_timeline() {
    let (dir, path) = workspace();
    corpusq(&dir)
        .args([
            "author",
            path.to_str().unwrap(),
            "Sri Sri",
            "--year",
            "1950",
            "--magazine",
            "Bharati",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Sri Sri: 2 records\nUnique titles in 1950: 1\n",
        ));
}

#[test]
fn test_config_init_then_show() {
    let (dir, _) = workspace();
    corpusq(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(dir.path().join("corpusq.toml").exists());

    corpusq(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    corpusq(&dir)
        .args(["config", "show", "--limit", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("limit: 7"));
}

#[test]
fn test_config_file_sets_query_parameters() {
    let (dir, path) = workspace();
    fs::write(
        dir.path().join("corpusq.toml"),
        "[queries.stories_after_1990]\nafter_year = 2000\n",
    )
    .unwrap();
    corpusq(&dir)
        .args(["ask", path.to_str().unwrap(), "stories_after_1990"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with(": 0\n"));
}

#[test]
fn test_version_output() {
    let (dir, _) = workspace();
    corpusq(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("corpusq "));
}
