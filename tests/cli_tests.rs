//! Binary-level tests driving `mirrorsync --once`

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn mirrorsync() -> Command {
    let mut cmd = Command::cargo_bin("mirrorsync").expect("binary should be built");
    cmd.env("RUST_LOG", "info");
    cmd
}

#[test]
fn test_once_mirrors_and_logs() {
    let work = TempDir::new().expect("create tempdir");
    let source = work.path().join("source");
    let replica = work.path().join("replica");
    let log_file = work.path().join("logs/mirrorsync.log");
    fs::create_dir_all(source.join("nested")).expect("create source");
    fs::write(source.join("nested/file.txt"), b"payload").expect("write source");

    mirrorsync()
        .arg("--source")
        .arg(&source)
        .arg("--replica")
        .arg(&replica)
        .args(["--interval", "5"])
        .arg("--log-file")
        .arg(&log_file)
        .arg("--once")
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied file from"))
        .stdout(predicate::str::contains("Synchronization finished."));

    assert_eq!(
        fs::read(replica.join("nested/file.txt")).expect("read replica"),
        b"payload"
    );
    let log = fs::read_to_string(&log_file).expect("read log file");
    assert!(log.contains("Created folder"));
    assert!(log.contains("Copied file from"));
}

#[test]
fn test_legacy_flag_spellings_are_accepted() {
    let work = TempDir::new().expect("create tempdir");
    let source = work.path().join("source");
    let replica = work.path().join("replica");
    fs::create_dir(&source).expect("create source");
    fs::write(source.join("a.txt"), b"a").expect("write source");

    mirrorsync()
        .arg("--source_folder")
        .arg(&source)
        .arg("--replica_folder")
        .arg(&replica)
        .args(["--interval_seconds", "1"])
        .arg("--log_file")
        .arg(work.path().join("sync.log"))
        .arg("--once")
        .assert()
        .success();

    assert!(replica.join("a.txt").exists());
}

#[test]
fn test_config_file_supplies_settings() {
    let work = TempDir::new().expect("create tempdir");
    let source = work.path().join("source");
    let replica = work.path().join("replica");
    fs::create_dir(&source).expect("create source");
    fs::write(source.join("a.txt"), b"a").expect("write source");

    let config = work.path().join("mirrorsync.toml");
    fs::write(
        &config,
        format!(
            "source = {:?}\nreplica = {:?}\ninterval_seconds = 30\nlog_file = {:?}\n",
            source,
            replica,
            work.path().join("sync.log")
        ),
    )
    .expect("write config");

    mirrorsync()
        .arg("--config")
        .arg(&config)
        .arg("--once")
        .assert()
        .success();

    assert!(replica.join("a.txt").exists());
}

#[test]
fn test_missing_source_is_rejected() {
    let work = TempDir::new().expect("create tempdir");

    mirrorsync()
        .arg("--source")
        .arg(work.path().join("does-not-exist"))
        .arg("--replica")
        .arg(work.path().join("replica"))
        .args(["--interval", "5"])
        .arg("--log-file")
        .arg(work.path().join("sync.log"))
        .arg("--once")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist or is not a directory"));

    assert!(!work.path().join("replica").exists());
}

#[test]
fn test_zero_interval_is_rejected() {
    let work = TempDir::new().expect("create tempdir");
    fs::create_dir(work.path().join("source")).expect("create source");

    mirrorsync()
        .arg("--source")
        .arg(work.path().join("source"))
        .arg("--replica")
        .arg(work.path().join("replica"))
        .args(["--interval", "0"])
        .arg("--log-file")
        .arg(work.path().join("sync.log"))
        .assert()
        .failure();
}

#[test]
fn test_replica_inside_source_is_rejected() {
    let work = TempDir::new().expect("create tempdir");
    let source = work.path().join("source");
    fs::create_dir(&source).expect("create source");

    mirrorsync()
        .arg("--source")
        .arg(&source)
        .arg("--replica")
        .arg(source.join("replica"))
        .args(["--interval", "5"])
        .arg("--log-file")
        .arg(work.path().join("sync.log"))
        .arg("--once")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is inside source"));
}
