use hashfill::engine::{digest_file, digest_to_hex, snapshot_line, snapshot_ready, write_snapshot};
use hashfill::pipeline::{
    WorkQueue, collect_hashes, collect_outcomes, hash_record, resolve_workers,
    shutdown_pipeline_handles, spawn_hash_workers,
};
use hashfill::{HashOutcome, HashedRecord, Record};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
/// sha256("hello world\n")
const HELLO_SHA256: &str = "a948904f2f0f479b8f8197694b30184b0d2ed1c1cd2a1ec0fb85d299a192a447";

fn write_file(root: &Path, dataset_dir: &str, rel: &str, contents: &[u8]) -> PathBuf {
    let path = root.join(dataset_dir).join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

// --- digest function ---

#[test]
fn test_digest_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "ds1", "img.jpg", b"");
    assert_eq!(digest_to_hex(&digest_file(&path).unwrap()), EMPTY_SHA256);
}

#[test]
fn test_digest_known_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "ds1", "hello.txt", b"hello world\n");
    assert_eq!(digest_to_hex(&digest_file(&path).unwrap()), HELLO_SHA256);
}

#[test]
fn test_digest_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(digest_file(dir.path()).is_err());
}

// --- record paths ---

#[test]
fn test_record_absolute_path() {
    let r = Record::new("a1", "sub/img.jpg", "ds1");
    assert_eq!(
        r.absolute_path(Path::new("/data")),
        PathBuf::from("/data/ds1/sub/img.jpg")
    );
}

// --- hash_record ---

#[test]
fn test_hash_record_success() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "ds1", "img.jpg", b"");
    match hash_record(Record::new("a1", "img.jpg", "ds1"), dir.path()) {
        HashOutcome::Hashed(h) => {
            assert_eq!(h.key, "a1");
            assert_eq!(h.digest_hex(), EMPTY_SHA256);
        }
        HashOutcome::Failed(f) => panic!("unexpected failure: {}", f.reason),
    }
}

#[test]
fn test_hash_record_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    match hash_record(Record::new("a1", "img.jpg", "ds1"), dir.path()) {
        HashOutcome::Failed(f) => {
            assert_eq!(f.key, "a1");
            assert_eq!(f.path, dir.path().join("ds1").join("img.jpg"));
        }
        HashOutcome::Hashed(_) => panic!("missing file must not hash"),
    }
}

// --- snapshot ---

#[test]
fn test_snapshot_scenario_line() {
    let h = HashedRecord {
        key: "a1".to_string(),
        digest: [0u8; 32],
    };
    assert_eq!(snapshot_line(&h), format!("a1,{}\n", "0".repeat(64)));
}

#[test]
fn test_snapshot_write_then_ready() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("image_hashes.csv");
    assert!(!snapshot_ready(&path));
    let records = vec![
        HashedRecord {
            key: "a".into(),
            digest: [1; 32],
        },
        HashedRecord {
            key: "b".into(),
            digest: [2; 32],
        },
    ];
    assert_eq!(write_snapshot(&path, &records).unwrap(), 2);
    assert!(snapshot_ready(&path));
    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.len() == 2 + 64));
}

// --- worker pool ---

/// `m` records; every third one has no file on disk.
fn fixture_records(root: &Path, m: usize) -> (Vec<Record>, usize) {
    let mut records = Vec::with_capacity(m);
    let mut missing = 0;
    for i in 0..m {
        let rel = format!("{i}.jpg");
        if i % 3 == 0 {
            missing += 1;
        } else {
            write_file(root, "ds", &rel, format!("payload {i}").as_bytes());
        }
        records.push(Record::new(format!("k{i}"), rel, "ds"));
    }
    (records, missing)
}

fn assert_each_record_once(workers: usize, m: usize) {
    let dir = tempfile::tempdir().unwrap();
    let (records, missing) = fixture_records(dir.path(), m);
    let agg = collect_hashes(records, dir.path(), workers, false, None).unwrap();

    assert_eq!(agg.hashed.len() + agg.failures.len(), m);
    assert_eq!(agg.failures.len(), missing);
    let keys: HashSet<&str> = agg
        .hashed
        .iter()
        .map(|h| h.key.as_str())
        .chain(agg.failures.iter().map(|f| f.key.as_str()))
        .collect();
    assert_eq!(keys.len(), m, "every record accounted for exactly once");
}

#[test]
fn test_pool_more_workers_than_records() {
    assert_each_record_once(32, 5);
}

#[test]
fn test_pool_fewer_workers_than_records() {
    assert_each_record_once(3, 300);
}

#[test]
fn test_idle_workers_exit_on_empty_queue() {
    let dir = tempfile::tempdir().unwrap();
    let records: Vec<Record> = (0..3)
        .map(|i| {
            let rel = format!("{i}.jpg");
            write_file(dir.path(), "ds", &rel, format!("payload {i}").as_bytes());
            Record::new(format!("k{i}"), rel, "ds")
        })
        .collect();
    let queue = WorkQueue::new(records);
    let (outcome_tx, outcome_rx) = crossbeam_channel::unbounded();

    let handles = spawn_hash_workers(&queue, &outcome_tx, dir.path(), 16, None);
    drop(outcome_tx);
    assert_eq!(handles.len(), 16);

    let agg = collect_outcomes(outcome_rx, None);
    shutdown_pipeline_handles(handles).unwrap();
    assert!(agg.failures.is_empty());
    let keys: HashSet<&str> = agg.hashed.iter().map(|h| h.key.as_str()).collect();
    assert_eq!(keys, HashSet::from(["k0", "k1", "k2"]));
    assert_eq!(agg.hashed.len(), 3);
    assert!(queue.is_empty());
}

#[test]
fn test_pool_no_records() {
    let dir = tempfile::tempdir().unwrap();
    let agg = collect_hashes(Vec::new(), dir.path(), 8, false, None).unwrap();
    assert_eq!(agg.total(), 0);
}

#[test]
fn test_resolve_workers_bounds() {
    assert_eq!(resolve_workers(8, 3), 3);
    assert_eq!(resolve_workers(8, 0), 1);
    assert!(resolve_workers(4, 1000) <= 4);
}
