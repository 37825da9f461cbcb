//! End-to-end checks: every strategy moves real bytes correctly, the direct
//! path's alignment rules are observable, and a full benchmark run leaves
//! the expected files behind.

use parcp::bench::{test_file_name, BenchmarkRunner};
use parcp::config::{BenchmarkConfig, CopyStrategy};
use parcp::models::BenchmarkReport;
use parcp::testfile::generate_test_file;
use std::path::Path;
use tempfile::tempdir;

fn copy_and_compare(strategy: CopyStrategy, dir: &Path) {
    let source = dir.join("source.dat");
    let destination = dir.join(format!("dest_{}.dat", strategy));
    generate_test_file(&source, 256 * 1024).unwrap();

    let size = std::fs::metadata(&source).unwrap().len();
    strategy.copy(&source, &destination, size).unwrap();

    assert_eq!(
        std::fs::read(&source).unwrap(),
        std::fs::read(&destination).unwrap(),
        "{} copy altered content",
        strategy
    );
}

#[test]
fn system_copy_round_trips() {
    let dir = tempdir().unwrap();
    copy_and_compare(CopyStrategy::SystemCp, dir.path());
}

#[test]
fn mmap_copy_round_trips() {
    let dir = tempdir().unwrap();
    copy_and_compare(CopyStrategy::Mmap, dir.path());
}

#[test]
fn direct_io_copy_round_trips() {
    let dir = tempdir().unwrap();
    copy_and_compare(CopyStrategy::DirectIo, dir.path());
}

#[test]
fn direct_io_drops_sub_block_tail() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("unaligned.dat");
    let destination = dir.path().join("unaligned_copy.dat");

    // 4196 = 8 whole blocks plus a 100-byte tail
    std::fs::write(&source, vec![0xA7u8; 4196]).unwrap();

    let result = CopyStrategy::DirectIo.copy(&source, &destination, 4196);

    assert!(result.is_err());
    assert_eq!(std::fs::metadata(&destination).unwrap().len(), 4096);
}

#[test]
fn memory_probe_ignores_paths() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("never_created.dat");
    let destination = dir.path().join("never_written.dat");

    CopyStrategy::MemoryImpact
        .copy(&source, &destination, 3 * 1024 * 1024 + 100)
        .unwrap();

    assert!(!source.exists());
    assert!(!destination.exists());
}

#[tokio::test]
async fn benchmark_persists_json_report() {
    let source = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let json_path = dest.path().join("report.json");

    let config = BenchmarkConfig::new(
        source.path().to_path_buf(),
        dest.path().to_path_buf(),
        128 * 1024,
        2,
    )
    .with_json_output(json_path.clone());

    let report = BenchmarkRunner::new(config).unwrap().run().await.unwrap();
    report.save_json(&json_path).unwrap();

    let restored: BenchmarkReport =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(restored.records.len(), 2);
    assert!(restored.all_succeeded);
    assert_eq!(restored.records[0].filename, test_file_name(1));
}
