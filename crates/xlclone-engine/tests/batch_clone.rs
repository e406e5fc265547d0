//! Folder batch tests: tallying, lifecycle hygiene, and early abort.

mod common;

use std::fs;
use std::path::Path;

use common::{name_age_grid, sample_parts, FakeDoc, FakeHost, FakeSheet, SaveCopy};
use pretty_assertions::assert_eq;
use xlclone_core::{DocumentId, HostError};
use xlclone_engine::{clone_folder, CloneError, CloneOptions};

fn good_doc(name: &str) -> FakeDoc {
    FakeDoc::named(name)
        .sheet(FakeSheet::grid("People", 1, 1, name_age_grid()))
        .save_copy(SaveCopy::Package(sample_parts()))
}

fn doomed_doc(name: &str) -> FakeDoc {
    // Garbage native copy, unreadable state, no template: every strategy
    // fails.
    FakeDoc::named(name)
        .save_copy(SaveCopy::Garbage)
        .unreadable()
}

fn options_in(scratch: &Path) -> CloneOptions {
    CloneOptions {
        scratch_root: scratch.to_path_buf(),
        ..Default::default()
    }
}

#[test]
fn test_one_bad_document_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("books");
    fs::create_dir(&folder).unwrap();
    fs::write(folder.join("a.xlsx"), b"placeholder").unwrap();
    fs::write(folder.join("b.xlsx"), b"placeholder").unwrap();

    let host = FakeHost::with_docs(vec![good_doc("a.xlsx"), doomed_doc("b.xlsx")]);

    let summary = clone_folder(&host, &folder, None, options_in(dir.path())).unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.output_dir, folder.join("new"));

    // The good clone landed in the default output folder; the bad one left
    // nothing behind.
    assert!(folder.join("new/a.xlsx").exists());
    assert!(!folder.join("new/b.xlsx").exists());
    let parts = xlclone_container::unpack(&folder.join("new/a.xlsx")).unwrap();
    assert_eq!(parts, sample_parts());

    // Both documents were opened and both were closed, the failed one
    // included.
    assert_eq!(host.opened(), vec![folder.join("a.xlsx"), folder.join("b.xlsx")]);
    assert_eq!(host.closed(), vec![DocumentId(1), DocumentId(2)]);
}

#[test]
fn test_clones_can_be_sent_to_a_custom_folder() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("books");
    let custom = dir.path().join("elsewhere");
    fs::create_dir(&folder).unwrap();
    fs::write(folder.join("a.xlsx"), b"placeholder").unwrap();

    let host = FakeHost::single(good_doc("a.xlsx"));

    let summary =
        clone_folder(&host, &folder, Some(&custom), options_in(dir.path())).unwrap();

    assert_eq!(summary.output_dir, custom);
    assert!(custom.join("a.xlsx").exists());
    assert!(!folder.join("new").exists());
}

#[test]
fn test_a_folder_without_workbooks_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), b"n").unwrap();

    let host = FakeHost::with_docs(Vec::new());
    let err = clone_folder(&host, dir.path(), None, options_in(dir.path())).unwrap_err();

    match err {
        CloneError::EmptyFolder(folder) => assert_eq!(folder, dir.path()),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(host.opened().is_empty());
}

#[test]
fn test_a_dead_host_stops_the_batch_early() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("books");
    fs::create_dir(&folder).unwrap();
    fs::write(folder.join("a.xlsx"), b"placeholder").unwrap();
    fs::write(folder.join("b.xlsx"), b"placeholder").unwrap();

    let host = FakeHost::with_docs(vec![
        FakeDoc::named("a.xlsx").save_copy(SaveCopy::Fatal),
        good_doc("b.xlsx"),
    ]);

    let err = clone_folder(&host, &folder, None, options_in(dir.path())).unwrap_err();

    assert!(matches!(err, CloneError::Host(HostError::Unavailable(_))));
    // The run stopped at the first document: the second was never opened,
    // but the doomed handle was still released.
    assert_eq!(host.opened(), vec![folder.join("a.xlsx")]);
    assert_eq!(host.closed(), vec![DocumentId(1)]);
    assert!(!folder.join("new/a.xlsx").exists());
}
