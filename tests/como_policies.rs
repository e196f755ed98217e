use std::fs;
use std::path::Path;
use tempfile::tempdir;

use filetime::FileTime;

use filekit::fs_ops::como::{transfer, ConflictPolicy, TransferMode, TransferRequest};
use filekit::selector::FileSelector;

fn request(src: &Path, dst: &Path) -> TransferRequest {
    TransferRequest {
        dir_source: src.to_path_buf(),
        dir_dest: dst.to_path_buf(),
        mode: TransferMode::Copy,
        policy: ConflictPolicy::Overwrite,
        flatten: false,
        dry_run: false,
    }
}

fn select_all(dir: &Path) -> Vec<std::path::PathBuf> {
    FileSelector {
        dir_source: dir.to_path_buf(),
        recursive: true,
        filterstring: None,
        filterlist: None,
    }
    .collect()
    .unwrap()
}

#[test]
fn keep_all_flatten_same_name_sources() {
    // Two subdirectories hold a file of the same name; flattening with
    // keep-all must give the second one a suffix instead of clobbering.
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    let dst = td.path().join("dst");
    fs::create_dir_all(src.join("a")).unwrap();
    fs::create_dir_all(src.join("b")).unwrap();
    fs::write(src.join("a").join("x.txt"), b"from a").unwrap();
    fs::write(src.join("b").join("x.txt"), b"from b").unwrap();

    let mut req = request(&src, &dst);
    req.policy = ConflictPolicy::KeepAll;
    req.flatten = true;
    let files = select_all(&src);

    // Dry run first: same decisions, zero effect.
    req.dry_run = true;
    let dry = transfer(&req, &files).unwrap();
    assert!(!dst.exists());

    req.dry_run = false;
    let real = transfer(&req, &files).unwrap();
    assert_eq!(dry, real, "dry run must make the decisions a real run makes");
    assert_eq!(real.transferred, 2);
    assert_eq!(real.renamed, 1);
    assert!(dst.join("x.txt").exists());
    assert!(dst.join("x (2).txt").exists());
}

#[test]
fn overwrite_replaces_and_reports() {
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    let dst = td.path().join("dst");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&dst).unwrap();
    fs::write(src.join("a.txt"), b"new").unwrap();
    fs::write(dst.join("a.txt"), b"old").unwrap();

    let counts = transfer(&request(&src, &dst), &select_all(&src)).unwrap();
    assert_eq!(counts.replaced, 1);
    assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "new");
}

#[test]
fn dryrun_leaves_both_trees_untouched() {
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    let dst = td.path().join("dst");
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::create_dir_all(&dst).unwrap();
    fs::write(src.join("sub").join("f.txt"), b"x").unwrap();
    fs::write(dst.join("stale.txt"), b"y").unwrap();
    let src_mtime = FileTime::from_last_modification_time(
        &fs::metadata(src.join("sub").join("f.txt")).unwrap(),
    );

    let mut req = request(&src, &dst);
    req.mode = TransferMode::Move;
    req.dry_run = true;
    let counts = transfer(&req, &select_all(&src)).unwrap();
    assert_eq!(counts.transferred, 1);

    // Source intact (even for a move), destination unchanged.
    assert!(src.join("sub").join("f.txt").exists());
    assert!(!dst.join("sub").exists());
    assert_eq!(fs::read_to_string(dst.join("stale.txt")).unwrap(), "y");
    assert_eq!(
        FileTime::from_last_modification_time(
            &fs::metadata(src.join("sub").join("f.txt")).unwrap()
        ),
        src_mtime
    );
}

#[test]
fn move_mirrors_nested_structure() {
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    let dst = td.path().join("dst");
    fs::create_dir_all(src.join("x").join("y")).unwrap();
    fs::write(src.join("x").join("y").join("deep.txt"), b"deep").unwrap();
    fs::write(src.join("top.txt"), b"top").unwrap();

    let mut req = request(&src, &dst);
    req.mode = TransferMode::Move;
    let counts = transfer(&req, &select_all(&src)).unwrap();
    assert_eq!(counts.transferred, 2);
    assert_eq!(
        fs::read_to_string(dst.join("x").join("y").join("deep.txt")).unwrap(),
        "deep"
    );
    assert_eq!(fs::read_to_string(dst.join("top.txt")).unwrap(), "top");
    assert!(!src.join("top.txt").exists());
    assert!(!src.join("x").join("y").join("deep.txt").exists());
}
