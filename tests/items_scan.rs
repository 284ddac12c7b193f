use std::fs;
use std::path::PathBuf;

use time_slider::Error;
use time_slider::config::{Configuration, ItemEntry};
use time_slider::items;

#[test]
fn scan_finds_images_recursively_in_path_order() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("nested")).unwrap();
    fs::write(root.join("b.png"), b"not really a png").unwrap();
    fs::write(root.join("a.JPG"), b"not really a jpeg").unwrap();
    fs::write(root.join("notes.txt"), b"ignored").unwrap();
    fs::write(root.join("nested").join("c.webp"), b"x").unwrap();

    let found = items::scan_library(root).unwrap();
    assert_eq!(
        found,
        vec![
            root.join("a.JPG"),
            root.join("b.png"),
            root.join("nested").join("c.webp"),
        ]
    );
}

#[test]
fn explicit_items_come_before_scanned_ones() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("z.jpg"), b"x").unwrap();

    let cfg = Configuration {
        library_path: Some(dir.path().to_path_buf()),
        items: vec![ItemEntry {
            image: PathBuf::from("/pinned/first.jpg"),
            link: Some("https://example.com/first".into()),
        }],
        ..Configuration::default()
    };

    let built = items::from_configuration(&cfg).unwrap();
    assert_eq!(built.len(), 2);
    assert_eq!(built[0].index, 0);
    assert_eq!(built[0].image, PathBuf::from("/pinned/first.jpg"));
    assert_eq!(built[0].link.as_deref(), Some("https://example.com/first"));
    assert_eq!(built[1].index, 1);
    assert_eq!(built[1].image, dir.path().join("z.jpg"));
    assert_eq!(built[1].link, None);
    // Placeholder bytes have no readable size.
    assert_eq!(built[1].dimensions, None);
}

#[test]
fn empty_library_yields_no_items_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Configuration {
        library_path: Some(dir.path().to_path_buf()),
        ..Configuration::default()
    };
    assert!(matches!(items::from_configuration(&cfg), Err(Error::NoItems)));
}

#[test]
fn missing_library_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone");
    assert!(matches!(items::scan_library(&missing), Err(Error::Io(_))));
}
