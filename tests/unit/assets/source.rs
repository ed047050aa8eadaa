use super::*;

#[test]
fn normalize_rel_path_strips_dots_and_separators() {
    assert_eq!(normalize_rel_path("./a//b\\c.png").unwrap(), "a/b/c.png");
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("a/../b.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./.").is_err());
}

#[test]
fn memory_source_returns_its_bytes() {
    let src = ImageSource::memory("inline", vec![1u8, 2, 3]);
    assert_eq!(src.label(), "inline");
    let bytes = src.read_bytes(Path::new("/nonexistent")).unwrap();
    assert_eq!(&*bytes, &[1, 2, 3]);
}

#[test]
fn missing_file_reports_path() {
    let src = ImageSource::from("no/such/file.png");
    let err = src
        .read_bytes(&std::env::temp_dir().join("lumen2d-missing-root"))
        .unwrap_err();
    assert!(err.to_string().contains("no/such/file.png"));
}
