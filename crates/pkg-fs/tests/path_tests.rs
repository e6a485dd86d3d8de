use pkg_fs::NormalizedPath;
use rstest::rstest;
use tempfile::tempdir;

#[rstest]
#[case("foo/bar/baz", "foo/bar/baz")]
#[case("foo\\bar\\baz", "foo/bar/baz")]
#[case("foo/bar\\baz", "foo/bar/baz")]
fn test_normalize_separators(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(input).as_str(), expected);
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("foo/bar");
    assert_eq!(base.join("baz").as_str(), "foo/bar/baz");
}

#[test]
fn test_join_on_dir_form_adds_no_extra_separator() {
    let base = NormalizedPath::dir("themes/foolz/fake");
    assert_eq!(base.join("composer.json").as_str(), "themes/foolz/fake/composer.json");
}

#[test]
fn test_file_name() {
    let path = NormalizedPath::new("foo/bar/baz.txt");
    assert_eq!(path.file_name(), Some("baz.txt"));
    assert_eq!(path.extension(), Some("txt"));
}

#[test]
fn test_existing_dir_is_absolute_and_dir_form() {
    let temp = tempdir().unwrap();
    let path = NormalizedPath::existing_dir(temp.path()).unwrap();

    assert!(path.is_dir_form());
    assert!(path.to_native().is_absolute());
    assert!(path.is_dir());
}

#[test]
fn test_existing_dir_rejects_missing_path() {
    let temp = tempdir().unwrap();
    let result = NormalizedPath::existing_dir(temp.path().join("moewufck"));
    assert!(matches!(result, Err(pkg_fs::Error::NotADirectory { .. })));
}

#[test]
fn test_existing_dir_rejects_file() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("composer.json");
    std::fs::write(&file, "{}").unwrap();

    assert!(NormalizedPath::existing_dir(&file).is_err());
}

#[test]
fn test_exists_false_for_nonexistent() {
    let path = NormalizedPath::new("/nonexistent/path/that/does/not/exist");
    assert!(!path.exists());
}
