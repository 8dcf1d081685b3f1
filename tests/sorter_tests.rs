use loadorder_core::{LoadOrderSorter, ReloadOutcome, SorterConfig, SorterError};
use std::fs;

const TEMPLATE: &str = "\
1
A.esm
B.esp
:a.esm
C.esp
D.esp
";

fn sample_lists() -> Vec<Vec<&'static str>> {
    vec![
        vec!["A.esm", "B.esp", "C.esp", "D.esp"],
        vec!["D.esp", "C.esp", "B.esp", "A.esm"],
        vec!["A.esm", "X.esp", "B.esp", "C.esp"],
        vec!["X.esp", "A.esm", "B.esp"],
        vec!["B.esp", "X.esp", "A.esm", "Y.esp"],
        vec!["X.esp", "Y.esp"],
        vec!["A.esm", "C.esp", "X.esp", "B.esp"],
        vec!["X.esp", "C.esp", "Y.esp", "A.esm"],
        vec![],
    ]
}

#[test]
fn test_parse_lookup_is_case_insensitive() {
    let sorter = LoadOrderSorter::from_template_str("A.esm\nB.esp\n:A.esm\n");
    let masters = sorter.master_list().unwrap();

    let b = masters.get("B.ESP").unwrap();
    assert_eq!(b.ordinal, 1);
    assert_eq!(b.requires, vec!["a.esm"]);
    assert_eq!(masters.ordinal("a.esm"), Some(0));
}

#[test]
fn test_duplicate_entries_counted() {
    let sorter = LoadOrderSorter::from_template_str("A.esm\n* first\nB.esp\nA.esm\n* second\n");
    let masters = sorter.master_list().unwrap();

    assert_eq!(masters.duplicate_count(), 1);
    let a = masters.get("a.esm").unwrap();
    assert_eq!(a.ordinal, 2);
    assert_eq!(a.comments, vec!["second"]);
}

#[test]
fn test_sort_is_idempotent() {
    let sorter = LoadOrderSorter::from_template_str(TEMPLATE);
    for list in sample_lists() {
        let once = sorter.sort(&list);
        let twice = sorter.sort(&once);
        assert_eq!(once, twice, "sorting {:?} twice changed the order", list);
    }
}

#[test]
fn test_is_sorted_agrees_with_sort() {
    let sorter = LoadOrderSorter::from_template_str(TEMPLATE);
    for list in sample_lists() {
        let sorted = sorter.sort(&list);
        assert_eq!(
            sorter.is_sorted(&list),
            sorted == list,
            "is_sorted disagrees with sort for {:?}",
            list
        );
    }
}

#[test]
fn test_unknown_plugin_stays_between_neighbours() {
    let sorter = LoadOrderSorter::from_template_str("A.esm\nB.esp\nC.esp\n");
    let sorted = sorter.sort(&["A.esm", "X.esp", "B.esp", "C.esp"]);
    assert_eq!(sorted, vec!["A.esm", "X.esp", "B.esp", "C.esp"]);

    let sorted = sorter.sort(&["C.esp", "B.esp", "A.esm", "X.esp"]);
    assert_eq!(sorted, vec!["A.esm", "B.esp", "C.esp", "X.esp"]);
}

#[test]
fn test_unknown_run_keeps_relative_order() {
    let sorter = LoadOrderSorter::from_template_str("A.esm\nB.esp\n");
    let sorted = sorter.sort(&["B.esp", "A.esm", "Z.esp", "Y.esp", "X.esp"]);
    assert_eq!(sorted, vec!["A.esm", "B.esp", "Z.esp", "Y.esp", "X.esp"]);
}

#[test]
fn test_no_master_list_degrades() {
    let dir = tempfile::tempdir().unwrap();
    let sorter = LoadOrderSorter::open(dir.path().join("lotemplate.txt")).unwrap();

    assert!(!sorter.has_master_list());
    assert_eq!(sorter.file_version(), 0);
    for list in sample_lists() {
        assert!(!sorter.is_sorted(&list));
        assert_eq!(sorter.insertion_index(&list, "A.esm"), list.len());
        assert_eq!(sorter.sort(&list), list);
    }
}

#[test]
fn test_insertion_index_follows_template() {
    let sorter = LoadOrderSorter::from_template_str(TEMPLATE);
    let list = ["A.esm", "X.esp", "C.esp", "D.esp"];
    assert_eq!(sorter.insertion_index(&list, "B.esp"), 2);
    assert_eq!(sorter.insertion_index(&list, "d.ESP"), 3);
    assert_eq!(sorter.insertion_index(&list, "New.esp"), 4);
}

#[test]
fn test_load_and_reload_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lotemplate.txt");

    let mut sorter = LoadOrderSorter::open(&path).unwrap();
    assert!(!sorter.has_master_list());
    assert_eq!(sorter.template_path(), Some(path.as_path()));

    fs::write(&path, TEMPLATE).unwrap();
    assert_eq!(sorter.reload().unwrap(), ReloadOutcome::Updated);
    assert!(sorter.has_master_list());
    assert_eq!(sorter.file_version(), 1);
    assert_eq!(sorter.reload().unwrap(), ReloadOutcome::Unchanged);

    fs::write(&path, "2\nD.esp\nA.esm\n").unwrap();
    assert_eq!(sorter.reload().unwrap(), ReloadOutcome::Updated);
    assert_eq!(sorter.file_version(), 2);
    assert_eq!(sorter.sort(&["A.esm", "D.esp"]), vec!["D.esp", "A.esm"]);

    fs::remove_file(&path).unwrap();
    assert_eq!(sorter.reload().unwrap(), ReloadOutcome::Missing);
    assert!(!sorter.has_master_list());
}

#[test]
fn test_unreadable_template_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = LoadOrderSorter::open(dir.path()).unwrap_err();
    assert!(matches!(err, SorterError::ReadTemplate { .. }));
}

#[test]
fn test_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.txt");
    fs::write(&path, "5\nA.esm\n").unwrap();

    let config = SorterConfig::resolve(Some(path)).unwrap();
    let sorter = LoadOrderSorter::from_config(&config).unwrap();
    assert_eq!(sorter.file_version(), 5);
    assert!(sorter.master_list().unwrap().contains("A.ESM"));
}
