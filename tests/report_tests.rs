use loadorder_core::{LoadOrderSorter, Note, PluginEntry};

fn sorter() -> LoadOrderSorter {
    LoadOrderSorter::from_template_str(
        "\
Base.esm
PluginA.esp
B.esp
\"C.esp
* B and C edit the same cells.
C.esp
\"B.esp
",
    )
}

#[test]
fn test_master_not_loading() {
    let plugins = vec![PluginEntry::new("PluginA.esp").with_masters(["Base.esm"])];
    let text = sorter().generate_report(&plugins).to_string();

    assert!(text.contains("! This plugin depends on master 'Base.esm', which is not loading"));
    assert!(!text.contains("loading after it"));
}

#[test]
fn test_master_loading_after() {
    let plugins = vec![
        PluginEntry::new("PluginA.esp").with_masters(["Base.esm"]),
        PluginEntry::new("Base.esm"),
    ];
    let report = sorter().generate_report(&plugins);
    let text = report.to_string();

    assert!(text.contains(
        "! This plugin depends on master 'Base.esm', which is loading after it in the load order"
    ));
    assert!(!text.contains("which is not loading"));
    assert!(report.is_load_order_wrong());
}

#[test]
fn test_inactive_master_is_not_loading() {
    let plugins = vec![
        PluginEntry::new("Base.esm").inactive(),
        PluginEntry::new("PluginA.esp").with_masters(["Base.esm"]),
    ];
    let report = sorter().generate_report(&plugins);
    let notes: Vec<_> = report.notes().collect();

    assert!(notes.contains(&("PluginA.esp", &Note::MasterNotLoading("Base.esm".to_string()))));
    assert!(report.to_string().contains("Base.esm (Inactive)"));
}

#[test]
fn test_conflicts_reported_once_per_side() {
    let plugins = vec![PluginEntry::new("B.esp"), PluginEntry::new("C.esp")];
    let text = sorter().generate_report(&plugins).to_string();

    assert_eq!(text.matches("! This plugin conflicts with 'c.esp'").count(), 1);
    assert_eq!(text.matches("! This plugin conflicts with 'b.esp'").count(), 1);
    assert!(text.contains("  B and C edit the same cells."));
}

#[test]
fn test_inactive_conflict_is_ignored() {
    let plugins = vec![PluginEntry::new("B.esp"), PluginEntry::new("C.esp").inactive()];
    let text = sorter().generate_report(&plugins).to_string();
    assert!(!text.contains("conflicts with"));
}

#[test]
fn test_duplicate_warning() {
    let sorter = LoadOrderSorter::from_template_str("A.esm\nB.esp\na.esm\n");
    let text = sorter
        .generate_report(&[PluginEntry::new("A.esm")])
        .to_string();
    assert!(text.starts_with(
        "Mod load order report\n! Warning: current load order template contains 1 duplicate entries."
    ));
}

#[test]
fn test_unknown_plugin_note() {
    let plugins = vec![PluginEntry::new("Mystery.esp")];
    let text = sorter().generate_report(&plugins).to_string();
    assert!(text.contains("* The auto-sorter doesn't recognize this mod."));
}

#[test]
fn test_report_without_template() {
    let sorter = LoadOrderSorter::without_template();
    let report = sorter.generate_report(&[PluginEntry::new("A.esm"), PluginEntry::new("B.esp")]);
    assert!(!report.is_load_order_wrong());
    assert!(report
        .plugins
        .iter()
        .all(|plugin| plugin.notes == vec![Note::Unrecognized]));
}

#[test]
fn test_report_from_parallel_inputs() {
    let names = ["PluginA.esp", "Base.esm", "Broken.esp"];
    let active = [true, true, false];
    let corrupt = [false, false, true];
    let masters = [Some(vec!["Base.esm".to_string()]), None, None];

    let report = sorter()
        .generate_report_from_parts(&names, &active, &corrupt, &masters)
        .unwrap();
    let text = report.to_string();

    assert!(text.contains("which is loading after it in the load order"));
    assert!(text.contains("Broken.esp (Inactive)\n! This plugin is unreadable, and probably corrupt"));
    assert_eq!(
        report.suggested_order.as_deref(),
        Some(
            &[
                "Base.esm".to_string(),
                "PluginA.esp".to_string(),
                "Broken.esp".to_string()
            ][..]
        )
    );
}

#[test]
fn test_report_is_deterministic() {
    let plugins = vec![
        PluginEntry::new("C.esp"),
        PluginEntry::new("B.esp").with_masters(["Base.esm"]),
        PluginEntry::new("Other.esp").corrupt(),
    ];
    let sorter = sorter();
    assert_eq!(
        sorter.generate_report(&plugins).to_string(),
        sorter.generate_report(&plugins).to_string()
    );
}

#[test]
fn test_report_serializes_to_json() {
    let plugins = vec![PluginEntry::new("B.esp"), PluginEntry::new("Base.esm")];
    let report = sorter().generate_report(&plugins);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["plugins"][1]["notes"][0]["kind"], "OrderMismatch");
    assert_eq!(json["suggested_order"][0], "Base.esm");
}

#[test]
fn test_note_payload_serializes_under_value() {
    let plugins = vec![
        PluginEntry::new("B.esp").with_masters(["Missing.esm"]),
        PluginEntry::new("Mystery.esp"),
    ];
    let report = sorter().generate_report(&plugins);
    let json = serde_json::to_value(&report).unwrap();
    let notes = json["plugins"][0]["notes"].as_array().unwrap();

    let comment = notes.iter().find(|note| note["kind"] == "Comment").unwrap();
    assert_eq!(comment["value"], "B and C edit the same cells.");
    assert!(comment.get("name").is_none());

    let master = notes
        .iter()
        .find(|note| note["kind"] == "MasterNotLoading")
        .unwrap();
    assert_eq!(master["value"], "Missing.esm");

    let unknown = &json["plugins"][1]["notes"][0];
    assert_eq!(unknown["kind"], "Unrecognized");
    assert!(unknown.get("value").is_none());
}
