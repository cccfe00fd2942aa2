use tabcompare::config::ComparisonOptions;
use tabcompare::diff::{compare, RowDiffKind};
use tabcompare::model::TabularDataset;

fn dataset(records: &[&str]) -> TabularDataset {
    TabularDataset::from_records(records.iter().map(|line| line.split(',').collect::<Vec<_>>()))
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn identical_datasets_produce_empty_result() {
    let old = dataset(&["id,name,value", "1,John,100"]);
    let new = dataset(&["id,name,value", "1,John,100"]);

    let result = compare(&old, &new, &keys(&["id"]), &ComparisonOptions::default()).unwrap();

    assert!(!result.has_changes());
    assert!(result.added_columns.is_empty());
    assert!(result.removed_columns.is_empty());
    assert!(result.added_rows.is_empty());
    assert!(result.removed_rows.is_empty());
    assert!(result.modified_rows.is_empty());
    assert_eq!(result.stats.rows_unchanged, 1);
}

#[test]
fn changed_value_is_reported_as_modified() {
    let old = dataset(&["id,name,value", "1,John,100"]);
    let new = dataset(&["id,name,value", "1,John,150"]);

    let result = compare(&old, &new, &keys(&["id"]), &ComparisonOptions::default()).unwrap();

    assert_eq!(result.modified_rows.len(), 1);
    let diff = &result.modified_rows[0];
    assert_eq!(diff.kind, RowDiffKind::Modified);
    assert_eq!(diff.modified_columns.iter().collect::<Vec<_>>(), vec!["value"]);
    assert_eq!(diff.old_values["value"], "100");
    assert_eq!(diff.new_values["value"], "150");
    assert_eq!(diff.key_values, keys(&["1"]));
}

#[test]
fn unmatched_keys_are_added_and_removed() {
    let old = dataset(&["id,name,value", "1,John,100"]);
    let new = dataset(&["id,name,value", "3,Bob,300"]);
    let opts = ComparisonOptions::default().with_ignore_duplicates(true);

    let result = compare(&old, &new, &keys(&["id"]), &opts).unwrap();

    assert_eq!(result.removed_rows.len(), 1);
    assert_eq!(result.removed_rows[0].kind, RowDiffKind::Removed);
    assert_eq!(result.removed_rows[0].key_values, keys(&["1"]));
    assert!(result.removed_rows[0].new_values.is_empty());

    assert_eq!(result.added_rows.len(), 1);
    assert_eq!(result.added_rows[0].kind, RowDiffKind::Added);
    assert_eq!(result.added_rows[0].key_values, keys(&["3"]));
    assert!(result.added_rows[0].old_values.is_empty());

    assert!(result.modified_rows.is_empty());
}

#[test]
fn unmatched_key_trips_duplicate_count_check_when_enabled() {
    let old = dataset(&["id,name,value", "1,John,100"]);
    let new = dataset(&["id,name,value", "3,Bob,300"]);

    let result = compare(&old, &new, &keys(&["id"]), &ComparisonOptions::default()).unwrap();

    // Key "1" occurs once in old and zero times in new
    assert!(result.added_rows.is_empty());
    assert!(result.removed_rows.is_empty());
    assert_eq!(result.modified_rows.len(), 1);
    assert!(result.modified_rows[0].is_count_mismatch());
    assert_eq!(result.modified_rows[0].key_values, keys(&["1"]));
}

#[test]
fn normalization_hides_case_and_whitespace_changes() {
    let old = dataset(&["id,name,value", "1,John  ,100"]);
    let new = dataset(&["id,name,value", "1,  john,100"]);
    let opts = ComparisonOptions::default()
        .with_ignore_case(true)
        .with_ignore_whitespace(true);

    let result = compare(&old, &new, &keys(&["id"]), &opts).unwrap();
    assert!(result.modified_rows.is_empty());

    let strict = compare(&old, &new, &keys(&["id"]), &ComparisonOptions::default()).unwrap();
    assert_eq!(strict.modified_rows.len(), 1);
    assert!(strict.modified_rows[0].modified_columns.contains("name"));
}

#[test]
fn normalization_applies_to_keys() {
    let old = dataset(&["code,value", " AB ,1"]);
    let new = dataset(&["code,value", "ab,1"]);
    let opts = ComparisonOptions::default()
        .with_ignore_case(true)
        .with_ignore_whitespace(true);

    let result = compare(&old, &new, &keys(&["code"]), &opts).unwrap();
    assert!(!result.has_changes());
}

#[test]
fn strict_order_reports_trailing_row_as_added() {
    let old = dataset(&["id,name,value", "1,John,100", "2,Jane,200"]);
    let new = dataset(&["id,name,value", "1,John,100", "2,Jane,200", "3,Bob,300"]);
    let opts = ComparisonOptions::default().with_strict_row_order(true);

    let result = compare(&old, &new, &keys(&["id"]), &opts).unwrap();

    assert_eq!(result.added_rows.len(), 1);
    assert_eq!(result.added_rows[0].key_values, keys(&["3"]));
    assert!(result.modified_rows.is_empty());
    assert!(result.removed_rows.is_empty());
}

#[test]
fn strict_order_compares_by_position_not_key() {
    let old = dataset(&["id,value", "1,a", "2,b"]);
    let new = dataset(&["id,value", "2,b", "1,a"]);
    let opts = ComparisonOptions::default()
        .with_strict_row_order(true)
        .with_ignore_duplicates(true);

    let result = compare(&old, &new, &keys(&["id"]), &opts).unwrap();
    assert_eq!(result.modified_rows.len(), 2);

    let keyed = compare(&old, &new, &keys(&["id"]), &ComparisonOptions::default()).unwrap();
    assert!(!keyed.has_changes());
}

#[test]
fn duplicate_keys_last_row_wins() {
    let old = dataset(&["id,value", "1,first", "1,second"]);
    let new = dataset(&["id,value", "1,second"]);
    let opts = ComparisonOptions::default().with_ignore_duplicates(true);

    let result = compare(&old, &new, &keys(&["id"]), &opts).unwrap();

    // "1,first" is superseded and never reported
    assert!(!result.has_changes());
    assert_eq!(result.stats.rows_superseded, 1);
}

#[test]
fn empty_key_list_matches_on_whole_row() {
    let old = dataset(&["id,value", "1,a", "2,b"]);
    let new = dataset(&["id,value", "2,b", "1,changed"]);
    let opts = ComparisonOptions::default().with_ignore_duplicates(true);

    let result = compare(&old, &new, &[], &opts).unwrap();

    assert_eq!(result.removed_rows.len(), 1);
    assert_eq!(result.removed_rows[0].key_values, keys(&["1", "a"]));
    assert_eq!(result.added_rows.len(), 1);
    assert_eq!(result.added_rows[0].key_values, keys(&["1", "changed"]));
    assert!(result.modified_rows.is_empty());
}

#[test]
fn one_sided_columns_reported_only_at_dataset_level() {
    let old = dataset(&["id,name,age", "1,John,30"]);
    let new = dataset(&["id,name,email", "1,John,j@x.io"]);

    let result = compare(&old, &new, &keys(&["id"]), &ComparisonOptions::default()).unwrap();

    assert!(result.added_columns.contains("email"));
    assert!(result.removed_columns.contains("age"));
    assert!(result.modified_rows.is_empty());
    assert_eq!(result.headers, keys(&["id", "name", "email"]));
}
