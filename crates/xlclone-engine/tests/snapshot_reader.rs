//! Snapshot reader tests over the scripted host.

mod common;

use common::{FakeDoc, FakeHost, FakeSheet};
use pretty_assertions::assert_eq;
use xlclone_core::{CellRange, CellValue, UsedRegion};
use xlclone_engine::{snapshot_values, snapshot_with_styles};

#[test]
fn test_a_merge_is_recorded_once_not_per_cell() {
    // A1:B2 merged: all four constituent cells report the same area.
    let mut sheet = FakeSheet::grid(
        "Plan",
        1,
        1,
        vec![
            vec![CellValue::from("Q3"), CellValue::Blank],
            vec![CellValue::Blank, CellValue::Blank],
        ],
    );
    for row in 1..=2 {
        for col in 1..=2 {
            sheet.merges.insert((row, col), "$A$1:$B$2".to_string());
        }
    }

    let host = FakeHost::single(FakeDoc::named("plan.xlsx").sheet(sheet));
    let snapshot = snapshot_with_styles(&host, host.first_id()).unwrap();

    assert_eq!(
        snapshot.sheets[0].merges,
        vec![CellRange::parse("A1:B2").unwrap()]
    );
}

#[test]
fn test_distinct_merges_keep_first_seen_order() {
    let mut sheet = FakeSheet::grid(
        "Plan",
        1,
        1,
        vec![
            vec![CellValue::from("head"), CellValue::Blank],
            vec![CellValue::from("body"), CellValue::Blank],
        ],
    );
    sheet.merges.insert((1, 1), "$A$1:$B$1".to_string());
    sheet.merges.insert((1, 2), "$A$1:$B$1".to_string());
    sheet.merges.insert((2, 1), "$A$2:$B$2".to_string());
    sheet.merges.insert((2, 2), "$A$2:$B$2".to_string());

    let host = FakeHost::single(FakeDoc::named("plan.xlsx").sheet(sheet));
    let snapshot = snapshot_with_styles(&host, host.first_id()).unwrap();

    // Row-major scan order, deduplicated.
    assert_eq!(
        snapshot.sheets[0].merges,
        vec![
            CellRange::parse("A1:B1").unwrap(),
            CellRange::parse("A2:B2").unwrap(),
        ]
    );
}

#[test]
fn test_a_lone_blank_cell_is_an_empty_sheet() {
    // Hosts report a 1x1 used range holding a blank for sheets with no
    // content; a lone populated cell is the smallest real region.
    let host = FakeHost::single(
        FakeDoc::named("book.xlsx")
            .sheet(FakeSheet::grid("Empty", 1, 1, vec![vec![CellValue::Blank]]))
            .sheet(FakeSheet::grid("One", 3, 2, vec![vec![CellValue::from(7)]])),
    );

    let snapshot = snapshot_values(&host, host.first_id()).unwrap();

    let empty = &snapshot.sheets[0];
    assert!(empty.is_empty());
    assert!(empty.values.is_empty());

    let one = &snapshot.sheets[1];
    assert_eq!(one.region, Some(UsedRegion::new(3, 2, 1, 1)));
    assert_eq!(one.values, vec![vec![CellValue::from(7)]]);
}

#[test]
fn test_only_explicit_dimensions_are_recorded() {
    let mut sheet = FakeSheet::grid(
        "Data",
        1,
        1,
        vec![vec![CellValue::from(1), CellValue::from(2)]],
    );
    sheet.column_widths.insert(2, 18.5);
    sheet.row_heights.insert(1, 24.0);

    let host = FakeHost::single(FakeDoc::named("data.xlsx").sheet(sheet));
    let snapshot = snapshot_with_styles(&host, host.first_id()).unwrap();

    // Column 1 reported nothing explicit and stays at the format default.
    let data = &snapshot.sheets[0];
    assert_eq!(data.column_widths, vec![(2, 18.5)]);
    assert_eq!(data.row_heights, vec![(1, 24.0)]);
}
