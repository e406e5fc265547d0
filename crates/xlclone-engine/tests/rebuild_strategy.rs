//! End-to-end tests for the full-reconstruction strategy.

mod common;

use common::{name_age_grid, FakeDoc, FakeHost, FakeSheet};
use xlclone_core::{CellValue, RawFont, RawInterior};
use xlclone_engine::strategy::rebuild;
use xlclone_engine::StrategyOutcome;

fn part_text(parts: &[(String, Vec<u8>)], name: &str) -> String {
    let bytes = &parts
        .iter()
        .find(|(part_name, _)| part_name == name)
        .unwrap_or_else(|| panic!("part {name} missing"))
        .1;
    String::from_utf8_lossy(bytes).into_owned()
}

/// Host red: packed 0xBBGGRR, so 0x0000FF.
const HOST_RED: i64 = 0x0000FF;
/// Host green is symmetric under channel swapping.
const HOST_GREEN: i64 = 0x00FF00;

#[test]
fn test_one_unreadable_facet_leaves_the_rest_applied() {
    let mut sheet = FakeSheet::grid(
        "Styled",
        1,
        1,
        vec![vec![CellValue::from("Head"), CellValue::from("Tail")]],
    );
    // A1's font read throws; its fill must still apply, as must every
    // facet of the cell after it.
    sheet.fail_fonts.insert((1, 1));
    sheet.interiors.insert(
        (1, 1),
        RawInterior {
            pattern: Some(1),
            color: Some(HOST_RED),
        },
    );
    sheet.interiors.insert(
        (1, 2),
        RawInterior {
            pattern: Some(1),
            color: Some(HOST_GREEN),
        },
    );
    sheet.fonts.insert(
        (1, 2),
        RawFont {
            bold: Some(true),
            ..Default::default()
        },
    );

    let host = FakeHost::single(FakeDoc::named("styled.xlsx").sheet(sheet));
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xlsx");

    let outcome = rebuild::run(&host, host.first_id(), &output).unwrap();
    assert!(matches!(outcome, StrategyOutcome::Succeeded));

    let parts = xlclone_container::unpack(&output).unwrap();
    let styles = part_text(&parts, "xl/styles.xml");
    // Output colors are ARGB 0xRRGGBB with an opaque alpha.
    assert!(styles.contains("FFFF0000"), "red fill missing: {styles}");
    assert!(styles.contains("FF00FF00"), "green fill missing: {styles}");
    assert!(styles.contains("<b/>"), "bold missing: {styles}");

    let strings = part_text(&parts, "xl/sharedStrings.xml");
    assert!(strings.contains("Head"));
    assert!(strings.contains("Tail"));
}

#[test]
fn test_merges_dimensions_and_sheet_order_survive() {
    let mut data = FakeSheet::grid(
        "Data",
        1,
        1,
        vec![
            vec![CellValue::from("Title"), CellValue::Blank],
            vec![CellValue::from("a"), CellValue::from("b")],
        ],
    );
    // One merge spanning A1:B1, reported from both covered cells.
    data.merges.insert((1, 1), "$A$1:$B$1".to_string());
    data.merges.insert((1, 2), "$A$1:$B$1".to_string());
    data.column_widths.insert(1, 22.0);
    data.row_heights.insert(1, 30.0);

    let host = FakeHost::single(
        FakeDoc::named("book.xlsx")
            .sheet(FakeSheet::empty("Cover"))
            .sheet(data),
    );
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xlsx");

    let outcome = rebuild::run(&host, host.first_id(), &output).unwrap();
    assert!(matches!(outcome, StrategyOutcome::Succeeded));

    let parts = xlclone_container::unpack(&output).unwrap();

    // Sheet names verbatim, workbook order preserved, empty tab kept.
    let workbook = part_text(&parts, "xl/workbook.xml");
    let cover = workbook.find("name=\"Cover\"").expect("Cover tab missing");
    let data_tab = workbook.find("name=\"Data\"").expect("Data tab missing");
    assert!(cover < data_tab);

    let sheet2 = part_text(&parts, "xl/worksheets/sheet2.xml");
    // Exactly one merge; deduplicated across its covered cells.
    assert!(sheet2.contains("<mergeCell ref=\"A1:B1\"/>"), "{sheet2}");
    assert!(sheet2.contains("count=\"1\""), "{sheet2}");
    // Top-left content written after the merge survives.
    let strings = part_text(&parts, "xl/sharedStrings.xml");
    assert!(strings.contains("Title"));
    // Explicit dimensions applied.
    assert!(sheet2.contains("customWidth=\"1\""), "{sheet2}");
    assert!(sheet2.contains("customHeight=\"1\""), "{sheet2}");
}

#[test]
fn test_values_keep_their_original_origin() {
    // Region anchored at B2, not A1.
    let host = FakeHost::single(
        FakeDoc::named("people.xlsx").sheet(FakeSheet::grid("People", 2, 2, name_age_grid())),
    );
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xlsx");

    let outcome = rebuild::run(&host, host.first_id(), &output).unwrap();
    assert!(matches!(outcome, StrategyOutcome::Succeeded));

    let parts = xlclone_container::unpack(&output).unwrap();
    let sheet1 = part_text(&parts, "xl/worksheets/sheet1.xml");
    assert!(sheet1.contains("r=\"B2\""), "{sheet1}");
    assert!(sheet1.contains("r=\"C3\""), "{sheet1}");
    assert!(sheet1.contains("<v>30</v>"), "{sheet1}");
    assert!(!sheet1.contains("r=\"A1\""), "{sheet1}");

    let strings = part_text(&parts, "xl/sharedStrings.xml");
    assert!(strings.contains("Ana"));
    assert!(strings.contains("Leo"));
}

#[test]
fn test_unreadable_workbook_is_an_expected_failure() {
    let host = FakeHost::single(FakeDoc::named("broken.xlsx").unreadable());
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xlsx");

    let outcome = rebuild::run(&host, host.first_id(), &output).unwrap();
    match outcome {
        StrategyOutcome::Failed(reason) => {
            assert!(reason.contains("styled snapshot"), "{reason}");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(!output.exists());
}
