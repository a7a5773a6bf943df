//! Tests for data module

use approx::assert_abs_diff_eq;

use super::*;
use crate::config::CleaningConfig;

// ==================== Test Fixtures ====================

fn raw_table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|c| RawCell::from_text(c)).collect())
            .collect(),
    )
}

fn float_values(frame: &DataFrame, name: &str) -> Vec<f64> {
    frame.float_column(name).unwrap().to_vec()
}

// ==================== Series / DataFrame ====================

#[test]
fn test_series_creation() {
    let float_series = Series::float(vec![1.0, 2.0, 3.0]);
    assert_eq!(float_series.len(), 3);
    assert_eq!(float_series.dtype(), "float64");

    let text_series = Series::text(["a", "b"]);
    assert_eq!(text_series.len(), 2);
    assert_eq!(text_series.dtype(), "text");
    assert!(!text_series.is_numeric());
}

#[test]
fn test_series_statistics() {
    let series = Series::float(vec![1.0, 2.0, f64::NAN, 3.0, 4.0, 5.0]);

    let stats = series.describe();
    assert_eq!(stats.count, 5);
    assert_eq!(stats.mean, 3.0);
    assert_abs_diff_eq!(stats.std, 1.58113883, epsilon = 1e-6);
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.q25, 2.0);
    assert_eq!(stats.q50, 3.0);
    assert_eq!(stats.max, 5.0);
    assert_eq!(series.missing_count(), 1);
}

#[test]
fn test_quantile_interpolates() {
    let values = [4.0, 1.0, 3.0, 2.0];
    assert_abs_diff_eq!(quantile(&values, 0.25).unwrap(), 1.75, epsilon = 1e-12);
    assert_abs_diff_eq!(quantile(&values, 0.75).unwrap(), 3.25, epsilon = 1e-12);
    assert_eq!(quantile(&[], 0.5), None);
}

#[test]
fn test_text_to_float() {
    let series = Series::text_opt(vec![Some("1.5".into()), Some("abc".into()), None]);
    let values = series.to_float();
    assert_eq!(values[0], 1.5);
    assert!(values[1].is_nan());
    assert!(values[2].is_nan());
}

#[test]
fn test_dataframe_creation() {
    let df = DataFrame::from_columns(vec![
        ("x", Series::float(vec![1.0, 2.0, 3.0])),
        ("y", Series::text(["a", "b", "c"])),
    ])
    .unwrap();

    assert_eq!(df.shape(), (3, 2));
    assert_eq!(df.column_names(), vec!["x", "y"]);
    assert_eq!(df.index(), &[0, 1, 2]);
    assert_eq!(df.numeric_column_names(), vec!["x"]);
}

#[test]
fn test_dataframe_rejects_ragged_columns() {
    let result = DataFrame::from_columns(vec![
        ("x", Series::float(vec![1.0, 2.0, 3.0])),
        ("y", Series::float(vec![1.0, 2.0])),
    ]);
    assert!(matches!(result, Err(DataError::DimensionMismatch { .. })));

    let result = DataFrame::from_columns(vec![
        ("x", Series::float(vec![1.0])),
        ("x", Series::float(vec![2.0])),
    ]);
    assert!(matches!(result, Err(DataError::DuplicateColumn(_))));
}

#[test]
fn test_dataframe_select() {
    let df = DataFrame::from_columns(vec![
        ("a", Series::float(vec![1.0, 2.0, 3.0])),
        ("b", Series::float(vec![4.0, 5.0, 6.0])),
        ("c", Series::float(vec![7.0, 8.0, 9.0])),
    ])
    .unwrap();

    let selected = df.select(["a", "c"]).unwrap();
    assert_eq!(selected.shape(), (3, 2));
    assert_eq!(selected.column_names(), vec!["a", "c"]);

    assert!(matches!(
        df.select(["z"]),
        Err(DataError::ColumnNotFound(_))
    ));
}

#[test]
fn test_dataframe_filter_keeps_labels() {
    let df = DataFrame::from_columns(vec![
        ("x", Series::float(vec![1.0, 2.0, 3.0, 4.0, 5.0])),
        ("y", Series::text(["a", "b", "c", "d", "e"])),
    ])
    .unwrap();

    let filtered = df.filter(&[true, false, true, false, true]).unwrap();
    assert_eq!(filtered.nrows(), 3);
    assert_eq!(filtered.index(), &[0, 2, 4]);
    assert_eq!(float_values(&filtered, "x"), vec![1.0, 3.0, 5.0]);

    let again = filtered.filter(&[false, true, true]).unwrap();
    assert_eq!(again.index(), &[2, 4]);

    let by_label = df.filter_labels(&[4, 1]).unwrap();
    assert_eq!(by_label.index(), &[1, 4]);
    assert_eq!(by_label.value(0, "y").unwrap(), SeriesValue::Text("b".into()));

    assert!(df.filter(&[true]).is_err());
}

#[test]
fn test_builder_pattern() {
    let df = DataFrameBuilder::new()
        .with_column("x", Series::float(vec![1.0, 2.0]))
        .unwrap()
        .with_index(vec![10, 20])
        .build()
        .unwrap();
    assert_eq!(df.index(), &[10, 20]);

    let bad = DataFrameBuilder::new()
        .with_column("x", Series::float(vec![1.0, 2.0]))
        .unwrap()
        .with_index(vec![10])
        .build();
    assert!(bad.is_err());
}

// ==================== Cleaning ====================

#[test]
fn test_clean_keeps_good_header() {
    let raw = raw_table(&["DAP", "HT"], &[&["10", "12"], &["20", "18.5"]]);
    let frame = clean(&raw);

    assert_eq!(frame.column_names(), vec!["DAP", "HT"]);
    assert_eq!(float_values(&frame, "HT"), vec![12.0, 18.5]);
}

#[test]
fn test_clean_header_in_second_row() {
    let raw = raw_table(
        &["12,5", "30", "1.2"],
        &[&["DAP", "HT", "VOL"], &["14,0", "22", "0,8"], &["18,2", "25", "1,1"]],
    );
    let frame = clean(&raw);

    assert_eq!(frame.column_names(), vec!["DAP", "HT", "VOL"]);
    assert_eq!(frame.nrows(), 2);
    assert_eq!(float_values(&frame, "DAP"), vec![14.0, 18.2]);
    assert_eq!(float_values(&frame, "VOL"), vec![0.8, 1.1]);
}

#[test]
fn test_clean_auto_generated_header() {
    let raw = raw_table(
        &["Unnamed: 0", "", "unnamed: 2"],
        &[&["arvore", "dap", ""], &["1", "10", "5"]],
    );
    let frame = clean(&raw);

    assert_eq!(frame.column_names(), vec!["arvore", "dap", "Unnamed: 2"]);
    assert_eq!(frame.nrows(), 1);
}

#[test]
fn test_clean_header_without_letters() {
    let raw = raw_table(&["#", "--", "1"], &[&["id", "dap", "ht"], &["1", "2", "3"]]);
    let frame = clean(&raw);
    assert_eq!(frame.column_names(), vec!["id", "dap", "ht"]);
}

#[test]
fn test_clean_deduplicates_names() {
    let raw = raw_table(
        &["DAP", "DAP ", "HT", "DAP"],
        &[&["1", "2", "3", "4"]],
    );
    let frame = clean(&raw);
    assert_eq!(frame.column_names(), vec!["DAP", "DAP_2", "HT", "DAP_3"]);
}

#[test]
fn test_clean_decimal_comma() {
    let raw = raw_table(&["VOL"], &[&["1.234,56"], &["2.000,10"]]);
    let frame = clean(&raw);

    let values = float_values(&frame, "VOL");
    assert_abs_diff_eq!(values[0], 1234.56, epsilon = 1e-9);
    assert_abs_diff_eq!(values[1], 2000.10, epsilon = 1e-9);
}

#[test]
fn test_clean_numeric_ratio() {
    // 2 of 5 non-missing cells parse: exactly 40%, committed to numeric
    let raw = raw_table(
        &["a", "b"],
        &[
            &["1", "x"],
            &["2", "y"],
            &["vinte", "1"],
            &["?", "z"],
            &["erro", "w"],
            &["", "v"],
        ],
    );
    let frame = clean(&raw);

    let a = frame.get_column("a").unwrap();
    assert!(a.is_numeric());
    assert_eq!(a.missing_count(), 4);

    // 1 of 6 parses: stays text, untouched
    let b = frame.get_column("b").unwrap();
    assert!(!b.is_numeric());
    assert_eq!(b.get(0), Some(SeriesValue::Text("x".into())));
}

#[test]
fn test_clean_ratio_is_configurable() {
    let raw = raw_table(&["a"], &[&["1"], &["x"], &["y"]]);

    let strict = clean_with(&raw, &CleaningConfig { numeric_ratio: 0.5 });
    assert!(!strict.get_column("a").unwrap().is_numeric());

    let loose = clean_with(&raw, &CleaningConfig { numeric_ratio: 0.3 });
    assert!(loose.get_column("a").unwrap().is_numeric());
}

#[test]
fn test_clean_nulls_datetime_columns() {
    let raw = RawTable::new(
        vec!["data".into(), "dap".into()],
        vec![
            vec![RawCell::DateTime("2026-05-15".into()), RawCell::Number(10.0)],
            vec![RawCell::DateTime("2026-05-16".into()), RawCell::Number(f64::INFINITY)],
        ],
    );
    let frame = clean(&raw);

    let dates = frame.get_column("data").unwrap();
    assert!(dates.is_numeric());
    assert!(dates.is_all_missing());

    let dap = float_values(&frame, "dap");
    assert_eq!(dap[0], 10.0);
    assert!(dap[1].is_nan());
}

#[test]
fn test_clean_drops_empty_rows_and_columns() {
    let raw = raw_table(
        &["dap", "obs", "ht"],
        &[
            &[" 10 ", "", "5"],
            &["", "  ", ""],
            &["12", "", "6"],
        ],
    );
    let frame = clean(&raw);

    assert_eq!(frame.column_names(), vec!["dap", "ht"]);
    assert_eq!(frame.nrows(), 2);
    assert_eq!(float_values(&frame, "dap"), vec![10.0, 12.0]);
}

#[test]
fn test_clean_empty_table() {
    let frame = clean(&RawTable::default());
    assert_eq!(frame.shape(), (0, 0));
}

#[test]
fn test_clean_short_rows_are_missing() {
    let raw = raw_table(&["dap", "ht"], &[&["10", "5"], &["12"]]);
    let frame = clean(&raw);
    let ht = float_values(&frame, "ht");
    assert_eq!(ht[0], 5.0);
    assert!(ht[1].is_nan());
}

// ==================== CSV ====================

#[test]
fn test_read_csv() {
    let text = "DAP;HT;Obs\n10,5;12;ok\n11,0;;\n";
    let raw = io::read_csv(
        text.as_bytes(),
        io::CsvOptions {
            delimiter: b';',
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(raw.headers, vec!["DAP", "HT", "Obs"]);
    assert_eq!(raw.nrows(), 2);
    assert_eq!(raw.cell(1, 1), &RawCell::Missing);

    let frame = clean(&raw);
    assert_eq!(float_values(&frame, "DAP"), vec![10.5, 11.0]);
}

#[test]
fn test_read_csv_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arvores.csv");
    std::fs::write(&path, "dap,ht\n10,5\n12,6\n").unwrap();

    let raw = io::read_csv_path(&path, io::CsvOptions::default()).unwrap();
    assert_eq!(raw.ncols(), 2);
    assert_eq!(raw.nrows(), 2);

    assert!(io::read_csv_path(dir.path().join("missing.csv"), io::CsvOptions::default()).is_err());
}

// ==================== Audit ====================

#[test]
fn test_audit_reports_problems() {
    let mut dap: Vec<f64> = (1..=12).map(|v| 10.0 + v as f64).collect();
    dap.push(500.0);
    let mut ht = vec![10.0; 13];
    ht[0] = 0.0;
    ht[1] = -2.0;
    ht[2] = f64::NAN;

    let frame = DataFrame::from_columns(vec![
        ("dap", Series::float(dap)),
        ("ht", Series::float(ht)),
        ("obs", Series::text(vec!["x"; 13])),
    ])
    .unwrap();

    let report = audit(&frame);
    assert!(!report.is_clean());
    assert_eq!(
        report.critical,
        vec![
            Finding::MissingValues { column: "ht".into(), count: 1 },
            Finding::NonPositive { column: "ht".into(), count: 2 },
        ]
    );
    assert_eq!(
        report.warning,
        vec![Finding::SuspectMaximum { column: "dap".into(), value: 500.0 }]
    );
}

#[test]
fn test_audit_clean_dataset() {
    let frame = DataFrame::from_columns(vec![(
        "dap",
        Series::float(vec![10.0, 12.0, 14.0]),
    )])
    .unwrap();
    assert!(audit(&frame).is_clean());
}
