use bikeshare_dashboard::data::{export_csv, SourceKind};
use bikeshare_dashboard::stats::VolumeBand;
use bikeshare_dashboard::{
    DashboardApp, DataLoader, DateRange, DerivedView, InvalidInputError, ReportFormat,
    StartupLoadError, ViewKind, ViewReport,
};
use chrono::{Datelike, Days, NaiveDate};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = "instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Day-level rental CSV covering `days` days from 2011-01-01.
fn rental_csv(days: u64) -> String {
    let start = date(2011, 1, 1);
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for i in 0..days {
        let day = start + Days::new(i);
        let season = (day.month() - 1) / 3 + 1;
        let weathersit = i % 3 + 1;
        let casual = 100 + i * 3;
        let registered = 900 + (i * 11) % 200;
        csv.push_str(&format!(
            "{},{},{},0,{},0,{},1,{},0.3,0.3,0.5,0.2,{},{},{}\n",
            i + 1,
            day.format("%Y-%m-%d"),
            season,
            day.month(),
            i % 7,
            weathersit,
            casual,
            registered,
            casual + registered
        ));
    }
    csv
}

fn write_dataset(dir: &Path, days: u64) {
    let csv = rental_csv(days);
    for kind in SourceKind::ALL {
        fs::write(dir.join(kind.file_name()), &csv).unwrap();
    }
}

#[test]
fn test_load_dataset_reads_all_tables() {
    let temp_dir = TempDir::new().unwrap();
    write_dataset(temp_dir.path(), 90);

    let dataset = DataLoader::new(temp_dir.path()).load_dataset().unwrap();
    for kind in SourceKind::ALL {
        let table = dataset.table(kind);
        assert_eq!(table.len(), 90, "rows in {}", kind.file_name());
        assert_eq!(
            table.date_bounds(),
            Some((date(2011, 1, 1), date(2011, 3, 31)))
        );
    }

    let first = &dataset.table(SourceKind::Day).records()[0];
    assert_eq!(first.count, first.casual_count + first.registered_count);
}

#[test]
fn test_missing_file_is_a_startup_error() {
    let temp_dir = TempDir::new().unwrap();
    write_dataset(temp_dir.path(), 10);
    fs::remove_file(temp_dir.path().join("season.csv")).unwrap();

    let err = DataLoader::new(temp_dir.path()).load_dataset().unwrap_err();
    match err {
        StartupLoadError::MissingFile(path) => assert!(path.ends_with("season.csv")),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_column_is_a_startup_error() {
    let temp_dir = TempDir::new().unwrap();
    write_dataset(temp_dir.path(), 10);
    fs::write(
        temp_dir.path().join("day.csv"),
        "dteday,cnt\n2011-01-01,10\n2011-01-02,12\n",
    )
    .unwrap();

    let err = DataLoader::new(temp_dir.path()).load_dataset().unwrap_err();
    assert!(matches!(err, StartupLoadError::MissingColumn { .. }));
}

#[test]
fn test_unparseable_date_is_a_startup_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("day.csv");
    fs::write(
        &path,
        "dteday,season,weathersit,casual,registered,cnt\nnot-a-date,1,1,1,2,3\n",
    )
    .unwrap();

    let err = DataLoader::load_records(&path).unwrap_err();
    assert!(matches!(
        err,
        StartupLoadError::InvalidValue { ref column, row: 0, .. } if column == "dteday"
    ));
}

#[test]
fn test_views_compute_from_their_tables() {
    let temp_dir = TempDir::new().unwrap();
    write_dataset(temp_dir.path(), 181);
    let dataset = DataLoader::new(temp_dir.path()).load_dataset().unwrap();
    let range = DateRange::new(date(2011, 1, 1), date(2011, 6, 30)).unwrap();

    for view in ViewKind::ALL {
        let derived = view.compute(&dataset, &range).unwrap();
        assert_eq!(derived.kind(), view);
        assert!(derived.row_count() > 0);
    }

    match ViewKind::Quarter.compute(&dataset, &range).unwrap() {
        DerivedView::Quarter(rows) => assert_eq!(rows.len(), 2),
        other => panic!("unexpected view: {:?}", other.kind()),
    }
}

#[test]
fn test_report_defaults_to_table_bounds() {
    let temp_dir = TempDir::new().unwrap();
    write_dataset(temp_dir.path(), 90);
    let dataset = DataLoader::new(temp_dir.path()).load_dataset().unwrap();

    let report = ViewReport::build(&dataset, ViewKind::Monthly, None, None).unwrap();
    assert_eq!(report.range.start(), date(2011, 1, 1));
    assert_eq!(report.range.end(), date(2011, 3, 31));
    assert_eq!(report.stats.count, 3);

    let metrics = report.metrics.unwrap();
    assert_eq!(
        metrics.total_transaction,
        metrics.total_casual + metrics.total_registered
    );

    let text = report.render(ReportFormat::Table).unwrap();
    assert!(text.starts_with("Monthly Orders"));
    assert!(text.contains("2011-02"));

    let json: serde_json::Value =
        serde_json::from_str(&report.render(ReportFormat::Json).unwrap()).unwrap();
    assert_eq!(json["result"]["view"], "monthly");
    assert_eq!(json["result"]["rows"].as_array().unwrap().len(), 3);
    assert_eq!(json["result"]["rows"][0]["month"], "2011-01");
}

#[test]
fn test_report_outside_table_is_invalid_input() {
    let temp_dir = TempDir::new().unwrap();
    write_dataset(temp_dir.path(), 30);
    let dataset = DataLoader::new(temp_dir.path()).load_dataset().unwrap();

    let err = ViewReport::build(
        &dataset,
        ViewKind::Cluster,
        Some(date(2015, 1, 1)),
        Some(date(2015, 2, 1)),
    )
    .unwrap_err();
    assert!(matches!(err, InvalidInputError::EmptyRange { .. }));
}

#[test]
fn test_cluster_report_lists_bands() {
    let temp_dir = TempDir::new().unwrap();
    write_dataset(temp_dir.path(), 365);
    let dataset = DataLoader::new(temp_dir.path()).load_dataset().unwrap();

    let report = ViewReport::build(&dataset, ViewKind::Cluster, None, None).unwrap();
    let DerivedView::Cluster(result) = &report.result else {
        panic!("expected cluster view");
    };
    assert_eq!(result.months.len(), 12);
    assert!(!result.thresholds.degenerate);
    assert!(result.band(VolumeBand::Low).count() > 0);

    let text = report.to_table_string();
    assert!(text.contains("Bands: Low <="));
    assert!(text.contains("category"));
}

#[test]
fn test_export_csv_writes_header_and_rows() {
    let temp_dir = TempDir::new().unwrap();
    write_dataset(temp_dir.path(), 90);
    let dataset = DataLoader::new(temp_dir.path()).load_dataset().unwrap();
    let range = DateRange::new(date(2011, 1, 1), date(2011, 3, 31)).unwrap();
    let derived = ViewKind::Monthly.compute(&dataset, &range).unwrap();

    let output = temp_dir.path().join("out").join("monthly_orders.csv");
    export_csv(&derived, &output).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "dteday,cnt");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("2011-01,"));
}

#[test]
fn test_app_recomputes_on_range_change() {
    let temp_dir = TempDir::new().unwrap();
    write_dataset(temp_dir.path(), 365);
    let dataset = DataLoader::new(temp_dir.path()).load_dataset().unwrap();

    let mut app = DashboardApp::with_dataset(dataset);
    let months_before = app.chart_viewer().view.as_ref().unwrap().row_count();
    assert_eq!(months_before, 12);
    assert!(app.chart_viewer().metrics.is_some());

    let panel = app.control_panel_mut();
    panel.settings.end_idx = 58; // 2011-02-28
    app.recompute();

    let viewer = app.chart_viewer();
    assert_eq!(viewer.view.as_ref().unwrap().row_count(), 2);
    assert_eq!(viewer.charts.len(), 1);
    assert!(viewer.no_data.is_none());
}

#[test]
fn test_app_switches_view_and_resets_range() {
    let temp_dir = TempDir::new().unwrap();
    write_dataset(temp_dir.path(), 120);
    let dataset = DataLoader::new(temp_dir.path()).load_dataset().unwrap();

    let mut app = DashboardApp::with_dataset(dataset);
    app.control_panel_mut().settings.start_idx = 100;
    app.control_panel_mut().settings.view = ViewKind::Cluster;
    app.handle_view_changed();

    assert_eq!(app.control_panel_mut().settings.start_idx, 0);
    let viewer = app.chart_viewer();
    assert_eq!(viewer.view.as_ref().unwrap().kind(), ViewKind::Cluster);
    assert_eq!(viewer.charts.len(), 3);
}
