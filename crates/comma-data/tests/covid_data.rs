use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;

use chrono::NaiveDate;
use comma_core::errors::{CommaError, ErrorInfo};
use comma_core::RemoteConfig;
use comma_data::{
    decode_test_file, download_url, get_covid_data, write_records, RemoteSource, TimeWindow,
};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::json;

const BASE: &str = "https://example.org/data-rivm/tests/";
const HEADER: &str = "Version,Date_of_report,Date_of_statistics,Security_region_code,Security_region_name,Tested_with_result,Tested_positive";

#[derive(Default)]
struct MapSource {
    bodies: HashMap<String, Vec<u8>>,
    requested: RefCell<Vec<String>>,
}

impl RemoteSource for MapSource {
    fn get(&self, url: &str) -> Result<Vec<u8>, CommaError> {
        self.requested.borrow_mut().push(url.to_string());
        self.bodies.get(url).cloned().ok_or_else(|| {
            CommaError::Fetch(ErrorInfo::new("test.http_status", format!("GET {url} returned 404")))
        })
    }
}

fn gzip(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).expect("compress");
    encoder.finish().expect("finish gzip")
}

fn daily_file(day: &str, rows: &[(&str, &str, &str, i64, i64)]) -> Vec<u8> {
    let mut text = format!("{HEADER}\n");
    for (stat_day, code, region, tested, positive) in rows {
        text.push_str(&format!(
            "2,\"{day}T09:00:00Z\",{stat_day},{code},\"{region}\",{tested},{positive}\n"
        ));
    }
    gzip(&text)
}

fn source_with_three_days() -> MapSource {
    let listed = [
        "data-rivm/tests/rivm_daily_2022-01-01.csv.gz",
        "data-rivm/tests/rivm_daily_2022-01-02.csv.gz",
        "data-rivm/tests/rivm_daily_2022-01-03.csv.gz",
    ];
    let items: Vec<_> = listed.iter().map(|p| json!({ "path": p })).collect();
    let mut source = MapSource::default();
    source.bodies.insert(
        BASE.to_string(),
        serde_json::to_vec(&json!({ "payload": { "tree": { "items": items } } })).expect("json"),
    );
    source.bodies.insert(
        format!("{BASE}rivm_daily_2022-01-01.csv.gz"),
        daily_file(
            "2022-01-01",
            &[
                ("2021-12-31", "VR01", "Groningen", 900, 300),
                ("2022-01-01", "VR01", "Groningen", 976, 378),
                ("2022-01-01", "VR13", "Limburg-Noord", 500, 120),
            ],
        ),
    );
    source.bodies.insert(
        format!("{BASE}rivm_daily_2022-01-02.csv.gz"),
        daily_file(
            "2022-01-02",
            &[
                ("2022-01-02", "VR01", "Groningen", 1010, 401),
                ("2022-01-02", "VR13", "Limburg-Noord", 510, 99),
            ],
        ),
    );
    source.bodies.insert(
        format!("{BASE}rivm_daily_2022-01-03.csv.gz"),
        daily_file("2022-01-03", &[("2022-01-03", "VR01", "Groningen", 1200, 450)]),
    );
    source
}

fn remote() -> RemoteConfig {
    RemoteConfig {
        tests_url: BASE.to_string(),
        timeout_secs: None,
    }
}

#[test]
fn download_url_uses_the_basename() {
    assert_eq!(
        download_url(BASE, "data-rivm/tests/rivm_daily_2022-01-01.csv.gz"),
        format!("{BASE}rivm_daily_2022-01-01.csv.gz")
    );
    assert_eq!(download_url(BASE, "filtered_path"), format!("{BASE}filtered_path"));
}

#[test]
fn records_are_filtered_by_window_and_region() {
    let source = source_with_three_days();
    let window = TimeWindow::parse("2022-01-01", "2022-01-02").expect("window");
    let records = get_covid_data(&source, &remote(), &window, "Groningen").expect("download");

    assert_eq!(records.len(), 2);
    let first = &records[0];
    assert_eq!(first.version, 2);
    assert_eq!(first.date_of_report, "2022-01-01T09:00:00Z");
    assert_eq!(first.date_of_statistics, NaiveDate::from_ymd_opt(2022, 1, 1).expect("date"));
    assert_eq!(first.security_region_code, "VR01");
    assert_eq!(first.security_region_name, "Groningen");
    assert_eq!(first.tested_with_result, Some(976));
    assert_eq!(first.tested_positive, Some(378));
    assert_eq!(records[1].tested_positive, Some(401));

    assert_eq!(
        *source.requested.borrow(),
        vec![
            BASE.to_string(),
            format!("{BASE}rivm_daily_2022-01-01.csv.gz"),
            format!("{BASE}rivm_daily_2022-01-02.csv.gz"),
        ]
    );
}

#[test]
fn window_outside_listing_fails_before_downloading() {
    let source = source_with_three_days();
    let window = TimeWindow::parse("2022-01-02", "2022-01-09").expect("window");
    let err = get_covid_data(&source, &remote(), &window, "Groningen").expect_err("outside");
    assert!(matches!(err, CommaError::Range(_)));
    assert_eq!(source.requested.borrow().len(), 1);
}

#[test]
fn failed_download_aborts_the_run() {
    let mut source = source_with_three_days();
    source
        .bodies
        .remove(&format!("{BASE}rivm_daily_2022-01-02.csv.gz"));
    let window = TimeWindow::parse("2022-01-01", "2022-01-03").expect("window");
    let err = get_covid_data(&source, &remote(), &window, "Groningen").expect_err("404");
    assert!(matches!(err, CommaError::Fetch(_)));
    assert_eq!(source.requested.borrow().len(), 3);
}

#[test]
fn plain_csv_bodies_are_accepted_and_written_back() {
    let body = format!("{HEADER}\n2,2022-01-03T09:00:00Z,2022-01-01,VR01,Groningen,,378\n");
    let records = decode_test_file(body.as_bytes(), "inline").expect("decode");
    assert_eq!(records[0].tested_with_result, None);

    let mut out = Vec::new();
    write_records(&records, &mut out).expect("write");
    let text = String::from_utf8(out).expect("utf8");
    assert_eq!(text, body);
}

#[test]
fn malformed_rows_are_serde_errors() {
    let body = gzip(&format!("{HEADER}\n2,2022-01-03,not-a-date,VR01,Groningen,1,1\n"));
    let err = decode_test_file(&body, "broken.csv.gz").expect_err("bad date");
    assert!(matches!(err, CommaError::Serde(_)));
    assert_eq!(err.info().context.get("source").map(String::as_str), Some("broken.csv.gz"));
}
