use comma_core::errors::CommaError;
use comma_core::RemoteConfig;
use tracing::info;

use crate::dates::{filter_in_window, TimeWindow};
use crate::listing::get_file_paths;
use crate::records::{decode_test_file, TestRecord};
use crate::source::RemoteSource;

/// Download URL of a listed file: the base URL followed by the path's last segment.
pub fn download_url(base: &str, listed_path: &str) -> String {
    let name = listed_path.rsplit('/').next().unwrap_or(listed_path);
    format!("{base}{name}")
}

/// Downloads the daily test files covering `window` and keeps the rows of
/// `region` whose statistics date lies inside the window.
///
/// Files are fetched one at a time; the first failed request aborts the call.
pub fn get_covid_data(
    source: &dyn RemoteSource,
    remote: &RemoteConfig,
    window: &TimeWindow,
    region: &str,
) -> Result<Vec<TestRecord>, CommaError> {
    let listed = get_file_paths(source, &remote.tests_url)?;
    let selected = filter_in_window(&listed, window)?;
    let total = selected.len();
    let mut records = Vec::new();
    for (idx, path) in selected.iter().enumerate() {
        let url = download_url(&remote.tests_url, path);
        info!(file = idx + 1, total, url = %url, "downloading test data");
        let body = source.get(&url)?;
        records.extend(decode_test_file(&body, &url)?);
    }
    let downloaded = records.len();
    records.retain(|record| {
        window.contains(record.date_of_statistics) && record.security_region_name == region
    });
    info!(downloaded, kept = records.len(), region, %window, "filtered test data");
    Ok(records)
}
