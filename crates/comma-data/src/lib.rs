//! Calibration data for the comma simulation: date-range extraction over
//! dated file listings and retrieval of RIVM test counts per security region.

pub mod dates;
mod covid;
mod listing;
pub mod records;
mod source;

pub use covid::{download_url, get_covid_data};
pub use dates::{available_window, embedded_date, filter_dates, filter_in_window, TimeWindow};
pub use listing::{get_file_paths, parse_listing};
pub use records::{decode_test_file, write_records, TestRecord};
pub use source::{HttpSource, RemoteSource};
