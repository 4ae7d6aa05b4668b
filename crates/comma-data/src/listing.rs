use comma_core::errors::{CommaError, ErrorInfo};
use serde::Deserialize;
use tracing::info;

use crate::source::RemoteSource;

#[derive(Debug, Deserialize)]
struct ListingBody {
    payload: ListingPayload,
}

#[derive(Debug, Deserialize)]
struct ListingPayload {
    tree: ListingTree,
}

#[derive(Debug, Deserialize)]
struct ListingTree {
    items: Vec<ListingItem>,
}

#[derive(Debug, Deserialize)]
struct ListingItem {
    path: String,
}

/// Extracts `payload.tree.items[*].path` from a directory-listing body.
pub fn parse_listing(body: &[u8]) -> Result<Vec<String>, CommaError> {
    let listing: ListingBody = serde_json::from_slice(body).map_err(|err| {
        CommaError::Fetch(
            ErrorInfo::new("comma_data.listing_shape", "unexpected directory listing payload")
                .with_hint(err.to_string()),
        )
    })?;
    Ok(listing
        .payload
        .tree
        .items
        .into_iter()
        .map(|item| item.path)
        .collect())
}

/// Fetches the directory listing at `url` and returns the listed paths.
pub fn get_file_paths(source: &dyn RemoteSource, url: &str) -> Result<Vec<String>, CommaError> {
    let body = source.get(url)?;
    let paths = parse_listing(&body).map_err(|err| {
        let info = err.info().clone().with_context("url", url);
        CommaError::Fetch(info)
    })?;
    info!(url, files = paths.len(), "fetched remote listing");
    Ok(paths)
}
