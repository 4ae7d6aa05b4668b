use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use comma_data::filter_dates;

#[derive(Args, Debug)]
pub struct FilterDatesArgs {
    /// Text file with one listed path per line.
    #[arg(long)]
    pub listing: PathBuf,
    /// First day of the window, `YYYY-MM-DD`.
    #[arg(long)]
    pub start: String,
    /// Last day of the window, `YYYY-MM-DD`, inclusive.
    #[arg(long)]
    pub end: String,
}

pub fn run(args: &FilterDatesArgs) -> Result<(), Box<dyn Error>> {
    let text = fs::read_to_string(&args.listing)?;
    let paths: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    for path in filter_dates(&paths, &args.start, &args.end)? {
        println!("{path}");
    }
    Ok(())
}
