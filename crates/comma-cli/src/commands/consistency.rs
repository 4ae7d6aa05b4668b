use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use comma_core::CommaConfig;
use comma_hyp::check_consistency;

#[derive(Args, Debug)]
pub struct CheckConsistencyArgs {
    /// Directory holding the `lockdown*.csv` and `actions*.csv` files.
    #[arg(long)]
    pub dir: PathBuf,
}

pub fn run(args: &CheckConsistencyArgs, config: &CommaConfig) -> Result<(), Box<dyn Error>> {
    let report = check_consistency(&args.dir, config)?;
    println!(
        "{} files consistent with {}",
        report.compared.len() + 1,
        report.reference
    );
    Ok(())
}
