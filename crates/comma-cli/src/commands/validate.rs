use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use comma_core::CommaConfig;
use comma_hyp::inspect_param_dir;

use crate::print_json;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Parameter directory holding `params_individual.json` and the hypothesis files.
    #[arg(long)]
    pub dir: PathBuf,
    /// Print the full report as JSON instead of a summary line.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &ValidateArgs, config: &CommaConfig) -> Result<(), Box<dyn Error>> {
    let report = inspect_param_dir(&args.dir, config)?;
    if args.json {
        print_json(&report)?;
    } else if report.is_clean() {
        println!(
            "{}: {} hypothesis files valid",
            args.dir.display(),
            report.checked.len()
        );
    }
    report.into_result()?;
    Ok(())
}
