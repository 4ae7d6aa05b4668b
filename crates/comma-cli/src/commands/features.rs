use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use comma_core::CommaConfig;
use comma_hyp::one_hot_features;

#[derive(Args, Debug)]
pub struct FeaturesArgs {
    /// Directory holding the attribute file.
    #[arg(long)]
    pub dir: PathBuf,
}

pub fn run(args: &FeaturesArgs, config: &CommaConfig) -> Result<(), Box<dyn Error>> {
    let spec = args.dir.join(&config.files.params_individual);
    for feature in one_hot_features(&spec)? {
        println!("{feature}");
    }
    Ok(())
}
