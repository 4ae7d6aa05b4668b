use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use comma_core::CommaConfig;
use comma_hyp::{create_empty_hypotheses, TemplateLayout};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory holding `params_individual.json`; templates are written next to it.
    #[arg(long)]
    pub dir: PathBuf,
    /// Also write one actions file per status and lockdown policy.
    #[arg(long)]
    pub per_policy: bool,
}

pub fn run(args: &InitArgs, config: &CommaConfig) -> Result<(), Box<dyn Error>> {
    let layout = if args.per_policy {
        TemplateLayout::PerPolicy
    } else {
        TemplateLayout::Standard
    };
    let written = create_empty_hypotheses(&args.dir, config, layout)?;
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}
