//! All-zero hypothesis skeletons, written before coefficients are filled in by hand.

use std::path::{Path, PathBuf};

use comma_core::errors::CommaError;
use comma_core::vocabulary::{HypothesisKind, Vocabulary, ACTIONS_COLUMN};
use comma_core::CommaConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::matrix::ParameterMatrix;
use crate::validate::required_features;

/// Which skeleton files to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateLayout {
    /// `lockdown_<tier>.csv` per tier and `actions_effects_on_<status>.csv` per status.
    #[default]
    Standard,
    /// [`TemplateLayout::Standard`] plus `actions_effects_on_<status>_<policy>.csv`
    /// for every status and policy, which is what the validator expects.
    PerPolicy,
}

fn output_names(vocab: &Vocabulary, layout: TemplateLayout) -> Vec<String> {
    let mut names: Vec<String> = vocab
        .lockdown_policies
        .iter()
        .map(|policy| Vocabulary::file_name(HypothesisKind::Lockdown, "", policy))
        .collect();
    names.extend(
        vocab
            .statuses
            .iter()
            .map(|status| format!("actions_effects_on_{status}.csv")),
    );
    if layout == TemplateLayout::PerPolicy {
        for status in &vocab.statuses {
            for policy in &vocab.lockdown_policies {
                names.push(Vocabulary::file_name(HypothesisKind::Actions, status, policy));
            }
        }
    }
    names
}

/// The zero matrix every skeleton file holds: one row per action in
/// vocabulary order, columns `baseline` followed by the encoded features.
pub fn empty_hypothesis(dir: &Path, config: &CommaConfig) -> Result<ParameterMatrix, CommaError> {
    let columns: Vec<String> = required_features(dir, config)?
        .into_iter()
        .filter(|column| column != ACTIONS_COLUMN)
        .collect();
    Ok(ParameterMatrix::zeros(&config.vocabulary.actions, &columns))
}

/// Writes empty hypothesis files into `dir` and returns their paths.
///
/// Fails with a not-found error when the attribute file is absent.
/// Existing files with the same names are overwritten.
pub fn create_empty_hypotheses(
    dir: &Path,
    config: &CommaConfig,
    layout: TemplateLayout,
) -> Result<Vec<PathBuf>, CommaError> {
    let matrix = empty_hypothesis(dir, config)?;
    let mut written = Vec::new();
    for name in output_names(&config.vocabulary, layout) {
        let path = dir.join(&name);
        matrix.write(&path, &config.files)?;
        debug!(file = %name, "wrote empty hypothesis");
        written.push(path);
    }
    info!(dir = %dir.display(), files = written.len(), "created empty hypotheses");
    Ok(written)
}
