//! Loading a hypothesis family as matrices ready for the simulation.

use std::collections::BTreeMap;
use std::path::Path;

use comma_core::errors::{CommaError, ErrorInfo};
use comma_core::vocabulary::{HypothesisKind, Vocabulary, BASELINE_COLUMN};
use comma_core::CommaConfig;
use tracing::debug;

use crate::matrix::ParameterMatrix;

/// Loads the hypothesis matrices of `kind` for each of `policies`.
///
/// Rows are reordered to the vocabulary's action order and columns projected
/// onto `baseline` followed by the vocabulary's feature columns, lower-cased,
/// so every matrix of the result has the same shape. `status` selects the
/// actions-effect family and is ignored for lockdown files.
pub fn read_hypotheses(
    dir: &Path,
    kind: HypothesisKind,
    status: &str,
    policies: &[String],
    config: &CommaConfig,
) -> Result<BTreeMap<String, ParameterMatrix>, CommaError> {
    let mut columns = vec![BASELINE_COLUMN.to_string()];
    columns.extend(
        config
            .vocabulary
            .features
            .iter()
            .map(|feature| feature.to_lowercase()),
    );

    let mut matrices = BTreeMap::new();
    for policy in policies {
        let path = dir.join(Vocabulary::file_name(kind, status, policy));
        if !path.is_file() {
            return Err(CommaError::NotFound(
                ErrorInfo::new(
                    "comma_hyp.hypothesis_missing",
                    format!("hypothesis file {} does not exist", path.display()),
                )
                .with_context("policy", policy.clone())
                .with_context("kind", kind.as_str()),
            ));
        }
        let matrix = ParameterMatrix::read(&path, &config.files)?
            .lowercase_columns()
            .sort_rows_by(|action| config.vocabulary.action_rank(action));
        let projected = matrix.select_columns(&columns).map_err(|err| {
            let info = err.info().clone().with_context("path", path.display().to_string());
            CommaError::Schema(info)
        })?;
        debug!(
            policy = %policy,
            kind = kind.as_str(),
            rows = projected.nrows(),
            cols = projected.ncols(),
            "loaded hypothesis"
        );
        matrices.insert(policy.clone(), projected);
    }
    Ok(matrices)
}
