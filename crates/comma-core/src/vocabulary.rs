//! Static metadata shared by the validator, the template generator and the
//! hypothesis loader: recognised actions, lockdown tiers, agent statuses and
//! the file naming convention tying them together.

use serde::{Deserialize, Serialize};

/// Name of the individual-parameter attribute file inside a parameter directory.
pub const PARAMS_INDIVIDUAL: &str = "params_individual.json";

/// Label of the row-key column of every hypothesis matrix.
pub const ACTIONS_COLUMN: &str = "actions";

/// Label of the intercept column of every hypothesis matrix.
pub const BASELINE_COLUMN: &str = "baseline";

/// Behaviours modelled by the simulation, in canonical row order.
pub const ACTIONS: [&str; 10] = [
    "work_from_home",
    "maintain_physical_distance",
    "stay_at_home",
    "exercise",
    "socialise",
    "travel",
    "seek_help",
    "negative_coping",
    "positive_coping",
    "socialise_online",
];

/// Lockdown tiers ordered by severity.
pub const LOCKDOWN_POLICIES: [&str; 4] = ["absent", "easy", "medium", "hard"];

/// Agent statuses that actions can affect.
pub const INDIVIDUAL_STATUS: [&str; 1] = ["mh"];

/// One-hot feature columns consumed by the simulation's linear algebra.
pub const ALL_POSSIBLE_FEATURES: [&str; 24] = [
    "age_group__1",
    "age_group__2",
    "age_group__3",
    "age_group__4",
    "gender_f",
    "gender_m",
    "education_high",
    "education_low",
    "education_medium",
    "unemployed_no",
    "unemployed_yes",
    "have_partner_no",
    "have_partner_yes",
    "depressed_no",
    "depressed_yes",
    "children_presence_no",
    "children_presence_yes",
    "housing_financial_difficulties_no",
    "housing_financial_difficulties_yes",
    "selfrated_health_average",
    "selfrated_health_good",
    "selfrated_health_poor",
    "critical_job_no",
    "critical_job_yes",
];

/// Family a hypothesis file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HypothesisKind {
    /// Effect of actions on an agent status under a lockdown policy.
    Actions,
    /// Effect of a lockdown tier on the propensity of each action.
    Lockdown,
}

impl HypothesisKind {
    /// Lower-case label used on the command line and in file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            HypothesisKind::Actions => "actions",
            HypothesisKind::Lockdown => "lockdown",
        }
    }
}

/// Vocabulary of labels recognised in a parameter directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Action labels expected in the `actions` column, in canonical order.
    #[serde(default = "Vocabulary::default_actions")]
    pub actions: Vec<String>,
    /// Lockdown tiers, one `lockdown_<tier>.csv` each.
    #[serde(default = "Vocabulary::default_lockdown_policies")]
    pub lockdown_policies: Vec<String>,
    /// Agent statuses, one actions-effect file per status and policy.
    #[serde(default = "Vocabulary::default_statuses")]
    pub statuses: Vec<String>,
    /// Feature columns projected out when loading hypotheses.
    #[serde(default = "Vocabulary::default_features")]
    pub features: Vec<String>,
}

impl Vocabulary {
    fn default_actions() -> Vec<String> {
        ACTIONS.iter().map(|s| s.to_string()).collect()
    }
    fn default_lockdown_policies() -> Vec<String> {
        LOCKDOWN_POLICIES.iter().map(|s| s.to_string()).collect()
    }
    fn default_statuses() -> Vec<String> {
        INDIVIDUAL_STATUS.iter().map(|s| s.to_string()).collect()
    }
    fn default_features() -> Vec<String> {
        ALL_POSSIBLE_FEATURES.iter().map(|s| s.to_string()).collect()
    }

    /// File name for the hypothesis of `kind` under `policy`.
    ///
    /// `status` is only consulted for [`HypothesisKind::Actions`].
    pub fn file_name(kind: HypothesisKind, status: &str, policy: &str) -> String {
        match kind {
            HypothesisKind::Actions => format!("actions_effects_on_{status}_{policy}.csv"),
            HypothesisKind::Lockdown => format!("lockdown_{policy}.csv"),
        }
    }

    /// Every hypothesis file a complete parameter directory must contain:
    /// one actions-effect file per status and policy followed by one
    /// lockdown file per tier.
    pub fn expected_files(&self) -> Vec<String> {
        let mut names = Vec::new();
        for status in &self.statuses {
            for policy in &self.lockdown_policies {
                names.push(Self::file_name(HypothesisKind::Actions, status, policy));
            }
        }
        for policy in &self.lockdown_policies {
            names.push(Self::file_name(HypothesisKind::Lockdown, "", policy));
        }
        names
    }

    /// Position of `action` in canonical order, if recognised.
    pub fn action_rank(&self, action: &str) -> Option<usize> {
        self.actions.iter().position(|known| known == action)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            actions: Self::default_actions(),
            lockdown_policies: Self::default_lockdown_policies(),
            statuses: Self::default_statuses(),
            features: Self::default_features(),
        }
    }
}
