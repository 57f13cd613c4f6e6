use crate::model::{ChangeOrderPlanOption, Handing, Id, JobChoice};
use serde::{Deserialize, Serialize};

/// The job-specific current configuration after applying the current
/// change-order group's deltas to the baseline.
///
/// Ephemeral: recomputed on every load, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfiguration {
    pub selected_choices: Vec<JobChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_handing: Option<Handing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_plan_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_lot_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_plan_options: Vec<ChangeOrderPlanOption>,
    /// Group the deltas came from, if any group survived selection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_group_id: Option<Id>,
}
