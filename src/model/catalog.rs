use crate::model::{Id, JobChoiceAttribute, JobChoiceLocation, SalesStatus};
use serde::{Deserialize, Serialize};

/// The hierarchical decision tree for one plan version, independent of any
/// job: Group → SubGroup → Point → Choice → Option.
///
/// Merge and cutoff annotations (`is_selected`, `quantity`,
/// `is_pending_addition`, `is_past_cutoff`, ...) default to their unselected
/// state as loaded from the catalog; [`crate::logic::merge_into_tree`] and
/// [`crate::logic::mark_past_cutoff`] return annotated copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub tree_version_id: i64,
    pub plan_id: i64,
    pub groups: Vec<TreeGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeGroup {
    pub id: i64,
    pub label: String,
    pub sub_groups: Vec<TreeSubGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSubGroup {
    pub id: i64,
    pub label: String,
    pub points: Vec<DecisionPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionPoint {
    pub id: i64,
    pub label: String,
    /// Construction stage this point must be decided before, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub construction_stage_id: Option<i64>,
    pub choices: Vec<TreeChoice>,
    /// Set by the cutoff marker; a past-cutoff point is read-only
    #[serde(default)]
    pub is_past_cutoff: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeChoice {
    pub dp_choice_id: i64,
    pub div_choice_catalog_id: i64,
    pub label: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<TreeOption>,

    /// Merge annotations
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub is_selected: bool,
    /// True when the selection originates from an Add delta of the current
    /// change-order group rather than the contracted baseline
    #[serde(default)]
    pub is_pending_addition: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_attributes: Vec<JobChoiceAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_locations: Vec<JobChoiceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeOption {
    pub plan_option_id: i64,
    pub label: String,
    pub is_active: bool,

    /// Merge annotations
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default)]
    pub is_pending_addition: bool,
}

/// Rules constraining choice/point combinations for a plan version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choice_rules: Vec<ChoiceRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub point_rules: Vec<PointRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRule {
    pub id: i64,
    pub rule_type: RuleType,
    pub dp_choice_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRule {
    pub id: i64,
    pub rule_type: RuleType,
    pub point_ids: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    MustHave,
    MustNotHave,
}

/// A plan option as listed by the catalog, before any job-specific merge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOption {
    pub plan_option_id: i64,
    pub name: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionImage {
    pub plan_option_id: i64,
    pub image_url: String,
    pub sort_key: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub id: i64,
    pub lot_block: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesAgreement {
    pub id: Id,
    pub job_id: Id,
    pub status: SalesStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesCommunity {
    pub id: Id,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_name: Option<String>,
}
