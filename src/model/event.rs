use crate::model::{
    ChangeOrderGroup, DecisionTree, Handing, Job, JobChoice, Lot, OptionImage, PlanOption, RuleSet,
    SalesAgreement, SalesCommunity,
};
use serde::{Deserialize, Serialize};

/// Consolidated outcome of one load: everything a buyer-facing configuration
/// screen needs, or one reported error. Nothing partial is ever emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadEvent {
    Loaded(Box<SalesAgreementLoaded>),
    Failed(LoadFailure),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesAgreementLoaded {
    pub sales_agreement: SalesAgreement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_community: Option<SalesCommunity>,
    pub job: Job,
    pub selected_choices: Vec<JobChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_plan_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_handing: Option<Handing>,
    /// None for lot-only jobs, which skip the catalog fetch entirely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<DecisionTree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_options: Option<Vec<PlanOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_images: Option<Vec<OptionImage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_plan_mappings: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_group: Option<ChangeOrderGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot: Option<Lot>,
}

/// Reported stage failure: the underlying cause for logs, a fixed friendly
/// message for the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadFailure {
    pub error: String,
    pub friendly_message: String,
}

impl LoadFailure {
    pub fn from_error(error: &crate::error::LoadError) -> Self {
        Self {
            error: error.to_string(),
            friendly_message: crate::error::FRIENDLY_LOAD_MESSAGE.to_string(),
        }
    }
}
