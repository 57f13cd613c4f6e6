use crate::model::{ChangeOrderGroup, Handing, Id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contracted home under construction.
///
/// Holds the baseline configuration (plan, lot, handing, contracted choices
/// and plan options) plus the ordered change-order groups proposing
/// amendments to it. The baseline is never mutated by resolution; the
/// resolver always re-derives the current configuration from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handing: Option<Handing>,
    #[serde(default)]
    pub choices: Vec<JobChoice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plan_options: Vec<JobPlanOption>,
    #[serde(default)]
    pub change_order_groups: Vec<ChangeOrderGroup>,
    /// Construction stages in chronological order. Stages not yet reached
    /// carry no start date.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stage_history: Vec<ConstructionStage>,
}

/// A baseline, already-contracted choice. Carries no action tag; it simply
/// exists until a change-order delta removes or amends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobChoice {
    pub id: Id,
    /// Stable decision-point-choice id, independent of catalog version
    pub dp_choice_id: i64,
    pub div_choice_catalog_id: i64,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<JobChoiceAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<JobChoiceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobChoiceAttribute {
    pub attribute_group_id: i64,
    pub attribute_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobChoiceLocation {
    pub location_group_id: i64,
    pub location_id: i64,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<JobChoiceAttribute>,
}

/// A baseline contracted plan option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPlanOption {
    pub id: Id,
    pub plan_option_id: i64,
    pub quantity: i32,
}

/// One entry in a job's construction-stage history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionStage {
    pub stage_id: i64,
    pub name: String,
    /// None while the stage is still pending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_on: Option<DateTime<Utc>>,
}

impl ConstructionStage {
    pub fn started(stage_id: i64, name: impl Into<String>, started_on: DateTime<Utc>) -> Self {
        Self {
            stage_id,
            name: name.into(),
            started_on: Some(started_on),
        }
    }

    pub fn pending(stage_id: i64, name: impl Into<String>) -> Self {
        Self {
            stage_id,
            name: name.into(),
            started_on: None,
        }
    }
}
