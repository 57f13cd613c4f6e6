use crate::model::common::{default_timestamp, default_user};
use crate::model::{ChangeOrderType, ConstructionStatus, DeltaAction, Handing, Id, SalesStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One bundle of proposed amendments to a job's baseline.
///
/// Among all of a job's groups, at most one is "current" per the resolver's
/// selection rule; only that group's deltas are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeOrderGroup {
    pub id: Id,
    pub sales_status: SalesStatus,
    pub construction_status: ConstructionStatus,
    pub change_orders: Vec<ChangeOrder>,

    /// Audit fields for tracking who created this group
    #[serde(default = "default_user")]
    pub created_by: String,
    #[serde(default = "default_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl ChangeOrderGroup {
    pub fn orders_of_type(
        &self,
        order_type: ChangeOrderType,
    ) -> impl Iterator<Item = &ChangeOrder> + '_ {
        self.change_orders
            .iter()
            .filter(move |o| o.order_type == order_type)
    }
}

/// A single typed change order inside a group, carrying delta lists for each
/// entity kind it can amend. Every delta entry carries a [`DeltaAction`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeOrder {
    pub id: Id,
    #[serde(rename = "type")]
    pub order_type: ChangeOrderType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChangeOrderChoice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plan_options: Vec<ChangeOrderPlanOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub handings: Vec<ChangeOrderHanding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plans: Vec<ChangeOrderPlan>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lots: Vec<ChangeOrderLot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub non_standard_options: Vec<ChangeOrderNonStandardOption>,
}

impl ChangeOrder {
    pub fn new(order_type: ChangeOrderType) -> Self {
        Self {
            id: crate::model::generate_id(),
            order_type,
            choices: Vec::new(),
            plan_options: Vec::new(),
            handings: Vec::new(),
            plans: Vec::new(),
            lots: Vec::new(),
            non_standard_options: Vec::new(),
        }
    }
}

/// A choice delta. Identified by the stable decision-point-choice id; the
/// catalog id is backfilled from the catalog before resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeOrderChoice {
    pub id: Id,
    pub dp_choice_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub div_choice_catalog_id: Option<i64>,
    pub action: DeltaAction,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<ChangeOrderChoiceAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<ChangeOrderChoiceLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeOrderChoiceAttribute {
    pub attribute_group_id: i64,
    pub attribute_id: i64,
    pub action: DeltaAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeOrderChoiceLocation {
    pub location_group_id: i64,
    pub location_id: i64,
    pub action: DeltaAction,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<ChangeOrderChoiceAttribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeOrderHanding {
    pub action: DeltaAction,
    pub handing: Handing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeOrderPlan {
    pub action: DeltaAction,
    pub plan_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeOrderLot {
    pub action: DeltaAction,
    pub lot_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeOrderPlanOption {
    pub id: Id,
    pub plan_option_id: i64,
    pub action: DeltaAction,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeOrderNonStandardOption {
    pub id: Id,
    pub description: String,
    pub action: DeltaAction,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}
