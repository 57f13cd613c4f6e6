use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type Id = String;

pub fn generate_id() -> Id {
    Uuid::new_v4().to_string()
}

/// Default user for records imported without audit data
pub(crate) fn default_user() -> String {
    "system".to_string()
}

/// Default timestamp for records imported without audit data
pub(crate) fn default_timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp(0, 0).unwrap_or_else(|| Utc::now())
}

/// How a change-order delta modifies the baseline it targets.
///
/// Closed enum so a new action kind forces exhaustive handling everywhere
/// deltas are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaAction {
    Add,
    Delete,
    Change,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handing {
    Left,
    Right,
}

impl std::fmt::Display for Handing {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Handing::Left => write!(f, "Left"),
            Handing::Right => write!(f, "Right"),
        }
    }
}

impl std::str::FromStr for Handing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Handing::Left),
            "right" => Ok(Handing::Right),
            _ => Err(format!("Unknown handing: {}", s)),
        }
    }
}

/// Sales/approval status of a change-order group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesStatus {
    Pending,
    OutForSignature,
    Signed,
    Approved,
    Rejected,
    Withdrawn,
    Resolved,
}

impl std::fmt::Display for SalesStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let label = match self {
            SalesStatus::Pending => "pending",
            SalesStatus::OutForSignature => "out_for_signature",
            SalesStatus::Signed => "signed",
            SalesStatus::Approved => "approved",
            SalesStatus::Rejected => "rejected",
            SalesStatus::Withdrawn => "withdrawn",
            SalesStatus::Resolved => "resolved",
        };
        write!(f, "{}", label)
    }
}

/// Construction-side status of a change-order group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionStatus {
    Pending,
    Approved,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOrderType {
    SalesJio,
    SpecJio,
    ChoiceAttribute,
    Elevation,
    Handing,
    Plan,
    HomesiteTransfer,
    BuyerChangeOrder,
    PriceAdjustment,
    NonStandardOption,
}
