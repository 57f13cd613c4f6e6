use crate::model::Id;
use serde::{Deserialize, Serialize};

/// Explicit market/community scope for a load.
///
/// Threaded through every loader call instead of living in ambient global
/// state, so two concurrent loads can carry different scopes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_id: Option<Id>,
}

impl SessionContext {
    pub fn for_community(community_id: impl Into<Id>) -> Self {
        Self {
            market_id: None,
            community_id: Some(community_id.into()),
        }
    }
}
