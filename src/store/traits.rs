use crate::model::{
    DecisionTree, Id, Job, Lot, OptionImage, PlanOption, RuleSet, SalesAgreement, SalesCommunity,
};
use anyhow::Result;
use std::collections::HashMap;

/// Sales-side collaborator: agreements, jobs, communities
#[async_trait::async_trait]
pub trait SalesStore: Send + Sync {
    async fn get_sales_agreement(&self, id: &Id) -> Result<Option<SalesAgreement>>;
    /// Job with nested baseline choices/options and change-order groups
    async fn get_job(&self, id: &Id) -> Result<Option<Job>>;
    async fn get_sales_community(&self, id: &Id) -> Result<Option<SalesCommunity>>;
}

/// Catalog-side collaborator, keyed per plan or per plan version
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Published tree version for a plan
    async fn get_tree_version_id(&self, plan_id: i64) -> Result<Option<i64>>;
    async fn get_catalog_tree(&self, tree_version_id: i64) -> Result<Option<DecisionTree>>;
    async fn get_rules(&self, tree_version_id: i64) -> Result<RuleSet>;
    async fn get_plan_options(&self, plan_id: i64) -> Result<Vec<PlanOption>>;
    async fn get_option_images(&self, tree_version_id: i64) -> Result<Vec<OptionImage>>;
    async fn get_web_plan_mapping(&self, plan_id: i64) -> Result<Vec<i64>>;
    /// Map stable decision-point-choice ids to catalog ids, used to backfill
    /// change-order choices before resolution
    async fn get_catalog_choice_ids(&self, dp_choice_ids: &[i64]) -> Result<HashMap<i64, i64>>;
}

#[async_trait::async_trait]
pub trait LotStore: Send + Sync {
    async fn get_lot(&self, id: i64) -> Result<Option<Lot>>;
}

pub trait Store: SalesStore + CatalogStore + LotStore + Send + Sync {}
impl<T: SalesStore + CatalogStore + LotStore> Store for T {}
