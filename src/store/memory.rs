use std::collections::HashMap;

use anyhow::Result;
use parking_lot::RwLock;

use crate::model::{
    DecisionTree, Id, Job, Lot, OptionImage, PlanOption, RuleSet, SalesAgreement, SalesCommunity,
};
use crate::store::traits::{CatalogStore, LotStore, SalesStore};

#[derive(Default)]
struct MemoryState {
    sales_agreements: HashMap<Id, SalesAgreement>,
    jobs: HashMap<Id, Job>,
    communities: HashMap<Id, SalesCommunity>,
    /// plan id → published tree version id
    tree_versions: HashMap<i64, i64>,
    /// tree version id → tree
    trees: HashMap<i64, DecisionTree>,
    rules: HashMap<i64, RuleSet>,
    plan_options: HashMap<i64, Vec<PlanOption>>,
    option_images: HashMap<i64, Vec<OptionImage>>,
    web_plan_mappings: HashMap<i64, Vec<i64>>,
    /// stable dp-choice id → catalog id
    catalog_choice_ids: HashMap<i64, i64>,
    lots: HashMap<i64, Lot>,
}

/// In-memory store for tests and the demo binary. The production
/// implementation lives outside this core and talks to the remote catalog
/// and sales APIs.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_sales_agreement(&self, agreement: SalesAgreement) {
        self.state
            .write()
            .sales_agreements
            .insert(agreement.id.clone(), agreement);
    }

    pub fn insert_job(&self, job: Job) {
        self.state.write().jobs.insert(job.id.clone(), job);
    }

    pub fn insert_community(&self, community: SalesCommunity) {
        self.state
            .write()
            .communities
            .insert(community.id.clone(), community);
    }

    /// Register a plan's published catalog: the version mapping comes from
    /// the tree itself.
    pub fn insert_catalog(&self, tree: DecisionTree, rules: RuleSet) {
        let mut state = self.state.write();
        state.tree_versions.insert(tree.plan_id, tree.tree_version_id);
        state.rules.insert(tree.tree_version_id, rules);
        state.trees.insert(tree.tree_version_id, tree);
    }

    pub fn insert_plan_options(&self, plan_id: i64, options: Vec<PlanOption>) {
        self.state.write().plan_options.insert(plan_id, options);
    }

    pub fn insert_option_images(&self, tree_version_id: i64, images: Vec<OptionImage>) {
        self.state
            .write()
            .option_images
            .insert(tree_version_id, images);
    }

    pub fn insert_web_plan_mapping(&self, plan_id: i64, mapping: Vec<i64>) {
        self.state
            .write()
            .web_plan_mappings
            .insert(plan_id, mapping);
    }

    pub fn insert_catalog_choice_id(&self, dp_choice_id: i64, catalog_id: i64) {
        self.state
            .write()
            .catalog_choice_ids
            .insert(dp_choice_id, catalog_id);
    }

    pub fn insert_lot(&self, lot: Lot) {
        self.state.write().lots.insert(lot.id, lot);
    }
}

#[async_trait::async_trait]
impl SalesStore for InMemoryStore {
    async fn get_sales_agreement(&self, id: &Id) -> Result<Option<SalesAgreement>> {
        Ok(self.state.read().sales_agreements.get(id).cloned())
    }

    async fn get_job(&self, id: &Id) -> Result<Option<Job>> {
        Ok(self.state.read().jobs.get(id).cloned())
    }

    async fn get_sales_community(&self, id: &Id) -> Result<Option<SalesCommunity>> {
        Ok(self.state.read().communities.get(id).cloned())
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryStore {
    async fn get_tree_version_id(&self, plan_id: i64) -> Result<Option<i64>> {
        Ok(self.state.read().tree_versions.get(&plan_id).copied())
    }

    async fn get_catalog_tree(&self, tree_version_id: i64) -> Result<Option<DecisionTree>> {
        Ok(self.state.read().trees.get(&tree_version_id).cloned())
    }

    async fn get_rules(&self, tree_version_id: i64) -> Result<RuleSet> {
        Ok(self
            .state
            .read()
            .rules
            .get(&tree_version_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_plan_options(&self, plan_id: i64) -> Result<Vec<PlanOption>> {
        Ok(self
            .state
            .read()
            .plan_options
            .get(&plan_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_option_images(&self, tree_version_id: i64) -> Result<Vec<OptionImage>> {
        Ok(self
            .state
            .read()
            .option_images
            .get(&tree_version_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_web_plan_mapping(&self, plan_id: i64) -> Result<Vec<i64>> {
        Ok(self
            .state
            .read()
            .web_plan_mappings
            .get(&plan_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_catalog_choice_ids(&self, dp_choice_ids: &[i64]) -> Result<HashMap<i64, i64>> {
        let state = self.state.read();
        Ok(dp_choice_ids
            .iter()
            .filter_map(|id| state.catalog_choice_ids.get(id).map(|c| (*id, *c)))
            .collect())
    }
}

#[async_trait::async_trait]
impl LotStore for InMemoryStore {
    async fn get_lot(&self, id: i64) -> Result<Option<Lot>> {
        Ok(self.state.read().lots.get(&id).cloned())
    }
}
