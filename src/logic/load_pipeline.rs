use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use itertools::Itertools;
use log::{debug, info, warn};
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::error::LoadError;
use crate::logic::{cutoff, resolver, tree_merge};
use crate::model::{
    Id, Job, LoadEvent, LoadFailure, Lot, SalesAgreementLoaded, SessionContext,
};
use crate::store::Store;

/// Pipeline stages of one load, in order. Failed is reachable from every
/// non-idle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    ResolvingChangeOrder,
    LoadingCatalog,
    Merging,
    Cutoff,
    Loaded,
    Failed,
}

/// Sequences one load: resolver → catalog fetch → tree merge → cutoff →
/// one consolidated event.
///
/// Stages run strictly in order except the catalog fetch, whose pieces are
/// started together and joined. A load that is no longer the latest when it
/// completes discards its result and emits nothing ("latest wins"); the one
/// piece of shared mutable state is the load sequence counter.
pub struct SalesAgreementLoader<S> {
    store: Arc<S>,
    events: broadcast::Sender<LoadEvent>,
    load_seq: AtomicU64,
    phase: Mutex<LoadPhase>,
}

impl<S: Store> SalesAgreementLoader<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_capacity(store, 16)
    }

    pub fn with_capacity(store: Arc<S>, event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity);
        Self {
            store,
            events,
            load_seq: AtomicU64::new(0),
            phase: Mutex::new(LoadPhase::Idle),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LoadEvent> {
        self.events.subscribe()
    }

    pub fn current_phase(&self) -> LoadPhase {
        *self.phase.lock()
    }

    /// Run the full pipeline for a sales agreement.
    ///
    /// Returns the loaded bundle, `Ok(None)` when a newer load superseded
    /// this one mid-flight, or the stage error. Exactly one `LoadEvent` is
    /// broadcast per non-superseded load.
    pub async fn load(
        &self,
        ctx: &SessionContext,
        sales_agreement_id: &Id,
    ) -> Result<Option<SalesAgreementLoaded>, LoadError> {
        let seq = self.load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        match self.run(seq, ctx, sales_agreement_id).await {
            Ok(loaded) => {
                if !self.is_current(seq) {
                    debug!(
                        "discarding superseded load {} of sales agreement {}",
                        seq, sales_agreement_id
                    );
                    return Ok(None);
                }
                self.advance(seq, LoadPhase::Loaded);
                let _ = self
                    .events
                    .send(LoadEvent::Loaded(Box::new(loaded.clone())));
                Ok(Some(loaded))
            }
            Err(error) => {
                if !self.is_current(seq) {
                    debug!(
                        "discarding superseded failed load {} of sales agreement {}: {}",
                        seq, sales_agreement_id, error
                    );
                    return Ok(None);
                }
                self.advance(seq, LoadPhase::Failed);
                warn!(
                    "load of sales agreement {} failed: {}",
                    sales_agreement_id, error
                );
                let _ = self
                    .events
                    .send(LoadEvent::Failed(LoadFailure::from_error(&error)));
                Err(error)
            }
        }
    }

    async fn run(
        &self,
        seq: u64,
        ctx: &SessionContext,
        sales_agreement_id: &Id,
    ) -> Result<SalesAgreementLoaded, LoadError> {
        self.advance(seq, LoadPhase::ResolvingChangeOrder);
        let sales_agreement = self
            .store
            .get_sales_agreement(sales_agreement_id)
            .await?
            .ok_or_else(|| LoadError::not_found("sales agreement", sales_agreement_id.clone()))?;
        let mut job = self
            .store
            .get_job(&sales_agreement.job_id)
            .await?
            .ok_or_else(|| LoadError::not_found("job", sales_agreement.job_id.clone()))?;
        self.backfill_catalog_ids(&mut job).await?;

        let resolved = resolver::resolve(&job);
        info!(
            "job {} resolved: {} choices, plan {:?}, lot {:?}",
            job.id,
            resolved.selected_choices.len(),
            resolved.selected_plan_id,
            resolved.selected_lot_id
        );
        let current_group = resolved
            .current_group_id
            .as_ref()
            .and_then(|id| job.change_order_groups.iter().find(|g| &g.id == id))
            .cloned();

        self.advance(seq, LoadPhase::LoadingCatalog);
        let sales_community = match &ctx.community_id {
            Some(id) => self.store.get_sales_community(id).await?,
            None => None,
        };

        let Some(plan_id) = resolved.selected_plan_id else {
            // lot-only job: no tree to fetch, merge, or mark
            let lot = self.fetch_lot(resolved.selected_lot_id).await?;
            return Ok(SalesAgreementLoaded {
                sales_agreement,
                sales_community,
                job,
                selected_choices: resolved.selected_choices,
                selected_plan_id: None,
                selected_handing: resolved.selected_handing,
                tree: None,
                rules: None,
                plan_options: None,
                option_images: None,
                web_plan_mappings: None,
                current_group,
                lot,
            });
        };

        let tree_version_id = self
            .store
            .get_tree_version_id(plan_id)
            .await?
            .ok_or_else(|| LoadError::not_found("plan", plan_id.to_string()))?;
        let (tree, rules, plan_options, option_images, web_plan_mappings, lot) = tokio::try_join!(
            self.store.get_catalog_tree(tree_version_id),
            self.store.get_rules(tree_version_id),
            self.store.get_plan_options(plan_id),
            self.store.get_option_images(tree_version_id),
            self.store.get_web_plan_mapping(plan_id),
            self.fetch_lot(resolved.selected_lot_id),
        )?;
        let tree = tree
            .ok_or_else(|| LoadError::not_found("decision tree", tree_version_id.to_string()))?;

        self.advance(seq, LoadPhase::Merging);
        let merged = tree_merge::merge_into_tree(
            &tree,
            &resolved.selected_choices,
            &resolved.selected_plan_options,
            current_group.as_ref(),
        );

        self.advance(seq, LoadPhase::Cutoff);
        let marked = cutoff::mark_past_cutoff(&merged, &job);

        Ok(SalesAgreementLoaded {
            sales_agreement,
            sales_community,
            job,
            selected_choices: resolved.selected_choices,
            selected_plan_id: Some(plan_id),
            selected_handing: resolved.selected_handing,
            tree: Some(marked),
            rules: Some(rules),
            plan_options: Some(plan_options),
            option_images: Some(option_images),
            web_plan_mappings: Some(web_plan_mappings),
            current_group,
            lot,
        })
    }

    /// Backfill catalog ids onto change-order choices that only carry their
    /// stable dp-choice id. A choice the catalog no longer knows keeps no
    /// catalog id and is logged; resolution drops it if a Change targets it.
    async fn backfill_catalog_ids(&self, job: &mut Job) -> Result<(), LoadError> {
        let unresolved: Vec<i64> = job
            .change_order_groups
            .iter()
            .flat_map(|group| group.change_orders.iter())
            .flat_map(|order| order.choices.iter())
            .filter(|choice| choice.div_choice_catalog_id.is_none())
            .map(|choice| choice.dp_choice_id)
            .unique()
            .collect();
        if unresolved.is_empty() {
            return Ok(());
        }

        let mapping = self.store.get_catalog_choice_ids(&unresolved).await?;
        for group in &mut job.change_order_groups {
            for order in &mut group.change_orders {
                for choice in &mut order.choices {
                    if choice.div_choice_catalog_id.is_none() {
                        match mapping.get(&choice.dp_choice_id) {
                            Some(catalog_id) => choice.div_choice_catalog_id = Some(*catalog_id),
                            None => warn!(
                                "no catalog id for decision point choice {}",
                                choice.dp_choice_id
                            ),
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn fetch_lot(&self, lot_id: Option<i64>) -> anyhow::Result<Option<Lot>> {
        match lot_id {
            Some(id) => self.store.get_lot(id).await,
            None => Ok(None),
        }
    }

    fn is_current(&self, seq: u64) -> bool {
        self.load_seq.load(Ordering::SeqCst) == seq
    }

    /// Phase transitions from superseded loads are ignored so the observable
    /// phase always tracks the latest load.
    fn advance(&self, seq: u64, phase: LoadPhase) {
        if self.is_current(seq) {
            *self.phase.lock() = phase;
        }
    }
}
