use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::sleep;

use job_config_rust::logic::SalesAgreementLoader;
use job_config_rust::model::{
    generate_id, DecisionTree, Handing, Id, Job, LoadEvent, Lot, OptionImage, PlanOption, RuleSet,
    SalesAgreement, SalesCommunity, SalesStatus, SessionContext,
};
use job_config_rust::seed;
use job_config_rust::store::{CatalogStore, InMemoryStore, LotStore, SalesStore};
use job_config_rust::{LoadError, FRIENDLY_LOAD_MESSAGE};

fn demo_store() -> (Arc<InMemoryStore>, Id) {
    let store = Arc::new(InMemoryStore::new());
    let agreement_id = seed::load_seed_data(&store);
    (store, agreement_id)
}

#[tokio::test]
async fn end_to_end_load_applies_the_pending_change_order() {
    let (store, agreement_id) = demo_store();
    let loader = SalesAgreementLoader::new(store);
    let mut events = loader.subscribe();
    let ctx = SessionContext::for_community(seed::DEMO_COMMUNITY_ID);

    let loaded = loader
        .load(&ctx, &agreement_id)
        .await
        .expect("load succeeds")
        .expect("load is current");

    // baseline choice 100 deleted, dp choice 3 added and backfilled to 300
    assert_eq!(loaded.selected_choices.len(), 1);
    assert_eq!(loaded.selected_choices[0].div_choice_catalog_id, 300);
    assert_eq!(loaded.selected_choices[0].quantity, 1);
    assert_eq!(loaded.selected_plan_id, Some(seed::DEMO_PLAN_ID));
    assert_eq!(loaded.selected_handing, Some(Handing::Left));
    assert_eq!(
        loaded.sales_community.as_ref().map(|c| c.id.as_str()),
        Some(seed::DEMO_COMMUNITY_ID)
    );
    assert_eq!(loaded.lot.as_ref().map(|l| l.id), Some(seed::DEMO_LOT_ID));
    assert!(loaded.current_group.is_some());

    let tree = loaded.tree.as_ref().expect("tree present");
    let choices: Vec<_> = tree
        .groups
        .iter()
        .flat_map(|g| &g.sub_groups)
        .flat_map(|s| &s.points)
        .flat_map(|p| &p.choices)
        .collect();
    let granite = choices
        .iter()
        .find(|c| c.div_choice_catalog_id == 300)
        .unwrap();
    assert!(granite.is_selected);
    assert!(granite.is_pending_addition);
    let red_brick = choices
        .iter()
        .find(|c| c.div_choice_catalog_id == 100)
        .unwrap();
    assert!(!red_brick.is_selected);

    // foundation has started, so the stage-1 point is locked
    let points: Vec<_> = tree
        .groups
        .iter()
        .flat_map(|g| &g.sub_groups)
        .flat_map(|s| &s.points)
        .collect();
    assert!(points.iter().find(|p| p.id == 111).unwrap().is_past_cutoff);
    assert!(!points.iter().find(|p| p.id == 211).unwrap().is_past_cutoff);

    match events.recv().await.expect("one event") {
        LoadEvent::Loaded(event) => {
            assert_eq!(event.sales_agreement.id, agreement_id);
            assert_eq!(event.option_images.as_ref().map(|i| i.len()), Some(1));
        }
        LoadEvent::Failed(failure) => panic!("unexpected failure: {:?}", failure),
    }
}

#[tokio::test]
async fn missing_agreement_reports_one_failure_with_the_friendly_message() {
    let store = Arc::new(InMemoryStore::new());
    let loader = SalesAgreementLoader::new(store);
    let mut events = loader.subscribe();

    let error = loader
        .load(&SessionContext::default(), &"missing".to_string())
        .await
        .expect_err("load fails");
    assert!(matches!(error, LoadError::NotFound { .. }));

    match events.recv().await.expect("one event") {
        LoadEvent::Failed(failure) => {
            assert_eq!(failure.friendly_message, FRIENDLY_LOAD_MESSAGE);
            assert!(failure.error.contains("not found"));
        }
        LoadEvent::Loaded(_) => panic!("expected a failure event"),
    }
}

#[tokio::test]
async fn lot_only_job_skips_the_catalog_and_still_loads() {
    let store = Arc::new(InMemoryStore::new());
    store.insert_lot(Lot {
        id: 55,
        lot_block: "55B".to_string(),
        street_address: None,
    });
    let job = Job {
        id: generate_id(),
        plan_id: None,
        lot_id: Some(55),
        handing: None,
        choices: Vec::new(),
        plan_options: Vec::new(),
        change_order_groups: Vec::new(),
        stage_history: Vec::new(),
    };
    let agreement = SalesAgreement {
        id: generate_id(),
        job_id: job.id.clone(),
        status: SalesStatus::Signed,
    };
    let agreement_id = agreement.id.clone();
    store.insert_job(job);
    store.insert_sales_agreement(agreement);

    let loader = SalesAgreementLoader::new(store);
    let loaded = loader
        .load(&SessionContext::default(), &agreement_id)
        .await
        .expect("load succeeds")
        .expect("load is current");

    assert!(loaded.tree.is_none());
    assert!(loaded.rules.is_none());
    assert!(loaded.plan_options.is_none());
    assert_eq!(loaded.lot.map(|l| l.id), Some(55));
}

/// Delegating store that stalls the catalog version lookup, so a second
/// load can start while the first is still in flight.
struct SlowCatalogStore {
    inner: Arc<InMemoryStore>,
    delay: Duration,
}

#[async_trait]
impl SalesStore for SlowCatalogStore {
    async fn get_sales_agreement(&self, id: &Id) -> Result<Option<SalesAgreement>> {
        self.inner.get_sales_agreement(id).await
    }

    async fn get_job(&self, id: &Id) -> Result<Option<Job>> {
        self.inner.get_job(id).await
    }

    async fn get_sales_community(&self, id: &Id) -> Result<Option<SalesCommunity>> {
        self.inner.get_sales_community(id).await
    }
}

#[async_trait]
impl CatalogStore for SlowCatalogStore {
    async fn get_tree_version_id(&self, plan_id: i64) -> Result<Option<i64>> {
        sleep(self.delay).await;
        self.inner.get_tree_version_id(plan_id).await
    }

    async fn get_catalog_tree(&self, tree_version_id: i64) -> Result<Option<DecisionTree>> {
        self.inner.get_catalog_tree(tree_version_id).await
    }

    async fn get_rules(&self, tree_version_id: i64) -> Result<RuleSet> {
        self.inner.get_rules(tree_version_id).await
    }

    async fn get_plan_options(&self, plan_id: i64) -> Result<Vec<PlanOption>> {
        self.inner.get_plan_options(plan_id).await
    }

    async fn get_option_images(&self, tree_version_id: i64) -> Result<Vec<OptionImage>> {
        self.inner.get_option_images(tree_version_id).await
    }

    async fn get_web_plan_mapping(&self, plan_id: i64) -> Result<Vec<i64>> {
        self.inner.get_web_plan_mapping(plan_id).await
    }

    async fn get_catalog_choice_ids(&self, dp_choice_ids: &[i64]) -> Result<HashMap<i64, i64>> {
        self.inner.get_catalog_choice_ids(dp_choice_ids).await
    }
}

#[async_trait]
impl LotStore for SlowCatalogStore {
    async fn get_lot(&self, id: i64) -> Result<Option<Lot>> {
        self.inner.get_lot(id).await
    }
}

#[tokio::test]
async fn a_newer_load_supersedes_an_in_flight_one() {
    let (inner, first_agreement) = demo_store();

    // second job and agreement on the same plan
    let second_job = seed::demo_job();
    let second_agreement = seed::demo_sales_agreement(second_job.id.clone());
    let second_agreement_id = second_agreement.id.clone();
    inner.insert_job(second_job);
    inner.insert_sales_agreement(second_agreement);

    let store = Arc::new(SlowCatalogStore {
        inner,
        delay: Duration::from_millis(100),
    });
    let loader = Arc::new(SalesAgreementLoader::new(store));
    let mut events = loader.subscribe();

    let first = {
        let loader = Arc::clone(&loader);
        let id = first_agreement.clone();
        tokio::spawn(async move { loader.load(&SessionContext::default(), &id).await })
    };
    sleep(Duration::from_millis(20)).await;
    let second = loader
        .load(&SessionContext::default(), &second_agreement_id)
        .await
        .expect("second load succeeds")
        .expect("second load is current");
    assert_eq!(second.sales_agreement.id, second_agreement_id);

    // the first load finished after being superseded: no result, no event
    let first = first.await.expect("task joins").expect("no error");
    assert!(first.is_none());

    match events.recv().await.expect("one event") {
        LoadEvent::Loaded(event) => {
            assert_eq!(event.sales_agreement.id, second_agreement_id);
        }
        LoadEvent::Failed(failure) => panic!("unexpected failure: {:?}", failure),
    }
    assert!(events.try_recv().is_err());
}
