//! Demonstration fixtures: one community, one plan catalog, and one job with
//! a pending change-order group amending its baseline.

use chrono::{TimeZone, Utc};

use crate::model::{
    generate_id, ChangeOrder, ChangeOrderChoice, ChangeOrderGroup, ChangeOrderType, ChoiceRule,
    ConstructionStage, ConstructionStatus, DecisionPoint, DecisionTree, DeltaAction, Handing, Id,
    Job, JobChoice, Lot, OptionImage, PlanOption, RuleSet, RuleType, SalesAgreement, SalesStatus,
    SalesCommunity, TreeChoice, TreeGroup, TreeOption, TreeSubGroup,
};
use crate::store::InMemoryStore;

pub const DEMO_COMMUNITY_ID: &str = "demo-community";
pub const DEMO_PLAN_ID: i64 = 40100;
pub const DEMO_TREE_VERSION_ID: i64 = 9001;
pub const DEMO_LOT_ID: i64 = 7;

pub fn demo_community() -> SalesCommunity {
    SalesCommunity {
        id: DEMO_COMMUNITY_ID.to_string(),
        name: "Willow Creek".to_string(),
        market_name: Some("North Texas".to_string()),
    }
}

pub fn demo_tree() -> DecisionTree {
    let choice = |dp_choice_id: i64, catalog_id: i64, label: &str, option_id: i64| TreeChoice {
        dp_choice_id,
        div_choice_catalog_id: catalog_id,
        label: label.to_string(),
        is_active: true,
        options: vec![TreeOption {
            plan_option_id: option_id,
            label: format!("{} option", label),
            is_active: true,
            quantity: 0,
            is_selected: false,
            is_pending_addition: false,
        }],
        quantity: 0,
        is_selected: false,
        is_pending_addition: false,
        selected_attributes: Vec::new(),
        selected_locations: Vec::new(),
    };

    DecisionTree {
        tree_version_id: DEMO_TREE_VERSION_ID,
        plan_id: DEMO_PLAN_ID,
        groups: vec![
            TreeGroup {
                id: 1,
                label: "Exterior".to_string(),
                sub_groups: vec![TreeSubGroup {
                    id: 11,
                    label: "Elevation".to_string(),
                    points: vec![DecisionPoint {
                        id: 111,
                        label: "Brick Color".to_string(),
                        construction_stage_id: Some(1),
                        choices: vec![
                            choice(1, 100, "Red Brick", 1100),
                            choice(2, 200, "Gray Brick", 1200),
                        ],
                        is_past_cutoff: false,
                    }],
                }],
            },
            TreeGroup {
                id: 2,
                label: "Interior".to_string(),
                sub_groups: vec![TreeSubGroup {
                    id: 21,
                    label: "Kitchen".to_string(),
                    points: vec![DecisionPoint {
                        id: 211,
                        label: "Countertops".to_string(),
                        construction_stage_id: Some(3),
                        choices: vec![
                            choice(3, 300, "Granite", 1300),
                            choice(4, 400, "Quartz", 1400),
                        ],
                        is_past_cutoff: false,
                    }],
                }],
            },
        ],
    }
}

pub fn demo_rules() -> RuleSet {
    RuleSet {
        choice_rules: vec![ChoiceRule {
            id: 1,
            rule_type: RuleType::MustNotHave,
            dp_choice_ids: vec![1, 2],
        }],
        point_rules: Vec::new(),
    }
}

pub fn demo_plan_options() -> Vec<PlanOption> {
    vec![
        PlanOption {
            plan_option_id: 1100,
            name: "Red Brick Upgrade".to_string(),
            is_active: true,
            list_price: Some(2500.0),
        },
        PlanOption {
            plan_option_id: 1300,
            name: "Granite Countertops".to_string(),
            is_active: true,
            list_price: Some(4800.0),
        },
    ]
}

pub fn demo_option_images() -> Vec<OptionImage> {
    vec![OptionImage {
        plan_option_id: 1100,
        image_url: "https://images.example.com/options/1100.jpg".to_string(),
        sort_key: 1,
    }]
}

pub fn demo_lot() -> Lot {
    Lot {
        id: DEMO_LOT_ID,
        lot_block: "7A".to_string(),
        street_address: Some("214 Willow Creek Dr".to_string()),
    }
}

/// A job on the demo plan with one baseline choice and one pending group
/// that swaps it for another.
pub fn demo_job() -> Job {
    let baseline = JobChoice {
        id: generate_id(),
        dp_choice_id: 1,
        div_choice_catalog_id: 100,
        quantity: 1,
        attributes: Vec::new(),
        locations: Vec::new(),
    };

    let mut order = ChangeOrder::new(ChangeOrderType::ChoiceAttribute);
    order.choices.push(ChangeOrderChoice {
        id: generate_id(),
        dp_choice_id: 1,
        div_choice_catalog_id: Some(100),
        action: DeltaAction::Delete,
        quantity: 0,
        attributes: Vec::new(),
        locations: Vec::new(),
    });
    order.choices.push(ChangeOrderChoice {
        id: generate_id(),
        dp_choice_id: 3,
        // left unresolved on purpose; the loader backfills it
        div_choice_catalog_id: None,
        action: DeltaAction::Add,
        quantity: 1,
        attributes: Vec::new(),
        locations: Vec::new(),
    });

    let group = ChangeOrderGroup {
        id: generate_id(),
        sales_status: SalesStatus::Pending,
        construction_status: ConstructionStatus::Pending,
        change_orders: vec![order],
        created_by: "demo".to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
    };

    Job {
        id: generate_id(),
        plan_id: Some(DEMO_PLAN_ID),
        lot_id: Some(DEMO_LOT_ID),
        handing: Some(Handing::Left),
        choices: vec![baseline],
        plan_options: Vec::new(),
        change_order_groups: vec![group],
        stage_history: vec![
            ConstructionStage::started(
                1,
                "foundation",
                Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
            ),
            ConstructionStage::pending(2, "framing"),
            ConstructionStage::pending(3, "finish"),
        ],
    }
}

pub fn demo_sales_agreement(job_id: Id) -> SalesAgreement {
    SalesAgreement {
        id: generate_id(),
        job_id,
        status: SalesStatus::Signed,
    }
}

/// Populate a store with the demo fixtures and return the sales agreement
/// id to load.
pub fn load_seed_data(store: &InMemoryStore) -> Id {
    store.insert_community(demo_community());
    store.insert_catalog(demo_tree(), demo_rules());
    store.insert_plan_options(DEMO_PLAN_ID, demo_plan_options());
    store.insert_option_images(DEMO_TREE_VERSION_ID, demo_option_images());
    store.insert_web_plan_mapping(DEMO_PLAN_ID, vec![DEMO_PLAN_ID]);
    store.insert_catalog_choice_id(3, 300);
    store.insert_lot(demo_lot());

    let job = demo_job();
    let agreement = demo_sales_agreement(job.id.clone());
    let agreement_id = agreement.id.clone();
    store.insert_job(job);
    store.insert_sales_agreement(agreement);
    agreement_id
}
