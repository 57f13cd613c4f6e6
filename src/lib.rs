pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export error types
pub use error::{LoadError, FRIENDLY_LOAD_MESSAGE};

// Export logic entry points
pub use logic::{
    collect_choices, collect_plan_options, mark_past_cutoff, merge_into_tree, resolve,
    resolve_selected_choices, resolve_selected_handing, resolve_selected_lot_id,
    resolve_selected_plan_id, select_current_group, LoadPhase, SalesAgreementLoader,
};

// Export all model types
pub use model::*;

// Export store types
pub use store::{CatalogStore, InMemoryStore, LotStore, SalesStore, Store};
