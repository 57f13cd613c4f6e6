use std::collections::HashSet;

use log::warn;

use crate::logic::keyed::apply_keyed_deltas;
use crate::model::{
    ChangeOrderChoice, ChangeOrderChoiceAttribute, ChangeOrderGroup, ChangeOrderPlanOption,
    ChangeOrderType, ConstructionStatus, DeltaAction, Handing, Job, JobChoice, JobChoiceAttribute,
    JobChoiceLocation, ResolvedConfiguration, SalesStatus,
};

/// Change-order types that represent a configuration amendment; a group
/// whose first order carries one of these is preferred by current-group
/// selection.
const CONFIGURATION_ORDER_TYPES: [ChangeOrderType; 5] = [
    ChangeOrderType::ChoiceAttribute,
    ChangeOrderType::Elevation,
    ChangeOrderType::Handing,
    ChangeOrderType::SalesJio,
    ChangeOrderType::SpecJio,
];

/// Fixed order in which choice deltas are collected from a group's orders.
/// Duplicate target ids are not deduplicated, so application order matters.
const CHOICE_COLLECTION_ORDER: [ChangeOrderType; 4] = [
    ChangeOrderType::SalesJio,
    ChangeOrderType::ChoiceAttribute,
    ChangeOrderType::Elevation,
    ChangeOrderType::Plan,
];

/// Select the one authoritative pending group for a job, or None.
///
/// A group survives when its sales status is not Withdrawn/Resolved and,
/// once Approved, only while its construction status is still Pending.
pub fn select_current_group(job: &Job) -> Option<&ChangeOrderGroup> {
    let survivors: Vec<&ChangeOrderGroup> = job
        .change_order_groups
        .iter()
        .filter(|group| {
            !matches!(
                group.sales_status,
                SalesStatus::Withdrawn | SalesStatus::Resolved
            ) && (group.sales_status != SalesStatus::Approved
                || group.construction_status == ConstructionStatus::Pending)
        })
        .collect();

    survivors
        .iter()
        .copied()
        .find(|group| {
            group
                .change_orders
                .first()
                .map(|order| CONFIGURATION_ORDER_TYPES.contains(&order.order_type))
                .unwrap_or(false)
        })
        .or_else(|| survivors.first().copied())
}

/// Concatenate choice deltas from a group's SalesJIO, ChoiceAttribute,
/// Elevation and Plan orders, in that fixed order.
pub fn collect_choices(group: &ChangeOrderGroup) -> Vec<&ChangeOrderChoice> {
    CHOICE_COLLECTION_ORDER
        .iter()
        .flat_map(|order_type| group.orders_of_type(*order_type))
        .flat_map(|order| order.choices.iter())
        .collect()
}

/// Apply the current group's choice deltas to a copy of the baseline.
///
/// Application order is an invariant: all Deletes, then all Adds, then all
/// Changes. Deletes match by stable dp-choice id or catalog id; Changes match
/// by catalog id only, and an unmatched Change is dropped.
pub fn resolve_selected_choices(
    baseline: &[JobChoice],
    current: Option<&ChangeOrderGroup>,
) -> Vec<JobChoice> {
    let mut resolved: Vec<JobChoice> = baseline.to_vec();
    let Some(group) = current else {
        return resolved;
    };
    let deltas = collect_choices(group);

    for delta in deltas.iter().copied().filter(|d| d.action == DeltaAction::Delete) {
        resolved.retain(|choice| {
            choice.dp_choice_id != delta.dp_choice_id
                && Some(choice.div_choice_catalog_id) != delta.div_choice_catalog_id
        });
    }

    for delta in deltas.iter().copied().filter(|d| d.action == DeltaAction::Add) {
        resolved.push(job_choice_from_delta(delta));
    }

    for delta in deltas.iter().copied().filter(|d| d.action == DeltaAction::Change) {
        let target = match delta.div_choice_catalog_id {
            Some(catalog_id) => resolved
                .iter_mut()
                .find(|choice| choice.div_choice_catalog_id == catalog_id),
            None => None,
        };
        match target {
            Some(choice) => {
                merge_attributes_and_locations(choice, delta);
                choice.quantity = delta.quantity;
            }
            None => warn!(
                "change delta for dp choice {} has no matching baseline choice, dropping",
                delta.dp_choice_id
            ),
        }
    }

    resolved
}

/// Merge a Change delta's attribute and location lists into a matched choice.
///
/// Attributes are keyed by (attribute_group_id, attribute_id), locations by
/// (location_group_id, location_id); a Change-tagged location recurses one
/// level to merge that location's own attribute sub-list with the same rule.
pub fn merge_attributes_and_locations(choice: &mut JobChoice, delta: &ChangeOrderChoice) {
    apply_keyed_deltas(
        &mut choice.attributes,
        &delta.attributes,
        |a| (a.attribute_group_id, a.attribute_id),
        |d| (d.attribute_group_id, d.attribute_id),
        |d| d.action,
        job_attribute_from_delta,
        |_, _| {},
    );
    apply_keyed_deltas(
        &mut choice.locations,
        &delta.locations,
        |l| (l.location_group_id, l.location_id),
        |d| (d.location_group_id, d.location_id),
        |d| d.action,
        job_location_from_delta,
        |location, d| {
            apply_keyed_deltas(
                &mut location.attributes,
                &d.attributes,
                |a| (a.attribute_group_id, a.attribute_id),
                |ad| (ad.attribute_group_id, ad.attribute_id),
                |ad| ad.action,
                job_attribute_from_delta,
                |_, _| {},
            );
            location.quantity = d.quantity;
        },
    );
}

/// An Add entry overrides the baseline handing; a Delete entry clears it
/// only when its value equals the baseline; otherwise the baseline stands.
pub fn resolve_selected_handing(job: &Job, current: Option<&ChangeOrderGroup>) -> Option<Handing> {
    let Some(group) = current else {
        return job.handing;
    };
    let deltas: Vec<_> = group
        .change_orders
        .iter()
        .filter(|order| {
            matches!(
                order.order_type,
                ChangeOrderType::Handing | ChangeOrderType::HomesiteTransfer
            )
        })
        .flat_map(|order| order.handings.iter())
        .collect();

    if let Some(added) = deltas.iter().find(|d| d.action == DeltaAction::Add) {
        return Some(added.handing);
    }
    if deltas
        .iter()
        .any(|d| d.action == DeltaAction::Delete && Some(d.handing) == job.handing)
    {
        return None;
    }
    job.handing
}

/// Add-override pattern scoped to Plan change orders; the baseline plan is
/// the default.
pub fn resolve_selected_plan_id(job: &Job, current: Option<&ChangeOrderGroup>) -> Option<i64> {
    let Some(group) = current else {
        return job.plan_id;
    };
    group
        .orders_of_type(ChangeOrderType::Plan)
        .flat_map(|order| order.plans.iter())
        .find(|d| d.action == DeltaAction::Add)
        .map(|d| d.plan_id)
        .or(job.plan_id)
}

/// Add-override pattern scoped to HomesiteTransfer change orders; the
/// baseline lot is the default.
pub fn resolve_selected_lot_id(job: &Job, current: Option<&ChangeOrderGroup>) -> Option<i64> {
    let Some(group) = current else {
        return job.lot_id;
    };
    group
        .orders_of_type(ChangeOrderType::HomesiteTransfer)
        .flat_map(|order| order.lots.iter())
        .find(|d| d.action == DeltaAction::Add)
        .map(|d| d.lot_id)
        .or(job.lot_id)
}

/// Accumulate plan-option deltas across a group's orders.
///
/// SalesJIO and ChoiceAttribute option lists replace the prior accumulation;
/// Elevation's are appended. The asymmetry is intentional and preserved
/// exactly.
pub fn collect_plan_options(group: &ChangeOrderGroup) -> Vec<ChangeOrderPlanOption> {
    let mut accumulated: Vec<ChangeOrderPlanOption> = Vec::new();
    for order in &group.change_orders {
        match order.order_type {
            ChangeOrderType::SalesJio | ChangeOrderType::ChoiceAttribute => {
                accumulated = order.plan_options.clone();
            }
            ChangeOrderType::Elevation => {
                accumulated.extend(order.plan_options.iter().cloned());
            }
            _ => {}
        }
    }
    accumulated
}

/// Catalog ids of choices the current group adds on top of the baseline.
/// The merge engine marks these as pending additions.
pub fn pending_addition_catalog_ids(group: &ChangeOrderGroup) -> HashSet<i64> {
    collect_choices(group)
        .into_iter()
        .filter(|delta| delta.action == DeltaAction::Add)
        .filter_map(|delta| delta.div_choice_catalog_id)
        .collect()
}

/// Run the full resolution for a job: select the current group and derive
/// choices, handing, plan, lot, and plan options from the baseline plus that
/// group's deltas. Pure; malformed deltas degrade silently.
pub fn resolve(job: &Job) -> ResolvedConfiguration {
    let current = select_current_group(job);
    ResolvedConfiguration {
        selected_choices: resolve_selected_choices(&job.choices, current),
        selected_handing: resolve_selected_handing(job, current),
        selected_plan_id: resolve_selected_plan_id(job, current),
        selected_lot_id: resolve_selected_lot_id(job, current),
        selected_plan_options: current.map(collect_plan_options).unwrap_or_default(),
        current_group_id: current.map(|group| group.id.clone()),
    }
}

fn job_choice_from_delta(delta: &ChangeOrderChoice) -> JobChoice {
    JobChoice {
        id: crate::model::generate_id(),
        dp_choice_id: delta.dp_choice_id,
        // deltas that never went through catalog-id backfill carry no id yet
        div_choice_catalog_id: delta.div_choice_catalog_id.unwrap_or_default(),
        quantity: delta.quantity,
        attributes: delta
            .attributes
            .iter()
            .filter(|a| a.action == DeltaAction::Add)
            .map(job_attribute_from_delta)
            .collect(),
        locations: delta
            .locations
            .iter()
            .filter(|l| l.action == DeltaAction::Add)
            .map(job_location_from_delta)
            .collect(),
    }
}

fn job_attribute_from_delta(delta: &ChangeOrderChoiceAttribute) -> JobChoiceAttribute {
    JobChoiceAttribute {
        attribute_group_id: delta.attribute_group_id,
        attribute_id: delta.attribute_id,
        attribute_name: delta.attribute_name.clone(),
    }
}

fn job_location_from_delta(delta: &crate::model::ChangeOrderChoiceLocation) -> JobChoiceLocation {
    JobChoiceLocation {
        location_group_id: delta.location_group_id,
        location_id: delta.location_id,
        quantity: delta.quantity,
        attributes: delta
            .attributes
            .iter()
            .filter(|a| a.action == DeltaAction::Add)
            .map(job_attribute_from_delta)
            .collect(),
    }
}
