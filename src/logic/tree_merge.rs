use std::collections::{HashMap, HashSet};

use crate::logic::resolver::pending_addition_catalog_ids;
use crate::model::{
    ChangeOrderGroup, ChangeOrderPlanOption, DecisionTree, DeltaAction, JobChoice,
};

/// Fold a resolved configuration onto a catalog tree.
///
/// Each catalog choice node matched by catalog id receives the resolved
/// quantity and attribute/location selections and is marked selected; a
/// match originating from an Add delta of the current group is additionally
/// marked as a pending addition. Option nodes are matched the same way
/// against the resolved plan options. Unmatched nodes keep their catalog
/// defaults.
///
/// Pure function of its inputs: identical inputs yield a structurally
/// identical tree.
pub fn merge_into_tree(
    tree: &DecisionTree,
    resolved_choices: &[JobChoice],
    resolved_plan_options: &[ChangeOrderPlanOption],
    current_group: Option<&ChangeOrderGroup>,
) -> DecisionTree {
    let choices_by_catalog_id: HashMap<i64, &JobChoice> = resolved_choices
        .iter()
        .map(|choice| (choice.div_choice_catalog_id, choice))
        .collect();
    let options_by_id: HashMap<i64, &ChangeOrderPlanOption> = resolved_plan_options
        .iter()
        .filter(|option| option.action != DeltaAction::Delete)
        .map(|option| (option.plan_option_id, option))
        .collect();
    let pending_additions: HashSet<i64> = current_group
        .map(pending_addition_catalog_ids)
        .unwrap_or_default();

    let mut merged = tree.clone();
    for group in &mut merged.groups {
        for sub_group in &mut group.sub_groups {
            for point in &mut sub_group.points {
                for choice in &mut point.choices {
                    if let Some(resolved) = choices_by_catalog_id.get(&choice.div_choice_catalog_id)
                    {
                        choice.is_selected = true;
                        choice.quantity = resolved.quantity;
                        choice.selected_attributes = resolved.attributes.clone();
                        choice.selected_locations = resolved.locations.clone();
                        choice.is_pending_addition =
                            pending_additions.contains(&choice.div_choice_catalog_id);
                    }
                    for option in &mut choice.options {
                        if let Some(resolved) = options_by_id.get(&option.plan_option_id) {
                            option.is_selected = true;
                            option.quantity = resolved.quantity;
                            option.is_pending_addition = resolved.action == DeltaAction::Add;
                        }
                    }
                }
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        generate_id, ChangeOrder, ChangeOrderChoice, ChangeOrderType, ConstructionStatus,
        DecisionPoint, JobChoiceAttribute, SalesStatus, TreeChoice, TreeGroup, TreeOption,
        TreeSubGroup,
    };
    use chrono::Utc;

    fn catalog_tree() -> DecisionTree {
        DecisionTree {
            tree_version_id: 1,
            plan_id: 10,
            groups: vec![TreeGroup {
                id: 1,
                label: "Exterior".to_string(),
                sub_groups: vec![TreeSubGroup {
                    id: 11,
                    label: "Facade".to_string(),
                    points: vec![DecisionPoint {
                        id: 111,
                        label: "Brick".to_string(),
                        construction_stage_id: None,
                        choices: vec![
                            tree_choice(1, 100),
                            tree_choice(2, 200),
                        ],
                        is_past_cutoff: false,
                    }],
                }],
            }],
        }
    }

    fn tree_choice(dp_choice_id: i64, catalog_id: i64) -> TreeChoice {
        TreeChoice {
            dp_choice_id,
            div_choice_catalog_id: catalog_id,
            label: format!("choice-{}", dp_choice_id),
            is_active: true,
            options: vec![TreeOption {
                plan_option_id: catalog_id * 10,
                label: format!("option-{}", catalog_id),
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
        }
    }

    fn resolved_choice(catalog_id: i64, quantity: i32) -> JobChoice {
        JobChoice {
            id: generate_id(),
            dp_choice_id: catalog_id,
            div_choice_catalog_id: catalog_id,
            quantity,
            attributes: vec![JobChoiceAttribute {
                attribute_group_id: 1,
                attribute_id: 2,
                attribute_name: None,
            }],
            locations: Vec::new(),
        }
    }

    fn group_adding(catalog_id: i64) -> ChangeOrderGroup {
        let mut order = ChangeOrder::new(ChangeOrderType::ChoiceAttribute);
        order.choices.push(ChangeOrderChoice {
            id: generate_id(),
            dp_choice_id: catalog_id,
            div_choice_catalog_id: Some(catalog_id),
            action: DeltaAction::Add,
            quantity: 1,
            attributes: Vec::new(),
            locations: Vec::new(),
        });
        ChangeOrderGroup {
            id: generate_id(),
            sales_status: SalesStatus::Pending,
            construction_status: ConstructionStatus::Pending,
            change_orders: vec![order],
            created_by: "test".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn matched_choices_receive_selection_and_quantity() {
        let tree = catalog_tree();
        let resolved = vec![resolved_choice(100, 2)];

        let merged = merge_into_tree(&tree, &resolved, &[], None);
        let choices = &merged.groups[0].sub_groups[0].points[0].choices;
        assert!(choices[0].is_selected);
        assert_eq!(choices[0].quantity, 2);
        assert_eq!(choices[0].selected_attributes.len(), 1);
        assert!(!choices[0].is_pending_addition);
        assert!(!choices[1].is_selected);
    }

    #[test]
    fn additions_from_the_current_group_are_marked_pending() {
        let tree = catalog_tree();
        let group = group_adding(200);
        let resolved = vec![resolved_choice(100, 1), resolved_choice(200, 1)];

        let merged = merge_into_tree(&tree, &resolved, &[], Some(&group));
        let choices = &merged.groups[0].sub_groups[0].points[0].choices;
        assert!(!choices[0].is_pending_addition);
        assert!(choices[1].is_selected);
        assert!(choices[1].is_pending_addition);
    }

    #[test]
    fn option_nodes_match_resolved_plan_options() {
        let tree = catalog_tree();
        let plan_options = vec![ChangeOrderPlanOption {
            id: generate_id(),
            plan_option_id: 1000,
            action: DeltaAction::Add,
            quantity: 3,
        }];

        let merged = merge_into_tree(&tree, &[], &plan_options, None);
        let option = &merged.groups[0].sub_groups[0].points[0].choices[0].options[0];
        assert!(option.is_selected);
        assert_eq!(option.quantity, 3);
        assert!(option.is_pending_addition);
    }

    #[test]
    fn delete_tagged_plan_options_do_not_select() {
        let tree = catalog_tree();
        let plan_options = vec![ChangeOrderPlanOption {
            id: generate_id(),
            plan_option_id: 1000,
            action: DeltaAction::Delete,
            quantity: 0,
        }];

        let merged = merge_into_tree(&tree, &[], &plan_options, None);
        let option = &merged.groups[0].sub_groups[0].points[0].choices[0].options[0];
        assert!(!option.is_selected);
    }

    #[test]
    fn merge_is_pure_over_identical_inputs() {
        let tree = catalog_tree();
        let group = group_adding(200);
        let resolved = vec![resolved_choice(100, 2), resolved_choice(200, 1)];

        let first = merge_into_tree(&tree, &resolved, &[], Some(&group));
        let second = merge_into_tree(&tree, &resolved, &[], Some(&group));
        assert_eq!(first, second);
    }
}
