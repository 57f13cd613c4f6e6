use std::collections::HashMap;

use itertools::Itertools;

use crate::model::{ConstructionStage, DecisionTree, Job};

/// Flag every decision point whose construction stage has already been
/// reached, making it read-only for buyer-facing edits.
///
/// Stage rank comes from the job's chronologically ordered history, with
/// not-yet-started stages ordered after all started ones; the current stage
/// is the latest started one. Annotation only: selections are never removed
/// or altered, and a point already flagged stays flagged.
pub fn mark_past_cutoff(tree: &DecisionTree, job: &Job) -> DecisionTree {
    let ordered: Vec<&ConstructionStage> = job
        .stage_history
        .iter()
        .sorted_by_key(|stage| (stage.started_on.is_none(), stage.started_on))
        .collect();
    let rank_by_stage_id: HashMap<i64, usize> = ordered
        .iter()
        .enumerate()
        .map(|(rank, stage)| (stage.stage_id, rank))
        .collect();

    let mut marked = tree.clone();
    let Some(current_rank) = ordered.iter().rposition(|stage| stage.started_on.is_some()) else {
        // construction has not started; nothing is locked
        return marked;
    };

    for group in &mut marked.groups {
        for sub_group in &mut group.sub_groups {
            for point in &mut sub_group.points {
                let past = point
                    .construction_stage_id
                    .and_then(|stage_id| rank_by_stage_id.get(&stage_id))
                    .map(|rank| *rank <= current_rank)
                    .unwrap_or(false);
                if past {
                    point.is_past_cutoff = true;
                }
            }
        }
    }
    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        generate_id, DecisionPoint, Handing, TreeGroup, TreeSubGroup,
    };
    use chrono::{TimeZone, Utc};

    fn tree_with_stage_points(stage_ids: &[Option<i64>]) -> DecisionTree {
        DecisionTree {
            tree_version_id: 1,
            plan_id: 10,
            groups: vec![TreeGroup {
                id: 1,
                label: "Structure".to_string(),
                sub_groups: vec![TreeSubGroup {
                    id: 11,
                    label: "Framing".to_string(),
                    points: stage_ids
                        .iter()
                        .enumerate()
                        .map(|(i, stage_id)| DecisionPoint {
                            id: i as i64,
                            label: format!("point-{}", i),
                            construction_stage_id: *stage_id,
                            choices: Vec::new(),
                            is_past_cutoff: false,
                        })
                        .collect(),
                }],
            }],
        }
    }

    fn job_with_stages(started_through: usize) -> Job {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let names = ["foundation", "framing", "drywall", "finish"];
        Job {
            id: generate_id(),
            plan_id: Some(10),
            lot_id: Some(7),
            handing: Some(Handing::Left),
            choices: Vec::new(),
            plan_options: Vec::new(),
            change_order_groups: Vec::new(),
            stage_history: names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    if i <= started_through {
                        ConstructionStage::started(
                            i as i64 + 1,
                            *name,
                            start + chrono::Duration::days(i as i64 * 30),
                        )
                    } else {
                        ConstructionStage::pending(i as i64 + 1, *name)
                    }
                })
                .collect(),
        }
    }

    fn cutoff_flags(tree: &DecisionTree) -> Vec<bool> {
        tree.groups[0].sub_groups[0]
            .points
            .iter()
            .map(|p| p.is_past_cutoff)
            .collect()
    }

    #[test]
    fn stages_at_or_before_the_current_stage_are_locked() {
        let tree = tree_with_stage_points(&[Some(1), Some(2), Some(3), Some(4)]);
        let job = job_with_stages(1); // foundation and framing started

        let marked = mark_past_cutoff(&tree, &job);
        assert_eq!(cutoff_flags(&marked), vec![true, true, false, false]);
    }

    #[test]
    fn advancing_the_stage_never_unlocks_a_point() {
        let tree = tree_with_stage_points(&[Some(1), Some(2), Some(3), Some(4)]);

        let early = mark_past_cutoff(&tree, &job_with_stages(1));
        let late = mark_past_cutoff(&early, &job_with_stages(2));
        assert_eq!(cutoff_flags(&late), vec![true, true, true, false]);
    }

    #[test]
    fn points_without_a_stage_are_never_locked() {
        let tree = tree_with_stage_points(&[None, Some(1)]);
        let job = job_with_stages(3);

        let marked = mark_past_cutoff(&tree, &job);
        assert_eq!(cutoff_flags(&marked), vec![false, true]);
    }

    #[test]
    fn no_started_stage_means_nothing_is_locked() {
        let tree = tree_with_stage_points(&[Some(1), Some(2)]);
        let mut job = job_with_stages(0);
        for stage in &mut job.stage_history {
            stage.started_on = None;
        }

        let marked = mark_past_cutoff(&tree, &job);
        assert_eq!(cutoff_flags(&marked), vec![false, false]);
    }
}
