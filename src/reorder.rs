use serde::Serialize;

use crate::models::Project;

/// Direction of a move action on the project list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// One row of a reorder batch, upserted into the `projects` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderUpdate {
    pub id: i64,
    pub sort_order: i32,
}

/// Compute the batch of sort_order updates for moving one project.
///
/// `projects` must be the current ordering, ascending by sort_order, as
/// just fetched from the store. Only the relative order of the rows is
/// trusted; prior sort_order values may have gaps and are discarded.
///
/// Returns None when the move is a no-op: the target is already at the
/// boundary in that direction, or the id is not present. Otherwise the
/// target swaps with its immediate neighbor and the batch reassigns the
/// dense sequence 0..N-1 over the new positions.
pub fn plan_move(
    projects: &[Project],
    target_id: i64,
    direction: MoveDirection,
) -> Option<Vec<OrderUpdate>> {
    let position = projects.iter().position(|p| p.id == target_id)?;

    let neighbor = match direction {
        MoveDirection::Up => position.checked_sub(1)?,
        MoveDirection::Down => {
            if position + 1 >= projects.len() {
                return None;
            }
            position + 1
        }
    };

    let mut ids: Vec<i64> = projects.iter().map(|p| p.id).collect();
    ids.swap(position, neighbor);

    Some(
        ids.into_iter()
            .enumerate()
            .map(|(i, id)| OrderUpdate {
                id,
                sort_order: i as i32,
            })
            .collect(),
    )
}

/// The sort_order for a freshly inserted project: one past the current
/// maximum, or 0 for an empty portfolio.
pub fn next_sort_order(projects: &[Project]) -> i32 {
    projects
        .iter()
        .map(|p| p.sort_order)
        .max()
        .map_or(0, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: i64, sort_order: i32) -> Project {
        Project {
            id,
            title: format!("project {}", id),
            stack: String::new(),
            desc: String::new(),
            image_url: None,
            sort_order,
        }
    }

    fn orders(batch: &[OrderUpdate]) -> Vec<(i64, i32)> {
        batch.iter().map(|u| (u.id, u.sort_order)).collect()
    }

    #[test]
    fn move_up_on_first_is_noop() {
        let rows = vec![project(1, 0), project(2, 1), project(3, 2)];
        assert!(plan_move(&rows, 1, MoveDirection::Up).is_none());
    }

    #[test]
    fn move_down_on_last_is_noop() {
        let rows = vec![project(1, 0), project(2, 1), project(3, 2)];
        assert!(plan_move(&rows, 3, MoveDirection::Down).is_none());
    }

    #[test]
    fn single_row_move_up_is_noop() {
        let rows = vec![project(7, 0)];
        assert!(plan_move(&rows, 7, MoveDirection::Up).is_none());
        assert!(plan_move(&rows, 7, MoveDirection::Down).is_none());
    }

    #[test]
    fn unknown_id_is_noop() {
        let rows = vec![project(1, 0), project(2, 1)];
        assert!(plan_move(&rows, 99, MoveDirection::Up).is_none());
    }

    #[test]
    fn move_middle_up_swaps_with_predecessor() {
        // A(0), B(1), C(2); move B up -> B=0, A=1, C=2
        let rows = vec![project(10, 0), project(20, 1), project(30, 2)];
        let batch = plan_move(&rows, 20, MoveDirection::Up).unwrap();
        assert_eq!(orders(&batch), vec![(20, 0), (10, 1), (30, 2)]);
    }

    #[test]
    fn move_down_swaps_with_successor() {
        let rows = vec![project(10, 0), project(20, 1), project(30, 2)];
        let batch = plan_move(&rows, 10, MoveDirection::Down).unwrap();
        assert_eq!(orders(&batch), vec![(20, 0), (10, 1), (30, 2)]);
    }

    #[test]
    fn batch_is_dense_even_from_gapped_input() {
        // Stale orderings with gaps are normalized to 0..N-1
        let rows = vec![project(1, 3), project(2, 7), project(3, 9), project(4, 12)];
        let batch = plan_move(&rows, 3, MoveDirection::Up).unwrap();
        assert_eq!(orders(&batch), vec![(1, 0), (3, 1), (2, 2), (4, 3)]);
        let assigned: Vec<i32> = batch.iter().map(|u| u.sort_order).collect();
        assert_eq!(assigned, vec![0, 1, 2, 3]);
    }

    #[test]
    fn untouched_rows_keep_relative_order() {
        let rows = vec![
            project(1, 0),
            project(2, 1),
            project(3, 2),
            project(4, 3),
            project(5, 4),
        ];
        let batch = plan_move(&rows, 3, MoveDirection::Down).unwrap();
        let ids: Vec<i64> = batch.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 3, 5]);
    }

    #[test]
    fn next_sort_order_appends_after_max() {
        assert_eq!(next_sort_order(&[]), 0);

        let rows = vec![project(1, 0), project(2, 1), project(3, 2)];
        assert_eq!(next_sort_order(&rows), 3);

        // Gaps don't matter, only the maximum does
        let gapped = vec![project(1, 2), project(2, 8)];
        assert_eq!(next_sort_order(&gapped), 9);
    }
}
