//! Election window resolution
//!
//! When several open windows contain `now` (elections in different
//! categories may run at the same time) the lowest id wins, so the answer
//! never depends on the order rows come back from storage.

use chrono::{DateTime, Utc};

use super::model::{Election, ElectionWindow};

/// The election open at `now`; lowest id on ties, `None` if nothing is open.
pub fn current_election<'a, I>(now: DateTime<Utc>, elections: I) -> Option<&'a Election>
where
    I: IntoIterator<Item = &'a Election>,
{
    elections
        .into_iter()
        .filter(|e| e.is_open_at(now))
        .min_by_key(|e| e.id)
}

/// Every election open at `now`, ordered by id.
pub fn active_elections<'a, I>(now: DateTime<Utc>, elections: I) -> Vec<&'a Election>
where
    I: IntoIterator<Item = &'a Election>,
{
    let mut open: Vec<&Election> = elections
        .into_iter()
        .filter(|e| e.is_open_at(now))
        .collect();
    open.sort_by_key(|e| e.id);
    open
}

/// Lowest-id election in `category_id` whose window intersects `window`.
pub fn find_overlap<'a, I>(
    category_id: i32,
    window: &ElectionWindow,
    elections: I,
) -> Option<&'a Election>
where
    I: IntoIterator<Item = &'a Election>,
{
    elections
        .into_iter()
        .filter(|e| e.category.id == category_id && e.window.overlaps(window))
        .min_by_key(|e| e.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn election(id: i32, category_id: i32, start_h: i64, end_h: i64) -> Election {
        Election {
            id,
            category: Category {
                id: category_id,
                name: format!("category-{}", category_id),
            },
            window: ElectionWindow::new(
                t0() + Duration::hours(start_h),
                t0() + Duration::hours(end_h),
            )
            .unwrap(),
            created_at: t0(),
        }
    }

    #[test]
    fn no_elections_means_no_current_election() {
        let none: Vec<Election> = Vec::new();
        assert!(current_election(t0(), &none).is_none());
    }

    #[test]
    fn current_election_iff_window_contains_now() {
        let elections = vec![election(1, 1, 0, 1), election(2, 2, 3, 4)];

        assert_eq!(current_election(t0(), &elections).map(|e| e.id), Some(1));
        assert_eq!(
            current_election(t0() + Duration::hours(1), &elections).map(|e| e.id),
            Some(1)
        );
        assert_eq!(
            current_election(t0() + Duration::minutes(210), &elections).map(|e| e.id),
            Some(2)
        );
        assert!(current_election(t0() + Duration::hours(2), &elections).is_none());
        assert!(current_election(t0() - Duration::seconds(1), &elections).is_none());
    }

    #[test]
    fn ties_resolve_to_lowest_id_regardless_of_order() {
        let forward = vec![election(4, 1, 0, 2), election(9, 2, 0, 2), election(6, 3, 0, 2)];
        let mut reversed = forward.clone();
        reversed.reverse();

        let now = t0() + Duration::minutes(30);
        assert_eq!(current_election(now, &forward).map(|e| e.id), Some(4));
        assert_eq!(current_election(now, &reversed).map(|e| e.id), Some(4));
    }

    #[test]
    fn active_elections_are_sorted_by_id() {
        let elections = vec![election(5, 1, 0, 2), election(2, 2, 0, 2), election(3, 3, 5, 6)];
        let ids: Vec<i32> = active_elections(t0(), &elections)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![2, 5]);
    }

    #[test]
    fn overlap_is_scoped_to_category() {
        let elections = vec![election(1, 1, 0, 2), election(2, 2, 0, 2)];
        let window = ElectionWindow::new(t0() + Duration::hours(1), t0() + Duration::hours(3)).unwrap();

        assert_eq!(find_overlap(1, &window, &elections).map(|e| e.id), Some(1));
        assert_eq!(find_overlap(2, &window, &elections).map(|e| e.id), Some(2));
        assert!(find_overlap(3, &window, &elections).is_none());

        let later = ElectionWindow::new(t0() + Duration::hours(5), t0() + Duration::hours(6)).unwrap();
        assert!(find_overlap(1, &later, &elections).is_none());
    }
}
