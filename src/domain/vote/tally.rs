use crate::domain::election::Election;

/// Vote count for one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyEntry {
    pub candidate_id: i32,
    pub candidate_name: String,
    pub votes: u64,
}

/// Results of one election: every candidate of its category, ordered by
/// candidate id, zero-vote candidates included.
#[derive(Debug, Clone)]
pub struct Tally {
    pub election: Election,
    pub entries: Vec<TallyEntry>,
}

impl Tally {
    pub fn total_votes(&self) -> u64 {
        self.entries.iter().map(|e| e.votes).sum()
    }

    /// Candidates sharing the highest count; empty when nobody has voted.
    pub fn leaders(&self) -> Vec<&TallyEntry> {
        let top = self.entries.iter().map(|e| e.votes).max().unwrap_or(0);
        if top == 0 {
            return Vec::new();
        }
        self.entries.iter().filter(|e| e.votes == top).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use crate::domain::election::ElectionWindow;
    use chrono::{Duration, TimeZone, Utc};

    fn tally(counts: &[u64]) -> Tally {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        Tally {
            election: Election {
                id: 1,
                category: Category {
                    id: 1,
                    name: "president".into(),
                },
                window: ElectionWindow::new(t0, t0 + Duration::hours(1)).unwrap(),
                created_at: t0,
            },
            entries: counts
                .iter()
                .enumerate()
                .map(|(i, votes)| TallyEntry {
                    candidate_id: i as i32 + 1,
                    candidate_name: format!("C{}", i + 1),
                    votes: *votes,
                })
                .collect(),
        }
    }

    #[test]
    fn total_sums_entries() {
        assert_eq!(tally(&[3, 0, 2]).total_votes(), 5);
        assert_eq!(tally(&[]).total_votes(), 0);
    }

    #[test]
    fn leaders_include_ties() {
        let t = tally(&[3, 1, 3]);
        let ids: Vec<i32> = t.leaders().iter().map(|e| e.candidate_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn no_votes_means_no_leader() {
        assert!(tally(&[0, 0]).leaders().is_empty());
    }
}
