//! Candidate domain entity

use chrono::{DateTime, Utc};

use crate::domain::category::Category;

#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: i32,
    pub name: String,
    pub category: Category,
    /// Relative path of the uploaded photo (`uploads/<file>`)
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    /// Whether this candidate may receive votes in the given category
    pub fn runs_in(&self, category_id: i32) -> bool {
        self.category.id == category_id
    }
}

#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub name: String,
    pub category_id: i32,
    pub photo: Option<String>,
}
