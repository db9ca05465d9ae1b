use crate::domain::{DomainError, DomainResult};

pub const MAX_CATEGORY_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// Canonical category name: trimmed, inner whitespace collapsed, lower-cased.
pub fn normalize_category_name(raw: &str) -> DomainResult<String> {
    let name = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if name.is_empty() {
        return Err(DomainError::Validation("Category must not be empty".into()));
    }
    if name.chars().count() > MAX_CATEGORY_LEN {
        return Err(DomainError::Validation(format!(
            "Category must be at most {} characters",
            MAX_CATEGORY_LEN
        )));
    }
    Ok(name)
}
