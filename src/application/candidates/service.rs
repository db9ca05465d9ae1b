use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    Candidate, Category, DomainError, DomainResult, NewCandidate, PhotoStore, RepositoryProvider,
};

pub const MAX_CANDIDATE_NAME_LEN: usize = 255;

/// Uploaded photo as received from the client
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct CandidateService {
    repos: Arc<dyn RepositoryProvider>,
    photos: Arc<dyn PhotoStore>,
}

impl CandidateService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, photos: Arc<dyn PhotoStore>) -> Self {
        Self { repos, photos }
    }

    /// Register a candidate in a category (created on first use).
    /// The photo, if any, is stored before the row is inserted and removed
    /// again when the insert fails.
    pub async fn add(
        &self,
        name: &str,
        category: &str,
        photo: Option<PhotoUpload>,
    ) -> DomainResult<Candidate> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("Candidate name is required".into()));
        }
        if name.chars().count() > MAX_CANDIDATE_NAME_LEN {
            return Err(DomainError::Validation(format!(
                "Candidate name must be at most {} characters",
                MAX_CANDIDATE_NAME_LEN
            )));
        }

        let category = self.repos.categories().get_or_create(category).await?;

        let photo = match photo {
            Some(upload) => Some(self.photos.save(&upload.file_name, &upload.bytes).await?),
            None => None,
        };

        let created = self
            .repos
            .candidates()
            .create(NewCandidate {
                name: name.to_string(),
                category_id: category.id,
                photo: photo.clone(),
            })
            .await;

        let candidate = match created {
            Ok(candidate) => candidate,
            Err(e) => {
                if let Some(reference) = photo {
                    if let Err(cleanup) = self.photos.remove(&reference).await {
                        warn!(photo = %reference, error = %cleanup, "Failed to remove orphaned photo");
                    }
                }
                return Err(e);
            }
        };

        info!(
            candidate_id = candidate.id,
            category = %candidate.category.name,
            "Candidate added"
        );
        Ok(candidate)
    }

    pub async fn list(&self) -> DomainResult<Vec<Candidate>> {
        self.repos.candidates().list().await
    }

    pub async fn categories(&self) -> DomainResult<Vec<Category>> {
        self.repos.categories().list().await
    }
}
