use crate::domain::crm::{Campaign, Funnel, Lead, Segment};
use crate::domain::jobs::{JobTransitionError, VideoJob};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} {id} already exists")]
    Duplicate { kind: &'static str, id: String },

    #[error(transparent)]
    Transition(#[from] JobTransitionError),
}

impl RepositoryError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        RepositoryError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Storage of video jobs. Updates go through the `VideoJob` transition
/// methods so a terminal job cannot be modified.
#[async_trait]
pub trait VideoJobRepository: Send + Sync {
    async fn insert(&self, job: VideoJob) -> Result<(), RepositoryError>;

    async fn get(&self, id: &str) -> Result<Option<VideoJob>, RepositoryError>;

    /// All jobs, newest first.
    async fn list(&self) -> Result<Vec<VideoJob>, RepositoryError>;

    async fn set_progress(&self, id: &str, progress: u8) -> Result<VideoJob, RepositoryError>;

    async fn complete(&self, id: &str, output_url: &str) -> Result<VideoJob, RepositoryError>;

    async fn fail(&self, id: &str, message: &str) -> Result<VideoJob, RepositoryError>;
}

/// Storage of CRM-lite records.
#[async_trait]
pub trait CrmRepository: Send + Sync {
    async fn insert_lead(&self, lead: Lead) -> Result<(), RepositoryError>;
    async fn get_lead(&self, id: &str) -> Result<Option<Lead>, RepositoryError>;
    async fn list_leads(&self) -> Result<Vec<Lead>, RepositoryError>;
    async fn update_lead(&self, lead: Lead) -> Result<(), RepositoryError>;
    async fn delete_lead(&self, id: &str) -> Result<(), RepositoryError>;

    async fn insert_segment(&self, segment: Segment) -> Result<(), RepositoryError>;
    async fn get_segment(&self, id: &str) -> Result<Option<Segment>, RepositoryError>;
    async fn list_segments(&self) -> Result<Vec<Segment>, RepositoryError>;

    async fn insert_funnel(&self, funnel: Funnel) -> Result<(), RepositoryError>;
    async fn get_funnel(&self, id: &str) -> Result<Option<Funnel>, RepositoryError>;
    async fn list_funnels(&self) -> Result<Vec<Funnel>, RepositoryError>;

    async fn insert_campaign(&self, campaign: Campaign) -> Result<(), RepositoryError>;
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, RepositoryError>;
}
