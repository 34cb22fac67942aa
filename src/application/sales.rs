//! CRM-lite use cases with reference checks.

use crate::domain::crm::{
    Campaign, CampaignInput, Funnel, FunnelInput, Lead, LeadInput, Segment, SegmentInput,
};
use crate::ports::repository::{CrmRepository, RepositoryError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SalesError {
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

fn invalid(message: impl Into<String>) -> SalesError {
    SalesError::Invalid(message.into())
}

pub struct SalesService {
    repo: Arc<dyn CrmRepository>,
}

impl SalesService {
    pub fn new(repo: Arc<dyn CrmRepository>) -> Self {
        Self { repo }
    }

    async fn check_lead(&self, input: &LeadInput) -> Result<(), SalesError> {
        if input.name.trim().is_empty() {
            return Err(invalid("name is required"));
        }
        let email = input.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(invalid("a valid email is required"));
        }
        if let Some(segment_id) = &input.segment_id {
            if self.repo.get_segment(segment_id).await?.is_none() {
                return Err(invalid(format!("segment {} does not exist", segment_id)));
            }
        }
        match (&input.funnel_id, &input.funnel_stage) {
            (Some(funnel_id), stage) => {
                let funnel = self
                    .repo
                    .get_funnel(funnel_id)
                    .await?
                    .ok_or_else(|| invalid(format!("funnel {} does not exist", funnel_id)))?;
                if let Some(stage) = stage {
                    if !funnel.has_stage(stage) {
                        return Err(invalid(format!(
                            "stage '{}' is not part of funnel {}",
                            stage, funnel.name
                        )));
                    }
                }
            }
            (None, Some(_)) => return Err(invalid("funnelStage requires funnelId")),
            (None, None) => {}
        }
        Ok(())
    }

    pub async fn create_lead(&self, input: LeadInput) -> Result<Lead, SalesError> {
        self.check_lead(&input).await?;
        let lead = Lead::from_input(input);
        self.repo.insert_lead(lead.clone()).await?;
        info!(lead_id = %lead.id, "lead created");
        Ok(lead)
    }

    pub async fn get_lead(&self, id: &str) -> Result<Lead, SalesError> {
        Ok(self
            .repo
            .get_lead(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("lead", id))?)
    }

    pub async fn list_leads(&self) -> Result<Vec<Lead>, SalesError> {
        Ok(self.repo.list_leads().await?)
    }

    pub async fn update_lead(&self, id: &str, input: LeadInput) -> Result<Lead, SalesError> {
        let mut lead = self.get_lead(id).await?;
        self.check_lead(&input).await?;
        lead.apply(input);
        self.repo.update_lead(lead.clone()).await?;
        Ok(lead)
    }

    pub async fn delete_lead(&self, id: &str) -> Result<(), SalesError> {
        self.repo.delete_lead(id).await?;
        info!(lead_id = id, "lead deleted");
        Ok(())
    }

    pub async fn create_segment(&self, input: SegmentInput) -> Result<Segment, SalesError> {
        if input.name.trim().is_empty() {
            return Err(invalid("name is required"));
        }
        let segment = Segment::from_input(input);
        self.repo.insert_segment(segment.clone()).await?;
        Ok(segment)
    }

    pub async fn list_segments(&self) -> Result<Vec<Segment>, SalesError> {
        Ok(self.repo.list_segments().await?)
    }

    pub async fn create_funnel(&self, input: FunnelInput) -> Result<Funnel, SalesError> {
        if input.name.trim().is_empty() {
            return Err(invalid("name is required"));
        }
        let funnel = Funnel::from_input(input);
        if funnel.stages.is_empty() {
            return Err(invalid("a funnel needs at least one stage"));
        }
        self.repo.insert_funnel(funnel.clone()).await?;
        Ok(funnel)
    }

    pub async fn list_funnels(&self) -> Result<Vec<Funnel>, SalesError> {
        Ok(self.repo.list_funnels().await?)
    }

    pub async fn create_campaign(&self, input: CampaignInput) -> Result<Campaign, SalesError> {
        if input.name.trim().is_empty() {
            return Err(invalid("name is required"));
        }
        if self.repo.get_segment(&input.segment_id).await?.is_none() {
            return Err(invalid(format!("segment {} does not exist", input.segment_id)));
        }
        let campaign = Campaign::from_input(input);
        self.repo.insert_campaign(campaign.clone()).await?;
        Ok(campaign)
    }

    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>, SalesError> {
        Ok(self.repo.list_campaigns().await?)
    }

    /// Leads matching a segment's criteria or explicitly assigned to it.
    pub async fn segment_members(&self, segment_id: &str) -> Result<Vec<Lead>, SalesError> {
        let segment = self
            .repo
            .get_segment(segment_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("segment", segment_id))?;
        Ok(self
            .repo
            .list_leads()
            .await?
            .into_iter()
            .filter(|lead| {
                lead.segment_id.as_deref() == Some(segment.id.as_str())
                    || (!segment.criteria.is_empty() && segment.matches(lead))
            })
            .collect())
    }
}
