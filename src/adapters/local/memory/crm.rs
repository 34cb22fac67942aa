//! In-memory CrmRepository implementation.

use crate::domain::crm::{Campaign, Funnel, Lead, Segment};
use crate::ports::repository::{CrmRepository, RepositoryError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    leads: HashMap<String, Lead>,
    segments: HashMap<String, Segment>,
    funnels: HashMap<String, Funnel>,
    campaigns: HashMap<String, Campaign>,
}

#[derive(Debug, Default)]
pub struct MemoryCrm {
    tables: RwLock<Tables>,
}

impl MemoryCrm {
    pub fn new() -> Self {
        Self::default()
    }
}

fn insert_unique<T>(
    table: &mut HashMap<String, T>,
    kind: &'static str,
    id: &str,
    value: T,
) -> Result<(), RepositoryError> {
    if table.contains_key(id) {
        return Err(RepositoryError::Duplicate {
            kind,
            id: id.to_string(),
        });
    }
    table.insert(id.to_string(), value);
    Ok(())
}

/// Records ordered by creation time, oldest first.
fn sorted<T: Clone, K: Ord>(table: &HashMap<String, T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut values = table.values().cloned().collect::<Vec<_>>();
    values.sort_by_key(|v| key(v));
    values
}

#[async_trait]
impl CrmRepository for MemoryCrm {
    async fn insert_lead(&self, lead: Lead) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let id = lead.id.clone();
        insert_unique(&mut tables.leads, "lead", &id, lead)
    }

    async fn get_lead(&self, id: &str) -> Result<Option<Lead>, RepositoryError> {
        Ok(self.tables.read().await.leads.get(id).cloned())
    }

    async fn list_leads(&self) -> Result<Vec<Lead>, RepositoryError> {
        Ok(sorted(&self.tables.read().await.leads, |l| l.created_at))
    }

    async fn update_lead(&self, lead: Lead) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.leads.get_mut(&lead.id) {
            Some(existing) => {
                *existing = lead;
                Ok(())
            }
            None => Err(RepositoryError::not_found("lead", lead.id)),
        }
    }

    async fn delete_lead(&self, id: &str) -> Result<(), RepositoryError> {
        self.tables
            .write()
            .await
            .leads
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("lead", id))
    }

    async fn insert_segment(&self, segment: Segment) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let id = segment.id.clone();
        insert_unique(&mut tables.segments, "segment", &id, segment)
    }

    async fn get_segment(&self, id: &str) -> Result<Option<Segment>, RepositoryError> {
        Ok(self.tables.read().await.segments.get(id).cloned())
    }

    async fn list_segments(&self) -> Result<Vec<Segment>, RepositoryError> {
        Ok(sorted(&self.tables.read().await.segments, |s| s.created_at))
    }

    async fn insert_funnel(&self, funnel: Funnel) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let id = funnel.id.clone();
        insert_unique(&mut tables.funnels, "funnel", &id, funnel)
    }

    async fn get_funnel(&self, id: &str) -> Result<Option<Funnel>, RepositoryError> {
        Ok(self.tables.read().await.funnels.get(id).cloned())
    }

    async fn list_funnels(&self) -> Result<Vec<Funnel>, RepositoryError> {
        Ok(sorted(&self.tables.read().await.funnels, |f| f.created_at))
    }

    async fn insert_campaign(&self, campaign: Campaign) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let id = campaign.id.clone();
        insert_unique(&mut tables.campaigns, "campaign", &id, campaign)
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, RepositoryError> {
        Ok(sorted(&self.tables.read().await.campaigns, |c| c.created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crm::{LeadInput, LeadStatus};

    fn lead(name: &str) -> Lead {
        Lead::from_input(LeadInput {
            name: name.into(),
            email: format!("{}@example.com", name),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_lead_crud() {
        let repo = MemoryCrm::new();
        let mut lead = lead("ana");
        let id = lead.id.clone();
        repo.insert_lead(lead.clone()).await.unwrap();
        assert_eq!(repo.list_leads().await.unwrap().len(), 1);

        lead.status = LeadStatus::Qualified;
        repo.update_lead(lead).await.unwrap();
        assert_eq!(
            repo.get_lead(&id).await.unwrap().unwrap().status,
            LeadStatus::Qualified
        );

        repo.delete_lead(&id).await.unwrap();
        assert!(repo.get_lead(&id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete_lead(&id).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_unknown_lead() {
        let repo = MemoryCrm::new();
        assert!(matches!(
            repo.update_lead(lead("bia")).await,
            Err(RepositoryError::NotFound { kind: "lead", .. })
        ));
    }
}
