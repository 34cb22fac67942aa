use crate::domain::crm::LeadStatus;
use crate::domain::jobs::JobCounts;
use crate::ports::repository::{CrmRepository, RepositoryError, VideoJobRepository};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub videos: JobCounts,
    pub total_videos: usize,
    pub leads: BTreeMap<String, usize>,
    pub total_leads: usize,
    /// Share of leads in `converted`, 0.0 to 1.0.
    pub conversion_rate: f64,
    pub segments: usize,
    pub funnels: usize,
    pub campaigns: usize,
}

pub struct AnalyticsService {
    jobs: Arc<dyn VideoJobRepository>,
    crm: Arc<dyn CrmRepository>,
}

fn status_name(status: LeadStatus) -> String {
    serde_json::to_value(status)
        .ok()
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_default()
}

impl AnalyticsService {
    pub fn new(jobs: Arc<dyn VideoJobRepository>, crm: Arc<dyn CrmRepository>) -> Self {
        Self { jobs, crm }
    }

    pub async fn summary(&self) -> Result<AnalyticsSummary, RepositoryError> {
        let videos = JobCounts::tally(&self.jobs.list().await?);
        let leads = self.crm.list_leads().await?;

        let mut by_status = BTreeMap::new();
        for status in [
            LeadStatus::New,
            LeadStatus::Contacted,
            LeadStatus::Qualified,
            LeadStatus::Converted,
            LeadStatus::Lost,
        ] {
            by_status.insert(status_name(status), 0);
        }
        for lead in &leads {
            *by_status.entry(status_name(lead.status)).or_insert(0) += 1;
        }
        let converted = leads
            .iter()
            .filter(|l| l.status == LeadStatus::Converted)
            .count();
        let conversion_rate = if leads.is_empty() {
            0.0
        } else {
            converted as f64 / leads.len() as f64
        };

        Ok(AnalyticsSummary {
            videos,
            total_videos: videos.total(),
            total_leads: leads.len(),
            leads: by_status,
            conversion_rate,
            segments: self.crm.list_segments().await?.len(),
            funnels: self.crm.list_funnels().await?.len(),
            campaigns: self.crm.list_campaigns().await?.len(),
        })
    }
}
