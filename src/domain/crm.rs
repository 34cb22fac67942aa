//! CRM-lite records: leads, segments, funnels and campaigns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Converted,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub segment_id: Option<String>,
    pub funnel_id: Option<String>,
    pub funnel_stage: Option<String>,
    pub status: LeadStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a lead.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub segment_id: Option<String>,
    #[serde(default)]
    pub funnel_id: Option<String>,
    #[serde(default)]
    pub funnel_stage: Option<String>,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Lead {
    pub fn from_input(input: LeadInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            phone: input.phone,
            source: input.source,
            segment_id: input.segment_id,
            funnel_id: input.funnel_id,
            funnel_stage: input.funnel_stage,
            status: input.status,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields, keeping id and creation time.
    pub fn apply(&mut self, input: LeadInput) {
        self.name = input.name.trim().to_string();
        self.email = input.email.trim().to_lowercase();
        self.phone = input.phone;
        self.source = input.source;
        self.segment_id = input.segment_id;
        self.funnel_id = input.funnel_id;
        self.funnel_stage = input.funnel_stage;
        self.status = input.status;
        self.notes = input.notes;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Free-form filter criteria, e.g. `{"source": "instagram"}`.
    pub criteria: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub criteria: HashMap<String, String>,
}

impl Segment {
    pub fn from_input(input: SegmentInput) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            description: input.description,
            criteria: input.criteria,
            created_at: Utc::now(),
        }
    }

    /// Whether a lead satisfies every criterion this segment declares.
    pub fn matches(&self, lead: &Lead) -> bool {
        self.criteria.iter().all(|(field, expected)| {
            let value = match field.as_str() {
                "source" => lead.source.clone(),
                "status" => serde_json::to_value(lead.status)
                    .ok()
                    .and_then(|v| v.as_str().map(String::from)),
                "funnelStage" => lead.funnel_stage.clone(),
                _ => None,
            };
            value.is_some_and(|v| v.eq_ignore_ascii_case(expected))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Funnel {
    pub id: String,
    pub name: String,
    pub stages: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelInput {
    pub name: String,
    #[serde(default)]
    pub stages: Vec<String>,
}

impl Funnel {
    pub fn from_input(input: FunnelInput) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            stages: input
                .stages
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            created_at: Utc::now(),
        }
    }

    pub fn has_stage(&self, stage: &str) -> bool {
        self.stages.iter().any(|s| s.eq_ignore_ascii_case(stage))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Scheduled,
    Sent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub segment_id: String,
    pub channel: String,
    pub message: String,
    pub status: CampaignStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignInput {
    pub name: String,
    pub segment_id: String,
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

fn default_channel() -> String {
    "email".to_string()
}

impl Campaign {
    pub fn from_input(input: CampaignInput) -> Self {
        let status = if input.scheduled_at.is_some() {
            CampaignStatus::Scheduled
        } else {
            CampaignStatus::Draft
        };
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            segment_id: input.segment_id,
            channel: input.channel,
            message: input.message,
            status,
            scheduled_at: input.scheduled_at,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(source: &str) -> Lead {
        Lead::from_input(LeadInput {
            name: " Ana ".into(),
            email: "Ana@Example.com".into(),
            source: Some(source.into()),
            ..Default::default()
        })
    }

    #[test]
    fn test_lead_is_normalised() {
        let lead = lead("site");
        assert_eq!(lead.name, "Ana");
        assert_eq!(lead.email, "ana@example.com");
        assert_eq!(lead.status, LeadStatus::New);
    }

    #[test]
    fn test_segment_matches_criteria() {
        let mut criteria = HashMap::new();
        criteria.insert("source".to_string(), "Instagram".to_string());
        criteria.insert("status".to_string(), "new".to_string());
        let segment = Segment::from_input(SegmentInput {
            name: "insta".into(),
            description: None,
            criteria,
        });
        assert!(segment.matches(&lead("instagram")));
        assert!(!segment.matches(&lead("site")));
    }

    #[test]
    fn test_funnel_drops_blank_stages() {
        let funnel = Funnel::from_input(FunnelInput {
            name: "vendas".into(),
            stages: vec!["topo".into(), " ".into(), "fundo".into()],
        });
        assert_eq!(funnel.stages, vec!["topo", "fundo"]);
        assert!(funnel.has_stage("FUNDO"));
    }

    #[test]
    fn test_campaign_status_follows_schedule() {
        let draft = Campaign::from_input(CampaignInput {
            name: "x".into(),
            segment_id: "s".into(),
            ..Default::default()
        });
        assert_eq!(draft.status, CampaignStatus::Draft);

        let scheduled = Campaign::from_input(CampaignInput {
            name: "x".into(),
            segment_id: "s".into(),
            scheduled_at: Some(Utc::now()),
            ..Default::default()
        });
        assert_eq!(scheduled.status, CampaignStatus::Scheduled);
    }
}
