use super::error::{ok, ApiResult};
use super::AppState;
use crate::domain::crm::{
    Campaign, CampaignInput, Funnel, FunnelInput, Lead, LeadInput, Segment, SegmentInput,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

pub async fn list_leads(State(state): State<AppState>) -> ApiResult<Vec<Lead>> {
    Ok(ok(state.sales.list_leads().await?))
}

pub async fn create_lead(
    State(state): State<AppState>,
    payload: Result<Json<LeadInput>, JsonRejection>,
) -> ApiResult<Lead> {
    let Json(input) = payload?;
    Ok(ok(state.sales.create_lead(input).await?))
}

pub async fn get_lead(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Lead> {
    Ok(ok(state.sales.get_lead(&id).await?))
}

pub async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<LeadInput>, JsonRejection>,
) -> ApiResult<Lead> {
    let Json(input) = payload?;
    Ok(ok(state.sales.update_lead(&id, input).await?))
}

pub async fn delete_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    state.sales.delete_lead(&id).await?;
    Ok(ok(json!({ "id": id })))
}

pub async fn list_segments(State(state): State<AppState>) -> ApiResult<Vec<Segment>> {
    Ok(ok(state.sales.list_segments().await?))
}

pub async fn create_segment(
    State(state): State<AppState>,
    payload: Result<Json<SegmentInput>, JsonRejection>,
) -> ApiResult<Segment> {
    let Json(input) = payload?;
    Ok(ok(state.sales.create_segment(input).await?))
}

pub async fn segment_leads(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Lead>> {
    Ok(ok(state.sales.segment_members(&id).await?))
}

pub async fn list_funnels(State(state): State<AppState>) -> ApiResult<Vec<Funnel>> {
    Ok(ok(state.sales.list_funnels().await?))
}

pub async fn create_funnel(
    State(state): State<AppState>,
    payload: Result<Json<FunnelInput>, JsonRejection>,
) -> ApiResult<Funnel> {
    let Json(input) = payload?;
    Ok(ok(state.sales.create_funnel(input).await?))
}

pub async fn list_campaigns(State(state): State<AppState>) -> ApiResult<Vec<Campaign>> {
    Ok(ok(state.sales.list_campaigns().await?))
}

pub async fn create_campaign(
    State(state): State<AppState>,
    payload: Result<Json<CampaignInput>, JsonRejection>,
) -> ApiResult<Campaign> {
    let Json(input) = payload?;
    Ok(ok(state.sales.create_campaign(input).await?))
}
