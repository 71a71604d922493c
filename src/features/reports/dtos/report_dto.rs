use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::reports::models::{
    Intervention, InterventionStatus, Report, ReportMedia, ReportStatus,
};

/// Media attached to a report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportMediaDto {
    pub id: Uuid,
    pub url: String,
    pub media_type: String,
}

impl From<ReportMedia> for ReportMediaDto {
    fn from(m: ReportMedia) -> Self {
        Self {
            id: m.id,
            url: m.url,
            media_type: m.media_type,
        }
    }
}

/// Report as shown in an account profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: ReportStatus,
    pub resolution_note: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub media: Vec<ReportMediaDto>,
}

impl ReportDto {
    pub fn from_parts(report: Report, media: Vec<ReportMedia>) -> Self {
        Self {
            id: report.id,
            title: report.title,
            description: report.description,
            status: report.status,
            resolution_note: report.resolution_note,
            resolved_at: report.resolved_at,
            created_at: report.created_at,
            media: media.into_iter().map(Into::into).collect(),
        }
    }
}

/// Intervention on a report by an agent or operator
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InterventionDto {
    pub id: Uuid,
    pub report_id: Uuid,
    pub report_title: String,
    pub account_id: Option<Uuid>,
    pub status: InterventionStatus,
    pub notes: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
}

impl From<Intervention> for InterventionDto {
    fn from(i: Intervention) -> Self {
        Self {
            duration_minutes: i.duration_minutes(),
            id: i.id,
            report_id: i.report_id,
            report_title: i.report_title,
            account_id: i.account_id,
            status: i.status,
            notes: i.notes,
            started_at: i.started_at,
            ended_at: i.ended_at,
        }
    }
}

/// One resolved report in the resolution history
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResolutionHistoryDto {
    pub report_id: Uuid,
    pub title: String,
    pub reporter_name: String,
    pub reporter_email: String,
    pub resolution_note: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub interventions: Vec<InterventionDto>,
}
