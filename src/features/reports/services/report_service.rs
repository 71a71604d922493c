use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::{InterventionDto, ReportDto, ResolutionHistoryDto};
use crate::features::reports::models::{Intervention, Report, ReportMedia};
use crate::shared::pagination::Paginator;

const INTERVENTION_COLUMNS: &str = r#"
    i.id, i.report_id, r.title AS report_title, i.account_id,
    i.status, i.notes, i.started_at, i.ended_at
"#;

#[derive(Debug, FromRow)]
struct ResolvedReportRow {
    id: Uuid,
    title: String,
    resolution_note: Option<String>,
    resolved_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    reporter_name: String,
    reporter_email: String,
}

/// Read side for reports, media and interventions
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reports submitted by an account, newest first, with their media
    pub async fn list_for_account(&self, account_id: Uuid) -> Result<Vec<ReportDto>> {
        let reports = sqlx::query_as::<_, Report>(
            r#"
            SELECT id, account_id, title, description, status,
                   resolution_note, resolved_at, created_at, updated_at
            FROM reports
            WHERE account_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports for account {}: {:?}", account_id, e);
            AppError::Database(e)
        })?;

        let report_ids: Vec<Uuid> = reports.iter().map(|r| r.id).collect();
        let media = self.list_media(&report_ids).await?;

        Ok(attach_media(reports, media))
    }

    async fn list_media(&self, report_ids: &[Uuid]) -> Result<Vec<ReportMedia>> {
        if report_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, ReportMedia>(
            r#"
            SELECT id, report_id, url, media_type, created_at
            FROM report_media
            WHERE report_id = ANY($1)
            ORDER BY created_at
            "#,
        )
        .bind(report_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list report media: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Interventions performed by the account, or on reports the account submitted
    pub async fn list_interventions_for_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<InterventionDto>> {
        let sql = format!(
            r#"
            SELECT {INTERVENTION_COLUMNS}
            FROM interventions i
            JOIN reports r ON r.id = i.report_id
            WHERE i.account_id = $1 OR r.account_id = $1
            ORDER BY i.started_at DESC
            "#
        );

        let rows = sqlx::query_as::<_, Intervention>(&sql)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to list interventions for account {}: {:?}",
                    account_id,
                    e
                );
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Resolved reports, most recently resolved first
    /// One page of resolved reports, newest first. `page` is clamped into the
    /// available range, so the returned paginator holds the page actually served.
    pub async fn resolution_history(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<ResolutionHistoryDto>, Paginator)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reports WHERE status = 'resolved'")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to count resolved reports: {:?}", e);
                    AppError::Database(e)
                })?;

        let paginator = history_window(total, page, page_size);

        let rows = sqlx::query_as::<_, ResolvedReportRow>(
            r#"
            SELECT r.id, r.title, r.resolution_note, r.resolved_at, r.created_at,
                   TRIM(a.name || ' ' || COALESCE(a.surname, '')) AS reporter_name,
                   a.email AS reporter_email
            FROM reports r
            JOIN accounts a ON a.id = r.account_id
            WHERE r.status = 'resolved'
            ORDER BY r.resolved_at DESC NULLS LAST, r.created_at DESC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(paginator.offset())
        .bind(paginator.page_size())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list resolution history: {:?}", e);
            AppError::Database(e)
        })?;

        let report_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut interventions = self.interventions_by_report(&report_ids).await?;

        let items = rows
            .into_iter()
            .map(|row| ResolutionHistoryDto {
                interventions: interventions.remove(&row.id).unwrap_or_default(),
                report_id: row.id,
                title: row.title,
                reporter_name: row.reporter_name,
                reporter_email: row.reporter_email,
                resolution_note: row.resolution_note,
                resolved_at: row.resolved_at,
                created_at: row.created_at,
            })
            .collect();

        Ok((items, paginator))
    }

    async fn interventions_by_report(
        &self,
        report_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<InterventionDto>>> {
        if report_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            r#"
            SELECT {INTERVENTION_COLUMNS}
            FROM interventions i
            JOIN reports r ON r.id = i.report_id
            WHERE i.report_id = ANY($1)
            ORDER BY i.started_at
            "#
        );

        let rows = sqlx::query_as::<_, Intervention>(&sql)
            .bind(report_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list interventions for history: {:?}", e);
                AppError::Database(e)
            })?;

        let mut grouped: HashMap<Uuid, Vec<InterventionDto>> = HashMap::new();
        for row in rows {
            grouped.entry(row.report_id).or_default().push(row.into());
        }
        Ok(grouped)
    }
}

/// Page window over `total` resolved reports with `page` clamped into range
fn history_window(total: i64, page: i64, page_size: i64) -> Paginator {
    let mut paginator = Paginator::new(total, page_size);
    paginator.go_to_page(page);
    paginator
}

/// Pair each report with its media, keeping report order
fn attach_media(reports: Vec<Report>, media: Vec<ReportMedia>) -> Vec<ReportDto> {
    let mut by_report: HashMap<Uuid, Vec<ReportMedia>> = HashMap::new();
    for m in media {
        by_report.entry(m.report_id).or_default().push(m);
    }

    reports
        .into_iter()
        .map(|report| {
            let media = by_report.remove(&report.id).unwrap_or_default();
            ReportDto::from_parts(report, media)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::ReportStatus;

    fn report(title: &str) -> Report {
        Report {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            status: ReportStatus::Pending,
            resolution_note: None,
            resolved_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn media(report_id: Uuid, url: &str) -> ReportMedia {
        ReportMedia {
            id: Uuid::new_v4(),
            report_id,
            url: url.to_string(),
            media_type: "image/jpeg".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_attach_media_groups_by_report_and_keeps_order() {
        let pothole = report("Pothole");
        let flood = report("Flooded underpass");
        let media = vec![
            media(flood.id, "https://cdn.example/flood-1.jpg"),
            media(pothole.id, "https://cdn.example/pothole.jpg"),
            media(flood.id, "https://cdn.example/flood-2.jpg"),
        ];

        let dtos = attach_media(vec![pothole, flood], media);

        assert_eq!(dtos[0].title, "Pothole");
        assert_eq!(dtos[0].media.len(), 1);
        assert_eq!(dtos[1].title, "Flooded underpass");
        assert_eq!(dtos[1].media.len(), 2);
        assert_eq!(dtos[1].media[0].url, "https://cdn.example/flood-1.jpg");
    }

    #[test]
    fn test_attach_media_without_media() {
        let dtos = attach_media(vec![report("Graffiti")], Vec::new());
        assert!(dtos[0].media.is_empty());
    }

    #[test]
    fn test_history_window_clamps_page_past_the_end() {
        let window = history_window(23, 50, 10);
        assert_eq!(window.current_page(), 3);
        assert_eq!(window.offset(), 20);
        assert_eq!(window.total_pages(), 3);
    }

    #[test]
    fn test_history_window_survives_extreme_pages() {
        let window = history_window(23, i64::MAX, 100);
        assert_eq!(window.current_page(), 1);
        assert_eq!(window.offset(), 0);

        let window = history_window(0, i64::MIN, 10);
        assert_eq!(window.current_page(), 1);
        assert_eq!(window.offset(), 0);
    }
}
