use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Intervention status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "intervention_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InterventionStatus {
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

/// Intervention joined with the title of the report it addresses
#[derive(Debug, Clone, FromRow)]
pub struct Intervention {
    pub id: Uuid,
    pub report_id: Uuid,
    pub report_title: String,
    pub account_id: Option<Uuid>,
    pub status: InterventionStatus,
    pub notes: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Intervention {
    /// Minutes between start and end, None while still open
    pub fn duration_minutes(&self) -> Option<i64> {
        self.ended_at
            .map(|ended| (ended - self.started_at).num_minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_duration_minutes() {
        let started_at = Utc::now();
        let mut intervention = Intervention {
            id: Uuid::new_v4(),
            report_id: Uuid::new_v4(),
            report_title: "Broken streetlight".to_string(),
            account_id: None,
            status: InterventionStatus::InProgress,
            notes: None,
            started_at,
            ended_at: None,
        };
        assert_eq!(intervention.duration_minutes(), None);

        intervention.ended_at = Some(started_at + Duration::minutes(95));
        intervention.status = InterventionStatus::Completed;
        assert_eq!(intervention.duration_minutes(), Some(95));
    }
}
