//! Monthly objective rows, one per (site, month).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Monthly target for a site. `month` stores the first day of the month.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MonthlyTarget {
    pub target_id: Uuid,
    pub site_id: Uuid,
    pub month: NaiveDate,
}

/// Input for creating a monthly target.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMonthlyTarget {
    pub site_id: Uuid,
    pub month: NaiveDate,
}
