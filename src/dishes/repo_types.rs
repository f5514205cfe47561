use sqlx::FromRow;
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{Dish, TimeOfDay};

/// Dish record in the database.
#[derive(Debug, FromRow)]
pub struct DishRow {
    pub id: Uuid,
    pub name: String,
    pub time_of_day: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Stored time-of-day values outside the enum are read as unspecified.
pub(crate) fn stored_time_of_day(raw: &str, id: Uuid) -> TimeOfDay {
    raw.parse().unwrap_or_else(|e| {
        warn!(%id, error = %e, "stored time of day not recognised");
        TimeOfDay::Unspecified
    })
}

impl From<DishRow> for Dish {
    fn from(r: DishRow) -> Self {
        Self {
            time_of_day: stored_time_of_day(&r.time_of_day, r.id),
            id: r.id,
            name: r.name,
            description: r.description,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
