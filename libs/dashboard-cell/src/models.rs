use std::collections::BTreeMap;
use std::ops::{Add, Sub};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use appointment_cell::models::{Appointment, AppointmentStatus};
use shared_database::DatabaseError;
use shared_utils::validation::{ValidationErrors, Validator};

// ==============================================================================
// STATUS COUNTS
// ==============================================================================

/// Appointment counts by status. `total` includes cancelled appointments.
/// Signed so the same shape can carry day-over-day deltas.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusTotals {
    pub total: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub completed: i64,
    pub cancelled: i64,
}

/// Field-wise difference between two days.
pub type StatsTrend = StatusTotals;

impl StatusTotals {
    pub fn record(&mut self, status: AppointmentStatus) {
        self.total += 1;
        match status {
            AppointmentStatus::Pending => self.pending += 1,
            AppointmentStatus::Confirmed => self.confirmed += 1,
            AppointmentStatus::Completed => self.completed += 1,
            AppointmentStatus::Cancelled => self.cancelled += 1,
        }
    }

    pub fn by_status_sum(&self) -> i64 {
        self.pending + self.confirmed + self.completed + self.cancelled
    }

    fn map(self, f: impl Fn(i64) -> i64) -> Self {
        Self {
            total: f(self.total),
            pending: f(self.pending),
            confirmed: f(self.confirmed),
            completed: f(self.completed),
            cancelled: f(self.cancelled),
        }
    }

    /// Per-field mean over `day_count` days, rounded half away from zero.
    pub fn per_day(self, day_count: usize) -> Self {
        if day_count == 0 {
            return Self::default();
        }
        self.map(|value| (value as f64 / day_count as f64).round() as i64)
    }
}

impl Add for StatusTotals {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            total: self.total + other.total,
            pending: self.pending + other.pending,
            confirmed: self.confirmed + other.confirmed,
            completed: self.completed + other.completed,
            cancelled: self.cancelled + other.cancelled,
        }
    }
}

impl Sub for StatusTotals {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            total: self.total - other.total,
            pending: self.pending - other.pending,
            confirmed: self.confirmed - other.confirmed,
            completed: self.completed - other.completed,
            cancelled: self.cancelled - other.cancelled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyStats {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub counts: StatusTotals,
}

impl DailyStats {
    /// Counts only the appointments dated `date`.
    pub fn tally<'a>(date: NaiveDate, appointments: impl IntoIterator<Item = &'a Appointment>) -> Self {
        let mut counts = StatusTotals::default();
        for appointment in appointments {
            if appointment.appointment_date == date {
                counts.record(appointment.status);
            }
        }
        Self { date, counts }
    }
}

// ==============================================================================
// REPORTS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekdayStats {
    pub day: String,
    #[serde(flatten)]
    pub stats: DailyStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub stats: Vec<WeekdayStats>,
    pub total: StatusTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthDayStats {
    pub day: u32,
    #[serde(flatten)]
    pub stats: DailyStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub stats: Vec<MonthDayStats>,
    pub total: StatusTotals,
    pub average: StatusTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeStats {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: usize,
    pub stats: Vec<DailyStats>,
    pub total: StatusTotals,
    pub average: StatusTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSummary {
    #[serde(flatten)]
    pub counts: StatusTotals,
    pub trends: StatsTrend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSummary {
    pub total: usize,
    pub new_this_week: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentActivity {
    pub last_7_days: usize,
    pub next_7_days: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analytics {
    pub by_specialty: BTreeMap<String, i64>,
    pub by_doctor: BTreeMap<String, i64>,
    pub average_appointments_per_day: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub date: NaiveDate,
    pub appointments: AppointmentSummary,
    pub patients: PatientSummary,
    pub recent: RecentActivity,
    pub analytics: Analytics,
    pub timestamp: DateTime<Utc>,
}

// ==============================================================================
// QUERIES
// ==============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeeklyQuery {
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthlyQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl MonthlyQuery {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        if let Some(year) = self.year {
            validator.range("year", year, 2020, 2030, "Year must be between 2020 and 2030");
        }
        if let Some(month) = self.month {
            validator.range("month", month, 1, 12, "Month must be between 1 and 12");
        }
        validator.finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl RangeQuery {
    pub const MAX_DAYS: i64 = 366;

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .check("end_date", (self.end_date - self.start_date).num_days() < Self::MAX_DAYS,
                "Date range cannot exceed 366 days")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_half_away_from_zero() {
        let totals = StatusTotals { total: 45, pending: 15, confirmed: 16, completed: 14, cancelled: 0 };
        let average = totals.per_day(30);

        assert_eq!(average, StatusTotals { total: 2, pending: 1, confirmed: 1, completed: 0, cancelled: 0 });
        assert_eq!(totals.per_day(0), StatusTotals::default());

        let delta = StatusTotals { total: -3, ..Default::default() };
        assert_eq!(delta.per_day(2).total, -2);
    }

    #[test]
    fn trend_is_signed() {
        let today = StatusTotals { total: 1, confirmed: 1, ..Default::default() };
        let yesterday = StatusTotals { total: 3, pending: 2, cancelled: 1, ..Default::default() };

        let trend = today - yesterday;
        assert_eq!(trend, StatusTotals { total: -2, pending: -2, confirmed: 1, completed: 0, cancelled: -1 });
    }

    #[test]
    fn daily_stats_flatten_on_the_wire() {
        let stats = DailyStats {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            counts: StatusTotals { total: 2, confirmed: 1, cancelled: 1, ..Default::default() },
        };
        let value = serde_json::to_value(&stats).unwrap();

        assert_eq!(value["date"], "2024-01-15");
        assert_eq!(value["total"], 2);
        assert_eq!(value["cancelled"], 1);
    }

    #[test]
    fn monthly_query_bounds() {
        assert!(MonthlyQuery { year: Some(2024), month: Some(2) }.validate().is_ok());
        assert!(MonthlyQuery { year: Some(2019), month: Some(13) }.validate().is_err());
    }
}
