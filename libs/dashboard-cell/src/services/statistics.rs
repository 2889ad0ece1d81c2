use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate};
use tracing::debug;

use appointment_cell::models::AppointmentFilter;
use appointment_cell::services::AppointmentRepository;
use shared_database::DatabaseError;

use crate::models::{
    DailyStats, DashboardError, MonthDayStats, MonthlyStats, StatsTrend, StatusTotals, WeekdayStats, WeeklyStats,
};

/// Read-only counts over the appointment store, recomputed on every call.
pub struct StatisticsAggregator {
    repository: Arc<dyn AppointmentRepository>,
}

impl StatisticsAggregator {
    pub fn new(repository: Arc<dyn AppointmentRepository>) -> Self {
        Self { repository }
    }

    pub async fn stats_for_date(&self, date: NaiveDate) -> Result<DailyStats, DatabaseError> {
        let appointments = self.repository.find_all(AppointmentFilter::on_date(date)).await?;
        Ok(DailyStats::tally(date, &appointments))
    }

    /// `date` minus the day before, field by field.
    pub async fn daily_trend(&self, date: NaiveDate) -> Result<StatsTrend, DatabaseError> {
        let current = self.stats_for_date(date).await?;
        let previous = match date.pred_opt() {
            Some(previous) => self.stats_for_date(previous).await?.counts,
            None => StatusTotals::default(),
        };
        Ok(current.counts - previous)
    }

    /// One entry per calendar day in `[start, end]`; empty when `start > end`.
    pub async fn range_stats(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyStats>, DatabaseError> {
        if start > end {
            return Ok(Vec::new());
        }
        debug!("Computing daily stats from {} to {}", start, end);

        // A single read, bucketed per day, gives the same counts as one query per day.
        let appointments = self.repository.find_all(AppointmentFilter::default()).await?;
        let in_range: Vec<_> = appointments
            .iter()
            .filter(|a| a.appointment_date >= start && a.appointment_date <= end)
            .collect();

        Ok(start
            .iter_days()
            .take_while(|day| *day <= end)
            .map(|day| DailyStats::tally(day, in_range.iter().copied()))
            .collect())
    }

    pub fn aggregate(stats: &[DailyStats]) -> StatusTotals {
        stats
            .iter()
            .fold(StatusTotals::default(), |acc, day| acc + day.counts)
    }

    pub fn average_per_day(totals: &StatusTotals, day_count: usize) -> StatusTotals {
        totals.per_day(day_count)
    }

    /// From `week_start` through the Saturday of its Sunday-based week.
    pub async fn weekly_stats(&self, week_start: NaiveDate) -> Result<WeeklyStats, DashboardError> {
        let days_to_saturday = 6 - u64::from(week_start.weekday().num_days_from_sunday());
        let week_end = week_start
            .checked_add_days(Days::new(days_to_saturday))
            .ok_or_else(|| DashboardError::InvalidPeriod(format!("week starting {} is out of range", week_start)))?;

        let daily = self.range_stats(week_start, week_end).await?;
        let total = Self::aggregate(&daily);

        Ok(WeeklyStats {
            week_start,
            week_end,
            stats: daily
                .into_iter()
                .map(|stats| WeekdayStats { day: stats.date.format("%A").to_string(), stats })
                .collect(),
            total,
        })
    }

    pub async fn monthly_stats(&self, year: i32, month: u32) -> Result<MonthlyStats, DashboardError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| DashboardError::InvalidPeriod(format!("{}-{:02} is not a valid month", year, month)))?;
        let last = first
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| DashboardError::InvalidPeriod(format!("{}-{:02} is out of range", year, month)))?;

        let daily = self.range_stats(first, last).await?;
        let total = Self::aggregate(&daily);
        let average = Self::average_per_day(&total, daily.len());

        Ok(MonthlyStats {
            year,
            month,
            month_name: first.format("%B").to_string(),
            stats: daily
                .into_iter()
                .map(|stats| MonthDayStats { day: stats.date.day(), stats })
                .collect(),
            total,
            average,
        })
    }
}
