use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::{debug, instrument};

use appointment_cell::models::AppointmentFilter;
use appointment_cell::services::AppointmentRepository;
use patient_cell::services::PatientService;
use shared_utils::Clock;

use crate::models::{
    Analytics, AppointmentSummary, DashboardError, DashboardOverview, MonthlyStats, PatientSummary, RangeStats,
    RecentActivity, WeeklyStats,
};
use crate::services::statistics::StatisticsAggregator;

const RECENT_WINDOW_DAYS: i64 = 7;
const CREATION_WINDOW_DAYS: i64 = 30;

/// Fills in calendar defaults from the clock and assembles dashboard reports.
pub struct DashboardService {
    statistics: StatisticsAggregator,
    appointments: Arc<dyn AppointmentRepository>,
    patients: Arc<PatientService>,
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        patients: Arc<PatientService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            statistics: StatisticsAggregator::new(appointments.clone()),
            appointments,
            patients,
            clock,
        }
    }

    pub fn statistics(&self) -> &StatisticsAggregator {
        &self.statistics
    }

    #[instrument(skip(self))]
    pub async fn overview(&self, date: Option<NaiveDate>) -> Result<DashboardOverview, DashboardError> {
        let now = self.clock.now();
        let today = self.clock.today();
        let date = date.unwrap_or(today);
        let week_ago = today - Duration::days(RECENT_WINDOW_DAYS);
        let week_ahead = today + Duration::days(RECENT_WINDOW_DAYS);

        let stats = self.statistics.stats_for_date(date).await?;
        let trends = self.statistics.daily_trend(date).await?;

        let patients = self.patients.roster().await?;
        let new_this_week = patients
            .iter()
            .filter(|p| p.created_at.date_naive() >= week_ago)
            .count();

        let appointments = self.appointments.find_all(AppointmentFilter::default()).await?;

        let last_7_days = appointments
            .iter()
            .filter(|a| a.appointment_date >= week_ago)
            .count();
        let next_7_days = appointments
            .iter()
            .filter(|a| a.appointment_date >= today && a.appointment_date <= week_ahead)
            .filter(|a| a.status.is_upcoming())
            .count();

        let mut by_specialty = BTreeMap::new();
        let mut by_doctor = BTreeMap::new();
        for appointment in appointments.iter().filter(|a| a.status.is_active()) {
            *by_specialty.entry(appointment.specialty.to_string()).or_insert(0) += 1;
            *by_doctor.entry(appointment.doctor_name.clone()).or_insert(0) += 1;
        }

        let created_recently = appointments
            .iter()
            .filter(|a| a.created_at >= now - Duration::days(CREATION_WINDOW_DAYS))
            .count();
        let average_appointments_per_day =
            (created_recently as f64 / CREATION_WINDOW_DAYS as f64).round() as i64;

        debug!("Dashboard overview for {}: {} appointments, {} patients", date, stats.counts.total, patients.len());

        Ok(DashboardOverview {
            date,
            appointments: AppointmentSummary { counts: stats.counts, trends },
            patients: PatientSummary { total: patients.len(), new_this_week },
            recent: RecentActivity { last_7_days, next_7_days },
            analytics: Analytics { by_specialty, by_doctor, average_appointments_per_day },
            timestamp: now,
        })
    }

    /// Defaults to the Sunday starting the current week.
    pub async fn weekly(&self, start_date: Option<NaiveDate>) -> Result<WeeklyStats, DashboardError> {
        let start = start_date.unwrap_or_else(|| {
            let today = self.clock.today();
            today - Duration::days(i64::from(today.weekday().num_days_from_sunday()))
        });

        Ok(self.statistics.weekly_stats(start).await?)
    }

    pub async fn monthly(&self, year: Option<i32>, month: Option<u32>) -> Result<MonthlyStats, DashboardError> {
        let today = self.clock.today();
        self.statistics
            .monthly_stats(year.unwrap_or(today.year()), month.unwrap_or(today.month()))
            .await
    }

    pub async fn range(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<RangeStats, DashboardError> {
        let stats = self.statistics.range_stats(start_date, end_date).await?;
        let total = StatisticsAggregator::aggregate(&stats);
        let average = StatisticsAggregator::average_per_day(&total, stats.len());

        Ok(RangeStats {
            start_date,
            end_date,
            days: stats.len(),
            stats,
            total,
            average,
        })
    }
}
