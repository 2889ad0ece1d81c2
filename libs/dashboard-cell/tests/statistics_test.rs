use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc};
use uuid::Uuid;

use appointment_cell::models::*;
use appointment_cell::services::InMemoryAppointmentRepository;
use dashboard_cell::models::{DashboardError, StatusTotals};
use dashboard_cell::services::{DashboardService, StatisticsAggregator};
use patient_cell::services::seed::{sample_patients, JOHN_DOE_ID};
use patient_cell::services::{InMemoryPatientRepository, PatientService};
use shared_utils::test_utils::{date, fixed_clock};
use shared_utils::Clock;

struct Fixture {
    statistics: StatisticsAggregator,
    dashboard: DashboardService,
}

fn appointment(
    day: &str,
    time: &str,
    status: AppointmentStatus,
    doctor: &str,
    specialty: Specialty,
    created_at: DateTime<Utc>,
) -> Appointment {
    NewAppointment {
        patient_id: JOHN_DOE_ID,
        patient_name: "John Doe".to_string(),
        doctor_name: doctor.to_string(),
        specialty,
        appointment_date: date(day),
        appointment_time: hhmm::parse(time).unwrap(),
        duration: 30,
        status,
        appointment_type: AppointmentType::Consultation,
        notes: None,
        symptoms: vec![],
    }
    .into_appointment(Uuid::new_v4(), created_at)
}

/// Today is Wednesday 2024-01-17.
async fn fixture() -> Fixture {
    let clock = fixed_clock("2024-01-17");
    let now = clock.now();

    let patient_repository = Arc::new(InMemoryPatientRepository::new(clock.clone()));
    let mut patients = sample_patients(now - Duration::days(3));
    patients[2].created_at = now - Duration::days(20);
    for patient in patients {
        patient_repository.insert(patient).await;
    }

    let repository = Arc::new(InMemoryAppointmentRepository::new(clock.clone()));
    let recent = now - Duration::days(2);
    for appointment in [
        appointment("2024-01-15", "09:00", AppointmentStatus::Confirmed, "Dr. Emily Smith", Specialty::Cardiology, recent),
        appointment("2024-01-15", "10:00", AppointmentStatus::Cancelled, "Dr. Emily Smith", Specialty::Cardiology, recent),
        appointment("2024-01-16", "14:30", AppointmentStatus::Pending, "Dr. Robert Wilson", Specialty::Pulmonology, recent),
        appointment("2024-01-18", "11:00", AppointmentStatus::Pending, "Dr. Lisa Rodriguez", Specialty::Endocrinology, recent),
        appointment("2024-01-30", "09:00", AppointmentStatus::Confirmed, "Dr. Emily Smith", Specialty::Cardiology, recent),
        appointment("2024-01-05", "16:00", AppointmentStatus::Completed, "Dr. Ann Lee", Specialty::Neurology,
            now - Duration::days(40)),
    ] {
        repository.insert(appointment).await;
    }

    let patients = Arc::new(PatientService::new(patient_repository, clock.clone()));
    Fixture {
        statistics: StatisticsAggregator::new(repository.clone()),
        dashboard: DashboardService::new(repository, patients, clock),
    }
}

#[tokio::test]
async fn test_stats_for_date_counts_cancelled_in_total() {
    let fixture = fixture().await;

    let stats = fixture.statistics.stats_for_date(date("2024-01-15")).await.unwrap();

    assert_eq!(stats.date, date("2024-01-15"));
    assert_eq!(stats.counts, StatusTotals { total: 2, pending: 0, confirmed: 1, completed: 0, cancelled: 1 });
    assert_eq!(stats.counts.by_status_sum(), stats.counts.total);
}

#[tokio::test]
async fn test_stats_are_idempotent() {
    let fixture = fixture().await;

    let first = fixture.statistics.stats_for_date(date("2024-01-15")).await.unwrap();
    let second = fixture.statistics.stats_for_date(date("2024-01-15")).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_daily_trend_against_previous_day() {
    let fixture = fixture().await;

    let trend = fixture.statistics.daily_trend(date("2024-01-16")).await.unwrap();

    assert_eq!(trend, StatusTotals { total: -1, pending: 1, confirmed: -1, completed: 0, cancelled: -1 });
}

#[tokio::test]
async fn test_range_covers_every_day_inclusive() {
    let fixture = fixture().await;

    let range = fixture.statistics.range_stats(date("2024-01-14"), date("2024-01-16")).await.unwrap();
    let days: Vec<_> = range.iter().map(|d| d.date).collect();

    assert_eq!(days, vec![date("2024-01-14"), date("2024-01-15"), date("2024-01-16")]);
    assert_eq!(range[0].counts, StatusTotals::default());

    let totals = StatisticsAggregator::aggregate(&range);
    assert_eq!(totals, StatusTotals { total: 3, pending: 1, confirmed: 1, completed: 0, cancelled: 1 });
    assert_eq!(StatisticsAggregator::average_per_day(&totals, range.len()).total, 1);

    let reversed = fixture.statistics.range_stats(date("2024-01-16"), date("2024-01-14")).await.unwrap();
    assert!(reversed.is_empty());
}

#[tokio::test]
async fn test_weekly_runs_to_saturday() {
    let fixture = fixture().await;

    let full = fixture.statistics.weekly_stats(date("2024-01-14")).await.unwrap();
    assert_eq!(full.week_end, date("2024-01-20"));
    assert_eq!(full.stats.len(), 7);
    assert_eq!(full.stats[0].day, "Sunday");
    assert_eq!(full.stats[6].day, "Saturday");
    assert_eq!(full.total.total, 4);

    let partial = fixture.statistics.weekly_stats(date("2024-01-17")).await.unwrap();
    assert_eq!(partial.week_end, date("2024-01-20"));
    assert_eq!(partial.stats.len(), 4);
    assert_eq!(partial.total.total, 1);
}

#[tokio::test]
async fn test_weekly_at_the_end_of_the_calendar() {
    let fixture = fixture().await;

    for back in 0..7 {
        let start = NaiveDate::MAX - Days::new(back);
        let saturday_fits = u64::from(6 - start.weekday().num_days_from_sunday()) <= back;

        let result = fixture.statistics.weekly_stats(start).await;

        if saturday_fits {
            assert_matches!(result, Ok(weekly) if weekly.week_start == start);
        } else {
            assert_matches!(result, Err(DashboardError::InvalidPeriod(_)));
        }
    }
}

#[tokio::test]
async fn test_weekly_defaults_to_current_week() {
    let fixture = fixture().await;

    let weekly = fixture.dashboard.weekly(None).await.unwrap();

    assert_eq!(weekly.week_start, date("2024-01-14"));
    assert_eq!(weekly.week_end, date("2024-01-20"));
}

#[tokio::test]
async fn test_monthly_stats() {
    let fixture = fixture().await;

    let january = fixture.dashboard.monthly(None, None).await.unwrap();
    assert_eq!((january.year, january.month), (2024, 1));
    assert_eq!(january.month_name, "January");
    assert_eq!(january.stats.len(), 31);
    assert_eq!(january.stats[14].day, 15);
    assert_eq!(january.total.total, 6);
    assert_eq!(january.average, StatusTotals::default());

    let february = fixture.statistics.monthly_stats(2024, 2).await.unwrap();
    assert_eq!(february.stats.len(), 29);
    assert_eq!(february.total, StatusTotals::default());

    let invalid = fixture.statistics.monthly_stats(2024, 13).await;
    assert_matches!(invalid, Err(DashboardError::InvalidPeriod(_)));
}

#[tokio::test]
async fn test_overview() {
    let fixture = fixture().await;

    let overview = fixture.dashboard.overview(Some(date("2024-01-15"))).await.unwrap();

    assert_eq!(overview.appointments.counts.total, 2);
    assert_eq!(overview.appointments.trends.total, 2);
    assert_eq!(overview.patients.total, 3);
    assert_eq!(overview.patients.new_this_week, 2);
    assert_eq!(overview.recent.last_7_days, 5);
    assert_eq!(overview.recent.next_7_days, 1);
    assert_eq!(overview.analytics.by_specialty.get("Cardiology"), Some(&2));
    assert_eq!(overview.analytics.by_specialty.get("Neurology"), Some(&1));
    assert_eq!(overview.analytics.by_doctor.get("Dr. Emily Smith"), Some(&2));
    assert_eq!(overview.analytics.by_doctor.len(), 4);
    assert_eq!(overview.analytics.average_appointments_per_day, 0);
}
