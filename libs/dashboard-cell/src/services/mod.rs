pub mod dashboard;
pub mod statistics;

pub use dashboard::DashboardService;
pub use statistics::StatisticsAggregator;
