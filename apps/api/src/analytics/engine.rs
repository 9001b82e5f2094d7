//! Dashboard analytics derived from a user's application list.
//!
//! Everything here is pure: no I/O, no side effects, total over malformed
//! rows. A status string outside the five known values still counts toward
//! the total but lands in no bucket.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::models::application::{ApplicationStatus, JobApplicationRow};

/// How many calendar months the trend window covers, current month included.
const TREND_MONTHS: u32 = 6;

/// How many entries the top-companies and recent-applications lists keep.
const TOP_N: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct StatusBucket {
    pub status: &'static str,
    pub count: usize,
    pub color: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTrend {
    /// `YYYY-MM` key of the calendar month.
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyCount {
    pub company: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total_applications: usize,
    pub success_rate: f64,
    pub status_distribution: Vec<StatusBucket>,
    pub monthly_trends: Vec<MonthlyTrend>,
    pub top_companies: Vec<CompanyCount>,
    pub recent_applications: Vec<JobApplicationRow>,
    pub average_applications_per_month: f64,
}

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_applications: usize,
    pub interviews_scheduled: usize,
    pub offers_received: usize,
    pub rejection_rate: f64,
    pub recent_applications: Vec<JobApplicationRow>,
}

pub fn status_color(status: &str) -> &'static str {
    match status {
        "applied" => "#2196F3",
        "assessment" => "#9C27B0",
        "interview" => "#FF9800",
        "offer" => "#4CAF50",
        "rejected" => "#F44336",
        _ => "#666",
    }
}

pub fn status_icon(status: &str) -> &'static str {
    match status {
        "applied" => "send",
        "assessment" => "quiz",
        "interview" => "event",
        "offer" => "check-circle",
        "rejected" => "cancel",
        _ => "help",
    }
}

/// Computes the full analytics summary. `now` anchors the six-month trend
/// window; handlers pass `Utc::now()`, tests pin it.
pub fn compute_analytics(
    applications: &[JobApplicationRow],
    now: DateTime<Utc>,
) -> AnalyticsSummary {
    let total_applications = applications.len();

    let offers = applications.iter().filter(|a| a.status == "offer").count();
    let success_rate = if total_applications > 0 {
        offers as f64 / total_applications as f64 * 100.0
    } else {
        0.0
    };

    let status_distribution = ApplicationStatus::ALL
        .iter()
        .map(|&status| StatusBucket {
            status: status.as_str(),
            count: applications
                .iter()
                .filter(|a| ApplicationStatus::parse(&a.status) == Some(status))
                .count(),
            color: status_color(status.as_str()),
            icon: status_icon(status.as_str()),
        })
        .collect();

    let monthly_trends = monthly_trends(applications, now);

    // Companies accumulate in first-seen order; the stable sort then keeps
    // that order for equal counts.
    let mut top_companies: Vec<CompanyCount> = Vec::new();
    for app in applications {
        match top_companies.iter_mut().find(|c| c.company == app.company) {
            Some(entry) => entry.count += 1,
            None => top_companies.push(CompanyCount {
                company: app.company.clone(),
                count: 1,
            }),
        }
    }
    top_companies.sort_by(|a, b| b.count.cmp(&a.count));
    top_companies.truncate(TOP_N);

    let mut recent_applications = applications.to_vec();
    recent_applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent_applications.truncate(TOP_N);

    let months = monthly_trends
        .iter()
        .map(|t| t.month.as_str())
        .collect::<HashSet<_>>()
        .len();
    let average_applications_per_month = if months > 0 {
        total_applications as f64 / months as f64
    } else {
        0.0
    };

    AnalyticsSummary {
        total_applications,
        success_rate,
        status_distribution,
        monthly_trends,
        top_companies,
        recent_applications,
        average_applications_per_month,
    }
}

/// Headline stats for the dashboard cards (total, interviews, offers,
/// rejection rate, five most recent).
pub fn compute_dashboard_stats(applications: &[JobApplicationRow]) -> DashboardStats {
    let total_applications = applications.len();
    let interviews_scheduled = applications.iter().filter(|a| a.status == "interview").count();
    let offers_received = applications.iter().filter(|a| a.status == "offer").count();
    let rejected = applications.iter().filter(|a| a.status == "rejected").count();
    let rejection_rate = if total_applications > 0 {
        rejected as f64 / total_applications as f64 * 100.0
    } else {
        0.0
    };

    let mut recent_applications = applications.to_vec();
    recent_applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent_applications.truncate(TOP_N);

    DashboardStats {
        total_applications,
        interviews_scheduled,
        offers_received,
        rejection_rate,
        recent_applications,
    }
}

/// Exactly six cells, oldest month first, current month last. Months with no
/// applications still appear with count 0; applications outside the window
/// count toward the total only.
fn monthly_trends(applications: &[JobApplicationRow], now: DateTime<Utc>) -> Vec<MonthlyTrend> {
    (0..TREND_MONTHS)
        .rev()
        .map(|back| {
            let (year, month) = months_back(now.year(), now.month(), back);
            let key = month_key(year, month);
            let count = applications
                .iter()
                .filter(|a| month_key(a.created_at.year(), a.created_at.month()) == key)
                .count();
            MonthlyTrend { month: key, count }
        })
        .collect()
}

fn month_key(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

/// Calendar month `back` months before (year, month), borrowing across
/// year boundaries.
fn months_back(year: i32, month: u32, back: u32) -> (i32, u32) {
    let zero_based = year * 12 + month as i32 - 1 - back as i32;
    (zero_based.div_euclid(12), (zero_based.rem_euclid(12) + 1) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn make_app(status: &str, company: &str, created_at: DateTime<Utc>) -> JobApplicationRow {
        JobApplicationRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            company: company.to_string(),
            role: "Engineer".to_string(),
            portal_url: None,
            status: status.to_string(),
            deadline: None,
            notes: None,
            salary: None,
            location: None,
            application_date: None,
            job_type: "full-time".to_string(),
            source: None,
            priority: "medium".to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_total_matches_input_length() {
        let now = at(2024, 6, 15);
        let apps = vec![
            make_app("applied", "Acme", at(2024, 6, 1)),
            make_app("offer", "Globex", at(2024, 5, 1)),
        ];
        assert_eq!(compute_analytics(&apps, now).total_applications, 2);
        assert_eq!(compute_analytics(&[], now).total_applications, 0);
    }

    #[test]
    fn test_empty_input_yields_zero_rates_without_panicking() {
        let summary = compute_analytics(&[], at(2024, 6, 15));
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.average_applications_per_month, 0.0);
        assert!(summary.top_companies.is_empty());
        assert!(summary.recent_applications.is_empty());
    }

    #[test]
    fn test_distribution_has_five_fixed_order_buckets() {
        let summary = compute_analytics(&[], at(2024, 6, 15));
        let order: Vec<&str> = summary.status_distribution.iter().map(|b| b.status).collect();
        assert_eq!(
            order,
            vec!["applied", "assessment", "interview", "offer", "rejected"]
        );
    }

    #[test]
    fn test_unknown_status_counts_toward_total_but_no_bucket() {
        let now = at(2024, 6, 15);
        let apps = vec![
            make_app("applied", "Acme", at(2024, 6, 1)),
            make_app("ghosted", "Acme", at(2024, 6, 2)),
        ];
        let summary = compute_analytics(&apps, now);
        assert_eq!(summary.total_applications, 2);
        let bucket_sum: usize = summary.status_distribution.iter().map(|b| b.count).sum();
        assert_eq!(bucket_sum, 1);
    }

    #[test]
    fn test_status_buckets_carry_colors_and_icons() {
        let summary = compute_analytics(&[], at(2024, 6, 15));
        let offer = summary
            .status_distribution
            .iter()
            .find(|b| b.status == "offer")
            .unwrap();
        assert_eq!(offer.color, "#4CAF50");
        assert_eq!(offer.icon, "check-circle");
        assert_eq!(status_color("nonsense"), "#666");
        assert_eq!(status_icon("nonsense"), "help");
    }

    #[test]
    fn test_monthly_trends_always_six_cells() {
        let now = at(2024, 6, 15);
        assert_eq!(compute_analytics(&[], now).monthly_trends.len(), 6);
        let apps = vec![make_app("applied", "Acme", at(2023, 1, 1))];
        assert_eq!(compute_analytics(&apps, now).monthly_trends.len(), 6);
    }

    #[test]
    fn test_monthly_trends_span_year_boundary() {
        let summary = compute_analytics(&[], at(2024, 1, 10));
        let months: Vec<&str> = summary.monthly_trends.iter().map(|t| t.month.as_str()).collect();
        assert_eq!(
            months,
            vec!["2023-08", "2023-09", "2023-10", "2023-11", "2023-12", "2024-01"]
        );
    }

    #[test]
    fn test_monthly_trends_count_by_calendar_month() {
        let now = at(2024, 6, 15);
        let apps = vec![
            make_app("applied", "Acme", at(2024, 6, 1)),
            make_app("applied", "Acme", at(2024, 6, 30)),
            make_app("applied", "Acme", at(2024, 4, 10)),
            // outside the window: total only
            make_app("applied", "Acme", at(2023, 11, 10)),
        ];
        let summary = compute_analytics(&apps, now);
        let june = summary.monthly_trends.iter().find(|t| t.month == "2024-06").unwrap();
        let april = summary.monthly_trends.iter().find(|t| t.month == "2024-04").unwrap();
        let may = summary.monthly_trends.iter().find(|t| t.month == "2024-05").unwrap();
        assert_eq!(june.count, 2);
        assert_eq!(april.count, 1);
        assert_eq!(may.count, 0);
        let trend_sum: usize = summary.monthly_trends.iter().map(|t| t.count).sum();
        assert_eq!(trend_sum, 3);
        assert_eq!(summary.total_applications, 4);
    }

    #[test]
    fn test_recent_applications_capped_and_sorted_descending() {
        let now = at(2024, 6, 15);
        let apps: Vec<_> = (1..=7)
            .map(|day| make_app("applied", "Acme", at(2024, 6, day)))
            .collect();
        let summary = compute_analytics(&apps, now);
        assert_eq!(summary.recent_applications.len(), 5);
        for pair in summary.recent_applications.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
        assert_eq!(summary.recent_applications[0].created_at, at(2024, 6, 7));
    }

    #[test]
    fn test_top_companies_capped_sorted_with_stable_ties() {
        let now = at(2024, 6, 15);
        let mut apps = Vec::new();
        for company in ["A", "B", "C", "D", "E", "F"] {
            apps.push(make_app("applied", company, at(2024, 6, 1)));
        }
        apps.push(make_app("applied", "D", at(2024, 6, 2)));
        let summary = compute_analytics(&apps, now);
        assert_eq!(summary.top_companies.len(), 5);
        assert_eq!(summary.top_companies[0].company, "D");
        assert_eq!(summary.top_companies[0].count, 2);
        // ties keep first-seen order
        let rest: Vec<&str> = summary.top_companies[1..]
            .iter()
            .map(|c| c.company.as_str())
            .collect();
        assert_eq!(rest, vec!["A", "B", "C", "E"]);
    }

    #[test]
    fn test_average_is_total_over_six_months() {
        let now = at(2024, 6, 15);
        let apps: Vec<_> = (0..12)
            .map(|i| make_app("applied", "Acme", at(2024, 6, 1 + (i % 20))))
            .collect();
        let summary = compute_analytics(&apps, now);
        assert!((summary.average_applications_per_month - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_idempotent_for_unchanged_input() {
        let now = at(2024, 6, 15);
        let apps = vec![
            make_app("offer", "Acme", at(2024, 6, 1)),
            make_app("applied", "Globex", at(2024, 5, 20)),
        ];
        let first = serde_json::to_value(compute_analytics(&apps, now)).unwrap();
        let second = serde_json::to_value(compute_analytics(&apps, now)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mixed_scenario_matches_expected_numbers() {
        let now = at(2024, 6, 15);
        let apps = vec![
            make_app("offer", "Acme", at(2024, 6, 1)),
            make_app("rejected", "Acme", at(2024, 6, 2)),
            make_app("applied", "Globex", at(2024, 6, 3)),
        ];
        let summary = compute_analytics(&apps, now);
        assert_eq!(summary.total_applications, 3);
        assert!((summary.success_rate - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.top_companies[0].company, "Acme");
        assert_eq!(summary.top_companies[0].count, 2);
        assert_eq!(summary.top_companies[1].company, "Globex");
        assert_eq!(summary.top_companies[1].count, 1);
        let counts: Vec<usize> = summary.status_distribution.iter().map(|b| b.count).collect();
        // applied, assessment, interview, offer, rejected
        assert_eq!(counts, vec![1, 0, 0, 1, 1]);
    }

    #[test]
    fn test_dashboard_stats_rates_and_counts() {
        let apps = vec![
            make_app("interview", "Acme", at(2024, 6, 1)),
            make_app("offer", "Globex", at(2024, 6, 2)),
            make_app("rejected", "Initech", at(2024, 6, 3)),
            make_app("rejected", "Hooli", at(2024, 6, 4)),
        ];
        let stats = compute_dashboard_stats(&apps);
        assert_eq!(stats.total_applications, 4);
        assert_eq!(stats.interviews_scheduled, 1);
        assert_eq!(stats.offers_received, 1);
        assert!((stats.rejection_rate - 50.0).abs() < f64::EPSILON);
        assert_eq!(stats.recent_applications.len(), 4);
        assert_eq!(stats.recent_applications[0].company, "Hooli");
    }

    #[test]
    fn test_dashboard_stats_empty_input() {
        let stats = compute_dashboard_stats(&[]);
        assert_eq!(stats.total_applications, 0);
        assert_eq!(stats.rejection_rate, 0.0);
    }

    #[test]
    fn test_months_back_borrows_across_years() {
        assert_eq!(months_back(2024, 1, 0), (2024, 1));
        assert_eq!(months_back(2024, 1, 1), (2023, 12));
        assert_eq!(months_back(2024, 3, 14), (2023, 1));
    }
}
