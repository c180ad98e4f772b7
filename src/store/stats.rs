//! Dashboard aggregation
//!
//! Recomputed from the collection on every call; nothing is cached.

use crate::models::{DashboardStats, Issue, IssueStatus, TrendPoint};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// Number of calendar days covered by the trend, ending on the reference day
pub const TREND_DAYS: i64 = 7;

/// Number of issues in the top-upvoted list
pub const TOP_UPVOTED_LIMIT: usize = 5;

/// Aggregate the collection as seen on `today` (UTC calendar date).
///
/// Categories and statuses with no issues are absent from the groupings.
pub fn dashboard_stats(issues: &[Issue], today: NaiveDate) -> DashboardStats {
    let mut issues_by_category = BTreeMap::new();
    let mut issues_by_status = BTreeMap::new();
    for issue in issues {
        *issues_by_category.entry(issue.category).or_insert(0) += 1;
        *issues_by_status.entry(issue.status).or_insert(0) += 1;
    }

    DashboardStats {
        total_issues: issues.len(),
        resolved_issues: count_status(issues, IssueStatus::Resolved),
        in_progress_issues: count_status(issues, IssueStatus::InProgress),
        issues_by_category,
        issues_by_status,
        issues_trend: issues_trend(issues, today),
        top_upvoted_issues: top_upvoted(issues, TOP_UPVOTED_LIMIT),
    }
}

fn count_status(issues: &[Issue], status: IssueStatus) -> usize {
    issues.iter().filter(|i| i.status == status).count()
}

/// Reported and resolved counts for the seven days ending on `today`, oldest first.
///
/// An issue counts as resolved on the day its `updated_at` falls on while its
/// current status is `resolved`.
pub fn issues_trend(issues: &[Issue], today: NaiveDate) -> Vec<TrendPoint> {
    (0..TREND_DAYS)
        .rev()
        .map(|days_ago| {
            let date = today - Duration::days(days_ago);
            let reported = issues
                .iter()
                .filter(|i| i.reported_at.date_naive() == date)
                .count();
            let resolved = issues
                .iter()
                .filter(|i| i.status == IssueStatus::Resolved && i.updated_at.date_naive() == date)
                .count();
            TrendPoint {
                date,
                reported,
                resolved,
            }
        })
        .collect()
}

/// The `limit` most upvoted issues; ties keep collection order.
pub fn top_upvoted(issues: &[Issue], limit: usize) -> Vec<Issue> {
    let mut ranked: Vec<&Issue> = issues.iter().collect();
    // stable
    ranked.sort_by(|a, b| b.upvotes.cmp(&a.upvotes));
    ranked.into_iter().take(limit).cloned().collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{IssueCategory, Location};
    use chrono::{DateTime, TimeZone, Utc};

    pub(crate) fn issue(id: &str, category: IssueCategory, status: IssueStatus, upvotes: u32) -> Issue {
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        Issue {
            id: id.to_string(),
            title: format!("Issue {}", id),
            description: "A description long enough to pass validation".to_string(),
            category,
            status,
            location: Location {
                lat: 40.7128,
                lng: -74.006,
                address: None,
            },
            photos: vec![],
            reported_by: "1".to_string(),
            reported_at: at,
            updated_at: at,
            upvotes,
            comments: vec![],
            has_upvoted: false,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_counts_and_groupings() {
        let issues = vec![
            issue("1", IssueCategory::Roads, IssueStatus::Resolved, 0),
            issue("2", IssueCategory::Roads, IssueStatus::InProgress, 0),
            issue("3", IssueCategory::Water, IssueStatus::Reported, 0),
            issue("4", IssueCategory::Noise, IssueStatus::Resolved, 0),
        ];
        let stats = dashboard_stats(&issues, day(10));

        assert_eq!(stats.total_issues, 4);
        assert_eq!(stats.resolved_issues, 2);
        assert_eq!(stats.in_progress_issues, 1);
        assert!(stats.resolved_issues + stats.in_progress_issues <= stats.total_issues);
        assert_eq!(stats.issues_by_category.get(&IssueCategory::Roads), Some(&2));
        assert_eq!(stats.issues_by_category.get(&IssueCategory::Water), Some(&1));
        assert_eq!(stats.issues_by_category.get(&IssueCategory::Lighting), None);
        assert_eq!(stats.issues_by_status.get(&IssueStatus::Resolved), Some(&2));
        assert_eq!(stats.issues_by_status.get(&IssueStatus::Closed), None);
    }

    #[test]
    fn test_empty_collection() {
        let stats = dashboard_stats(&[], day(10));
        assert_eq!(stats.total_issues, 0);
        assert!(stats.issues_by_category.is_empty());
        assert!(stats.top_upvoted_issues.is_empty());
        assert_eq!(stats.issues_trend.len(), 7);
        assert!(stats
            .issues_trend
            .iter()
            .all(|p| p.reported == 0 && p.resolved == 0));
    }

    #[test]
    fn test_trend_covers_seven_days_ending_today() {
        let trend = issues_trend(&[], day(10));
        let dates: Vec<NaiveDate> = trend.iter().map(|p| p.date).collect();
        assert_eq!(dates, (4..=10).map(day).collect::<Vec<_>>());
    }

    #[test]
    fn test_trend_spans_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let trend = issues_trend(&[], today);
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2024, 2, 25).unwrap());
        assert_eq!(trend[6].date, today);
    }

    #[test]
    fn test_trend_counts_by_calendar_date() {
        let mut a = issue("1", IssueCategory::Roads, IssueStatus::Resolved, 0);
        a.reported_at = at(5, 1);
        a.updated_at = at(9, 23);
        let mut b = issue("2", IssueCategory::Roads, IssueStatus::Reported, 0);
        b.reported_at = at(5, 22);
        b.updated_at = at(9, 8);
        let mut c = issue("3", IssueCategory::Trash, IssueStatus::Resolved, 0);
        // outside the window
        c.reported_at = at(1, 12);
        c.updated_at = at(3, 12);

        let trend = issues_trend(&[a, b, c], day(10));
        let on = |d: u32| trend.iter().find(|p| p.date == day(d)).unwrap();

        assert_eq!(on(5).reported, 2);
        assert_eq!(on(9).resolved, 1);
        assert_eq!(trend.iter().map(|p| p.reported).sum::<usize>(), 2);
        assert_eq!(trend.iter().map(|p| p.resolved).sum::<usize>(), 1);
    }

    #[test]
    fn test_top_upvoted_scenario() {
        let issues = vec![
            issue("a", IssueCategory::Roads, IssueStatus::Reported, 5),
            issue("b", IssueCategory::Roads, IssueStatus::Reported, 1),
            issue("c", IssueCategory::Roads, IssueStatus::Reported, 9),
        ];
        let top = dashboard_stats(&issues, day(10)).top_upvoted_issues;
        let ids: Vec<&str> = top.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_top_upvoted_truncates_and_keeps_tie_order() {
        let issues: Vec<Issue> = [3, 7, 3, 7, 1, 3, 9]
            .iter()
            .enumerate()
            .map(|(n, &votes)| issue(&n.to_string(), IssueCategory::Other, IssueStatus::Reported, votes))
            .collect();
        let top = top_upvoted(&issues, TOP_UPVOTED_LIMIT);
        let ids: Vec<&str> = top.iter().map(|i| i.id.as_str()).collect();

        assert_eq!(ids, vec!["6", "1", "3", "0", "2"]);
        assert!(top.windows(2).all(|w| w[0].upvotes >= w[1].upvotes));
        assert!(top.iter().all(|t| issues.contains(t)));
    }
}
