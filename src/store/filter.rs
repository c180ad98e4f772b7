//! Issue filtering shared by the map and list views

use crate::models::{Issue, IssueCategory, IssueStatus};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl TimeRange {
    fn window(self) -> Option<Duration> {
        match self {
            TimeRange::Day => Some(Duration::days(1)),
            TimeRange::Week => Some(Duration::days(7)),
            TimeRange::Month => Some(Duration::days(30)),
            TimeRange::Year => Some(Duration::days(365)),
            TimeRange::All => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Proximity {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: f64,
}

/// Selection applied to the issue collection.
///
/// An empty category or status set does not restrict anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFilter {
    pub categories: Vec<IssueCategory>,
    pub statuses: Vec<IssueStatus>,
    pub search: Option<String>,
    pub time_range: TimeRange,
    pub proximity: Option<Proximity>,
}

impl IssueFilter {
    pub fn categories(categories: &[IssueCategory]) -> Self {
        Self {
            categories: categories.to_vec(),
            ..Self::default()
        }
    }

    pub fn statuses(statuses: &[IssueStatus]) -> Self {
        Self {
            statuses: statuses.to_vec(),
            ..Self::default()
        }
    }

    pub fn matches(&self, issue: &Issue, now: DateTime<Utc>) -> bool {
        self.matches_category(issue)
            && self.matches_status(issue)
            && self.matches_search(issue)
            && self.matches_time_range(issue, now)
            && self.matches_proximity(issue)
    }

    fn matches_category(&self, issue: &Issue) -> bool {
        self.categories.is_empty() || self.categories.contains(&issue.category)
    }

    fn matches_status(&self, issue: &Issue) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&issue.status)
    }

    fn matches_search(&self, issue: &Issue) -> bool {
        let term = match self.search.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_lowercase(),
            _ => return true,
        };

        issue.title.to_lowercase().contains(&term)
            || issue.description.to_lowercase().contains(&term)
            || issue
                .location
                .address
                .as_ref()
                .is_some_and(|a| a.to_lowercase().contains(&term))
    }

    fn matches_time_range(&self, issue: &Issue, now: DateTime<Utc>) -> bool {
        match self.time_range.window() {
            Some(window) => issue.reported_at >= now - window,
            None => true,
        }
    }

    fn matches_proximity(&self, issue: &Issue) -> bool {
        match self.proximity {
            Some(p) => {
                distance_km(p.lat, p.lng, issue.location.lat, issue.location.lng) <= p.radius_km
            }
            None => true,
        }
    }
}

/// Apply `filter` keeping collection order
pub fn filter_issues(issues: &[Issue], filter: &IssueFilter, now: DateTime<Utc>) -> Vec<Issue> {
    issues
        .iter()
        .filter(|issue| filter.matches(issue, now))
        .cloned()
        .collect()
}

/// Great-circle distance between two coordinates (haversine)
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::stats::tests::issue;

    fn collection() -> Vec<Issue> {
        let mut pothole = issue("1", IssueCategory::Roads, IssueStatus::InProgress, 3);
        pothole.title = "Pothole on Main Street".to_string();
        pothole.location.address = Some("123 Main Street".to_string());

        let mut light = issue("2", IssueCategory::Lighting, IssueStatus::Reported, 1);
        light.title = "Broken Street Light".to_string();
        light.description = "Dark corner near the OAK avenue bus stop".to_string();

        let mut water = issue("3", IssueCategory::Water, IssueStatus::Resolved, 8);
        water.title = "Water Main Break".to_string();
        water.location.address = Some("742 Elm Street".to_string());
        water.location.lat = 41.5;

        vec![pothole, light, water]
    }

    fn ids(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.id.as_str()).collect()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_empty_filter_returns_everything_in_order() {
        let issues = collection();
        let filtered = filter_issues(&issues, &IssueFilter::default(), now());
        assert_eq!(filtered, issues);
    }

    #[test]
    fn test_category_filter() {
        let issues = collection();
        let filter = IssueFilter::categories(&[IssueCategory::Water, IssueCategory::Roads]);
        assert_eq!(ids(&filter_issues(&issues, &filter, now())), vec!["1", "3"]);
    }

    #[test]
    fn test_status_filter() {
        let issues = collection();
        let filter = IssueFilter::statuses(&[IssueStatus::Reported]);
        assert_eq!(ids(&filter_issues(&issues, &filter, now())), vec!["2"]);
    }

    #[test]
    fn test_category_and_status_are_anded() {
        let issues = collection();
        let filter = IssueFilter {
            categories: vec![IssueCategory::Roads, IssueCategory::Lighting],
            statuses: vec![IssueStatus::Reported, IssueStatus::Resolved],
            ..IssueFilter::default()
        };
        assert_eq!(ids(&filter_issues(&issues, &filter, now())), vec!["2"]);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let issues = collection();
        let search = |term: &str| {
            let filter = IssueFilter {
                search: Some(term.to_string()),
                ..IssueFilter::default()
            };
            filter_issues(&issues, &filter, now())
                .into_iter()
                .map(|i| i.id)
                .collect::<Vec<_>>()
        };

        assert_eq!(search("POTHOLE"), vec!["1"]);
        assert_eq!(search("oak Avenue"), vec!["2"]);
        assert_eq!(search("elm"), vec!["3"]);
        assert_eq!(search("street"), vec!["1", "2", "3"]);
        assert_eq!(search("   "), vec!["1", "2", "3"]);
        assert!(search("graffiti").is_empty());
    }

    #[test]
    fn test_search_anded_with_category() {
        let issues = collection();
        let filter = IssueFilter {
            categories: vec![IssueCategory::Water],
            search: Some("street".to_string()),
            ..IssueFilter::default()
        };
        assert_eq!(ids(&filter_issues(&issues, &filter, now())), vec!["3"]);
    }

    #[test]
    fn test_time_range() {
        let now = now();
        let mut issues = collection();
        issues[0].reported_at = now - Duration::hours(2);
        issues[1].reported_at = now - Duration::days(3);
        issues[2].reported_at = now - Duration::days(90);

        let within = |range: TimeRange| {
            let filter = IssueFilter {
                time_range: range,
                ..IssueFilter::default()
            };
            filter_issues(&issues, &filter, now).len()
        };

        assert_eq!(within(TimeRange::Day), 1);
        assert_eq!(within(TimeRange::Week), 2);
        assert_eq!(within(TimeRange::Month), 2);
        assert_eq!(within(TimeRange::Year), 3);
        assert_eq!(within(TimeRange::All), 3);
    }

    #[test]
    fn test_proximity() {
        let issues = collection();
        let filter = IssueFilter {
            proximity: Some(Proximity {
                lat: 40.7128,
                lng: -74.006,
                radius_km: 5.0,
            }),
            ..IssueFilter::default()
        };
        assert_eq!(ids(&filter_issues(&issues, &filter, now())), vec!["1", "2"]);
    }

    #[test]
    fn test_distance_km() {
        assert!(distance_km(40.7128, -74.006, 40.7128, -74.006).abs() < 1e-9);
        // New York to Philadelphia is roughly 130 km
        let d = distance_km(40.7128, -74.006, 39.9526, -75.1652);
        assert!((125.0..135.0).contains(&d), "{}", d);
    }
}
