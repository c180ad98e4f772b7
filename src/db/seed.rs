//! Generated demo dataset
//!
//! Ten hand-written reports around New York City followed by twenty randomly
//! generated ones. The collection is generated once per source, so repeated
//! loads return the same snapshot.

use super::{IssueSource, SourceError};
use crate::models::{Comment, Issue, IssueCategory, IssueStatus, Location};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EARTH_RADIUS_KM: f64 = 6371.0;
const NYC_LAT: f64 = 40.7128;
const NYC_LNG: f64 = -74.0060;

const JOHN_AVATAR: &str =
    "https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg?auto=compress&cs=tinysrgb&w=100";
const ADMIN_AVATAR: &str =
    "https://images.pexels.com/photos/1239291/pexels-photo-1239291.jpeg?auto=compress&cs=tinysrgb&w=100";

const ADDRESSES: [&str; 10] = [
    "123 Main St",
    "456 Oak Avenue",
    "789 Elm Boulevard",
    "321 Pine Road",
    "654 Maple Lane",
    "987 Cedar Court",
    "741 Birch Street",
    "852 Walnut Drive",
    "963 Willow Path",
    "159 Cherry Way",
];

/// In-memory source backed by the generated demo collection
#[derive(Debug, Clone)]
pub struct SeedIssueSource {
    issues: Vec<Issue>,
}

impl SeedIssueSource {
    pub fn new() -> Self {
        Self::generate(&mut StdRng::from_entropy(), Utc::now())
    }

    /// Deterministic dataset for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::generate(&mut StdRng::seed_from_u64(seed), Utc::now())
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    fn generate(rng: &mut StdRng, now: DateTime<Utc>) -> Self {
        let mut gen = Generator { rng, now };
        let mut issues = gen.curated();

        for i in 11..=30 {
            let category = IssueCategory::ALL[gen.rng.gen_range(0..IssueCategory::ALL.len())];
            let status = IssueStatus::ALL[gen.rng.gen_range(0..IssueStatus::ALL.len())];
            let address = ADDRESSES[gen.rng.gen_range(0..ADDRESSES.len())];
            let reported_by = if gen.rng.gen_bool(0.5) { "1" } else { "2" };
            let (reported_at, updated_at) = gen.timestamps(30, 15);
            let has_upvoted = gen.rng.gen_bool(0.3);
            // The session's own vote is part of the count
            let min_upvotes = u32::from(has_upvoted);

            issues.push(Issue {
                id: i.to_string(),
                title: format!("Issue #{}", i),
                description: format!(
                    "This is a randomly generated issue for {}. It was reported and needs to be addressed.",
                    category
                ),
                category,
                status,
                location: gen.location(10.0, address),
                photos: vec![],
                reported_by: reported_by.to_string(),
                reported_at,
                updated_at,
                upvotes: gen.rng.gen_range(min_upvotes..20),
                comments: vec![],
                has_upvoted,
            });
        }

        tracing::debug!("Generated {} seed issues", issues.len());
        Self { issues }
    }
}

impl Default for SeedIssueSource {
    fn default() -> Self {
        Self::new()
    }
}

impl IssueSource for SeedIssueSource {
    async fn load(&self) -> Result<Vec<Issue>, SourceError> {
        Ok(self.issues.clone())
    }
}

struct Generator<'a> {
    rng: &'a mut StdRng,
    now: DateTime<Utc>,
}

impl Generator<'_> {
    /// Timestamp a random whole number of days (0..max_days) before now
    fn past(&mut self, max_days: i64) -> DateTime<Utc> {
        self.now - Duration::days(self.rng.gen_range(0..max_days))
    }

    /// Report and last-update timestamps, the update never preceding the report
    fn timestamps(
        &mut self,
        reported_days: i64,
        updated_days: i64,
    ) -> (DateTime<Utc>, DateTime<Utc>) {
        let reported_at = self.past(reported_days);
        let updated_at = self.past(updated_days).max(reported_at);
        (reported_at, updated_at)
    }

    /// Random point within `radius_km` of the city center
    fn location(&mut self, radius_km: f64, address: &str) -> Location {
        let angle = self.rng.gen::<f64>() * std::f64::consts::TAU;
        let distance = self.rng.gen::<f64>() * radius_km / EARTH_RADIUS_KM;

        let lat0 = NYC_LAT.to_radians();
        let lng0 = NYC_LNG.to_radians();

        let lat = (lat0.sin() * distance.cos() + lat0.cos() * distance.sin() * angle.cos()).asin();
        let lng = lng0
            + (angle.sin() * distance.sin() * lat0.cos())
                .atan2(distance.cos() - lat0.sin() * lat.sin());

        Location {
            lat: lat.to_degrees(),
            lng: lng.to_degrees(),
            address: Some(address.to_string()),
        }
    }

    fn comment(&mut self, id: &str, issue_id: &str, admin: bool, content: &str, days: i64) -> Comment {
        let (user_id, user_name, avatar) = if admin {
            ("2", "Admin User", ADMIN_AVATAR)
        } else {
            ("1", "John Citizen", JOHN_AVATAR)
        };
        Comment {
            id: id.to_string(),
            issue_id: issue_id.to_string(),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            user_avatar: Some(avatar.to_string()),
            content: content.to_string(),
            created_at: self.past(days),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn issue(
        &mut self,
        id: &str,
        title: &str,
        description: &str,
        category: IssueCategory,
        status: IssueStatus,
        (radius_km, address): (f64, &str),
        photo: Option<&str>,
        reported_by: &str,
        (reported_days, updated_days): (i64, i64),
        upvotes: u32,
        has_upvoted: bool,
    ) -> Issue {
        let (reported_at, updated_at) = self.timestamps(reported_days, updated_days);
        Issue {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category,
            status,
            location: self.location(radius_km, address),
            photos: photo
                .map(|p| {
                    vec![format!(
                        "https://images.pexels.com/photos/{p}/pexels-photo-{p}.jpeg?auto=compress&cs=tinysrgb&w=600"
                    )]
                })
                .unwrap_or_default(),
            reported_by: reported_by.to_string(),
            reported_at,
            updated_at,
            upvotes,
            comments: vec![],
            has_upvoted,
        }
    }

    fn curated(&mut self) -> Vec<Issue> {
        use IssueCategory as C;
        use IssueStatus as S;

        let mut pothole = self.issue(
            "1",
            "Pothole on Main Street",
            "Large pothole that has been growing for weeks. It's causing damage to vehicles and is a safety hazard, especially at night.",
            C::Roads,
            S::InProgress,
            (5.0, "123 Main Street"),
            Some("2082103"),
            "1",
            (30, 15),
            24,
            false,
        );
        pothole.comments = vec![
            self.comment("c1", "1", false, "I hit this pothole yesterday and almost damaged my tire!", 28),
            self.comment("c2", "1", true, "Thanks for reporting. We've dispatched a team to assess the issue.", 20),
        ];

        let light = self.issue(
            "2",
            "Broken Street Light",
            "Street light on corner of Oak and 5th has been out for over a week, making the intersection unsafe at night.",
            C::Lighting,
            S::Reported,
            (5.0, "501 Oak Avenue"),
            Some("1755680"),
            "1",
            (10, 10),
            12,
            true,
        );

        let mut trash = self.issue(
            "3",
            "Overflowing Trash Can",
            "The public trash can at Central Park entrance has been overflowing for days. It's attracting pests and creating bad odors.",
            C::Trash,
            S::Resolved,
            (2.0, "Central Park East Entrance"),
            Some("2199486"),
            "2",
            (14, 3),
            8,
            false,
        );
        trash.comments = vec![
            self.comment("c3", "3", true, "The sanitation department has been notified and will clear this trash can today.", 10),
            self.comment("c4", "3", false, "Thank you! The trash has been cleared and the area is much cleaner now.", 3),
        ];

        let mut water = self.issue(
            "4",
            "Water Main Break",
            "Water is gushing from the street near the intersection. It's flooding the sidewalk and part of the road.",
            C::Water,
            S::UnderReview,
            (3.0, "742 Elm Street"),
            Some("2286895"),
            "1",
            (2, 1),
            35,
            false,
        );
        water.comments = vec![self.comment(
            "c5",
            "4",
            true,
            "We have dispatched an emergency water department team to address this issue. Please avoid the area for now.",
            1,
        )];

        let mut power = self.issue(
            "5",
            "Power Outage",
            "The entire block has been without power since last night. Several residents depend on medical equipment.",
            C::Electricity,
            S::InProgress,
            (4.0, "800 Block of Maple Avenue"),
            None,
            "1",
            (5, 2),
            27,
            true,
        );
        power.comments = vec![self.comment(
            "c6",
            "5",
            false,
            "I've seen utility trucks in the area. Looks like they're working on it.",
            2,
        )];

        let graffiti = self.issue(
            "6",
            "Graffiti on Community Center",
            "Offensive graffiti has appeared on the east wall of the community center. It needs to be removed before the weekend events.",
            C::Other,
            S::Reported,
            (3.0, "123 Community Way"),
            Some("3279690"),
            "2",
            (4, 4),
            7,
            false,
        );

        let mut noise = self.issue(
            "7",
            "Loud Construction Noise",
            "Construction work continues well past permitted hours, keeping residents awake late into the night.",
            C::Noise,
            S::UnderReview,
            (4.0, "400 Pine Street"),
            None,
            "1",
            (6, 3),
            18,
            false,
        );
        noise.comments = vec![self.comment(
            "c7",
            "7",
            true,
            "We're reviewing the noise permit for this construction site. An inspector will visit tomorrow evening.",
            3,
        )];

        let mut intersection = self.issue(
            "8",
            "Dangerous Intersection",
            "Cars routinely run the stop sign at this intersection. There have been several near misses with pedestrians.",
            C::Safety,
            S::InProgress,
            (5.0, "Cedar and Main Intersection"),
            Some("1881676"),
            "1",
            (45, 7),
            42,
            true,
        );
        intersection.comments = vec![
            self.comment("c8", "8", false, "I almost got hit by a car here yesterday! We need a traffic light!", 30),
            self.comment(
                "c9",
                "8",
                true,
                "A traffic study has been completed and the transportation department has approved installation of a traffic light. Construction will begin next month.",
                7,
            ),
        ];

        let mut underpass = self.issue(
            "9",
            "Flooded Underpass",
            "The underpass floods every time it rains, making it impassable for cars and pedestrians alike.",
            C::Roads,
            S::Resolved,
            (6.0, "River Road Underpass"),
            Some("12587454"),
            "2",
            (17, 2),
            31,
            false,
        );
        underpass.comments = vec![
            self.comment("c10", "9", true, "Public works department has deployed pumps to clear the flooding.", 10),
            self.comment("c11", "9", false, "The road is now clear and traffic is moving normally. Thank you!", 2),
        ];

        let playground = self.issue(
            "10",
            "Playground Equipment Damaged",
            "The slide at the playground has a broken step and sharp edges exposed. Children are still using it.",
            C::Safety,
            S::Reported,
            (4.0, "Riverside Park, Playground Area"),
            Some("296301"),
            "1",
            (1, 1),
            15,
            false,
        );

        vec![
            pothole,
            light,
            trash,
            water,
            power,
            graffiti,
            noise,
            intersection,
            underpass,
            playground,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_has_thirty_unique_issues() {
        let source = SeedIssueSource::with_seed(7);
        let ids: HashSet<_> = source.issues().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(source.issues().len(), 30);
        assert_eq!(ids.len(), 30);
        assert_eq!(source.issues()[0].title, "Pothole on Main Street");
        assert_eq!(source.issues()[29].id, "30");
    }

    #[test]
    fn test_seed_locations_stay_near_city() {
        let source = SeedIssueSource::with_seed(42);
        for issue in source.issues() {
            assert!((issue.location.lat - NYC_LAT).abs() < 0.2, "{:?}", issue.location);
            assert!((issue.location.lng - NYC_LNG).abs() < 0.2, "{:?}", issue.location);
        }
    }

    #[test]
    fn test_seed_comments_reference_parent() {
        let source = SeedIssueSource::with_seed(1);
        for issue in source.issues() {
            for comment in &issue.comments {
                assert_eq!(comment.issue_id, issue.id);
            }
        }
    }

    #[test]
    fn test_seed_upvote_and_timestamp_invariants() {
        for seed in 0..200 {
            let source = SeedIssueSource::with_seed(seed);
            for issue in source.issues() {
                assert!(
                    !issue.has_upvoted || issue.upvotes >= 1,
                    "seed {} issue {}: upvoted with {} votes",
                    seed,
                    issue.id,
                    issue.upvotes
                );
                assert!(
                    issue.updated_at >= issue.reported_at,
                    "seed {} issue {}: updated before reported",
                    seed,
                    issue.id
                );
            }
        }
    }

    #[tokio::test]
    async fn test_load_returns_same_snapshot() {
        let source = SeedIssueSource::with_seed(3);
        let first = source.load().await.unwrap();
        let second = source.load().await.unwrap();
        assert_eq!(first, second);
    }
}
