use serde::{Deserialize, Serialize};

use crate::core::distance::distance_between;
use crate::models::Profile;

/// Highest score a candidate can reach
pub const MAX_SCORE: u32 = 100;

/// Which rule set produced a score.
///
/// `V1` is the web application's formula; `V2` is the interactive
/// application's interest-driven formula. Results always report the version
/// so scores from different rule sets are never compared silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringVersion {
    #[default]
    V1,
    V2,
}

impl ScoringVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringVersion::V1 => "v1",
            ScoringVersion::V2 => "v2",
        }
    }
}

impl std::fmt::Display for ScoringVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScoringVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "v1" => Ok(ScoringVersion::V1),
            "v2" => Ok(ScoringVersion::V2),
            other => Err(format!("unknown scoring version '{}'", other)),
        }
    }
}

/// Upper bound (inclusive) and the points awarded within it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier<T> {
    pub max: T,
    pub points: u32,
}

const fn tier<T>(max: T, points: u32) -> Tier<T> {
    Tier { max, points }
}

/// A complete, versioned set of scoring constants
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRules {
    pub version: ScoringVersion,
    /// Checked in order, first match wins
    pub age_tiers: Vec<Tier<u32>>,
    /// Checked in order, first match wins
    pub distance_tiers: Vec<Tier<f64>>,
    pub points_per_shared_interest: u32,
    pub same_city_points: u32,
    /// Assigned when no signal contributed anything
    pub floor: u32,
}

impl ScoringRules {
    /// Web application formula: three age tiers, distance, baseline of 20
    pub fn v1() -> Self {
        Self {
            version: ScoringVersion::V1,
            age_tiers: vec![tier(5, 30), tier(10, 20), tier(15, 10)],
            distance_tiers: default_distance_tiers(),
            points_per_shared_interest: 0,
            same_city_points: 0,
            floor: 20,
        }
    }

    /// Interactive application formula: two age tiers, interests, city, no baseline
    pub fn v2() -> Self {
        Self {
            version: ScoringVersion::V2,
            age_tiers: vec![tier(5, 30), tier(10, 15)],
            distance_tiers: default_distance_tiers(),
            points_per_shared_interest: 10,
            same_city_points: 20,
            floor: 0,
        }
    }

    pub fn for_version(version: ScoringVersion) -> Self {
        match version {
            ScoringVersion::V1 => Self::v1(),
            ScoringVersion::V2 => Self::v2(),
        }
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::v1()
    }
}

fn default_distance_tiers() -> Vec<Tier<f64>> {
    vec![tier(10.0, 40), tier(50.0, 20), tier(100.0, 10)]
}

/// Per-signal outcome of scoring one candidate
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub age_points: u32,
    pub distance_points: u32,
    pub interest_points: u32,
    pub city_points: u32,
    /// Final score after floor and clamp
    pub score: u8,
    /// Unrounded distance, present only when both locations are exposed
    pub distance_km: Option<f64>,
    pub shared_interests: Vec<String>,
}

impl ScoreBreakdown {
    pub fn raw_total(&self) -> u32 {
        self.age_points + self.distance_points + self.interest_points + self.city_points
    }
}

/// Calculate a match score (0-100) for `candidate` as seen by `requester`
///
/// Signals are independent and additive; a missing attribute on either side
/// skips that signal. Never fails.
pub fn calculate_match_score(requester: &Profile, candidate: &Profile, rules: &ScoringRules) -> ScoreBreakdown {
    let age_points = match (requester.age, candidate.age) {
        (Some(a), Some(b)) => calculate_age_points(a, b, &rules.age_tiers),
        _ => 0,
    };

    let distance_km = distance_between(requester.exposed_location(), candidate.exposed_location());
    let distance_points = distance_km
        .map(|d| calculate_distance_points(d, &rules.distance_tiers))
        .unwrap_or(0);

    let shared_interests: Vec<String> = if rules.points_per_shared_interest > 0 {
        requester
            .interests
            .intersection(&candidate.interests)
            .cloned()
            .collect()
    } else {
        Vec::new()
    };
    let interest_points = rules
        .points_per_shared_interest
        .saturating_mul(shared_interests.len() as u32);

    let city_points = if rules.same_city_points > 0 && same_city(requester, candidate) {
        rules.same_city_points
    } else {
        0
    };

    let mut breakdown = ScoreBreakdown {
        age_points,
        distance_points,
        interest_points,
        city_points,
        score: 0,
        distance_km,
        shared_interests,
    };

    let raw = breakdown.raw_total();
    let raw = if raw == 0 { rules.floor } else { raw };
    breakdown.score = raw.min(MAX_SCORE) as u8;

    breakdown
}

/// Points for the age gap between two profiles
#[inline]
fn calculate_age_points(a: u8, b: u8, tiers: &[Tier<u32>]) -> u32 {
    let diff = (a as i32 - b as i32).unsigned_abs();
    tiers
        .iter()
        .find(|t| diff <= t.max)
        .map(|t| t.points)
        .unwrap_or(0)
}

/// Points for the distance between two profiles
#[inline]
fn calculate_distance_points(distance_km: f64, tiers: &[Tier<f64>]) -> u32 {
    tiers
        .iter()
        .find(|t| distance_km <= t.max)
        .map(|t| t.points)
        .unwrap_or(0)
}

fn same_city(a: &Profile, b: &Profile) -> bool {
    match (a.city.as_deref(), b.city.as_deref()) {
        (Some(x), Some(y)) => {
            let (x, y) = (x.trim(), y.trim());
            !x.is_empty() && x.to_lowercase() == y.to_lowercase()
        }
        _ => false,
    }
}
