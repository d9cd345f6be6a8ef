use serde::{Deserialize, Serialize};

use super::{ServiceRequirements, VendorCandidate};
use crate::engine::{EngineError, OrdinalScale, ScoreBands};

const BASE_SCORE: f64 = 50.0;
const MAX_SCORE: f64 = 100.0;

const PRICE_FLOOR: f64 = 60.0;
const PRICE_SPAN: f64 = 40.0;
const UNIFORM_PRICE_SCORE: f64 = 80.0;

const QUALITY_BASE: f64 = 70.0;
const QUALITY_PER_YEAR: f64 = 2.0;

const INSURANCE_POINTS: f64 = 10.0;
const POINTS_PER_CERTIFICATION: f64 = 3.0;
const CERTIFICATION_CAP: f64 = 10.0;

const MUST_HAVE_POINTS: f64 = 60.0;
const NICE_TO_HAVE_POINTS: f64 = 40.0;
const NO_SERVICES_LISTED: f64 = 50.0;

/// Sub-scores on a 0–100 scale derived from a vendor's profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VendorSubScores {
    pub price_score: f64,
    pub quality_score: f64,
    pub experience_score: f64,
    pub reliability_score: f64,
    pub service_fit_score: f64,
}

/// Cheapest and dearest quote in a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteRange {
    pub lowest: f64,
    pub highest: f64,
}

impl QuoteRange {
    /// An empty batch yields an inverted range no quote falls in.
    pub fn of(candidates: &[VendorCandidate]) -> Self {
        candidates.iter().fold(
            Self {
                lowest: f64::INFINITY,
                highest: f64::NEG_INFINITY,
            },
            |range, candidate| Self {
                lowest: range.lowest.min(candidate.quote_amount),
                highest: range.highest.max(candidate.quote_amount),
            },
        )
    }

    /// Cheaper quotes score higher, spread over 60–100. A batch of equal
    /// quotes scores 80 throughout.
    pub fn price_score(&self, quote: f64) -> f64 {
        if self.highest == self.lowest {
            return UNIFORM_PRICE_SCORE;
        }
        let normalized = (self.highest - quote) / (self.highest - self.lowest);
        (PRICE_FLOOR + normalized * PRICE_SPAN).round()
    }
}

/// Bonus points for a measurement: the band picks a label, the scale prices it.
#[derive(Debug, Clone)]
struct BandedPoints {
    bands: ScoreBands,
    points: OrdinalScale,
}

impl BandedPoints {
    /// `cutoffs` are `(minimum, label, points)` from the highest band down;
    /// anything below the last cutoff earns nothing.
    fn new(cutoffs: &[(f64, &str, f64)], floor: &str) -> Result<Self, EngineError> {
        let bands = ScoreBands::new(
            cutoffs.iter().map(|(minimum, label, _)| (*minimum, *label)),
            floor,
        )?;
        let points = OrdinalScale::new(
            std::iter::once((floor, 0.0))
                .chain(cutoffs.iter().rev().map(|(_, label, points)| (*label, *points))),
        )?;
        Ok(Self { bands, points })
    }

    fn award(&self, measurement: f64) -> f64 {
        self.points
            .resolve(self.bands.classify(measurement))
            .unwrap_or(0.0)
    }
}

/// Rubric turning raw vendor data into sub-scores.
#[derive(Debug, Clone)]
pub struct VendorCriteria {
    experience_years: BandedPoints,
    past_events: BandedPoints,
    client_references: BandedPoints,
    response_speed: BandedPoints,
}

impl VendorCriteria {
    pub fn new() -> Result<Self, EngineError> {
        Ok(Self {
            experience_years: BandedPoints::new(
                &[
                    (10.0, "veteran", 30.0),
                    (5.0, "seasoned", 20.0),
                    (2.0, "established", 10.0),
                ],
                "new_entrant",
            )?,
            past_events: BandedPoints::new(
                &[
                    (100.0, "extensive", 20.0),
                    (50.0, "broad", 15.0),
                    (20.0, "regular", 10.0),
                    (5.0, "occasional", 5.0),
                ],
                "rare",
            )?,
            client_references: BandedPoints::new(
                &[
                    (10.0, "well_referenced", 20.0),
                    (5.0, "referenced", 15.0),
                    (2.0, "few_references", 10.0),
                ],
                "unreferenced",
            )?,
            // Keyed on negated hours so faster replies land in higher bands.
            response_speed: BandedPoints::new(
                &[
                    (-4.0, "within_4h", 15.0),
                    (-24.0, "same_day", 10.0),
                    (-48.0, "within_2d", 5.0),
                ],
                "slow",
            )?,
        })
    }

    pub fn derive(
        &self,
        candidate: &VendorCandidate,
        quotes: QuoteRange,
        requirements: &ServiceRequirements,
    ) -> VendorSubScores {
        VendorSubScores {
            price_score: quotes.price_score(candidate.quote_amount),
            quality_score: quality(candidate),
            experience_score: self.experience(candidate),
            reliability_score: self.reliability(candidate),
            service_fit_score: service_fit(&candidate.offered_services, requirements),
        }
    }

    fn experience(&self, candidate: &VendorCandidate) -> f64 {
        let years = candidate
            .experience_years
            .map_or(0.0, |years| self.experience_years.award(years));
        let events = candidate
            .past_event_count
            .map_or(0.0, |count| self.past_events.award(f64::from(count)));
        (BASE_SCORE + years + events).min(MAX_SCORE)
    }

    fn reliability(&self, candidate: &VendorCandidate) -> f64 {
        let references = candidate
            .client_references
            .map_or(0.0, |count| self.client_references.award(f64::from(count)));
        let response = candidate
            .response_time_hours
            .map_or(0.0, |hours| self.response_speed.award(-hours));
        let insurance = if candidate.insurance_coverage {
            INSURANCE_POINTS
        } else {
            0.0
        };
        let certifications = (candidate.certifications.len() as f64 * POINTS_PER_CERTIFICATION)
            .min(CERTIFICATION_CAP);

        (BASE_SCORE + references + response + insurance + certifications).min(MAX_SCORE)
    }
}

fn quality(candidate: &VendorCandidate) -> f64 {
    (QUALITY_BASE + candidate.experience_years.unwrap_or(0.0) * QUALITY_PER_YEAR).min(MAX_SCORE)
}

/// Must-haves are worth 60 points and nice-to-haves 40. An empty list earns
/// half its points; a vendor listing no services scores 50 outright.
pub fn service_fit(offered: &[String], requirements: &ServiceRequirements) -> f64 {
    if offered.iter().all(|service| service.trim().is_empty()) {
        return NO_SERVICES_LISTED;
    }

    let coverage = |wanted: &[String], points: f64| {
        if wanted.is_empty() {
            return points / 2.0;
        }
        let met = wanted
            .iter()
            .filter(|requirement| covers(offered, requirement))
            .count();
        met as f64 / wanted.len() as f64 * points
    };

    (coverage(&requirements.must_have, MUST_HAVE_POINTS)
        + coverage(&requirements.nice_to_have, NICE_TO_HAVE_POINTS))
    .round()
}

/// Case-insensitive containment in either direction.
pub fn covers(offered: &[String], requirement: &str) -> bool {
    let requirement = requirement.trim().to_lowercase();
    offered
        .iter()
        .map(|service| service.trim().to_lowercase())
        .filter(|service| !service.is_empty())
        .any(|service| service.contains(&requirement) || requirement.contains(&service))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(quote: f64) -> VendorCandidate {
        VendorCandidate {
            vendor_id: "v".to_string(),
            vendor_name: "Vendor".to_string(),
            quote_amount: quote,
            experience_years: None,
            past_event_count: None,
            client_references: None,
            response_time_hours: None,
            insurance_coverage: false,
            certifications: Vec::new(),
            offered_services: Vec::new(),
        }
    }

    fn services(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn cheaper_quotes_score_higher_within_sixty_to_one_hundred() {
        let batch = [candidate(1_000.0), candidate(2_000.0), candidate(3_000.0)];
        let range = QuoteRange::of(&batch);

        assert_eq!(range.price_score(1_000.0), 100.0);
        assert_eq!(range.price_score(2_000.0), 80.0);
        assert_eq!(range.price_score(3_000.0), 60.0);

        let uniform = QuoteRange::of(&[candidate(500.0), candidate(500.0)]);
        assert_eq!(uniform.price_score(500.0), 80.0);
    }

    #[test]
    fn experience_combines_year_and_event_bands() {
        let criteria = VendorCriteria::new().expect("rubric");
        let mut seasoned = candidate(1.0);
        seasoned.experience_years = Some(12.0);
        seasoned.past_event_count = Some(60);
        let mut green = candidate(1.0);
        green.experience_years = Some(1.0);
        green.past_event_count = Some(3);
        let mut top = candidate(1.0);
        top.experience_years = Some(10.0);
        top.past_event_count = Some(100);

        assert_eq!(criteria.experience(&seasoned), 95.0);
        assert_eq!(criteria.experience(&green), 50.0);
        assert_eq!(criteria.experience(&candidate(1.0)), 50.0);
        assert_eq!(criteria.experience(&top), 100.0);
    }

    #[test]
    fn reliability_caps_at_one_hundred() {
        let criteria = VendorCriteria::new().expect("rubric");
        let mut proven = candidate(1.0);
        proven.client_references = Some(10);
        proven.response_time_hours = Some(2.0);
        proven.insurance_coverage = true;
        proven.certifications = services(&["haccp", "iso", "food", "fire"]);
        let mut partial = candidate(1.0);
        partial.client_references = Some(3);
        partial.response_time_hours = Some(30.0);
        partial.certifications = services(&["haccp"]);

        assert_eq!(criteria.reliability(&proven), 100.0);
        assert_eq!(criteria.reliability(&partial), 68.0);
    }

    #[test]
    fn response_band_edges_are_inclusive() {
        let criteria = VendorCriteria::new().expect("rubric");
        let points = |hours: f64| criteria.response_speed.award(-hours);

        assert_eq!(points(4.0), 15.0);
        assert_eq!(points(24.0), 10.0);
        assert_eq!(points(48.0), 5.0);
        assert_eq!(points(49.0), 0.0);
    }

    #[test]
    fn quality_grows_with_experience_up_to_the_cap() {
        let mut vendor = candidate(1.0);
        vendor.experience_years = Some(8.0);
        assert_eq!(quality(&vendor), 86.0);

        vendor.experience_years = Some(20.0);
        assert_eq!(quality(&vendor), 100.0);
    }

    #[test]
    fn service_fit_counts_requirement_coverage() {
        let requirements = ServiceRequirements {
            must_have: services(&["catering", "av"]),
            nice_to_have: services(&["bar"]),
        };

        assert_eq!(
            service_fit(&services(&["Full Catering", "Bar service"]), &requirements),
            70.0
        );
        assert_eq!(
            service_fit(&services(&["catering"]), &ServiceRequirements::default()),
            50.0
        );
        assert_eq!(service_fit(&[], &requirements), 50.0);
    }
}
