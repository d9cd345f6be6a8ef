mod criteria;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use criteria::covers;
pub use criteria::{QuoteRange, VendorCriteria, VendorSubScores};

use super::{round_to, tier_summary, TierCount};
use crate::engine::{
    EngineError, FactorSpec, RankAndTierClassifier, ScorableItem, ScoreBands, TierTable,
    WeightConfig, WeightedScorer,
};

pub const PRICE: &str = "price";
pub const QUALITY: &str = "quality";
pub const EXPERIENCE: &str = "experience";
pub const RELIABILITY: &str = "reliability";
pub const SERVICE_FIT: &str = "service_fit";

const STRENGTH_FROM: f64 = 80.0;
const WEAKNESS_BELOW: f64 = 60.0;
const RISK_REVIEWED_VENDORS: usize = 3;

/// Vendor quote with the profile its sub-scores are derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorCandidate {
    pub vendor_id: String,
    pub vendor_name: String,
    pub quote_amount: f64,
    #[serde(default)]
    pub experience_years: Option<f64>,
    #[serde(default)]
    pub past_event_count: Option<u32>,
    #[serde(default)]
    pub client_references: Option<u32>,
    #[serde(default)]
    pub response_time_hours: Option<f64>,
    #[serde(default)]
    pub insurance_coverage: bool,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub offered_services: Vec<String>,
}

impl VendorCandidate {
    fn validate(&self) -> Result<(), EngineError> {
        let checks = [
            ("quote_amount", Some(self.quote_amount)),
            ("experience_years", self.experience_years),
            ("response_time_hours", self.response_time_hours),
        ];
        for (field, value) in checks {
            if let Some(value) = value.filter(|value| !value.is_finite() || *value < 0.0) {
                return Err(EngineError::config(format!(
                    "vendor '{}' {field} {value} must be non-negative and finite",
                    self.vendor_id
                )));
            }
        }
        Ok(())
    }

    fn scorable(
        &self,
        scores: &VendorSubScores,
        weights: Option<&[(&str, f64); 5]>,
    ) -> ScorableItem {
        let item = ScorableItem::new(self.vendor_id.clone())
            .with_factor(PRICE, scores.price_score)
            .with_factor(QUALITY, scores.quality_score)
            .with_factor(EXPERIENCE, scores.experience_score)
            .with_factor(RELIABILITY, scores.reliability_score)
            .with_factor(SERVICE_FIT, scores.service_fit_score);

        weights
            .into_iter()
            .flatten()
            .fold(item, |item, (name, weight)| item.with_weight_override(*name, *weight))
    }
}

/// Services the event needs from the vendor category being evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequirements {
    #[serde(default)]
    pub must_have: Vec<String>,
    #[serde(default)]
    pub nice_to_have: Vec<String>,
}

/// Per-request criterion weights in points from 0 to 100. They are
/// normalized by their sum, which must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaWeights {
    pub price: f64,
    pub quality: f64,
    pub experience: f64,
    pub reliability: f64,
    pub service_fit: f64,
}

impl Default for CriteriaWeights {
    fn default() -> Self {
        Self {
            price: 30.0,
            quality: 25.0,
            experience: 20.0,
            reliability: 15.0,
            service_fit: 10.0,
        }
    }
}

impl CriteriaWeights {
    fn as_fractions(&self) -> Result<[(&'static str, f64); 5], EngineError> {
        let points = [
            (PRICE, self.price),
            (QUALITY, self.quality),
            (EXPERIENCE, self.experience),
            (RELIABILITY, self.reliability),
            (SERVICE_FIT, self.service_fit),
        ];
        if let Some((name, value)) = points
            .iter()
            .find(|(_, value)| !value.is_finite() || !(0.0..=100.0).contains(value))
        {
            return Err(EngineError::config(format!(
                "evaluation weight {value} for '{name}' must lie in [0, 100]"
            )));
        }
        if points.iter().all(|(_, value)| *value == 0.0) {
            return Err(EngineError::config("evaluation weights are all zero"));
        }
        Ok(points.map(|(name, value)| (name, value / 100.0)))
    }
}

#[derive(Debug, Clone)]
pub struct VendorPlanConfig {
    pub weights: WeightConfig,
    pub tiers: TierTable,
    /// `(minimum overall score, recommendation)`, highest first.
    pub recommendation_bands: Vec<(f64, String)>,
    pub floor_recommendation: String,
}

impl Default for VendorPlanConfig {
    fn default() -> Self {
        let defaults = CriteriaWeights::default();
        Self {
            weights: WeightConfig::new(1.0)
                .with_factor(PRICE, FactorSpec::numeric(defaults.price / 100.0))
                .with_factor(QUALITY, FactorSpec::numeric(defaults.quality / 100.0))
                .with_factor(EXPERIENCE, FactorSpec::numeric(defaults.experience / 100.0))
                .with_factor(RELIABILITY, FactorSpec::numeric(defaults.reliability / 100.0))
                .with_factor(SERVICE_FIT, FactorSpec::numeric(defaults.service_fit / 100.0)),
            tiers: TierTable::quartiles(["shortlist", "contender", "fallback", "excluded"]),
            recommendation_bands: vec![
                (85.0, "highly_recommended".to_string()),
                (70.0, "recommended".to_string()),
                (55.0, "acceptable".to_string()),
            ],
            floor_recommendation: "not_recommended".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorRanking {
    pub rank: usize,
    pub vendor_id: String,
    pub vendor_name: String,
    pub overall_score: f64,
    #[serde(flatten)]
    pub sub_scores: VendorSubScores,
    pub quote_amount: f64,
    pub tier: String,
    pub recommendation: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementsAnalysis {
    /// Must-have requirement to the vendors offering it, in input order.
    pub must_have_coverage: BTreeMap<String, Vec<String>>,
    pub best_price_vendor: String,
    pub best_experience_vendor: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSeverity {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorRisk {
    pub risk_type: &'static str,
    pub severity: RiskSeverity,
    pub mitigation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorRiskProfile {
    pub vendor_id: String,
    pub risks: Vec<VendorRisk>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorEvaluation {
    pub recommended_vendor: String,
    pub rankings: Vec<VendorRanking>,
    pub tier_summary: Vec<TierCount>,
    pub requirements_analysis: RequirementsAnalysis,
    pub risk_assessment: Vec<VendorRiskProfile>,
}

pub struct VendorEvaluator {
    criteria: VendorCriteria,
    scorer: WeightedScorer,
    ranker: RankAndTierClassifier,
    bands: ScoreBands,
}

impl VendorEvaluator {
    pub fn new(config: VendorPlanConfig) -> Result<Self, EngineError> {
        Ok(Self {
            criteria: VendorCriteria::new()?,
            scorer: WeightedScorer::new(config.weights)?,
            ranker: RankAndTierClassifier::new(config.tiers),
            bands: ScoreBands::new(config.recommendation_bands, config.floor_recommendation)?,
        })
    }

    /// Derives sub-scores from each vendor's profile, then ranks them.
    /// `weights` replaces the configured criterion weights for this batch.
    pub fn evaluate(
        &self,
        candidates: &[VendorCandidate],
        requirements: &ServiceRequirements,
        weights: Option<&CriteriaWeights>,
    ) -> Result<VendorEvaluation, EngineError> {
        let overrides = weights.map(CriteriaWeights::as_fractions).transpose()?;
        for candidate in candidates {
            candidate.validate()?;
        }

        let quotes = QuoteRange::of(candidates);
        let scored = candidates
            .iter()
            .map(|candidate| {
                let sub_scores = self.criteria.derive(candidate, quotes, requirements);
                self.scorer
                    .score(&candidate.scorable(&sub_scores, overrides.as_ref()))
                    .map(|score| ((candidate, sub_scores), score))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ranked = self.ranker.classify(scored)?;
        let rankings: Vec<VendorRanking> = ranked
            .iter()
            .map(|entry| {
                let (candidate, sub_scores) = entry.item;
                let (strengths, weaknesses) = highlights(candidate, &sub_scores);
                VendorRanking {
                    rank: entry.rank,
                    vendor_id: candidate.vendor_id.clone(),
                    vendor_name: candidate.vendor_name.clone(),
                    overall_score: round_to(entry.score, 1),
                    sub_scores,
                    quote_amount: candidate.quote_amount,
                    tier: entry.tier.clone(),
                    recommendation: self.bands.classify(entry.score).to_string(),
                    strengths,
                    weaknesses,
                }
            })
            .collect();

        let risk_assessment = ranked
            .iter()
            .take(RISK_REVIEWED_VENDORS)
            .map(|entry| {
                let (candidate, sub_scores) = entry.item;
                VendorRiskProfile {
                    vendor_id: candidate.vendor_id.clone(),
                    risks: risks(candidate, &sub_scores),
                }
            })
            .collect();

        Ok(VendorEvaluation {
            recommended_vendor: rankings
                .first()
                .map(|ranking| ranking.vendor_id.clone())
                .unwrap_or_default(),
            tier_summary: tier_summary(self.ranker.table(), &ranked),
            requirements_analysis: analyse_requirements(candidates, requirements, &rankings),
            risk_assessment,
            rankings,
        })
    }
}

fn highlights(candidate: &VendorCandidate, scores: &VendorSubScores) -> (Vec<String>, Vec<String>) {
    let criteria = [
        (scores.price_score, "competitive pricing", "high relative price"),
        (scores.experience_score, "extensive experience", "limited experience"),
        (scores.reliability_score, "proven reliability", "unverified reliability"),
        (scores.service_fit_score, "meets requirements", "requirements partially unmet"),
    ];

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    for (score, strength, weakness) in criteria {
        if score >= STRENGTH_FROM {
            strengths.push(strength.to_string());
        } else if score < WEAKNESS_BELOW {
            weaknesses.push(weakness.to_string());
        }
    }

    if candidate.insurance_coverage {
        strengths.push("insured".to_string());
    }
    match candidate.certifications.len() {
        0 => {}
        1 => strengths.push("1 certification".to_string()),
        count => strengths.push(format!("{count} certifications")),
    }
    (strengths, weaknesses)
}

fn risks(candidate: &VendorCandidate, scores: &VendorSubScores) -> Vec<VendorRisk> {
    let mut risks = Vec::new();
    if scores.price_score < WEAKNESS_BELOW {
        risks.push(VendorRisk {
            risk_type: "cost_overrun",
            severity: RiskSeverity::Medium,
            mitigation: "cap pricing in the contract",
        });
    }
    if scores.reliability_score < WEAKNESS_BELOW {
        risks.push(VendorRisk {
            risk_type: "reliability",
            severity: RiskSeverity::High,
            mitigation: "check references and run a small pilot",
        });
    }
    if scores.experience_score < WEAKNESS_BELOW {
        risks.push(VendorRisk {
            risk_type: "inexperience",
            severity: RiskSeverity::Medium,
            mitigation: "agree a detailed work plan with milestone reviews",
        });
    }
    if !candidate.insurance_coverage {
        risks.push(VendorRisk {
            risk_type: "liability",
            severity: RiskSeverity::High,
            mitigation: "require insurance or an indemnity clause before signing",
        });
    }
    risks
}

fn analyse_requirements(
    candidates: &[VendorCandidate],
    requirements: &ServiceRequirements,
    rankings: &[VendorRanking],
) -> RequirementsAnalysis {
    let must_have_coverage = requirements
        .must_have
        .iter()
        .map(|requirement| {
            let vendors = candidates
                .iter()
                .filter(|candidate| covers(&candidate.offered_services, requirement))
                .map(|candidate| candidate.vendor_id.clone())
                .collect();
            (requirement.clone(), vendors)
        })
        .collect();

    // `min_by` keeps the first of equal elements, so ties go to the better rank.
    let best_price_vendor = rankings
        .iter()
        .min_by(|left, right| left.quote_amount.total_cmp(&right.quote_amount))
        .map(|ranking| ranking.vendor_id.clone())
        .unwrap_or_default();
    let best_experience_vendor = rankings
        .iter()
        .min_by(|left, right| {
            right
                .sub_scores
                .experience_score
                .total_cmp(&left.sub_scores.experience_score)
        })
        .map(|ranking| ranking.vendor_id.clone())
        .unwrap_or_default();

    RequirementsAnalysis {
        must_have_coverage,
        best_price_vendor,
        best_experience_vendor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Profile {
        quote: f64,
        years: f64,
        events: u32,
        references: Option<u32>,
        hours: f64,
        insured: bool,
        certifications: &'static [&'static str],
        services: &'static [&'static str],
    }

    fn vendor(id: &str, profile: Profile) -> VendorCandidate {
        let owned = |names: &[&str]| names.iter().map(|name| name.to_string()).collect();
        VendorCandidate {
            vendor_id: id.to_string(),
            vendor_name: format!("Vendor {id}"),
            quote_amount: profile.quote,
            experience_years: Some(profile.years),
            past_event_count: Some(profile.events),
            client_references: profile.references,
            response_time_hours: Some(profile.hours),
            insurance_coverage: profile.insured,
            certifications: owned(profile.certifications),
            offered_services: owned(profile.services),
        }
    }

    fn catering_bids() -> Vec<VendorCandidate> {
        vec![
            vendor(
                "harbor",
                Profile {
                    quote: 10_000.0,
                    years: 12.0,
                    events: 120,
                    references: Some(12),
                    hours: 2.0,
                    insured: true,
                    certifications: &["haccp", "iso"],
                    services: &["Full catering", "Bar service", "Dessert station"],
                },
            ),
            vendor(
                "budget",
                Profile {
                    quote: 6_000.0,
                    years: 3.0,
                    events: 25,
                    references: Some(3),
                    hours: 30.0,
                    insured: false,
                    certifications: &[],
                    services: &["catering"],
                },
            ),
            vendor(
                "gourmet",
                Profile {
                    quote: 14_000.0,
                    years: 8.0,
                    events: 60,
                    references: Some(6),
                    hours: 12.0,
                    insured: true,
                    certifications: &["haccp"],
                    services: &["catering", "bar"],
                },
            ),
            vendor(
                "quick",
                Profile {
                    quote: 8_000.0,
                    years: 1.0,
                    events: 3,
                    references: None,
                    hours: 72.0,
                    insured: false,
                    certifications: &[],
                    services: &[],
                },
            ),
        ]
    }

    fn requirements() -> ServiceRequirements {
        ServiceRequirements {
            must_have: vec!["catering".to_string(), "bar".to_string()],
            nice_to_have: vec!["dessert".to_string()],
        }
    }

    fn evaluator() -> VendorEvaluator {
        VendorEvaluator::new(VendorPlanConfig::default()).expect("default config")
    }

    #[test]
    fn derives_sub_scores_and_ranks_raw_profiles() {
        let evaluation = evaluator()
            .evaluate(&catering_bids(), &requirements(), None)
            .expect("evaluates");

        assert_eq!(evaluation.recommended_vendor, "harbor");
        let summary: Vec<_> = evaluation
            .rankings
            .iter()
            .map(|ranking| {
                (
                    ranking.vendor_id.as_str(),
                    ranking.tier.as_str(),
                    ranking.recommendation.as_str(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("harbor", "shortlist", "highly_recommended"),
                ("budget", "contender", "recommended"),
                ("gourmet", "fallback", "recommended"),
                ("quick", "excluded", "acceptable"),
            ]
        );

        let harbor = &evaluation.rankings[0];
        assert_eq!(harbor.overall_score, 92.5);
        assert_eq!(
            harbor.sub_scores,
            VendorSubScores {
                price_score: 80.0,
                quality_score: 94.0,
                experience_score: 100.0,
                reliability_score: 100.0,
                service_fit_score: 100.0,
            }
        );
        assert!(harbor.weaknesses.is_empty());
        assert!(harbor.strengths.contains(&"2 certifications".to_string()));

        let quick = &evaluation.rankings[3];
        assert_eq!(quick.sub_scores.price_score, 90.0);
        assert_eq!(
            quick.weaknesses,
            vec![
                "limited experience".to_string(),
                "unverified reliability".to_string(),
                "requirements partially unmet".to_string(),
            ]
        );
    }

    #[test]
    fn summarizes_requirement_coverage_and_risks() {
        let evaluation = evaluator()
            .evaluate(&catering_bids(), &requirements(), None)
            .expect("evaluates");

        let analysis = &evaluation.requirements_analysis;
        assert_eq!(
            analysis.must_have_coverage["catering"],
            vec!["harbor", "budget", "gourmet"]
        );
        assert_eq!(analysis.must_have_coverage["bar"], vec!["harbor", "gourmet"]);
        assert_eq!(analysis.best_price_vendor, "budget");
        assert_eq!(analysis.best_experience_vendor, "harbor");

        let reviewed: Vec<_> = evaluation
            .risk_assessment
            .iter()
            .map(|profile| {
                (
                    profile.vendor_id.as_str(),
                    profile
                        .risks
                        .iter()
                        .map(|risk| risk.risk_type)
                        .collect::<Vec<_>>(),
                )
            })
            .collect();
        assert_eq!(
            reviewed,
            vec![
                ("harbor", vec![]),
                ("budget", vec!["liability"]),
                ("gourmet", vec![]),
            ]
        );
    }

    #[test]
    fn request_weights_replace_the_defaults() {
        let price_only = CriteriaWeights {
            price: 100.0,
            quality: 0.0,
            experience: 0.0,
            reliability: 0.0,
            service_fit: 0.0,
        };

        let evaluation = evaluator()
            .evaluate(&catering_bids(), &requirements(), Some(&price_only))
            .expect("evaluates");

        let order: Vec<_> = evaluation
            .rankings
            .iter()
            .map(|ranking| (ranking.vendor_id.as_str(), ranking.overall_score))
            .collect();
        assert_eq!(
            order,
            vec![
                ("budget", 100.0),
                ("quick", 90.0),
                ("harbor", 80.0),
                ("gourmet", 60.0),
            ]
        );
    }

    #[test]
    fn rejects_unusable_weights_and_quotes() {
        let zero = CriteriaWeights {
            price: 0.0,
            quality: 0.0,
            experience: 0.0,
            reliability: 0.0,
            service_fit: 0.0,
        };
        assert!(matches!(
            evaluator().evaluate(&catering_bids(), &requirements(), Some(&zero)),
            Err(EngineError::InvalidConfiguration(_))
        ));

        let oversized = CriteriaWeights {
            price: 150.0,
            ..CriteriaWeights::default()
        };
        assert!(matches!(
            evaluator().evaluate(&catering_bids(), &requirements(), Some(&oversized)),
            Err(EngineError::InvalidConfiguration(_))
        ));

        let mut bids = catering_bids();
        bids[1].quote_amount = -5.0;
        assert!(matches!(
            evaluator().evaluate(&bids, &requirements(), None),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn equal_quotes_share_the_midpoint_price_score() {
        let mut bids = catering_bids();
        bids.truncate(2);
        for bid in &mut bids {
            bid.quote_amount = 5_000.0;
        }

        let evaluation = evaluator()
            .evaluate(&bids, &ServiceRequirements::default(), None)
            .expect("evaluates");

        assert!(evaluation
            .rankings
            .iter()
            .all(|ranking| ranking.sub_scores.price_score == 80.0));
    }
}
