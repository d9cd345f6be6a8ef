use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::EngineError;

/// Raw value of a named factor on an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactorValue {
    Numeric(f64),
    Ordinal(String),
}

impl From<f64> for FactorValue {
    fn from(value: f64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for FactorValue {
    fn from(value: &str) -> Self {
        Self::Ordinal(value.to_string())
    }
}

/// Explicit label-to-number mapping for an ordinal factor.
///
/// Levels are listed in declaration order and must be strictly monotonic in
/// one direction. A descending scale is how a factor like effort rewards the
/// lower label; nothing in the engine reverses a scale implicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalScale {
    levels: Vec<(String, f64)>,
}

impl OrdinalScale {
    pub fn new<L: Into<String>>(
        levels: impl IntoIterator<Item = (L, f64)>,
    ) -> Result<Self, EngineError> {
        let scale = Self {
            levels: levels
                .into_iter()
                .map(|(label, value)| (label.into(), value))
                .collect(),
        };
        scale.validate()?;
        Ok(scale)
    }

    /// low = 1, medium = 2, high = 3.
    pub fn ascending() -> Self {
        Self {
            levels: vec![
                ("low".to_string(), 1.0),
                ("medium".to_string(), 2.0),
                ("high".to_string(), 3.0),
            ],
        }
    }

    /// low = 3, medium = 2, high = 1.
    pub fn descending() -> Self {
        Self {
            levels: vec![
                ("low".to_string(), 3.0),
                ("medium".to_string(), 2.0),
                ("high".to_string(), 1.0),
            ],
        }
    }

    /// Case-insensitive label lookup.
    pub fn resolve(&self, label: &str) -> Option<f64> {
        let label = label.trim();
        self.levels
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(label))
            .map(|(_, value)| *value)
    }

    pub fn levels(&self) -> &[(String, f64)] {
        &self.levels
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.levels.is_empty() {
            return Err(EngineError::config("ordinal scale has no levels"));
        }
        if let Some((label, _)) = self.levels.iter().find(|(_, value)| !value.is_finite()) {
            return Err(EngineError::config(format!(
                "ordinal level '{label}' is not a finite number"
            )));
        }

        let ascending = self.levels.windows(2).all(|pair| pair[0].1 < pair[1].1);
        let descending = self.levels.windows(2).all(|pair| pair[0].1 > pair[1].1);
        if !(ascending || descending) {
            return Err(EngineError::config(
                "ordinal scale must be strictly monotonic",
            ));
        }
        Ok(())
    }
}

/// Weight and value resolution rules for one factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorSpec {
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<OrdinalScale>,
    /// Value substituted when the item lacks the factor. Without one the
    /// factor drops out of both numerator and denominator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutral: Option<f64>,
}

impl FactorSpec {
    pub fn numeric(weight: f64) -> Self {
        Self {
            weight,
            scale: None,
            neutral: None,
        }
    }

    pub fn ordinal(weight: f64, scale: OrdinalScale) -> Self {
        Self {
            weight,
            scale: Some(scale),
            neutral: None,
        }
    }

    pub fn with_neutral(mut self, neutral: f64) -> Self {
        self.neutral = Some(neutral);
        self
    }

    fn resolve(
        &self,
        name: &str,
        value: Option<&FactorValue>,
    ) -> Result<Option<f64>, EngineError> {
        let resolved = match value {
            Some(FactorValue::Numeric(number)) if number.is_finite() => Some(*number),
            Some(FactorValue::Numeric(number)) => {
                return Err(EngineError::config(format!(
                    "factor '{name}' value {number} is not finite"
                )));
            }
            Some(FactorValue::Ordinal(label)) => self
                .scale
                .as_ref()
                .and_then(|scale| scale.resolve(label)),
            None => None,
        };
        Ok(resolved.or(self.neutral))
    }
}

/// Factor weights for one scoring pass plus the output scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub factors: BTreeMap<String, FactorSpec>,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
}

fn default_scale_factor() -> f64 {
    1.0
}

impl WeightConfig {
    pub fn new(scale_factor: f64) -> Self {
        Self {
            factors: BTreeMap::new(),
            scale_factor,
        }
    }

    pub fn with_factor(mut self, name: impl Into<String>, spec: FactorSpec) -> Self {
        self.factors.insert(name.into(), spec);
        self
    }
}

/// Item submitted for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorableItem {
    pub id: String,
    #[serde(default)]
    pub factors: BTreeMap<String, FactorValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub weight_overrides: BTreeMap<String, f64>,
}

impl ScorableItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            factors: BTreeMap::new(),
            weight_overrides: BTreeMap::new(),
        }
    }

    pub fn with_factor(mut self, name: impl Into<String>, value: impl Into<FactorValue>) -> Self {
        self.factors.insert(name.into(), value.into());
        self
    }

    pub fn with_weight_override(mut self, name: impl Into<String>, weight: f64) -> Self {
        self.weight_overrides.insert(name.into(), weight);
        self
    }
}

/// Computes a normalized weighted composite score per item.
#[derive(Debug, Clone)]
pub struct WeightedScorer {
    config: WeightConfig,
}

impl WeightedScorer {
    pub fn new(config: WeightConfig) -> Result<Self, EngineError> {
        if config.factors.is_empty() {
            return Err(EngineError::config("weight mapping is empty"));
        }
        for (name, spec) in &config.factors {
            check_weight(name, spec.weight)?;
            if let Some(scale) = &spec.scale {
                scale.validate().map_err(|err| {
                    EngineError::config(format!("factor '{name}': {err}"))
                })?;
            }
            if spec.neutral.is_some_and(|neutral| !neutral.is_finite()) {
                return Err(EngineError::config(format!(
                    "factor '{name}' has a non-finite neutral value"
                )));
            }
        }
        if config.factors.values().all(|spec| spec.weight == 0.0) {
            return Err(EngineError::config("all factor weights are zero"));
        }
        if !config.scale_factor.is_finite() || config.scale_factor <= 0.0 {
            return Err(EngineError::config(format!(
                "scale factor {} must be positive and finite",
                config.scale_factor
            )));
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &WeightConfig {
        &self.config
    }

    /// `Σ(value × weight) / Σ(weight applied) × scale_factor`. Returns `0.0`
    /// when no factor could be applied to the item.
    pub fn score(&self, item: &ScorableItem) -> Result<f64, EngineError> {
        let mut weighted_sum = 0.0;
        let mut applied_weight = 0.0;

        for (name, spec) in &self.config.factors {
            let weight = match item.weight_overrides.get(name) {
                Some(weight) => {
                    check_weight(name, *weight)?;
                    *weight
                }
                None => spec.weight,
            };

            if let Some(value) = spec.resolve(name, item.factors.get(name))? {
                weighted_sum += value * weight;
                applied_weight += weight;
            }
        }

        if applied_weight == 0.0 {
            return Ok(0.0);
        }

        let score = weighted_sum / applied_weight * self.config.scale_factor;
        if !score.is_finite() {
            return Err(EngineError::config(format!(
                "score for '{}' overflowed",
                item.id
            )));
        }
        Ok(score)
    }

    /// Scores a batch, pairing each item with its score in input order.
    pub fn score_all<'a, I>(&self, items: I) -> Result<Vec<(&'a ScorableItem, f64)>, EngineError>
    where
        I: IntoIterator<Item = &'a ScorableItem>,
    {
        items
            .into_iter()
            .map(|item| self.score(item).map(|score| (item, score)))
            .collect()
    }
}

fn check_weight(name: &str, weight: f64) -> Result<(), EngineError> {
    if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
        return Err(EngineError::config(format!(
            "weight {weight} for factor '{name}' must lie in [0, 1]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal_config() -> WeightConfig {
        WeightConfig::new(10.0)
            .with_factor("impact", FactorSpec::ordinal(0.4, OrdinalScale::ascending()))
            .with_factor("effort", FactorSpec::ordinal(0.3, OrdinalScale::descending()))
            .with_factor("stakeholder", FactorSpec::numeric(0.3).with_neutral(3.0))
    }

    #[test]
    fn high_impact_low_effort_outscores_the_reverse() {
        let scorer = WeightedScorer::new(goal_config()).expect("valid config");
        let a = ScorableItem::new("A")
            .with_factor("impact", "high")
            .with_factor("effort", "low");
        let b = ScorableItem::new("B")
            .with_factor("impact", "low")
            .with_factor("effort", "high");

        let score_a = scorer.score(&a).expect("scores");
        let score_b = scorer.score(&b).expect("scores");

        assert!((score_a - 30.0).abs() < 1e-9);
        assert!((score_b - 16.0).abs() < 1e-9);
        assert!(score_a > score_b);
    }

    #[test]
    fn absent_factor_without_neutral_is_excluded_from_denominator() {
        let config = WeightConfig::new(1.0)
            .with_factor("a", FactorSpec::numeric(0.5))
            .with_factor("b", FactorSpec::numeric(0.5));
        let scorer = WeightedScorer::new(config).expect("valid config");

        let item = ScorableItem::new("x").with_factor("a", 8.0);

        assert_eq!(scorer.score(&item).expect("scores"), 8.0);
    }

    #[test]
    fn weights_are_normalized_regardless_of_caller_sum() {
        let config = WeightConfig::new(1.0)
            .with_factor("a", FactorSpec::numeric(0.2))
            .with_factor("b", FactorSpec::numeric(0.2));
        let scorer = WeightedScorer::new(config).expect("valid config");
        let item = ScorableItem::new("x")
            .with_factor("a", 4.0)
            .with_factor("b", 6.0);

        assert!((scorer.score(&item).expect("scores") - 5.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_label_falls_back_to_neutral() {
        let config = WeightConfig::new(1.0).with_factor(
            "impact",
            FactorSpec::ordinal(1.0, OrdinalScale::ascending()).with_neutral(2.0),
        );
        let scorer = WeightedScorer::new(config).expect("valid config");
        let item = ScorableItem::new("x").with_factor("impact", "enormous");

        assert_eq!(scorer.score(&item).expect("scores"), 2.0);
    }

    #[test]
    fn item_without_applicable_factors_scores_zero() {
        let config = WeightConfig::new(10.0).with_factor("a", FactorSpec::numeric(1.0));
        let scorer = WeightedScorer::new(config).expect("valid config");

        assert_eq!(scorer.score(&ScorableItem::new("empty")).expect("scores"), 0.0);
    }

    #[test]
    fn weight_override_replaces_configured_weight() {
        let config = WeightConfig::new(1.0)
            .with_factor("a", FactorSpec::numeric(0.5))
            .with_factor("b", FactorSpec::numeric(0.5));
        let scorer = WeightedScorer::new(config).expect("valid config");
        let item = ScorableItem::new("x")
            .with_factor("a", 10.0)
            .with_factor("b", 0.0)
            .with_weight_override("b", 0.0);

        assert_eq!(scorer.score(&item).expect("scores"), 10.0);
    }

    #[test]
    fn rejects_out_of_range_override() {
        let config = WeightConfig::new(1.0).with_factor("a", FactorSpec::numeric(0.5));
        let scorer = WeightedScorer::new(config).expect("valid config");
        let item = ScorableItem::new("x")
            .with_factor("a", 1.0)
            .with_weight_override("a", 1.5);

        assert!(matches!(
            scorer.score(&item),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn non_finite_numeric_value_is_rejected() {
        let config =
            WeightConfig::new(1.0).with_factor("a", FactorSpec::numeric(1.0).with_neutral(3.0));
        let scorer = WeightedScorer::new(config).expect("valid config");
        let item = ScorableItem::new("x").with_factor("a", f64::INFINITY);

        assert!(matches!(
            scorer.score(&item),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn rejects_empty_and_all_zero_weights() {
        assert!(matches!(
            WeightedScorer::new(WeightConfig::new(1.0)),
            Err(EngineError::InvalidConfiguration(_))
        ));

        let zeroed = WeightConfig::new(1.0)
            .with_factor("a", FactorSpec::numeric(0.0))
            .with_factor("b", FactorSpec::numeric(0.0));
        assert!(matches!(
            WeightedScorer::new(zeroed),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn rejects_non_monotonic_scale() {
        let result = OrdinalScale::new([("low", 1.0), ("medium", 3.0), ("high", 2.0)]);

        assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
    }

    #[test]
    fn factor_values_deserialize_from_labels_and_numbers() {
        let item: ScorableItem = serde_json::from_str(
            r#"{"id":"g-1","factors":{"impact":"high","stakeholder":4.5}}"#,
        )
        .expect("item parses");

        assert_eq!(item.factors["impact"], FactorValue::Ordinal("high".to_string()));
        assert_eq!(item.factors["stakeholder"], FactorValue::Numeric(4.5));
    }
}
