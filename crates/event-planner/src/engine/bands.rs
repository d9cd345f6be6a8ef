use serde::{Deserialize, Serialize};

use super::EngineError;

/// Absolute score cutoffs mapped to labels, highest band first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScoreBands")]
pub struct ScoreBands {
    bands: Vec<(f64, String)>,
    floor: String,
}

#[derive(Deserialize)]
struct RawScoreBands {
    bands: Vec<(f64, String)>,
    floor: String,
}

impl TryFrom<RawScoreBands> for ScoreBands {
    type Error = EngineError;

    fn try_from(raw: RawScoreBands) -> Result<Self, Self::Error> {
        Self::new(raw.bands, raw.floor)
    }
}

impl ScoreBands {
    /// `bands` are `(minimum score, label)` pairs with strictly descending
    /// minimums; scores below every minimum get `floor`.
    pub fn new<L: Into<String>>(
        bands: impl IntoIterator<Item = (f64, L)>,
        floor: impl Into<String>,
    ) -> Result<Self, EngineError> {
        let bands: Vec<(f64, String)> = bands
            .into_iter()
            .map(|(minimum, label)| (minimum, label.into()))
            .collect();

        if bands.iter().any(|(minimum, _)| !minimum.is_finite()) {
            return Err(EngineError::config("band cutoffs must be finite"));
        }
        if !bands.windows(2).all(|pair| pair[0].0 > pair[1].0) {
            return Err(EngineError::config(
                "band cutoffs must be strictly descending",
            ));
        }

        Ok(Self {
            bands,
            floor: floor.into(),
        })
    }

    pub fn classify(&self, score: f64) -> &str {
        self.bands
            .iter()
            .find(|(minimum, _)| score >= *minimum)
            .map(|(_, label)| label.as_str())
            .unwrap_or(&self.floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_band_reached() {
        let bands = ScoreBands::new([(85.0, "excellent"), (70.0, "good")], "weak")
            .expect("valid bands");

        assert_eq!(bands.classify(85.0), "excellent");
        assert_eq!(bands.classify(84.9), "good");
        assert_eq!(bands.classify(12.0), "weak");
    }

    #[test]
    fn rejects_unordered_cutoffs() {
        let result = ScoreBands::new([(50.0, "low"), (80.0, "high")], "none");

        assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
    }

    #[test]
    fn deserialized_bands_are_validated() {
        let unordered = serde_json::from_str::<ScoreBands>(
            r#"{"bands":[[50.0,"low"],[80.0,"high"]],"floor":"none"}"#,
        );
        assert!(unordered.is_err());

        let bands = serde_json::from_str::<ScoreBands>(
            r#"{"bands":[[80.0,"high"],[50.0,"low"]],"floor":"none"}"#,
        )
        .expect("valid bands");
        assert_eq!(bands.classify(65.0), "low");
    }
}
