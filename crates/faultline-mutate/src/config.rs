//! Strategy configuration

use serde::{Deserialize, Serialize};

/// Tunable knobs shared by every mutation strategy.
///
/// `likelihood` is the probability in [0, 1] that an eligible annotation site
/// is mutated; values outside that range are not rejected, they just saturate
/// the flip (at or above 1.0 every site fires, at or below 0.0 none do).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Probability that an eligible site is mutated
    pub likelihood: f64,
    /// Seed for the strategy's random stream
    pub seed: u64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            likelihood: 0.25,
            seed: 0,
        }
    }
}

impl StrategyConfig {
    /// Set the mutation likelihood
    pub fn with_likelihood(mut self, likelihood: f64) -> Self {
        self.likelihood = likelihood;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = StrategyConfig::default();
        assert_eq!(config.likelihood, 0.25);
        assert_eq!(config.seed, 0);
    }

    #[test]
    fn builders_override_fields() {
        let config = StrategyConfig::default().with_likelihood(1.0).with_seed(7);
        assert_eq!(config.likelihood, 1.0);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn parses_partial_toml() {
        let config = StrategyConfig::from_toml_str("likelihood = 0.5\n").unwrap();
        assert_eq!(config.likelihood, 0.5);
        assert_eq!(config.seed, 0);

        let config = StrategyConfig::from_toml_str("").unwrap();
        assert_eq!(config, StrategyConfig::default());
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(StrategyConfig::from_toml_str("likelihood = \"high\"\n").is_err());
    }
}
