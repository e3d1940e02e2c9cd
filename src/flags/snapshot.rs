//! Immutable toggle snapshots and local evaluation.
//!
//! A snapshot is built once from a provider response and never mutated;
//! concurrent readers share it behind an atomic pointer swap. Evaluation
//! covers the `default` and `userWithId` activation strategies; anything
//! fancier is the provider's concern and evaluates as not passing.

use std::collections::HashMap;

use serde::Deserialize;

/// Wire shape of the provider's toggle listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientFeatures {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub features: Vec<FeatureToggle>,
}

/// One named toggle as served by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureToggle {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub strategies: Vec<ActivationStrategy>,
}

/// An activation strategy attached to a toggle.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivationStrategy {
    pub name: String,
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

/// Per-request evaluation context. Immutable once built.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    user_id: String,
}

impl EvaluationContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// A complete, immutable view of the provider's toggles at one point in time.
#[derive(Debug, Default)]
pub struct FlagSnapshot {
    version: u32,
    flags: HashMap<String, FeatureToggle>,
}

impl FlagSnapshot {
    /// The snapshot readers see before any fetch has succeeded.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_features(doc: ClientFeatures) -> Self {
        let flags = doc
            .features
            .into_iter()
            .map(|toggle| (toggle.name.clone(), toggle))
            .collect();
        Self {
            version: doc.version,
            flags,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Evaluate one toggle against a context.
    ///
    /// Returns `None` when the toggle is not in the snapshot; the caller
    /// decides the default (and this service always decides `false`).
    pub fn evaluate(&self, flag: &str, ctx: &EvaluationContext) -> Option<bool> {
        let toggle = self.flags.get(flag)?;
        if !toggle.enabled {
            return Some(false);
        }
        if toggle.strategies.is_empty() {
            return Some(true);
        }
        Some(toggle.strategies.iter().any(|s| strategy_passes(s, ctx)))
    }
}

fn strategy_passes(strategy: &ActivationStrategy, ctx: &EvaluationContext) -> bool {
    match strategy.name.as_str() {
        "default" => true,
        "userWithId" => strategy
            .parameters
            .get("userIds")
            .map(|ids| ids.split(',').map(str::trim).any(|id| id == ctx.user_id()))
            .unwrap_or(false),
        other => {
            tracing::debug!(strategy = other, "unsupported activation strategy, not passing");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle(name: &str, enabled: bool, strategies: Vec<ActivationStrategy>) -> FeatureToggle {
        FeatureToggle {
            name: name.to_string(),
            enabled,
            strategies,
        }
    }

    fn strategy(name: &str, params: &[(&str, &str)]) -> ActivationStrategy {
        ActivationStrategy {
            name: name.to_string(),
            parameters: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn snapshot(toggles: Vec<FeatureToggle>) -> FlagSnapshot {
        FlagSnapshot::from_features(ClientFeatures {
            version: 2,
            features: toggles,
        })
    }

    #[test]
    fn unknown_flag_is_none() {
        let snap = snapshot(vec![]);
        let ctx = EvaluationContext::new("ci-cd-lab");
        assert_eq!(snap.evaluate("show-beta-banner", &ctx), None);
    }

    #[test]
    fn enabled_without_strategies_is_on() {
        let snap = snapshot(vec![toggle("show-beta-banner", true, vec![])]);
        let ctx = EvaluationContext::new("ci-cd-lab");
        assert_eq!(snap.evaluate("show-beta-banner", &ctx), Some(true));
    }

    #[test]
    fn disabled_bit_wins_over_strategies() {
        let snap = snapshot(vec![toggle(
            "show-beta-banner",
            false,
            vec![strategy("default", &[])],
        )]);
        let ctx = EvaluationContext::new("ci-cd-lab");
        assert_eq!(snap.evaluate("show-beta-banner", &ctx), Some(false));
    }

    #[test]
    fn user_with_id_matches_listed_user() {
        let strategies = vec![strategy("userWithId", &[("userIds", "alice, ci-cd-lab ,bob")])];
        let snap = snapshot(vec![toggle("show-beta-banner", true, strategies)]);

        assert_eq!(
            snap.evaluate("show-beta-banner", &EvaluationContext::new("ci-cd-lab")),
            Some(true)
        );
        assert_eq!(
            snap.evaluate("show-beta-banner", &EvaluationContext::new("mallory")),
            Some(false)
        );
    }

    #[test]
    fn unknown_strategy_does_not_pass() {
        let strategies = vec![strategy("gradualRolloutRandom", &[("percentage", "50")])];
        let snap = snapshot(vec![toggle("show-beta-banner", true, strategies)]);
        let ctx = EvaluationContext::new("ci-cd-lab");
        assert_eq!(snap.evaluate("show-beta-banner", &ctx), Some(false));
    }

    #[test]
    fn wire_shape_parses_with_extra_fields() {
        let body = r#"{
            "version": 2,
            "features": [
                {
                    "name": "show-beta-banner",
                    "enabled": true,
                    "description": "ignored",
                    "strategies": [{"name": "default", "parameters": {}}]
                }
            ],
            "query": {"environment": "development"}
        }"#;
        let doc: ClientFeatures = serde_json::from_str(body).unwrap();
        let snap = FlagSnapshot::from_features(doc);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.version(), 2);
    }
}
