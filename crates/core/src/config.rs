use std::time::Duration;

use burrow_ingest::RuntimeConfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Per-engine completion options.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(default)]
pub struct CompletionOptions {
    /// Wall-clock budget of the deep search, in milliseconds. With 0 only
    /// the first generation of candidates is processed.
    pub budget_ms: u64,
    /// Expand candidates into their members and call results.
    pub deep: bool,
    /// Offer packages and members the file does not import yet.
    pub unimported: bool,
    pub snippets: bool,
    /// Fill call snippets with parameter placeholders.
    pub placeholders: bool,
    pub postfix: bool,
    pub literals: bool,
    pub keywords: bool,
    /// Maximum number of returned items; 0 keeps everything.
    pub max_results: usize,
    /// Scanned members after which unimported scanning stops early.
    pub unimported_member_target: usize,
    pub max_unimported_packages: usize,
    pub scan_concurrency: usize,
    pub scoring: ScoringPolicy,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            budget_ms: 100,
            deep: true,
            unimported: true,
            snippets: true,
            placeholders: true,
            postfix: true,
            literals: true,
            keywords: true,
            max_results: 0,
            unimported_member_target: 100,
            max_unimported_packages: 5,
            scan_concurrency: 8,
            scoring: ScoringPolicy::default(),
        }
    }
}

impl CompletionOptions {
    /// Parses options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn budget(&self) -> Duration {
        Duration::from_millis(self.budget_ms)
    }
}

impl From<&CompletionOptions> for RuntimeConfig {
    fn from(options: &CompletionOptions) -> Self {
        RuntimeConfig {
            max_in_flight: options.scan_concurrency.max(1),
            result_target: options.unimported_member_target,
        }
    }
}

/// Every numeric constant of the ranking model.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ScoringPolicy {
    pub std_score: f64,
    pub high_score: f64,
    pub low_score: f64,
    /// Multiplier per lexical scope level outward from the cursor.
    pub scope_decay: f64,
    pub universe_factor: f64,
    pub nil_factor: f64,
    pub method_call_discount: f64,
    pub unexported_boost: f64,
    pub index_discount: f64,
    /// Subtracted from the base score of fields so methods sort first.
    pub field_offset: f64,
    pub untyped_penalty: f64,
    pub deep_untyped_penalty: f64,
    pub conversion_penalty: f64,
    pub assignee_mismatch: f64,
    pub struct_field_delta: f64,
    pub switch_case_penalty: f64,
    pub append_self_penalty: f64,
    pub depth_segment: f64,
    pub depth_unexported_delta: f64,
    pub depth_signature_delta: f64,
    pub depth_normalizer: f64,
    pub alias_epsilon: f64,
    pub unimported_relevance_weight: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            std_score: 1.0,
            high_score: 10.0,
            low_score: 0.01,
            scope_decay: 0.99,
            universe_factor: 0.1,
            nil_factor: 0.5,
            method_call_discount: 0.9,
            unexported_boost: 1.1,
            index_discount: 0.9,
            field_offset: 0.01,
            untyped_penalty: 0.75,
            deep_untyped_penalty: 0.5,
            conversion_penalty: 0.5,
            assignee_mismatch: 0.5,
            struct_field_delta: 0.0001,
            switch_case_penalty: 0.1,
            append_self_penalty: 0.9,
            depth_segment: 1.0,
            depth_unexported_delta: 0.1,
            depth_signature_delta: 0.1,
            depth_normalizer: 10.0,
            alias_epsilon: 0.0001,
            unimported_relevance_weight: 0.1,
        }
    }
}

impl ScoringPolicy {
    /// Score of a literal candidate before fuzzy matching.
    pub fn literal_score(&self) -> f64 {
        self.high_score / 2.0
    }

    pub fn unimported_score(&self, relevance: f64) -> f64 {
        (self.std_score + self.unimported_relevance_weight * relevance) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fills_in_defaults() {
        let options = CompletionOptions::from_json(r#"{"budget_ms": 5, "scoring": {"high_score": 20.0}}"#)
            .unwrap();
        assert_eq!(options.budget(), Duration::from_millis(5));
        assert!(options.deep);
        assert_eq!(options.scoring.high_score, 20.0);
        assert_eq!(options.scoring.std_score, 1.0);
    }

    #[test]
    fn options_round_trip() {
        let options = CompletionOptions {
            max_results: 3,
            postfix: false,
            ..Default::default()
        };
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(CompletionOptions::from_json(&json).unwrap(), options);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = CompletionOptions::from_json("{budget_ms").unwrap_err();
        assert!(matches!(err, crate::error::CompletionError::Config(_)));
    }

    #[test]
    fn runtime_limits_follow_options() {
        let options = CompletionOptions {
            scan_concurrency: 0,
            unimported_member_target: 7,
            ..Default::default()
        };
        let runtime = RuntimeConfig::from(&options);
        assert_eq!(runtime.max_in_flight, 1);
        assert_eq!(runtime.result_target, 7);
    }

    #[test]
    fn unimported_score_grows_with_relevance() {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.unimported_score(0.0), 0.5);
        assert!(policy.unimported_score(5.0) > policy.unimported_score(1.0));
    }
}
