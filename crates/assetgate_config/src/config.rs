//! Session configuration: declarative document and loaded session object.

use crate::options::Options;
use assetgate_core::{CoreError, Vocabulary};
use assetgate_rules::{Matches, RuleSpec, TransformError, TransformationRule, Transformer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Configuration load error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Document could not be decoded
    #[error("Invalid config document: {0}")]
    Document(String),

    /// Transformation rules failed to load
    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Document(err.to_string())
    }
}

impl From<ConfigError> for CoreError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Document(message) => CoreError::ParseError { message },
            ConfigError::Transform(err) => err.into(),
        }
    }
}

/// Declarative configuration as decoded by an external loader
///
/// A `null` transformation payload is the same as an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigDocument {
    /// Session options
    pub options: Options,
    /// `"From->To"` declarations
    pub transformations: BTreeMap<String, Option<RuleSpec>>,
}

impl ConfigDocument {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a JSON document
    ///
    /// # Errors
    ///
    /// Returns error if the text is not a valid document
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Set an option
    #[must_use]
    pub fn with_option(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(name, value);
        self
    }

    /// Declare a transformation
    #[must_use]
    pub fn with_transformation(mut self, key: &str, spec: RuleSpec) -> Self {
        self.transformations.insert(key.to_string(), Some(spec));
        self
    }

    fn rule_specs(&self) -> BTreeMap<String, RuleSpec> {
        self.transformations
            .iter()
            .map(|(key, spec)| (key.clone(), spec.clone().unwrap_or_default()))
            .collect()
    }
}

/// Loaded session configuration
///
/// Shared by reference across the workers of a session; the transformation
/// cache is the only state that changes after load.
#[derive(Debug)]
pub struct Config {
    options: Options,
    default_confidence: i64,
    transformations: Transformer,
}

impl Config {
    /// Load a document against a vocabulary
    ///
    /// The default confidence is read once from the options.
    ///
    /// # Errors
    ///
    /// Returns the first rule error; nothing is usable on failure
    pub fn load(document: ConfigDocument, vocabulary: &Vocabulary) -> Result<Self, ConfigError> {
        let default_confidence = document.options.confidence();
        let transformations =
            Transformer::load(&document.rule_specs(), vocabulary, default_confidence)?;

        Ok(Self {
            options: document.options,
            default_confidence,
            transformations,
        })
    }

    /// Decode and load a JSON document
    ///
    /// # Errors
    ///
    /// Returns error if decoding or rule loading fails
    pub fn from_json_str(text: &str, vocabulary: &Vocabulary) -> Result<Self, ConfigError> {
        Self::load(ConfigDocument::from_json_str(text)?, vocabulary)
    }

    /// Authorize a batch of candidate targets for a source type
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::NoMatch`] if none is authorized; callers
    /// treat that as "do not expand this asset"
    pub fn check_transformations<S: AsRef<str>>(
        &self,
        from: &str,
        tos: &[S],
    ) -> Result<Arc<Matches>, TransformError> {
        self.transformations.check(from, tos)
    }

    /// Whether `from -> to` was authorized by an earlier check
    #[must_use]
    pub fn check_transform_result(&self, from: &str, to: &str) -> bool {
        self.transformations.check_result(from, to)
    }

    /// Number of targets authorized so far for a source type; 0 if never resolved
    #[must_use]
    pub fn len(&self, from: &str) -> usize {
        self.transformations.len(from)
    }

    /// Handle on the matches resolved so far for a source type
    #[must_use]
    pub fn matches(&self, from: &str) -> Option<Arc<Matches>> {
        self.transformations.matches(from)
    }

    /// Look up a declared transformation
    ///
    /// # Errors
    ///
    /// Returns error if no such transformation was declared
    pub fn transformation(&self, key: &str) -> Result<&TransformationRule, CoreError> {
        self.transformations
            .rules()
            .get(key)
            .ok_or_else(|| CoreError::NotFound {
                kind: "Transformation".to_string(),
                id: key.to_string(),
            })
    }

    /// Transformation engine
    #[must_use]
    pub fn transformations(&self) -> &Transformer {
        &self.transformations
    }

    /// Default confidence applied at load
    #[must_use]
    pub fn default_confidence(&self) -> i64 {
        self.default_confidence
    }

    /// Session options
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetgate_rules::ConflictMode;
    use proptest::prelude::*;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    const VALID: &str = r#"{
        "options": { "confidence": 50 },
        "transformations": {
            "FQDN->IPAddress": { "priority": 1, "confidence": 80 },
            "FQDN->WHOIS": { "priority": 2 },
            "FQDN->ALL": { "exclude": ["RIRORG", "FQDN"] },
            "IPAddress->IPAddress": { "priority": 1, "confidence": 80 },
            "IPAddress->WHOIS": { "priority": 2 },
            "IPAddress->RIRORG": null
        }
    }"#;

    fn load(text: &str) -> Result<Config, ConfigError> {
        init_tracing();
        Config::from_json_str(text, &Vocabulary::oam())
    }

    #[test]
    fn test_load_valid_document() {
        let config = load(VALID).unwrap();
        assert_eq!(config.default_confidence(), 50);
        assert_eq!(config.transformations().rules().len(), 6);
        assert_eq!(config.transformation("FQDN->WHOIS").unwrap().confidence, 50);
        assert_eq!(config.transformation("FQDN->IPAddress").unwrap().confidence, 80);
        assert_eq!(config.transformation("IPAddress->RIRORG").unwrap().confidence, 50);
        assert!(config.transformation("FQDN->RIRORG").is_err());
    }

    #[test]
    fn test_session_scenario() {
        let config = load(VALID).unwrap();

        assert_eq!(config.len("fqdn"), 0);
        config.check_transformations("fqdn", &["ipaddress"]).unwrap();
        assert!(config.check_transform_result("fqdn", "ipaddress"));
        assert_eq!(config.len("FQDN"), 1);

        let err = config.check_transformations("fqdn", &["rirorg"]).unwrap_err();
        assert!(matches!(err, TransformError::NoMatch { .. }));
        assert!(!err.is_load_error());
        assert!(!config.check_transform_result("fqdn", "rirorg"));
    }

    #[test]
    fn test_matches_handle() {
        let config = load(VALID).unwrap();
        assert!(config.matches("fqdn").is_none());

        let matches = config
            .check_transformations("FQDN", &["IPAddress", "TLS", "RIROrg"])
            .unwrap();
        assert!(matches.is_match("tls"));
        assert!(matches.is_match("IPADDRESS"));
        assert!(!matches.is_match("rirorg"));
        assert_eq!(matches.len(), 2);
        assert_eq!(config.matches("fqdn").unwrap().len(), 2);
    }

    #[test]
    fn test_conflicting_none_after() {
        let text = r#"{
            "options": { "confidence": 50 },
            "transformations": {
                "FQDN->IPAddress": { "priority": 1, "confidence": 80 },
                "FQDN->none": { "priority": 2 },
                "FQDN->ALL": { "exclude": ["TLS", "FQDN"] }
            }
        }"#;
        let err = load(text).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Transform(TransformError::ConflictingRule { .. })
        ));
    }

    #[test]
    fn test_conflicting_none_before() {
        let text = r#"{
            "transformations": {
                "FQDN->none": { "priority": 2 },
                "FQDN->IPAddress": { "priority": 1, "confidence": 80 }
            }
        }"#;
        let err = load(text).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Transform(TransformError::ConflictingRule {
                from: "fqdn".to_string(),
                key: "FQDN->none".to_string(),
                mode: ConflictMode::NoneAfterOther,
            })
        );
    }

    #[test]
    fn test_invalid_key_aborts_load() {
        let text = r#"{
            "options": { "confidence": 50 },
            "transformations": { "FQDN-IPAddress": { "priority": 1 } }
        }"#;
        let err = load(text).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Transform(TransformError::MalformedKey {
                key: "FQDN-IPAddress".to_string()
            })
        );
        let core: CoreError = err.into();
        assert!(matches!(core, CoreError::Transform { ref kind, .. } if kind == "malformed_key"));
    }

    #[test]
    fn test_unknown_types_abort_load() {
        let to = r#"{ "transformations": { "FQDN->Amass": {} } }"#;
        assert!(matches!(
            load(to).unwrap_err(),
            ConfigError::Transform(TransformError::UnknownTargetType { .. })
        ));

        let from = r#"{ "transformations": { "Amass->WHOIS": {} } }"#;
        assert!(matches!(
            load(from).unwrap_err(),
            ConfigError::Transform(TransformError::UnknownSourceType { .. })
        ));
    }

    #[test]
    fn test_bad_document() {
        let err = load("{ \"transformations\": [] }").unwrap_err();
        assert!(matches!(err, ConfigError::Document(_)));
        let core: CoreError = err.into();
        assert!(matches!(core, CoreError::ParseError { .. }));
    }

    #[test]
    fn test_empty_document() {
        let config = load("{}").unwrap();
        assert_eq!(config.default_confidence(), 0);
        assert!(config.transformations().rules().is_empty());
        assert!(config.check_transformations("fqdn", &["ipaddress"]).is_err());
    }

    #[test]
    fn test_builder_document() {
        let document = ConfigDocument::new()
            .with_option("confidence", 30)
            .with_transformation("FQDN->ALL", RuleSpec::new().with_exclude(["fqdn"]));
        let config = Config::load(document, &Vocabulary::oam()).unwrap();
        assert_eq!(config.transformation("fqdn->all").unwrap().confidence, 30);
        assert_eq!(config.options().confidence(), 30);
    }

    #[test]
    fn test_custom_vocabulary() {
        let vocab = Vocabulary::new(["fqdn", "ip", "whois", "tls", "rirorg"]).unwrap();
        let document = ConfigDocument::new()
            .with_transformation("FQDN->IP", RuleSpec::new())
            .with_transformation("FQDN->ALL", RuleSpec::new().with_exclude(["tls", "fqdn"]));
        let config = Config::load(document, &vocab).unwrap();
        let matches = config.check_transformations("fqdn", &["tls", "rirorg"]).unwrap();
        assert_eq!(matches.snapshot(), vec!["rirorg".to_string()]);
    }

    #[test]
    fn test_shared_across_workers() {
        let config = Arc::new(load(VALID).unwrap());
        let handles: Vec<_> = ["ipaddress", "whois", "tls", "netblock"]
            .into_iter()
            .map(|to| {
                let config = Arc::clone(&config);
                std::thread::spawn(move || {
                    config.check_transformations("fqdn", &[to]).unwrap();
                    config.check_transform_result("fqdn", to)
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(config.matches("fqdn").unwrap().len(), 4);
    }

    #[test]
    fn test_workers_never_observe_partial_resolution() {
        let document = ConfigDocument::from_json_str(VALID).unwrap();
        for _ in 0..500 {
            let config = Config::load(document.clone(), &Vocabulary::oam()).unwrap();
            let done = std::sync::atomic::AtomicBool::new(false);
            std::thread::scope(|s| {
                s.spawn(|| {
                    while !done.load(std::sync::atomic::Ordering::Acquire) {
                        if let Some(matches) = config.matches("fqdn") {
                            assert!(matches.is_match("ipaddress"));
                            assert!(matches.is_match("tls"));
                            assert_eq!(matches.len(), 2);
                            assert_eq!(config.len("fqdn"), 2);
                        }
                    }
                });
                config
                    .check_transformations("fqdn", &["ipaddress", "tls"])
                    .unwrap();
                done.store(true, std::sync::atomic::Ordering::Release);
            });
        }
    }

    proptest! {
        #[test]
        fn prop_order_independent_queries(
            tos in proptest::sample::subsequence(
                vec!["ipaddress", "whois", "tls", "rirorg", "fqdn"], 1..5
            ).prop_shuffle()
        ) {
            let a = load(VALID).unwrap();
            let b = load(VALID).unwrap();
            let mut reversed = tos.clone();
            reversed.reverse();
            let ra = a.check_transformations("fqdn", &tos).map(|m| m.snapshot()).ok();
            let rb = b.check_transformations("fqdn", &reversed).map(|m| m.snapshot()).ok();
            prop_assert_eq!(ra, rb);
        }
    }
}
