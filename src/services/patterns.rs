//! Require / exclude / preferred pattern evaluation.
//!
//! Patterns are regular expressions matched anywhere in the record's
//! subject (see [`AttributeRecord::subject`]). A pattern written as `/body/`
//! (longer than two characters) is compiled case-sensitively with the
//! slashes stripped; every other pattern is compiled case-insensitively.
//!
//! A pattern that fails to compile never aborts evaluation. It counts as a
//! non-match and its error is reported alongside the outcome.

use crate::models::{AttributeRecord, FilterRule, SettingsModel};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use thiserror::Error;

/// A filter pattern that failed to compile.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid pattern {pattern:?}: {message}")]
pub struct PatternError {
    pub pattern: String,
    pub message: String,
}

/// A compiled filter pattern.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    case_sensitive: bool,
    regex: Regex,
}

impl CompiledPattern {
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let case_sensitive = is_case_sensitive(pattern);
        let body = if case_sensitive {
            &pattern[1..pattern.len() - 1]
        } else {
            pattern
        };

        let regex = RegexBuilder::new(body)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| PatternError {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            source: pattern.to_string(),
            case_sensitive,
            regex,
        })
    }

    /// The pattern as the user wrote it.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn is_match(&self, subject: &str) -> bool {
        self.regex.is_match(subject)
    }
}

/// `/body/` with a non-empty body is case-sensitive.
fn is_case_sensitive(pattern: &str) -> bool {
    pattern.starts_with('/') && pattern.ends_with('/') && pattern.chars().count() > 2
}

/// Matches a single pattern against a subject string.
pub fn pattern_matches(pattern: &str, subject: &str) -> Result<bool, PatternError> {
    Ok(CompiledPattern::compile(pattern)?.is_match(subject))
}

/// The texts a pattern is tried against: the space-joined subject first,
/// then every individual projection, so anchored patterns can match a
/// single attribute value.
#[derive(Debug, Clone, Default)]
pub struct Haystack {
    texts: Vec<String>,
}

impl Haystack {
    pub fn of(record: &AttributeRecord) -> Self {
        let projections = record.projections();
        let mut texts = Vec::with_capacity(projections.len() + 1);
        texts.push(record.subject());
        texts.extend(projections);
        Self { texts }
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    fn contains(&self, pattern: &CompiledPattern) -> bool {
        self.texts.iter().any(|text| pattern.is_match(text))
    }
}

/// One filter rule with every pattern compiled up front.
#[derive(Debug, Clone, Default)]
pub struct CompiledRule {
    patterns: Vec<CompiledPattern>,
    errors: Vec<PatternError>,
    total: usize,
}

impl CompiledRule {
    pub fn compile(rule: &FilterRule) -> Self {
        let mut patterns = Vec::with_capacity(rule.len());
        let mut errors = Vec::new();

        for pattern in rule.patterns() {
            match CompiledPattern::compile(pattern) {
                Ok(compiled) => patterns.push(compiled),
                Err(e) => {
                    tracing::warn!("Skipping filter pattern: {}", e);
                    errors.push(e);
                }
            }
        }

        Self {
            patterns,
            errors,
            total: rule.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn errors(&self) -> &[PatternError] {
        &self.errors
    }

    /// Source text of every compiled pattern matching `haystack`, in rule order.
    pub fn matching<'a>(&'a self, haystack: &Haystack) -> Vec<&'a str> {
        self.patterns
            .iter()
            .filter(|pattern| haystack.contains(pattern))
            .map(CompiledPattern::source)
            .collect()
    }

    /// True when every pattern matches. Invalid patterns never match.
    pub fn all_match(&self, haystack: &Haystack) -> bool {
        self.errors.is_empty() && self.patterns.iter().all(|pattern| haystack.contains(pattern))
    }

    pub fn any_match(&self, haystack: &Haystack) -> bool {
        self.patterns.iter().any(|pattern| haystack.contains(pattern))
    }
}

/// Outcome of running all three rules against one record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterOutcome {
    pub require_ok: bool,
    pub exclude_ok: bool,
    /// Exclude patterns that matched
    pub excluded_by: Vec<String>,
    /// Number of preferred patterns that matched
    pub preferred_matches: usize,
    #[serde(skip)]
    pub errors: Vec<PatternError>,
}

impl FilterOutcome {
    /// Whether any preferred pattern earned a boost.
    pub fn preferred_boost(&self) -> bool {
        self.preferred_matches > 0
    }

    /// Passed both require and exclude.
    pub fn passes(&self) -> bool {
        self.require_ok && self.exclude_ok
    }
}

/// The require, exclude and preferred rules of one configuration, compiled.
#[derive(Debug, Clone, Default)]
pub struct PatternRuleSet {
    require: CompiledRule,
    exclude: CompiledRule,
    preferred: CompiledRule,
}

impl PatternRuleSet {
    pub fn new(require: &FilterRule, exclude: &FilterRule, preferred: &FilterRule) -> Self {
        Self {
            require: CompiledRule::compile(require),
            exclude: CompiledRule::compile(exclude),
            preferred: CompiledRule::compile(preferred),
        }
    }

    pub fn from_settings(settings: &SettingsModel) -> Self {
        Self::new(&settings.require, &settings.exclude, &settings.preferred)
    }

    /// Vacuously true for an empty rule; otherwise every pattern must match.
    pub fn require_ok(&self, record: &AttributeRecord) -> bool {
        self.require.is_empty() || self.require.all_match(&Haystack::of(record))
    }

    /// False as soon as any exclude pattern matches.
    pub fn exclude_ok(&self, record: &AttributeRecord) -> bool {
        !self.exclude.any_match(&Haystack::of(record))
    }

    /// Exclude patterns responsible for rejecting `record`.
    pub fn exclusion_causes(&self, record: &AttributeRecord) -> Vec<String> {
        self.exclude
            .matching(&Haystack::of(record))
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn preferred_score(&self, record: &AttributeRecord) -> usize {
        self.preferred.matching(&Haystack::of(record)).len()
    }

    /// Compile errors across all three rules.
    pub fn errors(&self) -> Vec<PatternError> {
        self.require
            .errors()
            .iter()
            .chain(self.exclude.errors())
            .chain(self.preferred.errors())
            .cloned()
            .collect()
    }

    pub fn evaluate(&self, record: &AttributeRecord) -> FilterOutcome {
        let haystack = Haystack::of(record);
        let excluded_by: Vec<String> = self
            .exclude
            .matching(&haystack)
            .into_iter()
            .map(str::to_string)
            .collect();

        let outcome = FilterOutcome {
            require_ok: self.require.is_empty() || self.require.all_match(&haystack),
            exclude_ok: excluded_by.is_empty(),
            excluded_by,
            preferred_matches: self.preferred.matching(&haystack).len(),
            errors: self.errors(),
        };

        tracing::debug!(
            "Filter outcome: require_ok={}, exclude_ok={}, preferred={}, errors={}",
            outcome.require_ok,
            outcome.exclude_ok,
            outcome.preferred_matches,
            outcome.errors.len()
        );

        outcome
    }
}

/// Every require pattern must match (vacuously true when empty).
pub fn require_ok(requires: &FilterRule, record: &AttributeRecord) -> bool {
    PatternRuleSet::new(requires, &FilterRule::default(), &FilterRule::default()).require_ok(record)
}

/// True unless some exclude pattern matches.
pub fn exclude_ok(excludes: &FilterRule, record: &AttributeRecord) -> bool {
    !CompiledRule::compile(excludes).any_match(&Haystack::of(record))
}

/// Number of preferred patterns that match.
pub fn preferred_score(preferreds: &FilterRule, record: &AttributeRecord) -> usize {
    CompiledRule::compile(preferreds).matching(&Haystack::of(record)).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(raw: &str) -> AttributeRecord {
        AttributeRecord::new().with("raw_title", raw)
    }

    #[test]
    fn test_slashed_pattern_is_case_sensitive() {
        assert!(pattern_matches("/Foo/", "Foo").unwrap());
        assert!(!pattern_matches("/Foo/", "foo").unwrap());
        assert!(pattern_matches("Foo", "Foo").unwrap());
        assert!(pattern_matches("Foo", "foo").unwrap());
    }

    #[test]
    fn test_short_slash_patterns_are_literal_case_insensitive() {
        assert!(!is_case_sensitive("//"));
        assert!(!is_case_sensitive("/"));
        assert!(is_case_sensitive("/a/"));
        assert!(pattern_matches("//", "a//b").unwrap());
        assert!(!pattern_matches("/x", "X").unwrap());
        assert!(pattern_matches("/x", "/X").unwrap());
    }

    #[test]
    fn test_invalid_pattern_reports_error() {
        let err = pattern_matches("(unclosed", "anything").unwrap_err();
        assert_eq!(err.pattern, "(unclosed");
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_require_all_must_match() {
        let subject = record("Movie.2020.1080p.WEB-DL");
        assert!(require_ok(&FilterRule::default(), &subject));
        assert!(require_ok(&FilterRule::new(["1080p", "web"]), &subject));
        assert!(!require_ok(&FilterRule::new(["1080p", "2160p"]), &subject));
    }

    #[test]
    fn test_exclude_any_match_rejects() {
        let excludes = FilterRule::new(["CAM"]);
        assert!(!exclude_ok(&excludes, &record("Movie.2020.CAM.x264")));
        assert!(exclude_ok(&excludes, &record("Movie.2020.WEB-DL")));
    }

    #[test]
    fn test_preferred_counts_matches() {
        let preferreds = FilterRule::new(["remux", "/HDR/", "atmos", "(bad"]);
        let subject = record("Movie.2020.2160p.REMUX.HDR.Atmos");
        assert_eq!(preferred_score(&preferreds, &subject), 3);
        assert_eq!(preferred_score(&FilterRule::default(), &subject), 0);
    }

    #[test]
    fn test_invalid_patterns_do_not_stop_evaluation() {
        let rules = PatternRuleSet::new(
            &FilterRule::new(["1080p"]),
            &FilterRule::new(["[oops", "CAM"]),
            &FilterRule::new(["(", "web"]),
        );
        let outcome = rules.evaluate(&record("Movie.CAM.1080p.WEB"));

        assert!(outcome.require_ok);
        assert!(!outcome.exclude_ok);
        assert_eq!(outcome.excluded_by, vec!["CAM"]);
        assert_eq!(outcome.preferred_matches, 1);
        assert_eq!(outcome.errors.len(), 2);
    }

    #[test]
    fn test_invalid_require_pattern_counts_as_non_match() {
        let rules = PatternRuleSet::new(
            &FilterRule::new(["1080p", "(("]),
            &FilterRule::default(),
            &FilterRule::default(),
        );
        assert!(!rules.require_ok(&record("Movie.1080p")));
    }

    #[test]
    fn test_patterns_see_flattened_attributes() {
        let parsed = AttributeRecord::new()
            .with("raw_title", "Show.S01E01.720p")
            .with("audio", json!(["AAC", "Atmos"]))
            .with("dubbed", true);
        let rules = PatternRuleSet::new(
            &FilterRule::new(["^show", "/Atmos/"]),
            &FilterRule::new(["subbed"]),
            &FilterRule::new(["dubbed"]),
        );

        let outcome = rules.evaluate(&parsed);
        assert!(outcome.passes());
        assert!(outcome.preferred_boost());
        assert!(rules.exclusion_causes(&parsed).is_empty());
    }

    #[test]
    fn test_anchored_pattern_matches_single_projection() {
        let parsed = AttributeRecord::new()
            .with("raw_title", "Movie.2020.1080p")
            .with("resolution", "1080p")
            .with("codec", "avc");
        assert_eq!(parsed.subject(), "Movie.2020.1080p 1080p avc");

        assert!(require_ok(&FilterRule::new(["^1080p$"]), &parsed));
        assert!(!exclude_ok(&FilterRule::new(["^avc$"]), &parsed));
        assert_eq!(preferred_score(&FilterRule::new(["^movie", "^2160p$"]), &parsed), 1);

        // Patterns spanning projections still see the joined subject
        assert!(require_ok(&FilterRule::new(["1080p 1080p"]), &parsed));
        assert!(!require_ok(&FilterRule::new(["^2160p$"]), &parsed));

        let texts = Haystack::of(&parsed);
        assert_eq!(texts.texts()[0], parsed.subject());
        assert_eq!(texts.texts().len(), 4);
    }
}
