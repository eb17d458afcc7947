//! Seams to the external title parser and scorer, and the title evaluation
//! that ties them to the configuration.
//!
//! Neither the parsing of release names nor the final rank arithmetic lives
//! in this crate. [`TitleParser`] and [`Scorer`] are implemented elsewhere;
//! this module only hands them well-formed inputs.

use crate::models::{AppConfig, Attribute, AttributeRecord, OptionsConfig, TitleCase};
use crate::services::patterns::{FilterOutcome, PatternRuleSet};
use crate::services::resolver::{self, EffectiveTable};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;

/// Turns a raw release name into an attribute record.
#[cfg_attr(test, mockall::automock)]
pub trait TitleParser {
    fn parse(&self, raw_title: &str, remove_trash: bool) -> Result<AttributeRecord>;
}

/// Computes the final rank and fetch decision for one parsed title.
#[cfg_attr(test, mockall::automock)]
pub trait Scorer {
    fn score(&self, inputs: &ScoringInputs) -> Result<ScoreOutcome>;
}

/// Everything the scorer needs for one title.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringInputs {
    pub weights: IndexMap<Attribute, i64>,
    pub fetch: IndexMap<Attribute, bool>,
    pub record: AttributeRecord,
    pub filters: FilterOutcome,
    pub options: OptionsConfig,
    pub correct_title: String,
    pub remove_trash: bool,
}

impl ScoringInputs {
    pub fn new(
        table: &EffectiveTable,
        record: &AttributeRecord,
        filters: &FilterOutcome,
        options: &OptionsConfig,
        correct_title: &str,
        remove_trash: bool,
    ) -> Self {
        Self {
            weights: table.weight_table(),
            fetch: table.fetch_table(),
            record: record.clone(),
            filters: filters.clone(),
            options: options.clone(),
            correct_title: correct_title.to_string(),
            remove_trash,
        }
    }

    /// Weights of the attributes the record actually carries.
    pub fn applicable_weights(&self) -> IndexMap<Attribute, i64> {
        self.record
            .present_attributes()
            .into_iter()
            .map(|attribute| {
                let weight = self.weights.get(&attribute).copied().unwrap_or(0);
                (attribute, weight)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreOutcome {
    pub total_rank: i64,
    pub fetch_decision: bool,
}

/// Result of evaluating one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleReport {
    pub raw_title: String,
    pub correct_title: String,
    pub rank: i64,
    pub fetch: bool,
    pub preferred_boost: bool,
    pub filters: FilterOutcome,
    /// Non-empty parsed fields, for display
    pub attributes: Vec<(String, String)>,
}

/// Evaluates one test case against the configuration.
///
/// The scorer sees the record parsed with the configured trash flag; the
/// pattern rules see a second parse with trash removal off, so trash
/// markers remain visible to exclude patterns.
pub fn evaluate_title(
    parser: &dyn TitleParser,
    scorer: &dyn Scorer,
    config: &AppConfig,
    case: &TitleCase,
) -> Result<TitleReport> {
    let settings = &config.settings_model;
    let table = resolver::resolve_settings(settings);
    let rules = PatternRuleSet::from_settings(settings);

    let scored_record = parser
        .parse(&case.raw_title, config.remove_trash)
        .with_context(|| format!("Failed to parse title: {}", case.raw_title))?;
    let full_record = parser
        .parse(&case.raw_title, false)
        .with_context(|| format!("Failed to parse title: {}", case.raw_title))?;

    let filters = rules.evaluate(&full_record);
    for error in &filters.errors {
        tracing::warn!("{}", error);
    }

    let inputs = ScoringInputs::new(
        &table,
        &scored_record,
        &filters,
        &settings.options,
        &case.correct_title,
        config.remove_trash,
    );
    let outcome = scorer
        .score(&inputs)
        .with_context(|| format!("Failed to score title: {}", case.raw_title))?;

    tracing::debug!(
        "Scored {:?}: rank={}, fetch={}",
        case.raw_title,
        outcome.total_rank,
        outcome.fetch_decision
    );

    Ok(TitleReport {
        raw_title: case.raw_title.clone(),
        correct_title: case.correct_title.clone(),
        rank: outcome.total_rank,
        fetch: outcome.fetch_decision,
        preferred_boost: filters.preferred_boost(),
        attributes: full_record.non_empty_fields(),
        filters,
    })
}

/// Evaluates every test case that has a raw title; empty cases are skipped.
pub fn evaluate_all(
    parser: &dyn TitleParser,
    scorer: &dyn Scorer,
    config: &AppConfig,
) -> Vec<(usize, Result<TitleReport>)> {
    config
        .titles
        .iter()
        .enumerate()
        .filter(|(_, case)| !case.raw_title.is_empty())
        .map(|(index, case)| (index, evaluate_title(parser, scorer, config, case)))
        .collect()
}
