//! Override resolution: profile weights + custom ranks → effective table.

use crate::models::{Attribute, CustomRanksConfig, RankingProfile, SettingsModel};
use crate::services::profiles::ProfileCatalog;
use indexmap::IndexMap;
use serde::Serialize;

/// Final weight and fetch flag for one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectiveEntry {
    pub weight: i64,
    pub fetch: bool,
}

/// Effective weights and fetch flags for the whole attribute universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EffectiveTable {
    entries: IndexMap<Attribute, EffectiveEntry>,
}

impl EffectiveTable {
    pub fn get(&self, attribute: Attribute) -> EffectiveEntry {
        // Every attribute is inserted by resolve(); the fallback only guards hand-built tables.
        self.entries.get(&attribute).copied().unwrap_or(EffectiveEntry {
            weight: 0,
            fetch: true,
        })
    }

    pub fn weight(&self, attribute: Attribute) -> i64 {
        self.get(attribute).weight
    }

    pub fn fetch(&self, attribute: Attribute) -> bool {
        self.get(attribute).fetch
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, EffectiveEntry)> + '_ {
        self.entries.iter().map(|(attribute, entry)| (*attribute, *entry))
    }

    /// Attribute → weight projection handed to the scorer.
    pub fn weight_table(&self) -> IndexMap<Attribute, i64> {
        self.iter().map(|(attribute, entry)| (attribute, entry.weight)).collect()
    }

    /// Attribute → fetch projection handed to the scorer.
    pub fn fetch_table(&self) -> IndexMap<Attribute, bool> {
        self.iter().map(|(attribute, entry)| (attribute, entry.fetch)).collect()
    }

    /// Entries for the given attributes only, e.g. those present in a parsed record.
    pub fn restricted_to(&self, attributes: &[Attribute]) -> IndexMap<Attribute, EffectiveEntry> {
        attributes
            .iter()
            .map(|attribute| (*attribute, self.get(*attribute)))
            .collect()
    }
}

/// Merges a base profile with per-category overrides.
///
/// For each attribute with an override, the weight is the override's rank
/// when `use_custom_rank` is set and the profile weight otherwise; the fetch
/// flag is always the override's. Attributes without an override keep the
/// profile weight and fetch. Profiles carry weights only, so nothing gates
/// an override's fetch flag.
pub fn resolve(profile: &RankingProfile, overrides: &CustomRanksConfig) -> EffectiveTable {
    let entries = Attribute::ALL
        .into_iter()
        .map(|attribute| {
            let base = profile.weight(attribute);
            let entry = match overrides.lookup(attribute) {
                Some(custom) => EffectiveEntry {
                    weight: if custom.use_custom_rank { custom.rank } else { base },
                    fetch: custom.fetch,
                },
                None => EffectiveEntry {
                    weight: base,
                    fetch: true,
                },
            };
            (attribute, entry)
        })
        .collect();

    EffectiveTable { entries }
}

/// Resolves the settings' own profile from the global catalog.
pub fn resolve_settings(settings: &SettingsModel) -> EffectiveTable {
    let profile = ProfileCatalog::global().profile(settings.profile);
    resolve(profile, &settings.custom_ranks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AttributeOverride, CategoryOverrideSet, ProfileName, RankCategory,
    };

    fn empty_overrides() -> CustomRanksConfig {
        let mut overrides = CustomRanksConfig::default();
        for category in RankCategory::ALL {
            overrides.set(category, CategoryOverrideSet::new());
        }
        overrides
    }

    #[test]
    fn test_custom_rank_wins_when_enabled() {
        let profile = ProfileCatalog::global().profile(ProfileName::Default);
        let mut overrides = empty_overrides();
        overrides
            .get_mut(RankCategory::Quality)
            .insert(Attribute::Webdl, AttributeOverride::custom(-5));

        let table = resolve(profile, &overrides);
        assert_eq!(table.weight(Attribute::Webdl), -5);
    }

    #[test]
    fn test_profile_weight_used_when_custom_rank_disabled() {
        let profile = ProfileCatalog::global().profile(ProfileName::Default);
        let mut overrides = empty_overrides();
        overrides.get_mut(RankCategory::Quality).insert(
            Attribute::Webdl,
            AttributeOverride {
                fetch: true,
                rank: 90,
                use_custom_rank: false,
            },
        );
        overrides.get_mut(RankCategory::Trash).insert(
            Attribute::Cam,
            AttributeOverride {
                fetch: false,
                rank: 500,
                use_custom_rank: false,
            },
        );

        let table = resolve(profile, &overrides);
        assert_eq!(table.weight(Attribute::Webdl), profile.weight(Attribute::Webdl));
        // cam is absent from the default profile
        assert_eq!(table.weight(Attribute::Cam), 0);
    }

    #[test]
    fn test_fetch_flag_is_authoritative() {
        let profile = ProfileCatalog::global().profile(ProfileName::Best);
        let mut overrides = empty_overrides();
        overrides.get_mut(RankCategory::Quality).insert(
            Attribute::Remux,
            AttributeOverride {
                fetch: false,
                rank: 0,
                use_custom_rank: false,
            },
        );

        let table = resolve(profile, &overrides);
        assert!(!table.fetch(Attribute::Remux));
        assert_eq!(table.weight(Attribute::Remux), 150);
    }

    #[test]
    fn test_attributes_without_override_default_to_base_and_fetch() {
        let profile = ProfileCatalog::global().profile(ProfileName::Default);
        let table = resolve(profile, &empty_overrides());

        for attribute in Attribute::ALL {
            assert_eq!(
                table.get(attribute),
                EffectiveEntry {
                    weight: profile.weight(attribute),
                    fetch: true
                }
            );
        }
    }

    #[test]
    fn test_default_settings_apply_default_fetch_flags() {
        let table = resolve_settings(&SettingsModel::default());
        assert!(!table.fetch(Attribute::Cam));
        assert!(table.fetch(Attribute::Webdl));
        assert_eq!(table.weight(Attribute::Fhd), 100);
        assert_eq!(table.weight_table().len(), Attribute::ALL.len());
        assert_eq!(table.fetch_table().len(), Attribute::ALL.len());
    }

    #[test]
    fn test_restricted_to_present_attributes() {
        let table = resolve_settings(&SettingsModel::default());
        let subset = table.restricted_to(&[Attribute::Aac, Attribute::Remux]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset[&Attribute::Aac].weight, 70);
        assert_eq!(subset[&Attribute::Remux].weight, -1000);
    }
}
