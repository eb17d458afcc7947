use super::attribute::{Attribute, RankCategory};
use super::lenient::{self, lenient_deserialize};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// A user's instruction for one attribute, layered on top of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttributeOverride {
    /// Whether releases carrying the attribute should be fetched at all
    pub fetch: bool,

    /// Weight used instead of the profile's when `use_custom_rank` is set
    pub rank: i64,

    pub use_custom_rank: bool,
}

impl AttributeOverride {
    /// The override a new configuration starts with for `attribute`.
    pub fn default_for(attribute: Attribute) -> Self {
        Self {
            fetch: attribute.default_fetch(),
            rank: 0,
            use_custom_rank: false,
        }
    }

    /// Override with an explicit custom rank.
    pub fn custom(rank: i64) -> Self {
        Self {
            fetch: true,
            rank,
            use_custom_rank: true,
        }
    }

    /// Reads an override record, filling absent fields from `defaults`.
    ///
    /// Accepts the legacy `enable` key in place of `use_custom_rank`.
    pub fn from_value_or(value: &Value, defaults: AttributeOverride) -> Self {
        let Value::Object(map) = value else {
            tracing::debug!("Override record is not a mapping: {}", value);
            return defaults;
        };

        let use_custom_rank = map.get("use_custom_rank").or_else(|| map.get("enable"));

        Self {
            fetch: lenient::bool_or(map.get("fetch"), defaults.fetch),
            rank: lenient::int_or(map.get("rank"), defaults.rank),
            use_custom_rank: lenient::bool_or(use_custom_rank, defaults.use_custom_rank),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        Self::from_value_or(value, Self::default())
    }
}

impl Default for AttributeOverride {
    fn default() -> Self {
        Self {
            fetch: true,
            rank: 0,
            use_custom_rank: false,
        }
    }
}

lenient_deserialize!(AttributeOverride);

/// Overrides for the attributes of one [`RankCategory`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CategoryOverrideSet {
    entries: IndexMap<Attribute, AttributeOverride>,
}

impl CategoryOverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every attribute of `category` with its default override.
    pub fn defaults_for(category: RankCategory) -> Self {
        Self {
            entries: category
                .attributes()
                .map(|attribute| (attribute, AttributeOverride::default_for(attribute)))
                .collect(),
        }
    }

    /// Reads a category map, ignoring keys that do not name an attribute of `category`.
    pub fn from_value(category: RankCategory, value: &Value) -> Self {
        let Value::Object(map) = value else {
            tracing::debug!("Custom ranks for {} are not a mapping, using defaults", category);
            return Self::defaults_for(category);
        };

        let mut entries = IndexMap::with_capacity(map.len());
        for (key, record) in map {
            match key.parse::<Attribute>() {
                Ok(attribute) if attribute.category() == category => {
                    let defaults = AttributeOverride::default_for(attribute);
                    entries.insert(attribute, AttributeOverride::from_value_or(record, defaults));
                }
                Ok(attribute) => {
                    tracing::debug!(
                        "Ignoring {} under {}: it belongs to {}",
                        attribute,
                        category,
                        attribute.category()
                    );
                }
                Err(_) => {
                    tracing::debug!("Ignoring unknown attribute {:?} under {}", key, category);
                }
            }
        }

        Self { entries }
    }

    /// Inserts an override, returning the previous one.
    pub fn insert(
        &mut self,
        attribute: Attribute,
        value: AttributeOverride,
    ) -> Option<AttributeOverride> {
        self.entries.insert(attribute, value)
    }

    pub fn get(&self, attribute: Attribute) -> Option<&AttributeOverride> {
        self.entries.get(&attribute)
    }

    pub fn get_mut(&mut self, attribute: Attribute) -> Option<&mut AttributeOverride> {
        self.entries.get_mut(&attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &AttributeOverride)> {
        self.entries.iter().map(|(attribute, value)| (*attribute, value))
    }

    /// Entries sorted by attribute name, the order editors display them in.
    pub fn sorted(&self) -> Vec<(Attribute, AttributeOverride)> {
        let mut rows: Vec<_> = self.entries.iter().map(|(a, v)| (*a, *v)).collect();
        rows.sort_by_key(|(attribute, _)| attribute.as_str());
        rows
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Attribute, AttributeOverride)> for CategoryOverrideSet {
    fn from_iter<I: IntoIterator<Item = (Attribute, AttributeOverride)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Per-category override sets, one for each [`RankCategory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomRanksConfig {
    pub quality: CategoryOverrideSet,
    pub rips: CategoryOverrideSet,
    pub hdr: CategoryOverrideSet,
    pub audio: CategoryOverrideSet,
    pub extras: CategoryOverrideSet,
    pub trash: CategoryOverrideSet,
}

impl CustomRanksConfig {
    pub fn get(&self, category: RankCategory) -> &CategoryOverrideSet {
        match category {
            RankCategory::Quality => &self.quality,
            RankCategory::Rips => &self.rips,
            RankCategory::Hdr => &self.hdr,
            RankCategory::Audio => &self.audio,
            RankCategory::Extras => &self.extras,
            RankCategory::Trash => &self.trash,
        }
    }

    pub fn get_mut(&mut self, category: RankCategory) -> &mut CategoryOverrideSet {
        match category {
            RankCategory::Quality => &mut self.quality,
            RankCategory::Rips => &mut self.rips,
            RankCategory::Hdr => &mut self.hdr,
            RankCategory::Audio => &mut self.audio,
            RankCategory::Extras => &mut self.extras,
            RankCategory::Trash => &mut self.trash,
        }
    }

    pub fn set(&mut self, category: RankCategory, overrides: CategoryOverrideSet) {
        *self.get_mut(category) = overrides;
    }

    /// Looks up the override for `attribute` in its home category.
    pub fn lookup(&self, attribute: Attribute) -> Option<&AttributeOverride> {
        self.get(attribute.category()).get(attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RankCategory, &CategoryOverrideSet)> {
        RankCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// Reads the category mapping. Missing categories get their defaults,
    /// unknown category keys are ignored.
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            tracing::debug!("Custom ranks are not a mapping, using defaults");
            return Self::default();
        };

        for key in map.keys() {
            if key.parse::<RankCategory>().is_err() {
                tracing::debug!("Ignoring unknown custom rank category {:?}", key);
            }
        }

        let mut config = Self::default();
        for category in RankCategory::ALL {
            if let Some(section) = map.get(category.as_str()) {
                config.set(category, CategoryOverrideSet::from_value(category, section));
            }
        }
        config
    }
}

impl Default for CustomRanksConfig {
    fn default() -> Self {
        Self {
            quality: CategoryOverrideSet::defaults_for(RankCategory::Quality),
            rips: CategoryOverrideSet::defaults_for(RankCategory::Rips),
            hdr: CategoryOverrideSet::defaults_for(RankCategory::Hdr),
            audio: CategoryOverrideSet::defaults_for(RankCategory::Audio),
            extras: CategoryOverrideSet::defaults_for(RankCategory::Extras),
            trash: CategoryOverrideSet::defaults_for(RankCategory::Trash),
        }
    }
}

lenient_deserialize!(CustomRanksConfig);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_custom_ranks_cover_every_attribute() {
        let config = CustomRanksConfig::default();
        for attribute in Attribute::ALL {
            let entry = config.lookup(attribute).unwrap();
            assert_eq!(*entry, AttributeOverride::default_for(attribute));
        }
    }

    #[test]
    fn test_override_accepts_legacy_enable_and_loose_types() {
        let value = json!({"fetch": 0, "rank": "90", "enable": 1});
        let parsed = AttributeOverride::from_value(&value);
        assert!(!parsed.fetch);
        assert_eq!(parsed.rank, 90);
        assert!(parsed.use_custom_rank);
    }

    #[test]
    fn test_category_set_ignores_foreign_and_unknown_keys() {
        let value = json!({
            "webdl": {"fetch": true, "rank": 5, "use_custom_rank": true},
            "aac": {"fetch": true, "rank": 1, "use_custom_rank": true},
            "hologram": {"fetch": true}
        });
        let set = CategoryOverrideSet::from_value(RankCategory::Quality, &value);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(Attribute::Webdl).unwrap().rank, 5);
        assert!(set.get(Attribute::Aac).is_none());
    }

    #[test]
    fn test_missing_fields_use_attribute_defaults() {
        let value = json!({"cam": {"rank": -500}});
        let set = CategoryOverrideSet::from_value(RankCategory::Trash, &value);
        let cam = set.get(Attribute::Cam).unwrap();
        assert!(!cam.fetch);
        assert_eq!(cam.rank, -500);
        assert!(!cam.use_custom_rank);
    }

    #[test]
    fn test_custom_ranks_fill_missing_categories() {
        let value = json!({"audio": {}, "bogus": {"x": 1}});
        let config = CustomRanksConfig::from_value(&value);
        assert!(config.audio.is_empty());
        assert_eq!(config.quality, CategoryOverrideSet::defaults_for(RankCategory::Quality));
    }

    #[test]
    fn test_sorted_rows_are_alphabetical() {
        let rows = CategoryOverrideSet::defaults_for(RankCategory::Trash).sorted();
        let names: Vec<&str> = rows.iter().map(|(a, _)| a.as_str()).collect();
        let mut expected = names.clone();
        expected.sort();
        assert_eq!(names, expected);
    }
}
