use super::attribute::Attribute;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier of a built-in ranking profile.
///
/// The set is closed; any other name resolves to [`ProfileName::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProfileName {
    #[default]
    Default,
    Best,
    Custom,
    Remux,
    Web,
    Resolution,
    Overall,
    Anime,
    All,
}

impl ProfileName {
    pub const ALL: [ProfileName; 9] = [
        ProfileName::Default,
        ProfileName::Best,
        ProfileName::Custom,
        ProfileName::Remux,
        ProfileName::Web,
        ProfileName::Resolution,
        ProfileName::Overall,
        ProfileName::Anime,
        ProfileName::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileName::Default => "default",
            ProfileName::Best => "best",
            ProfileName::Custom => "custom",
            ProfileName::Remux => "remux",
            ProfileName::Web => "web",
            ProfileName::Resolution => "resolution",
            ProfileName::Overall => "overall",
            ProfileName::Anime => "anime",
            ProfileName::All => "all",
        }
    }

    /// Looks up a profile by name, falling back to `default` for unknown names.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|profile| profile.as_str() == name)
            .unwrap_or_else(|| {
                tracing::debug!("Unknown profile {:?}, using default", name);
                ProfileName::Default
            })
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProfileName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProfileName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ProfileName::from_name(&name))
    }
}

/// Immutable base weight table for one profile.
///
/// Attributes absent from the table weigh 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingProfile {
    name: ProfileName,
    weights: IndexMap<Attribute, i64>,
}

impl RankingProfile {
    pub fn new<I>(name: ProfileName, weights: I) -> Self
    where
        I: IntoIterator<Item = (Attribute, i64)>,
    {
        Self {
            name,
            weights: weights.into_iter().collect(),
        }
    }

    pub fn name(&self) -> ProfileName {
        self.name
    }

    pub fn weight(&self, attribute: Attribute) -> i64 {
        self.weights.get(&attribute).copied().unwrap_or(0)
    }

    /// Attributes the profile assigns an explicit weight to, in table order.
    pub fn weights(&self) -> impl Iterator<Item = (Attribute, i64)> + '_ {
        self.weights.iter().map(|(attribute, weight)| (*attribute, *weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_profile_falls_back_to_default() {
        assert_eq!(ProfileName::from_name("best"), ProfileName::Best);
        assert_eq!(ProfileName::from_name("ultra"), ProfileName::Default);
        assert_eq!(ProfileName::from_name(""), ProfileName::Default);
    }

    #[test]
    fn test_profile_name_serde() {
        let json = serde_json::to_string(&ProfileName::Anime).unwrap();
        assert_eq!(json, "\"anime\"");
        let parsed: ProfileName = serde_json::from_str("\"nope\"").unwrap();
        assert_eq!(parsed, ProfileName::Default);
    }

    #[test]
    fn test_absent_attribute_weighs_zero() {
        let profile = RankingProfile::new(ProfileName::Custom, [(Attribute::Webdl, 90)]);
        assert_eq!(profile.weight(Attribute::Webdl), 90);
        assert_eq!(profile.weight(Attribute::Cam), 0);
    }
}
