//! Built-in ranking profiles.
//!
//! The catalog is built once on first use and never mutated. Lookups by
//! name never fail: an unknown name yields the `default` profile.

use crate::models::{Attribute, ProfileName, RankingProfile};
use std::sync::LazyLock;

static CATALOG: LazyLock<ProfileCatalog> = LazyLock::new(ProfileCatalog::builtin);

/// Read-only set of named base profiles.
#[derive(Debug)]
pub struct ProfileCatalog {
    profiles: Vec<RankingProfile>,
}

impl ProfileCatalog {
    /// The process-wide catalog.
    pub fn global() -> &'static ProfileCatalog {
        &CATALOG
    }

    /// Resolves `name`, falling back to `default`.
    pub fn get(&self, name: &str) -> &RankingProfile {
        self.profile(ProfileName::from_name(name))
    }

    pub fn profile(&self, name: ProfileName) -> &RankingProfile {
        self.profiles
            .iter()
            .find(|profile| profile.name() == name)
            .unwrap_or(&self.profiles[0])
    }

    /// Every built-in profile, `default` first.
    pub fn list(&self) -> &[RankingProfile] {
        &self.profiles
    }

    fn builtin() -> Self {
        use Attribute::*;

        let best_overall = [
            (Uhd, 100),
            (Fhd, 90),
            (Hd, 80),
            (Sd, 70),
            (DolbyVideo, 100),
            (Hdr, 80),
            (Hdr10, 90),
            (DtsX, 100),
            (DtsHd, 80),
            (DtsHdMa, 90),
            (Atmos, 90),
            (Truehd, 60),
            (Ddplus, 40),
            (Aac, 30),
            (Ac3, 20),
            (Remux, 150),
            (Bluray, 120),
            (Webdl, 90),
        ];

        // Default must stay first: profile() falls back to index 0.
        let profiles = vec![
            RankingProfile::new(
                ProfileName::Default,
                [
                    (Uhd, -1000),
                    (Fhd, 100),
                    (Hd, 50),
                    (Sd, -100),
                    (DolbyVideo, -100),
                    (Aac, 70),
                    (Ac3, 50),
                    (Remux, -1000),
                    (Webdl, 90),
                    (Bluray, 80),
                    (Dvdrip, -100),
                    (Hdtv, -100),
                ],
            ),
            RankingProfile::new(ProfileName::Best, best_overall),
            RankingProfile::new(ProfileName::Custom, Attribute::ALL.map(|a| (a, 0))),
            RankingProfile::new(
                ProfileName::Remux,
                [
                    (Uhd, 100),
                    (Fhd, 60),
                    (Hd, 40),
                    (Sd, 20),
                    (DolbyVideo, 100),
                    (Hdr, 80),
                    (Hdr10, 90),
                    (DtsX, 100),
                    (DtsHd, 80),
                    (DtsHdMa, 90),
                    (Atmos, 90),
                    (Truehd, 60),
                    (Aac, 30),
                    (Ac3, 20),
                    (Remux, 150),
                    (Webdl, -1000),
                ],
            ),
            RankingProfile::new(
                ProfileName::Web,
                [
                    (Uhd, 100),
                    (Fhd, 90),
                    (Hd, 80),
                    (Sd, 20),
                    (DolbyVideo, 100),
                    (Hdr, 80),
                    (Hdr10, 90),
                    (Aac, 50),
                    (Ac3, 40),
                    (Remux, -1000),
                    (Webdl, 100),
                ],
            ),
            RankingProfile::new(
                ProfileName::Resolution,
                [
                    (Uhd, 100),
                    (Fhd, 90),
                    (Hd, 80),
                    (Sd, 70),
                    (DolbyVideo, 100),
                    (Hdr, 80),
                    (Hdr10, 90),
                    (DtsX, 100),
                    (DtsHd, 80),
                    (DtsHdMa, 90),
                    (Atmos, 90),
                    (Truehd, 60),
                    (Ddplus, 90),
                    (Aac, 30),
                    (Ac3, 20),
                    (Remux, 150),
                    (Bluray, 120),
                    (Webdl, -1000),
                ],
            ),
            RankingProfile::new(ProfileName::Overall, best_overall),
            RankingProfile::new(
                ProfileName::Anime,
                [
                    (Uhd, -1000),
                    (Fhd, 90),
                    (Hd, 80),
                    (Sd, 20),
                    (Aac, 70),
                    (Ac3, 50),
                    (Remux, -1000),
                    (Webdl, 90),
                    (Bluray, 50),
                    (Dubbed, 100),
                    (Subbed, 100),
                ],
            ),
            RankingProfile::new(
                ProfileName::All,
                [
                    (Uhd, 2),
                    (Fhd, 3),
                    (Hd, 1),
                    (Sd, 1),
                    (DolbyVideo, 1),
                    (Hdr, 1),
                    (DtsX, 1),
                    (DtsHd, 1),
                    (DtsHdMa, 1),
                    (Atmos, 1),
                    (Truehd, 1),
                    (Ddplus, 1),
                    (Aac, 2),
                    (Ac3, 1),
                    (Remux, 1),
                    (Webdl, 1),
                    (Bluray, 1),
                ],
            ),
        ];

        tracing::debug!("Built profile catalog with {} profiles", profiles.len());
        Self { profiles }
    }
}
