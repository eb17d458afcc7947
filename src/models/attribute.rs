use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Fixed grouping of rankable attributes.
///
/// Every [`Attribute`] belongs to exactly one category. Categories are the
/// unit of editing for custom ranks and the keys of
/// [`CustomRanksConfig`](crate::models::CustomRanksConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankCategory {
    Quality,
    Rips,
    Hdr,
    Audio,
    Extras,
    Trash,
}

impl RankCategory {
    pub const ALL: [RankCategory; 6] = [
        RankCategory::Quality,
        RankCategory::Rips,
        RankCategory::Hdr,
        RankCategory::Audio,
        RankCategory::Extras,
        RankCategory::Trash,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RankCategory::Quality => "quality",
            RankCategory::Rips => "rips",
            RankCategory::Hdr => "hdr",
            RankCategory::Audio => "audio",
            RankCategory::Extras => "extras",
            RankCategory::Trash => "trash",
        }
    }

    /// Human readable label used by front ends.
    pub fn label(self) -> &'static str {
        match self {
            RankCategory::Quality => "Quality",
            RankCategory::Rips => "Rips",
            RankCategory::Hdr => "HDR",
            RankCategory::Audio => "Audio",
            RankCategory::Extras => "Extras",
            RankCategory::Trash => "Trash",
        }
    }

    /// Attributes in this category, in declaration order.
    pub fn attributes(self) -> impl Iterator<Item = Attribute> {
        Attribute::ALL
            .iter()
            .copied()
            .filter(move |attribute| attribute.category() == self)
    }
}

impl fmt::Display for RankCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankCategory {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RankCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// Returned when a string does not name a known attribute or category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown name: {0}")]
pub struct UnknownName(pub String);

/// The closed universe of rankable release attributes.
///
/// Profiles and overrides are keyed by this enum; unknown attribute names
/// coming from decoded or imported documents are dropped at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    // Quality
    Uhd,
    Fhd,
    Hd,
    Sd,
    Av1,
    Avc,
    Bluray,
    Dvd,
    Hdtv,
    Hevc,
    Mpeg,
    Remux,
    Vhs,
    Web,
    Webdl,
    Webmux,
    Xvid,
    // Rips
    Bdrip,
    Brrip,
    Dvdrip,
    Hdrip,
    Ppvrip,
    Tvrip,
    Uhdrip,
    Vhsrip,
    Webdlrip,
    Webrip,
    // HDR
    Bit10,
    DolbyVideo,
    Hdr,
    Hdr10,
    Hdr10plus,
    Sdr,
    // Audio
    Aac,
    Ac3,
    Atmos,
    DolbyDigital,
    Ddplus,
    DtsX,
    DtsHd,
    DtsHdMa,
    DtsLossy,
    DtsLossless,
    Eac3,
    Flac,
    Mono,
    Mp3,
    Stereo,
    Surround,
    Truehd,
    // Extras
    ThreeD,
    Converted,
    Documentary,
    Dubbed,
    Edition,
    Hardcoded,
    Network,
    Proper,
    Repack,
    Retail,
    Site,
    Subbed,
    Upscaled,
    Scene,
    Uncensored,
    // Trash
    Cam,
    CleanAudio,
    R5,
    Satrip,
    Screener,
    Size,
    Telecine,
    Telesync,
}

impl Attribute {
    pub const ALL: [Attribute; 73] = [
        Attribute::Uhd,
        Attribute::Fhd,
        Attribute::Hd,
        Attribute::Sd,
        Attribute::Av1,
        Attribute::Avc,
        Attribute::Bluray,
        Attribute::Dvd,
        Attribute::Hdtv,
        Attribute::Hevc,
        Attribute::Mpeg,
        Attribute::Remux,
        Attribute::Vhs,
        Attribute::Web,
        Attribute::Webdl,
        Attribute::Webmux,
        Attribute::Xvid,
        Attribute::Bdrip,
        Attribute::Brrip,
        Attribute::Dvdrip,
        Attribute::Hdrip,
        Attribute::Ppvrip,
        Attribute::Tvrip,
        Attribute::Uhdrip,
        Attribute::Vhsrip,
        Attribute::Webdlrip,
        Attribute::Webrip,
        Attribute::Bit10,
        Attribute::DolbyVideo,
        Attribute::Hdr,
        Attribute::Hdr10,
        Attribute::Hdr10plus,
        Attribute::Sdr,
        Attribute::Aac,
        Attribute::Ac3,
        Attribute::Atmos,
        Attribute::DolbyDigital,
        Attribute::Ddplus,
        Attribute::DtsX,
        Attribute::DtsHd,
        Attribute::DtsHdMa,
        Attribute::DtsLossy,
        Attribute::DtsLossless,
        Attribute::Eac3,
        Attribute::Flac,
        Attribute::Mono,
        Attribute::Mp3,
        Attribute::Stereo,
        Attribute::Surround,
        Attribute::Truehd,
        Attribute::ThreeD,
        Attribute::Converted,
        Attribute::Documentary,
        Attribute::Dubbed,
        Attribute::Edition,
        Attribute::Hardcoded,
        Attribute::Network,
        Attribute::Proper,
        Attribute::Repack,
        Attribute::Retail,
        Attribute::Site,
        Attribute::Subbed,
        Attribute::Upscaled,
        Attribute::Scene,
        Attribute::Uncensored,
        Attribute::Cam,
        Attribute::CleanAudio,
        Attribute::R5,
        Attribute::Satrip,
        Attribute::Screener,
        Attribute::Size,
        Attribute::Telecine,
        Attribute::Telesync,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::Uhd => "uhd",
            Attribute::Fhd => "fhd",
            Attribute::Hd => "hd",
            Attribute::Sd => "sd",
            Attribute::Av1 => "av1",
            Attribute::Avc => "avc",
            Attribute::Bluray => "bluray",
            Attribute::Dvd => "dvd",
            Attribute::Hdtv => "hdtv",
            Attribute::Hevc => "hevc",
            Attribute::Mpeg => "mpeg",
            Attribute::Remux => "remux",
            Attribute::Vhs => "vhs",
            Attribute::Web => "web",
            Attribute::Webdl => "webdl",
            Attribute::Webmux => "webmux",
            Attribute::Xvid => "xvid",
            Attribute::Bdrip => "bdrip",
            Attribute::Brrip => "brrip",
            Attribute::Dvdrip => "dvdrip",
            Attribute::Hdrip => "hdrip",
            Attribute::Ppvrip => "ppvrip",
            Attribute::Tvrip => "tvrip",
            Attribute::Uhdrip => "uhdrip",
            Attribute::Vhsrip => "vhsrip",
            Attribute::Webdlrip => "webdlrip",
            Attribute::Webrip => "webrip",
            Attribute::Bit10 => "bit10",
            Attribute::DolbyVideo => "dolby_video",
            Attribute::Hdr => "hdr",
            Attribute::Hdr10 => "hdr10",
            Attribute::Hdr10plus => "hdr10plus",
            Attribute::Sdr => "sdr",
            Attribute::Aac => "aac",
            Attribute::Ac3 => "ac3",
            Attribute::Atmos => "atmos",
            Attribute::DolbyDigital => "dolby_digital",
            Attribute::Ddplus => "ddplus",
            Attribute::DtsX => "dts_x",
            Attribute::DtsHd => "dts_hd",
            Attribute::DtsHdMa => "dts_hd_ma",
            Attribute::DtsLossy => "dts_lossy",
            Attribute::DtsLossless => "dts_lossless",
            Attribute::Eac3 => "eac3",
            Attribute::Flac => "flac",
            Attribute::Mono => "mono",
            Attribute::Mp3 => "mp3",
            Attribute::Stereo => "stereo",
            Attribute::Surround => "surround",
            Attribute::Truehd => "truehd",
            Attribute::ThreeD => "three_d",
            Attribute::Converted => "converted",
            Attribute::Documentary => "documentary",
            Attribute::Dubbed => "dubbed",
            Attribute::Edition => "edition",
            Attribute::Hardcoded => "hardcoded",
            Attribute::Network => "network",
            Attribute::Proper => "proper",
            Attribute::Repack => "repack",
            Attribute::Retail => "retail",
            Attribute::Site => "site",
            Attribute::Subbed => "subbed",
            Attribute::Upscaled => "upscaled",
            Attribute::Scene => "scene",
            Attribute::Uncensored => "uncensored",
            Attribute::Cam => "cam",
            Attribute::CleanAudio => "clean_audio",
            Attribute::R5 => "r5",
            Attribute::Satrip => "satrip",
            Attribute::Screener => "screener",
            Attribute::Size => "size",
            Attribute::Telecine => "telecine",
            Attribute::Telesync => "telesync",
        }
    }

    pub fn category(self) -> RankCategory {
        use Attribute::*;
        match self {
            Uhd | Fhd | Hd | Sd | Av1 | Avc | Bluray | Dvd | Hdtv | Hevc | Mpeg | Remux | Vhs
            | Web | Webdl | Webmux | Xvid => RankCategory::Quality,
            Bdrip | Brrip | Dvdrip | Hdrip | Ppvrip | Tvrip | Uhdrip | Vhsrip | Webdlrip
            | Webrip => RankCategory::Rips,
            Bit10 | DolbyVideo | Hdr | Hdr10 | Hdr10plus | Sdr => RankCategory::Hdr,
            Aac | Ac3 | Atmos | DolbyDigital | Ddplus | DtsX | DtsHd | DtsHdMa | DtsLossy
            | DtsLossless | Eac3 | Flac | Mono | Mp3 | Stereo | Surround | Truehd => {
                RankCategory::Audio
            }
            ThreeD | Converted | Documentary | Dubbed | Edition | Hardcoded | Network | Proper
            | Repack | Retail | Site | Subbed | Upscaled | Scene | Uncensored => {
                RankCategory::Extras
            }
            Cam | CleanAudio | R5 | Satrip | Screener | Size | Telecine | Telesync => {
                RankCategory::Trash
            }
        }
    }

    /// Whether a freshly created override for this attribute should fetch.
    pub fn default_fetch(self) -> bool {
        use Attribute::*;
        match self.category() {
            RankCategory::Trash => false,
            _ => !matches!(
                self,
                Av1 | Dvd
                    | Mpeg
                    | Remux
                    | Vhs
                    | Webmux
                    | Xvid
                    | Bdrip
                    | Dvdrip
                    | Ppvrip
                    | Tvrip
                    | Uhdrip
                    | Vhsrip
                    | Webdlrip
                    | Mono
                    | Mp3
                    | ThreeD
                    | Converted
                    | Documentary
                    | Site
                    | Upscaled
            ),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .iter()
            .copied()
            .find(|attribute| attribute.as_str() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

impl Serialize for Attribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Attribute {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
