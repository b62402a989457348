use std::fmt;

use reqwest::Url;

use crate::error::{CareerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Platform {
    Pc,
    Psn,
    Xbl,
    #[default]
    Unknown,
}

impl Platform {
    /// URL path segment, `None` while unresolved.
    pub fn path_segment(self) -> Option<&'static str> {
        match self {
            Platform::Pc => Some("pc"),
            Platform::Psn => Some("psn"),
            Platform::Xbl => Some("xbl"),
            Platform::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        self != Platform::Unknown
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment().unwrap_or("unknown"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    Us,
    Eu,
    #[default]
    Unknown,
}

impl Region {
    pub fn path_segment(self) -> Option<&'static str> {
        match self {
            Region::Us => Some("us"),
            Region::Eu => Some("eu"),
            Region::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        self != Region::Unknown
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment().unwrap_or("unknown"))
    }
}

/// `Name#1234`: non-empty name without whitespace, all-digit discriminator.
pub fn is_battletag(username: &str) -> bool {
    match username.split_once('#') {
        Some((name, discriminator)) => {
            !name.is_empty()
                && !name.chars().any(char::is_whitespace)
                && !discriminator.is_empty()
                && discriminator.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Who the player is and where their profile lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub platform: Platform,
    pub region: Region,
}

impl Identity {
    /// A battletag forces the pc platform. Asking for pc without a battletag
    /// fails. Console players carry no region.
    pub fn new(username: impl Into<String>, platform: Platform, region: Region) -> Result<Self> {
        let username = username.into();
        let battletag = is_battletag(&username);

        if platform == Platform::Pc && !battletag {
            return Err(CareerError::InvalidIdentityFormat { username });
        }

        let (platform, region) = if battletag {
            (Platform::Pc, region)
        } else {
            (platform, Region::Unknown)
        };

        Ok(Self { username, platform, region })
    }

    pub fn is_battletag(&self) -> bool {
        is_battletag(&self.username)
    }

    /// Battletag with `#` swapped for `-`, the form used in profile URLs.
    pub fn url_name(&self) -> String {
        self.username.replace('#', "-")
    }

    pub fn state(&self) -> ResolutionState {
        match (self.platform, self.region) {
            (Platform::Unknown, _) => ResolutionState::Unresolved,
            (Platform::Pc, Region::Unknown) => ResolutionState::PlatformKnown,
            _ => ResolutionState::Ready,
        }
    }

    /// Path segments below the base URL, `None` until resolution is complete.
    pub fn profile_segments(&self) -> Option<Vec<String>> {
        let platform = self.platform.path_segment()?.to_string();
        match self.platform {
            Platform::Pc => {
                let region = self.region.path_segment()?.to_string();
                Some(vec![platform, region, self.url_name()])
            }
            _ => Some(vec![platform, self.username.clone()]),
        }
    }

    /// Each segment is percent-encoded, so `#`, `?` or `/` in a console name
    /// stay part of the path. `None` also for a base that is not a URL.
    pub fn profile_url(&self, base: &str) -> Option<String> {
        let segments = self.profile_segments()?;
        let mut url = Url::parse(base).ok()?;
        url.path_segments_mut().ok()?.pop_if_empty().extend(&segments);
        Some(url.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    Unresolved,
    PlatformKnown,
    Ready,
}
