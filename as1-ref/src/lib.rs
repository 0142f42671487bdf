use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, num::ParseFloatError, str::FromStr};
use thiserror::Error as ThisError;
use url::Url;

mod pattern;
pub use pattern::{NativeTarget, UrlPattern, UrlPatternTable};

/// Year stamped into every tag URI we mint.
pub const TAG_URI_YEAR: u32 = 2013;

#[derive(Clone, Debug, ThisError)]
pub enum RefError {
    #[error("Does not match as {ref_type}: {input}")]
    BadFormat {
        ref_type: &'static str,
        input: String,
    },
    #[error("Failed to parse coordinate: {0}")]
    Coordinate(#[from] ParseFloatError),
    #[error("Invalid url pattern {name}: {source}")]
    Pattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Stable actor/object identity: `tag:<domain>,<year>:<native id>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagUri {
    domain: String,
    name: String,
}

impl TagUri {
    pub fn new(domain: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
        }
    }

    pub fn from_string(string: String) -> Result<Self, RefError> {
        let caps = match Self::single_regex().captures(string.as_str()) {
            Some(caps) => caps,
            None => {
                return Err(RefError::BadFormat {
                    ref_type: "TagUri",
                    input: string,
                })
            }
        };
        Ok(Self::new(&caps["domain"], &caps["name"]))
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn single_regex() -> &'static Regex {
        lazy_static! {
            static ref RE: Regex =
                Regex::new(r"^tag:(?P<domain>[^,:]+),(?P<year>\d{4}):(?P<name>.+)$").unwrap();
        }
        &RE
    }

    pub fn is_match(string: &str) -> bool {
        Self::single_regex().is_match(string)
    }

    /// Native id behind `id` when it is a tag URI minted for `domain`.
    pub fn native_id(id: &str, domain: &str) -> Option<String> {
        let tag = Self::from_string(id.to_string()).ok()?;
        if tag.domain.eq_ignore_ascii_case(domain) {
            Some(tag.name)
        } else {
            None
        }
    }
}

impl fmt::Display for TagUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag:{},{}:{}", self.domain, TAG_URI_YEAR, self.name)
    }
}

impl TryFrom<String> for TagUri {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TagUri::from_string(value)
    }
}

impl From<TagUri> for String {
    fn from(value: TagUri) -> String {
        value.to_string()
    }
}

/// `geo:` URI, RFC 5870. Only the coordinates are kept.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoUri {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoUri {
    pub fn single_regex() -> &'static Regex {
        lazy_static! {
            static ref RE: Regex = Regex::new(
                r"^geo:(?P<lat>[-+]?[0-9]+(?:\.[0-9]+)?),(?P<long>[-+]?[0-9]+(?:\.[0-9]+)?)(?:[,;].*)?$"
            )
            .unwrap();
        }
        &RE
    }

    pub fn is_match(string: &str) -> bool {
        Self::single_regex().is_match(string)
    }
}

impl FromStr for GeoUri {
    type Err = RefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = Self::single_regex()
            .captures(s)
            .ok_or_else(|| RefError::BadFormat {
                ref_type: "GeoUri",
                input: s.to_string(),
            })?;
        Ok(GeoUri {
            latitude: caps["lat"].parse()?,
            longitude: caps["long"].parse()?,
        })
    }
}

/// True for absolute http(s) URLs, the only kind we treat as links.
pub fn is_web_url(string: &str) -> bool {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^https?://[^\s]+$").unwrap();
    }
    RE.is_match(string.trim())
}

/// Host of `link` without a leading `www.`.
pub fn domain_from_link(link: &str) -> Option<String> {
    let parsed = Url::parse(link)
        .or_else(|_| Url::parse(&format!("http://{}", link)))
        .ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_lowercase())
}
