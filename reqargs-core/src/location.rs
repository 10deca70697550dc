//! Argument locations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The place in a request an argument value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// URI query string.
    #[serde(alias = "querystring")]
    Query,
    /// Urlencoded form body.
    Form,
    /// JSON body.
    Json,
    /// Request headers.
    Headers,
    /// Cookies sent in the `Cookie` header.
    Cookies,
    /// Parameters captured by the route pattern.
    MatchInfo,
    /// Uploaded files. Recognized, never supported.
    Files,
}

impl Location {
    /// Lookup order for fields without an explicit location.
    pub const DEFAULT_ORDER: [Location; 3] = [Location::Query, Location::Form, Location::Json];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Query => "query",
            Location::Form => "form",
            Location::Json => "json",
            Location::Headers => "headers",
            Location::Cookies => "cookies",
            Location::MatchInfo => "match_info",
            Location::Files => "files",
        }
    }

    /// Whether reading this location consumes the request body.
    pub fn reads_body(&self) -> bool {
        matches!(self, Location::Form | Location::Json | Location::Files)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown location name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown argument location `{0}`")]
pub struct UnknownLocation(pub String);

impl FromStr for Location {
    type Err = UnknownLocation;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "query" | "querystring" => Ok(Location::Query),
            "form" => Ok(Location::Form),
            "json" => Ok(Location::Json),
            "headers" => Ok(Location::Headers),
            "cookies" => Ok(Location::Cookies),
            "match_info" => Ok(Location::MatchInfo),
            "files" => Ok(Location::Files),
            other => Err(UnknownLocation(other.to_owned())),
        }
    }
}
