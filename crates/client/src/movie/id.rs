//! Movie identifier shapes.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use beacon_core::Error;

static IMDB_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^tt\d+$").expect("invalid regex"));
static DOUBAN_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").expect("invalid regex"));

/// A validated movie identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieId {
    /// `tt` followed by digits.
    Imdb(String),
    /// Purely numeric Douban subject id.
    Douban(String),
}

impl MovieId {
    /// Parse an identifier, failing fast on anything that is neither shape.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let id = input.trim();
        if IMDB_ID.is_match(id) {
            Ok(MovieId::Imdb(id.to_string()))
        } else if DOUBAN_ID.is_match(id) {
            Ok(MovieId::Douban(id.to_string()))
        } else {
            Err(Error::InvalidIdentifier(input.to_string()))
        }
    }

    /// Parse an identifier that must be an IMDb id.
    pub fn parse_imdb(input: &str) -> Result<Self, Error> {
        match Self::parse(input)? {
            id @ MovieId::Imdb(_) => Ok(id),
            MovieId::Douban(_) => Err(Error::InvalidIdentifier(format!("not an IMDb id: {input}"))),
        }
    }

    /// Parse an identifier that must be a Douban id.
    pub fn parse_douban(input: &str) -> Result<Self, Error> {
        match Self::parse(input)? {
            id @ MovieId::Douban(_) => Ok(id),
            MovieId::Imdb(_) => Err(Error::InvalidIdentifier(format!("not a Douban id: {input}"))),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MovieId::Imdb(id) | MovieId::Douban(id) => id,
        }
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
