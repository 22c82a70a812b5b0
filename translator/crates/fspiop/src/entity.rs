//! FSPIOP resource categories addressed by callbacks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level FSPIOP resource a callback URL is rooted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityCategory {
    /// `/parties` resource (account lookup).
    Parties,
    /// `/participants` resource (oracle associations).
    Participants,
    /// `/quotes` resource.
    Quotes,
    /// `/bulkQuotes` resource.
    BulkQuotes,
    /// `/transfers` resource.
    Transfers,
    /// `/bulkTransfers` resource.
    BulkTransfers,
}

/// Raised when a string does not name a known resource category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown FSPIOP resource category: {value}")]
pub struct UnknownEntityCategory {
    /// The rejected input.
    pub value: String,
}

impl EntityCategory {
    /// Every category, in API declaration order.
    pub const ALL: [Self; 6] = [
        Self::Parties,
        Self::Participants,
        Self::Quotes,
        Self::BulkQuotes,
        Self::Transfers,
        Self::BulkTransfers,
    ];

    /// Path segment used in callback URLs.
    ///
    /// # Examples
    /// ```
    /// use fspiop::EntityCategory;
    ///
    /// assert_eq!(EntityCategory::BulkQuotes.as_path(), "bulkQuotes");
    /// ```
    #[must_use]
    pub const fn as_path(self) -> &'static str {
        match self {
            Self::Parties => "parties",
            Self::Participants => "participants",
            Self::Quotes => "quotes",
            Self::BulkQuotes => "bulkQuotes",
            Self::Transfers => "transfers",
            Self::BulkTransfers => "bulkTransfers",
        }
    }

    /// Versioned `content-type` value identifying this resource.
    ///
    /// # Examples
    /// ```
    /// use fspiop::EntityCategory;
    ///
    /// assert_eq!(
    ///     EntityCategory::Quotes.content_type("1.1"),
    ///     "application/vnd.interoperability.quotes+json;version=1.1"
    /// );
    /// ```
    #[must_use]
    pub fn content_type(self, version: &str) -> String {
        format!(
            "application/vnd.interoperability.{}+json;version={version}",
            self.as_path()
        )
    }

    /// Recover the resource category from a versioned `content-type` value.
    ///
    /// Returns `None` for non-FSPIOP media types.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let rest = content_type
            .trim()
            .strip_prefix("application/vnd.interoperability.")?;
        let resource = rest.split('+').next()?;
        resource.parse().ok()
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for EntityCategory {
    type Err = UnknownEntityCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_path() == value)
            .ok_or_else(|| UnknownEntityCategory {
                value: value.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("application/vnd.interoperability.parties+json;version=1.1", Some(EntityCategory::Parties))]
    #[case("application/vnd.interoperability.bulkTransfers+json;version=2.0", Some(EntityCategory::BulkTransfers))]
    #[case("application/json", None)]
    #[case("application/vnd.interoperability.settlements+json;version=1.1", None)]
    fn content_type_round_trips_to_category(
        #[case] content_type: &str,
        #[case] expected: Option<EntityCategory>,
    ) {
        assert_eq!(EntityCategory::from_content_type(content_type), expected);
    }

    #[rstest]
    fn every_category_parses_from_its_path() {
        for category in EntityCategory::ALL {
            assert_eq!(category.as_path().parse::<EntityCategory>(), Ok(category));
        }
    }
}
