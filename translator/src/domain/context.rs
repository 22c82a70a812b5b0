//! Bounded contexts served by the translator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the switch's bounded contexts; each owns its event kinds and
/// error-mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundedContext {
    /// Party and participant lookups (`/parties`, `/participants`).
    AccountLookup,
    /// Quote negotiation (`/quotes`, `/bulkQuotes`).
    Quoting,
    /// Transfers (`/transfers`, `/bulkTransfers`).
    Transfers,
}

impl BoundedContext {
    /// All contexts in startup order.
    pub const ALL: [Self; 3] = [Self::AccountLookup, Self::Quoting, Self::Transfers];

    /// Configuration and log name of the context.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccountLookup => "account-lookup",
            Self::Quoting => "quoting",
            Self::Transfers => "transfers",
        }
    }
}

impl fmt::Display for BoundedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while wiring dispatchers at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WiringError {
    /// A configured bounded context has no translation rules.
    #[error("bounded context '{name}' is not handled by this translator")]
    UnhandledBoundedContext { name: String },
    /// No bounded context was configured.
    #[error("at least one bounded context must be configured")]
    NoBoundedContexts,
}

impl FromStr for BoundedContext {
    type Err = WiringError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalised = value.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|context| context.as_str() == normalised)
            .ok_or_else(|| WiringError::UnhandledBoundedContext {
                name: value.trim().to_owned(),
            })
    }
}

/// Parse a comma-separated list of bounded contexts, rejecting unknown
/// names and collapsing duplicates while keeping first-seen order.
///
/// # Examples
/// ```
/// use translator::domain::{parse_contexts, BoundedContext};
///
/// let contexts = parse_contexts("quoting, transfers,quoting")?;
/// assert_eq!(contexts, vec![BoundedContext::Quoting, BoundedContext::Transfers]);
/// # Ok::<(), translator::domain::WiringError>(())
/// ```
pub fn parse_contexts(list: &str) -> Result<Vec<BoundedContext>, WiringError> {
    let mut contexts = Vec::new();
    for name in list.split(',').filter(|name| !name.trim().is_empty()) {
        let context = name.parse::<BoundedContext>()?;
        if !contexts.contains(&context) {
            contexts.push(context);
        }
    }
    if contexts.is_empty() {
        return Err(WiringError::NoBoundedContexts);
    }
    Ok(contexts)
}
