//! Defines the token audiences that scope bearer credentials to one DTN API.

use std::fmt;

/// The OAuth resource a bearer token is issued for.
///
/// The observations API and the conditions (forecast) API each require a token
/// minted for their own audience; a token for one is rejected by the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Audience {
    /// Historical point observations (`obs.api.dtn.com`).
    Observations,
    /// Forecast conditions (`weather.api.dtn.com/v2/conditions`).
    Conditions,
}

impl Audience {
    /// The resource identifier sent as `audience` in the client-credentials request.
    pub fn identifier(&self) -> &'static str {
        match self {
            Audience::Observations => "https://weather.api.dtn.com/observations",
            Audience::Conditions => "https://weather.api.dtn.com/conditions",
        }
    }

    pub(crate) fn short_name(&self) -> &'static str {
        match self {
            Audience::Observations => "observations",
            Audience::Conditions => "conditions",
        }
    }
}

/// Formats an `Audience` using its short name.
///
/// # Examples
///
/// ```
/// use oneobs::Audience;
///
/// assert_eq!(Audience::Conditions.to_string(), "conditions");
/// ```
impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}
