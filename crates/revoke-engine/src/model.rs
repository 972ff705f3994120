use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::compute_expiry;
use crate::errors::RuleError;

/// The three rule families offered by the dashboard. Names serialize
/// exactly as the dashboard's template literals.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RuleTemplate {
    #[serde(rename = "Time-based")]
    TimeBased,
    #[serde(rename = "Visit-based")]
    VisitBased,
    #[serde(rename = "Inactivity")]
    Inactivity,
}

impl RuleTemplate {
    /// The discrete value literals a template accepts. Anything outside
    /// this set is rejected before a rule is stored.
    pub fn options(&self) -> &'static [&'static str] {
        match self {
            RuleTemplate::TimeBased => &[
                "1 day", "1 week", "1 month", "3 months", "6 months", "1 year",
            ],
            RuleTemplate::VisitBased => &["5 visits", "10 visits", "20 visits", "50 visits"],
            RuleTemplate::Inactivity => &["30 days", "60 days", "90 days", "180 days"],
        }
    }

    pub fn accepts(&self, value: &str) -> bool {
        self.options().contains(&value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleTemplate::TimeBased => "Time-based",
            RuleTemplate::VisitBased => "Visit-based",
            RuleTemplate::Inactivity => "Inactivity",
        }
    }
}

impl std::str::FromStr for RuleTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Time-based" => Ok(RuleTemplate::TimeBased),
            "Visit-based" => Ok(RuleTemplate::VisitBased),
            "Inactivity" => Ok(RuleTemplate::Inactivity),
            other => Err(format!("unknown rule template: {other}")),
        }
    }
}

/// A rule attached to one consent row. `computed_expiry` is present only
/// for time-based rules; visit-based and inactivity rules need counters
/// the extension does not maintain yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(rename = "type")]
    pub template: RuleTemplate,
    pub value: String,
    #[serde(rename = "expiryDate", skip_serializing_if = "Option::is_none")]
    pub computed_expiry: Option<DateTime<Utc>>,
}

impl RuleSpec {
    /// Builds a spec whose expiry matches the engine's computation for
    /// `now`. This is the only constructor, so a stored rule can never
    /// disagree with its expiry date.
    pub fn attach(
        template: RuleTemplate,
        value: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, RuleError> {
        let value = value.into();
        let computed_expiry = compute_expiry(template, &value, now)?;
        Ok(Self {
            template,
            value,
            computed_expiry,
        })
    }
}
