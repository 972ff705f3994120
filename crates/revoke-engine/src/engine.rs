use chrono::{DateTime, Days, Months, Utc};
use tracing::debug;

use crate::errors::RuleError;
use crate::model::RuleTemplate;

/// Computes the concrete expiry instant for a rule from a reference time.
///
/// Time-based options use calendar-field arithmetic, not fixed durations:
/// adding a month to 2024-01-31 lands on 2024-02-29, following standard
/// month-end clamping. Visit-based and inactivity templates return
/// `Ok(None)` because the counters they need (page visits, last activity)
/// have no data source in the extension; the value literal is still
/// validated so a bad option never reaches the store.
pub fn compute_expiry(
    template: RuleTemplate,
    value: &str,
    reference: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, RuleError> {
    match template {
        RuleTemplate::TimeBased => {
            let expiry = match value {
                "1 day" => reference.checked_add_days(Days::new(1)),
                "1 week" => reference.checked_add_days(Days::new(7)),
                "1 month" => reference.checked_add_months(Months::new(1)),
                "3 months" => reference.checked_add_months(Months::new(3)),
                "6 months" => reference.checked_add_months(Months::new(6)),
                "1 year" => reference.checked_add_months(Months::new(12)),
                other => {
                    return Err(RuleError::UnknownOption {
                        template,
                        value: other.to_string(),
                    })
                }
            };
            let expiry = expiry.ok_or(RuleError::Overflow)?;
            debug!(
                target: "revoke.events",
                value,
                %reference,
                %expiry,
                "revoke.expiry.computed"
            );
            Ok(Some(expiry))
        }
        RuleTemplate::VisitBased | RuleTemplate::Inactivity => {
            if !template.accepts(value) {
                return Err(RuleError::UnknownOption {
                    template,
                    value: value.to_string(),
                });
            }
            debug!(
                target: "revoke.events",
                template = template.as_str(),
                value,
                "revoke.expiry.no_counter_source"
            );
            Ok(None)
        }
    }
}

/// Advisory expiry predicate. Evaluating it never mutates anything; a
/// record with no expiry date never expires on its own.
pub fn is_expired(expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match expiry {
        Some(at) => now >= at,
        None => false,
    }
}
