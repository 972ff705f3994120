/// The fixed selector families and intent vocabularies. These are literal
/// sets with no configuration surface; widening them is a product call,
/// not a tuning knob.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector {
    /// Matches any element whose class list contains the substring.
    ClassContains(&'static str),
    /// Matches any element whose id contains the substring.
    IdContains(&'static str),
    /// Matches anchor elements whose href contains the substring.
    AnchorHrefContains(&'static str),
}

pub const COOKIE_BANNER_FAMILY: &[Selector] = &[
    Selector::ClassContains("cookie"),
    Selector::ClassContains("consent"),
    Selector::ClassContains("gdpr"),
    Selector::IdContains("cookie"),
    Selector::IdContains("consent"),
    Selector::IdContains("gdpr"),
];

pub const PRIVACY_POLICY_FAMILY: &[Selector] = &[
    Selector::AnchorHrefContains("privacy"),
    Selector::AnchorHrefContains("datenschutz"),
    Selector::AnchorHrefContains("gdpr"),
    Selector::ClassContains("privacy-policy"),
];

/// Class/id substrings that make an element (or an ancestor) a banner.
pub const BANNER_VOCAB: &[&str] = &["cookie", "consent", "gdpr"];

/// Href substrings that make an anchor a policy reference.
pub const POLICY_HREF_VOCAB: &[&str] = &["privacy", "datenschutz", "gdpr"];

/// Class substring that makes any element a policy reference.
pub const POLICY_CLASS_MARK: &str = "privacy-policy";

pub const ACCEPT_VOCAB: &[&str] = &["accept", "allow", "agree", "ok", "yes"];
pub const REJECT_VOCAB: &[&str] = &["reject", "decline", "deny", "no"];
pub const CUSTOMIZE_VOCAB: &[&str] = &["customize", "settings", "preferences", "more"];
