use crate::ports::ComputedStyle;

/// Coarse rendered-visibility check: display, visibility and opacity are
/// compared against their literal hiding values. Opacity is a string
/// compare against "0" on purpose, so an element at opacity 0.01 counts
/// as visible.
pub fn is_visible(style: &ComputedStyle) -> bool {
    style.display != "none" && style.visibility != "hidden" && style.opacity != "0"
}
