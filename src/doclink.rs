//! Documentation reference links.
//!
//! Combines the name normalizer's slug with the profile selection: core
//! functions link into the current-profile reference pages, deprecated
//! functions into the compatibility-profile pages with an unavailability
//! note appended.

use crate::normalize;

const DOCS_BASE: &str = "http://docs.gl";
const DEPRECATED_NOTE: &str = "This function is deprecated and unavailable in the Core profile";

/// Reference page URL for a raw function name.
pub fn build_link(raw_name: &str, deprecated: bool) -> String {
    let page = normalize::normalize(raw_name);
    let profile = if deprecated { "gl3" } else { "gl4" };
    format!("{DOCS_BASE}/{profile}/{page}")
}

/// The full reference line injected into documentation comments.
pub fn reference_line(raw_name: &str, deprecated: bool) -> String {
    let link = format!("[Reference Page]({})", build_link(raw_name, deprecated));
    if deprecated {
        format!("{link} - *{DEPRECATED_NOTE}*")
    } else {
        link
    }
}

/// Merge the reference into existing documentation text.
///
/// Empty documentation becomes the reference line alone. Otherwise the
/// existing text is preserved exactly — including its line structure — and
/// the reference is appended as a trailing paragraph, so single-line
/// documentation necessarily becomes multi-line.
pub fn inject(documentation: &str, raw_name: &str, deprecated: bool) -> String {
    let reference = reference_line(raw_name, deprecated);
    if documentation.is_empty() {
        return reference;
    }
    format!("{documentation}\n\nSee the {reference}")
}
