//! Location Deduplicator.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::FEDERATIONS;

/// "Austin, Texas" names "Texas" as its parent.
static LOCALITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*, ([^,]*)$").expect("locality pattern is valid"));

/// Drop locations made redundant by a more specific one, keeping order.
///
/// A federation goes when one of its subdivisions is present; a bare parent
/// goes when some "X, parent" is present. Applying this twice changes
/// nothing further.
pub fn dedupe_locations(locations: &[String]) -> Vec<String> {
    let present: HashSet<&str> = locations.iter().map(String::as_str).collect();

    let collapsed: HashSet<&str> = FEDERATIONS
        .iter()
        .filter(|(federation, subdivisions)| {
            present.contains(federation) && subdivisions.iter().any(|s| present.contains(s))
        })
        .map(|(federation, _)| *federation)
        .collect();

    let parents: HashSet<&str> = locations
        .iter()
        .filter(|loc| !collapsed.contains(loc.as_str()))
        .filter_map(|loc| LOCALITY.captures(loc.as_str()))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();

    locations
        .iter()
        .filter(|loc| !collapsed.contains(loc.as_str()) && !parents.contains(loc.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dedupe(input: &[&str]) -> Vec<String> {
        let owned: Vec<String> = input.iter().map(|s| s.to_string()).collect();
        dedupe_locations(&owned)
    }

    #[test]
    fn federation_collapse() {
        assert_eq!(dedupe(&["Canada", "Ontario"]), vec!["Ontario"]);
        assert_eq!(dedupe(&["Queensland", "Australia"]), vec!["Queensland"]);
        assert_eq!(dedupe(&["Canada", "France"]), vec!["Canada", "France"]);
    }

    #[test]
    fn locality_collapse() {
        assert_eq!(dedupe(&["Texas", "Austin, Texas"]), vec!["Austin, Texas"]);
    }

    #[test]
    fn shared_parent_removed_once() {
        assert_eq!(
            dedupe(&["Ohio", "Cleveland, Ohio", "Youngstown, Ohio"]),
            vec!["Cleveland, Ohio", "Youngstown, Ohio"]
        );
    }

    #[test]
    fn parent_is_text_after_last_comma() {
        assert_eq!(
            dedupe(&["Middlesex County, Massachusetts", "Massachusetts", "Washington, D.C.", "Washington"]),
            vec!["Middlesex County, Massachusetts", "Washington, D.C.", "Washington"]
        );
    }

    #[test]
    fn subdivisions_are_never_removed_by_federation_rule() {
        assert_eq!(
            dedupe(&["Canada", "Ontario", "Quebec"]),
            vec!["Ontario", "Quebec"]
        );
    }

    #[test]
    fn idempotent() {
        let cases: &[&[&str]] = &[
            &["Canada", "Ontario", "Toronto, Ontario"],
            &["Australia", "Texas", "Austin, Texas", "Seattle, Washington"],
            &["the United States", "Washington, D.C.", "D.C."],
            &[],
        ];
        for case in cases {
            let once = dedupe(case);
            assert_eq!(dedupe_locations(&once), once);
        }
    }
}
