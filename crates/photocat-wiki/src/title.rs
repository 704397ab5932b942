//! Switching between an article and its talk page.

/// Subject namespaces that have a "<Name> talk:" counterpart.
const NAMESPACES: &[&str] = &[
    "User",
    "Wikipedia",
    "File",
    "MediaWiki",
    "Template",
    "Help",
    "Category",
    "Portal",
    "Draft",
];

/// Split a title into a known namespace and the rest.
fn split_namespace(title: &str) -> (Option<&str>, &str) {
    match title.split_once(':') {
        Some((ns, rest)) if ns == "Talk" || NAMESPACES.contains(&ns) => (Some(ns), rest),
        Some((ns, rest)) => match ns.strip_suffix(" talk") {
            Some(subject) if NAMESPACES.contains(&subject) => (Some(ns), rest),
            _ => (None, title),
        },
        None => (None, title),
    }
}

pub fn is_talk(title: &str) -> bool {
    match split_namespace(title.trim()) {
        (Some(ns), _) => ns == "Talk" || ns.ends_with(" talk"),
        (None, _) => false,
    }
}

/// Talk page of a subject page; talk pages map to themselves.
pub fn talk_title(title: &str) -> String {
    let title = title.trim();
    if is_talk(title) {
        return title.to_string();
    }
    match split_namespace(title) {
        (Some(ns), rest) => format!("{ns} talk:{rest}"),
        (None, rest) => format!("Talk:{rest}"),
    }
}

/// Subject page of a talk page; subject pages map to themselves.
pub fn subject_title(title: &str) -> String {
    let title = title.trim();
    match split_namespace(title) {
        (Some("Talk"), rest) => rest.to_string(),
        (Some(ns), rest) => match ns.strip_suffix(" talk") {
            Some(subject) => format!("{subject}:{rest}"),
            None => title.to_string(),
        },
        (None, _) => title.to_string(),
    }
}
