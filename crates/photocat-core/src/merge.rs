//! Annotation Merger: writes subjects and locations into the photo-request
//! template.

use crate::catalog::ANNOTATION_NAME;
use crate::wikitext::{Template, TemplateRef, Wikicode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Nothing to write and nothing to remove.
    Untouched,
    Updated,
    /// Banner flags cover the request; the annotation was deleted.
    Removed,
    /// The handle does not point at a template.
    NoTarget,
}

/// Name of the n-th (1-based) location parameter: `in`, `in2`, `in3`, ...
pub fn location_param(n: usize) -> String {
    if n <= 1 {
        "in".to_string()
    } else {
        format!("in{n}")
    }
}

pub fn merge_annotation(
    doc: &mut Wikicode,
    target: &TemplateRef,
    subjects: &[String],
    locations: &[String],
    mutated_banners: bool,
) -> MergeOutcome {
    let Some(template) = doc.template_mut(target) else {
        return MergeOutcome::NoTarget;
    };

    let mut outcome = MergeOutcome::Untouched;
    if !subjects.is_empty() || !locations.is_empty() {
        write_signals(template, subjects, locations);
        outcome = MergeOutcome::Updated;
    }

    if mutated_banners && !template.has("1") && !template.has("in") && !template.has("of") {
        doc.remove_template(target);
        return MergeOutcome::Removed;
    }
    outcome
}

fn write_signals(template: &mut Template, subjects: &[String], locations: &[String]) {
    if !template.name_matches(ANNOTATION_NAME) {
        template.set_name(ANNOTATION_NAME);
    }

    // Blank slots are filled in place; later positionals keep their ordinals.
    for (i, subject) in subjects.iter().enumerate() {
        template.add(&(i + 1).to_string(), subject);
    }

    for (i, location) in locations.iter().enumerate() {
        template.add(&location_param(i + 1), location);
    }
}

/// Point the `in`/`inN` parameter naming `from` at `to` instead.
///
/// Returns false when no location parameter matches. Also renames the
/// template to its canonical spelling and drops empty positional slots.
pub fn retarget_location(template: &mut Template, from: &str, to: &str) -> bool {
    let from = from.trim();
    let Some(param) = template
        .params()
        .find(|(name, p)| {
            is_location_param(name) && p.value().to_string().trim().eq_ignore_ascii_case(from)
        })
        .map(|(name, _)| name)
    else {
        return false;
    };

    template.add(&param, to);
    if !template.name_matches(ANNOTATION_NAME) {
        template.set_name(ANNOTATION_NAME);
    }
    template.remove_blank_positionals();
    true
}

fn is_location_param(name: &str) -> bool {
    name.strip_prefix("in")
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn merge(text: &str, subjects: &[&str], locations: &[&str], mutated: bool) -> (String, MergeOutcome) {
        let mut doc = Wikicode::parse(text).unwrap();
        let target = doc
            .templates()
            .into_iter()
            .find(|(_, t)| t.name_matches("image requested") || t.name_matches("reqphoto"))
            .map(|(handle, _)| handle)
            .unwrap();
        let outcome = merge_annotation(&mut doc, &target, &strings(subjects), &strings(locations), mutated);
        (doc.to_string(), outcome)
    }

    #[test]
    fn writes_subjects_and_locations() {
        let (text, outcome) = merge(
            "{{image requested}}",
            &["ships"],
            &["Seattle, Washington"],
            false,
        );
        assert_eq!(text, "{{image requested|ships|in=Seattle, Washington}}");
        assert_eq!(outcome, MergeOutcome::Updated);
    }

    #[test]
    fn locations_are_numbered() {
        let (text, _) = merge("{{image requested}}", &[], &["Ohio", "Texas", "Utah"], false);
        assert_eq!(text, "{{image requested|in=Ohio|in2=Texas|in3=Utah}}");
    }

    #[test]
    fn renames_redirect_spelling() {
        let (text, _) = merge("{{reqphoto}}", &["music"], &[], false);
        assert_eq!(text, "{{image requested|music}}");
    }

    #[test]
    fn empty_slot_is_filled_in_place() {
        let (text, _) = merge("{{image requested||date=May 2010}}", &["ships"], &[], false);
        assert_eq!(text, "{{image requested|ships|date=May 2010}}");
    }

    #[test]
    fn later_positionals_survive_a_blank_first_slot() {
        let (text, _) = merge("{{reqphoto||Lighthouse keeper}}", &["ships"], &[], false);
        assert_eq!(text, "{{image requested|ships|Lighthouse keeper}}");
    }

    #[test]
    fn explicit_slot_keeps_its_position() {
        let (text, _) = merge("{{image requested|1=|date=May 2010}}", &["ships"], &[], false);
        assert_eq!(text, "{{image requested|1=ships|date=May 2010}}");
    }

    #[test]
    fn removed_when_banners_cover_the_request() {
        let (text, outcome) = merge("{{WikiProject Birds|needs-photo=yes}}\n{{reqphoto}}\n", &[], &[], true);
        assert_eq!(text, "{{WikiProject Birds|needs-photo=yes}}\n\n");
        assert_eq!(outcome, MergeOutcome::Removed);
    }

    #[test]
    fn kept_when_of_parameter_remains() {
        let (text, outcome) = merge("{{reqphoto|of=the lighthouse}}", &[], &[], true);
        assert_eq!(text, "{{reqphoto|of=the lighthouse}}");
        assert_eq!(outcome, MergeOutcome::Untouched);
    }

    #[test]
    fn kept_when_signals_were_written() {
        let (text, outcome) = merge("{{reqphoto}}", &[], &["Ohio"], true);
        assert_eq!(text, "{{image requested|in=Ohio}}");
        assert_eq!(outcome, MergeOutcome::Updated);
    }

    #[test]
    fn nothing_to_do_leaves_document_alone() {
        let (text, outcome) = merge("{{reqphoto|date=2010}}", &[], &[], false);
        assert_eq!(text, "{{reqphoto|date=2010}}");
        assert_eq!(outcome, MergeOutcome::Untouched);
    }

    #[test]
    fn stale_handle_reports_no_target() {
        let mut doc = Wikicode::parse("{{image requested}}").unwrap();
        let handle = doc.templates()[0].0.clone();
        doc.remove_template(&handle);
        let outcome = merge_annotation(&mut doc, &handle, &strings(&["ships"]), &[], false);
        assert_eq!(outcome, MergeOutcome::NoTarget);
    }

    #[test]
    fn location_param_names() {
        assert_eq!(location_param(1), "in");
        assert_eq!(location_param(2), "in2");
        assert_eq!(location_param(10), "in10");
    }

    #[test]
    fn retarget_replaces_state_with_county() {
        let mut doc = Wikicode::parse("{{reqphoto||in=texas}}").unwrap();
        let handle = doc.templates()[0].0.clone();
        let template = doc.template_mut(&handle).unwrap();
        assert!(retarget_location(template, "Texas", "Travis County, Texas"));
        assert_eq!(doc.to_string(), "{{image requested|in=Travis County, Texas}}");
    }

    #[test]
    fn retarget_matches_numbered_locations() {
        let mut doc = Wikicode::parse("{{image requested|in=Ohio|in2=Texas}}").unwrap();
        let handle = doc.templates()[0].0.clone();
        let template = doc.template_mut(&handle).unwrap();
        assert!(retarget_location(template, "Texas", "Bexar County, Texas"));
        assert_eq!(
            doc.to_string(),
            "{{image requested|in=Ohio|in2=Bexar County, Texas}}"
        );
    }

    #[test]
    fn retarget_without_match_is_false() {
        let mut doc = Wikicode::parse("{{image requested|in=Ohio}}").unwrap();
        let handle = doc.templates()[0].0.clone();
        let template = doc.template_mut(&handle).unwrap();
        assert!(!retarget_location(template, "Texas", "Travis County, Texas"));
        assert_eq!(doc.to_string(), "{{image requested|in=Ohio}}");
    }
}
