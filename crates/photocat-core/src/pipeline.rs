//! Per-page pipelines: extractor, deduplicator and merger for the category
//! fixer, and the county retarget for the county bot.

use std::fmt;

use tracing::debug;

use crate::catalog::ANNOTATION_TITLE;
use crate::dedup::dedupe_locations;
use crate::error::CoreError;
use crate::extract::extract_signals;
use crate::merge::{MergeOutcome, merge_annotation, retarget_location};
use crate::resolve::{CanonicalResolver, ResolveError, is_parser_function, template_title};
use crate::wikitext::{TemplateRef, Wikicode};

/// Settings threaded through every pipeline call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Trace every banner classification.
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No photo-request template on the page.
    NoAnnotation,
    /// No photo-request template names the location being retargeted.
    NoMatchingLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Unchanged,
    Modified,
    /// The rewrite left nothing on the page; such text is never saved.
    Emptied,
    Skipped(SkipReason),
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageOutcome::Unchanged => f.write_str("unchanged"),
            PageOutcome::Modified => f.write_str("modified"),
            PageOutcome::Emptied => f.write_str("emptied"),
            PageOutcome::Skipped(SkipReason::NoAnnotation) => f.write_str("skipped (no photo request)"),
            PageOutcome::Skipped(SkipReason::NoMatchingLocation) => {
                f.write_str("skipped (no matching location)")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalkPageUpdate {
    pub outcome: PageOutcome,
    /// Replacement text; present only for [`PageOutcome::Modified`].
    pub new_text: Option<String>,
}

impl TalkPageUpdate {
    fn settled(outcome: PageOutcome) -> Self {
        Self {
            outcome,
            new_text: None,
        }
    }

    fn compare(before: &str, after: String) -> Self {
        if after.trim().is_empty() {
            Self::settled(PageOutcome::Emptied)
        } else if after == before {
            Self::settled(PageOutcome::Unchanged)
        } else {
            Self {
                outcome: PageOutcome::Modified,
                new_text: Some(after),
            }
        }
    }

    /// True when there is new text to save.
    pub fn changed(&self) -> bool {
        self.outcome == PageOutcome::Modified
    }
}

/// Consolidate the banners on a talk page into its photo-request template.
///
/// Only the first photo-request template is treated as the target. A target
/// that already names a subject or location is left as it is, which makes a
/// second run over the output a no-op.
pub fn process_talk_page<R>(
    mut doc: Wikicode,
    resolver: &R,
    config: &PipelineConfig,
) -> Result<TalkPageUpdate, CoreError>
where
    R: CanonicalResolver + ?Sized,
{
    let before = doc.to_string();

    let Some(target) = annotations(&doc, resolver)?.into_iter().next() else {
        return Ok(TalkPageUpdate::settled(PageOutcome::Skipped(SkipReason::NoAnnotation)));
    };
    if doc
        .template(&target)
        .is_some_and(|t| t.has_value("1") || t.has_value("in"))
    {
        return Ok(TalkPageUpdate::settled(PageOutcome::Unchanged));
    }

    let signals = extract_signals(&doc, resolver, config)?;
    for edit in &signals.banner_edits {
        edit.apply(&mut doc);
    }
    let locations = dedupe_locations(&signals.locations);

    let merged = merge_annotation(
        &mut doc,
        &target,
        &signals.subjects,
        &locations,
        signals.mutated_banners(),
    );
    if config.debug {
        debug!(
            subjects = ?signals.subjects,
            locations = ?locations,
            banner_edits = signals.banner_edits.len(),
            merge = ?merged,
            "merged photo request"
        );
    }
    if merged == MergeOutcome::NoTarget {
        return Ok(TalkPageUpdate::settled(PageOutcome::Skipped(SkipReason::NoAnnotation)));
    }

    Ok(TalkPageUpdate::compare(&before, doc.to_string()))
}

/// Replace `state` with `county` in the first photo-request template that
/// names it as a location.
pub fn retarget_county<R>(
    mut doc: Wikicode,
    resolver: &R,
    state: &str,
    county: &str,
) -> Result<TalkPageUpdate, CoreError>
where
    R: CanonicalResolver + ?Sized,
{
    let before = doc.to_string();
    let targets = annotations(&doc, resolver)?;
    if targets.is_empty() {
        return Ok(TalkPageUpdate::settled(PageOutcome::Skipped(SkipReason::NoAnnotation)));
    }

    let retargeted = targets.iter().any(|handle| {
        doc.template_mut(handle)
            .is_some_and(|t| retarget_location(t, state, county))
    });
    if !retargeted {
        return Ok(TalkPageUpdate::settled(PageOutcome::Skipped(
            SkipReason::NoMatchingLocation,
        )));
    }

    Ok(TalkPageUpdate::compare(&before, doc.to_string()))
}

/// Handles of every photo-request template, in document order.
fn annotations<R>(doc: &Wikicode, resolver: &R) -> Result<Vec<TemplateRef>, ResolveError>
where
    R: CanonicalResolver + ?Sized,
{
    let mut found = Vec::new();
    for (handle, template) in doc.templates() {
        let name = template.name();
        if is_parser_function(&name) {
            continue;
        }
        if resolver.resolve(&template_title(&name))? == ANNOTATION_TITLE {
            found.push(handle);
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::TableResolver;

    fn resolver() -> TableResolver {
        TableResolver::from_pairs([
            ("Template:Reqphoto", "Template:Image requested"),
            ("Template:Photo requested", "Template:Image requested"),
        ])
    }

    fn run(text: &str) -> TalkPageUpdate {
        let doc = Wikicode::parse(text).unwrap();
        process_talk_page(doc, &resolver(), &PipelineConfig::default()).unwrap()
    }

    #[test]
    fn fills_request_from_banners() {
        let update = run("{{WikiProject Ships}}\n{{WikiProject Texas}}\n{{reqphoto}}\n");
        assert!(update.changed());
        assert_eq!(
            update.new_text.as_deref(),
            Some("{{WikiProject Ships}}\n{{WikiProject Texas}}\n{{image requested|ships|in=Texas}}\n")
        );
    }

    #[test]
    fn page_without_request_is_skipped() {
        let update = run("{{WikiProject Ships}}\n");
        assert_eq!(update.outcome, PageOutcome::Skipped(SkipReason::NoAnnotation));
        assert!(!update.changed());
    }

    #[test]
    fn qualified_request_is_left_alone() {
        let update = run("{{WikiProject Ships}}\n{{reqphoto|in=Ohio}}\n");
        assert_eq!(update.outcome, PageOutcome::Unchanged);
        assert_eq!(update.new_text, None);
    }

    #[test]
    fn blank_qualifier_does_not_count() {
        let update = run("{{WikiProject Ships}}{{reqphoto|in=}}");
        assert_eq!(
            update.new_text.as_deref(),
            Some("{{WikiProject Ships}}{{image requested|in=|ships}}")
        );
    }

    #[test]
    fn blank_first_slot_keeps_later_positionals() {
        let update = run("{{WikiProject Ships}}{{reqphoto||Lighthouse keeper}}");
        assert_eq!(update.outcome, PageOutcome::Modified);
        assert_eq!(
            update.new_text.as_deref(),
            Some("{{WikiProject Ships}}{{image requested|ships|Lighthouse keeper}}")
        );
    }

    #[test]
    fn no_signals_is_unchanged() {
        let update = run("{{Talk header}}\n{{reqphoto}}\n");
        assert_eq!(update.outcome, PageOutcome::Unchanged);
    }

    #[test]
    fn banner_flag_replaces_generic_request() {
        let update = run("{{WikiProject Birds|class=Stub}}\n{{reqphoto}}");
        assert_eq!(update.outcome, PageOutcome::Modified);
        assert_eq!(
            update.new_text.as_deref(),
            Some("{{WikiProject Birds|class=Stub|needs-photo=yes}}\n")
        );
    }

    #[test]
    fn existing_banner_flag_still_removes_request() {
        let update = run("{{WikiProject Birds|needs-photo=yes}}{{reqphoto}}");
        assert_eq!(
            update.new_text.as_deref(),
            Some("{{WikiProject Birds|needs-photo=yes}}")
        );
    }

    #[test]
    fn blank_result_is_emptied() {
        let update = TalkPageUpdate::compare("{{reqphoto}}", " \n".to_string());
        assert_eq!(update.outcome, PageOutcome::Emptied);
        assert!(!update.changed());
    }

    #[test]
    fn first_request_is_the_target() {
        let update = run("{{WikiProject Ships}}{{reqphoto}}{{photo requested}}");
        assert_eq!(
            update.new_text.as_deref(),
            Some("{{WikiProject Ships}}{{image requested|ships}}{{photo requested}}")
        );
    }

    #[test]
    fn second_run_is_a_no_op() {
        let first = run("{{WikiProject Ships}}\n{{WikiProject Ohio}}\n{{reqphoto}}\n");
        let second = run(first.new_text.as_deref().unwrap());
        assert!(!second.changed());
    }

    #[test]
    fn retarget_county_rewrites_state_location() {
        let doc = Wikicode::parse("{{WikiProject Texas}}\n{{reqphoto||in=Texas}}\n").unwrap();
        let update = retarget_county(doc, &resolver(), "Texas", "Travis County, Texas").unwrap();
        assert_eq!(
            update.new_text.as_deref(),
            Some("{{WikiProject Texas}}\n{{image requested|in=Travis County, Texas}}\n")
        );
    }

    #[test]
    fn retarget_county_without_state_is_skipped() {
        let doc = Wikicode::parse("{{reqphoto|in=Ohio}}").unwrap();
        let update = retarget_county(doc, &resolver(), "Texas", "Travis County, Texas").unwrap();
        assert_eq!(
            update.outcome,
            PageOutcome::Skipped(SkipReason::NoMatchingLocation)
        );
    }

    #[test]
    fn invalid_template_title_is_an_error() {
        let doc = Wikicode::parse("{{a#b}}{{reqphoto}}").unwrap();
        let result = process_talk_page(doc, &resolver(), &PipelineConfig::default());
        assert!(matches!(result, Err(CoreError::Resolve(_))));
    }

    #[test]
    fn outcome_display() {
        assert_eq!(PageOutcome::Modified.to_string(), "modified");
        assert_eq!(
            PageOutcome::Skipped(SkipReason::NoAnnotation).to_string(),
            "skipped (no photo request)"
        );
    }
}
