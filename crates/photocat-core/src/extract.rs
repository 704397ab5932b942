//! Template Signal Extractor.
//!
//! Reads every banner on a talk page once and reports what it implies. The
//! document is never mutated here; banners that carry their own
//! photo-request flag come back as [`BannerEdit`] commands.

use tracing::debug;

use crate::catalog;
use crate::pipeline::PipelineConfig;
use crate::resolve::{CanonicalResolver, ResolveError, is_parser_function, template_title};
use crate::wikitext::{Template, TemplateRef, Wikicode};

/// Signals gathered from one talk page, in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signals {
    pub subjects: Vec<String>,
    pub locations: Vec<String>,
    pub banner_edits: Vec<BannerEdit>,
}

impl Signals {
    /// True when at least one banner will have its own flag set.
    pub fn mutated_banners(&self) -> bool {
        !self.banner_edits.is_empty()
    }

    fn push_subject(&mut self, subject: &str) {
        push_unique(&mut self.subjects, subject);
    }

    fn push_location(&mut self, location: &str) {
        push_unique(&mut self.locations, location);
    }
}

/// Set `param` on the banner at `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerEdit {
    pub target: TemplateRef,
    pub param: String,
    pub value: String,
}

impl BannerEdit {
    /// Apply the edit. Returns false if the handle no longer points at a
    /// template.
    pub fn apply(&self, doc: &mut Wikicode) -> bool {
        match doc.template_mut(&self.target) {
            Some(template) => {
                template.add(&self.param, &self.value);
                true
            }
            None => false,
        }
    }
}

pub fn extract_signals<R>(
    doc: &Wikicode,
    resolver: &R,
    config: &PipelineConfig,
) -> Result<Signals, ResolveError>
where
    R: CanonicalResolver + ?Sized,
{
    let mut signals = Signals::default();

    for (handle, template) in doc.templates() {
        let written = template.name();
        if is_parser_function(&written) {
            continue;
        }
        let canonical = resolver.resolve(&template_title(&written))?;
        let name = catalog::bare_title(&canonical);

        let before = (signals.subjects.len(), signals.locations.len());
        classify(name, template, &mut signals);

        if let Some(param) = catalog::custom_param_for(name) {
            signals.banner_edits.push(BannerEdit {
                target: handle,
                param: param.to_string(),
                value: catalog::AFFIRMATIVE.to_string(),
            });
        }

        if config.debug {
            debug!(
                template = %written,
                canonical = %canonical,
                subjects = signals.subjects.len() - before.0,
                locations = signals.locations.len() - before.1,
                "classified banner"
            );
        }
    }

    Ok(signals)
}

/// Subject and location signals carried by one banner.
fn classify(name: &str, template: &Template, signals: &mut Signals) {
    if let Some(region) = catalog::region_in_name(name) {
        signals.push_location(region);
    }

    if name == catalog::US_ROADS_BANNER {
        for (param, value) in template.params() {
            if !is_state_param(&param) {
                continue;
            }
            if let Some(state) = catalog::state_for_code(&value.value().to_string()) {
                signals.push_location(state);
            }
        }
    }

    if let Some(location) = catalog::location_for(name) {
        signals.push_location(location);
    }

    if name == catalog::UNITED_STATES_BANNER {
        let mut found = false;
        for (param, _) in template.params() {
            if let Some(place) = catalog::united_states_param(&param) {
                signals.push_location(place);
                found = true;
            }
        }
        if !found {
            signals.push_location(catalog::UNITED_STATES_DEFAULT);
        }
    }

    if let Some(subject) = catalog::subject_for(name) {
        signals.push_subject(subject);
    }
}

/// `state`, `state1`, `state2`, ...
fn is_state_param(name: &str) -> bool {
    name.strip_prefix("state")
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
