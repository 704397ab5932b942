//! Shared per-page machinery: the page loop, saving, and redirect lookup.

use std::future::Future;
use std::pin::pin;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::TryStreamExt;
use photocat_core::resolve::{is_parser_function, template_title};
use photocat_core::{PipelineConfig, TableResolver, Wikicode};
use photocat_wiki::{WikiClient, WikiError};
use tracing::{debug, error, info, warn};

pub struct Bot {
    pub client: WikiClient,
    pub config: PipelineConfig,
    edit_delay: Duration,
}

/// Per-run counters, logged when the run ends.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: usize,
    pub saved: usize,
    pub failed: usize,
}

impl Bot {
    pub fn new(client: WikiClient, config: PipelineConfig, edit_delay: Duration) -> Self {
        Self {
            client,
            config,
            edit_delay,
        }
    }

    /// Run `handle` over the given titles, or over the category when none
    /// are given.
    ///
    /// `handle` returns whether it saved an edit; the edit delay follows each
    /// save. A failing page is logged and skipped unless its error is fatal.
    pub async fn for_each_page<F, Fut>(
        &self,
        category: &str,
        titles: &[String],
        mut handle: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let mut summary = RunSummary::default();

        if titles.is_empty() {
            info!(category, "walking category");
            let mut members = pin!(self.client.category_members(category));
            while let Some(title) = members
                .try_next()
                .await
                .with_context(|| format!("listing {category}"))?
            {
                self.visit(&mut handle, title, &mut summary).await?;
            }
        } else {
            for title in titles {
                self.visit(&mut handle, title.clone(), &mut summary).await?;
            }
        }

        info!(
            pages = summary.pages,
            saved = summary.saved,
            failed = summary.failed,
            "run complete"
        );
        Ok(summary)
    }

    async fn visit<F, Fut>(&self, handle: &mut F, title: String, summary: &mut RunSummary) -> Result<()>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        summary.pages += 1;
        match handle(title.clone()).await {
            Ok(true) => {
                summary.saved += 1;
                tokio::time::sleep(self.edit_delay).await;
            }
            Ok(false) => {}
            Err(err) => {
                if err.downcast_ref::<WikiError>().is_some_and(WikiError::is_fatal) {
                    return Err(err.context(format!("aborting run at {title}")));
                }
                summary.failed += 1;
                let message = format!("{err:#}");
                error!(title = %title, error = %message, outcome = "error", "page failed");
            }
        }
        Ok(())
    }

    /// Save a page. Returns false when nothing was written: in debug mode,
    /// or when the page is locked.
    pub async fn save(&self, title: &str, text: &str, summary: &str) -> Result<bool> {
        if self.config.debug {
            info!(title, "debug mode, not saving");
            debug!(title, summary, text, "proposed text");
            return Ok(false);
        }
        match self.client.save_page_text(title, text, summary).await {
            Ok(()) => Ok(true),
            Err(WikiError::Locked { reason, .. }) => {
                warn!(title, reason = %reason, outcome = "locked", "page is locked, skipping");
                Ok(false)
            }
            Err(err) => Err(err).with_context(|| format!("saving {title}")),
        }
    }

    /// Redirect table for every template on the page, fetched fresh.
    pub async fn resolver_for(&self, doc: &Wikicode) -> Result<TableResolver> {
        let mut names: Vec<String> = doc
            .templates()
            .iter()
            .map(|(_, t)| t.name())
            .filter(|name| !is_parser_function(name))
            .map(|name| template_title(&name))
            .collect();
        names.sort();
        names.dedup();
        let resolver = self
            .client
            .resolve_titles(&names)
            .await
            .context("resolving template redirects")?;
        Ok(resolver)
    }
}
