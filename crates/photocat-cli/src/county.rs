//! `photocat county`: move state-level photo requests into county
//! categories.

use std::path::Path;

use anyhow::{Context, Result};
use photocat_core::county::{category_page_text, requested_photos_category};
use photocat_core::{CountyMap, Wikicode, resolve_county, retarget_county};
use photocat_wiki::{subject_title, talk_title};
use tracing::{info, warn};

use crate::bot::Bot;

const CATEGORY_SUMMARY: &str = "new photo request category, by the [[User:PhotoCatBot|PhotoCat]]";

/// The built-in town table, extended from a JSON file when one is given.
pub fn load_map(path: Option<&Path>) -> Result<CountyMap> {
    let mut map = CountyMap::builtin();
    if let Some(path) = path {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading county map {}", path.display()))?;
        let extra = CountyMap::from_json(&json)
            .with_context(|| format!("parsing county map {}", path.display()))?;
        info!(path = %path.display(), entries = extra.len(), "loaded county map");
        map.extend(extra);
    }
    Ok(map)
}

pub async fn run(bot: &Bot, state: &str, map: &CountyMap, titles: &[String]) -> Result<()> {
    let category = requested_photos_category(state);
    bot.for_each_page(&category, titles, |title| reclassify(bot, state, map, title))
        .await?;
    Ok(())
}

fn edit_summary(county: &str) -> String {
    format!(
        "moving to [[{}]] by the [[User:PhotoCatBot|PhotoCat]]",
        requested_photos_category(county)
    )
}

async fn reclassify(bot: &Bot, state: &str, map: &CountyMap, title: String) -> Result<bool> {
    let article = subject_title(&title);
    let talk = talk_title(&title);

    let Some(text) = bot
        .client
        .fetch_page_text(&article)
        .await
        .with_context(|| format!("fetching {article}"))?
    else {
        info!(title = %article, outcome = "missing", "article does not exist");
        return Ok(false);
    };

    let Some(county) = resolve_county(&article, &text, state, map)
        .with_context(|| format!("resolving county for {article}"))?
    else {
        info!(title = %article, outcome = "unresolved", "no county found");
        return Ok(false);
    };

    let Some(talk_text) = bot
        .client
        .fetch_page_text(&talk)
        .await
        .with_context(|| format!("fetching {talk}"))?
    else {
        info!(title = %talk, outcome = "missing", "talk page does not exist");
        return Ok(false);
    };

    let doc = Wikicode::parse(&talk_text).with_context(|| format!("parsing {talk}"))?;
    let resolver = bot.resolver_for(&doc).await?;
    let update = retarget_county(doc, &resolver, state, &county.name)
        .with_context(|| format!("retargeting {talk}"))?;
    info!(
        title = %talk,
        county = %county.name,
        strategy = %county.strategy,
        outcome = %update.outcome,
        "processed"
    );

    let Some(new_text) = update.new_text else {
        return Ok(false);
    };
    if !bot.save(&talk, &new_text, &edit_summary(&county.name)).await? {
        return Ok(false);
    }
    let bootstrap = ensure_category(bot, &county.name, state).await;
    Ok(report_bootstrap(&county.name, bootstrap))
}

/// The talk page is already saved by now, so a failed category bootstrap
/// is only a warning and the page still counts as edited.
fn report_bootstrap(county: &str, bootstrap: Result<()>) -> bool {
    if let Err(err) = bootstrap {
        let message = format!("{err:#}");
        warn!(county, error = %message, "could not create county category");
    }
    true
}

/// Create the county's requested-photographs category if it is missing.
async fn ensure_category(bot: &Bot, county: &str, state: &str) -> Result<()> {
    let category = requested_photos_category(county);
    if bot
        .client
        .page_exists(&category)
        .await
        .with_context(|| format!("checking {category}"))?
    {
        return Ok(());
    }
    if bot
        .save(&category, &category_page_text(county, state), CATEGORY_SUMMARY)
        .await?
    {
        info!(category = %category, "created category");
    }
    Ok(())
}
