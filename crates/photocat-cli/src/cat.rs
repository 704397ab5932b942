//! `photocat cat`: consolidate banner signals into each page's photo request.

use anyhow::{Context, Result};
use photocat_core::{Wikicode, process_talk_page};
use photocat_wiki::talk_title;
use tracing::info;

use crate::bot::Bot;

pub const DEFAULT_CATEGORY: &str = "Category:Wikipedia requested photographs";

const EDIT_SUMMARY: &str = "cleanup for the [[User:Twp/Drafts/WikiProject Photo Requests|Photo Request \
                            WikiProject]], by the [[User:PhotoCatBot|PhotoCat]]";

pub async fn run(bot: &Bot, category: &str, titles: &[String]) -> Result<()> {
    bot.for_each_page(category, titles, |title| fix_page(bot, title))
        .await?;
    Ok(())
}

async fn fix_page(bot: &Bot, title: String) -> Result<bool> {
    let talk = talk_title(&title);
    let Some(text) = bot
        .client
        .fetch_page_text(&talk)
        .await
        .with_context(|| format!("fetching {talk}"))?
    else {
        info!(title = %talk, outcome = "missing", "talk page does not exist");
        return Ok(false);
    };

    let doc = Wikicode::parse(&text).with_context(|| format!("parsing {talk}"))?;
    let resolver = bot.resolver_for(&doc).await?;
    let update = process_talk_page(doc, &resolver, &bot.config)
        .with_context(|| format!("processing {talk}"))?;
    info!(title = %talk, outcome = %update.outcome, "processed");

    match update.new_text {
        Some(new_text) => bot.save(&talk, &new_text, EDIT_SUMMARY).await,
        None => Ok(false),
    }
}
