use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use photocat_core::PipelineConfig;
use photocat_wiki::WikiClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod bot;
mod cat;
mod county;

use bot::Bot;

const USER_AGENT: &str = concat!("PhotoCatBot/", env!("CARGO_PKG_VERSION"));

#[derive(Parser, Debug)]
#[command(name = "photocat")]
#[command(about = "Maintain photo requests on Wikipedia talk pages")]
#[command(version)]
struct Cli {
    /// MediaWiki api.php endpoint
    #[arg(
        long,
        global = true,
        env = "PHOTOCAT_API_URL",
        default_value = "https://en.wikipedia.org/w/api.php"
    )]
    api_url: String,

    /// Bot account name
    #[arg(long, global = true, env = "PHOTOCAT_USER")]
    user: Option<String>,

    /// Bot password
    #[arg(long, global = true, env = "PHOTOCAT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Never save; log the text that would have been written
    #[arg(short, long, global = true, env = "PHOTOCAT_DEBUG")]
    debug: bool,

    /// Seconds to wait after each saved edit
    #[arg(long, global = true, env = "PHOTOCAT_EDIT_DELAY", default_value_t = 30)]
    edit_delay: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill in photo requests from the project banners on each talk page
    Cat {
        /// Category to walk when no titles are given
        #[arg(short, long, default_value = cat::DEFAULT_CATEGORY)]
        category: String,

        /// Articles or talk pages to process
        titles: Vec<String>,
    },

    /// Move state-level photo requests into county categories
    County {
        /// State whose requested-photographs category is walked
        #[arg(
            short = 'l',
            long = "location",
            visible_alias = "place",
            visible_short_alias = 'p'
        )]
        location: String,

        /// JSON object of extra "Town, State": "X County, State" entries
        #[arg(long)]
        county_map: Option<PathBuf>,

        /// Articles or talk pages to process
        titles: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { "photocat=debug" } else { "photocat=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .init();
    info!("photocat v{}", env!("CARGO_PKG_VERSION"));

    let client = WikiClient::new(&cli.api_url, USER_AGENT)?;
    match (&cli.user, &cli.password) {
        (Some(user), Some(password)) => client
            .login(user, password)
            .await
            .with_context(|| format!("logging in to {}", cli.api_url))?,
        _ if cli.debug => info!("no credentials; running anonymously"),
        _ => bail!("--user and --password are required unless --debug is set"),
    }

    let bot = Bot::new(
        client,
        PipelineConfig { debug: cli.debug },
        Duration::from_secs(cli.edit_delay),
    );

    match cli.command {
        Command::Cat { category, titles } => cat::run(&bot, &category, &titles).await,
        Command::County {
            location,
            county_map,
            titles,
        } => {
            let map = county::load_map(county_map.as_deref())?;
            county::run(&bot, &location, &map, &titles).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cat_defaults() {
        let cli = Cli::try_parse_from(["photocat", "cat"]).unwrap();
        assert_eq!(cli.edit_delay, 30);
        assert!(!cli.debug);
        match cli.command {
            Command::Cat { category, titles } => {
                assert_eq!(category, "Category:Wikipedia requested photographs");
                assert!(titles.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cat_with_titles_and_global_flags() {
        let cli = Cli::try_parse_from([
            "photocat",
            "cat",
            "--debug",
            "--edit-delay",
            "5",
            "Lowell, Massachusetts",
            "Talk:Austin, Texas",
        ])
        .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.edit_delay, 5);
        match cli.command {
            Command::Cat { titles, .. } => {
                assert_eq!(titles, vec!["Lowell, Massachusetts", "Talk:Austin, Texas"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn county_accepts_place_alias() {
        for args in [
            ["photocat", "county", "--location", "Texas"],
            ["photocat", "county", "--place", "Texas"],
            ["photocat", "county", "-l", "Texas"],
            ["photocat", "county", "-p", "Texas"],
        ] {
            let cli = Cli::try_parse_from(args).unwrap();
            match cli.command {
                Command::County { location, .. } => assert_eq!(location, "Texas"),
                other => panic!("unexpected command: {other:?}"),
            }
        }
    }

    #[test]
    fn county_requires_location() {
        assert!(Cli::try_parse_from(["photocat", "county"]).is_err());
    }
}
