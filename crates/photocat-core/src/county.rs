//! County Resolver.
//!
//! Narrows an article in a U.S. state to the county it lies in, trying
//! independent strategies in a fixed order:
//!
//! 1. the curated town-to-county map, keyed by article title;
//! 2. the `subdivision_name` fields of the article's settlement infobox;
//! 3. a title that already ends in "X County, State";
//! 4. links in the article's first paragraph, each tried against 3 then 1.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::error::CoreError;
use crate::wikitext::{Node, Wikicode};

const INFOBOX_PREFIXES: &[&str] = &[
    "Infobox settlement",
    "Infobox U.S. city",
    "Infobox city",
    "Infobox town",
];

static COUNTY_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^,]+ County, .+$").expect("county link pattern is valid"));

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph pattern is valid"));

static WIKILINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("wikilink pattern is valid"));

/// Towns whose county is known without reading the article.
const BUILTIN_COUNTIES: &[(&str, &str)] = &[
    ("Phoenix, Arizona", "Maricopa County, Arizona"),
    ("Tucson, Arizona", "Pima County, Arizona"),
    ("Little Rock, Arkansas", "Pulaski County, Arkansas"),
    ("Colorado Springs, Colorado", "El Paso County, Colorado"),
    ("Boulder, Colorado", "Boulder County, Colorado"),
    ("Wilmington, Delaware", "New Castle County, Delaware"),
    ("Dover, Delaware", "Kent County, Delaware"),
    ("Boise, Idaho", "Ada County, Idaho"),
    ("Indianapolis, Indiana", "Marion County, Indiana"),
    ("Fort Wayne, Indiana", "Allen County, Indiana"),
    ("South Bend, Indiana", "St. Joseph County, Indiana"),
    ("Louisville, Kentucky", "Jefferson County, Kentucky"),
    ("Lexington, Kentucky", "Fayette County, Kentucky"),
    ("Boston, Massachusetts", "Suffolk County, Massachusetts"),
    ("Cambridge, Massachusetts", "Middlesex County, Massachusetts"),
    ("Lowell, Massachusetts", "Middlesex County, Massachusetts"),
    ("Plymouth, Massachusetts", "Plymouth County, Massachusetts"),
    ("Salem, Massachusetts", "Essex County, Massachusetts"),
    ("Springfield, Massachusetts", "Hampden County, Massachusetts"),
    ("Worcester, Massachusetts", "Worcester County, Massachusetts"),
    ("Gulfport, Mississippi", "Harrison County, Mississippi"),
    ("Jackson, Mississippi", "Hinds County, Mississippi"),
    ("Lincoln, Nebraska", "Lancaster County, Nebraska"),
    ("Omaha, Nebraska", "Douglas County, Nebraska"),
    ("Concord, New Hampshire", "Merrimack County, New Hampshire"),
    ("Manchester, New Hampshire", "Hillsborough County, New Hampshire"),
    ("Albuquerque, New Mexico", "Bernalillo County, New Mexico"),
    ("Santa Fe, New Mexico", "Santa Fe County, New Mexico"),
    ("Asheville, North Carolina", "Buncombe County, North Carolina"),
    ("Charlotte, North Carolina", "Mecklenburg County, North Carolina"),
    ("Durham, North Carolina", "Durham County, North Carolina"),
    ("Raleigh, North Carolina", "Wake County, North Carolina"),
    ("Bismarck, North Dakota", "Burleigh County, North Dakota"),
    ("Fargo, North Dakota", "Cass County, North Dakota"),
    ("Akron, Ohio", "Summit County, Ohio"),
    ("Cincinnati, Ohio", "Hamilton County, Ohio"),
    ("Cleveland, Ohio", "Cuyahoga County, Ohio"),
    ("Toledo, Ohio", "Lucas County, Ohio"),
    ("Youngstown, Ohio", "Mahoning County, Ohio"),
    ("Providence, Rhode Island", "Providence County, Rhode Island"),
    ("Charleston, South Carolina", "Charleston County, South Carolina"),
    ("Columbia, South Carolina", "Richland County, South Carolina"),
    ("Myrtle Beach, South Carolina", "Horry County, South Carolina"),
    ("Austin, Texas", "Travis County, Texas"),
    ("Dallas, Texas", "Dallas County, Texas"),
    ("El Paso, Texas", "El Paso County, Texas"),
    ("Houston, Texas", "Harris County, Texas"),
    ("Lubbock, Texas", "Lubbock County, Texas"),
    ("San Antonio, Texas", "Bexar County, Texas"),
    ("Provo, Utah", "Utah County, Utah"),
    ("Salt Lake City, Utah", "Salt Lake County, Utah"),
    ("Burlington, Vermont", "Chittenden County, Vermont"),
    ("Olympia, Washington", "Thurston County, Washington"),
    ("Seattle, Washington", "King County, Washington"),
    ("Spokane, Washington", "Spokane County, Washington"),
    ("Tacoma, Washington", "Pierce County, Washington"),
    ("Charleston, West Virginia", "Kanawha County, West Virginia"),
    ("Casper, Wyoming", "Natrona County, Wyoming"),
    ("Cheyenne, Wyoming", "Laramie County, Wyoming"),
];

/// Which strategy produced a county.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountyStrategy {
    DirectMap,
    Infobox,
    TitleSuffix,
    FirstParagraph,
}

impl fmt::Display for CountyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CountyStrategy::DirectMap => "direct map",
            CountyStrategy::Infobox => "infobox",
            CountyStrategy::TitleSuffix => "title suffix",
            CountyStrategy::FirstParagraph => "first paragraph",
        })
    }
}

/// A resolved "X County, State".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountyMatch {
    pub name: String,
    pub strategy: CountyStrategy,
}

/// Town-to-county table keyed by full article title.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CountyMap {
    entries: HashMap<String, String>,
}

impl CountyMap {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_COUNTIES
                .iter()
                .map(|(town, county)| (town.to_string(), county.to_string()))
                .collect(),
        }
    }

    /// Parse a JSON object of `"Town, State": "X County, State"` pairs.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add entries, overriding existing towns.
    pub fn extend(&mut self, other: CountyMap) {
        self.entries.extend(other.entries);
    }

    pub fn lookup(&self, title: &str) -> Option<&str> {
        self.entries.get(title.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve the county of article `title` in `state`.
///
/// `Ok(None)` means no strategy found one; the caller should skip the page
/// rather than guess.
pub fn resolve_county(
    title: &str,
    text: &str,
    state: &str,
    map: &CountyMap,
) -> Result<Option<CountyMatch>, CoreError> {
    let found = |name: &str, strategy: CountyStrategy| {
        debug!(title, county = name, %strategy, "county resolved");
        Some(CountyMatch {
            name: name.to_string(),
            strategy,
        })
    };

    if let Some(county) = map.lookup(title) {
        return Ok(found(county, CountyStrategy::DirectMap));
    }

    let doc = Wikicode::parse(text)?;
    if let Some(county) = county_in_infobox(&doc) {
        return Ok(found(&county, CountyStrategy::Infobox));
    }

    let suffix = title_suffix_pattern(state)?;
    if let Some(county) = county_in_title(&suffix, title) {
        return Ok(found(county, CountyStrategy::TitleSuffix));
    }

    let intro = lead_text(&doc);
    let Some(paragraph) = PARAGRAPH_BREAK.split(&intro).map(str::trim).find(|p| !p.is_empty()) else {
        return Ok(None);
    };
    for caps in WIKILINK.captures_iter(paragraph) {
        let target = caps[1].split('|').next().unwrap_or_default().trim();
        if let Some(county) = county_in_title(&suffix, target).or_else(|| map.lookup(target)) {
            return Ok(found(county, CountyStrategy::FirstParagraph));
        }
    }

    Ok(None)
}

/// Title of the requested-photographs category for a place.
pub fn requested_photos_category(place: &str) -> String {
    format!("Category:Wikipedia requested photographs in {place}")
}

/// Body for a newly created county category, filed under its state.
pub fn category_page_text(county: &str, state: &str) -> String {
    format!(
        "{{{{US image sources}}}}\n\
         {{{{howtoreqphotoin|{county}}}}}\n\
         <br clear=all />\n\
         \n\
         [[{}|{county}]]",
        requested_photos_category(state)
    )
}

fn title_suffix_pattern(state: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"\s*([^,(]* County, {})$", regex::escape(state.trim())))
}

fn county_in_title<'t>(pattern: &Regex, title: &'t str) -> Option<&'t str> {
    pattern
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn county_in_infobox(doc: &Wikicode) -> Option<String> {
    doc.templates()
        .into_iter()
        .map(|(_, template)| template)
        .filter(|template| {
            let name = template.name();
            INFOBOX_PREFIXES
                .iter()
                .any(|prefix| name.get(..prefix.len()).is_some_and(|head| head.eq_ignore_ascii_case(prefix)))
        })
        .flat_map(|template| {
            template
                .params()
                .filter(|(name, _)| name.contains("subdivision_name"))
                .flat_map(|(_, param)| param.value().links())
                .collect::<Vec<_>>()
        })
        .find(|target| COUNTY_LINK.is_match(target))
}

/// Page text with leading lines that hold only a template or a link
/// (hatnotes, infoboxes, images) removed.
fn lead_text(doc: &Wikicode) -> String {
    let nodes = doc.nodes();
    let mut start = 0;
    for (i, node) in nodes.iter().enumerate() {
        let skip = match node {
            Node::Text(t) => t.trim().is_empty(),
            Node::Comment(_) => true,
            Node::Template(_) | Node::Link(_) => match nodes.get(i + 1) {
                None => true,
                Some(Node::Text(t)) => t.trim_start_matches([' ', '\t']).starts_with('\n'),
                Some(_) => false,
            },
            Node::Nowiki(_) => false,
        };
        if !skip {
            break;
        }
        start = i + 1;
    }
    nodes[start..].iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(title: &str, text: &str, state: &str) -> Option<CountyMatch> {
        resolve_county(title, text, state, &CountyMap::builtin()).unwrap()
    }

    #[test]
    fn direct_map_wins_over_infobox() {
        let text = "{{Infobox settlement|subdivision_name2=[[Essex County, Massachusetts]]}}";
        let found = resolve("Lowell, Massachusetts", text, "Massachusetts").unwrap();
        assert_eq!(found.name, "Middlesex County, Massachusetts");
        assert_eq!(found.strategy, CountyStrategy::DirectMap);
    }

    #[test]
    fn infobox_subdivision_link() {
        let text = "{{Infobox settlement\n| name = Pflugerville\n| subdivision_type2 = County\n\
                    | subdivision_name2 = [[Travis County, Texas|Travis]]\n}}\n'''Pflugerville''' is a city.";
        let found = resolve("Pflugerville, Texas", text, "Texas").unwrap();
        assert_eq!(found.name, "Travis County, Texas");
        assert_eq!(found.strategy, CountyStrategy::Infobox);
    }

    #[test]
    fn infobox_ignores_non_county_links() {
        let text = "{{Infobox settlement|subdivision_name=[[United States]]|subdivision_name1=[[Texas]]}}";
        assert_eq!(resolve("Nowhere, Texas", text, "Texas"), None);
    }

    #[test]
    fn title_suffix() {
        let found = resolve("Lake Travis (Travis County, Texas)", "", "Texas");
        assert_eq!(found, None);

        let found = resolve("Old Jail, Bastrop County, Texas", "", "Texas").unwrap();
        assert_eq!(found.name, "Bastrop County, Texas");
        assert_eq!(found.strategy, CountyStrategy::TitleSuffix);
    }

    #[test]
    fn title_suffix_requires_state() {
        assert_eq!(resolve("Old Jail, Bastrop County, Texas", "", "Ohio"), None);
    }

    #[test]
    fn first_paragraph_links() {
        let text = "{{Use mdy dates}}\n[[File:Tower.jpg|thumb]]\n\
                    The '''Tower''' is a building in [[Seattle, Washington|Seattle]].\n\n\
                    It is near [[Tacoma, Washington]].";
        let found = resolve("Tower (Seattle)", text, "Washington").unwrap();
        assert_eq!(found.name, "King County, Washington");
        assert_eq!(found.strategy, CountyStrategy::FirstParagraph);
    }

    #[test]
    fn first_paragraph_county_suffix_link() {
        let text = "The '''Mill''' stands in [[Georgetown, Texas|Georgetown]], the seat of \
                    [[Williamson County, Texas|Williamson County]].";
        let found = resolve("The Mill", text, "Texas").unwrap();
        assert_eq!(found.name, "Williamson County, Texas");
    }

    #[test]
    fn only_first_paragraph_is_scanned() {
        let text = "The '''Mill''' is a building.\n\nIt is in [[Austin, Texas]].";
        assert_eq!(resolve("The Mill", text, "Texas"), None);
    }

    #[test]
    fn unresolvable_is_none() {
        assert_eq!(resolve("Somewhere", "Plain prose with no links.", "Texas"), None);
        assert_eq!(resolve("Somewhere", "", "Texas"), None);
    }

    #[test]
    fn malformed_text_is_an_error() {
        let deep = "{{a|".repeat(100) + &"}}".repeat(100);
        let result = resolve_county("Somewhere", &deep, "Texas", &CountyMap::builtin());
        assert!(matches!(result, Err(CoreError::Parse(_))));
    }

    #[test]
    fn county_map_from_json_extends_builtin() {
        let mut map = CountyMap::builtin();
        let extra = CountyMap::from_json(r#"{"Round Rock, Texas": "Williamson County, Texas"}"#).unwrap();
        map.extend(extra);
        assert_eq!(map.lookup("Round Rock, Texas"), Some("Williamson County, Texas"));
        assert_eq!(map.lookup("Austin, Texas"), Some("Travis County, Texas"));
        assert!(CountyMap::from_json("[1, 2]").is_err());
    }

    #[test]
    fn category_page_body() {
        assert_eq!(
            category_page_text("Travis County, Texas", "Texas"),
            "{{US image sources}}\n{{howtoreqphotoin|Travis County, Texas}}\n<br clear=all />\n\n\
             [[Category:Wikipedia requested photographs in Texas|Travis County, Texas]]"
        );
        assert_eq!(
            requested_photos_category("Ohio"),
            "Category:Wikipedia requested photographs in Ohio"
        );
    }

    #[test]
    fn lead_text_skips_standalone_markup() {
        let doc = Wikicode::parse("{{Hatnote}}\n<!-- c -->\n[[File:A.jpg]]\nProse {{cite}} here.").unwrap();
        assert_eq!(lead_text(&doc).trim_start(), "Prose {{cite}} here.");

        let doc = Wikicode::parse("{{lang|fr|Ville}} is a town.").unwrap();
        assert_eq!(lead_text(&doc), "{{lang|fr|Ville}} is a town.");
    }
}
