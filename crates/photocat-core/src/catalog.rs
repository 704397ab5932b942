//! Signal catalog: which banners imply which photo subjects and locations.
//!
//! The tables are a hand-curated, best-effort mapping keyed by the bare
//! canonical template title (no `Template:` prefix).

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Canonical title of the photo-request annotation.
pub const ANNOTATION_TITLE: &str = "Template:Image requested";

/// Spelling written when a redirect to the annotation is renamed.
pub const ANNOTATION_NAME: &str = "image requested";

/// Value written to a banner's own photo-request parameter.
pub const AFFIRMATIVE: &str = "yes";

pub const UNITED_STATES_BANNER: &str = "WikiProject United States";
pub const UNITED_STATES_DEFAULT: &str = "the United States";
pub const US_ROADS_BANNER: &str = "U.S. Roads WikiProject";

// ── Subjects: {{image requested|<subject>}} ──

const SUBJECTS: &[(&str, &str)] = &[
    ("WikiProject Albums", "albums"),
    ("WikiProject Alternative music", "music"),
    ("WikiProject Agriculture", "agricultural topics"),
    ("WikiProject Amateur radio", "amateur radio"),
    ("WikiProject Anglicanism", "religious subjects"),
    ("WikiProject Architecture", "architecture"),
    ("WikiProject Aquarium Fishes", "fish"),
    ("WikiProject Automobiles", "cars"),
    ("WikiProject Basketball", "basketball"),
    ("WikiProject Beer", "beer"),
    ("WikiProject Board and table games", "games"),
    ("WikiProject Brands", "brands"),
    ("WikiProject Bridges", "bridges"),
    ("WikiProject British crime", "law and crime topics"),
    ("WikiProject British TV shows", "television programs"),
    ("WikiProject Battlestar Galactica", "television programs"),
    ("WikiProject Boxing", "boxing"),
    ("WikiProject Buddhism", "religious subjects"),
    ("WikiProject Business", "business & economic topics"),
    ("WikiProject Catholicism", "religious subjects"),
    ("WikiProject Chemicals", "chemical compounds"),
    ("WikiProject Christianity", "religious subjects"),
    ("WikiProject Christian music", "music"),
    ("WikiProject Classical music", "music"),
    ("WikiProject College football", "American football people"),
    ("WikiProject Computing", "computing equipment"),
    ("WikiProject Country Music", "music"),
    ("WikiProject Companies", "business & economic topics"),
    ("WikiProject Cricket", "cricket"),
    ("WikiProject Crime", "law and crime topics"),
    ("WikiProject Criminal Biography", "law and crime topics"),
    ("WikiProject Cycling", "cycling people"),
    ("WikiProject Discographies", "albums"),
    ("WikiProject E-theatre", "performing arts"),
    ("WikiProject Earthquakes", "earthquakes"),
    ("WikiProject Economics", "business & economic topics"),
    ("WikiProject Electronics", "electronics"),
    ("WikiProject Environment", "environmental topics"),
    ("WikiProject Fashion", "fashion"),
    ("WikiProject Fencing", "sports and games"),
    ("WikiProject Football", "association football people"),
    ("WikiProject Figure Skating", "performing arts"),
    ("WikiProject Fisheries and Fishing", "fisheries and fishing"),
    ("WikiProject Formula One", "cars"),
    ("WikiProject Fungi", "fungi"),
    ("WikiProject Gemology and Jewelry", "jewelry"),
    ("WikiProject Geology", "geology"),
    ("WikiProject Guitarists", "musicians"),
    ("WikiProject Gymnastics", "gymnastics"),
    ("WikiProject Horse racing", "equestrians"),
    ("WikiProject Hospitals", "hospitals"),
    ("WikiProject International relations", "political topics"),
    ("WikiProject Jazz", "music"),
    ("WikiProject Judaism", "religious subjects"),
    ("WikiProject Languages", "languages"),
    ("WikiProject Libraries", "libraries"),
    ("WikiProject Law", "law and crime topics"),
    ("WikiProject Law Enforcement", "law and crime topics"),
    ("WikiProject Lost", "television programs"),
    ("WikiProject Magazines", "publications"),
    ("WikiProject Medicine", "medical subjects"),
    ("WikiProject Metal", "music"),
    ("WikiProject Museums", "museums"),
    ("WikiProject Music of the United Kingdom", "music"),
    ("WikiProject Musical Instruments", "musical instruments"),
    ("WikiProject Military history", "military history"),
    ("WikiProject Mythology", "mythology subjects"),
    ("WikiProject Neopaganism", "religious subjects"),
    ("WikiProject Newspapers", "publications"),
    ("WikiProject Olympics", "sports and games"),
    ("WikiProject Opera", "music"),
    ("WikiProject Organized Labour", "political topics"),
    ("WikiProject Photography", "photography"),
    ("WikiProject Physics", "physics subjects"),
    ("WikiProject Pinball", "games"),
    ("WikiProject Politics", "political topics"),
    ("WikiProject Pop music", "music"),
    ("WikiProject Pritzker-GLAM", "military history"),
    ("WikiProject Professional wrestling", "professional wrestling performers"),
    ("WikiProject Punk music", "music"),
    ("WikiProject R&B and Soul Music", "music"),
    ("WikiProject Religion", "religious subjects"),
    ("WikiProject Rivers", "rivers and waterfalls"),
    ("WikiProject Rock music", "music"),
    ("WikiProject Role-playing games", "games"),
    ("WikiProject Rugby league", "rugby league people"),
    ("WikiProject Rugby union", "rugby union people"),
    ("WikiProject Saints", "Saints"),
    ("WikiProject Schools", "schools"),
    ("WikiProject Scouting", "Scouting and Guiding"),
    ("WikiProject Severe weather", "earth science subjects"),
    ("WikiProject Sexuality", "sexuality subjects"),
    ("WikiProject Ships", "ships"),
    ("WikiProject Shipwrecks", "ships"),
    ("WikiProject Shopping Centers", "shopping centers"),
    ("WikiProject Songs", "music"),
    ("WikiProject Spiders", "arthropods"),
    ("WikiProject Spirits", "food and drink"),
    ("WikiProject Terrorism", "political topics"),
    ("WikiProject Textile Arts", "textiles and fabrics"),
    ("WikiProject Theatre", "performing arts"),
    ("WikiProject Trucks", "trucks"),
    ("WikiProject Toys", "toys"),
    ("WikiProject Universities", "schools"),
    ("WikiProject Viruses", "Viruses"),
    ("WikiProject Visual arts", "art"),
    ("WikiProject Zoo", "zoos"),
];

// ── Locations: {{image requested|in=<location>}} ──

const LOCATIONS: &[(&str, &str)] = &[
    ("WikiProject Burma (Myanmar)", "Burma"),
    ("WikiProject Central Asia", "Asia"),
    ("WikiProject Chicago", "Chicago, Illinois"),
    ("WikiProject Cleveland", "Cleveland, Ohio"),
    ("WikiProject Education in the United Kingdom", "the United Kingdom"),
    ("WikiProject Houston", "Houston, Texas"),
    ("WikiProject Micronesia", "the Federated States of Micronesia"),
    ("WikiProject Music of the United Kingdom", "the United Kingdom"),
    ("WikiProject Netherlands", "the Netherlands"),
    ("WikiProject Philippine History", "the Philippines"),
    ("WikiProject Philippines", "the Philippines"),
    ("WikiProject Tambayan Philippines", "the Philippines"),
    ("WikiProject U.S. Congress", "Washington, D.C."),
    ("WikiProject UK Roads", "the United Kingdom"),
    ("WikiProject United Kingdom", "the United Kingdom"),
];

// ── Banners with their own photo-request parameter ──

const CUSTOM_PARAMS: &[(&str, &str)] = &[
    ("WikiProject Amphibians and Reptiles", "needs-photo"),
    ("WikiProject Amusement Parks", "imageneeded"),
    ("WikiProject Anatomy", "needs-photo"),
    ("WikiProject Animals", "needs-photo"),
    ("WikiProject Animation", "needs-image"),
    ("WikiProject Anime and manga", "needs-image"),
    ("WikiProject Armenia", "needs-photo"),
    ("WikiProject Arthropods", "needs-photo"),
    ("WikiProject Astronomy", "needs-image"),
    ("WikiProject Atlanta", "imageneeded"),
    ("WikiProject Aviation", "Imageneeded"),
    ("WikiProject Baseball", "image"),
    ("WikiProject Biography", "needs-photo"),
    ("WikiProject Biology", "needs-photo"),
    ("WikiProject Birds", "needs-photo"),
    ("WikiProject Books", "needs-infobox-cover"),
    ("WikiProject Brazil", "needs-photo"),
    ("WikiProject Canada", "needs-photo"),
    ("WikiProject Cats", "needs-photo"),
    ("WikiProject Chemistry", "needs-picture"),
    ("WikiProject Children's literature", "needs-infobox-cover"),
    ("WikiProject China", "image-needed"),
    ("WikiProject Comics", "photo"),
    ("WikiProject Dance", "needs-image"),
    ("WikiProject Denmark", "imageneeded"),
    ("WikiProject Ecuador", "imageneeded"),
    ("WikiProject Electronic music", "needs-photo"),
    ("WikiProject Energy", "needs-photo"),
    ("WikiProject Engineering", "imageneeded"),
    ("WikiProject Film", "needs-image"),
    ("WikiProject Firearms", "needs-image"),
    ("WikiProject Fishes", "imageneeded"),
    ("WikiProject Food and drink", "needs-photo"),
    ("WikiProject Games", "needs-photo"),
    ("WikiProject Gastropods", "needs-photo"),
    ("WikiProject Genetics", "imageneeded"),
    ("WikiProject Georgia (U.S. state)", "imageneeded"),
    ("WikiProject Germany", "imageneeded"),
    ("WikiProject Heraldry and vexillology", "imageneeded"),
    ("WikiProject Hong Kong", "image-needed"),
    ("WikiProject Ice Hockey", "needs-photo"),
    ("WikiProject Industrial design", "needs-image"),
    ("WikiProject Insects", "needs-photo"),
    ("WikiProject Internet culture", "needs-photo"),
    ("WikiProject Ireland", "image-needed"),
    ("WikiProject Latter Day Saint movement", "needs-photo"),
    ("WikiProject Lepidoptera", "needs-photo"),
    ("WikiProject Mammals", "needs-photo"),
    ("WikiProject Mauritius", "image-needed"),
    ("WikiProject Micro", "needs-photo"),
    ("WikiProject Moldova", "imageneeded"),
    ("WikiProject Motorcycling", "image-needed"),
    ("WikiProject Mountains", "needs-photo"),
    ("WikiProject Musical Theatre", "imageneeded"),
    ("WikiProject New York City", "image-needed"),
    ("WikiProject Nickelodeon", "needs-image"),
    ("WikiProject National Football League", "needs-image"),
    ("WikiProject Novels", "needs-infobox-cover"),
    ("WikiProject Plants", "needs-photo"),
    ("WikiProject Politics of the United Kingdom", "needs-picture"),
    ("WikiProject Primates", "needs-photo"),
    ("WikiProject Russia", "imageneeded"),
    ("WikiProject Singapore", "imagerequest"),
    ("WikiProject Skyscrapers", "imageneeded"),
    ("WikiProject Software", "needs-image"),
    ("WikiProject Soil", "needs-photo"),
    ("WikiProject South Africa", "image-needed"),
    ("WikiProject Spaceflight", "needs-image"),
    ("WikiProject Star Trek", "needs-picture"),
    ("WikiProject Swimming", "needs-photo"),
    ("WikiProject Television", "needs-image"),
    ("WikiProject Trains", "imageneeded"),
    ("WikiProject U2", "needs-photo"),
    ("WikiProject Video games", "screenshot"),
    ("WikiProject Wales", "imageneeded"),
    ("WikiProject Wine", "needs-photo"),
];

// ── {{WikiProject United States|TX=yes|Seattle=yes}} ──

/// Parameters of the United States banner that name a place.
pub const UNITED_STATES_PARAMS: &[(&str, &str)] = &[
    ("AR", "Arkansas"),
    ("AZ", "Arizona"),
    ("CO", "Colorado"),
    ("DE", "Delaware"),
    ("DC", "Washington, D.C."),
    ("ID", "Idaho"),
    ("IN", "Indiana"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("MA", "Massachusetts"),
    ("MS", "Mississippi"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("NE", "Nebraska"),
    ("NH", "New Hampshire"),
    ("NM", "New Mexico"),
    ("OH", "Ohio"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WY", "Wyoming"),
    ("Austin", "Austin, Texas"),
    ("Boston", "Boston, Massachusetts"),
    ("Cape Cod", "Massachusetts"),
    ("Charlotte", "Charlotte, North Carolina"),
    ("Cincinnati", "Cincinnati, Ohio"),
    ("Coal-fields", "Kentucky"),
    ("Durham", "Durham, North Carolina"),
    ("EasternWashington", "Washington"),
    ("EastWa", "Washington"),
    ("Indianapolis", "Indianapolis, Indiana"),
    ("Louisville", "Louisville, Kentucky"),
    ("Lowell", "Middlesex County, Massachusetts"),
    ("Metro", "Washington, D.C."),
    ("NOLA", "New Orleans, Louisiana"),
    ("NHMTN", "New Hampshire"),
    ("Ohiotownships", "Ohio"),
    ("Omaha", "Omaha, Nebraska"),
    ("Samoa", "American Samoa"),
    ("SCMB", "Myrtle Beach, South Carolina"),
    ("SATF", "Bexar County, Texas"),
    ("Seattle", "Seattle, Washington"),
    ("Shreveport", "Shreveport, Louisiana"),
    ("Yellowstone", "Yellowstone National Park"),
    ("Youngstown", "Youngstown, Ohio"),
];

/// USPS codes used by the `state`, `state1`, ... parameters of the roads banner.
pub const USPS_CODES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "Washington, D.C."),
    ("FL", "Florida"),
    ("GA", "Georgia (U.S. state)"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
    ("AS", "American Samoa"),
    ("GU", "Guam"),
    ("MP", "the Northern Mariana Islands"),
    ("PR", "Puerto Rico"),
    ("VI", "the United States Virgin Islands"),
];

/// Federations whose name is redundant next to any of their subdivisions.
pub const FEDERATIONS: &[(&str, &[&str])] = &[
    (
        "Australia",
        &[
            "Australian Capital Territory",
            "New South Wales",
            "Northern Territory",
            "Queensland",
            "South Australia",
            "Tasmania",
            "Western Australia",
            "Victoria",
        ],
    ),
    (
        "Canada",
        &[
            "Alberta",
            "British Columbia",
            "Manitoba",
            "New Brunswick",
            "Newfoundland and Labrador",
            "Northwest Territories",
            "Nova Scotia",
            "Ontario",
            "Quebec",
            "Saskatchewan",
            "Nunavut",
            "Prince Edward Island",
            "the Yukon",
        ],
    ),
];

/// Location-oriented banners: `WikiProject <Region>`, `WP <Region>`, ...
/// The region must be followed by a pipe or the end of the name.
static REGIONAL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:WikiProject|Project|WP)[ _]?",
        r"(Alabama|Alaska|Arizona|Arkansas|California|Colorado|Connecticut",
        r"|Delaware|Florida|Georgia \(U\.S\. state\)|Hawaii|Idaho|Illinois",
        r"|Indiana|Iowa|Kansas|Kentucky|Louisiana|Louisville|Maine|Maryland",
        r"|Mexico|Michigan|Minnesota|Mississippi|Missouri|Montana|Nebraska",
        r"|Nevada|New Hampshire|New Jersey|New Mexico|New York|North Carolina",
        r"|North Dakota|Ohio|Oklahoma|Oregon|Pennsylvania|Rhode Island",
        r"|South Carolina|South Dakota|Tennessee|Texas|Utah|Virginia|Washington",
        r"|West Virginia|Wisconsin|Wyoming",
        r"|Afghanistan|Africa|Argentina|Australia|Bangladesh|Belgium|Bolivia|Bulgaria",
        r"|Cambodia|Canada|Chile|Cornwall|Croatia|Cuba|Cyprus|Devon|Egypt",
        r"|England|Finland|France|Ghana|Greece|Haiti|Hungary|Iceland|India|Indonesia",
        r"|Iraq|Iran|Israel|Italy|Japan|Korea|Kuwait|Lebanon|Lithuania|London",
        r"|Mongolia|Montenegro|New Zealand|Nigeria|Norway|Nottinghamshire|Oman|Ottawa|Pakistan",
        r"|Poland|Portugal|Romania|Russia|Sheffield|Slovakia|Somalia|Spain|Sri Lanka|Surrey",
        r"|Sweden|Syria|Taiwan|Tibet|Turkey|Vancouver|Venezuela|Vietnam|Yorkshire)",
        r"\s*(?:\||$)",
    ))
    .expect("regional name pattern is valid")
});

static SUBJECT_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| SUBJECTS.iter().copied().collect());
static LOCATION_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| LOCATIONS.iter().copied().collect());
static CUSTOM_PARAM_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| CUSTOM_PARAMS.iter().copied().collect());

/// Strip a leading `Template:` namespace from a canonical title.
pub fn bare_title(canonical: &str) -> &str {
    canonical.strip_prefix("Template:").unwrap_or(canonical)
}

/// Region named by a location-oriented banner title.
pub fn region_in_name(name: &str) -> Option<&str> {
    REGIONAL_NAME
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn subject_for(name: &str) -> Option<&'static str> {
    SUBJECT_MAP.get(name).copied()
}

pub fn location_for(name: &str) -> Option<&'static str> {
    LOCATION_MAP.get(name).copied()
}

/// The banner's own photo-request parameter, if it has one.
pub fn custom_param_for(name: &str) -> Option<&'static str> {
    CUSTOM_PARAM_MAP.get(name).copied()
}

pub fn united_states_param(param: &str) -> Option<&'static str> {
    UNITED_STATES_PARAMS
        .iter()
        .find(|(key, _)| *key == param)
        .map(|(_, place)| *place)
}

pub fn state_for_code(code: &str) -> Option<&'static str> {
    let code = code.trim();
    USPS_CODES
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(code))
        .map(|(_, state)| *state)
}
