//! HTTP client for the MediaWiki Action API.

use std::collections::HashSet;

use futures::stream::{self, Stream, TryStreamExt};
use photocat_core::TableResolver;
use photocat_core::resolve::{MAX_REDIRECT_HOPS, validate_title};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

/// Titles per `action=query` request; the API limit for non-bot accounts.
const TITLE_BATCH: usize = 50;

/// Edit error codes that mean the page cannot be edited by this account.
const LOCKED_CODES: &[&str] = &[
    "protectedpage",
    "cascadeprotected",
    "permissiondenied",
    "blocked",
    "protectedtitle",
];

/// Error codes after which no further request can succeed.
const FATAL_CODES: &[&str] = &[
    "assertuserfailed",
    "assertbotfailed",
    "readapidenied",
    "writeapidenied",
];

#[derive(Error, Debug)]
pub enum WikiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("API error {code}: {info}")]
    Api { code: String, info: String },
    #[error("page {title} is locked: {reason}")]
    Locked { title: String, reason: String },
    #[error("login failed: {0}")]
    Auth(String),
}

impl WikiError {
    /// True when the whole run should stop rather than skip one page.
    pub fn is_fatal(&self) -> bool {
        match self {
            WikiError::Auth(_) => true,
            WikiError::Api { code, .. } => FATAL_CODES.contains(&code.as_str()),
            _ => false,
        }
    }
}

/// Client for one wiki's `api.php`, holding the session cookies.
pub struct WikiClient {
    client: reqwest::Client,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct TokensResponse {
    query: TokensQuery,
}

#[derive(Debug, Deserialize)]
struct TokensQuery {
    tokens: Tokens,
}

#[derive(Debug, Deserialize)]
struct Tokens {
    logintoken: Option<String>,
    csrftoken: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    login: LoginResult,
}

#[derive(Debug, Deserialize)]
struct LoginResult {
    result: String,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    lgusername: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PagesResponse {
    query: PagesQuery,
}

#[derive(Debug, Deserialize, Default)]
struct PagesQuery {
    #[serde(default)]
    pages: Vec<PageInfo>,
    #[serde(default)]
    normalized: Vec<TitleMapping>,
    #[serde(default)]
    redirects: Vec<TitleMapping>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    revisions: Vec<Revision>,
}

impl PageInfo {
    fn content(self) -> Option<String> {
        if self.missing || self.invalid {
            return None;
        }
        self.revisions
            .into_iter()
            .next()
            .map(|rev| rev.slots.main.content)
    }
}

#[derive(Debug, Deserialize)]
struct Revision {
    slots: Slots,
}

#[derive(Debug, Deserialize)]
struct Slots {
    main: Slot,
}

#[derive(Debug, Deserialize)]
struct Slot {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct TitleMapping {
    from: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct EditResponse {
    edit: EditResult,
}

#[derive(Debug, Deserialize)]
struct EditResult {
    result: String,
    #[serde(default)]
    nochange: bool,
}

#[derive(Debug, Deserialize)]
struct CategoryResponse {
    query: CategoryQuery,
    #[serde(rename = "continue", default)]
    cont: Option<CategoryContinue>,
}

#[derive(Debug, Deserialize)]
struct CategoryQuery {
    #[serde(default)]
    categorymembers: Vec<CategoryMember>,
}

#[derive(Debug, Deserialize)]
struct CategoryMember {
    title: String,
}

#[derive(Debug, Deserialize)]
struct CategoryContinue {
    cmcontinue: Option<String>,
}

/// Decode an API response body, surfacing an `error` object as
/// [`WikiError::Api`].
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, WikiError> {
    let mut value: serde_json::Value = serde_json::from_str(body)?;
    if let Some(error) = value.get_mut("error") {
        let error: ApiErrorBody = serde_json::from_value(error.take())?;
        return Err(WikiError::Api {
            code: error.code,
            info: error.info,
        });
    }
    Ok(serde_json::from_value(value)?)
}

impl WikiClient {
    /// Create a client for the given `api.php` URL.
    ///
    /// `api_url` should be like `https://en.wikipedia.org/w/api.php`.
    pub fn new(api_url: &str, user_agent: &str) -> Result<Self, WikiError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, WikiError> {
        let resp = self
            .client
            .get(&self.api_url)
            .query(&[("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await?;
        Self::read(resp).await
    }

    async fn post<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, WikiError> {
        let mut form: Vec<(&str, &str)> = vec![("format", "json"), ("formatversion", "2")];
        form.extend_from_slice(params);
        let resp = self.client.post(&self.api_url).form(&form).send().await?;
        Self::read(resp).await
    }

    async fn read<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, WikiError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(WikiError::Server {
                status: status.as_u16(),
                body,
            });
        }
        let body = resp.text().await?;
        decode(&body)
    }

    async fn token(&self, kind: &str) -> Result<String, WikiError> {
        let resp: TokensResponse = self
            .get(&[("action", "query"), ("meta", "tokens"), ("type", kind)])
            .await?;
        let token = match kind {
            "login" => resp.query.tokens.logintoken,
            _ => resp.query.tokens.csrftoken,
        };
        token.ok_or_else(|| WikiError::Api {
            code: "notoken".into(),
            info: format!("no {kind} token in response"),
        })
    }

    /// Log in with a bot password. The session lives in the cookie store.
    pub async fn login(&self, user: &str, password: &str) -> Result<(), WikiError> {
        let token = self.token("login").await?;
        info!(url = %self.api_url, user, "logging in");
        let resp: LoginResponse = self
            .post(&[
                ("action", "login"),
                ("lgname", user),
                ("lgpassword", password),
                ("lgtoken", token.as_str()),
            ])
            .await?;
        if resp.login.result != "Success" {
            return Err(WikiError::Auth(
                resp.login.reason.unwrap_or(resp.login.result),
            ));
        }
        info!(user = resp.login.lgusername.as_deref().unwrap_or(user), "logged in");
        Ok(())
    }

    /// Current wikitext of a page, or `None` if it does not exist.
    pub async fn fetch_page_text(&self, title: &str) -> Result<Option<String>, WikiError> {
        let resp: PagesResponse = self
            .get(&[
                ("action", "query"),
                ("prop", "revisions"),
                ("rvprop", "content"),
                ("rvslots", "main"),
                ("titles", title),
            ])
            .await?;
        let Some(page) = resp.query.pages.into_iter().next() else {
            return Ok(None);
        };
        debug!(title = %page.title, missing = page.missing, "fetched page");
        Ok(page.content())
    }

    pub async fn page_exists(&self, title: &str) -> Result<bool, WikiError> {
        let resp: PagesResponse = self
            .get(&[("action", "query"), ("titles", title)])
            .await?;
        Ok(resp
            .query
            .pages
            .first()
            .is_some_and(|p| !p.missing && !p.invalid))
    }

    /// Replace a page's text. Protection and blocks come back as
    /// [`WikiError::Locked`].
    pub async fn save_page_text(
        &self,
        title: &str,
        text: &str,
        summary: &str,
    ) -> Result<(), WikiError> {
        let token = self.token("csrf").await?;
        info!(title, bytes = text.len(), "saving page");
        let result: Result<EditResponse, WikiError> = self
            .post(&[
                ("action", "edit"),
                ("title", title),
                ("text", text),
                ("summary", summary),
                ("bot", "1"),
                ("assert", "user"),
                ("token", token.as_str()),
            ])
            .await;
        let resp = match result {
            Err(WikiError::Api { code, info }) if LOCKED_CODES.contains(&code.as_str()) => {
                return Err(WikiError::Locked {
                    title: title.to_string(),
                    reason: info,
                });
            }
            other => other?,
        };
        if resp.edit.result != "Success" {
            return Err(WikiError::Api {
                code: resp.edit.result,
                info: format!("edit of {title} was not accepted"),
            });
        }
        info!(title, nochange = resp.edit.nochange, "saved page");
        Ok(())
    }

    /// Build a redirect table covering `titles`, following chains up to the
    /// hop limit. Title normalisations are recorded as well.
    pub async fn resolve_titles(&self, titles: &[String]) -> Result<TableResolver, WikiError> {
        let mut resolver = TableResolver::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut pending: Vec<String> = titles
            .iter()
            .filter(|t| validate_title(t).is_ok())
            .filter(|t| seen.insert(t.to_string()))
            .cloned()
            .collect();

        for _ in 0..MAX_REDIRECT_HOPS {
            if pending.is_empty() {
                break;
            }
            let mut next = Vec::new();
            for batch in pending.chunks(TITLE_BATCH) {
                let joined = batch.join("|");
                let resp: PagesResponse = self
                    .get(&[("action", "query"), ("titles", joined.as_str()), ("redirects", "1")])
                    .await?;
                for mapping in resp.query.normalized {
                    resolver.insert(&mapping.from, &mapping.to);
                }
                for mapping in resp.query.redirects {
                    resolver.insert(&mapping.from, &mapping.to);
                    if seen.insert(mapping.to.clone()) {
                        next.push(mapping.to);
                    }
                }
            }
            pending = next;
        }

        debug!(titles = titles.len(), redirects = resolver.len(), "resolved titles");
        Ok(resolver)
    }

    /// Titles of every page in a category, fetched lazily one API page at a
    /// time.
    pub fn category_members<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Stream<Item = Result<String, WikiError>> + 'a {
        // `None` once the last page has been read.
        let start: Option<Option<String>> = Some(None);
        stream::try_unfold(start, move |state| async move {
            let Some(cont) = state else {
                return Ok::<_, WikiError>(None);
            };
            let mut params = vec![
                ("action", "query"),
                ("list", "categorymembers"),
                ("cmtitle", category),
                ("cmlimit", "max"),
            ];
            if let Some(cont) = cont.as_deref() {
                params.push(("cmcontinue", cont));
            }
            let resp: CategoryResponse = self.get(&params).await?;
            let titles: Vec<Result<String, WikiError>> = resp
                .query
                .categorymembers
                .into_iter()
                .map(|m| Ok(m.title))
                .collect();
            info!(category, count = titles.len(), "listed category members");
            let next = resp.cont.and_then(|c| c.cmcontinue).map(Some);
            Ok(Some((stream::iter(titles), next)))
        })
        .try_flatten()
    }
}
