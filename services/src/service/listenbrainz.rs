use std::time::Duration;

use lb_cleaner_core::{
    ListenData,
    Page,
    UserListens as ListensResponse,
};
use log::debug;
use reqwest::{
    blocking::{
        Client as HttpClient,
        RequestBuilder,
    },
    header::AUTHORIZATION,
    StatusCode,
    Url,
};
use serde::{
    de::DeserializeOwned,
    Deserialize,
    Serialize,
};
use serde_with::{
    serde_as,
    DisplayFromStr,
};

use super::{
    ListenRemover,
    ListenSource,
};
use crate::{
    DeleteFailure,
    Error,
    Result,
};

/// Root of the public ListenBrainz API
pub const LISTENBRAINZ_API: &str = "https://api.listenbrainz.org/1";

/// Largest page the listens endpoint will return
pub const MAX_PAGE_SIZE: u16 = 1000;


/// Blocking client for a listenbrainz compatible API
#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
    api_root: Url,
}

impl Client {
    pub fn new(timeout: Duration) -> Result<Self> { Self::new_with_url(LISTENBRAINZ_API, timeout) }

    /// # Errors
    ///
    /// Fails if `url` is not an absolute http(s) url, or the http client can't be built
    pub fn new_with_url(url: &str, timeout: Duration) -> Result<Self> {
        let api_root = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        if api_root.cannot_be_a_base() {
            return Err(Error::InvalidUrl(url.to_owned()));
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, api_root })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// The listen history of `user`, fetched `page_size` listens at a time
    pub fn user_listens<'c>(&'c self, user: &'c str, page_size: u16) -> UserListens<'c> {
        UserListens {
            client: self,
            user,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Deletes listens on behalf of the owner of `token`
    pub fn remover<'c>(&'c self, token: &'c str) -> Remover<'c> { Remover { client: self, token } }

    /// Checks `token` with the service and reports which user it belongs to
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToken`] with the service's message if the token is rejected
    pub fn validate_token(&self, token: &str) -> Result<TokenStatus> {
        let req = self.http.get(self.endpoint(&["validate-token"])).header(AUTHORIZATION, auth(token));
        let status: TokenStatus = get_json(req)?;
        if !status.valid {
            return Err(Error::InvalidToken(status.message));
        }
        Ok(status)
    }
}

fn auth(token: &str) -> String { format!("Token {token}") }

fn get_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T> {
    let resp = req.send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Status(status));
    }
    let body = resp.bytes()?;
    Ok(serde_json::from_slice(&body)?)
}


#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenStatus {
    pub valid: bool,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub message: String,
}


pub struct UserListens<'c> {
    client: &'c Client,
    user: &'c str,
    page_size: u16,
}

impl ListenSource for UserListens<'_> {
    fn fetch(&self, cursor: Option<i64>) -> Result<Page> {
        let mut url = self.client.endpoint(&["user", self.user, "listens"]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("count", &self.page_size.to_string());
            if let Some(max_ts) = cursor {
                query.append_pair("max_ts", &max_ts.to_string());
            }
        }

        debug!("GET {url}");
        let page = get_json::<ListensResponse>(self.client.http.get(url))?.payload;
        debug!("Received {} listens, oldest at {:?}", page.listens.len(), page.oldest());
        Ok(page)
    }
}


#[serde_as]
#[derive(Serialize)]
struct DeleteListen<'a> {
    #[serde_as(as = "DisplayFromStr")]
    listened_at: i64,
    recording_msid: &'a str,
}

pub struct Remover<'c> {
    client: &'c Client,
    token: &'c str,
}

impl ListenRemover for Remover<'_> {
    fn delete<L: ListenData + ?Sized>(&self, listen: &L) -> Result<(), DeleteFailure> {
        let body = DeleteListen {
            listened_at: listen.listened_at(),
            recording_msid: listen.recording_msid(),
        };

        let resp = self
            .client
            .http
            .post(self.client.endpoint(&["delete-listen"]))
            .header(AUTHORIZATION, auth(self.token))
            .json(&body)
            .send()?;

        debug!("delete-listen({}, {}): {}", body.listened_at, body.recording_msid, resp.status());
        match resp.status() {
            StatusCode::OK => Ok(()),
            status => Err(DeleteFailure::Status(status)),
        }
    }
}
