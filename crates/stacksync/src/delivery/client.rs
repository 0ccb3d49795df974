//! Delivery API HTTP client implementation.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};
use url::form_urlencoded;

use crate::config::{DeliveryCredentials, SyncConfig};
use crate::content::{ContentEntry, ContentTypeQuery};
use crate::error::{DeliveryError, Error};
use crate::source::ContentSource;
use crate::types::{ContentTypeUid, DeliveryUrl, EntryUid};

use super::endpoints::{
    ACCESS_TOKEN_PARAM, API_KEY_PARAM, DeliveryErrorResponse, ENVIRONMENT_PARAM, EntriesResponse,
    EntryResponse,
};

/// HTTP client for the Contentstack Delivery API.
///
/// Requests are plain GETs; the API key, delivery token and environment
/// travel as query parameters on every call.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    client: reqwest::Client,
    base: DeliveryUrl,
    credentials: DeliveryCredentials,
    environment: String,
}

impl DeliveryClient {
    /// Create a new client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be initialized.
    pub fn new(
        base: DeliveryUrl,
        credentials: DeliveryCredentials,
        environment: impl Into<String>,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("stacksync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base,
            credentials,
            environment: environment.into(),
        })
    }

    /// Create a client from a [`SyncConfig`].
    pub fn from_config(config: &SyncConfig) -> Result<Self, Error> {
        Self::new(
            config.delivery_url()?,
            config.credentials.clone(),
            config.environment.clone(),
        )
    }

    /// Returns the base URL this client is configured for.
    pub fn base(&self) -> &DeliveryUrl {
        &self.base
    }

    /// Returns the publishing environment.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// List the entries matching a query.
    #[instrument(skip(self), fields(base = %self.base, content_type = %query.content_type))]
    pub async fn list_entries(&self, query: &ContentTypeQuery) -> Result<EntriesResponse, Error> {
        let url = self.entries_request_url(query);
        debug!("Fetching entries");
        trace!(?query, "query parameters");

        self.get(&url).await
    }

    /// Fetch a single entry by UID.
    #[instrument(skip(self), fields(base = %self.base))]
    pub async fn get_entry(
        &self,
        content_type: &ContentTypeUid,
        uid: &EntryUid,
    ) -> Result<EntryResponse, Error> {
        let url = format!(
            "{}?{}",
            self.base.entry_url(content_type, uid),
            self.auth_params()
        );
        debug!("Fetching entry by UID");

        self.get(&url).await
    }

    /// Build the full request URL for an entries query.
    ///
    /// The ordering parameter is appended raw (`field[dir]`) since the API
    /// expects the brackets unencoded and without a value.
    pub(crate) fn entries_request_url(&self, query: &ContentTypeQuery) -> String {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair(API_KEY_PARAM, self.credentials.api_key());
        params.append_pair(ACCESS_TOKEN_PARAM, self.credentials.delivery_token());
        params.append_pair(ENVIRONMENT_PARAM, &self.environment);
        params.append_pair("limit", &query.effective_limit().to_string());
        if let Some(skip) = query.skip {
            params.append_pair("skip", &skip.to_string());
        }
        let mut qs = params.finish();

        if let Some(ordering) = query.ordering_param() {
            qs.push('&');
            qs.push_str(&ordering);
        }

        format!("{}?{}", self.base.entries_url(&query.content_type), qs)
    }

    fn auth_params(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(API_KEY_PARAM, self.credentials.api_key())
            .append_pair(ACCESS_TOKEN_PARAM, self.credentials.delivery_token())
            .append_pair(ENVIRONMENT_PARAM, &self.environment)
            .finish()
    }

    async fn get<R: DeserializeOwned>(&self, url: &str) -> Result<R, Error> {
        let response = self.client.get(url).send().await?;
        self.handle_response(response).await
    }

    /// Handle a Delivery API response, parsing the body or error.
    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<R, Error> {
        let status = response.status();
        trace!(status = %status, "Delivery API response");

        if status.is_success() {
            let body = response.json::<R>().await?;
            Ok(body)
        } else {
            let error = self.parse_error_response(response).await;
            Err(Error::Delivery(error))
        }
    }

    /// Parse a Delivery API error response.
    async fn parse_error_response(&self, response: reqwest::Response) -> DeliveryError {
        let status = response.status().as_u16();

        match response.json::<DeliveryErrorResponse>().await {
            Ok(body) => DeliveryError::new(status, body.error_code, body.error_message),
            Err(_) => DeliveryError::new(status, None, None),
        }
    }
}

#[async_trait]
impl ContentSource for DeliveryClient {
    async fn entries(&self, query: &ContentTypeQuery) -> Result<Option<Vec<ContentEntry>>, Error> {
        Ok(self.list_entries(query).await?.entries)
    }

    async fn entry(
        &self,
        content_type: &ContentTypeUid,
        uid: &EntryUid,
    ) -> Result<Option<ContentEntry>, Error> {
        Ok(self.get_entry(content_type, uid).await?.entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SortDirection;

    fn client() -> DeliveryClient {
        DeliveryClient::new(
            DeliveryUrl::for_region("us").unwrap(),
            DeliveryCredentials::new("blt_key", "cs_token"),
            "production",
        )
        .unwrap()
    }

    fn query(ct: &str) -> ContentTypeQuery {
        ContentTypeQuery::new(ContentTypeUid::new(ct).unwrap())
    }

    #[test]
    fn default_limit_without_ordering() {
        let url = client().entries_request_url(&query("hero_section"));
        assert_eq!(
            url,
            "https://cdn.contentstack.io/v3/content_types/hero_section/entries\
             ?api_key=blt_key&access_token=cs_token&environment=production&limit=100"
        );
    }

    #[test]
    fn ordering_and_skip_are_appended() {
        let q = query("blog_post")
            .order_by("publish_date", SortDirection::Desc)
            .limit(3)
            .skip(6);
        let url = client().entries_request_url(&q);
        assert!(url.ends_with("&limit=3&skip=6&publish_date[desc]"), "{url}");
    }

    #[test]
    fn credentials_are_encoded() {
        let client = DeliveryClient::new(
            DeliveryUrl::for_region("us").unwrap(),
            DeliveryCredentials::new("key&x", "tok en"),
            "prod",
        )
        .unwrap();
        let url = client.entries_request_url(&query("cta_section"));
        assert!(url.contains("api_key=key%26x&access_token=tok+en"), "{url}");
    }
}
