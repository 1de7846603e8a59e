//! Blocking HTTP implementation of [`AlertsApi`] (reqwest-based)
//!
//! Talks to the v2 REST API: every request carries the `X-Api-Key` header,
//! list responses are followed through `Link: <...>; rel="next"` pages.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, LINK};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::api::AlertsApi;
use crate::model::{AlertsPolicy, Application};
use crate::resource::{Resource, ResourceKind};
use crate::{Error, Result};

/// Default endpoint of the service
pub const DEFAULT_BASE_URL: &str = "https://api.newrelic.com";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`HttpAlertsApi`]
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ApiSettings {
    /// Settings for the default endpoint with the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// REST client for the alerting service
#[derive(Debug, Clone)]
pub struct HttpAlertsApi {
    base_url: String,
    api_key: String,
    client: Client,
}

impl HttpAlertsApi {
    /// Build a client from settings
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(Error::InvalidSettings("API key must not be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("alerts-configurator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::InvalidSettings(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            // Normalize base URL: strip trailing slash.
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v2/{}", self.base_url, path)
    }

    fn send(&self, method: &str, url: &str, builder: RequestBuilder) -> Result<Response> {
        debug!(method, url, "Sending request");
        let response = builder.header("X-Api-Key", &self.api_key).send()?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().unwrap_or_default();
            Err(Error::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body,
            })
        }
    }

    fn read_json(url: &str, response: Response) -> Result<Value> {
        response.json::<Value>().map_err(|e| Error::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// GET every page of a collection and return the items under `key`
    fn get_all(&self, url: &str, query: &[(&str, String)], key: &str) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut response = self.send("GET", url, self.client.get(url).query(query))?;
        let mut current = url.to_string();

        loop {
            let next = next_link(response.headers());
            let body = Self::read_json(&current, response)?;
            let page: Vec<Value> = unwrap_key(&current, body, key)?;
            items.extend(page);

            match next {
                Some(next_url) => {
                    response = self.send("GET", &next_url, self.client.get(&next_url))?;
                    current = next_url;
                }
                None => break,
            }
        }

        Ok(items)
    }

    fn find_by_name<T: DeserializeOwned>(
        &self,
        collection: &str,
        key: &str,
        name: &str,
        name_of: impl Fn(&T) -> &str,
    ) -> Result<Option<T>> {
        let url = self.url(&format!("{collection}.json"));
        let query = [("filter[name]", name.to_string())];
        let values = self.get_all(&url, &query, key)?;

        // The name filter matches substrings
        for value in values {
            let item: T = decode(&url, value)?;
            if name_of(&item) == name {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    fn create_channel<R: Resource>(&self, policy_id: u64, entity: &R) -> Result<R> {
        let kind = ResourceKind::Channel;
        let url = self.url(&format!("{}.json", kind.collection()));
        let body = json!({ kind.item_key(): entity });
        let response = self.send("POST", &url, self.client.post(&url).json(&body))?;
        let created: Vec<R> = unwrap_key(&url, Self::read_json(&url, response)?, kind.list_key())?;
        let created = created.into_iter().next().ok_or_else(|| Error::Decode {
            url: url.clone(),
            message: "no channel returned".to_string(),
        })?;

        let channel_id = created.id().ok_or_else(|| Error::MissingId {
            kind: kind.label().to_string(),
            name: created.name().to_string(),
        })?;

        self.link_channel(policy_id, channel_id)?;
        Ok(created)
    }

    fn link_channel(&self, policy_id: u64, channel_id: u64) -> Result<()> {
        let url = self.url("alerts_policy_channels.json");
        let query = [
            ("policy_id", policy_id.to_string()),
            ("channel_ids", channel_id.to_string()),
        ];
        self.send("PUT", &url, self.client.put(&url).query(&query))?;
        Ok(())
    }

    fn unlink_channel(&self, policy_id: u64, channel_id: u64) -> Result<()> {
        let url = self.url("alerts_policy_channels.json");
        let query = [
            ("policy_id", policy_id.to_string()),
            ("channel_id", channel_id.to_string()),
        ];
        self.send("DELETE", &url, self.client.delete(&url).query(&query))?;
        Ok(())
    }
}

fn require_shared<R: Resource>(operation: &str) -> Result<()> {
    if R::SHARED {
        Ok(())
    } else {
        Err(Error::NotShared {
            operation: operation.to_string(),
            kind: R::KIND.label().to_string(),
        })
    }
}

impl AlertsApi for HttpAlertsApi {
    fn policy_by_name(&self, name: &str) -> Result<Option<AlertsPolicy>> {
        self.find_by_name("alerts_policies", "policies", name, |p: &AlertsPolicy| {
            p.name.as_str()
        })
    }

    fn application_by_name(&self, name: &str) -> Result<Option<Application>> {
        self.find_by_name("applications", "applications", name, |a: &Application| {
            a.name.as_str()
        })
    }

    fn list<R: Resource>(&self, policy_id: u64) -> Result<Vec<R>> {
        // Shared kinds are only listed account-wide
        if R::SHARED {
            let mut entities = self.list_all::<R>()?;
            entities.retain(|e| e.belongs_to(policy_id));
            return Ok(entities);
        }

        let kind = R::KIND;
        let url = self.url(&format!("{}.json", kind.collection()));
        let query = [("policy_id", policy_id.to_string())];
        self.get_all(&url, &query, kind.list_key())?
            .into_iter()
            .map(|value| decode(&url, value))
            .collect()
    }

    fn list_all<R: Resource>(&self) -> Result<Vec<R>> {
        require_shared::<R>("list all")?;
        let kind = R::KIND;
        let url = self.url(&format!("{}.json", kind.collection()));
        self.get_all(&url, &[], kind.list_key())?
            .into_iter()
            .map(|value| decode(&url, value))
            .collect()
    }

    fn create<R: Resource>(&self, policy_id: u64, entity: &R) -> Result<R> {
        let kind = R::KIND;
        if kind == ResourceKind::Channel {
            return self.create_channel(policy_id, entity);
        }

        let url = self.url(&format!("{}/policies/{}.json", kind.collection(), policy_id));
        let body = json!({ kind.item_key(): entity });
        let response = self.send("POST", &url, self.client.post(&url).json(&body))?;
        unwrap_key(&url, Self::read_json(&url, response)?, kind.item_key())
    }

    fn update<R: Resource>(&self, id: u64, entity: &R) -> Result<R> {
        let kind = R::KIND;
        let url = self.url(&format!("{}/{}.json", kind.collection(), id));
        let body = json!({ kind.item_key(): entity });
        let response = self.send("PUT", &url, self.client.put(&url).json(&body))?;
        unwrap_key(&url, Self::read_json(&url, response)?, kind.item_key())
    }

    fn delete<R: Resource>(&self, id: u64) -> Result<()> {
        let url = self.url(&format!("{}/{}.json", R::KIND.collection(), id));
        self.send("DELETE", &url, self.client.delete(&url))?;
        Ok(())
    }

    fn attach<R: Resource>(&self, policy_id: u64, id: u64) -> Result<()> {
        require_shared::<R>("attach")?;
        self.link_channel(policy_id, id)
    }

    fn detach<R: Resource>(&self, policy_id: u64, id: u64) -> Result<()> {
        require_shared::<R>("detach")?;
        self.unlink_channel(policy_id, id)
    }
}

fn decode<T: DeserializeOwned>(url: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Take `body[key]` and decode it
fn unwrap_key<T: DeserializeOwned>(url: &str, mut body: Value, key: &str) -> Result<T> {
    let inner = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| Error::Decode {
            url: url.to_string(),
            message: format!("missing '{key}' in response"),
        })?;
    decode(url, inner)
}

/// Extract the `rel="next"` target of a `Link` header
fn next_link(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        let is_next = params.split(';').any(|p| p.trim() == "rel=\"next\"");
        is_next.then(|| {
            target
                .trim()
                .trim_start_matches('<')
                .trim_end_matches('>')
                .to_string()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_next_link_found() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                "<https://api.example.com/v2/alerts_channels.json?page=3>; rel=\"last\", \
                 <https://api.example.com/v2/alerts_channels.json?page=2>; rel=\"next\"",
            ),
        );
        assert_eq!(
            next_link(&headers).as_deref(),
            Some("https://api.example.com/v2/alerts_channels.json?page=2")
        );
    }

    #[test]
    fn test_next_link_absent() {
        let mut headers = HeaderMap::new();
        assert!(next_link(&headers).is_none());

        headers.insert(
            LINK,
            HeaderValue::from_static("<https://api.example.com/v2/x.json?page=1>; rel=\"first\""),
        );
        assert!(next_link(&headers).is_none());
    }

    #[test]
    fn test_unwrap_key_missing() {
        let err = unwrap_key::<Vec<Value>>("http://x", json!({ "other": [] }), "channels")
            .unwrap_err();
        assert!(err.to_string().contains("missing 'channels'"));
    }

    #[test]
    fn test_attach_requires_shared_kind() {
        let api = HttpAlertsApi::new(&ApiSettings::new("key")).unwrap();
        let err = api
            .detach::<crate::model::AlertsNrqlCondition>(1, 2)
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot detach NRQL condition: not shared across policies");
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let err = HttpAlertsApi::new(&ApiSettings::new("  ")).unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = HttpAlertsApi::new(&ApiSettings::new("key").with_base_url("http://localhost:9/"))
            .unwrap();
        assert_eq!(api.base_url(), "http://localhost:9");
        assert_eq!(api.url("alerts_channels.json"), "http://localhost:9/v2/alerts_channels.json");
    }
}
