use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::config::Config;
use crate::error::ActionError;
use crate::model::Endpoint;

pub const CONTENT_JSON: &str = "application/json";
pub const CONTENT_FORM: &str = "application/x-www-form-urlencoded";
pub const CONTENT_TEXT: &str = "text/plain; charset=utf-8";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Issues an authenticated POST; the response body is never read.
pub trait HttpPoster: Send + Sync {
    fn post(
        &self,
        endpoint: Endpoint,
        url: &str,
        body: String,
        content_type: &str,
    ) -> Result<(), ActionError>;
}

impl Endpoint {
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::ChatHome => "slack (home)",
            Endpoint::ChatWork => "slack (work)",
            Endpoint::HomeAssistant => "home assistant",
        }
    }
}

/// One bearer-authenticated blocking client per endpoint.
pub struct HttpGateway {
    clients: HashMap<Endpoint, Client>,
}

impl HttpGateway {
    pub fn from_config(config: &Config) -> Self {
        let tokens = [
            (Endpoint::ChatHome, config.slack.token_home.as_str()),
            (Endpoint::ChatWork, config.slack.token_work.as_str()),
            (Endpoint::HomeAssistant, config.home_assistant.token.as_str()),
        ];

        let mut clients = HashMap::new();
        for (endpoint, token) in tokens {
            match build_client(token) {
                Ok(client) => {
                    clients.insert(endpoint, client);
                }
                Err(e) => log::warn!("Could not build http client for {}: {}", endpoint.name(), e),
            }
        }
        Self { clients }
    }
}

fn build_client(bearer_token: &str) -> Result<Client, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    let mut auth = HeaderValue::from_str(&format!("Bearer {bearer_token}"))?;
    auth.set_sensitive(true);
    headers.insert(header::AUTHORIZATION, auth);

    let client = Client::builder()
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}

impl HttpPoster for HttpGateway {
    fn post(
        &self,
        endpoint: Endpoint,
        url: &str,
        body: String,
        content_type: &str,
    ) -> Result<(), ActionError> {
        let client = self
            .clients
            .get(&endpoint)
            .ok_or(ActionError::MissingClient(endpoint.name()))?;

        log::debug!("POST {} via {}", url, endpoint.name());
        let response = client
            .post(url)
            .header(header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .map_err(|source| ActionError::Http {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            log::warn!("POST {} returned {}", url, response.status());
        }
        Ok(())
    }
}
