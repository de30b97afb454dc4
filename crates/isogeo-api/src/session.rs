// Authenticated session against the Isogeo API
//
// A `Session` owns the HTTP client, the resolved endpoints, the credentials,
// the current bearer token and the name→id caches. Every API request goes
// through `Session::send`, which runs the bearer-validity guard before
// anything touches the network. Route methods take `&mut Session`, so a
// session has at most one request in flight.

use chrono::TimeDelta;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::auth::{self, BearerToken, Credentials, Endpoints};
use crate::cache::NameCache;
use crate::checker::{self, Checked};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Default delay before expiry at which the token is renewed.
pub const DEFAULT_SAFETY_MARGIN: TimeDelta = TimeDelta::seconds(60);

/// An authenticated connection to one Isogeo platform.
pub struct Session {
    http: reqwest::Client,
    endpoints: Endpoints,
    credentials: Credentials,
    token: Option<BearerToken>,
    margin: TimeDelta,
    cache: NameCache,
}

impl Session {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a session with a fresh HTTP client. No request is sent.
    pub fn new(
        endpoints: Endpoints,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, endpoints, credentials))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        endpoints: Endpoints,
        credentials: Credentials,
    ) -> Self {
        Self {
            http,
            endpoints,
            credentials,
            token: None,
            margin: DEFAULT_SAFETY_MARGIN,
            cache: NameCache::default(),
        }
    }

    /// Build a session and acquire its first token.
    pub async fn connect(
        endpoints: Endpoints,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut session = Self::new(endpoints, credentials, transport)?;
        session.ensure_bearer().await?;
        Ok(session)
    }

    /// Renew the token this long before it expires.
    pub fn with_safety_margin(mut self, margin: TimeDelta) -> Self {
        self.margin = margin;
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    /// Install a token obtained elsewhere (shared token, tests).
    pub fn set_token(&mut self, token: BearerToken) {
        self.token = Some(token);
    }

    pub fn cache(&self) -> &NameCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut NameCache {
        &mut self.cache
    }

    // ── Bearer-validity guard ────────────────────────────────────────

    /// Make sure a token valid for at least the safety margin is held.
    ///
    /// Performs one token exchange when the token is missing or expiring.
    /// On failure the old token is dropped and the error returned.
    pub async fn ensure_bearer(&mut self) -> Result<(), Error> {
        if let Some(token) = &self.token {
            if !token.is_expiring(self.margin) {
                return Ok(());
            }
            debug!(expires_at = %token.expires_at(), "bearer token expiring, refreshing");
        }

        self.token = None;
        let token =
            auth::request_token(&self.http, &self.endpoints.token, &self.credentials).await?;
        self.token = Some(token);
        Ok(())
    }

    // ── Request path ─────────────────────────────────────────────────

    /// Send one authenticated request to `route` and classify the response.
    pub(crate) async fn send(
        &mut self,
        method: Method,
        route: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Checked, Error> {
        let url = self.endpoints.api_url(route)?;
        self.ensure_bearer().await?;
        let Some(token) = &self.token else {
            return Err(Error::Authentication {
                message: "no bearer token after refresh".into(),
            });
        };

        if query.is_empty() {
            debug!("{method} {url}");
        } else {
            debug!("{method} {url} params={query:?}");
        }

        let mut request = self
            .http
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, token.header_value());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        checker::check_response(resp).await
    }

    /// Read a 2xx body into `T`, keeping a preview of the body on failure.
    pub(crate) async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("api", &self.endpoints.api.as_str())
            .field("client_id", &self.credentials.client_id())
            .field("token_expires_at", &self.token.as_ref().map(BearerToken::expires_at))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use secrecy::SecretString;

    use super::*;

    fn session() -> Session {
        Session::with_client(
            reqwest::Client::new(),
            Endpoints::default(),
            Credentials::ClientCredentials {
                client_id: "plugin-qgis-abc".into(),
                client_secret: SecretString::from("s3cr3t".to_owned()),
            },
        )
    }

    #[tokio::test]
    async fn fresh_token_skips_exchange() {
        // The default endpoints are unreachable from tests: any exchange would fail.
        let mut session = session();
        session.set_token(BearerToken::new("abc", Utc::now() + TimeDelta::hours(1)));
        session.ensure_bearer().await.unwrap();
        assert!(session.token().is_some());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let mut session = session();
        session.set_token(BearerToken::new("very-secret-token", Utc::now()));
        let out = format!("{session:?}");
        assert!(out.contains("plugin-qgis-abc"));
        assert!(!out.contains("very-secret-token"));
        assert!(!out.contains("s3cr3t"));
    }
}
