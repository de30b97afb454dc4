// OAuth2 bearer authentication against the Isogeo identity server
//
// Platforms resolve to a triple of base URLs (API, web app, token endpoint).
// Tokens are obtained with the client_credentials or password grant, the
// client being authenticated with HTTP Basic.

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::checker;
use crate::enums::EditionTab;
use crate::error::Error;
use crate::model::{Entity, Metadata};

// ── Platforms and endpoints ─────────────────────────────────────────

/// Isogeo deployment a session talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    #[default]
    Prod,
    Qa,
}

/// Base URLs used by a session. Resolved once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api: Url,
    pub app: Url,
    pub token: Url,
}

impl Endpoints {
    pub fn for_platform(platform: Platform) -> Self {
        let (api, app, token) = match platform {
            Platform::Prod => (
                "https://v1.api.isogeo.com",
                "https://app.isogeo.com",
                "https://id.api.isogeo.com/oauth/token",
            ),
            Platform::Qa => (
                "https://v1.api.qa.isogeo.com",
                "https://qa-isogeo-app.azurewebsites.net",
                "https://id.api.qa.isogeo.com/oauth/token",
            ),
        };
        let parse = |s: &str| Url::parse(s).expect("static platform URL");
        Self {
            api: parse(api),
            app: parse(app),
            token: parse(token),
        }
    }

    /// Endpoints from explicit URLs (self-hosted instance, mock server).
    pub fn custom(api: &str, app: &str, token: &str) -> Result<Self, Error> {
        Ok(Self {
            api: Url::parse(api)?,
            app: Url::parse(app)?,
            token: Url::parse(token)?,
        })
    }

    /// Absolute URL of an API route such as `groups/{id}/shares`.
    pub fn api_url(&self, route: &str) -> Result<Url, Error> {
        join(&self.api, route)
    }

    /// Link to a metadata sheet in the web editor, opened on `tab`.
    pub fn edit_url(
        &self,
        metadata_id: &str,
        workgroup_id: &str,
        tab: EditionTab,
    ) -> Result<Url, Error> {
        checker::ensure_uuid(metadata_id, "Metadata")?;
        checker::ensure_uuid(workgroup_id, "Workgroup")?;
        join(
            &self.app,
            &format!("groups/{workgroup_id}/resources/{metadata_id}/{tab}"),
        )
    }

    /// Editor link for a fetched sheet. Rejects tabs its kind does not have.
    pub fn edit_url_for(&self, metadata: &Metadata, tab: EditionTab) -> Result<Url, Error> {
        let (Some(md_id), Some(wg_id)) = (metadata.id(), metadata.workgroup_id()) else {
            return Err(Error::validation(
                "Metadata needs an id and a creator workgroup to build an edit link",
            ));
        };
        if let Some(kind) = &metadata.kind {
            if !tab.applies_to(kind) {
                return Err(Error::validation(format!(
                    "tab {tab} is not available for {kind} metadata"
                )));
            }
        }
        self.edit_url(md_id, wg_id, tab)
    }

    /// Read-only link to a metadata sheet in the web app.
    pub fn view_url(&self, metadata_id: &str) -> Result<Url, Error> {
        checker::ensure_uuid(metadata_id, "Metadata")?;
        join(&self.app, &format!("resources/{metadata_id}"))
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::for_platform(Platform::default())
    }
}

fn join(base: &Url, route: &str) -> Result<Url, Error> {
    let base = base.as_str().trim_end_matches('/');
    let route = route.trim_start_matches('/');
    Ok(Url::parse(&format!("{base}/{route}"))?)
}

// ── Credentials ─────────────────────────────────────────────────────

/// OAuth2 client credentials, plus the user's login for the password grant.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Machine-to-machine access (group application).
    ClientCredentials {
        client_id: String,
        client_secret: SecretString,
    },
    /// User application acting on behalf of `username`.
    Password {
        client_id: String,
        client_secret: SecretString,
        username: String,
        password: SecretString,
    },
}

impl Credentials {
    pub fn client_id(&self) -> &str {
        match self {
            Self::ClientCredentials { client_id, .. } | Self::Password { client_id, .. } => {
                client_id
            }
        }
    }

    fn client_secret(&self) -> &SecretString {
        match self {
            Self::ClientCredentials { client_secret, .. }
            | Self::Password { client_secret, .. } => client_secret,
        }
    }

    fn grant_type(&self) -> &'static str {
        match self {
            Self::ClientCredentials { .. } => "client_credentials",
            Self::Password { .. } => "password",
        }
    }
}

// ── Bearer token ────────────────────────────────────────────────────

/// An access token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct BearerToken {
    access: SecretString,
    expires_at: DateTime<Utc>,
}

impl BearerToken {
    pub fn new(access: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access: SecretString::from(access.into()),
            expires_at,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// True once the token is within `margin` of its expiry (or past it).
    /// A margin reaching past the representable range counts as expiring.
    pub fn is_expiring(&self, margin: TimeDelta) -> bool {
        Utc::now()
            .checked_add_signed(margin)
            .is_none_or(|deadline| deadline >= self.expires_at)
    }

    pub(crate) fn header_value(&self) -> String {
        format!("Bearer {}", self.access.expose_secret())
    }
}

/// Token endpoint response body.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    token_type: Option<String>,
}

/// Exchange `credentials` for a bearer token at `token_url`.
///
/// Every failure of the exchange, transport included, surfaces as
/// [`Error::Authentication`].
pub(crate) async fn request_token(
    http: &reqwest::Client,
    token_url: &Url,
    credentials: &Credentials,
) -> Result<BearerToken, Error> {
    let auth_err = |message: String| Error::Authentication { message };

    let mut form = vec![("grant_type", credentials.grant_type().to_owned())];
    if let Credentials::Password {
        username, password, ..
    } = credentials
    {
        form.push(("username", username.clone()));
        form.push(("password", password.expose_secret().to_owned()));
    }

    debug!(
        grant = credentials.grant_type(),
        client_id = credentials.client_id(),
        "requesting bearer token at {token_url}"
    );

    let resp = http
        .post(token_url.clone())
        .basic_auth(
            credentials.client_id(),
            Some(credentials.client_secret().expose_secret()),
        )
        .form(&form)
        .send()
        .await
        .map_err(|e| auth_err(format!("token endpoint unreachable: {e}")))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| auth_err(format!("failed to read token response: {e}")))?;
    if !status.is_success() {
        return Err(auth_err(format!("token request refused (HTTP {status}): {body}")));
    }

    let token: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| auth_err(format!("unparsable token response: {e}")))?;

    if let Some(kind) = token.token_type.as_deref() {
        if !kind.eq_ignore_ascii_case("bearer") {
            return Err(auth_err(format!("unsupported token type: {kind}")));
        }
    }

    let expires_at = TimeDelta::try_seconds(token.expires_in.max(0))
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| auth_err(format!("token lifetime out of range: {}s", token.expires_in)))?;
    debug!(%expires_at, "bearer token acquired");
    Ok(BearerToken::new(token.access_token, expires_at))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::enums::MetadataType;

    #[test]
    fn platform_endpoints() {
        let prod = Endpoints::for_platform(Platform::Prod);
        assert_eq!(prod.api.as_str(), "https://v1.api.isogeo.com/");
        assert_eq!(prod.token.as_str(), "https://id.api.isogeo.com/oauth/token");

        let qa = Endpoints::for_platform("qa".parse().unwrap());
        assert_eq!(qa.api.host_str(), Some("v1.api.qa.isogeo.com"));
    }

    #[test]
    fn api_url_appends_route_under_base_path() {
        let ep = Endpoints::custom(
            "http://localhost:8080/api/",
            "http://localhost:8080",
            "http://localhost:8080/oauth/token",
        )
        .unwrap();
        assert_eq!(
            ep.api_url("groups/abc/shares").unwrap().as_str(),
            "http://localhost:8080/api/groups/abc/shares"
        );
    }

    #[test]
    fn edit_url_checks_ids() {
        let ep = Endpoints::default();
        let url = ep
            .edit_url(
                "9f6b2c1a0e8d4b7c9a6f5e4d3c2b1a00",
                "32f7e95ec4e94ca3bc1afda960003882",
                EditionTab::Quality,
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://app.isogeo.com/groups/32f7e95ec4e94ca3bc1afda960003882/resources/9f6b2c1a0e8d4b7c9a6f5e4d3c2b1a00/quality"
        );
        assert!(
            ep.edit_url("nope", "32f7e95ec4e94ca3bc1afda960003882", EditionTab::default())
                .unwrap_err()
                .is_validation()
        );
    }

    #[test]
    fn edit_url_for_rejects_missing_tab() {
        let md: Metadata = serde_json::from_value(serde_json::json!({
            "_id": "9f6b2c1a0e8d4b7c9a6f5e4d3c2b1a00",
            "_creator": { "_id": "32f7e95ec4e94ca3bc1afda960003882" },
            "type": "noGeoDataset"
        }))
        .unwrap();
        assert_eq!(md.kind, Some(MetadataType::NoGeoDataset));

        let ep = Endpoints::default();
        assert!(ep.edit_url_for(&md, EditionTab::History).is_err());
        assert!(ep.edit_url_for(&md, EditionTab::Contacts).is_ok());
    }

    #[test]
    fn token_expiry_margin() {
        let token = BearerToken::new("abc", Utc::now() + TimeDelta::seconds(30));
        assert!(token.is_expiring(TimeDelta::seconds(60)));
        assert!(!token.is_expiring(TimeDelta::zero()));
        assert_eq!(token.header_value(), "Bearer abc");
    }

    #[test]
    fn unbounded_margin_counts_as_expiring() {
        let token = BearerToken::new("abc", Utc::now() + TimeDelta::hours(1));
        assert!(token.is_expiring(TimeDelta::MAX));
    }
}
