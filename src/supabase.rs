use anyhow::{Context, Result, anyhow};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;

use crate::config::SupabaseConfig;
use crate::http_client::http_client;
use crate::roster::{NewPlayer, PlayerId, PlayerPatch, PlayerRecord};
use crate::store::RecordStore;

/// PostgREST access to the hosted player table.
pub struct SupabaseStore {
    config: SupabaseConfig,
    client: &'static Client,
    access_token: Option<String>,
}

impl SupabaseStore {
    pub fn new(config: SupabaseConfig, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            config,
            client: http_client(timeout_secs)?,
            access_token: None,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.url, self.config.table)
    }

    /// Signed-in calls carry the user token; everything else runs as `anon`.
    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .access_token
            .as_deref()
            .unwrap_or(self.config.anon_key.as_str());
        req.header("apikey", &self.config.anon_key)
            .header(AUTHORIZATION, format!("Bearer {bearer}"))
    }

    fn select_request(&self, category: &str) -> RequestBuilder {
        let filter = format!("eq.{category}");
        self.authed(self.client.get(self.table_url())).query(&[
            ("select", "*"),
            ("categorie", filter.as_str()),
            ("order", "nom.asc"),
        ])
    }
}

fn check(resp: Response) -> Result<String> {
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, body));
    }
    Ok(body)
}

pub fn parse_players_json(raw: &str) -> Result<Vec<PlayerRecord>> {
    serde_json::from_str(raw).context("invalid player rows json")
}

impl RecordStore for SupabaseStore {
    fn select_by_category(&self, category: &str) -> Result<Vec<PlayerRecord>> {
        let resp = self
            .select_request(category)
            .send()
            .context("request failed")?;
        let body = check(resp)?;
        parse_players_json(&body)
    }

    fn insert(&self, player: &NewPlayer) -> Result<PlayerRecord> {
        let resp = self
            .authed(self.client.post(self.table_url()))
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=representation")
            .json(&[player])
            .send()
            .context("request failed")?;
        let body = check(resp)?;
        parse_players_json(&body)?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("insert returned no row"))
    }

    fn update(&self, id: PlayerId, patch: &PlayerPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let url = format!("{}?id=eq.{id}", self.table_url());
        let resp = self
            .authed(self.client.patch(&url))
            .header(CONTENT_TYPE, "application/json")
            .json(patch)
            .send()
            .context("request failed")?;
        check(resp).map(|_| ())
    }

    fn delete(&self, id: PlayerId) -> Result<()> {
        let url = format!("{}?id=eq.{id}", self.table_url());
        let resp = self
            .authed(self.client.delete(&url))
            .send()
            .context("request failed")?;
        check(resp).map(|_| ())
    }

    fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

#[derive(Debug, Deserialize)]
pub struct AuthUser {
    #[serde(default)]
    pub email: Option<String>,
}

pub fn parse_auth_json(raw: &str) -> Result<AuthTokenResponse> {
    serde_json::from_str(raw).context("invalid auth response json")
}

/// Password grant against the project's auth endpoint.
pub fn sign_in_with_password(
    config: &SupabaseConfig,
    timeout_secs: u64,
    email: &str,
    password: &str,
) -> Result<AuthTokenResponse> {
    let client = http_client(timeout_secs)?;
    let url = format!("{}/auth/v1/token?grant_type=password", config.url);
    let resp = client
        .post(&url)
        .header("apikey", &config.anon_key)
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .context("request failed")?;
    if resp.status() == StatusCode::BAD_REQUEST {
        return Err(anyhow!("invalid email or password"));
    }
    let body = check(resp)?;
    parse_auth_json(&body)
}

pub fn sign_out(config: &SupabaseConfig, timeout_secs: u64, access_token: &str) -> Result<()> {
    let client = http_client(timeout_secs)?;
    let url = format!("{}/auth/v1/logout", config.url);
    let resp = client
        .post(&url)
        .header("apikey", &config.anon_key)
        .header(AUTHORIZATION, format!("Bearer {access_token}"))
        .send()
        .context("request failed")?;
    check(resp).map(|_| ())
}
