use anyhow::{Result, bail};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, Backend};
use crate::supabase;

/// A signed-in coach. Holding one is what unlocks the editing controls; the
/// store decides what the token may actually write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl Session {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

const LOCAL_TOKEN: &str = "local";

pub fn now_secs() -> i64 {
    Utc::now().timestamp()
}

pub fn sign_in(config: &AppConfig, email: &str, password: &str) -> Result<Session> {
    if email.trim().is_empty() || password.is_empty() {
        bail!("email and password are required");
    }
    let remote = match &config.backend {
        Backend::Supabase(remote) => remote,
        Backend::Local { admin: true, .. } => {
            return Ok(Session {
                access_token: LOCAL_TOKEN.to_string(),
                email: Some(email.trim().to_string()),
                expires_at: None,
            });
        }
        Backend::Local { admin: false, .. } => bail!("editing is disabled for this local board"),
    };
    let resp =
        supabase::sign_in_with_password(remote, config.http_timeout_secs, email.trim(), password)?;
    let expires_at = resp
        .expires_at
        .or_else(|| resp.expires_in.map(|secs| now_secs() + secs));
    Ok(Session {
        access_token: resp.access_token,
        email: resp
            .user
            .and_then(|u| u.email)
            .or_else(|| Some(email.trim().to_string())),
        expires_at,
    })
}

pub fn sign_out(config: &AppConfig, session: &Session) -> Result<()> {
    match &config.backend {
        Backend::Supabase(remote) => {
            supabase::sign_out(remote, config.http_timeout_secs, &session.access_token)
        }
        Backend::Local { .. } => Ok(()),
    }
}

/// The board's only permission check.
pub fn is_privileged(config: &AppConfig, session: Option<&Session>, now: i64) -> bool {
    match &config.backend {
        Backend::Local { admin, .. } => *admin,
        Backend::Supabase(_) => session.is_some_and(|s| !s.is_expired(now)),
    }
}

/// Drop a cached session that has run out.
pub fn restore(session: Option<Session>, now: i64) -> Option<Session> {
    session.filter(|s| !s.is_expired(now))
}
