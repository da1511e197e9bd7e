use std::env;
use std::path::PathBuf;

use crate::persist::app_cache_dir;

pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Seniors A",
    "Seniors B",
    "Seniors 31",
    "U15-U14",
    "U13-U12",
    "U13-U12 2",
    "U7",
    "U9",
    "U11",
];

const DEFAULT_TABLE: &str = "joueurs";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Backend {
    Supabase(SupabaseConfig),
    Local { db_path: PathBuf, admin: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub backend: Backend,
    pub categories: Vec<String>,
    pub default_category: String,
    pub export_dir: PathBuf,
    pub http_timeout_secs: u64,
}

impl AppConfig {
    /// Reads the environment. Call after `.env` files have been loaded.
    pub fn from_env() -> Self {
        let categories = env::var("LINEUP_CATEGORIES")
            .ok()
            .map(|raw| parse_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect());

        let default_category = env::var("LINEUP_DEFAULT_CATEGORY")
            .ok()
            .map(|c| c.trim().to_string())
            .filter(|c| categories.contains(c))
            .unwrap_or_else(|| categories[0].clone());

        let table = non_empty_var("LINEUP_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string());
        let backend = match (non_empty_var("SUPABASE_URL"), non_empty_var("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => Backend::Supabase(SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
                table,
            }),
            _ => Backend::Local {
                db_path: non_empty_var("LINEUP_DB")
                    .map(PathBuf::from)
                    .or_else(|| app_cache_dir().map(|dir| dir.join("roster.sqlite")))
                    .unwrap_or_else(|| PathBuf::from("roster.sqlite")),
                admin: env::var("LINEUP_LOCAL_ADMIN")
                    .map(|v| parse_flag(&v))
                    .unwrap_or(true),
            },
        };

        let export_dir = non_empty_var("LINEUP_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let http_timeout_secs = env::var("LINEUP_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .max(2);

        Self {
            backend,
            categories,
            default_category,
            export_dir,
            http_timeout_secs,
        }
    }

    pub fn backend_label(&self) -> &'static str {
        match self.backend {
            Backend::Supabase(_) => "SUPABASE",
            Backend::Local { .. } => "LOCAL",
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
