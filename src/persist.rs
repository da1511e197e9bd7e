use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::roster::{PlayerRecord, Roster};
use crate::session::Session;

const CACHE_DIR: &str = "lineup_board";
const CACHE_FILE: &str = "cache.json";
const CACHE_VERSION: u32 = 1;

/// What survives a restart: the last board shown, a copy of each roster seen
/// (shown until the store answers) and the signed-in session.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CacheFile {
    pub version: u32,
    #[serde(default)]
    pub last_category: Option<String>,
    #[serde(default)]
    pub rosters: HashMap<String, Vec<PlayerRecord>>,
    #[serde(default)]
    pub session: Option<Session>,
}

pub fn load_cache() -> Option<CacheFile> {
    load_cache_file(&cache_path()?)
}

pub fn save_from_roster(roster: &Roster) {
    let Some(path) = cache_path() else {
        return;
    };
    let mut cache = load_cache_file(&path).unwrap_or_default();
    update_cache(&mut cache, roster);
    let _ = save_cache_file(&path, &cache);
}

/// Show the cached copy of the active category while the real list loads.
pub fn restore_roster(roster: &mut Roster, cache: &CacheFile) {
    if let Some(players) = cache.rosters.get(&roster.category) {
        roster.players = players.clone();
    }
}

pub fn update_cache(cache: &mut CacheFile, roster: &Roster) {
    cache.version = CACHE_VERSION;
    cache.last_category = Some(roster.category.clone());
    let same_category = roster.players.iter().all(|p| p.category == roster.category);
    if !roster.loading && same_category {
        cache
            .rosters
            .insert(roster.category.clone(), roster.players.clone());
    }
    cache.session = roster.session.clone();
}

pub fn load_cache_file(path: &Path) -> Option<CacheFile> {
    let raw = fs::read_to_string(path).ok()?;
    let cache = serde_json::from_str::<CacheFile>(&raw).ok()?;
    if cache.version != CACHE_VERSION {
        return None;
    }
    Some(cache)
}

pub fn save_cache_file(path: &Path, cache: &CacheFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("create cache dir {}", dir.display()))?;
    }
    let json = serde_json::to_string(cache).context("serialize board cache")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write board cache")?;
    fs::rename(&tmp, path).context("swap board cache")?;
    Ok(())
}

pub fn app_cache_dir() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn cache_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(CACHE_FILE))
}
