use anyhow::Result;

use crate::config::{AppConfig, Backend};
use crate::local_db::LocalStore;
use crate::roster::{NewPlayer, PlayerId, PlayerPatch, PlayerRecord};
use crate::supabase::SupabaseStore;

/// Durable player table. Plain CRUD: no versions, last write wins.
pub trait RecordStore: Send {
    /// All players of `category`, ordered by last name ascending.
    fn select_by_category(&self, category: &str) -> Result<Vec<PlayerRecord>>;

    /// Store a new player and return it with its assigned id.
    fn insert(&self, player: &NewPlayer) -> Result<PlayerRecord>;

    fn update(&self, id: PlayerId, patch: &PlayerPatch) -> Result<()>;

    fn delete(&self, id: PlayerId) -> Result<()>;

    /// Credentials for later calls; stores without auth ignore it.
    fn set_access_token(&mut self, _token: Option<String>) {}
}

pub fn open_store(config: &AppConfig) -> Result<Box<dyn RecordStore>> {
    match &config.backend {
        Backend::Supabase(remote) => Ok(Box::new(SupabaseStore::new(
            remote.clone(),
            config.http_timeout_secs,
        )?)),
        Backend::Local { db_path, .. } => Ok(Box::new(LocalStore::open(db_path)?)),
    }
}
