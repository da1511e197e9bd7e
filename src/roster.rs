use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::Sender;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::position::{Placement, Zone, ZoneScheme, zone_label};
use crate::session::Session;

pub type PlayerId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "GB")]
    Goalkeeper,
    #[serde(rename = "JOUEUR")]
    FieldPlayer,
}

impl Role {
    pub fn code(self) -> &'static str {
        match self {
            Role::Goalkeeper => "GB",
            Role::FieldPlayer => "JOUEUR",
        }
    }

    pub fn from_code(code: &str) -> Option<Role> {
        match code.trim() {
            "GB" => Some(Role::Goalkeeper),
            "JOUEUR" => Some(Role::FieldPlayer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom", default, deserialize_with = "de_optional_text")]
    pub first_name: String,
    #[serde(rename = "numero", default, deserialize_with = "de_jersey")]
    pub number: Option<String>,
    #[serde(rename = "poste")]
    pub role: Role,
    #[serde(rename = "categorie")]
    pub category: String,
    #[serde(rename = "est_sur_terrain", default)]
    pub on_board: bool,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl PlayerRecord {
    pub fn placement(&self) -> Placement {
        Placement {
            on_board: self.on_board,
            x: self.x,
            y: self.y,
        }
    }

    pub fn set_placement(&mut self, placement: Placement) {
        self.on_board = placement.on_board;
        self.x = placement.x;
        self.y = placement.y;
    }

    pub fn zone(&self, scheme: &ZoneScheme) -> Zone {
        self.placement().zone(scheme)
    }

    pub fn number_label(&self) -> &str {
        self.number.as_deref().unwrap_or("")
    }

    /// "Dupont J." as shown under a pitch token.
    pub fn token_label(&self) -> String {
        match self.first_name.chars().next() {
            Some(initial) => format!("{} {initial}.", self.last_name),
            None => self.last_name.clone(),
        }
    }

    /// "D.Jean" as shown in the side lists.
    pub fn list_label(&self) -> String {
        let initial = self.last_name.chars().next().map(String::from).unwrap_or_default();
        format!("{initial}.{}", self.first_name)
    }
}

/// Jersey numbers arrive as text or as a JSON number depending on the column type.
fn de_jersey<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// First names are optional and come back as `null` when never filled in.
fn de_optional_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Profile fields for an insert; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPlayer {
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    #[serde(rename = "numero")]
    pub number: Option<String>,
    #[serde(rename = "poste")]
    pub role: Role,
    #[serde(rename = "categorie")]
    pub category: String,
    #[serde(rename = "est_sur_terrain")]
    pub on_board: bool,
    pub x: f64,
    pub y: f64,
}

impl NewPlayer {
    pub fn new(
        last_name: &str,
        first_name: &str,
        number: Option<&str>,
        role: Role,
        category: &str,
    ) -> Self {
        Self {
            last_name: last_name.trim().to_string(),
            first_name: first_name.trim().to_string(),
            number: number
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            role,
            category: category.to_string(),
            on_board: Placement::POOL.on_board,
            x: Placement::POOL.x,
            y: Placement::POOL.y,
        }
    }
}

/// Partial update; `None` fields are left alone by the store.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PlayerPatch {
    #[serde(rename = "est_sur_terrain", skip_serializing_if = "Option::is_none")]
    pub on_board: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl PlayerPatch {
    pub fn placement(p: Placement) -> Self {
        Self {
            on_board: Some(p.on_board),
            x: Some(p.x),
            y: Some(p.y),
        }
    }

    pub fn coordinates(x: f64, y: f64) -> Self {
        Self {
            on_board: None,
            x: Some(x),
            y: Some(y),
        }
    }

    pub fn off_board() -> Self {
        Self {
            on_board: Some(false),
            x: None,
            y: None,
        }
    }

    pub fn apply(&self, record: &mut PlayerRecord) {
        if let Some(on_board) = self.on_board {
            record.on_board = on_board;
        }
        if let Some(x) = self.x {
            record.x = x;
        }
        if let Some(y) = self.y {
            record.y = y;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.on_board.is_none() && self.x.is_none() && self.y.is_none()
    }
}

/// Work for the store thread.
#[derive(Debug, Clone)]
pub enum StoreCommand {
    List { category: String },
    Insert(NewPlayer),
    Update { id: PlayerId, patch: PlayerPatch },
    Delete { id: PlayerId },
    SetAccessToken(Option<String>),
    SignIn { email: String, password: String },
    SignOut(Session),
}

/// Replies from the store thread.
#[derive(Debug, Clone)]
pub enum Delta {
    SetRoster {
        category: String,
        players: Vec<PlayerRecord>,
    },
    ListFailed {
        category: String,
    },
    PlayerCreated(PlayerRecord),
    SignedIn(Session),
    Log(String),
}

/// The session's copy of one category's roster.
///
/// Every mutation goes through here: the local list changes first, then the
/// matching write is handed to the store thread. Store failures only come back
/// as log lines, so local and remote state can drift until the next reload.
#[derive(Debug, Clone)]
pub struct Roster {
    pub category: String,
    pub categories: Vec<String>,
    pub players: Vec<PlayerRecord>,
    pub scheme: ZoneScheme,
    pub is_admin: bool,
    pub session: Option<Session>,
    pub loading: bool,
    pub selected: usize,
    pub pending_delete: Option<PlayerId>,
    pub logs: VecDeque<String>,
    cmd_tx: Option<Sender<StoreCommand>>,
}

impl Roster {
    pub fn new(
        categories: Vec<String>,
        category: &str,
        cmd_tx: Option<Sender<StoreCommand>>,
    ) -> Self {
        Self {
            category: category.to_string(),
            categories,
            players: Vec::with_capacity(32),
            scheme: ZoneScheme::FOUR_ZONE,
            is_admin: false,
            session: None,
            loading: false,
            selected: 0,
            pending_delete: None,
            logs: VecDeque::with_capacity(200),
            cmd_tx,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    fn send(&mut self, cmd: StoreCommand) {
        let Some(tx) = &self.cmd_tx else {
            self.push_log("[INFO] Store unavailable");
            return;
        };
        if tx.send(cmd).is_err() {
            self.push_log("[WARN] Store request failed");
        }
    }

    pub fn get(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Ask the store for the whole category, ordered by last name.
    ///
    /// Switching category empties the board until the store answers, so
    /// edits and exports never reach the previous category's players.
    pub fn list(&mut self, category: &str) {
        if category != self.category {
            self.category = category.to_string();
            self.players.clear();
            self.selected = 0;
            self.pending_delete = None;
        }
        self.loading = true;
        self.send(StoreCommand::List {
            category: category.to_string(),
        });
    }

    pub fn reload(&mut self) {
        let category = self.category.clone();
        self.list(&category);
    }

    pub fn cycle_category(&mut self, forward: bool) {
        if self.categories.is_empty() {
            return;
        }
        let len = self.categories.len();
        let idx = self
            .categories
            .iter()
            .position(|c| *c == self.category)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        let category = self.categories[next].clone();
        self.push_log(format!("[INFO] Category: {category}"));
        self.list(&category);
    }

    /// The record is added to the list only once the store has assigned an id.
    pub fn create(&mut self, profile: NewPlayer) -> bool {
        if profile.last_name.trim().is_empty() {
            return false;
        }
        self.send(StoreCommand::Insert(profile));
        true
    }

    pub fn request_delete(&mut self, id: PlayerId) {
        if self.get(id).is_some() {
            self.pending_delete = Some(id);
        }
    }

    /// Answer the pending confirmation. Declining touches nothing.
    pub fn resolve_delete(&mut self, confirmed: bool) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        if !confirmed {
            return;
        }
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        if self.players.len() == before {
            return;
        }
        self.clamp_selection();
        self.send(StoreCommand::Delete { id });
    }

    pub fn set_zone(&mut self, id: PlayerId, zone: Zone) {
        let scheme = self.scheme;
        let Some(player) = self.players.iter_mut().find(|p| p.id == id) else {
            return;
        };
        let mut placement = player.placement();
        placement.enter(&scheme, zone);
        player.set_placement(placement);
        let patch = if zone == Zone::Unplaced {
            PlayerPatch::off_board()
        } else {
            PlayerPatch::placement(placement)
        };
        self.send(StoreCommand::Update { id, patch });
    }

    pub fn move_to(&mut self, id: PlayerId, x: f64, y: f64) {
        let patch = PlayerPatch::coordinates(x, y);
        let Some(player) = self.players.iter_mut().find(|p| p.id == id) else {
            return;
        };
        patch.apply(player);
        self.send(StoreCommand::Update { id, patch });
    }

    pub fn remove_from_board(&mut self, id: PlayerId) {
        self.set_zone(id, Zone::Unplaced);
    }

    /// Hand a restored session to the store and unlock editing.
    pub fn resume_session(&mut self, session: Session) {
        self.send(StoreCommand::SetAccessToken(Some(session.access_token.clone())));
        self.session = Some(session);
        self.is_admin = true;
    }

    pub fn sign_in(&mut self, email: &str, password: &str) {
        self.send(StoreCommand::SignIn {
            email: email.to_string(),
            password: password.to_string(),
        });
    }

    /// Locks the board right away and reloads it as a viewer.
    pub fn sign_out(&mut self) {
        self.is_admin = false;
        self.pending_delete = None;
        if let Some(session) = self.session.take() {
            self.send(StoreCommand::SignOut(session));
        }
        self.push_log("[INFO] Signed out");
        self.reload();
    }

    /// Players in `zone`, in list order.
    pub fn in_zone(&self, zone: Zone) -> Vec<&PlayerRecord> {
        self.players
            .iter()
            .filter(|p| p.zone(&self.scheme) == zone)
            .collect()
    }

    pub fn zone_counts(&self) -> HashMap<Zone, usize> {
        let mut counts = HashMap::new();
        for p in &self.players {
            *counts.entry(p.zone(&self.scheme)).or_insert(0) += 1;
        }
        counts
    }

    /// Selection order: pitch, then the secondary zones, then the reserve.
    pub fn view_order(&self) -> Vec<&PlayerRecord> {
        let mut zones = self.scheme.zones().to_vec();
        zones.push(Zone::Unplaced);
        zones.into_iter().flat_map(|z| self.in_zone(z)).collect()
    }

    pub fn selected_player(&self) -> Option<&PlayerRecord> {
        self.view_order().get(self.selected).copied()
    }

    pub fn selected_id(&self) -> Option<PlayerId> {
        self.selected_player().map(|p| p.id)
    }

    pub fn select_id(&mut self, id: PlayerId) {
        if let Some(idx) = self.view_order().iter().position(|p| p.id == id) {
            self.selected = idx;
        }
    }

    pub fn select_next(&mut self) {
        let len = self.players.len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.players.len().saturating_sub(1));
    }
}

pub fn apply_delta(roster: &mut Roster, delta: Delta) {
    match delta {
        Delta::SetRoster { category, players } => {
            if category != roster.category {
                return;
            }
            let keep = roster.selected_id();
            roster.players = players;
            roster.loading = false;
            if roster
                .pending_delete
                .is_some_and(|id| roster.get(id).is_none())
            {
                roster.pending_delete = None;
            }
            match keep {
                Some(id) => roster.select_id(id),
                None => roster.selected = 0,
            }
            roster.clamp_selection();
        }
        Delta::ListFailed { category } => {
            if category == roster.category {
                roster.loading = false;
            }
        }
        Delta::PlayerCreated(record) => {
            if record.category != roster.category {
                return;
            }
            if roster.get(record.id).is_some() {
                return;
            }
            roster.push_log(format!(
                "[INFO] Added {} to {}",
                record.token_label(),
                zone_label(record.zone(&roster.scheme))
            ));
            roster.players.push(record);
        }
        Delta::SignedIn(session) => {
            roster.push_log(format!(
                "[INFO] Signed in as {}",
                session.email.as_deref().unwrap_or("coach")
            ));
            roster.session = Some(session);
            roster.is_admin = true;
        }
        Delta::Log(msg) => roster.push_log(msg),
    }
}
