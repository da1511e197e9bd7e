use std::path::Path;

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::roster::{NewPlayer, PlayerId, PlayerPatch, PlayerRecord, Role};
use crate::store::RecordStore;

/// SQLite copy of the remote `joueurs` table, for running without a backend.
pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create db dir {}", parent.display()))?;
        }
        let conn =
            Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn get(&self, id: PlayerId) -> Result<Option<PlayerRecord>> {
        self.conn
            .query_row(
                r#"
                SELECT id, nom, prenom, numero, poste, categorie, x, y, est_sur_terrain
                FROM joueurs
                WHERE id = ?1
                "#,
                params![id],
                decode_row,
            )
            .optional()
            .context("query player by id")
    }
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS joueurs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nom TEXT NOT NULL,
            prenom TEXT NOT NULL DEFAULT '',
            numero TEXT NULL,
            poste TEXT NOT NULL,
            categorie TEXT NOT NULL,
            x REAL NOT NULL DEFAULT 0,
            y REAL NOT NULL DEFAULT 0,
            est_sur_terrain INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_joueurs_categorie ON joueurs(categorie);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

fn decode_row(row: &Row<'_>) -> rusqlite::Result<PlayerRecord> {
    let poste: String = row.get(4)?;
    Ok(PlayerRecord {
        id: row.get(0)?,
        last_name: row.get(1)?,
        first_name: row.get(2)?,
        number: row.get(3)?,
        role: Role::from_code(&poste).unwrap_or(Role::FieldPlayer),
        category: row.get(5)?,
        x: row.get(6)?,
        y: row.get(7)?,
        on_board: row.get::<_, i64>(8)? != 0,
    })
}

impl RecordStore for LocalStore {
    fn select_by_category(&self, category: &str) -> Result<Vec<PlayerRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                r#"
                SELECT id, nom, prenom, numero, poste, categorie, x, y, est_sur_terrain
                FROM joueurs
                WHERE categorie = ?1
                ORDER BY nom COLLATE NOCASE ASC, id ASC
                "#,
            )
            .context("prepare roster query")?;

        let rows = stmt
            .query_map(params![category], decode_row)
            .context("query roster")?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("decode player row")?);
        }
        Ok(out)
    }

    fn insert(&self, player: &NewPlayer) -> Result<PlayerRecord> {
        self.conn
            .execute(
                r#"
                INSERT INTO joueurs (nom, prenom, numero, poste, categorie, x, y, est_sur_terrain)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    player.last_name,
                    player.first_name,
                    player.number,
                    player.role.code(),
                    player.category,
                    player.x,
                    player.y,
                    bool_to_i64(player.on_board),
                ],
            )
            .context("insert player")?;
        let id = self.conn.last_insert_rowid();
        self.get(id)?
            .ok_or_else(|| anyhow!("inserted player {id} not found"))
    }

    fn update(&self, id: PlayerId, patch: &PlayerPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        self.conn
            .execute(
                r#"
                UPDATE joueurs SET
                    est_sur_terrain = COALESCE(?2, est_sur_terrain),
                    x = COALESCE(?3, x),
                    y = COALESCE(?4, y)
                WHERE id = ?1
                "#,
                params![id, patch.on_board.map(bool_to_i64), patch.x, patch.y],
            )
            .with_context(|| format!("update player {id}"))?;
        Ok(())
    }

    fn delete(&self, id: PlayerId) -> Result<()> {
        self.conn
            .execute("DELETE FROM joueurs WHERE id = ?1", params![id])
            .with_context(|| format!("delete player {id}"))?;
        Ok(())
    }
}

fn bool_to_i64(v: bool) -> i64 {
    if v { 1 } else { 0 }
}
