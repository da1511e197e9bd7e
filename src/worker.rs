use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::config::AppConfig;
use crate::roster::{Delta, StoreCommand};
use crate::session;
use crate::store::RecordStore;

pub fn spawn_store_worker(
    store: Box<dyn RecordStore>,
    config: AppConfig,
    tx: Sender<Delta>,
    cmd_rx: Receiver<StoreCommand>,
) {
    thread::spawn(move || run_store_worker(store, &config, &tx, cmd_rx));
}

/// Executes store commands until the command channel closes. Failures are
/// reported as `[WARN]` log lines and never retried.
pub fn run_store_worker(
    mut store: Box<dyn RecordStore>,
    config: &AppConfig,
    tx: &Sender<Delta>,
    cmd_rx: Receiver<StoreCommand>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        handle_command(store.as_mut(), config, tx, cmd);
    }
}

fn handle_command(
    store: &mut dyn RecordStore,
    config: &AppConfig,
    tx: &Sender<Delta>,
    cmd: StoreCommand,
) {
    match cmd {
        StoreCommand::List { category } => match store.select_by_category(&category) {
            Ok(players) => {
                let _ = tx.send(Delta::SetRoster { category, players });
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[WARN] Load {category} error: {err:#}")));
                let _ = tx.send(Delta::ListFailed { category });
            }
        },
        StoreCommand::Insert(player) => match store.insert(&player) {
            Ok(record) => {
                let _ = tx.send(Delta::PlayerCreated(record));
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] Add {} error: {err:#}",
                    player.last_name
                )));
            }
        },
        StoreCommand::Update { id, patch } => {
            if let Err(err) = store.update(id, &patch) {
                let _ = tx.send(Delta::Log(format!("[WARN] Update #{id} error: {err:#}")));
            }
        }
        StoreCommand::Delete { id } => {
            if let Err(err) = store.delete(id) {
                let _ = tx.send(Delta::Log(format!("[WARN] Delete #{id} error: {err:#}")));
            }
        }
        StoreCommand::SetAccessToken(token) => store.set_access_token(token),
        StoreCommand::SignIn { email, password } => {
            match session::sign_in(config, &email, &password) {
                Ok(session) => {
                    store.set_access_token(Some(session.access_token.clone()));
                    let _ = tx.send(Delta::SignedIn(session));
                }
                Err(err) => {
                    let _ = tx.send(Delta::Log(format!("[WARN] Sign-in failed: {err:#}")));
                }
            }
        }
        StoreCommand::SignOut(session) => {
            store.set_access_token(None);
            if let Err(err) = session::sign_out(config, &session) {
                let _ = tx.send(Delta::Log(format!("[WARN] Sign-out error: {err:#}")));
            }
        }
    }
}
