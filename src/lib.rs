pub mod board;
pub mod config;
pub mod drag;
pub mod export;
pub mod http_client;
pub mod local_db;
pub mod persist;
pub mod position;
pub mod roster;
pub mod session;
pub mod store;
pub mod supabase;
pub mod worker;
