use std::path::PathBuf;

use anyhow::{Result, anyhow};

use lineup_board::config::AppConfig;
use lineup_board::export;
use lineup_board::position::ZoneScheme;
use lineup_board::store;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = AppConfig::from_env();
    let category = arg_value("--category").unwrap_or_else(|| config.default_category.clone());
    if !config.categories.contains(&category) {
        return Err(anyhow!(
            "unknown category {category:?} (known: {})",
            config.categories.join(", ")
        ));
    }
    let out_dir = arg_value("--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.export_dir.clone());

    let store = store::open_store(&config)?;
    let players = store.select_by_category(&category)?;
    let report = export::export_lineup(&out_dir, &category, &players, &ZoneScheme::FOUR_ZONE)?;

    println!("Lineup export complete");
    println!("Backend: {}", config.backend_label());
    println!("Category: {category}");
    println!("Players: {} ({} on field)", report.listed, report.on_field);
    println!("PNG: {}", report.png.display());
    println!("XLSX: {}", report.sheet.display());
    Ok(())
}

/// Accepts both `--flag value` and `--flag=value`.
fn arg_value(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
