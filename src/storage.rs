use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;

use crate::store::AppState;

/// Returns the path to the state file (`state.json`).
///
/// The path is determined in the following order:
/// 1. `HABITUAL_DB` environment variable.
/// 2. `~/.local/share/habitual/state.json` (on Linux).
/// 3. `./state.json` (fallback).
fn state_path() -> PathBuf {
    std::env::var("HABITUAL_DB").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("habitual");
        if !p.exists() {
            let _ = fs::create_dir_all(&p);
        }
        p.push("state.json");
        p
    })
}

/// Loads the persisted state.
///
/// Returns an empty default state if the file does not exist or cannot be
/// read or parsed; a damaged blob degrades to a fresh start rather than an
/// error.
pub fn load_state() -> AppState {
    let path = state_path();
    if !path.exists() {
        return AppState::default();
    }
    let mut f = match OpenOptions::new().read(true).open(&path) {
        Ok(f) => f,
        Err(_) => return AppState::default(),
    };
    let mut s = String::new();
    if f.read_to_string(&mut s).is_err() {
        return AppState::default();
    }
    serde_json::from_str(&s).unwrap_or_default()
}

/// Writes the full state to the state file, overwriting it.
///
/// Called after every mutation. A failure here leaves the in-memory state
/// authoritative for the session; callers surface it as a warning.
pub fn save_state(state: &AppState) -> std::io::Result<()> {
    let path = state_path();
    let s = serde_json::to_string_pretty(state).map_err(std::io::Error::other)?;
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Deletes the state file.
pub fn delete_database() -> std::io::Result<()> {
    let path = state_path();
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
