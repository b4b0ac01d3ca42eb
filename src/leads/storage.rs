use super::sample::sample_leads;
use super::types::Lead;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed name of the persisted collection
pub const LEADS_FILE: &str = "leads.json";

/// Get the default lead collection path (<data dir>/lead-desk/leads.json)
pub fn get_leads_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("lead-desk"))
        .unwrap_or_else(crate::config::get_config_dir)
        .join(LEADS_FILE)
}

/// What was found at the lead file path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// No file yet
    Missing,
    /// A blank file or an empty array
    Empty,
    Loaded,
    /// The file exists but could not be read or parsed
    Corrupt,
}

/// Load the lead collection from a JSON file
///
/// A missing, unreadable, or corrupt file yields an empty collection. Use
/// [`load_leads_with_state`] to tell those cases apart.
pub fn load_leads(path: &Path) -> Vec<Lead> {
    load_leads_with_state(path).0
}

/// Load the lead collection and report what was on disk
pub fn load_leads_with_state(path: &Path) -> (Vec<Lead>, StoreState) {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no lead file yet");
        return (Vec::new(), StoreState::Missing);
    }

    match read_leads(path) {
        Ok(leads) if leads.is_empty() => (leads, StoreState::Empty),
        Ok(leads) => {
            tracing::debug!(count = leads.len(), path = %path.display(), "loaded leads");
            (leads, StoreState::Loaded)
        }
        Err(e) => {
            tracing::warn!("Ignoring unreadable lead file: {:#}", e);
            (Vec::new(), StoreState::Corrupt)
        }
    }
}

fn read_leads(path: &Path) -> Result<Vec<Lead>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read lead file at {}", path.display()))?;

    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let leads: Vec<Lead> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse lead file at {}", path.display()))?;

    Ok(leads)
}

/// `<path>.bak`, where a corrupt lead file is copied before anything can
/// overwrite it
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Load the collection for a command.
///
/// A missing or empty store is seeded with the sample leads (and saved) when
/// `seed_when_empty` is set. A corrupt store is never seeded or written: it
/// is copied to [`backup_path`] and an empty collection is returned, so a
/// later save cannot destroy the only copy.
pub fn open_leads(path: &Path, seed_when_empty: bool, now: DateTime<Utc>) -> Result<Vec<Lead>> {
    let (leads, state) = load_leads_with_state(path);

    match state {
        StoreState::Missing | StoreState::Empty if seed_when_empty => {
            let samples = sample_leads(now);
            save_leads(path, &samples)?;
            tracing::debug!(count = samples.len(), "seeded sample leads");
            Ok(samples)
        }
        StoreState::Corrupt => {
            let backup = backup_path(path);
            fs::copy(path, &backup).with_context(|| {
                format!("Failed to back up unreadable lead file to {}", backup.display())
            })?;
            tracing::warn!(
                "Lead file {} could not be read; a copy was kept at {}",
                path.display(),
                backup.display()
            );
            Ok(leads)
        }
        _ => Ok(leads),
    }
}

/// Save the whole lead collection to a JSON file atomically
///
/// The file is either fully replaced or left as it was. Creates the parent
/// directory if it doesn't exist.
pub fn save_leads(path: &Path, leads: &[Lead]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory at {}", parent.display())
            })?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, leads).context("Failed to serialize leads")?;

    file.commit().context("Failed to save leads")?;

    tracing::debug!(count = leads.len(), path = %path.display(), "saved leads");
    Ok(())
}
