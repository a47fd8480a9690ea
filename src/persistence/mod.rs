//! Save/load of progression
//!
//! Only progression is stored. Live entities, the current problem and every
//! timer are rebuilt fresh on load. A damaged save never aborts a load:
//! each field that is missing or out of range falls back to its default.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};

use crate::sim::progression::creature_stage_for_level;
use crate::sim::{Badge, Badges, Progression};
use crate::tuning::Tuning;

/// Save format version written alongside the data
pub const SAVE_VERSION: u64 = 1;

#[derive(Debug)]
pub enum PersistenceError {
    Io(io::Error),
    Json(serde_json::Error),
    /// The save parsed, but is not a JSON object
    NotAnObject,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(e) => write!(f, "save storage error: {}", e),
            PersistenceError::Json(e) => write!(f, "save is not valid JSON: {}", e),
            PersistenceError::NotAnObject => write!(f, "save is not a JSON object"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Io(e) => Some(e),
            PersistenceError::Json(e) => Some(e),
            PersistenceError::NotAnObject => None,
        }
    }
}

impl From<io::Error> for PersistenceError {
    fn from(e: io::Error) -> Self {
        PersistenceError::Io(e)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Json(e)
    }
}

/// Somewhere a single save slot lives
pub trait SaveStore {
    /// Raw save text, or `None` if nothing was saved yet
    fn read(&self) -> Result<Option<String>, PersistenceError>;
    fn write(&mut self, data: &str) -> Result<(), PersistenceError>;
    fn clear(&mut self) -> Result<(), PersistenceError>;
}

/// Save slot backed by a file. Writes go to a temp file first, then rename.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }
}

impl SaveStore for FileStore {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, data: &str) -> Result<(), PersistenceError> {
        let tmp = self.tmp_path();
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory save slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Option<String>,
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.slot.clone())
    }

    fn write(&mut self, data: &str) -> Result<(), PersistenceError> {
        self.slot = Some(data.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        self.slot = None;
        Ok(())
    }
}

/// Serialize progression to the save document
pub fn to_json(progress: &Progression) -> Result<String, PersistenceError> {
    let badges: Map<String, Value> = Badge::ALL
        .iter()
        .map(|b| (b.key().to_string(), Value::Bool(progress.badges.get(*b))))
        .collect();

    let doc = json!({
        "version": SAVE_VERSION,
        "level": progress.level,
        "xp": progress.xp,
        "questionsInLevel": progress.questions_in_level,
        "streak": progress.streak,
        "bestStreak": progress.best_streak,
        "totalCorrect": progress.total_correct,
        "totalWrong": progress.total_wrong,
        "fastAnswers": progress.fast_answers,
        "creatureStage": progress.creature_stage,
        "health": progress.health,
        "maxHealth": progress.max_health,
        "badgesAwarded": badges,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse a save document, defaulting any bad field
pub fn from_json(data: &str, tuning: &Tuning) -> Result<Progression, PersistenceError> {
    let value: Value = serde_json::from_str(data)?;
    progression_from_value(&value, tuning)
}

/// Rebuild progression from a parsed save, field by field
pub fn progression_from_value(value: &Value, tuning: &Tuning) -> Result<Progression, PersistenceError> {
    let obj = value.as_object().ok_or(PersistenceError::NotAnObject)?;
    let fields = Fields { obj };

    let level = fields.u32_in("level", 1, u32::MAX).unwrap_or(1);
    let max_health = fields
        .u32_in("maxHealth", 1, u8::MAX as u32)
        .map(|v| v as u8)
        .unwrap_or(tuning.max_health.max(1));
    let health = fields
        .u32_in("health", 1, max_health as u32)
        .map(|v| v as u8)
        .unwrap_or(max_health);
    let questions_in_level = fields
        .u32_in("questionsInLevel", 0, tuning.questions_per_level.saturating_sub(1))
        .unwrap_or(0);
    let streak = fields.u32_in("streak", 0, u32::MAX).unwrap_or(0);
    let best_streak = fields
        .u32_in("bestStreak", 0, u32::MAX)
        .unwrap_or(0)
        .max(streak);
    let total_correct = fields.u32_in("totalCorrect", 0, u32::MAX).unwrap_or(0);
    let total_wrong = fields.u32_in("totalWrong", 0, u32::MAX).unwrap_or(0);
    let fast_answers = fields.u32_in("fastAnswers", 0, u32::MAX).unwrap_or(0);
    let xp = fields.get("xp").and_then(Value::as_u64).unwrap_or(0);

    // Stage is a function of level; a stored value only gets checked
    let creature_stage = creature_stage_for_level(level);
    if let Some(stored) = fields.get("creatureStage").and_then(Value::as_u64)
        && stored != creature_stage as u64
    {
        log::warn!(
            "Save field creatureStage={} does not match level {}, using {}",
            stored,
            level,
            creature_stage
        );
    }

    let mut badges = Badges::default();
    if let Some(saved) = fields.get("badgesAwarded").and_then(Value::as_object) {
        for badge in Badge::ALL {
            if saved.get(badge.key()).and_then(Value::as_bool).unwrap_or(false) {
                badges.unlock(badge);
            }
        }
    }

    let progress = Progression {
        level,
        health,
        max_health,
        streak,
        best_streak,
        total_correct,
        total_wrong,
        fast_answers,
        questions_in_level,
        creature_stage,
        xp,
        badges,
    };
    log::info!("Loaded save at level {}", progress.level);
    Ok(progress)
}

/// Field reader that logs each default it has to apply
struct Fields<'a> {
    obj: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.obj.get(key)
    }

    /// Integer in `min..=max`; `None` (with a warning) if missing, mistyped or out of range
    fn u32_in(&self, key: &str, min: u32, max: u32) -> Option<u32> {
        let raw = self.obj.get(key);
        let parsed = raw
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| (min..=max).contains(v));
        if parsed.is_none() {
            match raw {
                Some(v) => log::warn!("Save field {} has bad value {}, using default", key, v),
                None => log::warn!("Save field {} missing, using default", key),
            }
        }
        parsed
    }
}

/// Write progression to a store
pub fn save_progress(store: &mut dyn SaveStore, progress: &Progression) -> Result<(), PersistenceError> {
    let data = to_json(progress)?;
    store.write(&data)?;
    log::info!("Game saved (level {})", progress.level);
    Ok(())
}

/// Read progression from a store; `Ok(None)` when there is no save
pub fn load_progress(
    store: &dyn SaveStore,
    tuning: &Tuning,
) -> Result<Option<Progression>, PersistenceError> {
    match store.read()? {
        Some(data) => from_json(&data, tuning).map(Some),
        None => {
            log::info!("No saved game found");
            Ok(None)
        }
    }
}
