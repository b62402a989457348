/// OW Career — Logger
/// JSONL event stream, one file per UTC day

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct EventLogger {
    log_dir: PathBuf,
}

impl EventLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        let dir = log_dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!("Cannot create log dir {:?}: {}", dir, e);
        }
        Self { log_dir: dir }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn log<T: Serialize>(&self, event: &T) -> Result<()> {
        let date  = Utc::now().format("%Y-%m-%d").to_string();
        let path  = self.log_dir.join(format!("{date}.jsonl"));
        let line  = serde_json::to_string(event)?;
        let mut f = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(f, "{line}")?;
        Ok(())
    }
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

// ── Event types ───────────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct PlatformResolvedEvent {
    pub ts:       String,
    pub event:    &'static str,   // "PLATFORM_RESOLVED"
    pub username: String,
    pub platform: String,         // "pc" | "psn" | "xbl" | "unknown"
    pub region:   String,         // "us" | "eu" | "unknown"
}

#[derive(Serialize, Debug)]
pub struct ProfileRefreshedEvent {
    pub ts:                 String,
    pub event:              &'static str,   // "PROFILE_REFRESHED"
    pub username:           String,
    pub platform:           String,
    pub region:             String,
    pub ok:                 bool,
    pub player_level:       Option<u16>,
    pub competitive_rank:   Option<u16>,
    pub casual_heroes:      usize,
    pub competitive_heroes: usize,
    pub message:            String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_one_json_line_per_event() {
        let dir = std::env::temp_dir().join(format!("career-logger-{}", std::process::id()));
        let logger = EventLogger::new(&dir);

        for name in ["A#1", "B#2"] {
            logger
                .log(&PlatformResolvedEvent {
                    ts: now_iso(),
                    event: "PLATFORM_RESOLVED",
                    username: name.to_string(),
                    platform: "pc".to_string(),
                    region: "eu".to_string(),
                })
                .unwrap();
        }

        let date = Utc::now().format("%Y-%m-%d").to_string();
        let content = fs::read_to_string(dir.join(format!("{date}.jsonl"))).unwrap();
        let lines: Vec<serde_json::Value> =
            content.lines().map(|l| serde_json::from_str(l).unwrap()).collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "PLATFORM_RESOLVED");
        assert_eq!(lines[1]["username"], "B#2");

        fs::remove_dir_all(&dir).ok();
    }
}
