use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use idea_miner::{IdeaCluster, SynthesizedIdea};

/// The output of one engine run for a window length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRun {
    pub window_days: u32,
    pub generated_at: i64,
    pub ideas: Vec<IdeaCluster>,
    #[serde(default)]
    pub details: Vec<SynthesizedIdea>,
}

/// JSON file of runs keyed by window length. A new run for a window replaces
/// the previous one wholesale.
pub struct IdeaStore {
    path: PathBuf,
    runs: Mutex<BTreeMap<String, StoredRun>>,
}

impl IdeaStore {
    pub async fn load(path: PathBuf) -> Result<Self, String> {
        let runs = if path.exists() {
            let data = tokio::fs::read_to_string(&path)
                .await
                .map_err(|err| format!("failed to read idea store: {}", err))?;
            if data.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&data)
                    .map_err(|err| format!("failed to parse idea store: {}", err))?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            runs: Mutex::new(runs),
        })
    }

    pub async fn get(&self, window_days: u32) -> Option<StoredRun> {
        let guard = self.runs.lock().await;
        guard.get(&window_key(window_days)).cloned()
    }

    /// Stores `run` and returns the run it superseded, if any.
    pub async fn replace(&self, run: StoredRun) -> Result<Option<StoredRun>, String> {
        let mut guard = self.runs.lock().await;
        let previous = guard.insert(window_key(run.window_days), run);
        self.persist(&guard).await?;
        Ok(previous)
    }

    async fn persist(&self, runs: &BTreeMap<String, StoredRun>) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent).await?;
        }
        let payload = serde_json::to_string_pretty(runs)
            .map_err(|err| format!("failed to serialize idea store: {}", err))?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, payload)
            .await
            .map_err(|err| format!("failed to write idea store: {}", err))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|err| format!("failed to finalize idea store: {}", err))?;
        Ok(())
    }
}

fn window_key(window_days: u32) -> String {
    format!("{}d", window_days)
}

async fn ensure_dir(path: &Path) -> Result<(), String> {
    if path.as_os_str().is_empty() || path.exists() {
        return Ok(());
    }
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|err| format!("failed to create idea store dir: {}", err))
}
