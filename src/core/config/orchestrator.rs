use crate::core::config::data::Config;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::SystemTime;

#[derive(Default)]
struct ConfigCacheState {
    config: Option<Config>,
    modified: Option<SystemTime>,
}

/// Caches the parsed config file and reloads it when its mtime changes.
pub struct ConfigOrchestrator {
    path: PathBuf,
    state: Mutex<ConfigCacheState>,
}

static CONFIG_ORCHESTRATOR: OnceLock<ConfigOrchestrator> = OnceLock::new();

impl ConfigOrchestrator {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: Mutex::new(ConfigCacheState::default()),
        }
    }

    pub fn global() -> Result<&'static ConfigOrchestrator, Box<dyn Error>> {
        if let Some(orchestrator) = CONFIG_ORCHESTRATOR.get() {
            return Ok(orchestrator);
        }
        let path = Config::get_config_path()?;
        Ok(CONFIG_ORCHESTRATOR.get_or_init(|| ConfigOrchestrator::new(path)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, ConfigCacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refresh(&self, state: &mut ConfigCacheState) -> Result<Config, Box<dyn Error>> {
        let disk_modified = Self::modified_time(&self.path);
        if state.config.is_none() || state.modified != disk_modified {
            let config = Config::load_from_path(&self.path)?;
            state.modified = disk_modified;
            state.config = Some(config);
        }
        Ok(state.config.clone().unwrap_or_default())
    }

    pub fn load_with_cache(&self) -> Result<Config, Box<dyn Error>> {
        let mut state = self.lock();
        self.refresh(&mut state)
    }

    pub fn persist(&self, config: Config) -> Result<(), Box<dyn Error>> {
        config.save_to_path(&self.path)?;
        let mut state = self.lock();
        state.modified = Self::modified_time(&self.path);
        state.config = Some(config);
        Ok(())
    }

    pub fn mutate<F, T>(&self, mutator: F) -> Result<T, Box<dyn Error>>
    where
        F: FnOnce(&mut Config) -> Result<T, Box<dyn Error>>,
    {
        let mut working = {
            let mut state = self.lock();
            self.refresh(&mut state)?
        };
        let result = mutator(&mut working)?;
        self.persist(working)?;
        Ok(result)
    }

    fn modified_time(path: &Path) -> Option<SystemTime> {
        fs::metadata(path).ok()?.modified().ok()
    }
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn Error>> {
        ConfigOrchestrator::global()?.load_with_cache()
    }

    pub fn mutate<F, T>(mutator: F) -> Result<T, Box<dyn Error>>
    where
        F: FnOnce(&mut Config) -> Result<T, Box<dyn Error>>,
    {
        ConfigOrchestrator::global()?.mutate(mutator)
    }

    /// Location of the config file in use.
    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(ConfigOrchestrator::global()?.path().to_path_buf())
    }
}
