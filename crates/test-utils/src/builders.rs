use std::collections::BTreeMap;
use std::path::PathBuf;

use dagrun::config::{ConfigFile, ConfigSection, RawConfigFile, TaskConfig};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                task: BTreeMap::new(),
            },
        }
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.config.task.insert(name.to_string(), task);
        self
    }

    pub fn require_single_entry_point(mut self, val: bool) -> Self {
        self.config.config.require_single_entry_point = val;
        self
    }

    pub fn skip_on_failed_dependency(mut self, val: bool) -> Self {
        self.config.config.skip_on_failed_dependency = val;
        self
    }

    /// The raw config, for tests that exercise validation failures.
    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            task: TaskConfig {
                cmd: cmd.to_string(),
                after: vec![],
                cwd: None,
                env: BTreeMap::new(),
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn cwd(mut self, dir: &str) -> Self {
        self.task.cwd = Some(PathBuf::from(dir));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.task.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
