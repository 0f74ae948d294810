// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration support for paracept.
//!
//! Repository configuration in `.config/paracept.toml` is layered on top of the
//! [default config](ParaceptConfig::DEFAULT_CONFIG).

use crate::errors::ConfigParseError;
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::Deserialize;

/// Overall configuration for paracept.
#[derive(Clone, Debug)]
pub struct ParaceptConfig {
    project_root: Utf8PathBuf,
    inner: ParaceptConfigImpl,
}

impl ParaceptConfig {
    /// The default location of the config within the project root.
    pub const CONFIG_PATH: &'static str = ".config/paracept.toml";

    /// Contains the default config as a TOML file.
    ///
    /// Repository-specific configuration is layered on top of the default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the config from the given file, or if not specified from `.config/paracept.toml` in
    /// the project root. The latter is optional.
    pub fn from_sources(
        project_root: impl Into<Utf8PathBuf>,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        let project_root = project_root.into();
        let (config_file, source) = match config_file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = project_root.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };

        let inner = Self::make_default_config()
            .add_source(source)
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|err| ConfigParseError::new(config_file, err))?;

        Ok(Self {
            project_root,
            inner,
        })
    }

    /// Returns the default config.
    pub fn default_config(project_root: impl Into<Utf8PathBuf>) -> Self {
        let inner = Self::make_default_config()
            .build()
            .expect("default config is always valid")
            .try_deserialize()
            .expect("default config is always valid");
        Self {
            project_root: project_root.into(),
            inner,
        }
    }

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    /// The project root that relative paths are resolved against.
    pub fn project_root(&self) -> &Utf8Path {
        &self.project_root
    }

    /// The prefix group files are written to, resolved against the project root.
    pub fn groups_prefix(&self) -> Utf8PathBuf {
        self.resolve(&self.inner.split.groups_prefix)
    }

    /// The time report path, resolved against the project root.
    pub fn time_report(&self) -> Utf8PathBuf {
        self.resolve(&self.inner.split.time_report)
    }

    /// The failed-tests report path, resolved against the project root.
    pub fn failed_report(&self) -> Utf8PathBuf {
        self.resolve(&self.inner.split.failed_report)
    }

    /// The directory searched for whole test files, relative to the project root.
    pub fn tests_from(&self) -> &Utf8Path {
        &self.inner.split.files.tests_from
    }

    /// The directory name skipped when searching for test files. Empty means nothing is skipped.
    pub fn exclude_path(&self) -> &str {
        &self.inner.split.files.exclude_path
    }

    /// File name patterns for whole test files.
    pub fn file_patterns(&self) -> &[String] {
        &self.inner.split.files.patterns
    }

    /// The file name pattern for failed-tests reports picked up from directories.
    pub fn failed_report_pattern(&self) -> &str {
        &self.inner.merge.failed_report_pattern
    }

    /// Resolves a possibly-relative path against the project root.
    pub fn resolve(&self, path: impl AsRef<Utf8Path>) -> Utf8PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_owned()
        } else {
            self.project_root.join(path)
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ParaceptConfigImpl {
    split: SplitConfig,
    merge: MergeConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SplitConfig {
    // Not a path: the prefix is concatenated with the group index.
    groups_prefix: String,
    time_report: Utf8PathBuf,
    failed_report: Utf8PathBuf,
    files: FilesConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct FilesConfig {
    tests_from: Utf8PathBuf,
    exclude_path: String,
    patterns: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct MergeConfig {
    failed_report_pattern: String,
}
