// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Converter configuration.
//!
//! Options come from two layers: explicit values (from the command line or the environment) and an
//! optional TOML config file. Explicit values take precedence. Once both layers are combined, the
//! result is validated and compiled into a [`ConverterConfig`] before any work starts.

use crate::errors::ConfigError;
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use serde::Deserialize;
use std::{collections::BTreeSet, fmt};
use tracing::{debug, warn};

/// The format of the input report files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// JUnit XML, as produced by most test frameworks.
    Junit,

    /// Google Test XML.
    Gtest,
}

impl ReportType {
    /// Returns the name used for this report type on the command line and in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Junit => "junit",
            Self::Gtest => "gtest",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options specified explicitly, typically on the command line.
///
/// Any option left as `None` falls back to the config file.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// The format of the input report files.
    pub report_type: Option<ReportType>,

    /// The directory to search for report files.
    pub search_folder: Option<Utf8PathBuf>,

    /// A regex searched for in report file names.
    pub report_pattern: Option<String>,

    /// The path to write the converted report to.
    pub output: Option<Utf8PathBuf>,

    /// The root of the source tree declaring Google Test tests.
    pub gtest_src_folder: Option<Utf8PathBuf>,

    /// A regex searched for in source file names.
    pub gtest_src_pattern: Option<String>,
}

/// Where Google Test declarations are looked up.
#[derive(Clone, Debug)]
pub struct GtestSourceConfig {
    /// The root of the source tree.
    pub src_folder: Utf8PathBuf,

    /// Matched against the file name of every file under `src_folder`.
    pub src_pattern: Regex,
}

/// A complete, validated converter configuration.
#[derive(Clone, Debug)]
pub struct ConverterConfig {
    /// The format of the input report files.
    pub report_type: ReportType,

    /// The directory to search for report files.
    pub search_folder: Utf8PathBuf,

    /// Matched against the file name of every file under `search_folder`.
    pub report_pattern: Regex,

    /// The path to write the converted report to.
    pub output: Utf8PathBuf,

    /// Set if and only if `report_type` is [`ReportType::Gtest`].
    pub gtest: Option<GtestSourceConfig>,
}

impl ConverterConfig {
    /// Combines `overrides` with the config file at `config_file`, if any, and validates the
    /// result.
    pub fn resolve(
        overrides: &ConfigOverrides,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigError> {
        Self::resolve_with_warnings(overrides, config_file, &mut DefaultConfigWarnings)
    }

    fn resolve_with_warnings(
        overrides: &ConfigOverrides,
        config_file: Option<&Utf8Path>,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigError> {
        let file = match config_file {
            Some(path) => DeserializedConfig::from_path(path, warnings)?,
            None => DeserializedConfig::default(),
        };

        let report_type = required(overrides.report_type, file.report_type, "--report_type")?;
        let search_folder = required(
            overrides.search_folder.clone(),
            file.search_folder,
            "--search_folder",
        )?;
        let report_pattern = required(
            overrides.report_pattern.clone(),
            file.report_pattern,
            "--report_pattern",
        )?;
        let output = required(overrides.output.clone(), file.output, "--output")?;

        let gtest_src_folder = overrides.gtest_src_folder.clone().or(file.gtest.src_folder);
        let gtest_src_pattern = overrides.gtest_src_pattern.clone().or(file.gtest.src_pattern);

        let gtest = match report_type {
            ReportType::Gtest => {
                let (src_folder, src_pattern) = match (gtest_src_folder, gtest_src_pattern) {
                    (Some(src_folder), Some(src_pattern)) => (src_folder, src_pattern),
                    (src_folder, src_pattern) => {
                        let mut missing = Vec::new();
                        if src_folder.is_none() {
                            missing.push("--gtest_src_folder");
                        }
                        if src_pattern.is_none() {
                            missing.push("--gtest_src_pattern");
                        }
                        return Err(ConfigError::MissingGtestOptions { missing });
                    }
                };
                Some((src_folder, src_pattern))
            }
            ReportType::Junit => {
                if gtest_src_folder.is_some() || gtest_src_pattern.is_some() {
                    debug!("ignoring gtest source options for report type `junit`");
                }
                None
            }
        };

        let report_pattern = compile_pattern("--report_pattern", report_pattern)?;
        let gtest = gtest
            .map(|(src_folder, src_pattern)| {
                Ok::<_, ConfigError>(GtestSourceConfig {
                    src_folder,
                    src_pattern: compile_pattern("--gtest_src_pattern", src_pattern)?,
                })
            })
            .transpose()?;

        Ok(Self {
            report_type,
            search_folder,
            report_pattern,
            output,
            gtest,
        })
    }
}

fn required<T>(
    explicit: Option<T>,
    from_file: Option<T>,
    name: &'static str,
) -> Result<T, ConfigError> {
    explicit
        .or(from_file)
        .ok_or(ConfigError::MissingOption { name })
}

fn compile_pattern(name: &'static str, pattern: String) -> Result<Regex, ConfigError> {
    Regex::new(&pattern).map_err(|error| ConfigError::InvalidPattern {
        name,
        pattern,
        error: Box::new(error),
    })
}

/// Trait for handling config file warnings.
trait ConfigWarnings {
    /// Handle unknown keys found in a config file.
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>);
}

/// Logs warnings through `tracing`.
struct DefaultConfigWarnings;

impl ConfigWarnings for DefaultConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>) {
        let mut unknown_str = String::new();
        if unknown.len() == 1 {
            // Print this on the same line.
            unknown_str.push_str("key: ");
            unknown_str.extend(unknown.iter().map(String::as_str));
        } else {
            unknown_str.push_str("keys:\n");
            for ignored_key in unknown {
                unknown_str.push_str("\n  - ");
                unknown_str.push_str(ignored_key);
            }
        }

        warn!("in config file {config_file}, ignoring unknown configuration {unknown_str}");
    }
}

/// The config file, as deserialized.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedConfig {
    #[serde(default)]
    report_type: Option<ReportType>,
    #[serde(default)]
    search_folder: Option<Utf8PathBuf>,
    #[serde(default)]
    report_pattern: Option<String>,
    #[serde(default)]
    output: Option<Utf8PathBuf>,
    #[serde(default)]
    gtest: DeserializedGtestConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedGtestConfig {
    #[serde(default)]
    src_folder: Option<Utf8PathBuf>,
    #[serde(default)]
    src_pattern: Option<String>,
}

impl DeserializedConfig {
    /// Loads the config file at `path`, resolving relative paths in it against its directory.
    fn from_path(path: &Utf8Path, warnings: &mut impl ConfigWarnings) -> Result<Self, ConfigError> {
        debug!("loading config file from {path}");
        let contents = std::fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.to_owned(),
            error,
        })?;

        let (mut config, unknown) =
            Self::deserialize_toml(&contents).map_err(|error| ConfigError::Parse {
                path: path.to_owned(),
                error,
            })?;

        if !unknown.is_empty() {
            warnings.unknown_config_keys(path, &unknown);
        }

        let config_dir = path.parent().unwrap_or(Utf8Path::new(""));
        for config_path in [
            &mut config.search_folder,
            &mut config.output,
            &mut config.gtest.src_folder,
        ]
        .into_iter()
        .flatten()
        {
            if config_path.is_relative() {
                *config_path = config_dir.join(&*config_path);
            }
        }

        Ok(config)
    }

    fn deserialize_toml(contents: &str) -> Result<(Self, BTreeSet<String>), toml::de::Error> {
        let deserializer = toml::Deserializer::parse(contents)?;
        let mut unknown = BTreeSet::new();
        let config: DeserializedConfig = serde_ignored::deserialize(deserializer, |path| {
            unknown.insert(path.to_string());
        })?;
        Ok((config, unknown))
    }
}
