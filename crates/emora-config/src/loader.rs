// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./emora.toml` > `~/.config/emora/emora.toml` > `/etc/emora/emora.toml`
//! with environment variable overrides via `EMORA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::EmoraConfig;

/// Top-level sections that environment variables may target.
const SECTIONS: &[&str] = &["agent", "storage", "retrieval", "conversation", "persona"];

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/emora/emora.toml";

/// Local configuration file, resolved against the working directory.
pub const LOCAL_CONFIG_PATH: &str = "emora.toml";

/// Path of the per-user XDG configuration file.
pub fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("emora/emora.toml"))
        .unwrap_or_default()
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/emora/emora.toml` (system-wide)
/// 3. `~/.config/emora/emora.toml` (user XDG config)
/// 4. `./emora.toml` (local directory)
/// 5. `EMORA_*` environment variables
pub fn load_config() -> Result<EmoraConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an in-memory TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<EmoraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EmoraConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<EmoraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EmoraConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchical config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(EmoraConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Create the environment variable provider.
///
/// Only the leading section name is split off, so `EMORA_RETRIEVAL_TOP_K`
/// maps to `retrieval.top_k` rather than `retrieval.top.k`.
fn env_provider() -> Env {
    Env::prefixed("EMORA_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
