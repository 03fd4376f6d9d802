// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns the editor configuration and the lazily built
// image codec.
//
// Everything is Arc-wrapped so the struct can be cloned into tasks.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use redact_core::{EditorConfig, RedactError, Result};
use redact_render::LazyService;
use tracing::{info, warn};

use super::data_dir;
use crate::codec::ImageCodec;

#[derive(Clone)]
pub struct AppServices {
    data_dir: PathBuf,
    config: Arc<Mutex<EditorConfig>>,
    codec: Arc<LazyService<ImageCodec>>,
}

impl AppServices {
    /// Initialise services in the default data directory.
    pub fn init() -> Result<Self> {
        Self::with_data_dir(data_dir::data_dir())
    }

    /// Initialise services rooted at `dir`.
    ///
    /// A missing, unreadable, or invalid `config.json` falls back to the
    /// default configuration.
    pub fn with_data_dir(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)?;
        info!(path = %dir.display(), "initialising app services");

        let config = match load_config(&dir) {
            Some(config) => match config.validate() {
                Ok(()) => config,
                Err(e) => {
                    warn!(error = %e, "stored config rejected, using defaults");
                    EditorConfig::default()
                }
            },
            None => EditorConfig::default(),
        };

        Ok(Self {
            data_dir: dir,
            config: Arc::new(Mutex::new(config)),
            codec: Arc::new(LazyService::new("image-codec")),
        })
    }

    // -- Config Persistence --------------------------------------------------

    /// A clone of the current config.
    pub fn config(&self) -> EditorConfig {
        self.config
            .lock()
            .map(|config| config.clone())
            .unwrap_or_default()
    }

    /// Validate, update, and persist the config.
    pub fn save_config(&self, config: &EditorConfig) -> Result<()> {
        config.validate()?;
        *self
            .config
            .lock()
            .map_err(|_| RedactError::Config("config lock poisoned".into()))? = config.clone();
        persist_config(&self.data_dir, config)
    }

    // -- Codec ---------------------------------------------------------------

    /// The shared image codec, built on first use.
    pub async fn codec(&self) -> Result<&ImageCodec> {
        self.codec.initialize(|| async { ImageCodec::new() }).await
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

// -- Config file persistence -------------------------------------------------

const CONFIG_FILE: &str = "config.json";

fn load_config(data_dir: &Path) -> Option<EditorConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config file unreadable");
            None
        }
    }
}

fn persist_config(data_dir: &Path, config: &EditorConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}
