// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data directory resolution.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "redactwerk";

/// Return the application data directory, creating it if needed.
pub fn data_dir() -> PathBuf {
    data_dir_under(&base_dir())
}

/// The application directory inside `base`, created if missing.
pub fn data_dir_under(base: &Path) -> PathBuf {
    let dir = base.join(APP_DIR);
    std::fs::create_dir_all(&dir).ok();
    dir
}

fn base_dir() -> PathBuf {
    // XDG data dir, then ~/.local/share
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_app_directory() {
        let base = tempfile::tempdir().unwrap();
        let dir = data_dir_under(base.path());
        assert!(dir.is_dir());
        assert!(dir.ends_with(APP_DIR));
    }
}
