// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use stockly_app::{Session, UserRole};

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    role: String,
    username: String,
}

/// Reads the persisted session, if any. A missing file means signed out;
/// a corrupt file is an error so the user can delete it deliberately.
pub fn load(path: &Path) -> Result<Option<Session>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("read session file {}", path.display()))?;
    let stored: StoredSession = toml::from_str(&raw)
        .with_context(|| format!("decode session file {}; delete it to sign in again", path.display()))?;

    let role = UserRole::parse(&stored.role).ok_or_else(|| {
        anyhow!(
            "session file {} has unknown role {:?}; delete it to sign in again",
            path.display(),
            stored.role
        )
    })?;

    Ok(Some(Session {
        token: stored.token,
        role,
        username: stored.username,
    }))
}

pub fn save(path: &Path, session: &Session) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create session directory {}", parent.display()))?;
    }

    let stored = StoredSession {
        token: session.token.clone(),
        role: session.role.as_str().to_owned(),
        username: session.username.clone(),
    };
    let raw = toml::to_string_pretty(&stored).context("encode session")?;
    fs::write(path, raw).with_context(|| format!("write session file {}", path.display()))?;
    Ok(())
}

pub fn remove(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(error) => {
            Err(error).with_context(|| format!("remove session file {}", path.display()))
        }
    }
}
