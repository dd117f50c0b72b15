//! File-backed cookie jar
//!
//! Cookies survive process restarts by living in a JSON file in the
//! application data directory. The jar is the native stand-in for the
//! browser cookie store used by the last token tier.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_COOKIE_JAR_FILE: &str = "cookies.json";
const APP_DIR_NAME: &str = "boulders-signup";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        };
        f.write_str(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub same_site: SameSite,
    pub secure: bool,
}

impl Cookie {
    /// Path `/`, `SameSite=Lax`; `Secure` only when served over TLS.
    pub fn session(name: impl Into<String>, value: impl Into<String>, secure: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: "/".to_string(),
            same_site: SameSite::Lax,
            secure,
        }
    }

    /// Render as a `Set-Cookie` header value.
    pub fn to_header_value(&self) -> String {
        let mut header = format!(
            "{}={}; Path={}; SameSite={}",
            self.name, self.value, self.path, self.same_site
        );
        if self.secure {
            header.push_str("; Secure");
        }
        header
    }
}

pub struct FileCookieJar {
    jar_file_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCookieJar {
    /// Create jar with custom file path
    pub fn new(jar_file_path: PathBuf) -> Self {
        Self {
            jar_file_path,
            write_lock: Mutex::new(()),
        }
    }

    /// Create jar in `base_dir` with the default file name
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self::new(base_dir.join(DEFAULT_COOKIE_JAR_FILE))
    }

    /// Create jar in the platform data directory
    pub fn with_defaults() -> anyhow::Result<Self> {
        let data_dir = dirs::data_local_dir().context("no local data directory on this platform")?;
        Ok(Self::with_base_dir(data_dir.join(APP_DIR_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.jar_file_path
    }

    pub fn get(&self, name: &str) -> anyhow::Result<Option<Cookie>> {
        Ok(self.read_all()?.remove(name))
    }

    pub fn set(&self, cookie: Cookie) -> anyhow::Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| anyhow::anyhow!("cookie jar lock poisoned: {e}"))?;
        let (mut cookies, _) = self.read_for_update()?;
        cookies.insert(cookie.name.clone(), cookie);
        self.write_all(&cookies)
    }

    pub fn remove(&self, name: &str) -> anyhow::Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| anyhow::anyhow!("cookie jar lock poisoned: {e}"))?;
        let (mut cookies, discarded) = self.read_for_update()?;
        if cookies.remove(name).is_some() || discarded {
            self.write_all(&cookies)?;
        }
        Ok(())
    }

    fn read_all(&self) -> anyhow::Result<BTreeMap<String, Cookie>> {
        self.parse_jar()?
            .map_err(|e| anyhow::anyhow!("Failed to parse cookie jar: {e}"))
    }

    /// An unparsable jar reads as empty so the next write replaces it. The
    /// flag reports whether that happened.
    fn read_for_update(&self) -> anyhow::Result<(BTreeMap<String, Cookie>, bool)> {
        match self.parse_jar()? {
            Ok(cookies) => Ok((cookies, false)),
            Err(e) => {
                warn!(path = %self.jar_file_path.display(), error = %e, "discarding unreadable cookie jar");
                Ok((BTreeMap::new(), true))
            }
        }
    }

    /// Outer error is I/O, inner is the JSON parse.
    fn parse_jar(&self) -> anyhow::Result<Result<BTreeMap<String, Cookie>, serde_json::Error>> {
        if !self.jar_file_path.exists() {
            return Ok(Ok(BTreeMap::new()));
        }
        let content = fs::read_to_string(&self.jar_file_path)
            .with_context(|| format!("Failed to read {}", self.jar_file_path.display()))?;
        if content.trim().is_empty() {
            return Ok(Ok(BTreeMap::new()));
        }
        Ok(serde_json::from_str(&content))
    }

    fn write_all(&self, cookies: &BTreeMap<String, Cookie>) -> anyhow::Result<()> {
        if let Some(parent) = self.jar_file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(cookies)
            .map_err(|e| anyhow::anyhow!("Failed to serialize cookie jar: {e}"))?;

        // A torn write only ever hits the temp file.
        let tmp_path = self.jar_file_path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path)
            .map_err(|e| anyhow::anyhow!("Failed to create cookie jar file: {e}"))?;
        file.write_all(json.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to write cookie jar file: {e}"))?;
        file.sync_all()
            .map_err(|e| anyhow::anyhow!("Failed to sync cookie jar file: {e}"))?;
        fs::rename(&tmp_path, &self.jar_file_path)
            .map_err(|e| anyhow::anyhow!("Failed to replace cookie jar file: {e}"))?;
        Ok(())
    }
}
