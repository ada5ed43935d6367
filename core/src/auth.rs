use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use sha2::{Digest, Sha256};
use tracing::warn;

/// Answers "is this the password for this user?".
pub trait UserDirectory: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Plaintext in-memory directory. Only meant for tests and demos.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserDirectory {
    users: HashMap<String, String>,
}

impl InMemoryUserDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_user(mut self, username: &str, password: &str) -> Self {
        self.users
            .insert(username.to_lowercase(), password.to_string());
        self
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(&username.trim().to_lowercase())
            .is_some_and(|expected| constant_time_eq(expected.as_bytes(), password.as_bytes()))
    }
}

/// Users stored in a JSON file as `{"<name>": "<salt>$<sha256 hex>"}`.
#[derive(Debug, Clone)]
pub struct CredentialFile {
    path: PathBuf,
    users: BTreeMap<String, String>,
}

impl CredentialFile {
    /// Load the file; a missing file is an empty directory.
    pub fn load(path: &Path) -> Result<Self> {
        let users = match std::fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Invalid credentials file: {}", path.display()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    path = %path.display(),
                    "no credentials file; nobody can log in until a user is added"
                );
                BTreeMap::new()
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read credentials: {}", path.display()));
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            users,
        })
    }

    /// Add or replace a user and write the file back.
    pub fn set_password(&mut self, username: &str, password: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() {
            bail!("Username must not be empty");
        }
        if password.is_empty() {
            bail!("Password must not be empty");
        }
        self.users.retain(|name, _| !name.eq_ignore_ascii_case(username));
        self.users
            .insert(username.to_string(), hash_password(password));
        self.save()
    }

    pub fn remove(&mut self, username: &str) -> Result<bool> {
        let before = self.users.len();
        self.users.retain(|name, _| !name.eq_ignore_ascii_case(username.trim()));
        if self.users.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(&self.users)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write credentials: {}", self.path.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .context("Failed to set credentials file permissions")?;
        }
        Ok(())
    }
}

impl UserDirectory for CredentialFile {
    fn verify(&self, username: &str, password: &str) -> bool {
        let username = username.trim();
        self.users
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(username))
            .is_some_and(|(_, stored)| verify_password(stored, password))
    }
}

/// Salted SHA-256: `<salt hex>$<digest hex>`.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt: [u8; 16] = rand::random();
    let salt = to_hex(&salt);
    let digest = digest(&salt, password);
    format!("{salt}${digest}")
}

#[must_use]
pub fn verify_password(stored: &str, password: &str) -> bool {
    let Some((salt, expected)) = stored.split_once('$') else {
        return false;
    };
    constant_time_eq(digest(salt, password).as_bytes(), expected.as_bytes())
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    to_hex(&hasher.finalize())
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut acc, b| {
            let _ = write!(acc, "{b:02x}");
            acc
        })
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_directory() {
        let users = InMemoryUserDirectory::new().with_user("Boo", "boo@lighter");
        assert!(users.verify("Boo", "boo@lighter"));
        assert!(users.verify("boo", "boo@lighter"));
        assert!(!users.verify("Boo", "wrong"));
        assert!(!users.verify("Kudi", "boo@lighter"));
    }

    #[test]
    fn test_hash_and_verify_password() {
        let stored = hash_password("kudi@lighter");
        assert!(verify_password(&stored, "kudi@lighter"));
        assert!(!verify_password(&stored, "kudi@lighter "));
        assert!(!verify_password("no-separator", "kudi@lighter"));
        // Fresh salt every time
        assert_ne!(stored, hash_password("kudi@lighter"));
    }

    #[test]
    fn test_credential_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");

        let mut creds = CredentialFile::load(&path).unwrap();
        assert!(!creds.verify("Boo", "boo@lighter"));
        creds.set_password("Boo", "boo@lighter").unwrap();

        let reloaded = CredentialFile::load(&path).unwrap();
        assert!(reloaded.verify("boo", "boo@lighter"));
        assert!(!reloaded.verify("boo", "nope"));
        assert_eq!(reloaded.usernames().collect::<Vec<_>>(), vec!["Boo"]);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("boo@lighter"));
    }

    #[test]
    fn test_set_password_replaces_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let mut creds = CredentialFile::load(&dir.path().join("users.json")).unwrap();
        creds.set_password("Boo", "first").unwrap();
        creds.set_password("BOO", "second").unwrap();
        assert_eq!(creds.usernames().count(), 1);
        assert!(creds.verify("boo", "second"));
        assert!(!creds.verify("boo", "first"));
    }

    #[test]
    fn test_remove_user() {
        let dir = tempfile::tempdir().unwrap();
        let mut creds = CredentialFile::load(&dir.path().join("users.json")).unwrap();
        creds.set_password("Kudi", "kudi@lighter").unwrap();
        assert!(creds.remove("kudi").unwrap());
        assert!(!creds.remove("kudi").unwrap());
        assert!(!creds.verify("Kudi", "kudi@lighter"));
    }

    #[test]
    fn test_invalid_credentials_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(CredentialFile::load(&path).is_err());
    }
}
