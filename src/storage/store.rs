//! Per-user key/value state store
//!
//! Three scalars per user (default password, active-sheet name, sticky
//! cookie-mode flag) plus enumeration of the user's sheet files. The
//! classifier and handlers talk to the [`UserStore`] trait so the backing
//! medium stays swappable; the shipped implementation is flat files in a
//! directory per user, created on demand.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::AppResult;

/// State operations scoped to one user's namespace. Writes are idempotent;
/// the only failure mode is I/O, which is surfaced once and not retried.
pub trait UserStore {
    /// Stored default password, if set.
    fn password(&self, user: i64) -> AppResult<Option<String>>;

    /// Set (or overwrite) the default password.
    fn set_password(&self, user: i64, value: &str) -> AppResult<()>;

    /// Name of the sheet currently receiving rows, if any. May point to a
    /// file that was deleted since; callers self-heal lazily.
    fn active_sheet(&self, user: i64) -> AppResult<Option<String>>;

    /// Record `name` as the user's active sheet.
    fn set_active_sheet(&self, user: i64, name: &str) -> AppResult<()>;

    /// Turn the sticky cookie-mode flag on or off.
    fn set_cookie_mode(&self, user: i64, on: bool) -> AppResult<()>;

    /// Whether cookie mode is currently on.
    fn cookie_mode(&self, user: i64) -> bool;

    /// Every sheet filename that exists for the user, sorted.
    fn list_sheets(&self, user: i64) -> AppResult<Vec<String>>;
}

/// Flat-file [`UserStore`]: `<base>/<user>/pw.txt`, `active.txt`, and a
/// `cookie_mode` marker file whose presence means the flag is on.
pub struct FsUserStore {
    base_dir: PathBuf,
}

impl FsUserStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The user's directory, created on first access.
    pub fn user_dir(&self, user: i64) -> AppResult<PathBuf> {
        let dir = self.base_dir.join(user.to_string());
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn read_value(path: &Path) -> AppResult<Option<String>> {
        if !path.exists() {
            return Ok(None);
        }
        let value = fs::read_to_string(path)?;
        Ok(Some(value.trim().to_string()))
    }
}

impl UserStore for FsUserStore {
    fn password(&self, user: i64) -> AppResult<Option<String>> {
        Self::read_value(&self.user_dir(user)?.join("pw.txt"))
    }

    fn set_password(&self, user: i64, value: &str) -> AppResult<()> {
        fs::write(self.user_dir(user)?.join("pw.txt"), value)?;
        Ok(())
    }

    fn active_sheet(&self, user: i64) -> AppResult<Option<String>> {
        Self::read_value(&self.user_dir(user)?.join("active.txt"))
    }

    fn set_active_sheet(&self, user: i64, name: &str) -> AppResult<()> {
        fs::write(self.user_dir(user)?.join("active.txt"), name)?;
        Ok(())
    }

    fn set_cookie_mode(&self, user: i64, on: bool) -> AppResult<()> {
        let marker = self.user_dir(user)?.join("cookie_mode");
        if on {
            fs::write(marker, "1")?;
        } else if marker.exists() {
            fs::remove_file(marker)?;
        }
        Ok(())
    }

    fn cookie_mode(&self, user: i64) -> bool {
        self.base_dir.join(user.to_string()).join("cookie_mode").exists()
    }

    fn list_sheets(&self, user: i64) -> AppResult<Vec<String>> {
        let mut sheets = Vec::new();
        for entry in fs::read_dir(self.user_dir(user)?)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".xlsx") {
                sheets.push(name);
            }
        }
        sheets.sort();
        Ok(sheets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_password_roundtrip_and_overwrite() {
        let dir = tempdir().unwrap();
        let store = FsUserStore::new(dir.path());

        assert_eq!(store.password(1).unwrap(), None);
        store.set_password(1, "hunter2").unwrap();
        assert_eq!(store.password(1).unwrap(), Some("hunter2".to_string()));
        store.set_password(1, "swordfish").unwrap();
        assert_eq!(store.password(1).unwrap(), Some("swordfish".to_string()));
    }

    #[test]
    fn test_cookie_mode_defaults_off_and_is_sticky() {
        let dir = tempdir().unwrap();
        let store = FsUserStore::new(dir.path());

        assert!(!store.cookie_mode(7));
        store.set_cookie_mode(7, true).unwrap();
        assert!(store.cookie_mode(7));
        // Turning it on again is idempotent
        store.set_cookie_mode(7, true).unwrap();
        assert!(store.cookie_mode(7));
        store.set_cookie_mode(7, false).unwrap();
        assert!(!store.cookie_mode(7));
        // Turning it off twice is fine too
        store.set_cookie_mode(7, false).unwrap();
    }

    #[test]
    fn test_active_sheet_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FsUserStore::new(dir.path());

        assert_eq!(store.active_sheet(2).unwrap(), None);
        store.set_active_sheet(2, "sheet_1.xlsx").unwrap();
        assert_eq!(store.active_sheet(2).unwrap(), Some("sheet_1.xlsx".to_string()));
    }

    #[test]
    fn test_list_sheets_ignores_state_files() {
        let dir = tempdir().unwrap();
        let store = FsUserStore::new(dir.path());

        store.set_password(3, "pw").unwrap();
        store.set_cookie_mode(3, true).unwrap();
        let user_dir = store.user_dir(3).unwrap();
        fs::write(user_dir.join("sheet_2.xlsx"), b"").unwrap();
        fs::write(user_dir.join("sheet_1.xlsx"), b"").unwrap();

        assert_eq!(
            store.list_sheets(3).unwrap(),
            vec!["sheet_1.xlsx".to_string(), "sheet_2.xlsx".to_string()]
        );
    }

    #[test]
    fn test_users_are_isolated() {
        let dir = tempdir().unwrap();
        let store = FsUserStore::new(dir.path());

        store.set_password(10, "alpha").unwrap();
        assert_eq!(store.password(11).unwrap(), None);
        assert!(!store.cookie_mode(11));
    }
}
