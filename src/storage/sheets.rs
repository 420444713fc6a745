//! Spreadsheet accessor
//!
//! One workbook per sheet, one worksheet per workbook, no header row, rows
//! appended in arrival order and never mutated. Every append is a full
//! read-modify-write cycle; the file on disk is the source of truth and
//! nothing is cached across calls.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use rust_xlsxwriter::Workbook;

use crate::classify::Row;
use crate::core::AppResult;
use crate::storage::store::UserStore;
use crate::storage::xlsx;

/// Cached regex for parsing the sequential index out of a sheet filename
static SHEET_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^sheet_(\d+)\.xlsx$").expect("Failed to compile sheet name regex")
});

/// Accessor for a user's spreadsheet files under the data directory.
pub struct SheetStore {
    base_dir: PathBuf,
}

impl SheetStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Path of a named sheet inside the user's directory.
    pub fn sheet_path(&self, user: i64, name: &str) -> PathBuf {
        self.base_dir.join(user.to_string()).join(name)
    }

    /// Allocate the next sequential sheet name, write an empty workbook,
    /// and mark it active.
    ///
    /// The index is `max(indices of surviving sheet files) + 1` rather
    /// than `count + 1`, so deleting a lower-numbered sheet can never make
    /// a later create clobber a surviving higher-numbered one.
    pub fn create_sheet(&self, store: &dyn UserStore, user: i64) -> AppResult<String> {
        let next = store
            .list_sheets(user)?
            .iter()
            .filter_map(|name| SHEET_NAME_RE.captures(name))
            .filter_map(|caps| caps[1].parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let name = format!("sheet_{}.xlsx", next);
        write_workbook(&self.sheet_path(user, &name), &[])?;
        store.set_active_sheet(user, &name)?;
        log::info!("created sheet {} for user {}", name, user);
        Ok(name)
    }

    /// Path of the user's active sheet, creating one if none is recorded.
    ///
    /// If the recorded file was deleted out from under the pointer, an
    /// empty workbook is re-written under the same name (lazy self-heal).
    pub fn ensure_active(&self, store: &dyn UserStore, user: i64) -> AppResult<PathBuf> {
        let name = match store.active_sheet(user)? {
            Some(name) => name,
            None => self.create_sheet(store, user)?,
        };
        let path = self.sheet_path(user, &name);
        if !path.exists() {
            log::warn!("active sheet {} missing for user {}, recreating empty", name, user);
            write_workbook(&path, &[])?;
        }
        Ok(path)
    }

    /// Append one row: read every existing row, add the new one, rewrite.
    /// Appends are not deduplicated.
    pub fn append_row(&self, path: &Path, row: &Row) -> AppResult<()> {
        let mut rows = xlsx::read_rows(path)?;
        rows.push(row.clone());
        write_workbook(path, &rows)
    }

    /// All rows currently in the sheet at `path`.
    pub fn read_rows(&self, path: &Path) -> AppResult<Vec<Row>> {
        xlsx::read_rows(path)
    }

    /// Remove a sheet file. Existence is the caller's precondition.
    pub fn delete_sheet(&self, user: i64, name: &str) -> AppResult<()> {
        fs::remove_file(self.sheet_path(user, name))?;
        Ok(())
    }
}

fn write_workbook(path: &Path, rows: &[Row]) -> AppResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            worksheet.write_string(r as u32, c as u16, cell)?;
        }
    }
    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::store::FsUserStore;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn row(a: &str, b: &str, c: &str, d: &str) -> Row {
        [a.to_string(), b.to_string(), c.to_string(), d.to_string()]
    }

    #[test]
    fn test_create_sheet_activates_it() {
        let dir = tempdir().unwrap();
        let store = FsUserStore::new(dir.path());
        let sheets = SheetStore::new(dir.path());

        let name = sheets.create_sheet(&store, 1).unwrap();
        assert_eq!(name, "sheet_1.xlsx");
        assert_eq!(store.active_sheet(1).unwrap(), Some(name.clone()));
        assert!(sheets.sheet_path(1, &name).exists());
    }

    #[test]
    fn test_sheet_indices_are_sequential() {
        let dir = tempdir().unwrap();
        let store = FsUserStore::new(dir.path());
        let sheets = SheetStore::new(dir.path());

        assert_eq!(sheets.create_sheet(&store, 1).unwrap(), "sheet_1.xlsx");
        assert_eq!(sheets.create_sheet(&store, 1).unwrap(), "sheet_2.xlsx");
        assert_eq!(sheets.create_sheet(&store, 1).unwrap(), "sheet_3.xlsx");
    }

    #[test]
    fn test_next_index_survives_deleting_a_lower_sheet() {
        let dir = tempdir().unwrap();
        let store = FsUserStore::new(dir.path());
        let sheets = SheetStore::new(dir.path());

        sheets.create_sheet(&store, 1).unwrap();
        sheets.create_sheet(&store, 1).unwrap();
        sheets.delete_sheet(1, "sheet_1.xlsx").unwrap();

        // count is 1 now, but sheet_2.xlsx survives: the next index must
        // step past it instead of clobbering it
        assert_eq!(sheets.create_sheet(&store, 1).unwrap(), "sheet_3.xlsx");
    }

    #[test]
    fn test_ensure_active_creates_when_nothing_recorded() {
        let dir = tempdir().unwrap();
        let store = FsUserStore::new(dir.path());
        let sheets = SheetStore::new(dir.path());

        let path = sheets.ensure_active(&store, 5).unwrap();
        assert!(path.exists());
        assert_eq!(store.active_sheet(5).unwrap(), Some("sheet_1.xlsx".to_string()));
    }

    #[test]
    fn test_ensure_active_heals_dangling_pointer() {
        let dir = tempdir().unwrap();
        let store = FsUserStore::new(dir.path());
        let sheets = SheetStore::new(dir.path());

        let name = sheets.create_sheet(&store, 5).unwrap();
        let path = sheets.sheet_path(5, &name);
        sheets.append_row(&path, &row("a", "b", "c", "d")).unwrap();

        // Delete the file out from under the active pointer
        sheets.delete_sheet(5, &name).unwrap();
        let healed = sheets.ensure_active(&store, 5).unwrap();
        assert_eq!(healed, path);
        assert_eq!(sheets.read_rows(&healed).unwrap(), Vec::<Row>::new());
    }

    #[test]
    fn test_append_and_read_back() {
        let dir = tempdir().unwrap();
        let store = FsUserStore::new(dir.path());
        let sheets = SheetStore::new(dir.path());

        let path = sheets.ensure_active(&store, 2).unwrap();
        sheets
            .append_row(&path, &row("12345", "hunter2", "a@mail.com", "999111"))
            .unwrap();
        sheets
            .append_row(&path, &row("c_user=1; x=2", "", "", ""))
            .unwrap();

        let rows = sheets.read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], row("12345", "hunter2", "a@mail.com", "999111"));
        assert_eq!(rows[1], row("c_user=1; x=2", "", "", ""));
    }

    #[test]
    fn test_append_is_not_deduplicated() {
        let dir = tempdir().unwrap();
        let store = FsUserStore::new(dir.path());
        let sheets = SheetStore::new(dir.path());

        let path = sheets.ensure_active(&store, 3).unwrap();
        let r = row("id", "pw", "mail", "code");
        sheets.append_row(&path, &r).unwrap();
        sheets.append_row(&path, &r).unwrap();

        assert_eq!(sheets.read_rows(&path).unwrap(), vec![r.clone(), r]);
    }

    #[test]
    fn test_cells_with_markup_survive_the_cycle() {
        let dir = tempdir().unwrap();
        let store = FsUserStore::new(dir.path());
        let sheets = SheetStore::new(dir.path());

        let path = sheets.ensure_active(&store, 4).unwrap();
        let r = row("a & b", "<pw>", "mail with  spaces", "c_user=9");
        sheets.append_row(&path, &r).unwrap();
        assert_eq!(sheets.read_rows(&path).unwrap(), vec![r]);
    }
}
