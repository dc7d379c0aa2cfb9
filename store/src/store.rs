//! File-backed persistence for record collections: append + temp-file
//! rewrite, with per-line integrity hashes.
use crate::codec::{self, Line};
use crate::error::{Error, Result};
use crate::hash::hash64;
use log::debug;
use std::fs::{self, File, OpenOptions as FsOpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// The file extension a [`Store`] was opened as.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Variant {
    /// `.myshell`
    MyShell,
    /// `.crabdb`
    CrabDb,
    /// `.fdb`
    Fdb,
}

impl Variant {
    /// The bare file extension (no leading dot) for this variant.
    pub fn extension(self) -> &'static str {
        match self {
            Variant::MyShell => "myshell",
            Variant::CrabDb => "crabdb",
            Variant::Fdb => "fdb",
        }
    }

    /// Looks up the variant matching a bare extension (no leading dot), if
    /// any of `myshell`/`crabdb`/`fdb`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "myshell" => Some(Variant::MyShell),
            "crabdb" => Some(Variant::CrabDb),
            "fdb" => Some(Variant::Fdb),
            _ => None,
        }
    }
}

/// Options controlling how a [`Store`] is opened.
///
/// Modeled on [`std::fs::OpenOptions`] and on the teacher's
/// `FileStorage::open`, this is the knob for the variant/fsync/create
/// behavior spec.md §4.4 leaves to the implementation.
#[derive(Debug, Clone)]
pub struct OpenOptions {
    variant: Option<Variant>,
    fsync: bool,
    create: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            variant: None,
            fsync: true,
            create: true,
        }
    }
}

impl OpenOptions {
    /// Starts from the defaults: variant inferred from the path's extension,
    /// fsync enabled, and the file created if missing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the path's extension to match `variant` instead of
    /// accepting whichever of `.myshell`/`.crabdb`/`.fdb` it already has.
    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Controls whether temp-file rewrites fsync before renaming over the
    /// original (spec.md §4.4's durability note). Default `true`.
    pub fn fsync(mut self, fsync: bool) -> Self {
        self.fsync = fsync;
        self
    }

    /// Controls whether a missing file is created. Default `true`.
    pub fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    /// Opens (or creates) a store at `path` with these options.
    pub fn open(self, path: impl AsRef<Path>) -> Result<Store> {
        let path = path.as_ref().to_path_buf();
        let variant = self.resolve_variant(&path)?;
        if self.create {
            FsOpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(&path)?;
        }
        let metadata = fs::metadata(&path)?;
        let commit_head = hash64(path_bytes(&path));
        Ok(Store {
            path,
            variant,
            fsync: self.fsync,
            len: metadata.len(),
            mtime: metadata.modified()?,
            commit_head,
            branch: "main".to_string(),
        })
    }

    fn resolve_variant(&self, path: &Path) -> Result<Variant> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::InvalidParam {
                reason: format!("path {path:?} has no recognized extension"),
            })?;
        let detected = Variant::from_extension(ext).ok_or_else(|| Error::InvalidParam {
            reason: format!("unrecognized extension {ext:?}, expected myshell/crabdb/fdb"),
        })?;
        if let Some(expected) = self.variant {
            if expected != detected {
                return Err(Error::InvalidParam {
                    reason: format!(
                        "path extension .{} does not match requested variant .{}",
                        ext,
                        expected.extension()
                    ),
                });
            }
        }
        Ok(detected)
    }
}

fn path_bytes(path: &Path) -> &[u8] {
    path.as_os_str().to_str().unwrap_or_default().as_bytes()
}

/// A file-backed, line-encoded, hash-verified record collection.
///
/// Owns its backing file path and a small amount of cached metadata (size,
/// mtime, and the commit chain cursor used by [`crate::Chain`]). All reads
/// and rewrites go through the line codec in [`crate::codec`].
pub struct Store {
    pub(crate) path: PathBuf,
    variant: Variant,
    fsync: bool,
    len: u64,
    mtime: SystemTime,
    pub(crate) commit_head: u64,
    pub(crate) branch: String,
}

impl Store {
    /// Opens a store at `path`, creating it if missing, inferring the
    /// variant from the path's extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Store> {
        OpenOptions::new().open(path)
    }

    /// Creates a store at `path`, truncating any existing contents.
    pub fn create(path: impl AsRef<Path>) -> Result<Store> {
        let path = path.as_ref();
        FsOpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        OpenOptions::new().create(false).open(path)
    }

    /// Flushes and releases the store's resources.
    ///
    /// `Store` has no open file handle between calls (each operation opens
    /// the file for exactly as long as it needs it), so this simply exists
    /// for symmetry with the close/open pairing in spec.md §6.
    pub fn close(self) -> Result<()> {
        Ok(())
    }

    /// The path this store is backed by.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The variant (`.myshell`/`.crabdb`/`.fdb`) this store was opened as.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// The cached length of the backing file, in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns `true` if the backing file is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The cached last-modified time of the backing file.
    pub fn mtime(&self) -> SystemTime {
        self.mtime
    }

    /// Reads the value for `key`.
    ///
    /// Returns [`Error::NotFound`] if no record with `key` exists. If a
    /// malformed or hash-mismatched line is encountered before (or at) the
    /// matching key, scanning stops immediately and returns
    /// [`Error::Corrupted`] (spec.md §9, Open Question 1: fail fast).
    pub fn get(&self, key: &str) -> Result<Vec<u8>> {
        let contents = fs::read_to_string(&self.path)?;
        for raw in contents.lines() {
            match codec::decode_line(raw)? {
                Line::Sentinel(_) => continue,
                Line::Record { key: k, value, hash_claim } => {
                    codec::verify(&k, &value, hash_claim)?;
                    if k == key {
                        return Ok(trim_trailing_whitespace(value));
                    }
                }
            }
        }
        Err(Error::NotFound)
    }

    /// Writes `key=value`, replacing the first existing record for `key` or
    /// appending a new one if none exists.
    pub fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let canonical = codec::encode_record(key, value)?;
        let mut matched = false;
        self.rewrite(
            |raw| match codec::decode_line(raw)? {
                Line::Sentinel(_) => Ok(RewriteAction::Keep),
                Line::Record { key: k, .. } if k == key && !matched => {
                    matched = true;
                    Ok(RewriteAction::Replace)
                }
                Line::Record { .. } => Ok(RewriteAction::Keep),
            },
            &canonical,
        )?;
        debug!("put key {key:?} ({} bytes)", value.len());
        Ok(())
    }

    /// Removes the first existing record for `key`.
    ///
    /// Returns [`Error::NotFound`] if no record with `key` exists; the temp
    /// file used for the rewrite is discarded in that case.
    pub fn del(&mut self, key: &str) -> Result<()> {
        let mut matched = false;
        let tmp_path = self.tmp_path();
        {
            let contents = fs::read_to_string(&self.path)?;
            let mut tmp = File::create(&tmp_path)?;
            for raw in contents.lines() {
                match codec::decode_line(raw)? {
                    Line::Sentinel(_) => writeln!(tmp, "{raw}")?,
                    Line::Record { key: k, .. } if k == key && !matched => {
                        matched = true;
                    }
                    Line::Record { .. } => writeln!(tmp, "{raw}")?,
                }
            }
        }
        if !matched {
            fs::remove_file(&tmp_path)?;
            return Err(Error::NotFound);
        }
        self.finish_rewrite(tmp_path)?;
        debug!("deleted key {key:?}");
        Ok(())
    }

    /// Scans every record line and returns [`Error::Corrupted`] on the first
    /// one whose claimed hash disagrees with the recomputed hash. Lines
    /// without a hash claim (legacy) are accepted.
    pub fn verify_integrity(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        for raw in contents.lines() {
            if let Line::Record { key, value, hash_claim } = codec::decode_line(raw)? {
                codec::verify(&key, &value, hash_claim)?;
            }
        }
        Ok(())
    }

    /// Returns every record's `(key, value)` pair in file order, verifying
    /// each line's hash along the way. Sentinel lines are skipped. Used by
    /// `ledgerdb` to materialize a `Book` from a store's current contents.
    pub fn entries(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let contents = fs::read_to_string(&self.path)?;
        let mut out = Vec::new();
        for raw in contents.lines() {
            if let Line::Record { key, value, hash_claim } = codec::decode_line(raw)? {
                codec::verify(&key, &value, hash_claim)?;
                out.push((key, trim_trailing_whitespace(value)));
            }
        }
        Ok(out)
    }

    /// Appends a raw sentinel line verbatim (used by [`crate::Chain`]).
    pub(crate) fn append_raw_line(&mut self, line: &str) -> Result<()> {
        let mut file = FsOpenOptions::new().append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        if self.fsync {
            file.sync_all()?;
        }
        self.refresh_metadata()?;
        Ok(())
    }

    /// Iterates over every decoded line in file order (used by
    /// [`crate::Chain::log`] and `backup`/`restore`).
    pub(crate) fn read_all_lines(&self) -> Result<Vec<String>> {
        let contents = fs::read_to_string(&self.path)?;
        Ok(contents.lines().map(str::to_string).collect())
    }

    fn rewrite(
        &mut self,
        mut classify: impl FnMut(&str) -> Result<RewriteAction>,
        canonical_replacement: &str,
    ) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let tmp_path = self.tmp_path();
        let mut matched = false;
        {
            let mut tmp = File::create(&tmp_path)?;
            for raw in contents.lines() {
                match classify(raw)? {
                    RewriteAction::Keep => writeln!(tmp, "{raw}")?,
                    RewriteAction::Replace => {
                        write!(tmp, "{canonical_replacement}")?;
                        matched = true;
                    }
                }
            }
            if !matched {
                write!(tmp, "{canonical_replacement}")?;
            }
        }
        self.finish_rewrite(tmp_path)
    }

    fn finish_rewrite(&mut self, tmp_path: PathBuf) -> Result<()> {
        if self.fsync {
            let tmp = File::open(&tmp_path)?;
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        if self.fsync {
            fsync_parent_dir(&self.path);
        }
        self.refresh_metadata()?;
        Ok(())
    }

    fn refresh_metadata(&mut self) -> Result<()> {
        let metadata = fs::metadata(&self.path)?;
        self.len = metadata.len();
        self.mtime = metadata.modified()?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

enum RewriteAction {
    Keep,
    Replace,
}

fn trim_trailing_whitespace(mut value: Vec<u8>) -> Vec<u8> {
    while matches!(value.last(), Some(b) if b.is_ascii_whitespace()) {
        value.pop();
    }
    value
}

fn fsync_parent_dir(path: &Path) {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn put_get_update_del() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.myshell");
        let mut store = Store::create(&path).unwrap();
        store.put("k", b"v1").unwrap();
        store.put("k", b"v2").unwrap();
        assert_eq!(store.get("k").unwrap(), b"v2");
        store.del("k").unwrap();
        assert!(matches!(store.get("k").unwrap_err(), Error::NotFound));
    }

    #[test]
    fn del_of_absent_key_is_not_found_and_keeps_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.myshell");
        let mut store = Store::create(&path).unwrap();
        store.put("k", b"v").unwrap();
        assert!(matches!(store.del("missing").unwrap_err(), Error::NotFound));
        assert_eq!(store.get("k").unwrap(), b"v");
    }

    #[test]
    fn verify_integrity_detects_single_byte_tamper() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.myshell");
        let mut store = Store::create(&path).unwrap();
        store.put("a", b"1").unwrap();
        store.put("b", b"2").unwrap();
        store.verify_integrity().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let tampered = contents.replacen('=', "?", 1);
        fs::write(&path, tampered).unwrap();
        assert!(store.verify_integrity().is_err());
    }

    #[test]
    fn rejects_unrecognized_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        assert!(Store::open(&path).is_err());
    }

    #[test]
    fn entries_skips_sentinels_and_reports_in_file_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.myshell");
        let mut store = Store::create(&path).unwrap();
        store.put("a", b"1").unwrap();
        store.append_raw_line("#branch 0000000000000000 main\n").unwrap();
        store.put("b", b"2").unwrap();
        assert_eq!(
            store.entries().unwrap(),
            vec![("a".to_string(), b"1".to_vec()), ("b".to_string(), b"2".to_vec())]
        );
    }
}
