//! File-backed, hash-verified half-open interval index. Structurally the
//! same rewrite-via-temp-file discipline as `store::Store`, specialized to
//! `start,end|H` lines instead of `key=value #hash=H` lines.
use crate::error::{Error, Result};
use crate::interval::{decode_line, decode_line_strict, Interval, Line};
use log::debug;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use store::Variant;

/// A file-backed collection of half-open [`Interval`]s, each line tagged
/// with a hash of its own `start,end` body.
pub struct IntervalStore {
    path: PathBuf,
    variant: Variant,
}

impl IntervalStore {
    /// Creates an empty interval file at `path`, truncating any existing
    /// contents. `path` must have a `.crabdb` extension (spec.md §6).
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let variant = resolve_variant(&path)?;
        fs::write(&path, "")?;
        Ok(IntervalStore { path, variant })
    }

    /// Opens an existing interval file at `path`, creating it if missing.
    /// `path` must have a `.crabdb` extension (spec.md §6).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let variant = resolve_variant(&path)?;
        if !path.exists() {
            fs::write(&path, "")?;
        }
        Ok(IntervalStore { path, variant })
    }

    /// Removes the backing file entirely.
    pub fn delete(path: impl AsRef<Path>) -> Result<()> {
        fs::remove_file(path.as_ref())?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The variant (always `.crabdb`) this store was opened as, mirroring
    /// `store::Store::variant()`.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Appends `interval` as a new canonical `start,end|H` line.
    pub fn insert(&mut self, interval: Interval) -> Result<()> {
        let mut file = fs::OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(interval.encode().as_bytes())?;
        debug!("inserted interval {}..{}", interval.start, interval.end);
        Ok(())
    }

    /// Scans every record for overlap with `query` (half-open: `start <
    /// query.end && query.start < end`), returning up to `max_results`
    /// matches in file order and the total number of matches seen (so
    /// callers can detect truncation).
    ///
    /// A line whose hash does not match its body is reported as
    /// [`Error::Corrupted`], stopping the scan immediately.
    /// [`Error::NotFound`] if zero matches (spec.md §4.7).
    pub fn find(&self, query: Interval, max_results: usize) -> Result<(Vec<Interval>, usize)> {
        let contents = fs::read_to_string(&self.path)?;
        let mut matches = Vec::new();
        let mut total = 0;
        for raw in contents.lines() {
            if let Line::Interval(candidate) = decode_line_strict(raw)? {
                if candidate.overlaps(&query) {
                    total += 1;
                    if matches.len() < max_results {
                        matches.push(candidate);
                    }
                }
            }
        }
        if total == 0 {
            return Err(Error::NotFound);
        }
        Ok((matches, total))
    }

    /// Replaces the first line matching `old` with `new`. [`Error::NotFound`]
    /// if no line matches `old`.
    pub fn update(&mut self, old: Interval, new: Interval) -> Result<()> {
        self.rewrite_matching(old, Some(new))
    }

    /// Removes the first line matching `target`. [`Error::NotFound`] if no
    /// line matches.
    pub fn remove(&mut self, target: Interval) -> Result<()> {
        self.rewrite_matching(target, None)
    }

    fn rewrite_matching(&mut self, target: Interval, replacement: Option<Interval>) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let tmp_path = self.tmp_path();
        let mut matched = false;
        {
            let mut tmp = File::create(&tmp_path)?;
            for raw in contents.lines() {
                match decode_line_strict(raw)? {
                    Line::Interval(candidate) if candidate == target && !matched => {
                        matched = true;
                        if let Some(new) = replacement {
                            write!(tmp, "{}", new.encode())?;
                        }
                    }
                    _ => writeln!(tmp, "{raw}")?,
                }
            }
        }
        if !matched {
            fs::remove_file(&tmp_path)?;
            return Err(Error::NotFound);
        }
        fs::rename(&tmp_path, &self.path)?;
        debug!("rewrote interval file after update/remove");
        Ok(())
    }

    /// Returns [`Error::Corrupted`] on the first line whose claimed hash
    /// disagrees with its recomputed hash.
    pub fn verify(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        for raw in contents.lines() {
            decode_line_strict(raw)?;
        }
        Ok(())
    }

    /// The number of well-formed, hash-verified interval lines currently
    /// stored. Lines that fail verification are skipped rather than erroring
    /// (use [`Self::verify`] to surface corruption).
    pub fn count(&self) -> Result<usize> {
        let contents = fs::read_to_string(&self.path)?;
        Ok(contents
            .lines()
            .filter(|raw| matches!(decode_line(raw), Line::Interval(_)))
            .count())
    }

    /// The size of the backing file, in bytes.
    pub fn size(&self) -> Result<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }

    /// Writes a length-prefixed copy of the store to `path`, with a
    /// `#backup_hash=` header, mirroring `store::Chain::backup`.
    pub fn backup(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let header = format!(
            "#backup_hash={}\n",
            store::hex16(store::hash64(path_bytes(path)))
        );
        let body = fs::read(&self.path)?;
        let mut file = File::create(path)?;
        file.write_all(header.as_bytes())?;
        file.write_all(&body)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

/// Restores a backup written by [`IntervalStore::backup`] from `src` to
/// `dst`, mirroring `store::restore`.
pub fn restore(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    let src = src.as_ref();
    let contents = fs::read_to_string(src)?;
    let mut lines = contents.splitn(2, '\n');
    let header = lines.next().unwrap_or_default();
    let rest = lines.next().unwrap_or_default();

    let claimed = header
        .strip_prefix("#backup_hash=")
        .and_then(store::parse_hex16)
        .ok_or_else(|| Error::Corrupted {
            reason: "missing or malformed #backup_hash= header".into(),
        })?;
    let expected = store::hash64(path_bytes(src));
    if claimed != expected {
        return Err(Error::Corrupted {
            reason: "backup header hash does not match source path".into(),
        });
    }
    fs::write(dst, rest)?;
    Ok(())
}

fn path_bytes(path: &Path) -> &[u8] {
    path.as_os_str().to_str().unwrap_or_default().as_bytes()
}

/// Interval files are always `.crabdb` (spec.md §6), unlike `store::Store`
/// which accepts any of `.myshell`/`.crabdb`/`.fdb`.
fn resolve_variant(path: &Path) -> Result<Variant> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| Error::InvalidParam {
            reason: format!("path {path:?} has no recognized extension"),
        })?;
    let variant = Variant::from_extension(ext).ok_or_else(|| Error::InvalidParam {
        reason: format!("unrecognized extension {ext:?}, expected crabdb"),
    })?;
    if variant != Variant::CrabDb {
        return Err(Error::InvalidParam {
            reason: format!(
                "interval stores require a .crabdb extension, got .{ext}"
            ),
        });
    }
    Ok(variant)
}
