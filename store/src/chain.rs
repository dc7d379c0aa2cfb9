//! The commit/branch/checkout/log/backup/restore layer, implemented by
//! appending sentinel lines to the same file a [`Store`] uses for records.
use crate::codec::Line;
use crate::error::{Error, Result};
use crate::hash::{hash64, hex16, parse_hex16};
use crate::store::Store;
use log::info;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// A decoded `#commit` sentinel.
#[derive(Debug, Clone)]
pub struct Commit {
    /// The commit's content-addressed identity, `Hash("<message>:<epoch>")`.
    pub hash: u64,
    /// The commit message.
    pub message: String,
    /// Seconds since the Unix epoch when the commit was made.
    pub timestamp: u64,
}

/// The git-inspired commit chain layered over a [`Store`]'s sentinel lines.
///
/// Every method here is implemented purely in terms of [`Store::append_raw_line`]
/// and [`Store::read_all_lines`], matching spec.md §4.6: the chain has no
/// storage of its own, it is record lines and sentinel lines interleaved in
/// one file.
pub trait Chain {
    /// Commits with the default author `"system"`.
    fn commit(&mut self, message: &str) -> Result<Commit>;

    /// Commits with an explicit author (SPEC_FULL.md §3 supplement).
    fn commit_as(&mut self, message: &str, author: &str) -> Result<Commit>;

    /// Points the chain cursor at a new named branch.
    fn branch(&mut self, name: &str) -> Result<()>;

    /// Repositions the chain cursor at a branch name or literal commit hash.
    fn checkout(&mut self, target: &str) -> Result<()>;

    /// Replays `#commit` sentinels in file order, invoking `callback` with
    /// `(hash, message)` for each that re-verifies. `callback` returning
    /// `false` stops iteration early.
    fn log(&self, callback: impl FnMut(u64, &str) -> bool) -> Result<()>;

    /// Writes a length-prefixed copy of the store to `path`, with a
    /// `#backup_hash=` header.
    fn backup(&self, path: impl AsRef<Path>) -> Result<()>;

    /// The current branch name.
    fn current_branch(&self) -> &str;

    /// The current commit chain cursor.
    fn commit_head(&self) -> u64;
}

impl Chain for Store {
    fn commit(&mut self, message: &str) -> Result<Commit> {
        self.commit_as(message, "system")
    }

    fn commit_as(&mut self, message: &str, author: &str) -> Result<Commit> {
        let timestamp = epoch_now();
        let content = format!("{message}:{timestamp}");
        let new_hash = hash64(content.as_bytes());
        self.commit_head = new_hash;
        self.append_raw_line(&format!(
            "#commit {} {message} {timestamp}\n",
            hex16(new_hash)
        ))?;
        info!("commit {} by {author}: {message}", hex16(new_hash));
        Ok(Commit {
            hash: new_hash,
            message: message.to_string(),
            timestamp,
        })
    }

    fn branch(&mut self, name: &str) -> Result<()> {
        self.branch = name.to_string();
        self.commit_head = hash64(name.as_bytes());
        self.append_raw_line(&format!("#branch {} {name}\n", hex16(self.commit_head)))?;
        info!("branch {} -> {name}", hex16(self.commit_head));
        Ok(())
    }

    fn checkout(&mut self, target: &str) -> Result<()> {
        // `target` is either a branch name, or a literal hex16 commit hash
        // (spec.md §4.6: "the parsed hash equals Hash(target), treated as a
        // literal hash string" -- read here as: parse `target` itself as the
        // candidate hash when it is well-formed hex16, per S6's "checkout of
        // the first commit's hex16 hash succeeds"; see DESIGN.md).
        let target_hash = parse_hex16(target).unwrap_or_else(|| hash64(target.as_bytes()));
        for raw in self.read_all_lines()? {
            if let Line::Sentinel(content) = crate::codec::decode_line(&raw)? {
                let is_match = parse_branch(&content)
                    .map(|(_, name)| name == target)
                    .unwrap_or(false)
                    || parse_commit(&content)
                        .map(|c| c.hash == target_hash)
                        .unwrap_or(false);
                if is_match {
                    self.branch = target.to_string();
                    self.commit_head = target_hash;
                    info!("checkout {target}");
                    return Ok(());
                }
            }
        }
        Err(Error::NotFound)
    }

    fn log(&self, mut callback: impl FnMut(u64, &str) -> bool) -> Result<()> {
        for raw in self.read_all_lines()? {
            if let Line::Sentinel(content) = crate::codec::decode_line(&raw)? {
                if let Some(commit) = parse_commit(&content) {
                    let recomputed =
                        hash64(format!("{}:{}", commit.message, commit.timestamp).as_bytes());
                    if recomputed == commit.hash && !callback(commit.hash, &commit.message) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    fn backup(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let header = format!("#backup_hash={}\n", hex16(hash64(path_bytes(path))));
        let body = fs::read(&self.path)?;
        let mut file = File::create(path)?;
        file.write_all(header.as_bytes())?;
        file.write_all(&body)?;
        Ok(())
    }

    fn current_branch(&self) -> &str {
        &self.branch
    }

    fn commit_head(&self) -> u64 {
        self.commit_head
    }
}

/// Restores a backup written by [`Chain::backup`] from `src` to `dst`.
///
/// Requires the first line of `src` to be a `#backup_hash=` header whose
/// value equals `Hash(src)`; any mismatch or absence is [`Error::Corrupted`].
pub fn restore(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    let src = src.as_ref();
    let mut contents = String::new();
    File::open(src)?.read_to_string(&mut contents)?;
    let mut lines = contents.splitn(2, '\n');
    let header = lines.next().unwrap_or_default();
    let rest = lines.next().unwrap_or_default();

    let claimed = header
        .strip_prefix("#backup_hash=")
        .and_then(parse_hex16)
        .ok_or_else(|| Error::Corrupted {
            reason: "missing or malformed #backup_hash= header".into(),
        })?;
    let expected = hash64(path_bytes(src));
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

fn epoch_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs()
}

fn parse_commit(sentinel_content: &str) -> Option<Commit> {
    let rest = sentinel_content.strip_prefix("commit ")?;
    let (hash_str, rest) = rest.split_once(' ')?;
    let (message, timestamp_str) = rest.rsplit_once(' ')?;
    Some(Commit {
        hash: parse_hex16(hash_str)?,
        message: message.to_string(),
        timestamp: timestamp_str.parse().ok()?,
    })
}

fn parse_branch(sentinel_content: &str) -> Option<(u64, String)> {
    let rest = sentinel_content.strip_prefix("branch ")?;
    let (hash_str, name) = rest.split_once(' ')?;
    Some((parse_hex16(hash_str)?, name.to_string()))
}
