//! Bidirectional translator between a record and its on-disk line form.
use crate::error::Error;
use crate::hash::{hash64, hex16, parse_hex16};

/// A line decoded from a record file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A `key=value` line, with an optional trailing `#hash=H` claim.
    Record {
        /// The record's key.
        key: String,
        /// The record's value.
        value: Vec<u8>,
        /// The claimed hash, if the line carried a ` #hash=H` suffix.
        hash_claim: Option<u64>,
    },
    /// A `#`-prefixed line, not a record. Carries the text after the `#`.
    Sentinel(String),
}

const HASH_SUFFIX: &str = " #hash=";

/// Encodes a record as `key=value #hash=H\n`, where `H` is the 16-hex-digit
/// hash of the normalized `key=value` bytes.
///
/// Fails with [`Error::InvalidParam`] if `key` is empty, starts with `#`, or
/// either `key`/`value` contains `\n`/`\r` (which would break line framing).
pub fn encode_record(key: &str, value: &[u8]) -> Result<String, Error> {
    validate_key(key)?;
    if value.iter().any(|&b| b == b'\n' || b == b'\r') {
        return Err(Error::InvalidParam {
            reason: "value must not contain a newline".into(),
        });
    }
    let value = String::from_utf8_lossy(value);
    let body = format!("{key}={value}");
    let hash = hex16(hash64(body.as_bytes()));
    Ok(format!("{body}{HASH_SUFFIX}{hash}\n"))
}

/// Decodes a single line (without its trailing newline) from a record file.
///
/// Lines starting with `#` are sentinels, never records. Any other line that
/// does not contain a `=` is malformed and returned as [`Error::Corrupted`].
pub fn decode_line(raw: &str) -> Result<Line, Error> {
    let line = raw.trim_end_matches(['\n', '\r']);
    if let Some(rest) = line.strip_prefix('#') {
        return Ok(Line::Sentinel(rest.to_string()));
    }
    let (body, hash_claim) = match line.rfind(HASH_SUFFIX) {
        Some(idx) => {
            let claim = parse_hex16(&line[idx + HASH_SUFFIX.len()..]);
            (&line[..idx], claim)
        }
        None => (line, None),
    };
    let (key, value) = body.split_once('=').ok_or_else(|| Error::Corrupted {
        reason: format!("line has no '=' separator: {raw:?}"),
    })?;
    Ok(Line::Record {
        key: key.to_string(),
        value: value.as_bytes().to_vec(),
        hash_claim,
    })
}

/// Verifies a decoded record's hash claim, if any is present.
///
/// A missing claim (legacy line) is accepted as `Ok`. A present claim that
/// does not match the recomputed hash is `Corrupted`.
pub fn verify(key: &str, value: &[u8], hash_claim: Option<u64>) -> Result<(), Error> {
    match hash_claim {
        None => Ok(()),
        Some(claimed) => {
            let body = format!("{key}={}", String::from_utf8_lossy(value));
            let recomputed = hash64(body.as_bytes());
            if recomputed == claimed {
                Ok(())
            } else {
                Err(Error::Corrupted {
                    reason: format!("hash mismatch for key {key:?}"),
                })
            }
        }
    }
}

fn validate_key(key: &str) -> Result<(), Error> {
    if key.is_empty() {
        return Err(Error::InvalidParam {
            reason: "key must not be empty".into(),
        });
    }
    if key.starts_with('#') || key.contains(['\n', '\r']) {
        return Err(Error::InvalidParam {
            reason: "key must not start with '#' or contain a newline".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let line = encode_record("k", b"v").unwrap();
        match decode_line(&line).unwrap() {
            Line::Record { key, value, hash_claim } => {
                assert_eq!(key, "k");
                assert_eq!(value, b"v");
                assert!(hash_claim.is_some());
                verify(&key, &value, hash_claim).unwrap();
            }
            Line::Sentinel(_) => panic!("expected record"),
        }
    }

    #[test]
    fn embedded_equals_splits_on_first_only() {
        match decode_line("k=a=b=c #hash=0000000000000000").unwrap() {
            Line::Record { key, value, .. } => {
                assert_eq!(key, "k");
                assert_eq!(value, b"a=b=c");
            }
            Line::Sentinel(_) => panic!("expected record"),
        }
    }

    #[test]
    fn legacy_line_without_hash_is_accepted() {
        match decode_line("k=v").unwrap() {
            Line::Record { key, value, hash_claim } => {
                assert_eq!(key, "k");
                assert_eq!(value, b"v");
                assert!(hash_claim.is_none());
                verify(&key, &value, hash_claim).unwrap();
            }
            Line::Sentinel(_) => panic!("expected record"),
        }
    }

    #[test]
    fn tampered_equals_sign_is_corrupted_at_decode() {
        let mut line = encode_record("a", b"1").unwrap();
        line = line.replacen('=', "?", 1);
        assert!(decode_line(&line).is_err());
    }

    #[test]
    fn tampered_value_fails_verify() {
        let mut line = encode_record("a", b"1").unwrap();
        line = line.replace("a=1", "a=9");
        if let Line::Record { key, value, hash_claim } = decode_line(&line).unwrap() {
            assert!(verify(&key, &value, hash_claim).is_err());
        } else {
            panic!("expected record");
        }
    }

    #[test]
    fn sentinel_lines_are_not_records() {
        assert_eq!(
            decode_line("#commit 00 msg 1").unwrap(),
            Line::Sentinel("commit 00 msg 1".to_string())
        );
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(encode_record("", b"v").is_err());
    }
}
