//! The `start,end|H` line codec for half-open intervals.
use crate::error::Error;
use store::{hash64, hex16, parse_hex16};

/// A half-open `[start, end)` interval.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Interval {
    pub start: u64,
    pub end: u64,
}

impl Interval {
    pub fn new(start: u64, end: u64) -> Result<Self, Error> {
        if start >= end {
            return Err(Error::InvalidParam {
                reason: format!("start {start} must be < end {end}"),
            });
        }
        Ok(Interval { start, end })
    }

    /// `start < query.end && query.start < end` — half-open overlap.
    pub fn overlaps(&self, query: &Interval) -> bool {
        self.start < query.end && query.start < self.end
    }

    fn hash_body(&self) -> String {
        format!("{},{}", self.start, self.end)
    }

    fn hash(&self) -> u64 {
        hash64(self.hash_body().as_bytes())
    }

    pub fn encode(&self) -> String {
        format!("{}|{}\n", self.hash_body(), hex16(self.hash()))
    }
}

/// A decoded interval line, or a non-interval line preserved verbatim.
pub enum Line {
    Interval(Interval),
    Other,
}

/// Decodes one line of an interval file. A line with no `|H` suffix, or
/// whose `start,end` portion doesn't parse as two `u64`s, is `Other` and
/// passed through unchanged by callers (mirrors `store`'s sentinel lines).
pub fn decode_line(raw: &str) -> Line {
    match try_decode(raw) {
        Some((interval, claimed)) => {
            if claimed == interval.hash() {
                Line::Interval(interval)
            } else {
                Line::Other
            }
        }
        None => Line::Other,
    }
}

/// Like [`decode_line`], but a recognized-shape line with a wrong hash is
/// reported as [`Error::Corrupted`] instead of silently passed through.
pub fn decode_line_strict(raw: &str) -> Result<Line, Error> {
    match try_decode(raw) {
        Some((interval, claimed)) => {
            if claimed == interval.hash() {
                Ok(Line::Interval(interval))
            } else {
                Err(Error::Corrupted {
                    reason: format!("hash mismatch on interval line: {raw:?}"),
                })
            }
        }
        None => Ok(Line::Other),
    }
}

fn try_decode(raw: &str) -> Option<(Interval, u64)> {
    let (body, hash_str) = raw.rsplit_once('|')?;
    let claimed = parse_hex16(hash_str)?;
    let (start_str, end_str) = body.split_once(',')?;
    let start: u64 = start_str.parse().ok()?;
    let end: u64 = end_str.parse().ok()?;
    Some((Interval { start, end }, claimed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let iv = Interval::new(10, 20).unwrap();
        let line = iv.encode();
        match decode_line_strict(line.trim_end()).unwrap() {
            Line::Interval(decoded) => assert_eq!(decoded, iv),
            Line::Other => panic!("expected interval"),
        }
    }

    #[test]
    fn start_must_be_less_than_end() {
        assert!(Interval::new(5, 5).is_err());
        assert!(Interval::new(6, 5).is_err());
    }

    #[test]
    fn overlap_is_half_open() {
        let a = Interval::new(10, 20).unwrap();
        assert!(a.overlaps(&Interval::new(18, 22).unwrap()));
        assert!(!a.overlaps(&Interval::new(20, 25).unwrap()));
    }

    #[test]
    fn tampered_hash_is_corrupted_under_strict_decoding() {
        let iv = Interval::new(10, 20).unwrap();
        let line = iv.encode();
        let (body, hash) = line.trim_end().rsplit_once('|').unwrap();
        let mut flipped = hash.as_bytes().to_vec();
        let last = flipped.last_mut().unwrap();
        *last = if *last == b'0' { b'1' } else { b'0' };
        let tampered = format!("{body}|{}", String::from_utf8(flipped).unwrap());
        assert!(decode_line_strict(&tampered).is_err());
    }
}
