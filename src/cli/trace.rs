//! Operation traces replayed by `popcache replay`.
//!
//! One operation per line:
//!
//! ```text
//! # comment
//! set <key> <value...>
//! get <key>
//! del <key>
//! ```

use serde::Serialize;

use crate::cache::{CacheStats, LruCache};
use crate::{PopcacheError, PopcacheResult};

/// A single trace operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceOp {
    /// Store a value.
    Set { key: String, value: String },
    /// Read a value.
    Get { key: String },
    /// Remove a value.
    Delete { key: String },
}

/// Result of a `get` during replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadOutcome {
    /// Key that was read.
    pub key: String,
    /// Value found, if any.
    pub value: Option<String>,
}

/// Everything a replay produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Every read, in trace order.
    pub reads: Vec<ReadOutcome>,
    /// Keys left in the cache, most recently used first.
    pub keys: Vec<String>,
    /// Final cache statistics.
    pub stats: CacheStats,
}

/// Parses a trace file.
pub fn parse_trace(content: &str) -> PopcacheResult<Vec<TraceOp>> {
    let mut ops = Vec::new();

    for (number, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let op = parts.next();
        let key = parts.next().map(str::to_string);
        let rest: Vec<&str> = parts.collect();

        let parsed = match (op, key) {
            (Some("set"), Some(key)) if !rest.is_empty() => TraceOp::Set {
                key,
                value: rest.join(" "),
            },
            (Some("get"), Some(key)) if rest.is_empty() => TraceOp::Get { key },
            (Some("del"), Some(key)) if rest.is_empty() => TraceOp::Delete { key },
            _ => {
                return Err(PopcacheError::config(format!(
                    "line {}: expected `set <key> <value>`, `get <key>` or `del <key>`, got `{}`",
                    number + 1,
                    line
                )))
            }
        };
        ops.push(parsed);
    }

    Ok(ops)
}

/// Applies `ops` to `cache` in order.
pub fn replay(cache: &LruCache<String, String>, ops: &[TraceOp]) -> PopcacheResult<ReplayReport> {
    let mut reads = Vec::new();

    for op in ops {
        match op {
            TraceOp::Set { key, value } => cache.set(key.clone(), value.clone())?,
            TraceOp::Get { key } => {
                let value = cache.get(key)?.into_option();
                reads.push(ReadOutcome {
                    key: key.clone(),
                    value,
                });
            }
            TraceOp::Delete { key } => {
                if !cache.delete(key)? {
                    tracing::debug!(key = %key, "delete of absent key");
                }
            }
        }
    }

    Ok(ReplayReport {
        reads,
        keys: cache.keys(),
        stats: cache.stats(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trace() {
        let ops = parse_trace(
            "# warm up\nset a 1\n\nset b hello world\nget a\ndel b\n",
        )
        .unwrap();

        assert_eq!(
            ops,
            vec![
                TraceOp::Set {
                    key: "a".into(),
                    value: "1".into()
                },
                TraceOp::Set {
                    key: "b".into(),
                    value: "hello world".into()
                },
                TraceOp::Get { key: "a".into() },
                TraceOp::Delete { key: "b".into() },
            ]
        );
    }

    #[test]
    fn test_parse_trace_rejects_bad_line() {
        let err = parse_trace("set a 1\nget\n").unwrap_err();
        assert!(matches!(err, PopcacheError::Config(_)));
        assert!(err.to_string().contains("line 2"));

        assert!(parse_trace("set a").is_err());
        assert!(parse_trace("get a b").is_err());
        assert!(parse_trace("put a 1").is_err());
    }

    #[test]
    fn test_replay() {
        let cache = LruCache::new(2);
        let ops = parse_trace("set a 1\nset b 2\nget a\nset c 3\nget b\n").unwrap();

        let report = replay(&cache, &ops).unwrap();

        assert_eq!(report.keys, vec!["c", "a"]);
        assert_eq!(
            report.reads,
            vec![
                ReadOutcome {
                    key: "a".into(),
                    value: Some("1".into())
                },
                ReadOutcome {
                    key: "b".into(),
                    value: None
                },
            ]
        );
        assert_eq!(report.stats.evictions, 1);
    }
}
