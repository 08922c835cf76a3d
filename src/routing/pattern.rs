//! Pattern grammar.
//!
//! A pattern is a sequence of literal runs and capture markers:
//! `{name}` captures up to the next `/` or a declared tail literal,
//! `{name:regex}` additionally constrains the capture (anchored both ends),
//! `*` / `*name` captures the remainder of the path and must terminate the
//! pattern. The byte immediately following a `}` becomes the capture's
//! tail delimiter (default `/`).

use regex::Regex;
use thiserror::Error;

use super::node::NodeKind;

/// Grammar violations detected at insertion time. Matching never errors;
/// a route that fails to register must fail configuration loudly.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A `{` capture without its closing `}`.
    #[error("unterminated parameter capture in pattern {pattern:?}")]
    UnterminatedParam { pattern: String },

    /// The regex constraint did not compile.
    #[error("invalid regex {rexpat:?} in route pattern")]
    InvalidRegex {
        rexpat: String,
        #[source]
        source: regex::Error,
    },

    /// A `*` capture with trailing pattern text after it.
    #[error("wildcard must terminate the pattern: {pattern:?}")]
    WildcardNotLast { pattern: String },

    /// The same parameter name captured twice in one pattern.
    #[error("duplicate parameter name {name:?} in pattern {pattern:?}")]
    DuplicateParamName { pattern: String, name: String },

    /// Mux-level rule: registered patterns are absolute.
    #[error("route pattern must begin with '/': {pattern:?}")]
    MissingLeadingSlash { pattern: String },
}

/// One parsed pattern segment: the next capture marker (or the whole
/// remaining literal when there is none).
#[derive(Debug)]
pub(crate) struct Segment<'p> {
    pub kind: NodeKind,
    pub key: &'p str,
    /// Anchored regex source; empty unless `kind == Regexp`.
    pub rexpat: String,
    pub tail: u8,
    pub start: usize,
    pub end: usize,
}

pub(crate) const TAIL_DELIM: u8 = b'/';

/// Scan `pattern` for its next segment: literal runs are reported whole,
/// capture markers with their byte range and tail.
pub(crate) fn next_segment(pattern: &str) -> Result<Segment<'_>, PatternError> {
    let ps = pattern.find('{');
    let ws = pattern.find('*');

    if ps.is_none() && ws.is_none() {
        return Ok(Segment {
            kind: NodeKind::Static,
            key: "",
            rexpat: String::new(),
            tail: 0,
            start: 0,
            end: pattern.len(),
        });
    }

    // A '*' before any '{' is a wildcard segment and must end the pattern;
    // anything after it is its name.
    if let Some(ws) = ws.filter(|ws| ps.map_or(true, |ps| *ws < ps)) {
        let name = &pattern[ws + 1..];
        if name.contains(['/', '{', '*']) {
            return Err(PatternError::WildcardNotLast {
                pattern: pattern.to_string(),
            });
        }
        return Ok(Segment {
            kind: NodeKind::CatchAll,
            key: "*",
            rexpat: String::new(),
            tail: 0,
            start: ws,
            end: pattern.len(),
        });
    }

    let ps = match ps {
        Some(ps) => ps,
        // unreachable by the checks above; treat as literal
        None => {
            return Ok(Segment {
                kind: NodeKind::Static,
                key: "",
                rexpat: String::new(),
                tail: 0,
                start: 0,
                end: pattern.len(),
            })
        }
    };

    // Scan to the balancing close brace; regex constraints may nest braces
    // ({id:[0-9]{2}}).
    let mut depth = 0usize;
    let mut pe = ps;
    for (i, c) in pattern[ps..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    pe = ps + i;
                    break;
                }
            }
            _ => {}
        }
    }
    if pe == ps {
        return Err(PatternError::UnterminatedParam {
            pattern: pattern.to_string(),
        });
    }

    let mut key = &pattern[ps + 1..pe];
    let pe = pe + 1;
    let tail = if pe < pattern.len() {
        pattern.as_bytes()[pe]
    } else {
        TAIL_DELIM
    };

    let mut kind = NodeKind::Param;
    let mut rexpat = String::new();
    if let Some(idx) = key.find(':') {
        kind = NodeKind::Regexp;
        rexpat = anchor(&key[idx + 1..]);
        key = &key[..idx];
    }

    Ok(Segment {
        kind,
        key,
        rexpat,
        tail,
        start: ps,
        end: pe,
    })
}

/// Force the constraint to cover the whole captured region.
fn anchor(rexpat: &str) -> String {
    if rexpat.is_empty() {
        return String::new();
    }
    let mut anchored = String::with_capacity(rexpat.len() + 2);
    if !rexpat.starts_with('^') {
        anchored.push('^');
    }
    anchored.push_str(rexpat);
    if !rexpat.ends_with('$') {
        anchored.push('$');
    }
    anchored
}

/// Validate the full pattern and collect its capture keys in order.
/// This runs before any tree mutation so a malformed pattern cannot leave
/// a half-inserted route behind.
pub(crate) fn param_keys(pattern: &str) -> Result<Vec<String>, PatternError> {
    let mut keys: Vec<String> = Vec::new();
    let mut rest = pattern;
    loop {
        let seg = next_segment(rest)?;
        if seg.kind == NodeKind::Static {
            return Ok(keys);
        }
        if seg.kind == NodeKind::Regexp && !seg.rexpat.is_empty() {
            Regex::new(&seg.rexpat).map_err(|source| PatternError::InvalidRegex {
                rexpat: seg.rexpat.clone(),
                source,
            })?;
        }
        if keys.iter().any(|k| k == seg.key) {
            return Err(PatternError::DuplicateParamName {
                pattern: pattern.to_string(),
                name: seg.key.to_string(),
            });
        }
        keys.push(seg.key.to_string());
        rest = &rest[seg.end..];
    }
}

/// Public validation probe: does `pattern` parse under the route grammar?
pub fn check_pattern(pattern: &str) -> Result<(), PatternError> {
    param_keys(pattern).map(|_| ())
}

/// Length in bytes of the shared prefix of `a` and `b`.
pub(crate) fn longest_prefix(a: &str, b: &str) -> usize {
    a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_segment() {
        let seg = next_segment("/articles/near").unwrap();
        assert_eq!(seg.kind, NodeKind::Static);
        assert_eq!(seg.end, "/articles/near".len());
    }

    #[test]
    fn test_param_segment_with_tail() {
        let seg = next_segment("{id}.json").unwrap();
        assert_eq!(seg.kind, NodeKind::Param);
        assert_eq!(seg.key, "id");
        assert_eq!(seg.tail, b'.');
        assert_eq!((seg.start, seg.end), (0, 4));
    }

    #[test]
    fn test_param_default_tail() {
        let seg = next_segment("{slug}").unwrap();
        assert_eq!(seg.tail, b'/');
    }

    #[test]
    fn test_regex_segment_is_anchored() {
        let seg = next_segment("{id:[0-9]+}/posts").unwrap();
        assert_eq!(seg.kind, NodeKind::Regexp);
        assert_eq!(seg.rexpat, "^[0-9]+$");
        assert_eq!(seg.tail, b'/');
    }

    #[test]
    fn test_regex_nested_braces() {
        let seg = next_segment("{rid:^[0-9]{5,6}}").unwrap();
        assert_eq!(seg.rexpat, "^[0-9]{5,6}$");
        assert_eq!(seg.end, "{rid:^[0-9]{5,6}}".len());
    }

    #[test]
    fn test_wildcard_segment() {
        let seg = next_segment("*name").unwrap();
        assert_eq!(seg.kind, NodeKind::CatchAll);
        assert_eq!(seg.key, "*");
        assert_eq!(seg.end, 5);
    }

    #[test]
    fn test_wildcard_must_be_last() {
        assert!(matches!(
            next_segment("*/more"),
            Err(PatternError::WildcardNotLast { .. })
        ));
    }

    #[test]
    fn test_unterminated_param() {
        assert!(matches!(
            next_segment("{id"),
            Err(PatternError::UnterminatedParam { .. })
        ));
    }

    #[test]
    fn test_param_keys_in_order() {
        let keys = param_keys("/articles/{id}/posts/{month}/{day}/*").unwrap();
        assert_eq!(keys, ["id", "month", "day", "*"]);
    }

    #[test]
    fn test_param_keys_duplicate() {
        assert!(matches!(
            param_keys("/articles/{id}/{id}"),
            Err(PatternError::DuplicateParamName { .. })
        ));
    }

    #[test]
    fn test_param_keys_bad_regex() {
        assert!(matches!(
            param_keys("/articles/{id:[0-9}"),
            Err(PatternError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_longest_prefix() {
        assert_eq!(longest_prefix("/articles", "/articlefun"), 8);
        assert_eq!(longest_prefix("abc", "xyz"), 0);
    }
}
