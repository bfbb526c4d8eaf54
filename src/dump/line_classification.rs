//! Line Classification
//!
//! Recognizes the two line shapes of a tree dump and extracts their typed fields.
//!
//! ```text
//! leaf:   <tabs><id>:leaf=<float>
//! split:  <tabs><id>:[<name><<float>] yes=<id>,no=<id>[,missing=<id>][,<stats>]
//! ```
//!
//! The indentation depth is the number of leading tab characters. Trailing
//! whitespace (including `\r`) is not part of the line. Split lines may carry
//! trailing statistics (`gain=`, `cover=`) which are ignored; leaf lines must
//! end right after the value.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Signed decimal literal with optional fraction and exponent.
pub const FLOAT_PATTERN: &str = r"[-+]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][-+]?[0-9]+)?";

/// Value substituted for `nan` / `-nan` leaf literals.
pub const NAN_SENTINEL: &str = "-999";

static LEAF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?P<indent>\t*)(?P<id>[0-9]+):leaf=(?P<value>{FLOAT_PATTERN})$"
    ))
    .expect("leaf grammar is a valid regex")
});

static SPLIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?P<indent>\t*)(?P<id>[0-9]+):\[(?P<var>.+)<(?P<cut>{FLOAT_PATTERN})\]\s+yes=(?P<yes>[0-9]+),no=(?P<no>[0-9]+)(?:,missing=(?P<missing>[0-9]+))?(?:,.*)?$"
    ))
    .expect("split grammar is a valid regex")
});

/// The typed payload of a dump line
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    Leaf {
        value: f64,
    },
    Split {
        variable: String,
        threshold: f64,
        yes: u32,
        no: u32,
        missing: Option<u32>,
    },
}

/// One classified dump line
#[derive(Debug, Clone, PartialEq)]
pub struct DumpLine {
    /// Number of leading indent markers
    pub depth: usize,
    /// Node id as declared by the training library
    pub id: u32,
    pub kind: LineKind,
}

impl DumpLine {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, LineKind::Leaf { .. })
    }
}

/// Classify one dump line, or return `None` if it matches neither grammar.
///
/// With `nan_substitution` enabled, `-nan` and then `nan` are replaced by
/// [`NAN_SENTINEL`] on leaf lines before matching. Literals that are valid
/// per the grammar but not representable (overflowing to infinity) and ids
/// that overflow `u32` are treated as mismatches.
pub fn classify_line(line: &str, nan_substitution: bool) -> Option<DumpLine> {
    let line = line.trim_end();

    if line.contains(":leaf=") {
        let line = if nan_substitution {
            substitute_nan(line)
        } else {
            Cow::Borrowed(line)
        };
        return classify_leaf(&line);
    }

    classify_split(line)
}

fn classify_leaf(line: &str) -> Option<DumpLine> {
    let caps = LEAF_REGEX.captures(line)?;

    Some(DumpLine {
        depth: caps["indent"].len(),
        id: caps["id"].parse().ok()?,
        kind: LineKind::Leaf {
            value: parse_finite(&caps["value"])?,
        },
    })
}

fn classify_split(line: &str) -> Option<DumpLine> {
    let caps = SPLIT_REGEX.captures(line)?;

    let missing = match caps.name("missing") {
        Some(m) => Some(m.as_str().parse().ok()?),
        None => None,
    };

    Some(DumpLine {
        depth: caps["indent"].len(),
        id: caps["id"].parse().ok()?,
        kind: LineKind::Split {
            variable: caps["var"].to_string(),
            threshold: parse_finite(&caps["cut"])?,
            yes: caps["yes"].parse().ok()?,
            no: caps["no"].parse().ok()?,
            missing,
        },
    })
}

fn substitute_nan(line: &str) -> Cow<'_, str> {
    if !line.contains("nan") {
        return Cow::Borrowed(line);
    }
    Cow::Owned(
        line.replace("-nan", NAN_SENTINEL)
            .replace("nan", NAN_SENTINEL),
    )
}

fn parse_finite(literal: &str) -> Option<f64> {
    literal.parse::<f64>().ok().filter(|v| v.is_finite())
}
