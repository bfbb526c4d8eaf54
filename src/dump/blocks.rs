//! Splitting a full model dump into per-tree blocks
//!
//! A dump written to a single file prefixes every tree with a marker line:
//!
//! ```text
//! booster[0]:
//! 0:[f1<0.5] yes=1,no=2,missing=1
//! ...
//! booster[1]:
//! 0:leaf=-0.02
//! ```
//!
//! Text without any marker is taken as a single tree block.

use crate::error::ConvertError;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

static BOOSTER_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^booster\[(?P<index>[0-9]+)\]:?$").expect("marker pattern is a valid regex")
});

/// The source text of one tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpBlock<'a> {
    /// Position of the block in the dump
    pub index: usize,
    /// Number written in the `booster[N]` marker, if any
    pub marker: Option<u32>,
    pub text: &'a str,
}

/// Split dump text at `booster[N]` marker lines.
///
/// Non-blank text ahead of the first marker is reported as a malformed line
/// of tree 0.
pub fn split_blocks(text: &str) -> Result<Vec<DumpBlock<'_>>, ConvertError> {
    let mut blocks = Vec::new();
    // (marker, byte offset where the block body starts)
    let mut current: Option<(Option<u32>, usize)> = None;
    let mut preamble: Option<(usize, &str)> = None;
    let mut offset = 0;

    for (i, raw) in text.split_inclusive('\n').enumerate() {
        let line = raw.trim();
        if let Some(caps) = BOOSTER_MARKER.captures(line) {
            match current.take() {
                Some((marker, start)) => blocks.push(DumpBlock {
                    index: blocks.len(),
                    marker,
                    text: &text[start..offset],
                }),
                None => {
                    if let Some((line_number, content)) = preamble {
                        return Err(ConvertError::MalformedLine {
                            tree: 0,
                            line: line_number,
                            text: content.to_string(),
                        });
                    }
                }
            }
            current = Some((caps["index"].parse().ok(), offset + raw.len()));
        } else if current.is_none() && preamble.is_none() && !line.is_empty() {
            preamble = Some((i + 1, raw.trim_end()));
        }
        offset += raw.len();
    }

    match current {
        Some((marker, start)) => blocks.push(DumpBlock {
            index: blocks.len(),
            marker,
            text: &text[start..],
        }),
        None if preamble.is_some() => blocks.push(DumpBlock {
            index: 0,
            marker: None,
            text,
        }),
        None => {}
    }

    info!(trees = blocks.len(), "split dump into tree blocks");
    Ok(blocks)
}
