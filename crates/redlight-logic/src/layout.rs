//! Layout string parsing.
//!
//! A layout is a sequence of single-character commands:
//! `F` straight, `L` turn left, `R` turn right, `D` doorway, `X` dead end,
//! `E` end of layout. Parsing stops at the first `E`; everything after it
//! is ignored. ASCII whitespace is skipped so layouts can be split across
//! lines in config files. Any other character is a fatal configuration
//! error — nothing gets built from a layout that fails to parse.

use crate::modules::ModuleKind;

/// A layout parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// An unrecognized command character at the given byte index.
    UnknownToken { index: usize, token: char },
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::UnknownToken { index, token } => {
                write!(f, "unknown layout token '{}' at index {}", token, index)
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Parse a layout string into an ordered list of module kinds.
///
/// Returns the kinds for every command before the first `E` (or the whole
/// string if no `E` is present). An empty layout parses to an empty list.
pub fn parse_layout(layout: &str) -> Result<Vec<ModuleKind>, LayoutError> {
    let mut kinds = Vec::new();
    for (index, token) in layout.char_indices() {
        if token.is_ascii_whitespace() {
            continue;
        }
        if token == 'E' {
            break;
        }
        match ModuleKind::from_token(token) {
            Some(kind) => kinds.push(kind),
            None => return Err(LayoutError::UnknownToken { index, token }),
        }
    }
    Ok(kinds)
}
