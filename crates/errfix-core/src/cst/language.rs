//! Rowan language implementation for Python
//!
//! Connects [`PySyntaxKind`] to rowan's generic tree types.

use rowan::Language;

use super::PySyntaxKind;

/// Zero-sized marker tying Python syntax kinds to rowan trees
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PyLanguage;

impl Language for PyLanguage {
    type Kind = PySyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match PySyntaxKind::ALL.get(raw.0 as usize) {
            Some(kind) => *kind,
            None => {
                tracing::warn!("Unknown syntax kind: {}", raw.0);
                PySyntaxKind::Unknown
            }
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}
