//! Errors from the extraction engine. All of them are fatal for the page being extracted.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// An identifier or positional anchor the page template relies on is missing.
    #[error("Could not parse work page: missing {anchor} (page layout may have changed).")]
    StructuralMismatch { anchor: &'static str },

    #[error("Unknown categorization kind '{kind}' (page template may have changed).")]
    UnknownCategoryKind { kind: String },

    #[error("Could not read statistic '{field}' as a number: {raw:?}")]
    NumericFormat { field: String, raw: String },
}
