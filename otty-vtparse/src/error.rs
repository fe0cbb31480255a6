use thiserror::Error;

use crate::table::TABLE_WIDTH;

/// Errors raised while building a custom [`TransitionTable`](crate::TransitionTable).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error(
        "code unit {code:#06x} is outside of the tabulated range (< {width:#04x})",
        width = TABLE_WIDTH
    )]
    CodeOutOfRange { code: u16 },
}

pub type Result<T> = std::result::Result<T, TableError>;
