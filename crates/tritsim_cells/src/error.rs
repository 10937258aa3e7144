//! Errors raised while instantiating cells from their descriptions.

/// Errors that can occur when building a cell.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CellError {
    /// No factory is registered for the celltype.
    #[error("unknown celltype '{0}'")]
    UnknownCellType(String),

    /// A parameter the celltype cannot do without is absent.
    #[error("{celltype}: missing parameter '{param}'")]
    MissingParameter {
        /// Celltype being built.
        celltype: String,
        /// Name of the missing parameter.
        param: &'static str,
    },

    /// A parameter is present but unusable.
    #[error("{celltype}: {reason}")]
    InvalidParameter {
        /// Celltype being built.
        celltype: String,
        /// What is wrong with the parameter.
        reason: String,
    },

    /// A row of an FSM transition table is malformed.
    #[error("transition table row {row}: {reason}")]
    InvalidTransitionTable {
        /// Zero-based row index.
        row: usize,
        /// What is wrong with the row.
        reason: String,
    },
}

impl CellError {
    pub(crate) fn missing(celltype: &str, param: &'static str) -> Self {
        CellError::MissingParameter {
            celltype: celltype.to_string(),
            param,
        }
    }

    pub(crate) fn invalid(celltype: &str, reason: impl Into<String>) -> Self {
        CellError::InvalidParameter {
            celltype: celltype.to_string(),
            reason: reason.into(),
        }
    }
}
