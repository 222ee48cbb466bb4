//! Cell and sheet protection rules consulted by selection gating.
//!
//! The engine only reads protection; it never changes it. A candidate
//! selection is legal when every cell in it may be selected under the sheet's
//! `selectLockedCells` / `selectUnlockedCells` flags.

use serde::{Deserialize, Serialize};

use crate::cell_ref::cell_label;
use crate::types::{CellIndex, Rectangle};

/// Sheet-level selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProtectionPolicy {
    /// Whether the sheet is protected; an unprotected sheet allows everything
    pub sheet: bool,
    /// Whether selecting locked cells is allowed
    pub select_locked_cells: bool,
    /// Whether selecting unlocked cells is allowed
    pub select_unlocked_cells: bool,
}

impl Default for ProtectionPolicy {
    fn default() -> Self {
        Self {
            sheet: false,
            select_locked_cells: true,
            select_unlocked_cells: true,
        }
    }
}

impl ProtectionPolicy {
    /// A protected sheet with the given selection flags
    pub const fn protected(select_locked_cells: bool, select_unlocked_cells: bool) -> Self {
        Self {
            sheet: true,
            select_locked_cells,
            select_unlocked_cells,
        }
    }

    /// True when no cell can ever be blocked
    pub fn is_unrestricted(&self) -> bool {
        !self.sheet || (self.select_locked_cells && self.select_unlocked_cells)
    }

    /// May a cell with the given lock state be selected?
    pub fn allows(&self, locked: bool) -> bool {
        if !self.sheet {
            return true;
        }
        if locked {
            self.select_locked_cells
        } else {
            self.select_unlocked_cells
        }
    }
}

/// Why a candidate selection was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// A locked cell while `selectLockedCells` is off
    LockedCell(CellIndex),
    /// An unlocked cell while `selectUnlockedCells` is off
    UnlockedCell(CellIndex),
}

impl BlockReason {
    pub fn cell(&self) -> CellIndex {
        match self {
            Self::LockedCell(cell) | Self::UnlockedCell(cell) => *cell,
        }
    }

    /// User-facing message for the toast collaborator
    pub fn message(&self) -> String {
        match self {
            Self::LockedCell(cell) => format!(
                "Cell {} is locked and the sheet does not allow selecting locked cells",
                cell_label(*cell)
            ),
            Self::UnlockedCell(cell) => format!(
                "Cell {} is unlocked and the sheet does not allow selecting unlocked cells",
                cell_label(*cell)
            ),
        }
    }
}

/// Check every cell of `rect` against the policy.
///
/// Returns the first offending cell in row-major order, or `None` when the
/// whole rectangle may be selected.
pub fn selection_block_reason(
    policy: &ProtectionPolicy,
    rect: &Rectangle,
    is_locked: impl Fn(CellIndex) -> bool,
) -> Option<BlockReason> {
    if policy.is_unrestricted() {
        return None;
    }
    rect.cells().find_map(|cell| {
        let locked = is_locked(cell);
        if policy.allows(locked) {
            None
        } else if locked {
            Some(BlockReason::LockedCell(cell))
        } else {
            Some(BlockReason::UnlockedCell(cell))
        }
    })
}
