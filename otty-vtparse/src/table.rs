//! Packed `(state, code unit) -> (action, next state)` lookup structure.
//!
//! Each cell is a single byte: the [`ParserAction`] in the high nibble and
//! the target [`ParserState`] in the low nibble. Rows are addressed by
//! `state * TABLE_WIDTH + code`, so a lookup is one bounds-checked read.
//! Code units at or above [`TABLE_WIDTH`] are not tabulated and resolve to
//! the shared `(Error, Ground)` entry; the parser re-specializes that entry
//! per state.

use std::fmt;

use crate::enums::{ParserAction, ParserState};
use crate::error::{Result, TableError};

/// Number of code units tabulated per state (`0x00..0xa0`).
pub const TABLE_WIDTH: usize = 0xa0;

/// Number of parser states, i.e. table rows.
pub const STATE_COUNT: usize = ParserState::ALL.len();

const TABLE_LEN: usize = STATE_COUNT * TABLE_WIDTH;

/// Packed transition word.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition(u8);

impl Transition {
    #[inline(always)]
    pub const fn new(action: ParserAction, next: ParserState) -> Self {
        Self(((action as u8) << 4) | next as u8)
    }

    #[inline(always)]
    pub const fn action(self) -> ParserAction {
        ParserAction::from_bits(self.0)
    }

    #[inline(always)]
    pub const fn next_state(self) -> ParserState {
        ParserState::from_bits(self.0)
    }

    /// Same action, different target state.
    #[inline(always)]
    pub(crate) const fn retarget(self, next: ParserState) -> Self {
        Self((self.0 & 0xf0) | next as u8)
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transition")
            .field(&self.action())
            .field(&self.next_state())
            .finish()
    }
}

/// Entry used for every untabulated or unassigned cell.
pub const DEFAULT_TRANSITION: Transition =
    Transition::new(ParserAction::Error, ParserState::Ground);

/// Dense transition table covering every state and code units below
/// [`TABLE_WIDTH`].
///
/// Installs are order dependent: a later [`add`](Self::add) for the same
/// `(state, code)` cell overwrites the earlier one.
#[derive(Clone, PartialEq, Eq)]
pub struct TransitionTable {
    cells: [Transition; TABLE_LEN],
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionTable")
            .field("states", &STATE_COUNT)
            .field("width", &TABLE_WIDTH)
            .finish_non_exhaustive()
    }
}

impl TransitionTable {
    /// Table where every cell holds [`DEFAULT_TRANSITION`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: [DEFAULT_TRANSITION; TABLE_LEN],
        }
    }

    /// Install one transition.
    ///
    /// `next == None` keeps the parser in `state`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::CodeOutOfRange`] when `code` is not below
    /// [`TABLE_WIDTH`].
    pub fn add(
        &mut self,
        code: u16,
        state: ParserState,
        action: ParserAction,
        next: Option<ParserState>,
    ) -> Result<()> {
        let index = usize::from(code);
        if index >= TABLE_WIDTH {
            return Err(TableError::CodeOutOfRange { code });
        }

        self.cells[state as usize * TABLE_WIDTH + index] =
            Transition::new(action, next.unwrap_or(state));
        Ok(())
    }

    /// Install the same transition for every code in `codes`.
    ///
    /// Codes before the first out-of-range one are kept installed.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::CodeOutOfRange`] for the first code that is
    /// not below [`TABLE_WIDTH`].
    pub fn add_many<I>(
        &mut self,
        codes: I,
        state: ParserState,
        action: ParserAction,
        next: Option<ParserState>,
    ) -> Result<()>
    where
        I: IntoIterator<Item = u16>,
    {
        codes
            .into_iter()
            .try_for_each(|code| self.add(code, state, action, next))
    }

    /// Infallible install used by the built-in definitions, whose codes are
    /// byte constants below [`TABLE_WIDTH`].
    pub(crate) fn set<I>(
        &mut self,
        codes: I,
        state: ParserState,
        action: ParserAction,
        next: Option<ParserState>,
    ) where
        I: IntoIterator<Item = u8>,
    {
        let transition = Transition::new(action, next.unwrap_or(state));
        let row = state as usize * TABLE_WIDTH;

        for code in codes {
            let code = usize::from(code);
            debug_assert!(code < TABLE_WIDTH, "untabulated code {code:#04x}");
            if code < TABLE_WIDTH {
                self.cells[row + code] = transition;
            }
        }
    }

    /// Transition for `code` in `state`.
    #[inline(always)]
    pub fn lookup(&self, state: ParserState, code: u16) -> Transition {
        let code = usize::from(code);
        if code < TABLE_WIDTH {
            self.cells[state as usize * TABLE_WIDTH + code]
        } else {
            DEFAULT_TRANSITION
        }
    }
}
