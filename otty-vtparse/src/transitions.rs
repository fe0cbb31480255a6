//! Standard VT500 transition table.
//!
//! Encodes the DEC/ANSI state machine documented by Paul Williams
//! (<https://vt100.net/emu/dec_ansi_parser>) extended with 8-bit C1
//! introducers. The rules are installed as overlays on a table filled with
//! `(Error, Ground)`: later installs override earlier ones for the same
//! `(state, code)` cell, so the order below is part of the definition.

use std::iter;
use std::ops::RangeInclusive;
use std::sync::{Arc, LazyLock};

use crate::enums::{ParserAction, ParserState};
use crate::table::TransitionTable;

/// Shared, lazily built VT500 table used by every parser that does not
/// bring its own.
pub static VT500_TRANSITION_TABLE: LazyLock<Arc<TransitionTable>> =
    LazyLock::new(|| Arc::new(TransitionTable::vt500()));

const PRINTABLES: RangeInclusive<u8> = 0x20..=0x7e;
const INTERMEDIATES: RangeInclusive<u8> = 0x20..=0x2f;
const DIGITS: RangeInclusive<u8> = 0x30..=0x39;
const FINALS: RangeInclusive<u8> = 0x40..=0x7e;
const PRIVATE_MARKERS: RangeInclusive<u8> = 0x3c..=0x3f;

/// C0 controls executed in place: everything below 0x20 except CAN, SUB
/// and ESC, which are "anywhere" transitions.
fn executables() -> impl Iterator<Item = u8> {
    (0x00..=0x17).chain(iter::once(0x19)).chain(0x1c..=0x1f)
}

impl TransitionTable {
    /// Build the standard VT500 table.
    #[must_use]
    pub fn vt500() -> Self {
        use ParserAction::*;
        use ParserState::*;

        let mut t = TransitionTable::new();

        // printables
        t.set(PRINTABLES, Ground, Print, Some(Ground));

        // anywhere
        for state in ParserState::ALL {
            t.set([0x18, 0x1a, 0x99, 0x9a], state, Execute, Some(Ground));
            t.set(0x80..=0x8f, state, Execute, Some(Ground));
            t.set(0x90..=0x97, state, Execute, Some(Ground));
            // 8-bit ST
            t.set([0x9c], state, Ignore, Some(Ground));
            t.set([0x1b], state, Clear, Some(Escape));
            t.set([0x9d], state, OscStart, Some(OscString));
            t.set([0x98, 0x9e, 0x9f], state, Ignore, Some(SosPmApcString));
            t.set([0x9b], state, Clear, Some(CsiEntry));
            t.set([0x90], state, Clear, Some(DcsEntry));
        }

        // executables and DEL
        t.set(executables(), Ground, Execute, None);
        t.set([0x7f], Ground, Ignore, None);
        t.set(executables(), Escape, Execute, None);
        t.set([0x7f], Escape, Ignore, None);
        t.set(executables(), OscString, Ignore, None);
        t.set(executables(), CsiEntry, Execute, None);
        t.set([0x7f], CsiEntry, Ignore, None);
        t.set(executables(), CsiParam, Execute, None);
        t.set([0x7f], CsiParam, Ignore, None);
        t.set(executables(), CsiIgnore, Execute, None);
        t.set(executables(), CsiIntermediate, Execute, None);
        t.set([0x7f], CsiIntermediate, Ignore, None);
        t.set(executables(), EscapeIntermediate, Execute, None);
        t.set([0x7f], EscapeIntermediate, Ignore, None);

        // osc
        t.set([0x5d], Escape, OscStart, Some(OscString));
        t.set(PRINTABLES, OscString, OscPut, None);
        t.set([0x7f], OscString, OscPut, None);
        t.set([0x9c, 0x1b, 0x18, 0x1a, 0x07], OscString, OscEnd, Some(Ground));

        // sos/pm/apc: recognized, never dispatched
        t.set([0x58, 0x5e, 0x5f], Escape, Ignore, Some(SosPmApcString));
        t.set(PRINTABLES, SosPmApcString, Ignore, None);
        t.set([0x7f], SosPmApcString, Ignore, None);
        t.set(executables(), SosPmApcString, Ignore, None);
        t.set([0x9c], SosPmApcString, Ignore, Some(Ground));

        // csi
        t.set([0x5b], Escape, Clear, Some(CsiEntry));
        t.set(FINALS, CsiEntry, CsiDispatch, Some(Ground));
        t.set(DIGITS, CsiEntry, Param, Some(CsiParam));
        t.set([0x3b], CsiEntry, Param, Some(CsiParam));
        t.set(PRIVATE_MARKERS, CsiEntry, Collect, Some(CsiParam));
        t.set(DIGITS, CsiParam, Param, None);
        t.set([0x3b], CsiParam, Param, None);
        t.set(FINALS, CsiParam, CsiDispatch, Some(Ground));
        t.set([0x3a], CsiParam, Ignore, Some(CsiIgnore));
        t.set(PRIVATE_MARKERS, CsiParam, Ignore, Some(CsiIgnore));
        t.set(0x20..=0x3f, CsiIgnore, Ignore, None);
        t.set([0x7f], CsiIgnore, Ignore, None);
        t.set(FINALS, CsiIgnore, Ignore, Some(Ground));
        t.set([0x3a], CsiEntry, Ignore, Some(CsiIgnore));
        t.set(INTERMEDIATES, CsiEntry, Collect, Some(CsiIntermediate));
        t.set(INTERMEDIATES, CsiIntermediate, Collect, None);
        t.set(0x30..=0x3f, CsiIntermediate, Ignore, Some(CsiIgnore));
        t.set(FINALS, CsiIntermediate, CsiDispatch, Some(Ground));
        t.set(INTERMEDIATES, CsiParam, Collect, Some(CsiIntermediate));

        // esc and esc intermediates
        t.set(INTERMEDIATES, Escape, Collect, Some(EscapeIntermediate));
        t.set(INTERMEDIATES, EscapeIntermediate, Collect, None);
        t.set(0x30..=0x7e, EscapeIntermediate, EscDispatch, Some(Ground));
        t.set(0x30..=0x4f, Escape, EscDispatch, Some(Ground));
        t.set(0x51..=0x57, Escape, EscDispatch, Some(Ground));
        t.set([0x59, 0x5a, 0x5c], Escape, EscDispatch, Some(Ground));
        t.set(0x60..=0x7e, Escape, EscDispatch, Some(Ground));

        // dcs entry
        t.set([0x50], Escape, Clear, Some(DcsEntry));
        t.set(executables(), DcsEntry, Ignore, None);
        t.set([0x7f], DcsEntry, Ignore, None);
        t.set(INTERMEDIATES, DcsEntry, Collect, Some(DcsIntermediate));
        t.set([0x3a], DcsEntry, Ignore, Some(DcsIgnore));
        t.set(DIGITS, DcsEntry, Param, Some(DcsParam));
        t.set([0x3b], DcsEntry, Param, Some(DcsParam));
        t.set(PRIVATE_MARKERS, DcsEntry, Collect, Some(DcsParam));

        // dcs ignore
        t.set(executables(), DcsIgnore, Ignore, None);
        t.set(0x20..=0x7f, DcsIgnore, Ignore, None);

        // dcs param
        t.set(executables(), DcsParam, Ignore, None);
        t.set([0x7f], DcsParam, Ignore, None);
        t.set(DIGITS, DcsParam, Param, None);
        t.set([0x3b], DcsParam, Param, None);
        t.set([0x3a], DcsParam, Ignore, Some(DcsIgnore));
        t.set(PRIVATE_MARKERS, DcsParam, Ignore, Some(DcsIgnore));
        t.set(INTERMEDIATES, DcsParam, Collect, Some(DcsIntermediate));

        // dcs intermediate
        t.set(executables(), DcsIntermediate, Ignore, None);
        t.set([0x7f], DcsIntermediate, Ignore, None);
        t.set(INTERMEDIATES, DcsIntermediate, Collect, None);
        t.set(0x30..=0x3f, DcsIntermediate, Ignore, Some(DcsIgnore));

        // dcs hook
        t.set(FINALS, DcsIntermediate, DcsHook, Some(DcsPassthrough));
        t.set(FINALS, DcsParam, DcsHook, Some(DcsPassthrough));
        t.set(FINALS, DcsEntry, DcsHook, Some(DcsPassthrough));

        // dcs passthrough
        t.set(executables(), DcsPassthrough, DcsPut, None);
        t.set(PRINTABLES, DcsPassthrough, DcsPut, None);
        t.set([0x7f], DcsPassthrough, Ignore, None);
        t.set([0x1b, 0x9c], DcsPassthrough, DcsUnhook, Some(Ground));

        t
    }
}
