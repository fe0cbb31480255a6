/// States of the DEC/ANSI parser.
///
/// Discriminants are stable: they occupy the low nibble of a packed
/// [`Transition`](crate::Transition) and index the rows of a
/// [`TransitionTable`](crate::TransitionTable).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ParserState {
    #[default]
    Ground = 0,
    Escape = 1,
    EscapeIntermediate = 2,
    CsiEntry = 3,
    CsiParam = 4,
    CsiIntermediate = 5,
    CsiIgnore = 6,
    SosPmApcString = 7,
    OscString = 8,
    DcsEntry = 9,
    DcsParam = 10,
    DcsIgnore = 11,
    DcsIntermediate = 12,
    DcsPassthrough = 13,
}

impl ParserState {
    /// Every state, in discriminant order.
    pub const ALL: [ParserState; 14] = [
        ParserState::Ground,
        ParserState::Escape,
        ParserState::EscapeIntermediate,
        ParserState::CsiEntry,
        ParserState::CsiParam,
        ParserState::CsiIntermediate,
        ParserState::CsiIgnore,
        ParserState::SosPmApcString,
        ParserState::OscString,
        ParserState::DcsEntry,
        ParserState::DcsParam,
        ParserState::DcsIgnore,
        ParserState::DcsIntermediate,
        ParserState::DcsPassthrough,
    ];

    /// Decode the low nibble of a packed transition.
    #[inline(always)]
    pub(crate) const fn from_bits(bits: u8) -> Self {
        use ParserState::*;

        match bits & 0x0f {
            1 => Escape,
            2 => EscapeIntermediate,
            3 => CsiEntry,
            4 => CsiParam,
            5 => CsiIntermediate,
            6 => CsiIgnore,
            7 => SosPmApcString,
            8 => OscString,
            9 => DcsEntry,
            10 => DcsParam,
            11 => DcsIgnore,
            12 => DcsIntermediate,
            13 => DcsPassthrough,
            _ => Ground,
        }
    }
}

/// Side effects attached to a transition.
///
/// Discriminants are stable: they occupy the high nibble of a packed
/// [`Transition`](crate::Transition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ParserAction {
    Print = 0,
    Execute = 1,
    Ignore = 2,
    Error = 3,
    CsiDispatch = 4,
    Param = 5,
    Collect = 6,
    EscDispatch = 7,
    Clear = 8,
    DcsHook = 9,
    DcsPut = 10,
    DcsUnhook = 11,
    OscStart = 12,
    OscPut = 13,
    OscEnd = 14,
}

impl ParserAction {
    /// Decode the high nibble of a packed transition.
    #[inline(always)]
    pub(crate) const fn from_bits(bits: u8) -> Self {
        use ParserAction::*;

        match bits >> 4 {
            0 => Print,
            1 => Execute,
            2 => Ignore,
            4 => CsiDispatch,
            5 => Param,
            6 => Collect,
            7 => EscDispatch,
            8 => Clear,
            9 => DcsHook,
            10 => DcsPut,
            11 => DcsUnhook,
            12 => OscStart,
            13 => OscPut,
            14 => OscEnd,
            _ => Error,
        }
    }
}
