use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::dcs::{self, SharedDcsHandler};
use crate::enums::{ParserAction, ParserState};
use crate::handlers::{ErrorAction, Handlers, flag_char};
use crate::options::ParserOptions;
use crate::table::{TABLE_WIDTH, Transition, TransitionTable};

const ESC: u16 = 0x1b;
const CAN: u16 = 0x18;
const SUB: u16 = 0x1a;
const PARAM_SEPARATOR: u16 = 0x3b;

/// Snapshot of the working state handed to the error handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsingState<'a> {
    /// Offset of the offending code unit in the current chunk.
    pub position: usize,
    pub code: u16,
    pub current_state: ParserState,
    /// Start of the open print run, if any.
    pub print: Option<usize>,
    /// Start of the open DCS payload run, if any.
    pub dcs: Option<usize>,
    pub osc: &'a [u16],
    pub collect: &'a str,
    pub params: &'a [i64],
}

/// Sequence buffers that persist between `parse` calls.
#[derive(Debug)]
struct Buffers {
    collect: String,
    params: Vec<i64>,
    params_full: bool,
    osc: Vec<u16>,
    max_params: usize,
    max_osc_len: usize,
}

impl Buffers {
    fn new(options: &ParserOptions) -> Self {
        Self {
            collect: String::new(),
            params: vec![0],
            params_full: false,
            osc: Vec::new(),
            max_params: options.max_params.max(1),
            max_osc_len: options.max_osc_len,
        }
    }

    fn clear(&mut self) {
        self.collect.clear();
        self.params.clear();
        self.params.push(0);
        self.params_full = false;
        self.osc.clear();
    }

    #[inline(always)]
    fn digit(&mut self, code: u16) {
        if self.params_full {
            return;
        }

        if let Some(last) = self.params.last_mut() {
            *last = last.saturating_mul(10).saturating_add(i64::from(code - 0x30));
        }
    }

    fn param(&mut self, code: u16) {
        if code == PARAM_SEPARATOR {
            if self.params.len() < self.max_params {
                self.params.push(0);
            } else {
                self.params_full = true;
            }
        } else if is_digit(code) {
            self.digit(code);
        }
    }

    fn osc_put(&mut self, code: u16) {
        if self.osc.len() < self.max_osc_len {
            self.osc.push(code);
        }
    }
}

#[inline(always)]
const fn is_printable(code: u16) -> bool {
    code >= 0x20 && code < 0x7f
}

#[inline(always)]
const fn is_digit(code: u16) -> bool {
    code >= 0x30 && code <= 0x39
}

/// Table-driven DEC/ANSI escape sequence parser.
///
/// Feed it chunks of UTF-16 code units with [`parse`](Self::parse); it calls
/// the registered [`Handlers`] in input order. Partial sequences are kept
/// between calls, so splitting a stream into chunks never changes which
/// sequences are reported. Runs of printable text and DCS payload are
/// reported as `[start, end)` ranges into the chunk being parsed.
///
/// Handlers cannot reach the parser that calls them, so `parse` is never
/// re-entered.
pub struct Parser {
    options: ParserOptions,
    handlers: Handlers,
    state: ParserState,
    buffers: Buffers,
    active_dcs: Option<SharedDcsHandler>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::with_options(ParserOptions::default())
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("state", &self.state)
            .field("collect", &self.buffers.collect)
            .field("params", &self.buffers.params)
            .field("osc_len", &self.buffers.osc.len())
            .field("dcs_hooked", &self.active_dcs.is_some())
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: ParserOptions) -> Self {
        Self {
            buffers: Buffers::new(&options),
            options,
            handlers: Handlers::default(),
            state: ParserState::Ground,
            active_dcs: None,
        }
    }

    /// Parser driven by a custom transition table.
    #[must_use]
    pub fn with_table(table: Arc<TransitionTable>) -> Self {
        Self::with_options(ParserOptions::default().with_table(table))
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    /// Registry used to install and remove handlers. Changing handlers
    /// never touches the parse state.
    pub fn handlers_mut(&mut self) -> &mut Handlers {
        &mut self.handlers
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn params(&self) -> &[i64] {
        &self.buffers.params
    }

    pub fn collect(&self) -> &str {
        &self.buffers.collect
    }

    /// Return to [`ParserState::Ground`] with empty buffers. A hooked DCS
    /// consumer is unhooked first. Handlers are kept.
    pub fn reset(&mut self) {
        if let Some(handler) = self.active_dcs.take() {
            trace!("[dcs unhook] parser reset");
            dcs::with_handler(&handler, |h| h.unhook());
        }

        self.state = ParserState::Ground;
        self.buffers.clear();
    }

    /// Parse a string by its UTF-16 encoding.
    pub fn parse_str(&mut self, input: &str) {
        let data: Vec<u16> = input.encode_utf16().collect();
        self.parse(&data);
    }

    /// Parse raw bytes, one code unit per byte. 8-bit C1 controls are
    /// honoured; multi-byte encodings are not decoded.
    pub fn parse_bytes(&mut self, input: &[u8]) {
        let data: Vec<u16> = input.iter().map(|&b| u16::from(b)).collect();
        self.parse(&data);
    }

    /// Process one chunk of code units to completion.
    pub fn parse(&mut self, data: &[u16]) {
        use ParserAction::*;
        use ParserState::*;

        let table = Arc::clone(&self.options.table);
        let len = data.len();
        let mut state = self.state;
        let mut print: Option<usize> = None;
        let mut dcs: Option<usize> = None;
        let mut end = len;
        let mut i = 0;

        while i < len {
            let code = data[i];

            // Printable run in ground, reported as a single range.
            if state == Ground && is_printable(code) {
                print.get_or_insert(i);
                i += 1;
                while i < len && is_printable(data[i]) {
                    i += 1;
                }
                continue;
            }

            if state == CsiParam && is_digit(code) {
                self.buffers.digit(code);
                i += 1;
                continue;
            }

            let mut transition = table.lookup(state, code);

            // Code units past the table are only errors where no string or
            // text is being collected.
            if transition.action() == Error && usize::from(code) >= TABLE_WIDTH {
                transition = match state {
                    Ground => Transition::new(Print, Ground),
                    OscString => Transition::new(OscPut, OscString),
                    CsiIgnore | DcsIgnore => Transition::new(Ignore, state),
                    DcsPassthrough => Transition::new(DcsPut, DcsPassthrough),
                    _ => transition,
                };
            }

            if state == DcsPassthrough
                && transition.next_state() != DcsPassthrough
                && transition.action() != DcsUnhook
            {
                trace!("[dcs unhook] passthrough cancelled by {code:#04x}");
                self.unhook(data, &mut dcs, i);
            }

            match transition.action() {
                Print => {
                    print.get_or_insert(i);
                },
                Execute => {
                    self.handlers.flush_print(data, &mut print, i);
                    self.handlers.execute(code);
                },
                Ignore => {
                    if print.is_some() {
                        self.handlers.flush_print(data, &mut print, i);
                    } else if let Some(start) = dcs.take() {
                        if let Some(handler) = &self.active_dcs {
                            dcs::with_handler(handler, |h| h.put(data, start, i));
                        }
                    }
                },
                Error => {
                    let snapshot = ParsingState {
                        position: i,
                        code,
                        current_state: state,
                        print,
                        dcs,
                        osc: &self.buffers.osc,
                        collect: &self.buffers.collect,
                        params: &self.buffers.params,
                    };
                    debug!(
                        "[malformed sequence] position: {i}, code: {code:#06x}, state: {state:?}"
                    );
                    // Text before the offending unit is reported first.
                    self.handlers.flush_print(data, &mut print, i);
                    let decision = self.handlers.error(&snapshot);

                    if decision == ErrorAction::Abort {
                        debug!("[aborted] dropping {} code units", len - i);
                        state = Ground;
                        end = i;
                        break;
                    }

                    transition = transition.retarget(Ground);
                },
                CsiDispatch => {
                    self.handlers.csi(
                        &self.buffers.params,
                        &self.buffers.collect,
                        code,
                    );
                },
                Param => self.buffers.param(code),
                Collect => self.buffers.collect.push(flag_char(code)),
                EscDispatch => {
                    self.handlers.esc(&self.buffers.collect, code);
                },
                Clear => {
                    self.handlers.flush_print(data, &mut print, i);
                    self.buffers.clear();
                    dcs = None;
                },
                DcsHook => {
                    let handler =
                        self.handlers.dcs(&self.buffers.collect, code);
                    trace!(
                        "[dcs hook] collect: {:?}, params: {:?}, flag: {code:#04x}",
                        self.buffers.collect, self.buffers.params
                    );
                    let hooked = dcs::with_handler(&handler, |h| {
                        h.hook(&self.buffers.collect, &self.buffers.params, code)
                    });
                    // A consumer that missed its hook sees nothing of the
                    // sequence.
                    self.active_dcs = hooked.then_some(handler);
                },
                DcsPut => {
                    dcs.get_or_insert(i);
                },
                DcsUnhook => {
                    self.unhook(data, &mut dcs, i);
                    self.buffers.clear();
                    if code == ESC {
                        transition = transition.retarget(Escape);
                    }
                },
                OscStart => {
                    self.handlers.flush_print(data, &mut print, i);
                    self.buffers.osc.clear();
                },
                OscPut => self.buffers.osc_put(code),
                OscEnd => {
                    if !self.buffers.osc.is_empty() && code != CAN && code != SUB
                    {
                        self.handlers.osc(&self.buffers.osc);
                    }
                    self.buffers.clear();
                    dcs = None;
                    if code == ESC {
                        transition = transition.retarget(Escape);
                    }
                },
            }

            state = transition.next_state();
            i += 1;
        }

        self.handlers.flush_print(data, &mut print, end);

        if state == DcsPassthrough {
            if let (Some(start), Some(handler)) = (dcs, &self.active_dcs) {
                dcs::with_handler(handler, |h| h.put(data, start, end));
            }
        }

        self.state = state;
    }

    /// Flush the open payload range to the hooked consumer and unhook it.
    fn unhook(&mut self, data: &[u16], dcs: &mut Option<usize>, end: usize) {
        let start = dcs.take();
        if let Some(handler) = self.active_dcs.take() {
            dcs::with_handler(&handler, |h| {
                if let Some(start) = start {
                    h.put(data, start, end);
                }
                h.unhook();
            });
        }
    }
}
