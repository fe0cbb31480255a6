//! Handler registry consulted by the [`Parser`](crate::Parser).
//!
//! Every dispatch category has a map of specific handlers and exactly one
//! fallback. A dispatch first tries the specific handler for its key and
//! otherwise calls the fallback with enough context to tell sequences
//! apart. Registering a key twice replaces the first handler; clearing a key
//! routes later dispatches back to the fallback.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::dcs::{NoopDcsHandler, SharedDcsHandler};
use crate::parser::ParsingState;

/// Receives `data[start..end]`, a run of printable code units.
pub type PrintHandler = Box<dyn FnMut(&[u16], usize, usize)>;
pub type ExecuteHandler = Box<dyn FnMut()>;
/// Receives the executed control code.
pub type ExecuteFallback = Box<dyn FnMut(u16)>;
/// Receives `(params, collect)`.
pub type CsiHandler = Box<dyn FnMut(&[i64], &str)>;
/// Receives `(collect, params, flag)`.
pub type CsiFallback = Box<dyn FnMut(&str, &[i64], u16)>;
/// Receives `(collect, flag)`.
pub type EscHandler = Box<dyn FnMut(&str, u16)>;
/// Receives the OSC content after the identifier separator.
pub type OscHandler = Box<dyn FnMut(&str)>;
/// Receives `(identifier, content)`; `-1` marks a malformed payload.
pub type OscFallback = Box<dyn FnMut(i64, &str)>;
pub type ErrorHandler = Box<dyn FnMut(&ParsingState<'_>) -> ErrorAction>;

/// Decision returned by the error handler.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// Carry on with the next code unit.
    #[default]
    Continue,
    /// Drop the rest of the current chunk.
    Abort,
}

/// Identifier reported to the OSC fallback for malformed payloads.
pub const MALFORMED_OSC: i64 = -1;

const OSC_SEPARATOR: u16 = 0x3b;

/// Per-parser mapping from dispatch keys to consumer callbacks.
pub struct Handlers {
    print: PrintHandler,
    execute: HashMap<u16, ExecuteHandler>,
    execute_fallback: ExecuteFallback,
    csi: HashMap<u16, CsiHandler>,
    csi_fallback: CsiFallback,
    esc: HashMap<String, EscHandler>,
    esc_fallback: EscHandler,
    osc: HashMap<i64, OscHandler>,
    osc_fallback: OscFallback,
    dcs: HashMap<String, SharedDcsHandler>,
    dcs_fallback: SharedDcsHandler,
    error: ErrorHandler,
    // scratch buffer for ESC/DCS keys
    ident: String,
}

impl Default for Handlers {
    fn default() -> Self {
        Self {
            print: Box::new(|_, _, _| {}),
            execute: HashMap::new(),
            execute_fallback: Box::new(|_| {}),
            csi: HashMap::new(),
            csi_fallback: Box::new(|_, _, _| {}),
            esc: HashMap::new(),
            esc_fallback: Box::new(|_, _| {}),
            osc: HashMap::new(),
            osc_fallback: Box::new(|_, _| {}),
            dcs: HashMap::new(),
            dcs_fallback: Rc::new(RefCell::new(NoopDcsHandler)),
            error: Box::new(|_| ErrorAction::Continue),
            ident: String::new(),
        }
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("execute", &self.execute.keys().collect::<Vec<_>>())
            .field("csi", &self.csi.keys().collect::<Vec<_>>())
            .field("esc", &self.esc.keys().collect::<Vec<_>>())
            .field("osc", &self.osc.keys().collect::<Vec<_>>())
            .field("dcs", &self.dcs.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Dispatch key for ESC and DCS handlers: intermediates followed by the
/// final byte.
fn ident(collect: &str, flag: char) -> String {
    let mut ident = String::with_capacity(collect.len() + 1);
    ident.push_str(collect);
    ident.push(flag);
    ident
}

/// Character for a code unit collected or dispatched by the parser.
pub(crate) fn flag_char(code: u16) -> char {
    char::from_u32(u32::from(code)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Decimal OSC identifier; `None` when empty or not purely digits.
fn parse_identifier(input: &[u16]) -> Option<i64> {
    if input.is_empty() {
        return None;
    }

    input.iter().try_fold(0i64, |acc, &code| {
        let digit = char::from_u32(u32::from(code))?.to_digit(10)?;
        acc.checked_mul(10)?.checked_add(i64::from(digit))
    })
}

impl Handlers {
    pub fn set_print_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&[u16], usize, usize) + 'static,
    {
        self.print = Box::new(handler);
    }

    pub fn clear_print_handler(&mut self) {
        self.print = Box::new(|_, _, _| {});
    }

    pub fn set_execute_handler<F>(&mut self, flag: u8, handler: F)
    where
        F: FnMut() + 'static,
    {
        self.execute.insert(u16::from(flag), Box::new(handler));
    }

    pub fn clear_execute_handler(&mut self, flag: u8) {
        self.execute.remove(&u16::from(flag));
    }

    pub fn set_execute_handler_fallback<F>(&mut self, handler: F)
    where
        F: FnMut(u16) + 'static,
    {
        self.execute_fallback = Box::new(handler);
    }

    pub fn set_csi_handler<F>(&mut self, flag: u8, handler: F)
    where
        F: FnMut(&[i64], &str) + 'static,
    {
        self.csi.insert(u16::from(flag), Box::new(handler));
    }

    pub fn clear_csi_handler(&mut self, flag: u8) {
        self.csi.remove(&u16::from(flag));
    }

    pub fn set_csi_handler_fallback<F>(&mut self, handler: F)
    where
        F: FnMut(&str, &[i64], u16) + 'static,
    {
        self.csi_fallback = Box::new(handler);
    }

    pub fn set_esc_handler<F>(&mut self, collect: &str, flag: u8, handler: F)
    where
        F: FnMut(&str, u16) + 'static,
    {
        self.esc.insert(ident(collect, char::from(flag)), Box::new(handler));
    }

    pub fn clear_esc_handler(&mut self, collect: &str, flag: u8) {
        self.esc.remove(&ident(collect, char::from(flag)));
    }

    pub fn set_esc_handler_fallback<F>(&mut self, handler: F)
    where
        F: FnMut(&str, u16) + 'static,
    {
        self.esc_fallback = Box::new(handler);
    }

    pub fn set_osc_handler<F>(&mut self, ident: i64, handler: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.osc.insert(ident, Box::new(handler));
    }

    pub fn clear_osc_handler(&mut self, ident: i64) {
        self.osc.remove(&ident);
    }

    pub fn set_osc_handler_fallback<F>(&mut self, handler: F)
    where
        F: FnMut(i64, &str) + 'static,
    {
        self.osc_fallback = Box::new(handler);
    }

    /// Register the consumer for `DCS <collect> <flag>`.
    ///
    /// A sequence that is already hooked keeps its consumer until it is
    /// unhooked.
    pub fn set_dcs_handler(
        &mut self,
        collect: &str,
        flag: u8,
        handler: SharedDcsHandler,
    ) {
        self.dcs.insert(ident(collect, char::from(flag)), handler);
    }

    pub fn clear_dcs_handler(&mut self, collect: &str, flag: u8) {
        self.dcs.remove(&ident(collect, char::from(flag)));
    }

    pub fn set_dcs_handler_fallback(&mut self, handler: SharedDcsHandler) {
        self.dcs_fallback = handler;
    }

    /// Install the callback invoked on malformed input. Its return value
    /// decides whether the rest of the chunk is parsed.
    pub fn set_error_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&ParsingState<'_>) -> ErrorAction + 'static,
    {
        self.error = Box::new(handler);
    }

    pub fn clear_error_handler(&mut self) {
        self.error = Box::new(|_| ErrorAction::Continue);
    }

    /// Report `data[*start..end]` when a print run is open and close it.
    #[inline]
    pub(crate) fn flush_print(
        &mut self,
        data: &[u16],
        start: &mut Option<usize>,
        end: usize,
    ) {
        if let Some(start) = start.take() {
            (self.print)(data, start, end);
        }
    }

    pub(crate) fn execute(&mut self, code: u16) {
        match self.execute.get_mut(&code) {
            Some(handler) => handler(),
            None => (self.execute_fallback)(code),
        }
    }

    pub(crate) fn csi(&mut self, params: &[i64], collect: &str, code: u16) {
        match self.csi.get_mut(&code) {
            Some(handler) => handler(params, collect),
            None => (self.csi_fallback)(collect, params, code),
        }
    }

    pub(crate) fn esc(&mut self, collect: &str, code: u16) {
        self.ident.clear();
        self.ident.push_str(collect);
        self.ident.push(flag_char(code));

        match self.esc.get_mut(self.ident.as_str()) {
            Some(handler) => handler(collect, code),
            None => (self.esc_fallback)(collect, code),
        }
    }

    /// Split `payload` at the first separator and route it by identifier.
    pub(crate) fn osc(&mut self, payload: &[u16]) {
        let Some(idx) = payload.iter().position(|&c| c == OSC_SEPARATOR)
        else {
            debug!("[malformed osc] no identifier separator");
            let raw = String::from_utf16_lossy(payload);
            (self.osc_fallback)(MALFORMED_OSC, &raw);
            return;
        };

        let Some(ident) = parse_identifier(&payload[..idx]) else {
            debug!(
                "[malformed osc] identifier is not a number: {:?}",
                String::from_utf16_lossy(&payload[..idx])
            );
            let raw = String::from_utf16_lossy(payload);
            (self.osc_fallback)(MALFORMED_OSC, &raw);
            return;
        };

        let content = String::from_utf16_lossy(&payload[idx + 1..]);
        match self.osc.get_mut(&ident) {
            Some(handler) => handler(&content),
            None => (self.osc_fallback)(ident, &content),
        }
    }

    /// Consumer for `DCS <collect> <code>`, or the fallback.
    pub(crate) fn dcs(&mut self, collect: &str, code: u16) -> SharedDcsHandler {
        self.ident.clear();
        self.ident.push_str(collect);
        self.ident.push(flag_char(code));

        match self.dcs.get(self.ident.as_str()) {
            Some(handler) => Rc::clone(handler),
            None => Rc::clone(&self.dcs_fallback),
        }
    }

    pub(crate) fn error(&mut self, state: &ParsingState<'_>) -> ErrorAction {
        (self.error)(state)
    }
}
