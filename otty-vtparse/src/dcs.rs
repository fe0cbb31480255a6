//! Device Control String consumers.
//!
//! A DCS (`ESC P ... ST` or 8-bit `0x90 ... 0x9c`) carries an opaque payload
//! addressed to one consumer, selected by the sequence's intermediates and
//! final byte. The [`Parser`](crate::Parser) hooks the consumer when the
//! final byte is seen, streams the payload to it as borrowed slices of the
//! caller's input, and unhooks it when the string terminates or is
//! cancelled. A payload may span any number of `parse` calls.

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;

/// Consumer of a hooked device control string.
///
/// For every sequence the parser calls [`hook`](Self::hook) once, then
/// [`put`](Self::put) zero or more times, then [`unhook`](Self::unhook)
/// exactly once.
///
/// The parser never calls a consumer that is already borrowed through its
/// [`SharedDcsHandler`]; such a call is dropped with a warning. If the
/// dropped call is `hook`, the rest of that sequence is withheld as well.
/// A dropped `put` or `unhook` is lost, so the pairing above only holds
/// while the embedder holds no borrow of a hooked consumer.
pub trait DcsHandler {
    /// Starts a new payload.
    ///
    /// `collect` holds the intermediate and private-marker bytes,
    /// `params` the numeric parameters (at least one, `0` when omitted)
    /// and `flag` the final byte that selected this consumer.
    fn hook(&mut self, collect: &str, params: &[i64], flag: u16);

    /// Delivers `data[start..end]`, a slice of the chunk currently being
    /// parsed.
    fn put(&mut self, data: &[u16], start: usize, end: usize);

    /// Closes the payload.
    fn unhook(&mut self);
}

/// DCS consumer shared between the registry and the parser while hooked.
pub type SharedDcsHandler = Rc<RefCell<dyn DcsHandler>>;

/// Consumer that drops every payload; the default DCS fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDcsHandler;

impl DcsHandler for NoopDcsHandler {
    fn hook(&mut self, _: &str, _: &[i64], _: u16) {}

    fn put(&mut self, _: &[u16], _: usize, _: usize) {}

    fn unhook(&mut self) {}
}

/// Run `f` against the consumer unless it is already borrowed elsewhere,
/// in which case the call is dropped. Returns whether `f` ran.
pub(crate) fn with_handler<F>(handler: &SharedDcsHandler, f: F) -> bool
where
    F: FnOnce(&mut dyn DcsHandler),
{
    match handler.try_borrow_mut() {
        Ok(mut handler) => {
            f(&mut *handler);
            true
        },
        Err(_) => {
            warn!("[dcs] handler is borrowed elsewhere, dropping call");
            false
        },
    }
}
