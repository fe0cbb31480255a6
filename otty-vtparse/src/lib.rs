//! Table-driven DEC/ANSI escape sequence parser.
//!
//! The parser consumes UTF-16 code units, walks a packed VT500 state
//! machine and reports what it recognises to callbacks registered in its
//! [`Handlers`]: printable runs, C0/C1 controls, CSI, ESC, OSC and DCS
//! sequences. Input may arrive in arbitrarily split chunks.
//!
//! ```
//! use otty_vtparse::Parser;
//!
//! let mut parser = Parser::new();
//! parser.handlers_mut().set_csi_handler(b'm', |params, _| {
//!     assert_eq!(params, &[1, 31]);
//! });
//! parser.parse_str("\x1b[1;31m");
//! ```

mod dcs;
mod enums;
mod error;
mod handlers;
mod options;
mod parser;
mod table;
mod transitions;

pub use dcs::{DcsHandler, NoopDcsHandler, SharedDcsHandler};
pub use enums::{ParserAction, ParserState};
pub use error::{Result, TableError};
pub use handlers::{
    CsiFallback, CsiHandler, ErrorAction, ErrorHandler, EscHandler,
    ExecuteFallback, ExecuteHandler, Handlers, MALFORMED_OSC, OscFallback,
    OscHandler, PrintHandler,
};
pub use options::ParserOptions;
pub use parser::{Parser, ParsingState};
pub use table::{
    DEFAULT_TRANSITION, STATE_COUNT, TABLE_WIDTH, Transition, TransitionTable,
};
pub use transitions::VT500_TRANSITION_TABLE;
