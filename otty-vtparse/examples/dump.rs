use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use otty_vtparse::{
    DcsHandler, ErrorAction, Parser, ParserAction, ParserOptions,
    ParserState, TransitionTable,
};

#[derive(Default)]
struct SixelSink {
    units: usize,
}

impl DcsHandler for SixelSink {
    fn hook(&mut self, collect: &str, params: &[i64], flag: u16) {
        println!("DCS hook: collect={collect:?} params={params:?} final={flag:#04x}");
    }

    fn put(&mut self, data: &[u16], start: usize, end: usize) {
        self.units += end - start;
        println!("DCS put: {:?}", String::from_utf16_lossy(&data[start..end]));
    }

    fn unhook(&mut self) {
        println!("DCS unhook after {} units", self.units);
    }
}

fn main() -> anyhow::Result<()> {
    // Treat DEL in ground as a malformed sequence.
    let mut table = TransitionTable::vt500();
    table.add(0x7f, ParserState::Ground, ParserAction::Error, None)?;

    let options = ParserOptions::default().with_table(Arc::new(table));
    let mut parser = Parser::with_options(options);
    let handlers = parser.handlers_mut();

    handlers.set_print_handler(|data, start, end| {
        println!("print: {:?}", String::from_utf16_lossy(&data[start..end]));
    });
    handlers.set_execute_handler_fallback(|code| {
        println!("exec: {code:#04x}");
    });
    handlers.set_csi_handler(b'm', |params, collect| {
        println!("SGR: params={params:?} collect={collect:?}");
    });
    handlers.set_csi_handler_fallback(|collect, params, flag| {
        println!("CSI: collect={collect:?} params={params:?} final={flag:#04x}");
    });
    handlers.set_esc_handler_fallback(|collect, flag| {
        println!("ESC: collect={collect:?} final={flag:#04x}");
    });
    handlers.set_osc_handler(2, |title| println!("title: {title}"));
    handlers.set_osc_handler_fallback(|ident, content| {
        println!("OSC {ident}: {content:?}");
    });
    handlers.set_dcs_handler("", b'q', Rc::new(RefCell::new(SixelSink::default())));
    handlers.set_error_handler(|state| {
        println!(
            "error at {} ({:#06x}) in {:?}",
            state.position, state.code, state.current_state
        );
        ErrorAction::Continue
    });

    parser.parse_str("\x1b[31mhi\x1b[0m\r\n");
    parser.parse_str("\x1b]2;otty\x07\x1b[?25l\x1b(B");
    parser.parse_str("\x1bPq#0;2;0;0;0");
    parser.parse_str("~~@@\x1b\\done\x7f");

    Ok(())
}
