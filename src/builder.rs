//! Couples the state-machine engine with dispatch-record collection.

use log::trace;

use crate::actor::Actor;
use crate::dispatch::{Dispatch, Interpreter, MAX_INTERMEDIATES};
use crate::enums::{Action, ActionClass};
use crate::parser::{Options, Parser};

/// High-level parser: runs the [`Parser`] engine and folds its action
/// stream into [`Dispatch`] records for an [`Interpreter`].
///
/// ```
/// use lutra_vte::{Dispatch, DispatchParser, Interpreter};
///
/// struct Printer;
///
/// impl Interpreter for Printer {
///     fn print(&mut self, ch: char) {
///         print!("{ch}");
///     }
///     fn execute(&mut self, _control: u8) {}
///     fn esc_dispatch(&mut self, _dispatch: &Dispatch) {}
///     fn csi_dispatch(&mut self, dispatch: &Dispatch) {
///         println!("CSI {:?} {}", dispatch.params(), dispatch.final_byte());
///     }
///     fn dcs_hook(&mut self, _dispatch: &Dispatch) {}
///     fn dcs_unhook(&mut self, _dispatch: &Dispatch) {}
///     fn osc_dispatch(&mut self, _dispatch: &Dispatch) {}
/// }
///
/// let mut parser = DispatchParser::new();
/// parser.feed(b"\x1b[31mhi\x1b[0m", &mut Printer);
/// ```
pub struct DispatchParser {
    parser: Parser,
    collector: Collector,
}

impl DispatchParser {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    #[must_use]
    pub fn with_options(options: Options) -> Self {
        Self {
            parser: Parser::with_options(&options),
            collector: Collector::new(&options),
        }
    }

    /// Drains `bytes` completely, delivering completed records to
    /// `interpreter`.
    pub fn feed<I: Interpreter>(&mut self, bytes: &[u8], interpreter: &mut I) {
        let mut builder = Builder {
            collector: &mut self.collector,
            interpreter,
        };
        self.parser.feed(bytes, &mut builder);
    }

    /// Returns the machine to ground and drops any partially collected
    /// dispatch.
    pub fn reset(&mut self) {
        self.parser.reset(&mut Discard);
        self.collector.clear();
    }
}

impl Default for DispatchParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Sink that throws the action stream away; used when resetting the engine
/// with no interpreter at hand.
struct Discard;

impl Actor for Discard {
    fn on_action(&mut self, _class: ActionClass, _action: Action, _ch: char) {}
}

/// Working dispatch state. All buffers are cleared by the `Clear` action;
/// the parameter vector keeps its reserved capacity so the action path
/// stays allocation-free.
struct Collector {
    dispatch: Dispatch,
    current_param: u16,
    /// A parameter segment is open, i.e. at least one `Param` action has
    /// fired since the last clear.
    param_pending: bool,
    max_params: usize,
    max_payload_bytes: usize,
}

impl Collector {
    fn new(options: &Options) -> Self {
        Self {
            dispatch: Dispatch {
                params: Vec::with_capacity(options.max_params),
                ..Dispatch::default()
            },
            current_param: 0,
            param_pending: false,
            max_params: options.max_params,
            max_payload_bytes: options.max_payload_bytes,
        }
    }

    fn clear(&mut self) {
        self.dispatch.final_byte = '\0';
        self.dispatch.intermediates_len = 0;
        self.dispatch.intermediates_truncated = false;
        self.dispatch.private_marker = None;
        self.dispatch.params.clear();
        self.dispatch.params_truncated = false;
        self.dispatch.payload.clear();
        self.current_param = 0;
        self.param_pending = false;
    }

    fn collect(&mut self, byte: u8) {
        if (0x3c..=0x3f).contains(&byte) {
            self.dispatch.private_marker = Some(byte);
        } else if self.dispatch.intermediates_len < MAX_INTERMEDIATES {
            self.dispatch.intermediates[self.dispatch.intermediates_len] =
                byte;
            self.dispatch.intermediates_len += 1;
        } else {
            trace!("discarding excess intermediate {byte:#04x}");
            self.dispatch.intermediates_truncated = true;
        }
    }

    fn param(&mut self, byte: u8) {
        if byte == b';' {
            let value = self.current_param;
            self.push_param(value);
            self.current_param = 0;
        } else {
            self.current_param = self
                .current_param
                .saturating_mul(10)
                .saturating_add(u16::from(byte - b'0'));
        }
        self.param_pending = true;
    }

    fn push_param(&mut self, value: u16) {
        if self.dispatch.params.len() >= self.max_params {
            trace!("discarding parameter {value} past the maximum");
            self.dispatch.params_truncated = true;
            return;
        }
        self.dispatch.params.push(value);
    }

    fn put(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        let bytes = ch.encode_utf8(&mut buf).as_bytes();
        if self.dispatch.payload.len() + bytes.len() > self.max_payload_bytes {
            trace!("string payload cap reached, dropping {ch:?}");
            return;
        }
        self.dispatch.payload.extend_from_slice(bytes);
    }

    /// Closes the open parameter segment and stamps the final byte,
    /// yielding the completed record.
    fn finish(&mut self, final_byte: char) -> &Dispatch {
        if self.param_pending {
            let value = self.current_param;
            self.push_param(value);
            self.current_param = 0;
            self.param_pending = false;
        }
        if final_byte != '\0' {
            self.dispatch.final_byte = final_byte;
        }
        &self.dispatch
    }
}

/// Adapter that routes engine actions into the collector and completed
/// records out to the interpreter.
struct Builder<'a, I: Interpreter> {
    collector: &'a mut Collector,
    interpreter: &'a mut I,
}

impl<I: Interpreter> Actor for Builder<'_, I> {
    fn on_action(&mut self, _class: ActionClass, action: Action, ch: char) {
        match action {
            Action::Print => self.interpreter.print(ch),
            Action::Execute => self.interpreter.execute(ch as u8),
            Action::Clear => self.collector.clear(),
            Action::Collect => self.collector.collect(ch as u8),
            Action::Param => self.collector.param(ch as u8),
            Action::Put | Action::OscPut => self.collector.put(ch),
            Action::OscStart => self.collector.clear(),
            Action::EscDispatch => {
                self.interpreter.esc_dispatch(self.collector.finish(ch));
            },
            Action::CsiDispatch => {
                self.interpreter.csi_dispatch(self.collector.finish(ch));
            },
            Action::Hook => {
                self.interpreter.dcs_hook(self.collector.finish(ch));
            },
            Action::Unhook => {
                self.interpreter.dcs_unhook(self.collector.finish('\0'));
            },
            Action::OscEnd => {
                self.interpreter.osc_dispatch(self.collector.finish('\0'));
            },
            Action::Ignore | Action::Undefined => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Record {
        Print(char),
        Execute(u8),
        Esc(Dispatch),
        Csi(Dispatch),
        Hook(Dispatch),
        Unhook(Dispatch),
        Osc(Dispatch),
    }

    #[derive(Default)]
    struct CollectingInterpreter {
        records: Vec<Record>,
    }

    impl Interpreter for CollectingInterpreter {
        fn print(&mut self, ch: char) {
            self.records.push(Record::Print(ch));
        }

        fn execute(&mut self, control: u8) {
            self.records.push(Record::Execute(control));
        }

        fn esc_dispatch(&mut self, dispatch: &Dispatch) {
            self.records.push(Record::Esc(dispatch.clone()));
        }

        fn csi_dispatch(&mut self, dispatch: &Dispatch) {
            self.records.push(Record::Csi(dispatch.clone()));
        }

        fn dcs_hook(&mut self, dispatch: &Dispatch) {
            self.records.push(Record::Hook(dispatch.clone()));
        }

        fn dcs_unhook(&mut self, dispatch: &Dispatch) {
            self.records.push(Record::Unhook(dispatch.clone()));
        }

        fn osc_dispatch(&mut self, dispatch: &Dispatch) {
            self.records.push(Record::Osc(dispatch.clone()));
        }
    }

    fn parse(bytes: &[u8]) -> Vec<Record> {
        let mut parser = DispatchParser::new();
        let mut interpreter = CollectingInterpreter::default();
        parser.feed(bytes, &mut interpreter);
        interpreter.records
    }

    fn csi(bytes: &[u8]) -> Dispatch {
        let records = parse(bytes);
        assert_eq!(records.len(), 1, "expected one record: {records:?}");
        match records.into_iter().next() {
            Some(Record::Csi(dispatch)) => dispatch,
            other => panic!("expected a CSI record, got {other:?}"),
        }
    }

    #[test]
    fn text_and_sgr_round_trip() {
        assert_eq!(parse(b"hi\x07\x1b[0m"), vec![
            Record::Print('h'),
            Record::Print('i'),
            Record::Execute(0x07),
            Record::Csi(Dispatch {
                final_byte: 'm',
                params: vec![0],
                ..Dispatch::default()
            }),
        ]);
    }

    #[test]
    fn csi_collects_params_and_final() {
        let dispatch = csi(b"\x1b[1;31m");
        assert_eq!(dispatch.final_byte(), 'm');
        assert_eq!(dispatch.params(), &[1, 31]);
        assert_eq!(dispatch.intermediates(), b"");
        assert_eq!(dispatch.private_marker(), None);
    }

    #[test]
    fn csi_without_params_has_an_empty_list() {
        assert_eq!(csi(b"\x1b[m").params(), &[] as &[u16]);
    }

    #[test]
    fn omitted_params_default_to_zero() {
        assert_eq!(csi(b"\x1b[;1m").params(), &[0, 1]);
        assert_eq!(csi(b"\x1b[1;m").params(), &[1, 0]);
        assert_eq!(csi(b"\x1b[31;;7m").params(), &[31, 0, 7]);
    }

    #[test]
    fn param_lookup_falls_back_to_defaults() {
        let dispatch = csi(b"\x1b[;5H");
        assert_eq!(dispatch.param(0, 1), 1);
        assert_eq!(dispatch.param(1, 1), 5);
        assert_eq!(dispatch.param(2, 1), 1);
    }

    #[test]
    fn private_marker_is_kept_apart_from_params() {
        let dispatch = csi(b"\x1b[?25h");
        assert_eq!(dispatch.private_marker(), Some(b'?'));
        assert_eq!(dispatch.params(), &[25]);
        assert_eq!(dispatch.final_byte(), 'h');
    }

    #[test]
    fn csi_intermediates_are_collected_in_order() {
        let dispatch = csi(b"\x1b[1 q");
        assert_eq!(dispatch.intermediates(), b" ");
        assert_eq!(dispatch.params(), &[1]);
        assert_eq!(dispatch.final_byte(), 'q');
    }

    #[test]
    fn excess_intermediates_set_the_flag() {
        let dispatch = csi(b"\x1b[1 !#p");
        assert_eq!(dispatch.intermediates(), b" !");
        assert!(dispatch.intermediates_truncated());
    }

    #[test]
    fn params_past_the_maximum_are_dropped() {
        let dispatch = csi(b"\x1b[1;2;3;4;5;6;7;8;9;10;11;12;13;14;15;16;17;18p");
        assert_eq!(dispatch.params().len(), 16);
        assert_eq!(dispatch.params()[15], 16);
        assert!(dispatch.params_truncated());
        assert_eq!(dispatch.final_byte(), 'p');
    }

    #[test]
    fn param_values_saturate() {
        assert_eq!(csi(b"\x1b[99999m").params(), &[u16::MAX]);
    }

    #[test]
    fn esc_dispatch_keeps_intermediates() {
        assert_eq!(parse(b"\x1b(B"), vec![Record::Esc(Dispatch {
            final_byte: 'B',
            intermediates: [b'(', 0],
            intermediates_len: 1,
            ..Dispatch::default()
        })]);
    }

    #[test]
    fn dcs_hook_then_payload_then_unhook() {
        let records = parse(b"\x1bP1;2|AB\x1b\\");
        assert_eq!(records.len(), 3);

        match &records[0] {
            Record::Hook(dispatch) => {
                assert_eq!(dispatch.final_byte(), '|');
                assert_eq!(dispatch.params(), &[1, 2]);
                assert_eq!(dispatch.payload(), b"");
            },
            other => panic!("expected a hook record, got {other:?}"),
        }
        match &records[1] {
            Record::Unhook(dispatch) => {
                assert_eq!(dispatch.final_byte(), '|');
                assert_eq!(dispatch.payload(), b"AB");
            },
            other => panic!("expected an unhook record, got {other:?}"),
        }
        match &records[2] {
            Record::Esc(dispatch) => {
                assert_eq!(dispatch.final_byte(), '\\');
            },
            other => panic!("expected an esc record, got {other:?}"),
        }
    }

    #[test]
    fn osc_payload_is_raw_including_semicolons() {
        let records = parse("\x1b]0;hi there\u{9c}".as_bytes());
        assert_eq!(records.len(), 1);
        match &records[0] {
            Record::Osc(dispatch) => {
                assert_eq!(dispatch.payload(), b"0;hi there");
                assert_eq!(dispatch.final_byte(), '\0');
            },
            other => panic!("expected an osc record, got {other:?}"),
        }
    }

    #[test]
    fn osc_payload_keeps_unicode() {
        let records = parse("\x1b]2;🦦 title\u{9c}".as_bytes());
        match &records[0] {
            Record::Osc(dispatch) => {
                assert_eq!(dispatch.payload(), "2;🦦 title".as_bytes());
            },
            other => panic!("expected an osc record, got {other:?}"),
        }
    }

    #[test]
    fn c1_osc_introducer_starts_a_fresh_record() {
        // A C1 OSC right after a CSI must not leak the CSI's parameters.
        let records = parse("\x1b[1;2m\u{9d}t\u{9c}".as_bytes());
        assert_eq!(records.len(), 2);
        match &records[1] {
            Record::Osc(dispatch) => {
                assert_eq!(dispatch.payload(), b"t");
                assert_eq!(dispatch.params(), &[] as &[u16]);
            },
            other => panic!("expected an osc record, got {other:?}"),
        }
    }

    #[test]
    fn cancelled_csi_produces_no_record() {
        assert_eq!(parse(b"\x1b[3\x18x"), vec![Record::Print('x')]);
        assert_eq!(parse(b"\x1b[3:1mx"), vec![Record::Print('x')]);
    }

    #[test]
    fn payload_cap_drops_excess_bytes() {
        let options = Options {
            max_payload_bytes: 4,
            ..Options::default()
        };
        let mut parser = DispatchParser::with_options(options);
        let mut interpreter = CollectingInterpreter::default();
        parser.feed(b"\x1bPqabcdefgh\x1b\\", &mut interpreter);

        match &interpreter.records[1] {
            Record::Unhook(dispatch) => {
                assert_eq!(dispatch.payload(), b"abcd");
            },
            other => panic!("expected an unhook record, got {other:?}"),
        }
    }

    #[test]
    fn reset_drops_a_partial_dispatch() {
        let mut parser = DispatchParser::new();
        let mut interpreter = CollectingInterpreter::default();

        parser.feed(b"\x1b[31;4", &mut interpreter);
        parser.reset();
        parser.feed(b"m", &mut interpreter);

        assert_eq!(interpreter.records, vec![Record::Print('m')]);
    }

    #[test]
    fn bel_terminated_osc_with_option() {
        let options = Options {
            osc_bel_terminator: true,
            ..Options::default()
        };
        let mut parser = DispatchParser::with_options(options);
        let mut interpreter = CollectingInterpreter::default();
        parser.feed(b"\x1b]0;hi\x07", &mut interpreter);

        assert_eq!(interpreter.records.len(), 1);
        match &interpreter.records[0] {
            Record::Osc(dispatch) => assert_eq!(dispatch.payload(), b"0;hi"),
            other => panic!("expected an osc record, got {other:?}"),
        }
    }
}
