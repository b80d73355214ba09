use log::trace;

use crate::actor::Actor;
use crate::enums::{Action, ActionClass, State};
use crate::{transitions, utf8};

/// Configuration for [`Parser`] and
/// [`DispatchParser`](crate::builder::DispatchParser).
#[derive(Debug, Clone)]
pub struct Options {
    /// Treat BEL (0x07) as an OSC terminator in addition to ST, as xterm
    /// does. Off by default: strict ST-only termination.
    pub osc_bel_terminator: bool,
    /// Number of numeric parameters kept per sequence; extras are silently
    /// dropped.
    pub max_params: usize,
    /// Cap on the OSC/DCS payload buffer; bytes past the cap are silently
    /// dropped.
    pub max_payload_bytes: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            osc_bel_terminator: false,
            max_params: 16,
            max_payload_bytes: 1024 * 1024,
        }
    }
}

/// The escape-sequence state machine.
///
/// `feed` decodes bytes into code points, consults the transition table and
/// emits actions to an [`Actor`]. The parser buffers nothing beyond a
/// partial UTF-8 sequence, so a sequence may be split across `feed` calls at
/// any byte boundary without changing the emitted actions.
#[derive(Debug, Default)]
pub struct Parser {
    state: State,
    utf8: utf8::Decoder,
    osc_bel_terminator: bool,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: &Options) -> Self {
        Self {
            osc_bel_terminator: options.osc_bel_terminator,
            ..Self::default()
        }
    }

    /// Drains `bytes` completely, emitting actions to `actor`.
    pub fn feed<A: Actor>(&mut self, bytes: &[u8], actor: &mut A) {
        for &byte in bytes {
            match self.utf8.decode(byte) {
                utf8::Decode::Incomplete => {},
                utf8::Decode::Success(ch) => self.consume(ch, actor),
                utf8::Decode::Invalid => {
                    trace!(
                        "invalid utf-8 byte {byte:#04x} in {:?}",
                        self.state
                    );
                    self.consume(char::REPLACEMENT_CHARACTER, actor);

                    // An ASCII byte aborts a pending sequence but is well
                    // formed on its own; run it through after the
                    // replacement so embedded controls keep their meaning.
                    if byte.is_ascii() {
                        if let utf8::Decode::Success(ch) =
                            self.utf8.decode(byte)
                        {
                            self.consume(ch, actor);
                        }
                    }
                },
            }
        }
    }

    /// Forces the machine back to ground, dropping any partial UTF-8
    /// sequence, and tells the sink to clear buffered dispatch state.
    pub fn reset<A: Actor>(&mut self, actor: &mut A) {
        self.state = State::Ground;
        self.utf8.reset();
        actor.on_action(ActionClass::Event, Action::Clear, '\0');
    }

    fn consume<A: Actor>(&mut self, ch: char, actor: &mut A) {
        let cp = ch as u32;

        // Printable code points beyond the table's byte range go straight
        // to the sink while in ground.
        if self.state == State::Ground && cp >= 0xa0 {
            actor.on_action(ActionClass::Event, Action::Print, ch);
            return;
        }

        let (next, action) = if cp > 0xff {
            transitions::printable(self.state)
        } else if self.osc_bel_terminator
            && self.state == State::OscString
            && cp == 0x07
        {
            (State::Ground, Action::Undefined)
        } else {
            transitions::transit(self.state, cp as u8)
        };

        if next == State::Undefined {
            if action == Action::Undefined {
                trace!("no rule for {cp:#06x} in {:?}", self.state);
            } else {
                actor.on_action(ActionClass::Event, action, ch);
            }
            return;
        }

        let exit = transitions::exit_action(self.state);
        if exit != Action::Undefined {
            actor.on_action(ActionClass::Leave, exit, '\0');
        }
        if action != Action::Undefined {
            actor.on_action(ActionClass::Transition, action, ch);
        }

        self.state = next;

        let entry = transitions::entry_action(next);
        if entry != Action::Undefined {
            // Hook dispatches the final byte of the device control string;
            // the other entry actions are not tied to the input.
            let arg = if entry == Action::Hook { ch } else { '\0' };
            actor.on_action(ActionClass::Enter, entry, arg);
        }
    }
}
