/// The [`State`] enum captures the current position in the parser's control
/// flow. It mirrors the state machine defined by the DEC VT500-series
/// terminals (<https://vt100.net/emu/dec_ansi_parser>): input code points
/// drive transitions between ground text handling, escape sequences, control
/// sequence introducer (CSI) parsing, device control strings (DCS) and
/// operating system commands (OSC).
///
/// The machine has no terminal state; it runs for the lifetime of the stream
/// and carries its state across arbitrarily sliced input.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    /// Sentinel meaning "no such state". Table cells use it for "no
    /// transition"; the parser itself is never in this state.
    Undefined,
    #[default]
    /// Default steady-state mode: printable characters are emitted as
    /// [`Action::Print`], C0 controls are executed immediately, and lead
    /// bytes of structured sequences trigger transitions out.
    Ground,
    /// Entered on ESC (0x1B) from any state, cancelling whatever sequence
    /// was in progress. The next byte selects the sequence family.
    Escape,
    /// Collects intermediate bytes (0x20..=0x2F) of a plain ESC sequence,
    /// e.g. the `(` in `ESC ( B`, until the final byte dispatches.
    EscapeIntermediate,
    /// Entered via `ESC [` or the C1 introducer 0x9B. Only the first byte
    /// of the control sequence is handled here, since the private markers
    /// 0x3C..=0x3F may only appear in that position.
    CsiEntry,
    /// Accumulates numeric CSI parameters separated by semicolons. A colon
    /// or a misplaced private marker disqualifies the sequence.
    CsiParam,
    /// Collects CSI intermediates after the parameters. Any further
    /// parameter byte is an error that moves to [`State::CsiIgnore`].
    CsiIntermediate,
    /// Error recovery for malformed CSI: consume until a final byte, then
    /// return to ground without dispatching.
    CsiIgnore,
    /// Entered via `ESC P` or C1 0x90, mirroring [`State::CsiEntry`] for
    /// device control strings.
    DcsEntry,
    /// Numeric parameter collection for DCS sequences.
    DcsParam,
    /// Intermediate collection for DCS sequences.
    DcsIntermediate,
    /// Streams the data string of a DCS to the hooked handler via
    /// [`Action::Put`] until the string terminator arrives. Has an exit
    /// action ([`Action::Unhook`]) so the handler can finish cleanly.
    DcsPassthrough,
    /// Error recovery for malformed DCS: swallow everything until ST.
    DcsIgnore,
    /// Collects an OSC payload after `ESC ]` or C1 0x9D. Terminated by ST;
    /// BEL termination is an opt-in extension.
    OscString,
    /// SOS, PM and APC strings carry no function here; contents are
    /// ignored until ST.
    SosPmApcString,
}

/// An input code point causes one of these actions, with or without a state
/// change. The set follows the DEC parser diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Sentinel meaning "no action"; never delivered to a sink.
    Undefined,
    /// The code point has no observable effect.
    Ignore,
    /// Emit a printable code point.
    Print,
    /// Execute a C0/C1 control function immediately.
    Execute,
    /// Forget any collected private marker, intermediates and parameters.
    /// Fires on entry to the escape, CSI entry and DCS entry states so that
    /// interleaved sequences like `CSI 3 ; 1 CSI 2 J` stay well formed.
    Clear,
    /// Store a private marker or intermediate byte for the dispatch.
    Collect,
    /// Accumulate a parameter digit or start the next parameter on `;`.
    Param,
    /// The final byte of an escape sequence arrived; dispatch it.
    EscDispatch,
    /// The final byte of a control sequence arrived; dispatch it together
    /// with the collected marker, intermediates and parameters.
    CsiDispatch,
    /// The final byte of the first part of a device control string arrived;
    /// select a handler for the data string that follows.
    Hook,
    /// Pass one data-string code point to the hooked DCS handler.
    Put,
    /// The device control string ended; let the handler finish.
    Unhook,
    /// An OSC string begins.
    OscStart,
    /// Pass one OSC string code point to the OSC handler.
    OscPut,
    /// The OSC string ended.
    OscEnd,
}

/// Why an action fires: because a state is entered, as an in-state event,
/// because a state is left, or during a transition between two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionClass {
    Enter,
    Event,
    Leave,
    Transition,
}
