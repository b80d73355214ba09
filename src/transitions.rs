//! Transition rows for the escape-sequence state machine.
//!
//! The parser is driven by a compile-time table that mirrors the DEC
//! VT500-series diagram. Each function in this module is one row: given an
//! input byte it returns the next [`State`] and the [`Action`] to perform,
//! where `State::Undefined` means "stay in the current state" and
//! `Action::Undefined` means "nothing to do". A cell that is undefined in
//! both positions is unknown input, which the engine logs and drops. The
//! `anywhere` row is consulted before the per-state rows.

use crate::enums::{Action, State};

/// Unknown input: no transition, no action.
const NONE: (State, Action) = (State::Undefined, Action::Undefined);

/// An in-state event cell.
#[inline(always)]
const fn stay(action: Action) -> (State, Action) {
    (State::Undefined, action)
}

/// Rules that apply regardless of the current state: sequence cancellation
/// via CAN, SUB and ESC, the 8-bit C1 introducers, and the string
/// terminator. Handling the C1 bytes here collapses them onto their 7-bit
/// ESC-prefixed equivalents without duplicating rows.
#[inline(always)]
const fn anywhere(byte: u8) -> (State, Action) {
    use State::*;

    match byte {
        0x18 | 0x1a | 0x80..=0x8f | 0x91..=0x97 | 0x9c => {
            (Ground, Action::Undefined)
        },
        0x1b => (Escape, Action::Undefined),
        0x90 => (DcsEntry, Action::Undefined),
        0x9b => (CsiEntry, Action::Undefined),
        0x9d => (OscString, Action::Undefined),
        0x98 | 0x9e | 0x9f => (SosPmApcString, Action::Undefined),
        _ => NONE,
    }
}

/// Ground row: printable data and immediate C0 controls.
#[inline(always)]
const fn ground(byte: u8) -> (State, Action) {
    use Action::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => stay(Execute),
        0x20..=0x7f | 0xa0..=0xff => stay(Print),
        _ => NONE,
    }
}

/// ESC row: the next byte identifies the sequence family.
#[inline(always)]
const fn escape(byte: u8) -> (State, Action) {
    use Action::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => stay(Execute),
        0x7f => stay(Ignore),
        0x20..=0x2f => (State::EscapeIntermediate, Collect),
        0x30..=0x4f | 0x51..=0x57 | 0x59 | 0x5a | 0x5c | 0x60..=0x7e => {
            (State::Ground, EscDispatch)
        },
        0x5b => (State::CsiEntry, Undefined),
        0x5d => (State::OscString, Undefined),
        0x50 => (State::DcsEntry, Undefined),
        0x58 | 0x5e | 0x5f => (State::SosPmApcString, Undefined),
        _ => NONE,
    }
}

/// ESC intermediate row: collect until the final byte dispatches.
#[inline(always)]
const fn escape_intermediate(byte: u8) -> (State, Action) {
    use Action::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => stay(Execute),
        0x20..=0x2f => stay(Collect),
        0x7f => stay(Ignore),
        0x30..=0x7e => (State::Ground, EscDispatch),
        _ => NONE,
    }
}

/// CSI entry row: route the first byte after the introducer.
#[inline(always)]
const fn csi_entry(byte: u8) -> (State, Action) {
    use Action::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => stay(Execute),
        0x7f => stay(Ignore),
        0x20..=0x2f => (State::CsiIntermediate, Collect),
        0x3a => (State::CsiIgnore, Undefined),
        0x30..=0x39 | 0x3b => (State::CsiParam, Param),
        0x3c..=0x3f => (State::CsiParam, Collect),
        0x40..=0x7e => (State::Ground, CsiDispatch),
        _ => NONE,
    }
}

/// CSI parameter row: digits and separators until an intermediate or final
/// byte arrives.
#[inline(always)]
const fn csi_param(byte: u8) -> (State, Action) {
    use Action::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => stay(Execute),
        0x30..=0x39 | 0x3b => stay(Param),
        0x7f => stay(Ignore),
        0x3a | 0x3c..=0x3f => (State::CsiIgnore, Undefined),
        0x20..=0x2f => (State::CsiIntermediate, Collect),
        0x40..=0x7e => (State::Ground, CsiDispatch),
        _ => NONE,
    }
}

/// CSI intermediate row: a parameter byte past this point disqualifies the
/// sequence.
#[inline(always)]
const fn csi_intermediate(byte: u8) -> (State, Action) {
    use Action::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => stay(Execute),
        0x20..=0x2f => stay(Collect),
        0x7f => stay(Ignore),
        0x30..=0x3f => (State::CsiIgnore, Undefined),
        0x40..=0x7e => (State::Ground, CsiDispatch),
        _ => NONE,
    }
}

/// CSI ignore row: swallow a disqualified sequence up to its final byte.
#[inline(always)]
const fn csi_ignore(byte: u8) -> (State, Action) {
    use Action::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => stay(Execute),
        0x20..=0x3f | 0x7f => stay(Ignore),
        0x40..=0x7e => (State::Ground, Undefined),
        _ => NONE,
    }
}

/// DCS entry row. C0 controls other than CAN, SUB and ESC are not executed
/// while recognising the first part of a device control string.
#[inline(always)]
const fn dcs_entry(byte: u8) -> (State, Action) {
    use Action::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => stay(Ignore),
        0x7f => stay(Ignore),
        0x3a => (State::DcsIgnore, Undefined),
        0x20..=0x2f => (State::DcsIntermediate, Collect),
        0x30..=0x39 | 0x3b => (State::DcsParam, Param),
        0x3c..=0x3f => (State::DcsParam, Collect),
        0x40..=0x7e => (State::DcsPassthrough, Undefined),
        _ => NONE,
    }
}

/// DCS parameter row, mirroring `csi_param` with DCS targets.
#[inline(always)]
const fn dcs_param(byte: u8) -> (State, Action) {
    use Action::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f | 0x7f => stay(Ignore),
        0x30..=0x39 | 0x3b => stay(Param),
        0x3a | 0x3c..=0x3f => (State::DcsIgnore, Undefined),
        0x20..=0x2f => (State::DcsIntermediate, Collect),
        0x40..=0x7e => (State::DcsPassthrough, Undefined),
        _ => NONE,
    }
}

/// DCS intermediate row, mirroring `csi_intermediate` with DCS targets.
#[inline(always)]
const fn dcs_intermediate(byte: u8) -> (State, Action) {
    use Action::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f | 0x7f => stay(Ignore),
        0x20..=0x2f => stay(Collect),
        0x30..=0x3f => (State::DcsIgnore, Undefined),
        0x40..=0x7e => (State::DcsPassthrough, Undefined),
        _ => NONE,
    }
}

/// DCS passthrough row: forward the data string, including C0 controls, to
/// the hooked handler. The terminator is handled by the `anywhere` row.
#[inline(always)]
const fn dcs_passthrough(byte: u8) -> (State, Action) {
    use Action::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f | 0x20..=0x7e => stay(Put),
        0x7f => stay(Ignore),
        _ => NONE,
    }
}

/// DCS ignore row: swallow a malformed device control string until ST.
/// Unlike the other ignore states this row is a true catch-all.
#[inline(always)]
const fn dcs_ignore(byte: u8) -> (State, Action) {
    use Action::*;

    match byte {
        // ST is handled by the anywhere row before this one is reached.
        0x9c => NONE,
        _ => stay(Ignore),
    }
}

/// OSC row: accumulate the payload; C0 controls are ignored within the
/// string.
#[inline(always)]
const fn osc_string(byte: u8) -> (State, Action) {
    use Action::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => stay(Ignore),
        0x20..=0x7f => stay(OscPut),
        _ => NONE,
    }
}

/// SOS/PM/APC row: contents carry no function and are ignored until ST.
#[inline(always)]
const fn sos_pm_apc_string(byte: u8) -> (State, Action) {
    use Action::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f | 0x20..=0x7f | 0xa0..=0xff => {
            stay(Ignore)
        },
        _ => NONE,
    }
}

/// Action to trigger upon entering a state, before the next byte is read.
#[inline(always)]
pub(crate) const fn entry_action(state: State) -> Action {
    use State::*;

    match state {
        Escape | CsiEntry | DcsEntry => Action::Clear,
        DcsPassthrough => Action::Hook,
        OscString => Action::OscStart,
        _ => Action::Undefined,
    }
}

/// Action to trigger after leaving a state, finalising in-flight strings.
#[inline(always)]
pub(crate) const fn exit_action(state: State) -> Action {
    use State::*;

    match state {
        DcsPassthrough => Action::Unhook,
        OscString => Action::OscEnd,
        _ => Action::Undefined,
    }
}

/// Row consulted for code points above the table's byte range: the
/// per-state treatment of a generic printable character.
#[inline(always)]
pub(crate) const fn printable(state: State) -> (State, Action) {
    use State::*;

    match state {
        Ground => stay(Action::Print),
        OscString => stay(Action::OscPut),
        DcsPassthrough => stay(Action::Put),
        CsiIgnore | DcsIgnore | SosPmApcString => stay(Action::Ignore),
        _ => NONE,
    }
}

/// Table lookup for a `(state, byte)` pair. The `anywhere` row takes
/// precedence over the per-state rows.
#[inline(always)]
pub(crate) const fn transit(state: State, byte: u8) -> (State, Action) {
    use State::*;

    let cell = anywhere(byte);
    if !matches!(cell.0, State::Undefined) {
        return cell;
    }

    match state {
        Ground => ground(byte),
        Escape => escape(byte),
        EscapeIntermediate => escape_intermediate(byte),
        CsiEntry => csi_entry(byte),
        CsiParam => csi_param(byte),
        CsiIntermediate => csi_intermediate(byte),
        CsiIgnore => csi_ignore(byte),
        DcsEntry => dcs_entry(byte),
        DcsParam => dcs_param(byte),
        DcsIntermediate => dcs_intermediate(byte),
        DcsPassthrough => dcs_passthrough(byte),
        DcsIgnore => dcs_ignore(byte),
        OscString => osc_string(byte),
        SosPmApcString => sos_pm_apc_string(byte),
        Undefined => NONE,
    }
}
