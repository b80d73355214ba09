//! The boundary between the state machine and its consumer.
//!
//! The [`Parser`](crate::parser::Parser) walks a byte stream and reduces it
//! to a flat series of action callbacks. An [`Actor`] receives those
//! callbacks and is responsible for whatever happens next: collecting
//! dispatch records (see [`DispatchParser`](crate::builder::DispatchParser)),
//! driving a screen model, or recording events in tests. The engine stays
//! oblivious to the concrete sink type.

use crate::enums::{Action, ActionClass};

/// Receives every action the parser performs.
///
/// `ch` carries the code point that triggered the action for `Event` and
/// `Transition` callbacks. `Enter` and `Leave` actions are not tied to an
/// input byte and receive `'\0'`, with one exception: [`Action::Hook`] fires
/// on entry to DCS passthrough and carries the final byte of the device
/// control string.
///
/// Callbacks run synchronously on the caller's thread. Implementations must
/// not feed bytes back into the parser from inside a callback.
pub trait Actor {
    fn on_action(&mut self, class: ActionClass, action: Action, ch: char);
}
