mod actor;
mod builder;
mod dispatch;
mod enums;
mod parser;
mod transitions;
mod utf8;

pub use actor::Actor;
pub use builder::DispatchParser;
pub use dispatch::{Dispatch, Interpreter};
pub use enums::{Action, ActionClass};
pub use parser::{Options, Parser};
