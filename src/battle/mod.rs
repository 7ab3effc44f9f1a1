//! Turn-based battle session: types, the action-resolver seam, and the
//! session state machine.

#![allow(unused_imports)]

pub mod resolver;
pub mod session;
pub mod types;

pub use resolver::*;
pub use session::*;
pub use types::*;
