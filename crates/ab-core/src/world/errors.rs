//! Action precondition errors.
//!
//! These cover the cases where a command cannot even start: the action
//! aborts with zero energy spent and the host relays the message. Numeric
//! clamps and player death are never errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("you have nothing to fire with")]
    NothingToFireWith,
    #[error("that ammunition does not fit your launcher")]
    AmmoMismatch,
    #[error("no such item")]
    NoSuchItem,
    #[error("the target is out of reach")]
    OutOfReach,
    #[error("you must take off the item before throwing it")]
    ThrowWielded,
}
