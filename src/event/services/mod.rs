//! Application services for event handling.

mod dispatcher;

pub use dispatcher::{DispatchError, DispatchResult, DispatchSettings, EventDispatcher};
