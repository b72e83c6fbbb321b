//! Step definitions for story transition behaviour tests.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
