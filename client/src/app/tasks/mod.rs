//! # Async Tasks
//!
//! Background timers driving periodic controller work.

pub mod polling;
