//! Middleware module
//!
//! This module contains the dispatcher glue that attaches state contexts to
//! incoming updates.

pub mod state;

pub use state::{callback_context, message_context};
