//! Terminal rendering of channel messages

pub mod console;
pub mod formatter;
