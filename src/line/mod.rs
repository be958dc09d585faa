//! LINE Messaging API delivery and reply formatting

pub mod client;
pub mod reply_formatter;

pub use client::LineClient;
pub use reply_formatter::format_reply;
