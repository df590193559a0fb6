//! asralign-cli: command-line frontend for the asralign library.

pub mod align;
pub mod cli;
pub mod corpus;
pub mod docs;
pub mod output;
pub mod timealign;
