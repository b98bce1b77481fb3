mod json;
mod label;
mod terminal;
mod token_list;

pub use json::{JsonReporter, ReachabilityReport};
pub use label::{FileLabeler, LayoutCategory};
pub use terminal::TerminalReporter;
pub use token_list::{TokenListWriter, TokenRecord};
