pub mod smali;
pub mod xml;

pub use smali::{SmaliError, SmaliParser, SmaliProgram};
pub use xml::{BuiltLayout, LayoutError, LayoutTreeBuilder};
