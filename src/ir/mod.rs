pub mod analysis;
pub mod ast;
