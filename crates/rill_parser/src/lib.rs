//! Front end for the rill language: token model, streaming lexer, AST with
//! its canonical string rendering, and the Pratt parser.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;
