pub mod expr;
pub mod filter;
pub mod ident;
pub mod literal;
pub mod operator;
pub mod span;
pub mod visitor;
