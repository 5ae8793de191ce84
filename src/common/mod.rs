/// Module that provides a Position type
mod position;
pub use position::Position;

/// Module that provides a Token type
mod token;
pub use token::Token;
