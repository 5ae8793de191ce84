mod lexer;
pub use lexer::{ByteInput, Lexer, ReadInput, TieBreak};

mod lexer_builder;
pub use lexer_builder::LexerBuilder;

mod token_category;
pub use token_category::TokenCategory;

mod tokens;
pub use tokens::Tokens;
