//! Cell token grammar shared by the layer encoder and decoder.
//!
//! ```text
//! token := "." | "[" digits "]" | "[" digits ":" digits "]"
//! ```
//!
//! `.` is an empty cell, `[type]` a block with meta 0 and `[type:meta]` a
//! block with non-zero meta.

use std::fmt;
use std::str::FromStr;

use prefab_core::constants::EMPTY_TOKEN;
use prefab_core::Block;

const OPEN: char = '[';
const CLOSE: char = ']';
const META_SEP: char = ':';

/// One cell of a layer line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Empty,
    Block(Block),
}

impl From<Option<Block>> for Token {
    fn from(cell: Option<Block>) -> Self {
        cell.map_or(Token::Empty, Token::Block)
    }
}

impl From<Token> for Option<Block> {
    fn from(token: Token) -> Self {
        match token {
            Token::Empty => None,
            Token::Block(block) => Some(block),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Empty => f.write_str(EMPTY_TOKEN),
            Token::Block(Block {
                block_type,
                meta: 0,
            }) => write!(f, "{OPEN}{block_type}{CLOSE}"),
            Token::Block(Block { block_type, meta }) => {
                write!(f, "{OPEN}{block_type}{META_SEP}{meta}{CLOSE}")
            }
        }
    }
}

/// A token that does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized token {0:?}")]
pub struct TokenError(pub String);

impl FromStr for Token {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == EMPTY_TOKEN {
            return Ok(Token::Empty);
        }

        let inner = s
            .strip_prefix(OPEN)
            .and_then(|rest| rest.strip_suffix(CLOSE))
            .ok_or_else(|| TokenError(s.to_string()))?;

        let (type_str, meta_str) = match inner.split_once(META_SEP) {
            Some((t, m)) => (t, Some(m)),
            None => (inner, None),
        };

        let block_type = parse_digits(type_str).ok_or_else(|| TokenError(s.to_string()))?;
        let meta = match meta_str {
            Some(m) => parse_digits(m).ok_or_else(|| TokenError(s.to_string()))?,
            None => 0,
        };

        Ok(Token::Block(Block::new(block_type, meta)))
    }
}

/// Parse a plain run of ASCII digits. `u32::from_str` alone would also
/// accept a leading `+`, which the grammar does not allow.
fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cell_token() {
        assert_eq!(Token::Empty.to_string(), ".");
    }

    #[test]
    fn test_block_without_meta_token() {
        assert_eq!(Token::Block(Block::new(5, 0)).to_string(), "[5]");
    }

    #[test]
    fn test_block_with_meta_token() {
        assert_eq!(Token::Block(Block::new(5, 2)).to_string(), "[5:2]");
    }

    #[test]
    fn test_parse_valid_tokens() {
        assert_eq!(".".parse::<Token>(), Ok(Token::Empty));
        assert_eq!("[5]".parse::<Token>(), Ok(Token::Block(Block::new(5, 0))));
        assert_eq!(
            "[12:7]".parse::<Token>(),
            Ok(Token::Block(Block::new(12, 7)))
        );
    }

    #[test]
    fn test_explicit_zero_meta_parses() {
        assert_eq!("[5:0]".parse::<Token>(), Ok(Token::Block(Block::new(5, 0))));
    }

    #[test]
    fn test_non_numeric_type_rejected() {
        assert_eq!(
            "[abc]".parse::<Token>(),
            Err(TokenError("[abc]".to_string()))
        );
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        for bad in [
            "", "[]", "[5", "5]", "5", "[:2]", "[5:]", "[5:2:1]", "[-1]", "[+5]", "[5 ]", "..",
            "---", "[99999999999]",
        ] {
            assert!(bad.parse::<Token>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_option_conversions() {
        assert_eq!(Token::from(None), Token::Empty);
        let block = Block::new(3, 1);
        assert_eq!(Token::from(Some(block)), Token::Block(block));
        assert_eq!(Option::<Block>::from(Token::Block(block)), Some(block));
        assert_eq!(Option::<Block>::from(Token::Empty), None);
    }
}
