use logos::Logos;
use std::num::ParseIntError;

use crate::frontend::command::{ArithmeticOp, Segment};

#[derive(Debug, Default, Clone, PartialEq)]
pub enum LexingError {
    InvalidIndex(String),
    #[default]
    UnexpectedCharacter,
}

impl From<ParseIntError> for LexingError {
    fn from(e: ParseIntError) -> Self {
        LexingError::InvalidIndex(e.to_string())
    }
}

/// One token of a logical VM line. The command words, segment names and
/// arithmetic mnemonics are all reserved; `Ident` covers label and function
/// names (letters, digits, `_`, `.`, `$`, `:`, not starting with a digit).
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexingError)]
#[logos(skip r"[ \t]+")]
pub enum TokenKind {
    #[token("push")]
    KwPush,
    #[token("pop")]
    KwPop,
    #[token("label")]
    KwLabel,
    #[token("goto")]
    KwGoto,
    #[token("if-goto")]
    KwIfGoto,
    #[token("function")]
    KwFunction,
    #[token("call")]
    KwCall,
    #[token("return")]
    KwReturn,
    #[token("local", |_| Segment::Local)]
    #[token("argument", |_| Segment::Argument)]
    #[token("this", |_| Segment::This)]
    #[token("that", |_| Segment::That)]
    #[token("pointer", |_| Segment::Pointer)]
    #[token("temp", |_| Segment::Temp)]
    #[token("constant", |_| Segment::Constant)]
    #[token("static", |_| Segment::Static)]
    Segment(Segment),
    #[token("add", |_| ArithmeticOp::Add)]
    #[token("sub", |_| ArithmeticOp::Sub)]
    #[token("neg", |_| ArithmeticOp::Neg)]
    #[token("eq", |_| ArithmeticOp::Eq)]
    #[token("gt", |_| ArithmeticOp::Gt)]
    #[token("lt", |_| ArithmeticOp::Lt)]
    #[token("and", |_| ArithmeticOp::And)]
    #[token("or", |_| ArithmeticOp::Or)]
    #[token("not", |_| ArithmeticOp::Not)]
    Op(ArithmeticOp),
    #[regex("[0-9]+", |lex| lex.slice().parse())]
    Index(u16),
    #[regex(r"[a-zA-Z_.$:][a-zA-Z0-9_.$:]*", |lex| lex.slice().to_string())]
    Ident(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<TokenKind> {
        TokenKind::lexer(line)
            .map(|token| token.unwrap())
            .collect()
    }

    #[test]
    fn command_words_are_keywords() {
        assert_eq!(
            kinds("push pop label goto if-goto function call return"),
            vec![
                TokenKind::KwPush,
                TokenKind::KwPop,
                TokenKind::KwLabel,
                TokenKind::KwGoto,
                TokenKind::KwIfGoto,
                TokenKind::KwFunction,
                TokenKind::KwCall,
                TokenKind::KwReturn,
            ]
        );
    }

    #[test]
    fn segment_and_index_carry_payloads() {
        assert_eq!(
            kinds("constant 512"),
            vec![TokenKind::Segment(Segment::Constant), TokenKind::Index(512)]
        );
    }

    #[test]
    fn keyword_prefixed_words_stay_identifiers() {
        assert_eq!(
            kinds("gothic Main.test"),
            vec![
                TokenKind::Ident("gothic".to_string()),
                TokenKind::Ident("Main.test".to_string()),
            ]
        );
    }

    #[test]
    fn oversized_index_is_a_lexing_error() {
        let mut lexer = TokenKind::lexer("99999");
        match lexer.next() {
            Some(Err(LexingError::InvalidIndex(_))) => {}
            other => panic!("expected InvalidIndex, got {:?}", other),
        }
    }

    #[test]
    fn stray_character_is_a_lexing_error() {
        let mut lexer = TokenKind::lexer("@foo");
        assert_eq!(lexer.next(), Some(Err(LexingError::UnexpectedCharacter)));
    }
}
