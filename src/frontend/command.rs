use std::fmt::{Display, Formatter};
use std::str::FromStr;

use logos::Logos;
use miette::{SourceOffset, SourceSpan};

use crate::frontend::error::{
    IllegalCharacterError, MalformedIndexError, ParseError, UnknownOperatorError,
    UnknownSegmentError, UnrecognizedInstructionError,
};
use crate::frontend::token::{LexingError, TokenKind};

/// A virtual memory segment of the source machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Local,
    Argument,
    This,
    That,
    Pointer,
    Temp,
    Constant,
    Static,
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Local => write!(f, "local"),
            Segment::Argument => write!(f, "argument"),
            Segment::This => write!(f, "this"),
            Segment::That => write!(f, "that"),
            Segment::Pointer => write!(f, "pointer"),
            Segment::Temp => write!(f, "temp"),
            Segment::Constant => write!(f, "constant"),
            Segment::Static => write!(f, "static"),
        }
    }
}

/// An arithmetic or logical stack operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl ArithmeticOp {
    /// `neg` and `not` consume one operand, everything else two.
    pub fn is_unary(&self) -> bool {
        matches!(self, ArithmeticOp::Neg | ArithmeticOp::Not)
    }
}

impl Display for ArithmeticOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ArithmeticOp::Add => write!(f, "add"),
            ArithmeticOp::Sub => write!(f, "sub"),
            ArithmeticOp::Neg => write!(f, "neg"),
            ArithmeticOp::Eq => write!(f, "eq"),
            ArithmeticOp::Gt => write!(f, "gt"),
            ArithmeticOp::Lt => write!(f, "lt"),
            ArithmeticOp::And => write!(f, "and"),
            ArithmeticOp::Or => write!(f, "or"),
            ArithmeticOp::Not => write!(f, "not"),
        }
    }
}

/// One classified VM instruction.
///
/// Variants carry exactly the operands their kind defines, so an
/// instruction without a numeric operand has no index field to misread.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Arithmetic(ArithmeticOp),
    Push { segment: Segment, index: u16 },
    Pop { segment: Segment, index: u16 },
    Label(String),
    Goto(String),
    IfGoto(String),
    Function { name: String, locals: u16 },
    Call { name: String, args: u16 },
    Return,
}

impl FromStr for Command {
    type Err = ParseError;

    /// Classifies one logical line (comment-stripped, trimmed, non-empty).
    ///
    /// Classification is structural: `pop constant 3` classifies fine and is
    /// rejected later by the code generator, but a line matching none of the
    /// known token shapes is a hard error rather than a silent no-op.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut kinds = Vec::new();
        let mut spans = Vec::new();
        for (kind, span) in TokenKind::lexer(line).spanned() {
            match kind {
                Ok(kind) => {
                    kinds.push(kind);
                    spans.push(span);
                }
                Err(LexingError::InvalidIndex(reason)) => {
                    return Err(MalformedIndexError {
                        reason,
                        span: SourceSpan::new(SourceOffset::from(span.start), span.len()),
                        src: line.to_string(),
                    }
                    .into());
                }
                Err(LexingError::UnexpectedCharacter) => {
                    return Err(IllegalCharacterError {
                        span: SourceSpan::new(SourceOffset::from(span.start), span.len()),
                        src: line.to_string(),
                    }
                    .into());
                }
            }
        }

        match kinds.as_slice() {
            [TokenKind::KwPush, TokenKind::Segment(segment), TokenKind::Index(index)] => {
                Ok(Command::Push {
                    segment: *segment,
                    index: *index,
                })
            }
            [TokenKind::KwPop, TokenKind::Segment(segment), TokenKind::Index(index)] => {
                Ok(Command::Pop {
                    segment: *segment,
                    index: *index,
                })
            }
            [TokenKind::KwLabel, TokenKind::Ident(name)] => Ok(Command::Label(name.clone())),
            [TokenKind::KwGoto, TokenKind::Ident(name)] => Ok(Command::Goto(name.clone())),
            [TokenKind::KwIfGoto, TokenKind::Ident(name)] => Ok(Command::IfGoto(name.clone())),
            [TokenKind::KwFunction, TokenKind::Ident(name), TokenKind::Index(locals)] => {
                Ok(Command::Function {
                    name: name.clone(),
                    locals: *locals,
                })
            }
            [TokenKind::KwCall, TokenKind::Ident(name), TokenKind::Index(args)] => {
                Ok(Command::Call {
                    name: name.clone(),
                    args: *args,
                })
            }
            [TokenKind::KwReturn] => Ok(Command::Return),
            [TokenKind::Op(op)] => Ok(Command::Arithmetic(*op)),
            [TokenKind::KwPush | TokenKind::KwPop, _, TokenKind::Index(_)] => {
                let span = spans[1].clone();
                Err(UnknownSegmentError {
                    found: line[span.clone()].to_string(),
                    span: SourceSpan::new(SourceOffset::from(span.start), span.len()),
                    src: line.to_string(),
                }
                .into())
            }
            [TokenKind::Ident(name)] => {
                let span = spans[0].clone();
                Err(UnknownOperatorError {
                    found: name.clone(),
                    span: SourceSpan::new(SourceOffset::from(span.start), span.len()),
                    src: line.to_string(),
                }
                .into())
            }
            _ => Err(UnrecognizedInstructionError {
                span: SourceSpan::new(SourceOffset::from(0), line.len()),
                src: line.to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_all_nine_kinds() {
        assert_eq!(
            "add".parse::<Command>().unwrap(),
            Command::Arithmetic(ArithmeticOp::Add)
        );
        assert_eq!(
            "push argument 2".parse::<Command>().unwrap(),
            Command::Push {
                segment: Segment::Argument,
                index: 2
            }
        );
        assert_eq!(
            "pop local 0".parse::<Command>().unwrap(),
            Command::Pop {
                segment: Segment::Local,
                index: 0
            }
        );
        assert_eq!(
            "label LOOP_START".parse::<Command>().unwrap(),
            Command::Label("LOOP_START".to_string())
        );
        assert_eq!(
            "goto LOOP_START".parse::<Command>().unwrap(),
            Command::Goto("LOOP_START".to_string())
        );
        assert_eq!(
            "if-goto LOOP_START".parse::<Command>().unwrap(),
            Command::IfGoto("LOOP_START".to_string())
        );
        assert_eq!(
            "function Main.fibonacci 2".parse::<Command>().unwrap(),
            Command::Function {
                name: "Main.fibonacci".to_string(),
                locals: 2
            }
        );
        assert_eq!(
            "call Main.fibonacci 1".parse::<Command>().unwrap(),
            Command::Call {
                name: "Main.fibonacci".to_string(),
                args: 1
            }
        );
        assert_eq!("return".parse::<Command>().unwrap(), Command::Return);
    }

    #[test]
    fn pop_constant_classifies_structurally() {
        assert_eq!(
            "pop constant 3".parse::<Command>().unwrap(),
            Command::Pop {
                segment: Segment::Constant,
                index: 3
            }
        );
    }

    #[test]
    fn unknown_segment_is_rejected() {
        match "push bogus 3".parse::<Command>() {
            Err(ParseError::UnknownSegment(e)) => assert_eq!(e.found, "bogus"),
            other => panic!("expected UnknownSegment, got {:?}", other),
        }
    }

    #[test]
    fn unknown_operator_is_rejected() {
        match "frobnicate".parse::<Command>() {
            Err(ParseError::UnknownOperator(e)) => assert_eq!(e.found, "frobnicate"),
            other => panic!("expected UnknownOperator, got {:?}", other),
        }
    }

    #[test]
    fn oversized_index_is_rejected() {
        assert!(matches!(
            "push constant 99999".parse::<Command>(),
            Err(ParseError::MalformedIndex(_))
        ));
    }

    #[test]
    fn missing_index_is_rejected() {
        assert!(matches!(
            "push constant".parse::<Command>(),
            Err(ParseError::UnrecognizedInstruction(_))
        ));
    }

    #[test]
    fn numeric_label_is_rejected() {
        assert!(matches!(
            "label 12".parse::<Command>(),
            Err(ParseError::UnrecognizedInstruction(_))
        ));
    }

    #[test]
    fn stray_character_is_rejected() {
        assert!(matches!(
            "@foo".parse::<Command>(),
            Err(ParseError::IllegalCharacter(_))
        ));
    }

    #[test]
    fn extra_tokens_are_rejected() {
        assert!(matches!(
            "return 0".parse::<Command>(),
            Err(ParseError::UnrecognizedInstruction(_))
        ));
    }
}
