use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::declare_error_type;

declare_error_type! {
    #[error("Parse error: {0}")]
    pub enum ParseError {
        MalformedIndex(MalformedIndexError),
        IllegalCharacter(IllegalCharacterError),
        UnknownSegment(UnknownSegmentError),
        UnknownOperator(UnknownOperatorError),
        UnrecognizedInstruction(UnrecognizedInstructionError),
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(
    code(syntax::malformed_index),
    help("indexes are unsigned 16-bit decimal integers")
)]
#[error("malformed numeric operand: {reason}")]
pub struct MalformedIndexError {
    pub reason: String,
    #[label = "not a valid index"]
    pub span: SourceSpan,
    #[source_code]
    pub src: String,
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(code(syntax::illegal_character))]
#[error("character does not belong to any instruction")]
pub struct IllegalCharacterError {
    #[label = "unexpected character"]
    pub span: SourceSpan,
    #[source_code]
    pub src: String,
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(
    code(syntax::unknown_segment),
    help("expected one of: local, argument, this, that, pointer, temp, constant, static")
)]
#[error("`{found}` is not a memory segment")]
pub struct UnknownSegmentError {
    pub found: String,
    #[label = "unknown segment"]
    pub span: SourceSpan,
    #[source_code]
    pub src: String,
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(
    code(syntax::unknown_operator),
    help("expected one of: add, sub, neg, eq, gt, lt, and, or, not")
)]
#[error("`{found}` is not an arithmetic or logical operator")]
pub struct UnknownOperatorError {
    pub found: String,
    #[label = "unknown operator"]
    pub span: SourceSpan,
    #[source_code]
    pub src: String,
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(
    code(syntax::unrecognized_instruction),
    help("instructions are: push/pop <segment> <n>, label/goto/if-goto <name>, function/call <name> <n>, return, or an arithmetic operator")
)]
#[error("line matches no instruction shape")]
pub struct UnrecognizedInstructionError {
    #[label = "unrecognized instruction"]
    pub span: SourceSpan,
    #[source_code]
    pub src: String,
}
