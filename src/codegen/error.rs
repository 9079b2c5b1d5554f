use miette::Diagnostic;
use thiserror::Error;

use crate::declare_error_type;

declare_error_type! {
    #[error("Codegen error: {0}")]
    pub enum CodegenError {
        ConstantPop(ConstantPopError),
        PointerIndex(PointerIndexError),
        Emit(EmitError),
    }
}

pub type CodegenResult<T> = Result<T, CodegenError>;

impl From<std::io::Error> for CodegenError {
    fn from(e: std::io::Error) -> Self {
        CodegenError::Emit(EmitError { source: e })
    }
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(
    code(codegen::constant_pop),
    help("the constant segment is virtual and push-only; pop into a storage segment instead")
)]
#[error("`pop constant {index}` has no storage destination")]
pub struct ConstantPopError {
    pub index: u16,
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(
    code(codegen::pointer_index),
    help("the pointer segment has exactly two slots: 0 (THIS) and 1 (THAT)")
)]
#[error("pointer index {index} is out of range")]
pub struct PointerIndexError {
    pub index: u16,
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(code(codegen::emit))]
#[error("failed to write generated assembly")]
pub struct EmitError {
    #[from]
    pub source: std::io::Error,
}
