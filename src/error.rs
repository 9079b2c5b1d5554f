use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::codegen::error::CodegenError;
use crate::declare_error_type;
use crate::frontend::error::ParseError;

declare_error_type! {
    #[error("Translation failed")]
    pub enum TranslateError {
        Parse(ParseError),
        Codegen(CodegenError),
        ReadSource(ReadSourceError),
        CreateOutput(CreateOutputError),
        ScanDirectory(ScanDirectoryError),
        EmptyDirectory(EmptyDirectoryError),
        RemoveIntermediate(RemoveIntermediateError),
    }
}

pub type TranslateResult<T> = Result<T, TranslateError>;

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(code(driver::read_source))]
#[error("failed to read source file `{}`", .path.display())]
pub struct ReadSourceError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(code(driver::create_output))]
#[error("failed to write output file `{}`", .path.display())]
pub struct CreateOutputError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(code(driver::scan_directory))]
#[error("failed to scan directory `{}`", .path.display())]
pub struct ScanDirectoryError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(
    code(driver::empty_directory),
    help("a program directory must contain at least one .vm file")
)]
#[error("`{}` contains no .vm files", .path.display())]
pub struct EmptyDirectoryError {
    pub path: PathBuf,
}

#[derive(Error, Diagnostic, Debug)]
#[diagnostic(code(driver::remove_intermediate))]
#[error("failed to remove intermediate file `{}`", .path.display())]
pub struct RemoveIntermediateError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
