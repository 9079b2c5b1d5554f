pub mod codegen;
pub mod error;
pub mod frontend;
mod macros;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::codegen::CodeWriter;
use crate::error::{
    CreateOutputError, EmptyDirectoryError, ReadSourceError, RemoveIntermediateError,
    ScanDirectoryError, TranslateResult,
};
use crate::frontend::command::Command;
use crate::frontend::Parser;

/// Translates `path` and returns the path of the written artifact.
///
/// A file `X.vm` becomes a sibling `X.asm`. A directory becomes a single
/// `Dir/Dir.asm` combining every `.vm` unit inside it.
pub fn translate(path: &Path, bootstrap: bool) -> TranslateResult<PathBuf> {
    if path.is_dir() {
        translate_directory(path, bootstrap)
    } else {
        translate_file(path, bootstrap)
    }
}

/// Translates one source file into a sibling `.asm` file.
pub fn translate_file(path: &Path, bootstrap: bool) -> TranslateResult<PathBuf> {
    let text = fs::read_to_string(path).map_err(|source| ReadSourceError {
        path: path.to_path_buf(),
        source,
    })?;
    let output = path.with_extension("asm");
    let unit = artifact_base_name(&output);

    let file = File::create(&output).map_err(|source| CreateOutputError {
        path: output.clone(),
        source,
    })?;
    let mut writer = CodeWriter::new(BufWriter::new(file), unit);
    if bootstrap {
        writer.write_bootstrap()?;
    }
    translate_unit(&text, &mut writer)?;
    writer.flush()?;
    Ok(output)
}

/// Translates every `.vm` unit in `dir` (in name order) and combines the
/// results into `dir/<dirname>.asm`, each unit preceded by a marker comment.
/// The per-unit intermediates are removed once combined.
pub fn translate_directory(dir: &Path, bootstrap: bool) -> TranslateResult<PathBuf> {
    let units = collect_units(dir)?;
    if units.is_empty() {
        return Err(EmptyDirectoryError {
            path: dir.to_path_buf(),
        }
        .into());
    }
    let dir_name = artifact_base_name(dir);

    let mut intermediates = Vec::new();
    for unit in &units {
        intermediates.push(translate_file(unit, false)?);
    }

    let mut combined = Vec::new();
    if bootstrap {
        let mut prologue = CodeWriter::new(combined, dir_name.as_str());
        prologue.write_bootstrap()?;
        combined = prologue.into_inner();
    }
    for (unit, intermediate) in units.iter().zip(&intermediates) {
        let marker = unit
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let body = fs::read_to_string(intermediate).map_err(|source| ReadSourceError {
            path: intermediate.clone(),
            source,
        })?;
        combined.extend_from_slice(format!("// === {} ===\n", marker).as_bytes());
        combined.extend_from_slice(body.as_bytes());
    }

    // Remove intermediates before writing the combined artifact: a unit
    // named after the directory would otherwise have its intermediate
    // deleted out from under the final output.
    for intermediate in &intermediates {
        fs::remove_file(intermediate).map_err(|source| RemoveIntermediateError {
            path: intermediate.clone(),
            source,
        })?;
    }

    let output = dir.join(format!("{}.asm", dir_name));
    fs::write(&output, &combined).map_err(|source| CreateOutputError {
        path: output.clone(),
        source,
    })?;
    Ok(output)
}

/// Feeds every instruction of one unit through the given writer.
fn translate_unit<W: Write>(source: &str, writer: &mut CodeWriter<W>) -> TranslateResult<()> {
    let mut parser = Parser::new(source);
    while parser.has_more_lines() {
        match parser.advance()? {
            Command::Arithmetic(op) => writer.write_arithmetic(*op)?,
            Command::Push { segment, index } => writer.write_push(*segment, *index)?,
            Command::Pop { segment, index } => writer.write_pop(*segment, *index)?,
            Command::Label(label) => writer.write_label(label)?,
            Command::Goto(label) => writer.write_goto(label)?,
            Command::IfGoto(label) => writer.write_if(label)?,
            Command::Function { name, locals } => writer.write_function(name, *locals)?,
            Command::Call { name, args } => writer.write_call(name, *args)?,
            Command::Return => writer.write_return()?,
        }
    }
    Ok(())
}

fn collect_units(dir: &Path) -> TranslateResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| ScanDirectoryError {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut units = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ScanDirectoryError {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "vm") {
            units.push(path);
        }
    }
    units.sort();
    Ok(units)
}

fn artifact_base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
