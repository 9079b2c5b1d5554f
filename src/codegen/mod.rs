use std::io::Write;

use crate::codegen::asm::{Asm, Comp, Dest, Jump, Register};
use crate::codegen::error::{CodegenResult, ConstantPopError, PointerIndexError};
use crate::frontend::command::{ArithmeticOp, Segment};

pub mod asm;
pub mod error;

/// Lowest stack address; the bootstrap block points SP here.
pub const STACK_BASE: u16 = 256;
/// Function the bootstrap block calls into.
pub const ENTRY_FUNCTION: &str = "Sys.init";

/// First address of the temp segment.
const TEMP_BASE: u16 = 5;
/// Words a call pushes before the callee frame: return address plus the
/// four saved segment bases.
const SAVED_FRAME_WORDS: u16 = 5;

const INDENT: &str = "    ";

/// Lowers classified instructions into assembly for one output stream.
///
/// Owns the per-unit state: the unit name (statics are `unit.index`), the
/// currently open function (label prefix), and the two counters that keep
/// generated labels unique. Counters start at 1 and never reset.
pub struct CodeWriter<W: Write> {
    out: W,
    unit_name: String,
    current_function: Option<String>,
    branch_counter: u32,
    return_counter: u32,
}

impl<W: Write> CodeWriter<W> {
    pub fn new(out: W, unit_name: impl Into<String>) -> Self {
        CodeWriter {
            out,
            unit_name: unit_name.into(),
            current_function: None,
            branch_counter: 1,
            return_counter: 1,
        }
    }

    pub fn write_arithmetic(&mut self, op: ArithmeticOp) -> CodegenResult<()> {
        let compute = match op {
            ArithmeticOp::Add => vec![Asm::assign(Dest::D, Comp::DPlusM)],
            ArithmeticOp::Sub => vec![Asm::assign(Dest::D, Comp::MMinusD)],
            ArithmeticOp::And => vec![Asm::assign(Dest::D, Comp::DAndM)],
            ArithmeticOp::Or => vec![Asm::assign(Dest::D, Comp::DOrM)],
            ArithmeticOp::Neg => vec![Asm::assign(Dest::D, Comp::MinusD)],
            ArithmeticOp::Not => vec![Asm::assign(Dest::D, Comp::NotD)],
            ArithmeticOp::Eq => self.compare(Jump::Jeq),
            ArithmeticOp::Gt => self.compare(Jump::Jgt),
            ArithmeticOp::Lt => self.compare(Jump::Jlt),
        };

        let mut block = vec![Asm::Comment(op.to_string())];
        block.extend(pop_into_d());
        if !op.is_unary() {
            block.extend(pop_into_m());
        }
        block.extend(compute);
        block.extend(push_from_d());
        self.emit(&block)
    }

    pub fn write_push(&mut self, segment: Segment, index: u16) -> CodegenResult<()> {
        let mut block = vec![Asm::Comment(format!("push {} {}", segment, index))];
        match segment {
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                block.extend([
                    Asm::at_register(base_register(segment)),
                    Asm::assign(Dest::D, Comp::M),
                    Asm::at_literal(index),
                    Asm::assign(Dest::A, Comp::DPlusA),
                    Asm::assign(Dest::D, Comp::M),
                ]);
            }
            Segment::Temp => {
                block.extend([
                    Asm::at_literal(TEMP_BASE),
                    Asm::assign(Dest::D, Comp::A),
                    Asm::at_literal(index),
                    Asm::assign(Dest::A, Comp::DPlusA),
                    Asm::assign(Dest::D, Comp::M),
                ]);
            }
            Segment::Pointer => {
                block.extend([
                    Asm::at_register(pointer_register(index)?),
                    Asm::assign(Dest::D, Comp::M),
                ]);
            }
            Segment::Constant => {
                block.extend([Asm::at_literal(index), Asm::assign(Dest::D, Comp::A)]);
            }
            Segment::Static => {
                block.extend([
                    Asm::at_symbol(self.static_symbol(index)),
                    Asm::assign(Dest::D, Comp::M),
                ]);
            }
        }
        block.extend(push_from_d());
        self.emit(&block)
    }

    /// For the indirect segments the destination address goes through R13
    /// and must be computed before the pop runs, because the pop claims the
    /// only accumulator.
    pub fn write_pop(&mut self, segment: Segment, index: u16) -> CodegenResult<()> {
        let mut block = vec![Asm::Comment(format!("pop {} {}", segment, index))];
        match segment {
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                block.extend([
                    Asm::at_register(base_register(segment)),
                    Asm::assign(Dest::D, Comp::M),
                ]);
                block.extend(store_address_then_pop(index));
            }
            Segment::Temp => {
                block.extend([Asm::at_literal(TEMP_BASE), Asm::assign(Dest::D, Comp::A)]);
                block.extend(store_address_then_pop(index));
            }
            Segment::Pointer => {
                let register = pointer_register(index)?;
                block.extend(pop_into_d());
                block.extend([Asm::at_register(register), Asm::assign(Dest::M, Comp::D)]);
            }
            Segment::Static => {
                let symbol = self.static_symbol(index);
                block.extend(pop_into_d());
                block.extend([Asm::at_symbol(symbol), Asm::assign(Dest::M, Comp::D)]);
            }
            Segment::Constant => return Err(ConstantPopError { index }.into()),
        }
        self.emit(&block)
    }

    pub fn write_label(&mut self, label: &str) -> CodegenResult<()> {
        let block = [
            Asm::Comment(format!("label {}", label)),
            Asm::Label(self.scoped_label(label)),
        ];
        self.emit(&block)
    }

    pub fn write_goto(&mut self, label: &str) -> CodegenResult<()> {
        let block = [
            Asm::Comment(format!("goto {}", label)),
            Asm::at_symbol(self.scoped_label(label)),
            Asm::branch(Comp::Zero, Jump::Jmp),
        ];
        self.emit(&block)
    }

    /// Pops the top of the stack and jumps when it is nonzero.
    pub fn write_if(&mut self, label: &str) -> CodegenResult<()> {
        let mut block = vec![Asm::Comment(format!("if-goto {}", label))];
        block.extend(pop_into_d());
        block.extend([
            Asm::at_symbol(self.scoped_label(label)),
            Asm::branch(Comp::D, Jump::Jne),
        ]);
        self.emit(&block)
    }

    /// Emits the entry label and zero-initializes the `locals` slots on the
    /// stack. Subsequent labels are scoped to this function.
    pub fn write_function(&mut self, name: &str, locals: u16) -> CodegenResult<()> {
        let mut block = vec![
            Asm::Comment(format!("function {} {}", name, locals)),
            Asm::Label(name.to_string()),
        ];
        for _ in 0..locals {
            block.extend([Asm::at_literal(0), Asm::assign(Dest::D, Comp::A)]);
            block.extend(push_from_d());
        }
        self.current_function = Some(name.to_string());
        self.emit(&block)
    }

    /// Pushes the return address and the caller's LCL/ARG/THIS/THAT in that
    /// order (return restores them by fixed offset), repoints ARG and LCL
    /// for the callee, jumps, and lands the return label right after.
    pub fn write_call(&mut self, name: &str, args: u16) -> CodegenResult<()> {
        let return_label = format!("{}$ret.{}", self.label_prefix(), self.return_counter);
        self.return_counter += 1;

        let mut block = vec![Asm::Comment(format!("call {} {}", name, args))];
        block.extend([
            Asm::at_symbol(return_label.clone()),
            Asm::assign(Dest::D, Comp::A),
        ]);
        block.extend(push_from_d());
        for register in [Register::Lcl, Register::Arg, Register::This, Register::That] {
            block.extend([Asm::at_register(register), Asm::assign(Dest::D, Comp::M)]);
            block.extend(push_from_d());
        }
        // ARG = SP - 5 - args
        block.extend([
            Asm::at_register(Register::Sp),
            Asm::assign(Dest::D, Comp::M),
            Asm::at_literal(SAVED_FRAME_WORDS),
            Asm::assign(Dest::D, Comp::DMinusA),
            Asm::at_literal(args),
            Asm::assign(Dest::D, Comp::DMinusA),
            Asm::at_register(Register::Arg),
            Asm::assign(Dest::M, Comp::D),
        ]);
        // LCL = SP
        block.extend([
            Asm::at_register(Register::Sp),
            Asm::assign(Dest::D, Comp::M),
            Asm::at_register(Register::Lcl),
            Asm::assign(Dest::M, Comp::D),
        ]);
        block.extend([
            Asm::at_symbol(name),
            Asm::branch(Comp::Zero, Jump::Jmp),
            Asm::Label(return_label),
        ]);
        self.emit(&block)
    }

    /// Unwinds one frame: the return address is read into R14 before the
    /// result pop, since `*(frame - 5)` is the result slot itself when the
    /// callee took no arguments.
    pub fn write_return(&mut self) -> CodegenResult<()> {
        let mut block = vec![Asm::Comment("return".to_string())];
        // R13 = frame base, R14 = return address
        block.extend([
            Asm::at_register(Register::Lcl),
            Asm::assign(Dest::D, Comp::M),
            Asm::at_register(Register::R13),
            Asm::assign(Dest::M, Comp::D),
            Asm::at_literal(SAVED_FRAME_WORDS),
            Asm::assign(Dest::A, Comp::DMinusA),
            Asm::assign(Dest::D, Comp::M),
            Asm::at_register(Register::R14),
            Asm::assign(Dest::M, Comp::D),
        ]);
        // result lands at *ARG, the caller's next stack slot
        block.extend(pop_into_d());
        block.extend([
            Asm::at_register(Register::Arg),
            Asm::assign(Dest::A, Comp::M),
            Asm::assign(Dest::M, Comp::D),
            Asm::at_register(Register::Arg),
            Asm::assign(Dest::D, Comp::MPlusOne),
            Asm::at_register(Register::Sp),
            Asm::assign(Dest::M, Comp::D),
        ]);
        // walk the frame downward
        for register in [Register::That, Register::This, Register::Arg, Register::Lcl] {
            block.extend([
                Asm::at_register(Register::R13),
                Asm::assign(Dest::AM, Comp::MMinusOne),
                Asm::assign(Dest::D, Comp::M),
                Asm::at_register(register),
                Asm::assign(Dest::M, Comp::D),
            ]);
        }
        block.extend([
            Asm::at_register(Register::R14),
            Asm::assign(Dest::A, Comp::M),
            Asm::branch(Comp::Zero, Jump::Jmp),
        ]);
        self.emit(&block)
    }

    /// Program entry prologue: point SP at the stack base and call the
    /// entry function through the ordinary call protocol.
    pub fn write_bootstrap(&mut self) -> CodegenResult<()> {
        let block = [
            Asm::Comment("bootstrap".to_string()),
            Asm::at_literal(STACK_BASE),
            Asm::assign(Dest::D, Comp::A),
            Asm::at_register(Register::Sp),
            Asm::assign(Dest::M, Comp::D),
        ];
        self.emit(&block)?;
        self.write_call(ENTRY_FUNCTION, 0)
    }

    pub fn flush(&mut self) -> CodegenResult<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, block: &[Asm]) -> CodegenResult<()> {
        for instruction in block {
            match instruction {
                Asm::Comment(_) | Asm::Label(_) => writeln!(self.out, "{}", instruction)?,
                _ => writeln!(self.out, "{}{}", INDENT, instruction)?,
            }
        }
        Ok(())
    }

    fn compare(&mut self, condition: Jump) -> Vec<Asm> {
        let index = self.branch_counter;
        self.branch_counter += 1;
        vec![
            Asm::assign(Dest::D, Comp::MMinusD),
            Asm::at_symbol(format!("THEN{}", index)),
            Asm::branch(Comp::D, condition),
            Asm::assign(Dest::D, Comp::Zero),
            Asm::at_symbol(format!("END{}", index)),
            Asm::branch(Comp::Zero, Jump::Jmp),
            Asm::Label(format!("THEN{}", index)),
            Asm::assign(Dest::D, Comp::MinusOne),
            Asm::Label(format!("END{}", index)),
        ]
    }

    fn static_symbol(&self, index: u16) -> String {
        format!("{}.{}", self.unit_name, index)
    }

    fn scoped_label(&self, label: &str) -> String {
        format!("{}${}", self.label_prefix(), label)
    }

    fn label_prefix(&self) -> &str {
        self.current_function.as_deref().unwrap_or(&self.unit_name)
    }
}

/// `@SP / M=M-1 / A=M / D=M`: pop the stack top into D.
fn pop_into_d() -> [Asm; 4] {
    [
        Asm::at_register(Register::Sp),
        Asm::assign(Dest::M, Comp::MMinusOne),
        Asm::assign(Dest::A, Comp::M),
        Asm::assign(Dest::D, Comp::M),
    ]
}

/// `@SP / M=M-1 / A=M`: pop the stack top, leaving it readable as M.
/// Binary ops run this after [`pop_into_d`] so M holds the left operand.
fn pop_into_m() -> [Asm; 3] {
    [
        Asm::at_register(Register::Sp),
        Asm::assign(Dest::M, Comp::MMinusOne),
        Asm::assign(Dest::A, Comp::M),
    ]
}

/// `@SP / A=M / M=D / @SP / M=M+1`: push D onto the stack.
fn push_from_d() -> [Asm; 5] {
    [
        Asm::at_register(Register::Sp),
        Asm::assign(Dest::A, Comp::M),
        Asm::assign(Dest::M, Comp::D),
        Asm::at_register(Register::Sp),
        Asm::assign(Dest::M, Comp::MPlusOne),
    ]
}

/// `@i / D=D+A / @R13 / M=D`, then pop, then store through R13.
fn store_address_then_pop(index: u16) -> Vec<Asm> {
    let mut sequence = vec![
        Asm::at_literal(index),
        Asm::assign(Dest::D, Comp::DPlusA),
        Asm::at_register(Register::R13),
        Asm::assign(Dest::M, Comp::D),
    ];
    sequence.extend(pop_into_d());
    sequence.extend([
        Asm::at_register(Register::R13),
        Asm::assign(Dest::A, Comp::M),
        Asm::assign(Dest::M, Comp::D),
    ]);
    sequence
}

fn base_register(segment: Segment) -> Register {
    match segment {
        Segment::Local => Register::Lcl,
        Segment::Argument => Register::Arg,
        Segment::This => Register::This,
        Segment::That => Register::That,
        Segment::Pointer | Segment::Temp | Segment::Constant | Segment::Static => unreachable!(),
    }
}

fn pointer_register(index: u16) -> CodegenResult<Register> {
    match index {
        0 => Ok(Register::This),
        1 => Ok(Register::That),
        _ => Err(PointerIndexError { index }.into()),
    }
}
