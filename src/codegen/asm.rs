use std::fmt::{Display, Formatter};

/// Registers the translator addresses by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// Stack pointer, next free stack slot.
    Sp,
    /// Base of the current `local` segment.
    Lcl,
    /// Base of the current `argument` segment.
    Arg,
    This,
    That,
    /// Scratch cell for staged pop addresses and the saved frame base.
    R13,
    /// Scratch cell for the saved return address.
    R14,
}

impl Display for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Register::Sp => write!(f, "SP"),
            Register::Lcl => write!(f, "LCL"),
            Register::Arg => write!(f, "ARG"),
            Register::This => write!(f, "THIS"),
            Register::That => write!(f, "THAT"),
            Register::R13 => write!(f, "R13"),
            Register::R14 => write!(f, "R14"),
        }
    }
}

/// Target of an A-instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addr {
    Literal(u16),
    Register(Register),
    Symbol(String),
}

impl Display for Addr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Addr::Literal(value) => write!(f, "{}", value),
            Addr::Register(register) => write!(f, "{}", register),
            Addr::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

/// Destination field of a C-instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dest {
    M,
    D,
    MD,
    A,
    AM,
    AD,
    AMD,
}

impl Display for Dest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Dest::M => write!(f, "M"),
            Dest::D => write!(f, "D"),
            Dest::MD => write!(f, "MD"),
            Dest::A => write!(f, "A"),
            Dest::AM => write!(f, "AM"),
            Dest::AD => write!(f, "AD"),
            Dest::AMD => write!(f, "AMD"),
        }
    }
}

/// Computation field of a C-instruction, the full ALU table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comp {
    Zero,
    One,
    MinusOne,
    D,
    A,
    M,
    NotD,
    NotA,
    NotM,
    MinusD,
    MinusA,
    MinusM,
    DPlusOne,
    APlusOne,
    MPlusOne,
    DMinusOne,
    AMinusOne,
    MMinusOne,
    DPlusA,
    DPlusM,
    DMinusA,
    DMinusM,
    AMinusD,
    MMinusD,
    DAndA,
    DAndM,
    DOrA,
    DOrM,
}

impl Display for Comp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Comp::Zero => write!(f, "0"),
            Comp::One => write!(f, "1"),
            Comp::MinusOne => write!(f, "-1"),
            Comp::D => write!(f, "D"),
            Comp::A => write!(f, "A"),
            Comp::M => write!(f, "M"),
            Comp::NotD => write!(f, "!D"),
            Comp::NotA => write!(f, "!A"),
            Comp::NotM => write!(f, "!M"),
            Comp::MinusD => write!(f, "-D"),
            Comp::MinusA => write!(f, "-A"),
            Comp::MinusM => write!(f, "-M"),
            Comp::DPlusOne => write!(f, "D+1"),
            Comp::APlusOne => write!(f, "A+1"),
            Comp::MPlusOne => write!(f, "M+1"),
            Comp::DMinusOne => write!(f, "D-1"),
            Comp::AMinusOne => write!(f, "A-1"),
            Comp::MMinusOne => write!(f, "M-1"),
            Comp::DPlusA => write!(f, "D+A"),
            Comp::DPlusM => write!(f, "D+M"),
            Comp::DMinusA => write!(f, "D-A"),
            Comp::DMinusM => write!(f, "D-M"),
            Comp::AMinusD => write!(f, "A-D"),
            Comp::MMinusD => write!(f, "M-D"),
            Comp::DAndA => write!(f, "D&A"),
            Comp::DAndM => write!(f, "D&M"),
            Comp::DOrA => write!(f, "D|A"),
            Comp::DOrM => write!(f, "D|M"),
        }
    }
}

/// Jump field of a C-instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    Jgt,
    Jeq,
    Jge,
    Jlt,
    Jne,
    Jle,
    Jmp,
}

impl Display for Jump {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Jump::Jgt => write!(f, "JGT"),
            Jump::Jeq => write!(f, "JEQ"),
            Jump::Jge => write!(f, "JGE"),
            Jump::Jlt => write!(f, "JLT"),
            Jump::Jne => write!(f, "JNE"),
            Jump::Jle => write!(f, "JLE"),
            Jump::Jmp => write!(f, "JMP"),
        }
    }
}

/// One line of generated assembly.
///
/// Lowering builds sequences of these; turning them into text, including
/// the indentation convention, is the writer's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asm {
    /// `// text`, documents the source instruction a block came from.
    Comment(String),
    /// `(NAME)`, a jump target.
    Label(String),
    /// `@target`.
    At(Addr),
    /// `dest=comp;jump` with both `dest` and `jump` optional.
    C {
        dest: Option<Dest>,
        comp: Comp,
        jump: Option<Jump>,
    },
}

impl Asm {
    pub fn at_register(register: Register) -> Asm {
        Asm::At(Addr::Register(register))
    }

    pub fn at_literal(value: u16) -> Asm {
        Asm::At(Addr::Literal(value))
    }

    pub fn at_symbol(symbol: impl Into<String>) -> Asm {
        Asm::At(Addr::Symbol(symbol.into()))
    }

    /// `dest=comp`.
    pub fn assign(dest: Dest, comp: Comp) -> Asm {
        Asm::C {
            dest: Some(dest),
            comp,
            jump: None,
        }
    }

    /// `comp;jump`.
    pub fn branch(comp: Comp, jump: Jump) -> Asm {
        Asm::C {
            dest: None,
            comp,
            jump: Some(jump),
        }
    }
}

impl Display for Asm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Asm::Comment(text) => write!(f, "// {}", text),
            Asm::Label(name) => write!(f, "({})", name),
            Asm::At(addr) => write!(f, "@{}", addr),
            Asm::C { dest, comp, jump } => {
                if let Some(dest) = dest {
                    write!(f, "{}=", dest)?;
                }
                write!(f, "{}", comp)?;
                if let Some(jump) = jump {
                    write!(f, ";{}", jump)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_instruction_forms() {
        assert_eq!(Asm::at_register(Register::Sp).to_string(), "@SP");
        assert_eq!(Asm::at_literal(42).to_string(), "@42");
        assert_eq!(Asm::at_symbol("Main.3").to_string(), "@Main.3");
        assert_eq!(Asm::at_symbol("Foo$bar").to_string(), "@Foo$bar");
    }

    #[test]
    fn c_instruction_forms() {
        assert_eq!(Asm::assign(Dest::D, Comp::M).to_string(), "D=M");
        assert_eq!(Asm::assign(Dest::AM, Comp::MMinusOne).to_string(), "AM=M-1");
        assert_eq!(Asm::assign(Dest::D, Comp::MMinusD).to_string(), "D=M-D");
        assert_eq!(Asm::branch(Comp::Zero, Jump::Jmp).to_string(), "0;JMP");
        assert_eq!(Asm::branch(Comp::D, Jump::Jne).to_string(), "D;JNE");
    }

    #[test]
    fn label_and_comment_forms() {
        assert_eq!(Asm::Label("LOOP".to_string()).to_string(), "(LOOP)");
        assert_eq!(
            Asm::Comment("push local 2".to_string()).to_string(),
            "// push local 2"
        );
    }
}
