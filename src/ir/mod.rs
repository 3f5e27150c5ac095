use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::ops::Range;

pub mod builder;
pub mod validator;


pub use builder::IRBuilder;

#[derive(Debug, Clone, PartialEq)]
pub enum IRType {
    I8,  // byte
    I32, // int
    Ptr, // opaque pointer
    Array {
        element_type: Box<IRType>,
        size: usize,
    },
}

impl IRType {
    /// Alignment used for stack slots of this type.
    pub fn align(&self) -> usize {
        match self {
            IRType::I8 => 1,
            IRType::I32 => 4,
            IRType::Ptr => 8,
            IRType::Array { element_type, .. } => element_type.align(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Constant(Constant),
    // an instruction result or a stack slot, named with its leading '%'
    Register(String),
    Global(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    I32(i32),
}

#[derive(Debug, Clone)]
pub struct BasicBlock {
    pub label: String,
    pub instructions: Vec<Instruction>,
    pub terminator: Option<Terminator>,
}

#[derive(Debug, Clone)]
pub enum Instruction {
    // Memory operations
    Alloca {
        dest: String,
        ty: IRType,
        span: Range<usize>,
    },
    Load {
        dest: String,
        ptr: Value,
        ty: IRType,
        span: Range<usize>,
    },
    Store {
        value: Value,
        ptr: Value,
        ty: IRType,
        span: Range<usize>,
    },

    // Arithmetic operations
    Add {
        dest: String,
        lhs: Value,
        rhs: Value,
        ty: IRType,
        span: Range<usize>,
    },
    Sub {
        dest: String,
        lhs: Value,
        rhs: Value,
        ty: IRType,
        span: Range<usize>,
    },
    Mul {
        dest: String,
        lhs: Value,
        rhs: Value,
        ty: IRType,
        span: Range<usize>,
    },
    SDiv {
        dest: String,
        lhs: Value,
        rhs: Value,
        ty: IRType,
        span: Range<usize>,
    },

    // Function calls
    Call {
        dest: Option<String>,
        func: String,
        args: Vec<(IRType, Value)>,
        span: Range<usize>,
    },
}

impl Instruction {
    /// The register this instruction defines, if any.
    pub fn dest(&self) -> Option<&str> {
        match self {
            Instruction::Alloca { dest, .. }
            | Instruction::Load { dest, .. }
            | Instruction::Add { dest, .. }
            | Instruction::Sub { dest, .. }
            | Instruction::Mul { dest, .. }
            | Instruction::SDiv { dest, .. } => Some(dest),
            Instruction::Call { dest, .. } => dest.as_deref(),
            Instruction::Store { .. } => None,
        }
    }

    /// Values read by this instruction, in operand order.
    pub fn operands(&self) -> Vec<&Value> {
        match self {
            Instruction::Alloca { .. } => vec![],
            Instruction::Load { ptr, .. } => vec![ptr],
            Instruction::Store { value, ptr, .. } => vec![value, ptr],
            Instruction::Add { lhs, rhs, .. }
            | Instruction::Sub { lhs, rhs, .. }
            | Instruction::Mul { lhs, rhs, .. }
            | Instruction::SDiv { lhs, rhs, .. } => vec![lhs, rhs],
            Instruction::Call { args, .. } => args.iter().map(|(_, value)| value).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Terminator {
    Ret { value: (IRType, Value) },
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<(String, IRType)>,
    pub return_type: IRType,
    pub blocks: Vec<BasicBlock>,
    pub is_external: bool,
    pub is_variadic: bool,
}

#[derive(Debug, Default)]
pub struct Module {
    pub name: String,
    pub functions: Vec<Function>,
    // global name -> contents, without the trailing NUL
    pub global_strings: BTreeMap<String, String>,
}

impl Module {
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }
}

// Display implementations

impl Display for IRType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            IRType::I8 => write!(f, "i8"),
            IRType::I32 => write!(f, "i32"),
            IRType::Ptr => write!(f, "ptr"),
            IRType::Array { element_type, size } => {
                write!(f, "[{} x {}]", size, element_type)
            }
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Constant(c) => write!(f, "{}", c),
            Value::Register(name) => write!(f, "{}", name),
            Value::Global(name) => write!(f, "@{}", name),
        }
    }
}

impl Display for Constant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Constant::I32(i) => write!(f, "{}", i),
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Alloca { dest, ty, .. } => {
                write!(f, "  {} = alloca {}, align {}", dest, ty, ty.align())
            }
            Instruction::Load { dest, ptr, ty, .. } => {
                write!(f, "  {} = load {}, ptr {}, align {}", dest, ty, ptr, ty.align())
            }
            Instruction::Store { value, ptr, ty, .. } => {
                write!(f, "  store {} {}, ptr {}, align {}", ty, value, ptr, ty.align())
            }
            Instruction::Add {
                dest, lhs, rhs, ty, ..
            } => {
                write!(f, "  {} = add {} {}, {}", dest, ty, lhs, rhs)
            }
            Instruction::Sub {
                dest, lhs, rhs, ty, ..
            } => {
                write!(f, "  {} = sub {} {}, {}", dest, ty, lhs, rhs)
            }
            Instruction::Mul {
                dest, lhs, rhs, ty, ..
            } => {
                write!(f, "  {} = mul {} {}, {}", dest, ty, lhs, rhs)
            }
            Instruction::SDiv {
                dest, lhs, rhs, ty, ..
            } => {
                write!(f, "  {} = sdiv {} {}, {}", dest, ty, lhs, rhs)
            }
            Instruction::Call {
                dest, func, args, ..
            } => {
                write!(f, "  ")?;
                if let Some(dest) = dest {
                    write!(f, "{} = ", dest)?;
                }
                // printf is the only callee, always `i32 (ptr, ...)`
                write!(f, "call i32 (ptr, ...) @{}(", func)?;
                for (i, (ty, value)) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", ty, value)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Display for Terminator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Terminator::Ret { value: (ty, val) } => write!(f, "  ret {} {}", ty, val),
        }
    }
}

impl Display for BasicBlock {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.label)?;
        for instruction in &self.instructions {
            writeln!(f, "{}", instruction)?;
        }
        if let Some(term) = &self.terminator {
            writeln!(f, "{}", term)?;
        }
        Ok(())
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_external {
            write!(f, "declare {} @{}(", self.return_type, self.name)?;
        } else {
            write!(f, "define {} @{}(", self.return_type, self.name)?;
        }

        // parameters are never referenced, so only their types are printed
        for (i, (_, param_type)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param_type)?;
        }
        if self.is_variadic {
            if !self.params.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "...")?;
        }

        if self.is_external {
            writeln!(f, ")")?;
        } else {
            writeln!(f, ") {{")?;
            for (i, block) in self.blocks.iter().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }
                write!(f, "{}", block)?;
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}

impl Display for Module {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name)?;
        writeln!(f, "source_filename = \"{}\"", escape_bytes(&self.name))?;
        writeln!(f)?;

        if !self.global_strings.is_empty() {
            for (name, value) in &self.global_strings {
                let ty = IRType::Array {
                    element_type: Box::new(IRType::I8),
                    size: value.len() + 1,
                };
                writeln!(
                    f,
                    "@{} = private unnamed_addr constant {} c\"{}\\00\", align {}",
                    name,
                    ty,
                    escape_bytes(value),
                    ty.align()
                )?;
            }
            writeln!(f)?;
        }

        for (i, function) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", function)?;
        }

        Ok(())
    }
}

// LLVM string constants spell non-printable bytes, quotes and backslashes as
// `\XX` in upper-case hex.
fn escape_bytes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        if (byte.is_ascii_graphic() && byte != b'"' && byte != b'\\') || byte == b' ' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("\\{:02X}", byte));
        }
    }
    out
}
