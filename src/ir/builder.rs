use super::*;
use crate::ast::{BinOp, Expr, Program, Spanned, Stmt};
use crate::error::{CompileError, CompileResult};

use tracing::{debug, trace};

use std::collections::{HashMap, HashSet};

const PRINTF: &str = "printf";
const PRINT_FORMAT: &str = "%d\n";
const PRINT_FORMAT_GLOBAL: &str = ".fmt";

/// Lowers a parsed program into a module holding a single `main` function.
pub struct IRBuilder {
    module: Module,
    current_function: Option<usize>,
    current_block: Option<usize>,
    // hint -> how many registers already carry it in the current function
    register_names: HashMap<String, usize>,
    used_registers: HashSet<String>,
    // variable name -> the stack slot of its latest declaration
    symbol_table: HashMap<String, Value>,
}

impl IRBuilder {
    pub fn new(module_name: String) -> Self {
        Self {
            module: Module {
                name: module_name,
                functions: Vec::new(),
                global_strings: BTreeMap::new(),
            },
            current_function: None,
            current_block: None,
            register_names: HashMap::new(),
            used_registers: HashSet::new(),
            symbol_table: HashMap::new(),
        }
    }

    pub fn generate_module(mut self, program: &Program) -> CompileResult<Module> {
        self.generate_main_function(program)?;
        debug!(
            module = %self.module.name,
            functions = self.module.functions.len(),
            "generated module"
        );
        Ok(self.module)
    }

    fn generate_main_function(&mut self, program: &Program) -> CompileResult<()> {
        let main_function = Function {
            name: "main".to_string(),
            params: vec![],
            return_type: IRType::I32,
            blocks: Vec::new(),
            is_external: false,
            is_variadic: false,
        };

        self.module.functions.push(main_function);
        self.current_function = Some(self.module.functions.len() - 1);
        self.register_names.clear();
        self.used_registers.clear();
        self.symbol_table.clear();

        let entry_block_idx = self.create_block("entry".to_string())?;
        self.set_current_block(entry_block_idx);

        for statement in program {
            self.generate_stmt(statement)?;
        }

        self.set_terminator(Terminator::Ret {
            value: (IRType::I32, Value::Constant(Constant::I32(0))),
        })?;

        if let Some(func_idx) = self.current_function {
            let instructions: usize = self.module.functions[func_idx]
                .blocks
                .iter()
                .map(|b| b.instructions.len())
                .sum();
            debug!(instructions, "generated main");
        }

        self.current_function = None;
        self.current_block = None;
        Ok(())
    }

    fn generate_stmt(&mut self, (stmt, span): &Spanned<Stmt>) -> CompileResult<()> {
        match stmt {
            Stmt::Let { var, value } => {
                trace!(var = %var, ?span, "let");
                let val = self.generate_expr(value)?;

                // every declaration gets a fresh slot, even when `var` already has one
                let slot = self.new_register(var);
                self.add_instruction(Instruction::Alloca {
                    dest: slot.clone(),
                    ty: IRType::I32,
                    span: span.clone(),
                })?;
                self.add_instruction(Instruction::Store {
                    value: val,
                    ptr: Value::Register(slot.clone()),
                    ty: IRType::I32,
                    span: span.clone(),
                })?;
                self.symbol_table.insert(var.clone(), Value::Register(slot));
            }

            Stmt::Print { value } => {
                trace!(?span, "print");
                let val = self.generate_expr(value)?;
                self.declare_printf();
                let format = self.global_string(PRINT_FORMAT_GLOBAL, PRINT_FORMAT);
                self.add_instruction(Instruction::Call {
                    dest: None,
                    func: PRINTF.to_string(),
                    args: vec![(IRType::Ptr, format), (IRType::I32, val)],
                    span: span.clone(),
                })?;
            }
        }
        Ok(())
    }

    fn generate_expr(&mut self, (expr, span): &Spanned<Expr>) -> CompileResult<Value> {
        match expr {
            Expr::Number(val) => Ok(Value::Constant(Constant::I32(*val))),

            Expr::Variable(name) => {
                let Some(slot) = self.symbol_table.get(name).cloned() else {
                    return Err(CompileError::UnknownVariable {
                        name: name.clone(),
                        span: span.clone(),
                    });
                };
                let result_reg = self.new_register(name);
                self.add_instruction(Instruction::Load {
                    dest: result_reg.clone(),
                    ptr: slot,
                    ty: IRType::I32,
                    span: span.clone(),
                })?;
                Ok(Value::Register(result_reg))
            }

            Expr::BinOp {
                operator,
                l_value,
                r_value,
            } => {
                let lhs = self.generate_expr(l_value)?;
                let rhs = self.generate_expr(r_value)?;
                let ty = IRType::I32;
                let span = span.clone();

                // division by zero is left for the executed program to hit
                let (result_reg, instruction) = match operator {
                    BinOp::Add => {
                        let dest = self.new_register("addtmp");
                        let instruction = Instruction::Add {
                            dest: dest.clone(),
                            lhs,
                            rhs,
                            ty,
                            span,
                        };
                        (dest, instruction)
                    }
                    BinOp::Sub => {
                        let dest = self.new_register("subtmp");
                        let instruction = Instruction::Sub {
                            dest: dest.clone(),
                            lhs,
                            rhs,
                            ty,
                            span,
                        };
                        (dest, instruction)
                    }
                    BinOp::Mul => {
                        let dest = self.new_register("multmp");
                        let instruction = Instruction::Mul {
                            dest: dest.clone(),
                            lhs,
                            rhs,
                            ty,
                            span,
                        };
                        (dest, instruction)
                    }
                    BinOp::Div => {
                        let dest = self.new_register("divtmp");
                        let instruction = Instruction::SDiv {
                            dest: dest.clone(),
                            lhs,
                            rhs,
                            ty,
                            span,
                        };
                        (dest, instruction)
                    }
                };

                self.add_instruction(instruction)?;
                Ok(Value::Register(result_reg))
            }
        }
    }

    fn declare_printf(&mut self) {
        if self.module.function(PRINTF).is_some() {
            return;
        }
        self.module.functions.push(Function {
            name: PRINTF.to_string(),
            params: vec![("format".to_string(), IRType::Ptr)],
            return_type: IRType::I32,
            blocks: Vec::new(),
            is_external: true,
            is_variadic: true,
        });
    }

    fn global_string(&mut self, name: &str, contents: &str) -> Value {
        self.module
            .global_strings
            .entry(name.to_string())
            .or_insert_with(|| contents.to_string());
        Value::Global(name.to_string())
    }

    /// `%hint` the first time, then `%hint1`, `%hint2`, ... skipping any
    /// name already taken through another hint.
    fn new_register(&mut self, hint: &str) -> String {
        let count = self.register_names.entry(hint.to_string()).or_insert(0);
        loop {
            let name = if *count == 0 {
                format!("%{}", hint)
            } else {
                format!("%{}{}", hint, count)
            };
            *count += 1;
            if self.used_registers.insert(name.clone()) {
                return name;
            }
        }
    }

    fn current_block_mut(&mut self, what: &str) -> CompileResult<&mut BasicBlock> {
        match (self.current_function, self.current_block) {
            (Some(func_idx), Some(block_idx)) => {
                Ok(&mut self.module.functions[func_idx].blocks[block_idx])
            }
            _ => Err(CompileError::InvalidIr(vec![format!(
                "{} emitted outside of a basic block",
                what
            )])),
        }
    }

    pub(super) fn add_instruction(&mut self, instruction: Instruction) -> CompileResult<()> {
        self.current_block_mut("instruction")?
            .instructions
            .push(instruction);
        Ok(())
    }

    pub(super) fn set_terminator(&mut self, terminator: Terminator) -> CompileResult<()> {
        self.current_block_mut("terminator")?.terminator = Some(terminator);
        Ok(())
    }

    fn create_block(&mut self, label: String) -> CompileResult<usize> {
        let Some(func_idx) = self.current_function else {
            return Err(CompileError::InvalidIr(vec![format!(
                "block '{}' created outside of a function",
                label
            )]));
        };
        let block = BasicBlock {
            label,
            instructions: Vec::new(),
            terminator: None,
        };
        self.module.functions[func_idx].blocks.push(block);
        Ok(self.module.functions[func_idx].blocks.len() - 1)
    }

    fn set_current_block(&mut self, block_idx: usize) {
        self.current_block = Some(block_idx);
    }
}
