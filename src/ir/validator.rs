use super::*;

use std::collections::HashSet;

/// Structural checks on an emitted module, run before it is handed on.
pub struct IRValidator;

impl IRValidator {
    pub fn validate_module(module: &Module) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for function in &module.functions {
            if let Err(mut func_errors) = Self::validate_function(module, function) {
                errors.append(&mut func_errors);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_function(module: &Module, function: &Function) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if function.is_external {
            if !function.blocks.is_empty() {
                errors.push(format!(
                    "external function '{}' must not have a body",
                    function.name
                ));
            }
            return if errors.is_empty() { Ok(()) } else { Err(errors) };
        }

        if function.blocks.is_empty() {
            errors.push(format!("function '{}' has no blocks", function.name));
        }

        // every block is checked in order, so a register must be defined
        // by an earlier instruction to count as defined
        let mut defined: HashSet<&str> = HashSet::new();

        for block in &function.blocks {
            for instruction in &block.instructions {
                for operand in instruction.operands() {
                    Self::check_value(module, function, &defined, operand, &mut errors);
                }

                if let Instruction::Call { func, .. } = instruction {
                    if module.function(func).is_none() {
                        errors.push(format!(
                            "'{}' calls undeclared function '{}'",
                            function.name, func
                        ));
                    }
                }

                if let Some(dest) = instruction.dest() {
                    if !defined.insert(dest) {
                        errors.push(format!(
                            "register {} is defined more than once in '{}'",
                            dest, function.name
                        ));
                    }
                }
            }

            match &block.terminator {
                Some(Terminator::Ret { value: (ty, value) }) => {
                    if *ty != function.return_type {
                        errors.push(format!(
                            "'{}' returns {} but is declared to return {}",
                            function.name, ty, function.return_type
                        ));
                    }
                    Self::check_value(module, function, &defined, value, &mut errors);
                }
                None => errors.push(format!(
                    "block '{}' in '{}' has no terminator",
                    block.label, function.name
                )),
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    fn check_value(
        module: &Module,
        function: &Function,
        defined: &HashSet<&str>,
        value: &Value,
        errors: &mut Vec<String>,
    ) {
        match value {
            Value::Constant(_) => {}
            Value::Register(name) => {
                if !defined.contains(name.as_str()) {
                    errors.push(format!(
                        "register {} is used before it is defined in '{}'",
                        name, function.name
                    ));
                }
            }
            Value::Global(name) => {
                if !module.global_strings.contains_key(name) {
                    errors.push(format!(
                        "'{}' refers to undeclared global @{}",
                        function.name, name
                    ));
                }
            }
        }
    }
}
