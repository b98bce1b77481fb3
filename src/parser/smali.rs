//! Smali (apktool's textual Dalvik bytecode) loader
//!
//! Only the parts the resource scanner and hierarchy oracle need are read:
//! class/superclass names, fields with constant initializers, and method
//! bodies reduced to constant loads and invocations. Integer constants are
//! tracked per register within a straight-line region, so an invocation
//! argument loaded by a preceding `const` shows up as a literal.

use crate::bytecode::{
    descriptor_to_class_name, BytecodeSource, ClassInfo, FieldInfo, InvokeExpr, MethodBody,
    MethodRef, Operand, Statement, ValueType,
};
use crate::hierarchy::HierarchyTable;
use rayon::prelude::*;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

#[derive(Error, Debug)]
pub enum SmaliError {
    #[error("failed to read smali file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("invalid smali pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// One parsed `.smali` file
#[derive(Debug, Clone)]
pub struct SmaliClass {
    pub info: ClassInfo,
    pub methods: Vec<MethodBody>,
}

/// Parser for a single smali class file
pub struct SmaliParser {
    invoke_pattern: Regex,
}

impl SmaliParser {
    pub fn new() -> Result<Self, SmaliError> {
        Ok(Self {
            invoke_pattern: Regex::new(
                r"^(invoke-[a-z]+)(/range)?\s+\{([^}]*)\},\s*(L[^;]+;)->([^(\s]+)\(([^)]*)\)(\S+)$",
            )?,
        })
    }

    pub fn parse(&self, path: &Path, contents: &str) -> Result<SmaliClass, SmaliError> {
        let parse_error = |line: usize, reason: &str| SmaliError::Parse {
            path: path.to_path_buf(),
            line,
            reason: reason.to_string(),
        };

        let mut info: Option<ClassInfo> = None;
        let mut methods = Vec::new();
        let mut current: Option<MethodState> = None;
        let mut in_annotation = false;

        for (index, raw) in contents.lines().enumerate() {
            let line_no = index + 1;
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            if in_annotation {
                if line.starts_with(".end annotation") || line.starts_with(".end subannotation") {
                    in_annotation = false;
                }
                continue;
            }
            if line.starts_with(".annotation") || line.starts_with(".subannotation") {
                in_annotation = true;
                continue;
            }

            if let Some(method) = current.as_mut() {
                if line.starts_with(".end method") {
                    if let Some(done) = current.take() {
                        methods.push(done.finish());
                    }
                } else {
                    self.parse_instruction(line, method);
                }
                continue;
            }

            if let Some(rest) = line.strip_prefix(".class") {
                let descriptor = rest
                    .split_whitespace()
                    .last()
                    .ok_or_else(|| parse_error(line_no, "missing class descriptor"))?;
                let name = object_descriptor(descriptor)
                    .ok_or_else(|| parse_error(line_no, "invalid class descriptor"))?;
                info = Some(ClassInfo::new(name));
            } else if let Some(rest) = line.strip_prefix(".super") {
                let class = info
                    .as_mut()
                    .ok_or_else(|| parse_error(line_no, ".super before .class"))?;
                class.superclass = rest.split_whitespace().last().and_then(object_descriptor);
            } else if let Some(rest) = line.strip_prefix(".field") {
                let class = info
                    .as_mut()
                    .ok_or_else(|| parse_error(line_no, ".field before .class"))?;
                if let Some(field) = parse_field(rest) {
                    class.fields.push(field);
                } else {
                    trace!("{}:{}: unparsed field", path.display(), line_no);
                }
            } else if let Some(rest) = line.strip_prefix(".method") {
                let signature = rest.split_whitespace().last().unwrap_or("");
                let name = signature.split('(').next().unwrap_or(signature);
                current = Some(MethodState::new(name));
            }
        }

        if current.is_some() {
            return Err(parse_error(contents.lines().count(), "unterminated .method"));
        }

        let info = info.ok_or_else(|| parse_error(1, "no .class directive"))?;
        Ok(SmaliClass { info, methods })
    }

    fn parse_instruction(&self, line: &str, method: &mut MethodState) {
        if let Some(label) = line.strip_prefix(':') {
            // try ranges are not branch targets
            if !label.starts_with("try_start_") && !label.starts_with("try_end_") {
                method.constants.clear();
            }
            return;
        }
        if line.starts_with('.') {
            return;
        }

        let (mnemonic, operands) = match line.split_once(char::is_whitespace) {
            Some((m, rest)) => (m, rest.trim()),
            None => (line, ""),
        };

        if mnemonic.starts_with("invoke-") {
            let statement = match self.parse_invoke(line, method) {
                Some(invoke) => Statement::Invoke(invoke),
                None => Statement::Other,
            };
            method.statements.push(statement);
            return;
        }

        let registers: Vec<&str> = operands.split(',').map(str::trim).collect();
        let dest = registers.first().copied().unwrap_or("");

        if is_int_const(mnemonic) {
            if let Some(value) = registers.get(1).and_then(|v| parse_smali_int(v)) {
                let value = value as i32;
                method.constants.insert(dest.to_string(), value);
                method.statements.push(Statement::Other);
                return;
            }
        }

        if matches!(mnemonic, "move" | "move/from16" | "move/16") {
            if let Some(source) = registers.get(1) {
                let value = method.constants.get(*source).copied();
                method.copy_constant(dest, value);
                return;
            }
        }

        if writes_first_register(mnemonic) && is_register(dest) {
            method.invalidate(dest);
            if mnemonic.contains("-wide") {
                if let Some(next) = next_register(dest) {
                    method.invalidate(&next);
                }
            }
        }
        method.statements.push(Statement::Other);
    }

    fn parse_invoke(&self, line: &str, method: &MethodState) -> Option<InvokeExpr> {
        let caps = self.invoke_pattern.captures(line)?;
        let kind = caps.get(1)?.as_str();
        let is_range = caps.get(2).is_some();
        let registers = if is_range {
            expand_range(caps.get(3)?.as_str())?
        } else {
            caps.get(3)?
                .as_str()
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect()
        };

        let class_name = object_descriptor(caps.get(4)?.as_str())?;
        let name = caps.get(5)?.as_str().to_string();
        let param_types = ValueType::parse_list(caps.get(6)?.as_str())?;
        let return_type = ValueType::from_descriptor(caps.get(7)?.as_str())?;

        let mut regs = registers.iter();
        if kind != "invoke-static" {
            regs.next();
        }

        let mut args = Vec::with_capacity(param_types.len());
        for ty in &param_types {
            let reg = regs.next()?;
            args.push(match method.constants.get(reg.as_str()) {
                Some(v) if *ty == ValueType::Int => Operand::IntConstant(*v),
                _ => Operand::Local(reg.clone()),
            });
            if matches!(ty, ValueType::Long | ValueType::Double) {
                regs.next();
            }
        }

        Some(InvokeExpr {
            method: MethodRef {
                class_name,
                name,
                param_types,
                return_type,
            },
            args,
        })
    }
}

struct MethodState {
    name: String,
    statements: Vec<Statement>,
    constants: HashMap<String, i32>,
}

impl MethodState {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            statements: Vec::new(),
            constants: HashMap::new(),
        }
    }

    fn copy_constant(&mut self, register: &str, value: Option<i32>) {
        match value {
            Some(v) => {
                self.constants.insert(register.to_string(), v);
            }
            None => {
                self.constants.remove(register);
            }
        }
        self.statements.push(Statement::Other);
    }

    fn invalidate(&mut self, register: &str) {
        self.constants.remove(register);
    }

    fn finish(self) -> MethodBody {
        MethodBody {
            name: self.name,
            statements: self.statements,
        }
    }
}

/// All smali classes of an unpacked application
#[derive(Debug, Default)]
pub struct SmaliProgram {
    classes: Vec<SmaliClass>,
}

impl SmaliProgram {
    pub fn new(classes: Vec<SmaliClass>) -> Self {
        Self { classes }
    }

    /// Load every `.smali` file under the given roots, in parallel.
    /// Files that fail to parse are skipped with a warning.
    pub fn load(roots: &[PathBuf]) -> Result<Self, SmaliError> {
        let files: Vec<PathBuf> = roots
            .iter()
            .flat_map(|root| {
                walkdir::WalkDir::new(root)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .map(|e| e.into_path())
                    .filter(|p| p.extension().map(|x| x == "smali").unwrap_or(false))
                    .collect::<Vec<_>>()
            })
            .collect();

        info!("Parsing {} smali files...", files.len());

        let parser = SmaliParser::new()?;
        let classes: Vec<SmaliClass> = files
            .par_iter()
            .filter_map(|path| {
                let result = std::fs::read_to_string(path)
                    .map_err(|source| SmaliError::Io {
                        path: path.clone(),
                        source,
                    })
                    .and_then(|contents| parser.parse(path, &contents));
                match result {
                    Ok(class) => Some(class),
                    Err(e) => {
                        warn!("Skipping smali file: {}", e);
                        None
                    }
                }
            })
            .collect();

        debug!("Loaded {} smali classes", classes.len());
        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[SmaliClass] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Superclass edges of every loaded class
    pub fn hierarchy(&self) -> HierarchyTable {
        let mut table = HierarchyTable::new();
        for class in &self.classes {
            match &class.info.superclass {
                Some(superclass) => table.insert(class.info.name.clone(), superclass.clone()),
                None => table.insert_root(class.info.name.clone()),
            }
        }
        table
    }
}

impl BytecodeSource for SmaliProgram {
    fn for_each_application_method_body(
        &self,
        package_prefix: &str,
        visitor: &mut dyn FnMut(&ClassInfo, &MethodBody),
    ) {
        for class in self
            .classes
            .iter()
            .filter(|c| c.info.name.starts_with(package_prefix))
        {
            for method in &class.methods {
                visitor(&class.info, method);
            }
        }
    }
}

fn strip_comment(line: &str) -> &str {
    // '#' inside string literals is rare enough in the lines we read to ignore
    match line.find('#') {
        Some(pos) if !line[..pos].contains('"') => &line[..pos],
        _ => line,
    }
}

fn object_descriptor(descriptor: &str) -> Option<String> {
    let inner = descriptor.strip_prefix('L')?.strip_suffix(';')?;
    Some(descriptor_to_class_name(inner))
}

fn parse_field(rest: &str) -> Option<FieldInfo> {
    let (declaration, initializer) = match rest.split_once(" = ") {
        Some((decl, init)) => (decl, Some(init.trim())),
        None => (rest, None),
    };

    let name_and_type = declaration.split_whitespace().last()?;
    let (name, descriptor) = name_and_type.rsplit_once(':')?;
    let field_type = ValueType::from_descriptor(descriptor)?;

    let constant = match (&field_type, initializer) {
        (ValueType::Int, Some(init)) => parse_smali_int(init),
        _ => None,
    };

    Some(FieldInfo {
        name: name.to_string(),
        field_type,
        constant,
    })
}

/// Parse smali integer literals: `0x7f0b001c`, `-0x1`, `42`
pub fn parse_smali_int(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let value = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    Some(if negative { -value } else { value })
}

fn is_int_const(mnemonic: &str) -> bool {
    matches!(mnemonic, "const" | "const/4" | "const/16" | "const/high16")
}

fn is_register(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some('v') | Some('p')) && chars.all(|c| c.is_ascii_digit()) && token.len() > 1
}

fn next_register(register: &str) -> Option<String> {
    let (prefix, number) = register.split_at(1);
    let n: u32 = number.parse().ok()?;
    Some(format!("{}{}", prefix, n + 1))
}

/// Instructions whose first operand is a source, not a destination
fn writes_first_register(mnemonic: &str) -> bool {
    const NON_WRITING: &[&str] = &[
        "if-", "goto", "return", "throw", "packed-switch", "sparse-switch", "fill-array-data",
        "monitor-", "iput", "sput", "aput", "filled-new-array", "nop", "check-cast",
    ];
    !NON_WRITING.iter().any(|p| mnemonic.starts_with(p))
}

/// `v0 .. v3` -> `[v0, v1, v2, v3]`
fn expand_range(range: &str) -> Option<Vec<String>> {
    let (start, end) = range.split_once("..")?;
    let (start, end) = (start.trim(), end.trim());
    if !is_register(start) || !is_register(end) || start[..1] != end[..1] {
        return None;
    }
    let prefix = &start[..1];
    let from: u32 = start[1..].parse().ok()?;
    let to: u32 = end[1..].parse().ok()?;
    Some((from..=to).map(|n| format!("{}{}", prefix, n)).collect())
}
