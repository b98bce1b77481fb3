//! Minimal view of compiled application code
//!
//! Just enough structure for resource-usage scanning: classes with their
//! constant fields, and method bodies as a flat list of statements whose
//! invocation arguments are already resolved to literals where the loader
//! could prove them constant.

use std::fmt;

/// JVM/Dalvik value types, as written in method descriptors
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Void,
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Object(String),
    Array(Box<ValueType>),
}

impl ValueType {
    /// Parse one type descriptor (e.g. `I`, `Landroid/view/View;`, `[I`)
    pub fn from_descriptor(descriptor: &str) -> Option<ValueType> {
        let (ty, rest) = Self::parse_prefix(descriptor)?;
        rest.is_empty().then_some(ty)
    }

    /// Parse a parameter list such as `ILandroid/view/View;[J`
    pub fn parse_list(descriptors: &str) -> Option<Vec<ValueType>> {
        let mut types = Vec::new();
        let mut rest = descriptors;
        while !rest.is_empty() {
            let (ty, remaining) = Self::parse_prefix(rest)?;
            types.push(ty);
            rest = remaining;
        }
        Some(types)
    }

    fn parse_prefix(s: &str) -> Option<(ValueType, &str)> {
        let first = s.chars().next()?;
        let rest = &s[first.len_utf8()..];
        let ty = match first {
            'V' => ValueType::Void,
            'Z' => ValueType::Boolean,
            'B' => ValueType::Byte,
            'C' => ValueType::Char,
            'S' => ValueType::Short,
            'I' => ValueType::Int,
            'J' => ValueType::Long,
            'F' => ValueType::Float,
            'D' => ValueType::Double,
            'L' => {
                let end = rest.find(';')?;
                let name = descriptor_to_class_name(&rest[..end]);
                return Some((ValueType::Object(name), &rest[end + 1..]));
            }
            '[' => {
                let (inner, remaining) = Self::parse_prefix(rest)?;
                return Some((ValueType::Array(Box::new(inner)), remaining));
            }
            _ => return None,
        };
        Some((ty, rest))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Void => f.write_str("void"),
            ValueType::Boolean => f.write_str("boolean"),
            ValueType::Byte => f.write_str("byte"),
            ValueType::Char => f.write_str("char"),
            ValueType::Short => f.write_str("short"),
            ValueType::Int => f.write_str("int"),
            ValueType::Long => f.write_str("long"),
            ValueType::Float => f.write_str("float"),
            ValueType::Double => f.write_str("double"),
            ValueType::Object(name) => f.write_str(name),
            ValueType::Array(inner) => write!(f, "{}[]", inner),
        }
    }
}

/// `com/example/R$layout` -> `com.example.R$layout`
pub fn descriptor_to_class_name(internal: &str) -> String {
    internal.replace('/', ".")
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub field_type: ValueType,
    /// Compile-time integer initializer, if any
    pub constant: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassInfo {
    pub name: String,
    pub superclass: Option<String>,
    pub fields: Vec<FieldInfo>,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Integer fields that carry a constant value
    pub fn int_constants(&self) -> impl Iterator<Item = (&str, i64)> {
        self.fields
            .iter()
            .filter(|f| f.field_type == ValueType::Int)
            .filter_map(|f| f.constant.map(|v| (f.name.as_str(), v)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRef {
    pub class_name: String,
    pub name: String,
    pub param_types: Vec<ValueType>,
    pub return_type: ValueType,
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.param_types.iter().map(|p| p.to_string()).collect();
        write!(
            f,
            "{} {}.{}({})",
            self.return_type,
            self.class_name,
            self.name,
            params.join(",")
        )
    }
}

/// A value flowing into an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    IntConstant(i32),
    Local(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvokeExpr {
    pub method: MethodRef,
    /// Arguments excluding the receiver
    pub args: Vec<Operand>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Invoke(InvokeExpr),
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodBody {
    pub name: String,
    pub statements: Vec<Statement>,
}

impl MethodBody {
    pub fn invocations(&self) -> impl Iterator<Item = &InvokeExpr> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Invoke(invoke) => Some(invoke),
            _ => None,
        })
    }
}

/// Provider of application method bodies for scanning
pub trait BytecodeSource {
    /// Visit every method body declared by a class whose name starts with `package_prefix`
    fn for_each_application_method_body(
        &self,
        package_prefix: &str,
        visitor: &mut dyn FnMut(&ClassInfo, &MethodBody),
    );
}
