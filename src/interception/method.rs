// src/interception/method.rs
//! Method identity and declared return types
//!
//! A [`ReturnType`] decides which value a failed call falls back to. Value
//! types fall back to their zero value; reference and nullable types fall
//! back to `null`.

use serde_json::{Map, Number, Value};
use std::fmt;

/// Declared return type of a proxied method
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnType {
    /// No meaningful value (unit / void)
    Unit,
    Bool,
    Int,
    UInt,
    Float,
    /// Value-type record; defaults field by field
    Record(Vec<(String, ReturnType)>),
    Text,
    List,
    Map,
    /// Named reference type
    Object(String),
    /// Nullable wrapper around any type
    Optional(Box<ReturnType>),
}

impl ReturnType {
    pub fn record<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, ReturnType)>,
        S: Into<String>,
    {
        ReturnType::Record(
            fields
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
        )
    }

    pub fn optional(inner: ReturnType) -> Self {
        ReturnType::Optional(Box::new(inner))
    }

    /// Non-nullable value types have a zero value; everything else is null
    pub fn is_value_type(&self) -> bool {
        matches!(
            self,
            ReturnType::Bool
                | ReturnType::Int
                | ReturnType::UInt
                | ReturnType::Float
                | ReturnType::Record(_)
        )
    }

    /// Value installed in the return slot when a call fails
    pub fn default_value(&self) -> Value {
        match self {
            ReturnType::Bool => Value::Bool(false),
            ReturnType::Int | ReturnType::UInt => Value::Number(Number::from(0)),
            ReturnType::Float => Number::from_f64(0.0)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ReturnType::Record(fields) => {
                let mut object = Map::with_capacity(fields.len());
                for (name, ty) in fields {
                    object.insert(name.clone(), ty.default_value());
                }
                Value::Object(object)
            }
            ReturnType::Unit
            | ReturnType::Text
            | ReturnType::List
            | ReturnType::Map
            | ReturnType::Object(_)
            | ReturnType::Optional(_) => Value::Null,
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Unit => write!(f, "()"),
            ReturnType::Bool => write!(f, "bool"),
            ReturnType::Int => write!(f, "int"),
            ReturnType::UInt => write!(f, "uint"),
            ReturnType::Float => write!(f, "float"),
            ReturnType::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, ty)?;
                }
                write!(f, "}}")
            }
            ReturnType::Text => write!(f, "text"),
            ReturnType::List => write!(f, "list"),
            ReturnType::Map => write!(f, "map"),
            ReturnType::Object(name) => write!(f, "{}", name),
            ReturnType::Optional(inner) => write!(f, "{}?", inner),
        }
    }
}

/// Identity of a method on a proxied type
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    /// Name of the type declaring the method
    pub declaring_type: &'static str,

    /// Method name
    pub name: &'static str,

    /// Declared return type
    pub return_type: ReturnType,

    /// Interface the method implements, if any
    pub interface: Option<&'static str>,
}

impl MethodInfo {
    pub fn new(declaring_type: &'static str, name: &'static str, return_type: ReturnType) -> Self {
        Self {
            declaring_type,
            name,
            return_type,
            interface: None,
        }
    }

    pub fn with_interface(mut self, interface: &'static str) -> Self {
        self.interface = Some(interface);
        self
    }

    /// `Type::method`, used in logs and error messages
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.declaring_type, self.name)
    }
}
