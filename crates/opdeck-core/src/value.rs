use crate::pose::Pose;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Tagged value exchanged with the authority.
///
/// The wire format is a closed union; every consumer goes through the
/// explicit `as_*` accessors, which fail with [`ValueError::TypeMismatch`]
/// instead of coercing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Number(f64),
    String(String),
    Vector(Vec<f64>),
    Pose(Pose),
    Array(Vec<Value>),
    Map(IndexMap<String, Value>),
}

/// Discriminant of a [`Value`], used in error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Number,
    String,
    Vector,
    Pose,
    Array,
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Vector => "vector",
            ValueKind::Pose => "pose",
            ValueKind::Array => "array",
            ValueKind::Map => "map",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("expected a vector of length {expected}, found {found}")]
    Length { expected: usize, found: usize },
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Vector(_) => ValueKind::Vector,
            Value::Pose(_) => ValueKind::Pose,
            Value::Array(_) => ValueKind::Array,
            Value::Map(_) => ValueKind::Map,
        }
    }

    pub fn empty_map() -> Self {
        Value::Map(IndexMap::new())
    }

    fn mismatch(&self, expected: ValueKind) -> ValueError {
        ValueError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch(ValueKind::Bool)),
        }
    }

    pub fn as_int(&self) -> Result<i64, ValueError> {
        match self {
            Value::Int(i) => Ok(*i),
            other => Err(other.mismatch(ValueKind::Int)),
        }
    }

    /// Numeric accessor; an integer widens to `f64` since the authority is
    /// free to publish either for number-valued fields.
    pub fn as_number(&self) -> Result<f64, ValueError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Int(i) => Ok(*i as f64),
            other => Err(other.mismatch(ValueKind::Number)),
        }
    }

    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(other.mismatch(ValueKind::String)),
        }
    }

    pub fn as_vector(&self) -> Result<&[f64], ValueError> {
        match self {
            Value::Vector(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::Vector)),
        }
    }

    pub fn as_pose(&self) -> Result<Pose, ValueError> {
        match self {
            Value::Pose(p) => Ok(*p),
            other => Err(other.mismatch(ValueKind::Pose)),
        }
    }

    pub fn as_array(&self) -> Result<&[Value], ValueError> {
        match self {
            Value::Array(values) => Ok(values),
            other => Err(other.mismatch(ValueKind::Array)),
        }
    }

    pub fn as_map(&self) -> Result<&IndexMap<String, Value>, ValueError> {
        match self {
            Value::Map(map) => Ok(map),
            other => Err(other.mismatch(ValueKind::Map)),
        }
    }

    /// Looks up a nested entry by key path through `Map` values.
    pub fn lookup(&self, path: &[String]) -> Option<&Value> {
        let mut current = self;
        for key in path {
            current = current.as_map().ok()?.get(key)?;
        }
        Some(current)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Vector(v)
    }
}

impl From<Pose> for Value {
    fn from(v: Pose) -> Self {
        Value::Pose(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_reject_mismatched_kinds() {
        let v = Value::String("hello".into());
        assert_eq!(v.as_str(), Ok("hello"));
        assert_eq!(
            v.as_int(),
            Err(ValueError::TypeMismatch {
                expected: ValueKind::Int,
                found: ValueKind::String,
            })
        );
    }

    #[test]
    fn numbers_widen_from_int() {
        assert_eq!(Value::Int(3).as_number(), Ok(3.0));
        assert_eq!(Value::Number(0.5).as_number(), Ok(0.5));
        assert!(Value::Bool(true).as_number().is_err());
    }

    #[test]
    fn values_serialize_for_the_wire() {
        let value = Value::Array(vec![Value::Int(1), Value::String("walk".into())]);
        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn lookup_descends_nested_maps() {
        let mut robots = IndexMap::new();
        robots.insert(
            "names".to_owned(),
            Value::Array(vec!["jvrc1".into(), "ground".into()]),
        );
        let mut root = IndexMap::new();
        root.insert("robots".to_owned(), Value::Map(robots));
        let data = Value::Map(root);

        let path = vec!["robots".to_owned(), "names".to_owned()];
        let names = data.lookup(&path).unwrap().as_array().unwrap();
        assert_eq!(names.len(), 2);
        assert!(data.lookup(&["nothing".to_owned()]).is_none());
    }
}
