//! Bound values carried in the parameter stream.
//!
//! Every `?` placeholder in compiled SQL corresponds to exactly one [`Value`]
//! in `Compiled::params`, in textual order.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dialect-agnostic bound value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Uuid(Uuid),
    /// Embedding vector for similarity search.
    Vector(Vec<f32>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text payload, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render a vector as the `[1,2,3]` text literal most engines parse.
    pub(crate) fn vector_text(values: &[f32]) -> String {
        let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        format!("[{}]", parts.join(","))
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => Text,
    &str => Text,
    Vec<u8> => Bytes,
    &[u8] => Bytes,
    serde_json::Value => Json,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    Uuid => Uuid,
    Vec<f32> => Vector,
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(feature = "postgres")]
mod postgres {
    use super::Value;
    use bytes::BytesMut;
    use std::error::Error;
    use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

    impl ToSql for Value {
        fn to_sql(
            &self,
            ty: &Type,
            out: &mut BytesMut,
        ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
            // Every arm goes through the inner type's `to_sql_checked`.
            match self {
                Value::Null => Ok(IsNull::Yes),
                Value::Bool(v) => v.to_sql_checked(ty, out),
                Value::Int(v) => {
                    // Narrow to the column's integer width when the server asks for it.
                    if *ty == Type::INT2 {
                        i16::try_from(*v)?.to_sql_checked(ty, out)
                    } else if *ty == Type::INT4 {
                        i32::try_from(*v)?.to_sql_checked(ty, out)
                    } else {
                        v.to_sql_checked(ty, out)
                    }
                }
                Value::Float(v) => {
                    if *ty == Type::FLOAT4 {
                        (*v as f32).to_sql_checked(ty, out)
                    } else {
                        v.to_sql_checked(ty, out)
                    }
                }
                Value::Text(v) => v.to_sql_checked(ty, out),
                Value::Bytes(v) => v.to_sql_checked(ty, out),
                Value::Json(v) => v.to_sql_checked(ty, out),
                Value::Date(v) => v.to_sql_checked(ty, out),
                Value::DateTime(v) => v.to_sql_checked(ty, out),
                Value::Uuid(v) => v.to_sql_checked(ty, out),
                Value::Vector(v) => v.to_sql_checked(ty, out),
            }
        }

        fn accepts(_ty: &Type) -> bool {
            true
        }

        to_sql_checked!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_convert() {
        assert_eq!(Value::from(18), Value::Int(18));
        assert_eq!(Value::from("a"), Value::Text("a".into()));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(1.5f64), Value::Float(1.5));
    }

    #[test]
    fn option_none_is_null() {
        let v: Option<i32> = None;
        assert!(Value::from(v).is_null());
        assert_eq!(Value::from(Some(3)), Value::Int(3));
    }

    #[test]
    fn vector_text_literal() {
        assert_eq!(Value::vector_text(&[1.0, 2.5]), "[1,2.5]");
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_string(&Value::Int(7)).unwrap();
        assert_eq!(json, r#"{"type":"int","value":7}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Int(7));
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn checked_binding_rejects_mismatched_server_types() {
        use bytes::BytesMut;
        use tokio_postgres::types::{ToSql, Type};

        let mut buf = BytesMut::new();
        assert!(Value::Int(18).to_sql_checked(&Type::TEXT, &mut buf).is_err());
        assert!(Value::Text("a".into()).to_sql_checked(&Type::INT8, &mut buf).is_err());
        assert!(Value::Int(70_000).to_sql_checked(&Type::INT2, &mut buf).is_err());
        assert!(buf.is_empty());

        assert!(Value::Int(18).to_sql_checked(&Type::INT4, &mut buf).is_ok());
        assert_eq!(&buf[..], &[0, 0, 0, 18]);
        assert!(Value::Null.to_sql_checked(&Type::TEXT, &mut buf).is_ok());
    }
}
