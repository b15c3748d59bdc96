/// Value Module
///
/// Driver-neutral values used both as bind parameters and as row contents,
/// plus the row and result containers returned by queries.

use std::fmt;

use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single SQL scalar value.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(i) => Some(*i),
            SqlValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::Real(r) => write!(f, "{}", r),
            SqlValue::Text(s) => f.write_str(s),
            SqlValue::Blob(b) => write!(f, "<BLOB: {} bytes>", b.len()),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Integer(value.into())
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        SqlValue::Integer(value.into())
    }
}

/// Identifiers handed back by `last_insert_id` bind straight back in.
/// Values above `i64::MAX` are carried as text.
impl From<u64> for SqlValue {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(SqlValue::Integer)
            .unwrap_or_else(|_| SqlValue::Text(value.to_string()))
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Integer(value as i64)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Blob(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self {
            SqlValue::Null => ValueRef::Null,
            SqlValue::Integer(i) => ValueRef::Integer(*i),
            SqlValue::Real(r) => ValueRef::Real(*r),
            SqlValue::Text(s) => ValueRef::Text(s.as_bytes()),
            SqlValue::Blob(b) => ValueRef::Blob(b),
        };
        Ok(ToSqlOutput::Borrowed(value))
    }
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(r) => SqlValue::Real(r),
            ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
        }
    }
}

impl From<&SqlValue> for mysql::Value {
    fn from(value: &SqlValue) -> Self {
        match value {
            SqlValue::Null => mysql::Value::NULL,
            SqlValue::Integer(i) => mysql::Value::Int(*i),
            SqlValue::Real(r) => mysql::Value::Double(*r),
            SqlValue::Text(s) => mysql::Value::Bytes(s.as_bytes().to_vec()),
            SqlValue::Blob(b) => mysql::Value::Bytes(b.clone()),
        }
    }
}

impl From<mysql::Value> for SqlValue {
    fn from(value: mysql::Value) -> Self {
        match value {
            mysql::Value::NULL => SqlValue::Null,
            mysql::Value::Int(i) => SqlValue::Integer(i),
            mysql::Value::UInt(u) => SqlValue::from(u),
            mysql::Value::Float(f) => SqlValue::Real(f.into()),
            mysql::Value::Double(d) => SqlValue::Real(d),
            mysql::Value::Bytes(bytes) => match String::from_utf8(bytes) {
                Ok(text) => SqlValue::Text(text),
                Err(err) => SqlValue::Blob(err.into_bytes()),
            },
            mysql::Value::Date(year, month, day, hour, minute, second, micros) => {
                let mut text = format!(
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    year, month, day, hour, minute, second
                );
                if micros > 0 {
                    text.push_str(&format!(".{:06}", micros));
                }
                SqlValue::Text(text)
            }
            mysql::Value::Time(negative, days, hours, minutes, seconds, micros) => {
                let total_hours = days * 24 + u32::from(hours);
                let mut text = format!(
                    "{}{:02}:{:02}:{:02}",
                    if negative { "-" } else { "" },
                    total_hours,
                    minutes,
                    seconds
                );
                if micros > 0 {
                    text.push_str(&format!(".{:06}", micros));
                }
                SqlValue::Text(text)
            }
        }
    }
}

/// Builds a parameter slice from heterogeneous values.
///
/// ```
/// use tasku_db::{sql_params, SqlValue};
/// let params: &[SqlValue] = sql_params!["alice", 42, None::<i64>];
/// assert_eq!(params.len(), 3);
/// ```
#[macro_export]
macro_rules! sql_params {
    () => {
        &[] as &[$crate::SqlValue]
    };
    ($($value:expr),+ $(,)?) => {
        &[$($crate::SqlValue::from($value)),+] as &[$crate::SqlValue]
    };
}

/// One result row: column names mapped to values, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    entries: Vec<(String, SqlValue)>,
}

impl Row {
    pub fn new(columns: &[String], values: Vec<SqlValue>) -> Self {
        Row {
            entries: columns.iter().cloned().zip(values).collect(),
        }
    }

    /// Looks up a value by column name.
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Rows returned by a read statement. An empty result means no rows matched;
/// failures are reported through `DbError`, never through this type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        QueryResult { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl IntoIterator for QueryResult {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Outcome of a committed write statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    pub affected_rows: u64,
    /// Identifier generated by the statement, if it inserted into a table
    /// with an auto-generated key
    pub last_insert_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(SqlValue::from(7i32), SqlValue::Integer(7));
        assert_eq!(SqlValue::from(true), SqlValue::Integer(1));
        assert_eq!(SqlValue::from("alice"), SqlValue::Text("alice".to_string()));
        assert_eq!(SqlValue::from(None::<String>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some(2.5)), SqlValue::Real(2.5));
        assert_eq!(SqlValue::from(u64::MAX), SqlValue::Text(u64::MAX.to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(SqlValue::Null.to_string(), "NULL");
        assert_eq!(SqlValue::Integer(-3).to_string(), "-3");
        assert_eq!(SqlValue::Blob(b"Hello".to_vec()).to_string(), "<BLOB: 5 bytes>");
    }

    #[test]
    fn test_mysql_value_mapping() {
        assert_eq!(
            SqlValue::from(mysql::Value::Bytes(b"tareas".to_vec())),
            SqlValue::Text("tareas".to_string())
        );
        assert_eq!(
            SqlValue::from(mysql::Value::Bytes(vec![0xff, 0xfe])),
            SqlValue::Blob(vec![0xff, 0xfe])
        );
        assert_eq!(SqlValue::from(mysql::Value::UInt(12)), SqlValue::Integer(12));
        assert_eq!(
            SqlValue::from(mysql::Value::Date(2024, 3, 9, 14, 5, 0, 0)),
            SqlValue::Text("2024-03-09 14:05:00".to_string())
        );
        assert_eq!(
            SqlValue::from(mysql::Value::Time(true, 1, 2, 3, 4, 500)),
            SqlValue::Text("-26:03:04.000500".to_string())
        );
        assert_eq!(
            mysql::Value::from(&SqlValue::Text("x".to_string())),
            mysql::Value::Bytes(b"x".to_vec())
        );
    }

    #[test]
    fn test_row_lookup_preserves_order() {
        let columns = vec!["id".to_string(), "name".to_string()];
        let row = Row::new(&columns, vec![SqlValue::Integer(1), SqlValue::from("alice")]);

        assert_eq!(row.get("name"), Some(&SqlValue::from("alice")));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_row_serializes_as_object() {
        let columns = vec!["id".to_string(), "name".to_string(), "note".to_string()];
        let row = Row::new(
            &columns,
            vec![SqlValue::Integer(1), SqlValue::from("alice"), SqlValue::Null],
        );

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"alice","note":null}"#);
    }

    #[test]
    fn test_sql_params_macro() {
        let params = sql_params!["alice", 3, None::<i64>];
        assert_eq!(
            params,
            &[SqlValue::from("alice"), SqlValue::Integer(3), SqlValue::Null]
        );
        assert!(sql_params![].is_empty());
    }
}
