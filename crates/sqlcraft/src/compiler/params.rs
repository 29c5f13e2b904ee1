//! Parameter accumulation and placeholder scanning.

use crate::value::Value;

/// Values bound during one compilation, in placeholder order.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    values: Vec<Value>,
}

impl ParamList {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Add a value and return its 1-based index.
    pub fn push(&mut self, value: Value) -> usize {
        self.values.push(value);
        self.values.len()
    }

    /// Add a value and return its placeholder.
    pub(crate) fn bind(&mut self, value: Value) -> &'static str {
        self.push(value);
        "?"
    }

    pub fn extend<'a>(&mut self, values: impl IntoIterator<Item = &'a Value>) {
        self.values.extend(values.into_iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// Byte offsets of `?` placeholders outside quoted literals and identifiers.
///
/// `'`, `"` and backticks always quote; `identifier` adds a dialect's own
/// open/close pair (`[` .. `]` for SQL Server). A doubled closing character
/// inside a quote is an escaped one.
fn placeholder_offsets(sql: &str, identifier: (char, char)) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut close: Option<char> = None;
    let mut chars = sql.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match close {
            Some(q) if c == q => {
                if chars.peek().is_some_and(|&(_, next)| next == q) {
                    chars.next();
                } else {
                    close = None;
                }
            }
            Some(_) => {}
            None => match c {
                '\'' | '"' | '`' => close = Some(c),
                '?' => offsets.push(i),
                _ if c == identifier.0 => close = Some(identifier.1),
                _ => {}
            },
        }
    }
    offsets
}

/// Count `?` placeholders outside `'`, `"` and backtick quotes.
pub fn count_placeholders(sql: &str) -> usize {
    placeholder_offsets(sql, ('"', '"')).len()
}

/// Count `?` placeholders, also skipping identifiers quoted with `quote`.
pub fn count_placeholders_quoted(sql: &str, quote: (char, char)) -> usize {
    placeholder_offsets(sql, quote).len()
}

/// Rewrite `?` placeholders outside quotes to `$1, $2, ...`.
///
/// Brackets are not quotes here: the `$n` style is PostgreSQL's, where
/// `arr[?]` subscripts an array.
pub fn number_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut last = 0;
    for (n, offset) in placeholder_offsets(sql, ('"', '"')).into_iter().enumerate() {
        out.push_str(&sql[last..offset]);
        out.push_str(&format!("${}", n + 1));
        last = offset + 1;
    }
    out.push_str(&sql[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_returns_one_based_index() {
        let mut params = ParamList::new();
        assert_eq!(params.push(Value::Int(1)), 1);
        assert_eq!(params.push(Value::Null), 2);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn quoted_question_marks_are_ignored() {
        assert_eq!(count_placeholders("a = ? AND b = '?' AND \"c?\" = ?"), 2);
        assert_eq!(count_placeholders("x = 'it''s ?' OR y = ?"), 1);
        assert_eq!(count_placeholders("`w?` = ?"), 1);
        assert_eq!(count_placeholders("\"a\"\"?\" = ?"), 1);
    }

    #[test]
    fn bracket_identifiers_are_quotes_when_asked() {
        assert_eq!(count_placeholders_quoted("[what?] = ?", ('[', ']')), 1);
        assert_eq!(count_placeholders_quoted("[a]]?] = ? AND [b] = ?", ('[', ']')), 2);
        assert_eq!(count_placeholders("arr[?] = ?"), 2);
    }

    #[test]
    fn numbering() {
        assert_eq!(
            number_placeholders("SELECT * FROM \"t\" WHERE \"a\" = ? AND \"b\" = '?' AND \"c\" > ?"),
            "SELECT * FROM \"t\" WHERE \"a\" = $1 AND \"b\" = '?' AND \"c\" > $2"
        );
    }
}
