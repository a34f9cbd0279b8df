use serde::{Deserialize, Serialize};
use std::fmt;

/// `books` コレクションのドキュメントID（ストアが採番する文字列キー）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BookId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `borrowed` コレクションのドキュメントID。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BorrowRecordId(String);

impl BorrowRecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 短縮ID（先頭8文字）
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl From<String> for BorrowRecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for BorrowRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_truncates_long_ids() {
        let id = BorrowRecordId::new("0123456789abcdef");
        assert_eq!(id.short(), "01234567");
    }

    #[test]
    fn short_keeps_short_ids() {
        let id = BorrowRecordId::new("abc");
        assert_eq!(id.short(), "abc");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&BookId::new("b-1")).unwrap();
        assert_eq!(json, r#""b-1""#);
    }
}
