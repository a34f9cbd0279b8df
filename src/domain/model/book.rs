use serde::{Deserialize, Serialize};

use super::id::BookId;
use crate::domain::store::Document;

/// `books` ドキュメントのフィールド構造。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookFields {
    title: String,
    author: String,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    cover_url: String,
}

/// カタログ上の書籍。外部で管理され、このアプリからは読み取りのみ。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
    rating: f64,
    summary: String,
    cover_url: String,
}

impl Book {
    /// ストアのドキュメントから復元する。`title` と `author` は必須。
    pub fn from_document(doc: Document) -> Result<Self, serde_json::Error> {
        let fields: BookFields = serde_json::from_value(serde_json::Value::Object(doc.fields))?;
        Ok(Self {
            id: BookId::from(doc.id),
            title: fields.title,
            author: fields.author,
            rating: fields.rating,
            summary: fields.summary,
            cover_url: fields.cover_url,
        })
    }

    pub fn id(&self) -> &BookId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn cover_url(&self) -> &str {
        &self.cover_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, value: serde_json::Value) -> Document {
        match value {
            serde_json::Value::Object(fields) => Document::new(id, fields),
            _ => panic!("fields must be an object"),
        }
    }

    #[test]
    fn decodes_all_fields() {
        let book = Book::from_document(doc(
            "dune",
            json!({
                "title": "Dune",
                "author": "Frank Herbert",
                "rating": 4.5,
                "summary": "Spice.",
                "coverUrl": "https://example.com/dune.jpg"
            }),
        ))
        .unwrap();

        assert_eq!(book.id().as_str(), "dune");
        assert_eq!(book.title(), "Dune");
        assert_eq!(book.author(), "Frank Herbert");
        assert_eq!(book.rating(), 4.5);
        assert_eq!(book.summary(), "Spice.");
        assert_eq!(book.cover_url(), "https://example.com/dune.jpg");
    }

    #[test]
    fn optional_fields_default() {
        let book = Book::from_document(doc(
            "x",
            json!({ "title": "Untitled", "author": "Anon" }),
        ))
        .unwrap();
        assert_eq!(book.rating(), 0.0);
        assert!(book.summary().is_empty());
        assert!(book.cover_url().is_empty());
    }

    #[test]
    fn missing_title_is_rejected() {
        let result = Book::from_document(doc("x", json!({ "author": "Anon" })));
        assert!(result.is_err());
    }

    #[test]
    fn integer_rating_is_accepted() {
        let book = Book::from_document(doc(
            "x",
            json!({ "title": "T", "author": "A", "rating": 4 }),
        ))
        .unwrap();
        assert_eq!(book.rating(), 4.0);
    }
}
