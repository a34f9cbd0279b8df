//! MCPツールの出力テキスト整形。

use crate::application::detail::{BookDetail, BorrowedList};
use crate::domain::model::book::Book;
use crate::domain::model::borrow::{BorrowedSet, MAX_BORROWED};

/// 番号付きのカタログ一覧。番号は `book_detail` 等で書籍指定に使える。
pub fn render_catalog(books: &[Book], borrowed: &BorrowedSet) -> String {
    if books.is_empty() {
        return "Catalog is empty.".to_string();
    }

    let mut output = format!("# Books ({})\n\n", books.len());
    for (i, book) in books.iter().enumerate() {
        let marker = if borrowed.contains_book(book.id()) {
            " [borrowed]"
        } else {
            ""
        };
        output.push_str(&format!(
            "{}. {} — {}{}\n",
            i + 1,
            book.title(),
            book.author(),
            marker
        ));
    }
    output
}

pub fn render_detail(detail: &BookDetail) -> String {
    let book = &detail.book;
    let mut output = format!("# {}\n\n", book.title());
    output.push_str(&format!("Author: {}\n", book.author()));
    output.push_str(&format!("Rating: {}\n", book.rating()));
    if !book.cover_url().is_empty() {
        output.push_str(&format!("Cover: {}\n", book.cover_url()));
    }
    match &detail.borrow_record {
        Some(record_id) => {
            output.push_str(&format!("Status: borrowed (record {})\n", record_id.short()))
        }
        None => output.push_str("Status: available\n"),
    }
    output.push_str(&format!(
        "Borrowed: {}/{}\n",
        detail.borrowed_count, MAX_BORROWED
    ));
    if !book.summary().is_empty() {
        output.push_str(&format!("\n{}\n", book.summary()));
    }
    output
}

pub fn render_borrowed(list: &BorrowedList) -> String {
    if list.held == 0 {
        return format!("No books borrowed (0/{MAX_BORROWED}). Use `borrow` to borrow one.");
    }

    // ヘッダは台帳の冊数（カタログから消えた書籍の分も上限に数える）
    let mut output = format!("# Borrowed ({}/{})\n\n", list.held, MAX_BORROWED);
    for (i, entry) in list.books.iter().enumerate() {
        output.push_str(&format!(
            "{}. {} — {} (id: {})\n",
            i + 1,
            entry.book.title(),
            entry.book.author(),
            entry.book.id()
        ));
    }
    let missing = list.held.saturating_sub(list.books.len());
    if missing > 0 {
        output.push_str(&format!(
            "\n({missing} record(s) point at books no longer in the catalog)\n"
        ));
    }
    output
}
