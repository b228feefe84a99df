//! Persistence abstraction for whole-book load/save.

use std::path::Path;

use slipbook_domain::Book;

use crate::error::CoreError;

/// Abstraction over persistence backends capable of storing account books.
///
/// Backends store the complete serialized book under a caller-chosen name;
/// the engine persists through this trait after every committed mutation.
pub trait BookStorage: Send + Sync {
    fn save_book(&self, name: &str, book: &Book) -> Result<(), CoreError>;
    fn load_book(&self, name: &str) -> Result<Book, CoreError>;
    fn list_books(&self) -> Result<Vec<String>, CoreError>;
    fn delete_book(&self, name: &str) -> Result<(), CoreError>;
    fn save_book_to_path(&self, book: &Book, path: &Path) -> Result<(), CoreError>;
    fn load_book_from_path(&self, path: &Path) -> Result<Book, CoreError>;
}
