//! Filesystem-backed JSON persistence for account books.
//!
//! Books are stored one file per book under a root directory, written
//! through a temp file and renamed into place so a failed write never
//! clobbers the previous state.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use slipbook_core::{BookStorage, CoreError};
use slipbook_domain::Book;

const BOOK_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// JSON file store satisfying the engine's whole-state load/save contract.
#[derive(Debug, Clone)]
pub struct JsonBookStorage {
    books_dir: PathBuf,
}

impl JsonBookStorage {
    pub fn new(books_dir: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&books_dir)?;
        Ok(Self { books_dir })
    }

    pub fn books_dir(&self) -> &Path {
        &self.books_dir
    }

    pub fn book_path(&self, name: &str) -> PathBuf {
        self.books_dir
            .join(format!("{}.{}", file_slug(name), BOOK_EXTENSION))
    }
}

impl BookStorage for JsonBookStorage {
    fn save_book(&self, name: &str, book: &Book) -> Result<(), CoreError> {
        save_book_to_path(book, &self.book_path(name))
    }

    fn load_book(&self, name: &str) -> Result<Book, CoreError> {
        let path = self.book_path(name);
        if !path.exists() {
            return Err(CoreError::Storage(format!("book `{name}` not found")));
        }
        load_book_from_path(&path)
    }

    fn list_books(&self) -> Result<Vec<String>, CoreError> {
        if !self.books_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.books_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_book(&self, name: &str) -> Result<(), CoreError> {
        let path = self.book_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn save_book_to_path(&self, book: &Book, path: &Path) -> Result<(), CoreError> {
        save_book_to_path(book, path)
    }

    fn load_book_from_path(&self, path: &Path) -> Result<Book, CoreError> {
        load_book_from_path(path)
    }
}

/// Saves a book to an arbitrary path, atomically.
pub fn save_book_to_path(book: &Book, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(book).map_err(|err| CoreError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    write_file(&tmp, &data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a book from the provided filesystem path.
pub fn load_book_from_path(path: &Path) -> Result<Book, CoreError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
}

fn file_slug(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "book".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), CoreError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_slug_flattens_to_safe_characters() {
        assert_eq!(file_slug("Household 2024"), "household_2024");
        assert_eq!(file_slug("  ?!  "), "book");
    }

    #[test]
    fn tmp_path_stacks_the_suffix_on_the_extension() {
        let tmp = tmp_path(Path::new("/tmp/books/demo.json"));
        assert_eq!(tmp, Path::new("/tmp/books/demo.json.tmp"));
    }
}
