use std::fs;

use chrono::NaiveDate;
use slipbook_core::{BookManager, BookStorage, PairingPolicy, TransactionDraft};
use slipbook_domain::{Book, Entry};
use slipbook_storage_json::JsonBookStorage;
use tempfile::tempdir;

fn storage_in(dir: &std::path::Path) -> JsonBookStorage {
    JsonBookStorage::new(dir.join("books")).expect("create storage")
}

#[test]
fn books_round_trip_through_disk() {
    let dir = tempdir().expect("tempdir");
    let storage = storage_in(dir.path());

    let book = Book::new("StorageTest");
    storage.save_book("test-book", &book).expect("save book");

    let loaded = storage.load_book("test-book").expect("load book");
    assert_eq!(loaded.name, "StorageTest");
    assert_eq!(loaded.id, book.id);

    let path = storage.book_path("test-book");
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path.exists());
}

#[test]
fn listing_returns_sorted_slugs_and_delete_removes_them() {
    let dir = tempdir().expect("tempdir");
    let storage = storage_in(dir.path());

    storage.save_book("Zeta Book", &Book::new("Zeta")).unwrap();
    storage.save_book("Alpha Book", &Book::new("Alpha")).unwrap();

    assert_eq!(
        storage.list_books().unwrap(),
        vec!["alpha_book".to_string(), "zeta_book".to_string()]
    );

    storage.delete_book("Zeta Book").unwrap();
    assert_eq!(storage.list_books().unwrap(), vec!["alpha_book".to_string()]);
}

#[test]
fn loading_a_missing_book_is_a_named_error() {
    let dir = tempdir().expect("tempdir");
    let storage = storage_in(dir.path());

    let err = storage.load_book("ghost").expect_err("must fail");
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn an_interrupted_write_preserves_the_previous_file() {
    let dir = tempdir().expect("tempdir");
    let storage = storage_in(dir.path());

    let mut book = Book::new("Reliable");
    storage.save_book("reliable", &book).expect("initial save");
    let path = storage.book_path("reliable");
    let original = fs::read_to_string(&path).expect("read original");

    // A directory squatting on the temp path forces the write to fail.
    let mut blocked = path.clone();
    blocked.set_extension("json.tmp");
    fs::create_dir_all(&blocked).unwrap();

    book.name = "Changed".into();
    let result = storage.save_book("reliable", &book);
    assert!(result.is_err(), "save must fail while the temp path is taken");

    let after = fs::read_to_string(&path).expect("read after failure");
    assert_eq!(after, original, "failed write must not corrupt the book file");
}

#[test]
fn a_manager_backed_by_disk_survives_a_reopen() {
    let dir = tempdir().expect("tempdir");
    let date = NaiveDate::from_ymd_opt(2024, 7, 23).unwrap();

    let (cash_id, rent_id) = {
        let storage = storage_in(dir.path());
        let mut manager =
            BookManager::create("household", Box::new(storage), PairingPolicy::default()).unwrap();
        let cash = manager.create_account("Cash").unwrap();
        let rent = manager.create_account("Rent").unwrap();
        manager
            .add_transaction(
                cash.id,
                rent.id,
                TransactionDraft::new(date, "Rent Payment", "S005", Entry::Debit(800.0)),
            )
            .unwrap();
        (cash.id, rent.id)
    };

    let storage = storage_in(dir.path());
    let manager =
        BookManager::open("household", Box::new(storage), PairingPolicy::default()).unwrap();
    assert_eq!(manager.account(cash_id).unwrap().balance, -800.0);
    assert_eq!(manager.account(rent_id).unwrap().balance, 800.0);
    let statement = manager.statement(cash_id).unwrap();
    assert_eq!(statement.lines.len(), 1);
    assert_eq!(statement.lines[0].slip_number, "S005");
    assert!(manager.integrity_warnings().is_empty());
}
