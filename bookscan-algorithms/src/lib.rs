pub mod book_scanning;
