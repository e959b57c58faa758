use crate::error::AppError;
use crate::models::Book;

/// The in-memory book collection.
///
/// Explicitly owned and injected into handlers; never ambient state. Ids come
/// from a monotonic counter seeded at `max(seed ids) + 1`, so an id freed by
/// a delete is never handed out again.
#[derive(Debug)]
pub struct Library {
    books: Vec<Book>,
    next_id: u64,
}

impl Library {
    /// Create an empty library. The first assigned id is 1.
    pub fn new() -> Self {
        Self {
            books: Vec::new(),
            next_id: 1,
        }
    }

    /// The demo collection the original teaching API ships with.
    pub fn seeded() -> Self {
        let seed = [
            ("Vo chong A Phu", "To Hoai"),
            ("Chiec thuyen ngoai xa", "Nguyen Minh Chau"),
            ("Vo nhat", "Kim Lan"),
            ("Chi Pheo", "Nam Cao"),
            ("Viet Bac", "To Huu"),
            ("Nguoi lai do song Da", "Nguyen Tuan"),
        ];

        let mut library = Self::new();
        for (title, author) in seed {
            library.create(title, author);
        }
        library
    }

    /// All books, in insertion order.
    pub fn list(&self) -> &[Book] {
        &self.books
    }

    /// Case-insensitive substring search over title and author, then
    /// offset+limit pagination.
    ///
    /// `limit` silently caps the result size; a `skip` past the end yields
    /// an empty vec, never an error.
    pub fn search(&self, q: Option<&str>, skip: usize, limit: usize) -> Vec<Book> {
        let needle = q.map(str::to_lowercase);

        self.books
            .iter()
            .filter(|book| match &needle {
                Some(n) => {
                    book.title.to_lowercase().contains(n)
                        || book.author.to_lowercase().contains(n)
                }
                None => true,
            })
            .skip(skip)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Look up a book by id.
    pub fn get(&self, id: u64) -> Result<&Book, AppError> {
        self.books
            .iter()
            .find(|book| book.id == id)
            .ok_or(AppError::NotFound(id))
    }

    /// Insert a new book, assigning the next id, and return it.
    pub fn create(&mut self, title: &str, author: &str) -> Book {
        let book = Book {
            id: self.next_id,
            title: title.to_string(),
            author: author.to_string(),
        };
        self.next_id += 1;
        self.books.push(book.clone());
        book
    }

    /// Full replace of title/author at the matching id. The id itself is
    /// immutable.
    pub fn update(&mut self, id: u64, title: &str, author: &str) -> Result<Book, AppError> {
        let book = self
            .books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(AppError::NotFound(id))?;

        book.title = title.to_string();
        book.author = author.to_string();
        Ok(book.clone())
    }

    /// Remove the first book matching id.
    pub fn delete(&mut self, id: u64) -> Result<(), AppError> {
        let index = self
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or(AppError::NotFound(id))?;

        self.books.remove(index);
        Ok(())
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}
