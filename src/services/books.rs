//! Book catalog service: CRUD, listing, advanced search and suggestions

use super::ensure_positive_id;
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookListQuery, BookSearchQuery, SuggestionQuery},
        Book, BookRequest,
    },
    repository::Repository,
    search::{
        BookOrder, BookQuery, SearchType, SortColumn, SortField, SortOrder, Window,
    },
};

pub const DEFAULT_SEARCH_LIMIT: i64 = 20;
pub const MAX_SEARCH_LIMIT: i64 = 100;
pub const DEFAULT_SUGGESTION_LIMIT: i64 = 10;
pub const MAX_SUGGESTION_LIMIT: i64 = 20;

/// Trimmed value, `None` when absent or blank
fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a numeric parameter, falling back to `default` when it is
/// unparsable or outside `min..=max`
fn bounded(raw: &Option<String>, min: i64, max: i64, default: i64) -> i64 {
    raw.as_deref()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| (min..=max).contains(v))
        .unwrap_or(default)
}

/// Compose the advanced search parameters into a query.
///
/// Unknown search types, sort fields and sort orders are rejected; limit
/// and offset are clamped to their defaults instead.
pub fn build_search_query(params: &BookSearchQuery) -> AppResult<BookQuery> {
    let search_type = match non_blank(&params.search_type) {
        Some(tag) => tag.parse::<SearchType>()?,
        None => SearchType::default(),
    };
    let sort_by = match non_blank(&params.sort_by) {
        Some(field) => field.parse::<SortField>()?,
        None => SortField::default(),
    };
    let sort_order = match non_blank(&params.sort_order) {
        Some(order) => order.parse::<SortOrder>()?,
        None => SortOrder::default(),
    };

    let limit = bounded(&params.limit, 1, MAX_SEARCH_LIMIT, DEFAULT_SEARCH_LIMIT);
    let offset = bounded(&params.offset, 0, i64::MAX, 0);

    let term = non_blank(&params.query);

    let by_column = |column| BookOrder::Column {
        column,
        direction: sort_order,
    };
    let order = match (sort_by, &term) {
        (SortField::Relevance, Some(term)) => BookOrder::Relevance { term: term.clone() },
        (SortField::Relevance, None) => BookOrder::Column {
            column: SortColumn::Title,
            direction: SortOrder::Asc,
        },
        (SortField::Title, _) => by_column(SortColumn::Title),
        (SortField::Author, _) => by_column(SortColumn::Author),
        (SortField::Category, _) => by_column(SortColumn::Category),
        (SortField::CreatedAt, _) => by_column(SortColumn::CreatedAt),
    };

    Ok(BookQuery {
        predicate: term.as_deref().map(|t| search_type.predicate(t)),
        category: non_blank(&params.category),
        author: non_blank(&params.author),
        order,
        window: Some(Window { limit, offset }),
    })
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List active books. A search term matches title, author or category
    /// and orders the result by relevance; otherwise books come in id order.
    pub async fn list_books(&self, params: &BookListQuery) -> AppResult<Vec<Book>> {
        let term = non_blank(&params.search);
        let query = BookQuery {
            predicate: term.as_deref().map(|t| SearchType::Contains.predicate(t)),
            category: non_blank(&params.category),
            order: term
                .map(|term| BookOrder::Relevance { term })
                .unwrap_or_default(),
            ..Default::default()
        };
        self.repository.books.query(&query).await
    }

    /// Advanced search with search type, filters, sorting and pagination
    pub async fn advanced_search(&self, params: &BookSearchQuery) -> AppResult<Vec<Book>> {
        let query = build_search_query(params)?;
        tracing::debug!("Advanced search: {:?}", query);
        self.repository.books.query(&query).await
    }

    /// Autocomplete from titles and authors. A blank query yields nothing.
    pub async fn suggestions(&self, params: &SuggestionQuery) -> AppResult<Vec<String>> {
        let Some(term) = non_blank(&params.query) else {
            return Ok(Vec::new());
        };
        let limit = bounded(&params.limit, 1, MAX_SUGGESTION_LIMIT, DEFAULT_SUGGESTION_LIMIT);
        self.repository.books.suggestions(&term, limit).await
    }

    /// Get an active book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        ensure_positive_id(id)?;
        self.repository
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Create a book after validation and title uniqueness check
    pub async fn create_book(&self, data: BookRequest) -> AppResult<Book> {
        let data = data.validated()?;

        if self.repository.books.find_by_title(&data.title).await?.is_some() {
            return Err(AppError::DuplicateTitle(data.title));
        }

        let book = self.repository.books.create(&data).await?;
        tracing::info!("Book created: id={} title={:?}", book.id, book.title);
        Ok(book)
    }

    /// Replace the text fields of an active book
    pub async fn update_book(&self, id: i32, data: BookRequest) -> AppResult<Book> {
        ensure_positive_id(id)?;
        let data = data.validated()?;

        let not_found = || AppError::NotFound(format!("Book {} not found", id));

        if self.repository.books.find_by_id(id).await?.is_none() {
            return Err(not_found());
        }

        if let Some(existing) = self.repository.books.find_by_title(&data.title).await? {
            if existing.id != id {
                return Err(AppError::DuplicateTitle(data.title));
            }
        }

        let book = self
            .repository
            .books
            .update(id, &data)
            .await?
            .ok_or_else(not_found)?;
        tracing::info!("Book updated: id={}", id);
        Ok(book)
    }

    /// Soft delete: the book disappears from every query
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        ensure_positive_id(id)?;
        if !self.repository.books.soft_delete(id).await? {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        tracing::info!("Book deleted: id={}", id);
        Ok(())
    }

    /// Remove the row for good, deleted or not. Its favorites go with it.
    pub async fn purge_book(&self, id: i32) -> AppResult<()> {
        ensure_positive_id(id)?;
        if !self.repository.books.hard_delete(id).await? {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        tracing::info!("Book permanently deleted: id={}", id);
        Ok(())
    }

    /// Number of active books
    pub async fn count_books(&self) -> AppResult<i64> {
        self.repository.books.count().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repository::{memory::MemoryStore, MockBookStore, MockFavoriteStore};

    fn search(pairs: &[(&str, &str)]) -> BookSearchQuery {
        let mut params = BookSearchQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "query" => params.query = value,
                "category" => params.category = value,
                "author" => params.author = value,
                "search_type" => params.search_type = value,
                "sort_by" => params.sort_by = value,
                "sort_order" => params.sort_order = value,
                "limit" => params.limit = value,
                "offset" => params.offset = value,
                other => panic!("unknown parameter {}", other),
            }
        }
        params
    }

    async fn seeded() -> (Arc<MemoryStore>, BooksService) {
        let store = MemoryStore::new();
        let service = BooksService::new(store.repository());
        for (title, author, category) in [
            ("Dune", "Frank Herbert", "Science Fiction"),
            ("Dune Messiah", "Frank Herbert", "Science Fiction"),
            ("Harry Potter and the Philosopher's Stone", "J.K. Rowling", "Fantasy"),
            ("Harry", "Anonymous", "Fiction"),
            ("The Biography", "Harry Smith", "Biography"),
            ("1984", "George Orwell", "Dystopian"),
            ("Animal Farm", "George Orwell", "Satire"),
        ] {
            service
                .create_book(BookRequest::new(title, author, category))
                .await
                .unwrap();
        }
        (store, service)
    }

    fn titles(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.title.as_str()).collect()
    }

    #[test]
    fn test_limit_and_offset_fall_back_to_defaults() {
        for raw in ["0", "101", "-5", "abc"] {
            let query = build_search_query(&search(&[("limit", raw)])).unwrap();
            assert_eq!(query.window.unwrap().limit, DEFAULT_SEARCH_LIMIT, "limit={}", raw);
        }
        let query = build_search_query(&search(&[("limit", "100"), ("offset", "-1")])).unwrap();
        assert_eq!(query.window, Some(Window { limit: 100, offset: 0 }));
    }

    #[test]
    fn test_invalid_tags_rejected() {
        assert!(matches!(
            build_search_query(&search(&[("search_type", "regex")])),
            Err(AppError::InvalidSearchType(_))
        ));
        assert!(matches!(
            build_search_query(&search(&[("sort_by", "isbn")])),
            Err(AppError::InvalidSortField(_))
        ));
        assert!(matches!(
            build_search_query(&search(&[("sort_order", "sideways")])),
            Err(AppError::InvalidSortOrder(_))
        ));
    }

    #[test]
    fn test_lowercase_sort_order_rejected() {
        assert!(matches!(
            build_search_query(&search(&[("sort_order", "asc")])),
            Err(AppError::InvalidSortOrder(_))
        ));
        assert!(matches!(
            build_search_query(&search(&[("sort_by", "title"), ("sort_order", "desc")])),
            Err(AppError::InvalidSortOrder(_))
        ));
    }

    #[test]
    fn test_relevance_without_query_sorts_by_title() {
        let query = build_search_query(&search(&[("sort_order", "DESC")])).unwrap();
        assert_eq!(
            query.order,
            BookOrder::Column {
                column: SortColumn::Title,
                direction: SortOrder::Asc
            }
        );
        assert!(query.predicate.is_none());
    }

    #[tokio::test]
    async fn test_create_then_get_returns_trimmed_fields() {
        let store = MemoryStore::new();
        let service = BooksService::new(store.repository());

        let created = service
            .create_book(BookRequest::new("  Dune  ", " Frank Herbert", "Science Fiction "))
            .await
            .unwrap();
        let fetched = service.get_book(created.id).await.unwrap();

        assert_eq!(fetched.title, "Dune");
        assert_eq!(fetched.author, "Frank Herbert");
        assert_eq!(fetched.category, "Science Fiction");
        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn test_duplicate_title_is_normalized() {
        let (_, service) = seeded().await;
        let err = service
            .create_book(BookRequest::new("  dune ", "Someone Else", "Other"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateTitle(_)));
    }

    #[tokio::test]
    async fn test_update() {
        let (_, service) = seeded().await;

        let updated = service
            .update_book(1, BookRequest::new("DUNE", "F. Herbert", "SF"))
            .await
            .unwrap();
        assert_eq!(updated.title, "DUNE");

        let err = service
            .update_book(1, BookRequest::new("Dune Messiah", "F. Herbert", "SF"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateTitle(_)));

        let err = service
            .update_book(999, BookRequest::new("New", "A", "B"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service
            .update_book(1, BookRequest::new("", "A", "B"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_book() {
        let (store, service) = seeded().await;

        service.delete_book(1).await.unwrap();

        assert!(matches!(service.get_book(1).await, Err(AppError::NotFound(_))));
        let listed = service.list_books(&BookListQuery::default()).await.unwrap();
        assert!(listed.iter().all(|b| b.id != 1));
        assert!(matches!(service.delete_book(1).await, Err(AppError::NotFound(_))));
        assert_eq!(service.count_books().await.unwrap(), 6);
        assert_eq!(store.book_rows(), 7);

        // the title is free again once the holder is deleted
        service
            .create_book(BookRequest::new("Dune", "Frank Herbert", "Science Fiction"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_purge_removes_row() {
        let (store, service) = seeded().await;
        service.delete_book(2).await.unwrap();
        service.purge_book(2).await.unwrap();
        assert_eq!(store.book_rows(), 6);
        assert!(matches!(service.purge_book(2).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_non_positive_ids_rejected() {
        let (_, service) = seeded().await;
        assert!(matches!(service.get_book(0).await, Err(AppError::BadRequest(_))));
        assert!(matches!(service.delete_book(-3).await, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_list_books_search_and_category() {
        let (_, service) = seeded().await;

        let params = BookListQuery {
            search: Some("orwell".into()),
            category: None,
        };
        let found = service.list_books(&params).await.unwrap();
        assert_eq!(titles(&found), vec!["1984", "Animal Farm"]);

        let params = BookListQuery {
            search: None,
            category: Some("Satire".into()),
        };
        let found = service.list_books(&params).await.unwrap();
        assert_eq!(titles(&found), vec!["Animal Farm"]);
    }

    #[tokio::test]
    async fn test_advanced_search_exact() {
        let (_, service) = seeded().await;
        let found = service
            .advanced_search(&search(&[("query", "Dune"), ("search_type", "exact")]))
            .await
            .unwrap();
        assert_eq!(titles(&found), vec!["Dune"]);
    }

    #[tokio::test]
    async fn test_advanced_search_relevance() {
        let (_, service) = seeded().await;
        let found = service
            .advanced_search(&search(&[("query", "Harry"), ("sort_by", "relevance")]))
            .await
            .unwrap();
        assert_eq!(
            titles(&found),
            vec!["Harry", "Harry Potter and the Philosopher's Stone", "The Biography"]
        );
    }

    #[tokio::test]
    async fn test_advanced_search_fuzzy_and_paging() {
        let (_, service) = seeded().await;

        let found = service
            .advanced_search(&search(&[("query", "har pot"), ("search_type", "fuzzy")]))
            .await
            .unwrap();
        assert!(titles(&found).contains(&"Harry Potter and the Philosopher's Stone"));

        let found = service
            .advanced_search(&search(&[
                ("author", "orwell"),
                ("sort_by", "title"),
                ("sort_order", "DESC"),
                ("limit", "1"),
                ("offset", "1"),
            ]))
            .await
            .unwrap();
        assert_eq!(titles(&found), vec!["1984"]);
    }

    #[tokio::test]
    async fn test_suggestions() {
        let (_, service) = seeded().await;

        let params = SuggestionQuery {
            query: Some("harry".into()),
            limit: None,
        };
        let found = service.suggestions(&params).await.unwrap();
        assert_eq!(
            found,
            vec!["Harry", "Harry Potter and the Philosopher's Stone", "Harry Smith"]
        );

        let params = SuggestionQuery {
            query: Some("harry".into()),
            limit: Some("1".into()),
        };
        assert_eq!(service.suggestions(&params).await.unwrap(), vec!["Harry"]);

        let params = SuggestionQuery {
            query: Some("   ".into()),
            limit: None,
        };
        assert!(service.suggestions(&params).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_suggestions_only_include_matching_strings() {
        let (_, service) = seeded().await;

        let params = SuggestionQuery {
            query: Some("dune".into()),
            limit: None,
        };
        let found = service.suggestions(&params).await.unwrap();
        assert_eq!(found, vec!["Dune", "Dune Messiah"]);
        assert!(!found.contains(&"Frank Herbert".to_string()));
    }

    #[tokio::test]
    async fn test_title_conflict_raised_by_store() {
        let mut books = MockBookStore::new();
        books.expect_find_by_title().returning(|_| Ok(None));
        books
            .expect_create()
            .returning(|data| Err(AppError::DuplicateTitle(data.title.clone())));

        let repository = Repository::with_stores(Arc::new(books), Arc::new(MockFavoriteStore::new()));
        let service = BooksService::new(repository);

        let err = service
            .create_book(BookRequest::new("Dune", "Frank Herbert", "SF"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateTitle(title) if title == "Dune"));
    }

    #[tokio::test]
    async fn test_book_deleted_during_update() {
        let mut books = MockBookStore::new();
        books
            .expect_find_by_id()
            .returning(|id| Ok(Some(crate::search::tests::book(id, "Dune", "Frank Herbert", "SF"))));
        books.expect_find_by_title().returning(|_| Ok(None));
        books.expect_update().returning(|_, _| Ok(None));

        let repository = Repository::with_stores(Arc::new(books), Arc::new(MockFavoriteStore::new()));
        let service = BooksService::new(repository);

        let err = service
            .update_book(4, BookRequest::new("Dune", "Frank Herbert", "SF"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
