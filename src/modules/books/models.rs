use serde::{Deserialize, Deserializer, Serialize};

/// Identifier assigned by the store; starts at 1 and is never reused.
pub type BookId = i64;

/// Page size used when `limit` is missing or not positive.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier for the book
    pub id: BookId,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Year the book was published
    pub publication_year: Option<i32>,
    /// Genre of the book
    pub genre: Option<String>,
}

/// Validated payload for creating a new book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publication_year: Option<i32>,
    pub genre: Option<String>,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            publication_year: None,
            genre: None,
        }
    }

    pub fn with_publication_year(mut self, year: i32) -> Self {
        self.publication_year = Some(year);
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            publication_year: self.publication_year,
            genre: self.genre,
        }
    }
}

/// State of a single field in a request body.
///
/// Use with `#[serde(default)]`: a missing key deserializes to `Absent`,
/// an explicit `null` to `Null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// The field was not sent; keep the stored value.
    Absent,
    /// The field was sent as `null`; clear the stored value.
    Null,
    /// The field was sent with a value.
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Merge into a required field. `Null` never reaches here for required
    /// fields because validation rejects it.
    fn merge_required(self, target: &mut T) {
        if let Patch::Value(value) = self {
            *target = value;
        }
    }

    fn merge_optional(self, target: &mut Option<T>) {
        match self {
            Patch::Absent => {}
            Patch::Null => *target = None,
            Patch::Value(value) => *target = Some(value),
        }
    }
}

/// Publication year as sent by the client.
///
/// Integral floats and numeric strings are accepted and narrowed to `i32`
/// during validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum YearInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl YearInput {
    pub fn to_year(&self) -> Result<i32, &'static str> {
        let whole = match self {
            YearInput::Integer(year) => *year,
            YearInput::Float(year) if year.is_finite() && year.fract() == 0.0 => *year as i64,
            YearInput::Float(_) => return Err("expected an integer"),
            YearInput::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| "expected an integer")?,
        };
        i32::try_from(whole).map_err(|_| "integer out of range")
    }
}

/// Body of a create request, before field checks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateBook {
    /// Title of the book
    pub title: Patch<String>,
    /// Author of the book
    pub author: Patch<String>,
    /// Year the book was published
    pub publication_year: Patch<YearInput>,
    /// Genre of the book
    pub genre: Patch<String>,
}

/// Body of an update request, before field checks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateBook {
    pub title: Patch<String>,
    pub author: Patch<String>,
    pub publication_year: Patch<YearInput>,
    pub genre: Patch<String>,
}

/// Validated payload for a partial update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookPatch {
    pub title: Patch<String>,
    pub author: Patch<String>,
    pub publication_year: Patch<i32>,
    pub genre: Patch<String>,
}

impl BookPatch {
    /// True when the request named no known field.
    pub fn is_empty(&self) -> bool {
        self.title.is_absent()
            && self.author.is_absent()
            && self.publication_year.is_absent()
            && self.genre.is_absent()
    }

    /// Overwrite every field present in the patch; the id is never touched.
    pub fn apply_to(self, book: &mut Book) {
        self.title.merge_required(&mut book.title);
        self.author.merge_required(&mut book.author);
        self.publication_year
            .merge_optional(&mut book.publication_year);
        self.genre.merge_optional(&mut book.genre);
    }
}

/// Raw `skip`/`limit` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Normalized pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: usize,
    pub limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl From<ListParams> for Page {
    /// Negative `skip` becomes 0; `limit <= 0` becomes the default.
    fn from(params: ListParams) -> Self {
        let skip = params
            .skip
            .filter(|skip| *skip > 0)
            .map(|skip| usize::try_from(skip).unwrap_or(usize::MAX))
            .unwrap_or(0);
        let limit = params
            .limit
            .filter(|limit| *limit > 0)
            .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX))
            .unwrap_or(DEFAULT_PAGE_LIMIT);
        Self { skip, limit }
    }
}

/// Confirmation returned by delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
