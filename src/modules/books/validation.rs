//! Field checks that run after a request body has been deserialized.
//!
//! Every offending field is reported at once, and nothing here touches the
//! store, so a rejected request never causes a partial write.

use owl_http::error::AppError;
use serde_json::{json, Value};

use super::models::{BookPatch, CreateBook, NewBook, Patch, UpdateBook, YearInput};

pub const TITLE: &str = "title";
pub const AUTHOR: &str = "author";
pub const PUBLICATION_YEAR: &str = "publicationYear";

#[derive(Default)]
struct FieldErrors(Vec<Value>);

impl FieldErrors {
    fn reject(&mut self, field: &str, error: &str) {
        self.0.push(json!({"field": field, "error": error}));
    }

    fn non_empty(&mut self, field: &str, text: String) -> Option<String> {
        if text.trim().is_empty() {
            self.reject(field, "must not be empty");
            None
        } else {
            Some(text)
        }
    }

    /// Text that must be present on create and can never be null.
    fn required_text(&mut self, field: &str, value: Patch<String>) -> Option<String> {
        match value {
            Patch::Value(text) => self.non_empty(field, text),
            Patch::Absent | Patch::Null => {
                self.reject(field, "field required");
                None
            }
        }
    }

    fn patch_required_text(&mut self, field: &str, value: Patch<String>) -> Patch<String> {
        match value {
            Patch::Absent => Patch::Absent,
            Patch::Null => {
                self.reject(field, "must not be null");
                Patch::Absent
            }
            Patch::Value(text) => self.non_empty(field, text).map_or(Patch::Absent, Patch::Value),
        }
    }

    fn patch_year(&mut self, value: Patch<YearInput>) -> Patch<i32> {
        match value {
            Patch::Absent => Patch::Absent,
            Patch::Null => Patch::Null,
            Patch::Value(input) => match input.to_year() {
                Ok(year) => Patch::Value(year),
                Err(error) => {
                    self.reject(PUBLICATION_YEAR, error);
                    Patch::Absent
                }
            },
        }
    }

    fn finish(self, message: &str) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self.0, message))
        }
    }
}

/// Optional values on create: absent and `null` both mean "no value".
fn into_option<T>(patch: Patch<T>) -> Option<T> {
    match patch {
        Patch::Value(value) => Some(value),
        Patch::Absent | Patch::Null => None,
    }
}

impl CreateBook {
    pub fn validate(self) -> Result<NewBook, AppError> {
        let mut errors = FieldErrors::default();

        let title = errors.required_text(TITLE, self.title);
        let author = errors.required_text(AUTHOR, self.author);
        let publication_year = into_option(errors.patch_year(self.publication_year));
        let genre = into_option(self.genre);

        errors.finish("invalid book")?;

        match (title, author) {
            (Some(title), Some(author)) => Ok(NewBook {
                title,
                author,
                publication_year,
                genre,
            }),
            _ => Err(AppError::invalid_field("body", "title and author are required")),
        }
    }
}

impl UpdateBook {
    /// Only fields present in the body end up in the patch.
    pub fn validate(self) -> Result<BookPatch, AppError> {
        let mut errors = FieldErrors::default();

        let patch = BookPatch {
            title: errors.patch_required_text(TITLE, self.title),
            author: errors.patch_required_text(AUTHOR, self.author),
            publication_year: errors.patch_year(self.publication_year),
            genre: self.genre,
        };

        errors.finish("invalid book update")?;
        Ok(patch)
    }
}
