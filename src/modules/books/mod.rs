pub mod models;
pub mod routes;
pub mod store;
pub mod validation;

use async_trait::async_trait;
use axum::Router;
use owl_kernel::{InitCtx, Module};
use serde_json::json;

use store::BookStore;

/// Catalog of books held in process memory
pub struct BooksModule {
    store: BookStore,
}

impl BooksModule {
    pub fn new(store: BookStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        // Nothing is persisted; the catalog is dropped with the process.
        let books = self.store.len().await;
        tracing::info!(module = self.name(), books, "books module stopped");
        Ok(())
    }
}

fn json_content(schema: serde_json::Value) -> serde_json::Value {
    json!({ "application/json": { "schema": schema } })
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": json_content(json!({ "$ref": "#/components/schemas/ErrorResponse" }))
    })
}

fn book_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": json_content(json!({ "$ref": "#/components/schemas/Book" }))
    })
}

fn id_parameter() -> serde_json::Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    })
}

fn openapi_fragment() -> serde_json::Value {
    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books with pagination",
                    "tags": ["Books"],
                    "parameters": [
                        {
                            "name": "skip",
                            "in": "query",
                            "required": false,
                            "description": "Number of books to skip; negative values count as 0",
                            "schema": { "type": "integer", "default": 0 }
                        },
                        {
                            "name": "limit",
                            "in": "query",
                            "required": false,
                            "description": "Maximum number of books to return; values <= 0 count as 10",
                            "schema": { "type": "integer", "default": 10 }
                        }
                    ],
                    "responses": {
                        "200": {
                            "description": "Books ordered by id",
                            "content": json_content(json!({
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            }))
                        },
                        "422": error_response("Malformed query parameters")
                    }
                },
                "post": {
                    "summary": "Add a new book to the catalog",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": json_content(json!({ "$ref": "#/components/schemas/CreateBook" }))
                    },
                    "responses": {
                        "201": book_response("Created book with its assigned id"),
                        "422": error_response("Validation error")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book by id",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": book_response("The book"),
                        "404": error_response("Book not found")
                    }
                },
                "put": {
                    "summary": "Update the fields present in the body",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "requestBody": {
                        "required": true,
                        "content": json_content(json!({ "$ref": "#/components/schemas/UpdateBook" }))
                    },
                    "responses": {
                        "200": book_response("The updated book"),
                        "404": error_response("Book not found"),
                        "422": error_response("Validation error")
                    }
                },
                "delete": {
                    "summary": "Remove a book from the catalog",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": {
                            "description": "Confirmation message",
                            "content": json_content(json!({ "$ref": "#/components/schemas/MessageResponse" }))
                        },
                        "404": error_response("Book not found")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64", "description": "Unique identifier for the book" },
                        "title": { "type": "string", "description": "Title of the book" },
                        "author": { "type": "string", "description": "Author of the book" },
                        "publicationYear": { "type": ["integer", "null"], "format": "int32", "description": "Year the book was published" },
                        "genre": { "type": ["string", "null"], "description": "Genre of the book" }
                    },
                    "required": ["id", "title", "author", "publicationYear", "genre"]
                },
                "CreateBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "minLength": 1 },
                        "author": { "type": "string", "minLength": 1 },
                        "publicationYear": { "type": ["integer", "null"], "format": "int32" },
                        "genre": { "type": ["string", "null"] }
                    },
                    "required": ["title", "author"]
                },
                "UpdateBook": {
                    "type": "object",
                    "description": "Omitted fields are left untouched; null clears publicationYear or genre",
                    "properties": {
                        "title": { "type": "string", "minLength": 1 },
                        "author": { "type": "string", "minLength": 1 },
                        "publicationYear": { "type": ["integer", "null"], "format": "int32" },
                        "genre": { "type": ["string", "null"] }
                    }
                },
                "MessageResponse": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" }
                    },
                    "required": ["message"]
                }
            }
        }
    })
}

/// Create a books module backed by the given store
pub fn create_module(store: BookStore) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::NewBook;
    use owl_kernel::settings::Settings;

    #[tokio::test]
    async fn lifecycle_runs_against_the_injected_store() {
        let store = BookStore::new();
        store.create(NewBook::new("Dune", "Herbert")).await;

        let module = BooksModule::new(store.clone());
        let settings = Settings::default();
        let ctx = InitCtx {
            settings: &settings,
        };

        module.init(&ctx).await.unwrap();
        module.start(&ctx).await.unwrap();
        module.stop().await.unwrap();

        // Stopping keeps the catalog intact for anyone still holding the store.
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn module_futures_are_send() {
        fn assert_send<T: Send>(_: &T) {}

        let module = BooksModule::new(BookStore::new());
        assert_send(&module.stop());
    }

    #[test]
    fn openapi_fragment_documents_every_operation() {
        let fragment = openapi_fragment();
        let paths = &fragment["paths"];
        for method in ["get", "post"] {
            assert!(paths["/"][method].is_object(), "missing {method} /");
        }
        for method in ["get", "put", "delete"] {
            assert!(paths["/{id}"][method].is_object(), "missing {method} /{{id}}");
        }
        assert_eq!(
            fragment["components"]["schemas"]["CreateBook"]["required"],
            json!(["title", "author"])
        );
    }
}
