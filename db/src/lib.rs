//! Declarative schema files and form request loading.
//!
//! This crate loads form schemas declared as data (YAML or JSON) into a
//! [`SchemaRegistry`](form_schema_core::SchemaRegistry), and reads and writes
//! the [`FormRequest`](form_schema_core::FormRequest) files that tune a form
//! at render time.
//!
//! # Quick start
//!
//! ```no_run
//! use form_schema_db::{SchemaDatabase, load_request};
//!
//! // Load schemas from a directory
//! let db = SchemaDatabase::from_dir("schemas/").unwrap();
//! if let Some(schema) = db.get("user") {
//!     println!("user has {} fields", schema.len());
//! }
//!
//! // Use the builder for fallback chains
//! let db = SchemaDatabase::builder()
//!     .from_dir("schemas/")
//!     .from_file("forms.yaml")
//!     .build()
//!     .unwrap();
//!
//! // Build a form with a request file
//! let request = load_request("user.request.yaml").unwrap();
//! let plan = db.registry().build_form("user", &request).unwrap();
//! ```

mod declaration;
mod error;
mod loader;
mod request;

pub use declaration::{FieldDeclaration, SchemaDeclaration};
pub use error::{DatabaseError, Result};
pub use loader::{
    DatabaseBuilder, DatabaseSource, FileFormat, SchemaDatabase, declaration_files,
    read_declarations,
};
pub use request::{load_request, save_request};
