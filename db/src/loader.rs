//! Loading schema declarations into a registry, with fallback chains.
//!
//! Provides [`SchemaDatabase`], a [`SchemaRegistry`] populated from
//! declaration files, and [`DatabaseBuilder`] for trying several sources in
//! order.
//!
//! # Loading patterns
//!
//! ```no_run
//! use form_schema_db::SchemaDatabase;
//!
//! // Load every *.yaml, *.yml and *.json file of a directory
//! let db = SchemaDatabase::from_dir("schemas/").unwrap();
//! assert!(db.contains("user"));
//!
//! // Load a single file holding one declaration or a list of them
//! let db = SchemaDatabase::from_file("forms.yaml").unwrap();
//!
//! // Use the builder for a fallback chain
//! let db = SchemaDatabase::builder()
//!     .from_dir("/etc/app/schemas/")
//!     .from_file("forms.yaml")
//!     .build()
//!     .unwrap();
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use form_schema_core::{FormSchema, SchemaRegistry};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::declaration::SchemaDeclaration;
use crate::error::{DatabaseError, Result};

/// Describes where a [`SchemaDatabase`] was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseSource {
    /// A directory of declaration files.
    Directory(PathBuf),
    /// A single declaration file.
    File(PathBuf),
    /// Assembled in code.
    Memory,
    /// Loaded via a fallback chain of multiple sources.
    Multiple(Vec<DatabaseSource>),
}

/// Serialization format of a declaration file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    /// Returns the format for `path`, or `None` for unsupported extensions.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Some(FileFormat::Yaml),
            Some("json") => Some(FileFormat::Json),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DeclarationFile {
    Many(Vec<SchemaDeclaration>),
    One(SchemaDeclaration),
}

impl DeclarationFile {
    fn into_vec(self) -> Vec<SchemaDeclaration> {
        match self {
            DeclarationFile::Many(declarations) => declarations,
            DeclarationFile::One(declaration) => vec![declaration],
        }
    }
}

/// Reads the declarations stored in one file.
///
/// # Errors
///
/// Returns [`DatabaseError::UnsupportedFormat`] for unknown extensions,
/// [`DatabaseError::IoError`] if the file cannot be opened, or a
/// serialization error if parsing fails.
pub fn read_declarations(path: impl AsRef<Path>) -> Result<Vec<SchemaDeclaration>> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)
        .ok_or_else(|| DatabaseError::UnsupportedFormat(path.to_path_buf()))?;
    let reader = BufReader::new(File::open(path)?);
    let file: DeclarationFile = match format {
        FileFormat::Yaml => serde_yaml::from_reader(reader)?,
        FileFormat::Json => serde_json::from_reader(reader)?,
    };
    Ok(file.into_vec())
}

/// Lists the declaration files (`*.yaml`, `*.yml`, `*.json`) of a
/// directory, sorted by name. Subdirectories are not searched.
///
/// # Errors
///
/// Returns [`DatabaseError::IoError`] if the directory cannot be read.
pub fn declaration_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && FileFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// A [`SchemaRegistry`] populated from declaration files.
///
/// # Examples
///
/// ```no_run
/// use form_schema_core::FormRequest;
/// use form_schema_db::SchemaDatabase;
///
/// let db = SchemaDatabase::from_dir("schemas/").unwrap();
/// println!("Loaded {} schemas", db.len());
///
/// let plan = db.registry().build_form("user", &FormRequest::new()).unwrap();
/// for field in plan.visible_fields() {
///     println!("  {} ({})", field.label, field.kind);
/// }
/// ```
#[derive(Debug)]
pub struct SchemaDatabase {
    registry: SchemaRegistry,
    source: DatabaseSource,
}

impl SchemaDatabase {
    /// Returns a new [`DatabaseBuilder`] for configuring a fallback chain.
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Compiles and registers `declarations`.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::InvalidDeclaration`] for a field that cannot
    /// be compiled and [`DatabaseError::Registry`] for invalid or duplicate
    /// schemas.
    pub fn from_declarations(declarations: &[SchemaDeclaration]) -> Result<Self> {
        let mut db = Self {
            registry: SchemaRegistry::new(),
            source: DatabaseSource::Memory,
        };
        for declaration in declarations {
            db.insert_declaration(declaration)?;
        }
        Ok(db)
    }

    /// Loads every `*.yaml`, `*.yml` and `*.json` file of a directory.
    ///
    /// Files are read in name order; other files are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::IoError`] if the directory cannot be read,
    /// or any error of [`read_declarations`] and
    /// [`from_declarations`](Self::from_declarations).
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let files = declaration_files(path)?;

        let mut declarations = Vec::new();
        for file in &files {
            let loaded = read_declarations(file)?;
            debug!(file = %file.display(), schemas = loaded.len(), "read declarations");
            declarations.extend(loaded);
        }

        let mut db = Self::from_declarations(&declarations)?;
        db.source = DatabaseSource::Directory(path.to_path_buf());
        Ok(db)
    }

    /// Loads a single file holding one declaration or a list of them.
    ///
    /// # Errors
    ///
    /// Any error of [`read_declarations`] and
    /// [`from_declarations`](Self::from_declarations).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let declarations = read_declarations(path)?;
        let mut db = Self::from_declarations(&declarations)?;
        db.source = DatabaseSource::File(path.to_path_buf());
        Ok(db)
    }

    /// Compiles and registers one declaration.
    pub fn insert_declaration(&mut self, declaration: &SchemaDeclaration) -> Result<()> {
        let schema =
            declaration
                .compile()
                .map_err(|source| DatabaseError::InvalidDeclaration {
                    schema: declaration.name.clone(),
                    source,
                })?;
        self.insert(schema)
    }

    /// Registers a schema built in code.
    pub fn insert(&mut self, schema: FormSchema) -> Result<()> {
        self.registry.register(schema)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FormSchema> {
        self.registry.get(name)
    }

    /// Returns `true` if a schema named `name` was loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Returns the number of loaded schemas.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns `true` if no schema was loaded.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Returns an iterator over schema names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.registry.names()
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Consumes the database, keeping only its registry.
    pub fn into_registry(self) -> SchemaRegistry {
        self.registry
    }

    /// Returns a reference to the source metadata.
    pub fn source(&self) -> &DatabaseSource {
        &self.source
    }
}

/// Builder for constructing a [`SchemaDatabase`] with a fallback chain.
///
/// Sources are tried in the order they are added. The first successful load
/// wins; if all fail, [`DatabaseError::NoSourcesAvailable`] is returned.
///
/// # Example
///
/// ```no_run
/// use form_schema_db::SchemaDatabase;
///
/// let db = SchemaDatabase::builder()
///     .from_dir("/opt/app/schemas/")
///     .from_file("/opt/app/forms.json")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct DatabaseBuilder {
    sources: Vec<DatabaseSource>,
}

impl DatabaseBuilder {
    /// Creates a new builder with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory of declaration files as a source.
    pub fn from_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(DatabaseSource::Directory(path.into()));
        self
    }

    /// Adds a single declaration file as a source.
    pub fn from_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(DatabaseSource::File(path.into()));
        self
    }

    /// Attempts to load schemas from configured sources in order.
    ///
    /// Returns the first successfully loaded database. If all sources fail,
    /// returns [`DatabaseError::NoSourcesAvailable`].
    pub fn build(self) -> Result<SchemaDatabase> {
        if self.sources.is_empty() {
            return Err(DatabaseError::NoSourcesAvailable);
        }

        let all_sources = self.sources.clone();

        for source in &self.sources {
            let result = match source {
                DatabaseSource::Directory(path) => SchemaDatabase::from_dir(path),
                DatabaseSource::File(path) => SchemaDatabase::from_file(path),
                DatabaseSource::Memory | DatabaseSource::Multiple(_) => continue,
            };

            match result {
                Ok(mut db) => {
                    db.source = DatabaseSource::Multiple(all_sources);
                    return Ok(db);
                }
                Err(err) => warn!(?source, %err, "schema source failed, trying next"),
            }
        }

        Err(DatabaseError::NoSourcesAvailable)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use form_schema_core::{FieldKind, FieldOptions, FieldOverrides, RegistryError};
    use tempfile::TempDir;

    use super::*;
    use crate::FieldDeclaration;

    fn declaration(name: &str) -> SchemaDeclaration {
        SchemaDeclaration {
            name: name.into(),
            fields: vec![
                FieldDeclaration::new("email", FieldKind::Email),
                FieldDeclaration::new("password", FieldKind::Password),
            ],
        }
    }

    fn write_yaml(dir: &Path, file: &str, value: &impl serde::Serialize) -> PathBuf {
        let path = dir.join(file);
        fs::write(&path, serde_yaml::to_string(value).unwrap()).unwrap();
        path
    }

    fn write_json(dir: &Path, file: &str, value: &impl serde::Serialize) -> PathBuf {
        let path = dir.join(file);
        fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_from_dir_mixes_formats() {
        let dir = TempDir::new().unwrap();
        write_yaml(dir.path(), "login.yaml", &declaration("login"));
        write_yaml(dir.path(), "signup.yml", &declaration("signup"));
        write_json(dir.path(), "reset.json", &declaration("reset"));
        fs::write(dir.path().join("README.md"), "not a schema").unwrap();

        let db = SchemaDatabase::from_dir(dir.path()).unwrap();
        assert_eq!(db.len(), 3);
        assert_eq!(db.names().collect::<Vec<_>>(), vec!["login", "reset", "signup"]);
        assert_eq!(db.source(), &DatabaseSource::Directory(dir.path().to_path_buf()));
    }

    #[test]
    fn test_declaration_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        write_json(dir.path(), "b.json", &declaration("b"));
        write_yaml(dir.path(), "a.yaml", &declaration("a"));
        fs::write(dir.path().join("notes.txt"), "skip").unwrap();
        fs::create_dir(dir.path().join("nested.yaml")).unwrap();

        let files = declaration_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.json"]);
        assert!(matches!(
            declaration_files("/nonexistent/schemas/"),
            Err(DatabaseError::IoError(_))
        ));
    }

    #[test]
    fn test_into_registry_keeps_schemas() {
        let db = SchemaDatabase::from_declarations(&[declaration("login")]).unwrap();
        let registry = db.into_registry();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("login"));
    }

    #[test]
    fn test_from_file_accepts_list() {
        let dir = TempDir::new().unwrap();
        let path = write_yaml(
            dir.path(),
            "forms.yaml",
            &vec![declaration("login"), declaration("signup")],
        );
        let db = SchemaDatabase::from_file(&path).unwrap();
        assert!(db.contains("login"));
        assert!(db.contains("signup"));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("forms.toml");
        fs::write(&path, "name = 'x'").unwrap();
        let err = SchemaDatabase::from_file(&path).unwrap_err();
        assert!(matches!(err, DatabaseError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_duplicate_schema_across_files() {
        let dir = TempDir::new().unwrap();
        write_yaml(dir.path(), "a.yaml", &declaration("login"));
        write_json(dir.path(), "b.json", &declaration("login"));
        let err = SchemaDatabase::from_dir(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Registry(RegistryError::DuplicateSchema(_))
        ));
    }

    #[test]
    fn test_invalid_declaration_names_schema_and_field() {
        let mut bad = declaration("login");
        bad.fields[0].pattern = Some("([".into());
        let err = SchemaDatabase::from_declarations(&[bad]).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("schema 'login'"));
        assert!(text.contains("field 'email'"));
    }

    #[test]
    fn test_builder_fallback() {
        let dir = TempDir::new().unwrap();
        let path = write_json(dir.path(), "forms.json", &declaration("login"));

        let db = SchemaDatabase::builder()
            .from_dir("/nonexistent/schemas/")
            .from_file(&path)
            .build()
            .unwrap();
        assert!(db.contains("login"));
        assert!(matches!(db.source(), DatabaseSource::Multiple(sources) if sources.len() == 2));
    }

    #[test]
    fn test_builder_all_fail() {
        let result = SchemaDatabase::builder()
            .from_dir("/nonexistent/dir/")
            .from_file("/nonexistent/forms.yaml")
            .build();
        assert!(matches!(result, Err(DatabaseError::NoSourcesAvailable)));
        assert!(matches!(
            DatabaseBuilder::new().build(),
            Err(DatabaseError::NoSourcesAvailable)
        ));
    }

    #[test]
    fn test_registry_generates_from_loaded_schema() {
        let db = SchemaDatabase::from_declarations(&[declaration("login")]).unwrap();
        let fields = db
            .registry()
            .generate("login", &FieldOptions::new(), &FieldOverrides::new())
            .unwrap();
        assert_eq!(fields[0].kind, FieldKind::Email);
        assert_eq!(fields[1].kind, FieldKind::Password);
        assert_eq!(fields[1].label, "password");
    }
}
