//! Form request files.
//!
//! A [`FormRequest`] (per-field options, overrides and default value records)
//! can be kept in YAML or JSON next to the schema it applies to.
//!
//! # Example YAML
//!
//! ```yaml
//! options:
//!   status:
//!     - { value: LOCKED, label: Locked }
//! overrides:
//!   username:
//!     label: Login name
//!     errorMessage: Pick a longer name
//! defaultValues:
//!   - username: ada
//!     roles: { value: admin, label: Admin }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use form_schema_core::FormRequest;

use crate::error::{DatabaseError, Result};
use crate::loader::FileFormat;

/// Loads a request from a YAML or JSON file.
///
/// # Errors
///
/// Returns [`UnsupportedFormat`](DatabaseError::UnsupportedFormat) for
/// unknown extensions, [`IoError`](DatabaseError::IoError) if the file
/// cannot be read, or a serialization error if parsing fails.
pub fn load_request(path: impl AsRef<Path>) -> Result<FormRequest> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)
        .ok_or_else(|| DatabaseError::UnsupportedFormat(path.to_path_buf()))?;
    let reader = BufReader::new(File::open(path)?);
    let request = match format {
        FileFormat::Yaml => serde_yaml::from_reader(reader)?,
        FileFormat::Json => serde_json::from_reader(reader)?,
    };
    Ok(request)
}

/// Saves a request, choosing the format from the file extension.
///
/// # Errors
///
/// Returns [`UnsupportedFormat`](DatabaseError::UnsupportedFormat) for
/// unknown extensions, [`IoError`](DatabaseError::IoError) if the file
/// cannot be written, or a serialization error.
pub fn save_request(request: &FormRequest, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)
        .ok_or_else(|| DatabaseError::UnsupportedFormat(path.to_path_buf()))?;
    let writer = BufWriter::new(File::create(path)?);
    match format {
        FileFormat::Yaml => serde_yaml::to_writer(writer, request)?,
        FileFormat::Json => serde_json::to_writer_pretty(writer, request)?,
    }
    Ok(())
}
