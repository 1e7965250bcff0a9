//! Recovering metadata from arbitrary validators.
//!
//! [`extract_metadata`] finds the most specific bundle reachable from a
//! validator that may have been built by several chained combinators or may
//! never have been annotated itself. The lookup order is:
//!
//! 1. the bundle stored on the node itself,
//! 2. for single-child wrappers (optional, nullable, default, catch, effects,
//!    array element), the result of extracting from the wrapped validator,
//! 3. otherwise a depth-first walk over the node's children in declaration
//!    order, returning the first non-empty bundle,
//! 4. an empty bundle.
//!
//! The walk tracks the [`ValidatorId`]s on the current path and stops at
//! [`MAX_EXTRACTION_DEPTH`], so cyclic or endlessly lazy definitions
//! terminate. A validator shared by several branches is searched once and is
//! not reported as a cycle. Extraction never fails; problems degrade to an empty bundle and
//! an [`ExtractionWarning`].

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, warn};

use crate::{FieldMetadata, Validator, ValidatorDef, ValidatorId};

/// Maximum nesting depth explored while searching for metadata.
pub const MAX_EXTRACTION_DEPTH: usize = 32;

/// Non-fatal condition met while extracting metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionWarning {
    /// Nothing reachable carried metadata.
    NoMetadata,
    /// The walk hit [`MAX_EXTRACTION_DEPTH`] before finishing.
    DepthLimitReached,
    /// A validator was reached again below itself.
    CycleDetected,
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::NoMetadata => f.write_str("no metadata found"),
            ExtractionWarning::DepthLimitReached => write!(
                f,
                "metadata search stopped at depth {MAX_EXTRACTION_DEPTH}"
            ),
            ExtractionWarning::CycleDetected => f.write_str("cyclic validator reference skipped"),
        }
    }
}

/// Result of [`extract_metadata_reported`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub metadata: FieldMetadata,
    /// Conditions met on the way, in the order they occurred.
    pub warnings: Vec<ExtractionWarning>,
}

/// Returns the most specific metadata bundle reachable from `validator`.
///
/// The bundle is a copy; changing it does not affect the validator.
///
/// # Examples
///
/// ```
/// use form_schema_core::{FieldKind, FieldMetadata, Validator, extract_metadata};
///
/// let inner = Validator::string().with_metadata(FieldMetadata::kind(FieldKind::Tel));
/// // Wrap in a fresh, unannotated object: the structural search finds `inner`.
/// let outer = Validator::object([("phone", inner)]);
///
/// assert_eq!(extract_metadata(&outer).kind, Some(FieldKind::Tel));
/// assert!(extract_metadata(&Validator::string()).is_empty());
/// ```
pub fn extract_metadata(validator: &Validator) -> FieldMetadata {
    let extraction = extract_metadata_reported(validator);
    for warning in &extraction.warnings {
        match warning {
            ExtractionWarning::NoMetadata => {
                debug!(validator = ?validator.id(), "{warning}");
            }
            _ => warn!(validator = ?validator.id(), "{warning}"),
        }
    }
    extraction.metadata
}

/// Like [`extract_metadata`], also returning the warnings met on the way.
pub fn extract_metadata_reported(validator: &Validator) -> Extraction {
    let mut walk = Walk {
        ancestors: HashSet::new(),
        searched: HashSet::new(),
        warnings: Vec::new(),
    };
    let metadata = walk.extract(validator, 0);
    let mut warnings = walk.warnings;
    if metadata.is_none() {
        warnings.push(ExtractionWarning::NoMetadata);
    }
    Extraction {
        metadata: metadata.unwrap_or_default(),
        warnings,
    }
}

struct Walk {
    /// Validators on the path from the root to the current node.
    ancestors: HashSet<ValidatorId>,
    /// Validators whose subtree was searched without finding metadata.
    searched: HashSet<ValidatorId>,
    warnings: Vec<ExtractionWarning>,
}

impl Walk {
    fn note(&mut self, warning: ExtractionWarning) {
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    fn extract(&mut self, validator: &Validator, depth: usize) -> Option<FieldMetadata> {
        if depth > MAX_EXTRACTION_DEPTH {
            self.note(ExtractionWarning::DepthLimitReached);
            return None;
        }
        let id = validator.id();
        if self.searched.contains(&id) {
            return None;
        }
        if !self.ancestors.insert(id) {
            self.note(ExtractionWarning::CycleDetected);
            return None;
        }

        let found = self.extract_node(validator, depth);
        self.ancestors.remove(&id);
        if found.is_none() {
            self.searched.insert(id);
        }
        found
    }

    fn extract_node(&mut self, validator: &Validator, depth: usize) -> Option<FieldMetadata> {
        if let Some(metadata) = validator.metadata() {
            return Some(metadata.clone());
        }

        if let Some(inner) = validator.def().wrapped() {
            return self.extract(inner, depth + 1);
        }

        self.search_children(validator.def(), depth)
    }

    fn search_children(&mut self, def: &ValidatorDef, depth: usize) -> Option<FieldMetadata> {
        for child in def.children() {
            if let Some(metadata) = self.extract(&child, depth + 1) {
                if !metadata.is_empty() {
                    return Some(metadata);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, OnceLock};

    use super::*;
    use crate::{FieldKind, FieldOption};

    fn select_meta() -> FieldMetadata {
        FieldMetadata::kind(FieldKind::Select)
            .with_label("Status")
            .with_options(vec![
                FieldOption::new("ACTIVE", "Active"),
                FieldOption::new("INACTIVE", "Inactive"),
            ])
    }

    #[test]
    fn test_direct_lookup_returns_copy() {
        let v = Validator::string().with_metadata(select_meta());
        let mut extracted = extract_metadata(&v);
        extracted.label = Some("changed".into());
        assert_eq!(extract_metadata(&v).label.as_deref(), Some("Status"));
    }

    #[test]
    fn test_unwraps_known_wrappers_without_slot() {
        let tagged = Validator::string().with_metadata(select_meta());
        let wrappers = [
            Validator::from_def(ValidatorDef::Optional(tagged.clone())),
            Validator::from_def(ValidatorDef::Nullable(tagged.clone())),
            Validator::from_def(ValidatorDef::Default {
                inner: tagged.clone(),
                value: "ACTIVE".into(),
            }),
            Validator::from_def(ValidatorDef::Catch {
                inner: tagged.clone(),
                value: "ACTIVE".into(),
            }),
            Validator::array_of(tagged.clone()),
        ];
        for wrapper in &wrappers {
            assert!(wrapper.metadata().is_none());
            assert_eq!(extract_metadata(wrapper), select_meta());
        }
    }

    #[test]
    fn test_structural_search_follows_declaration_order() {
        let first = Validator::string().with_label("first");
        let second = Validator::string().with_label("second");
        let object = Validator::object([
            ("plain", Validator::number()),
            ("a", first),
            ("b", second),
        ]);
        assert_eq!(extract_metadata(&object).label.as_deref(), Some("first"));

        let union = Validator::union(vec![
            Validator::number(),
            Validator::string().with_label("from union"),
        ]);
        assert_eq!(extract_metadata(&union).label.as_deref(), Some("from union"));
    }

    #[test]
    fn test_structural_search_skips_empty_bundles() {
        let empty = Validator::string().with_metadata(FieldMetadata::default());
        let pipe = empty.pipe(&Validator::string().with_label("output"));
        // The pipe node inherits the empty slot from `empty`, which wins.
        assert_eq!(extract_metadata(&pipe), FieldMetadata::default());

        let bare_pipe = Validator::from_def(ValidatorDef::Pipe {
            input: empty,
            output: Validator::string().with_label("output"),
        });
        assert_eq!(extract_metadata(&bare_pipe).label.as_deref(), Some("output"));
    }

    #[test]
    fn test_nothing_found_reports_warning() {
        let extraction = extract_metadata_reported(&Validator::object([("a", Validator::string())]));
        assert!(extraction.metadata.is_empty());
        assert_eq!(extraction.warnings, vec![ExtractionWarning::NoMetadata]);
    }

    #[test]
    fn test_shared_child_is_not_a_cycle() {
        let shared = Validator::string();
        let v = Validator::object([("a", shared.clone()), ("b", shared)]);
        let extraction = extract_metadata_reported(&v);
        assert_eq!(extraction.warnings, vec![ExtractionWarning::NoMetadata]);
    }

    #[test]
    fn test_shared_child_searched_once_before_later_match() {
        let shared = Validator::object([("inner", Validator::string())]);
        let v = Validator::union(vec![
            shared.clone(),
            Validator::object([("again", shared)]),
            Validator::string().with_kind(FieldKind::Tel),
        ]);
        let extraction = extract_metadata_reported(&v);
        assert_eq!(extraction.metadata.kind, Some(FieldKind::Tel));
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_cyclic_definition_terminates() {
        let cell: Arc<OnceLock<Validator>> = Arc::new(OnceLock::new());
        let handle = cell.clone();
        let lazy = Validator::lazy(move || handle.get().cloned().unwrap_or_else(Validator::any));
        let node = Validator::object([("self", lazy.clone())]);
        cell.set(node.clone()).unwrap();

        let extraction = extract_metadata_reported(&node);
        assert!(extraction.metadata.is_empty());
        assert!(extraction.warnings.contains(&ExtractionWarning::CycleDetected));
    }

    #[test]
    fn test_endless_lazy_definition_hits_depth_limit() {
        fn endless() -> Validator {
            Validator::object([("next", Validator::lazy(endless))])
        }
        let extraction = extract_metadata_reported(&endless());
        assert!(extraction.metadata.is_empty());
        assert!(extraction
            .warnings
            .contains(&ExtractionWarning::DepthLimitReached));
    }

    #[test]
    fn test_lazy_child_with_metadata_is_found() {
        let v = Validator::lazy(|| Validator::date().with_kind(FieldKind::Date));
        assert_eq!(extract_metadata(&v).kind, Some(FieldKind::Date));
    }
}
