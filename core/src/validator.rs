//! Composable validators over JSON values.
//!
//! A [`Validator`] is an immutable node describing a type constraint. Every
//! combinator (narrowing checks, optional/default wrapping, refinement,
//! transformation, composition) returns a *new* node built from the receiver;
//! the receiver is never changed. Validators are cheap to clone and can be
//! shared across threads.
//!
//! Values are [`serde_json::Value`]s. An absent value is `None`, which is
//! distinct from JSON `null`.
//!
//! # Example
//!
//! ```
//! use form_schema_core::Validator;
//! use serde_json::json;
//!
//! let age = Validator::number().min(18.0).max(120.0);
//! assert!(age.parse_value(&json!(42)).is_ok());
//! assert!(age.parse_value(&json!(12)).is_err());
//!
//! let nickname = Validator::string().min(3.0).optional();
//! assert_eq!(nickname.parse(None).unwrap(), None);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::FieldMetadata;

/// Message used when a required value is absent and no custom message is set.
pub const DEFAULT_REQUIRED_MESSAGE: &str = "Required";

static NEXT_VALIDATOR_ID: AtomicU64 = AtomicU64::new(1);

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+'-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://[^\s/?#]+[^\s]*$").expect("url pattern is valid")
});

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid pattern is valid")
});

/// Identity of a validator node.
///
/// Every constructed node receives a fresh id, so two validators compare
/// equal by id only when one is a clone of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValidatorId(u64);

impl ValidatorId {
    fn next() -> Self {
        Self(NEXT_VALIDATOR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A single problem found while parsing a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Object keys and array indices leading to the offending value.
    pub path: Vec<String>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }

    /// Returns the path joined with dots (empty for the root value).
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.dotted_path(), self.message)
        }
    }
}

/// Rejection returned by [`Validator::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Creates an error with one issue at the root path.
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            issues: vec![ValidationIssue::new(message)],
        }
    }

    /// Message of the first issue, if any.
    pub fn first_message(&self) -> Option<&str> {
        self.issues.first().map(|issue| issue.message.as_str())
    }

    fn prefixed(mut self, segment: &str) -> Self {
        for issue in &mut self.issues {
            issue.path.insert(0, segment.to_string());
        }
        self
    }
}

/// Constraint applied by a narrowing check.
///
/// Length-style bounds (`Min`, `Max`, `Length`) apply to string length, array
/// length or numeric value depending on the value being checked. Checks that
/// do not apply to a value's type pass.
#[derive(Debug, Clone)]
pub enum CheckKind {
    Min(f64),
    Max(f64),
    Length(usize),
    Email,
    Url,
    Uuid,
    Regex(Regex),
    StartsWith(String),
    EndsWith(String),
    Int,
    Positive,
    Negative,
    NonNegative,
    NonPositive,
}

/// A narrowing check with an optional custom message.
#[derive(Debug, Clone)]
pub struct Check {
    pub kind: CheckKind,
    pub message: Option<String>,
}

impl Check {
    pub fn new(kind: CheckKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    fn apply(&self, value: &Value) -> Result<(), ValidationError> {
        let failure = match value {
            Value::String(s) => self.check_string(s),
            Value::Number(n) => self.check_number(n),
            Value::Array(items) => self.check_len(items.len(), "Array", "element(s)"),
            _ => None,
        };
        match failure {
            Some(default_message) => Err(ValidationError::single(
                self.message.clone().unwrap_or(default_message),
            )),
            None => Ok(()),
        }
    }

    fn check_len(&self, len: usize, noun: &str, unit: &str) -> Option<String> {
        let len = len as f64;
        match &self.kind {
            CheckKind::Min(min) if len < *min => Some(format!(
                "{noun} must contain at least {} {unit}",
                format_bound(*min)
            )),
            CheckKind::Max(max) if len > *max => Some(format!(
                "{noun} must contain at most {} {unit}",
                format_bound(*max)
            )),
            CheckKind::Length(exact) if len != *exact as f64 => {
                Some(format!("{noun} must contain exactly {exact} {unit}"))
            }
            _ => None,
        }
    }

    fn check_string(&self, s: &str) -> Option<String> {
        match &self.kind {
            CheckKind::Min(_) | CheckKind::Max(_) | CheckKind::Length(_) => {
                self.check_len(s.chars().count(), "String", "character(s)")
            }
            CheckKind::Email if !EMAIL_RE.is_match(s) => Some("Invalid email".to_string()),
            CheckKind::Url if !URL_RE.is_match(s) => Some("Invalid url".to_string()),
            CheckKind::Uuid if !UUID_RE.is_match(s) => Some("Invalid uuid".to_string()),
            CheckKind::Regex(re) if !re.is_match(s) => Some("Invalid".to_string()),
            CheckKind::StartsWith(prefix) if !s.starts_with(prefix.as_str()) => {
                Some(format!("Invalid input: must start with \"{prefix}\""))
            }
            CheckKind::EndsWith(suffix) if !s.ends_with(suffix.as_str()) => {
                Some(format!("Invalid input: must end with \"{suffix}\""))
            }
            _ => None,
        }
    }

    fn check_number(&self, n: &Number) -> Option<String> {
        let f = n.as_f64()?;
        match &self.kind {
            CheckKind::Min(min)
                if compare_to_bound(n, *min) == Some(std::cmp::Ordering::Less) =>
            {
                Some(format!(
                    "Number must be greater than or equal to {}",
                    format_bound(*min)
                ))
            }
            CheckKind::Max(max)
                if compare_to_bound(n, *max) == Some(std::cmp::Ordering::Greater) =>
            {
                Some(format!(
                    "Number must be less than or equal to {}",
                    format_bound(*max)
                ))
            }
            CheckKind::Int if f.fract() != 0.0 => {
                Some("Expected integer, received float".to_string())
            }
            CheckKind::Positive if f <= 0.0 => Some("Number must be greater than 0".to_string()),
            CheckKind::Negative if f >= 0.0 => Some("Number must be less than 0".to_string()),
            CheckKind::NonNegative if f < 0.0 => {
                Some("Number must be greater than or equal to 0".to_string())
            }
            CheckKind::NonPositive if f > 0.0 => {
                Some("Number must be less than or equal to 0".to_string())
            }
            _ => None,
        }
    }
}

/// Compares a JSON number with a bound, exactly for integers that do not
/// fit in an `f64` mantissa.
fn compare_to_bound(n: &Number, bound: f64) -> Option<std::cmp::Ordering> {
    if bound.fract() == 0.0 {
        if let Some(i) = n.as_i64() {
            if bound >= i64::MIN as f64 && bound < i64::MAX as f64 {
                return Some(i.cmp(&(bound as i64)));
            }
        }
        if let Some(u) = n.as_u64() {
            if bound >= 0.0 && bound < u64::MAX as f64 {
                return Some(u.cmp(&(bound as u64)));
            }
        }
    }
    n.as_f64().and_then(|f| f.partial_cmp(&bound))
}

fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Predicate used by [`Validator::refine`].
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Mapping used by [`Validator::transform`].
pub type Transformer = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Post-processing step of an [`ValidatorDef::Effects`] node.
#[derive(Clone)]
pub enum Effect {
    Refine { predicate: Predicate, message: String },
    Transform(Transformer),
    Check(Check),
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Refine { message, .. } => {
                f.debug_struct("Refine").field("message", message).finish()
            }
            Effect::Transform(_) => f.write_str("Transform"),
            Effect::Check(check) => f.debug_tuple("Check").field(check).finish(),
        }
    }
}

/// Deferred validator, resolved each time it is used.
///
/// Allows recursive definitions such as trees.
#[derive(Clone)]
pub struct LazyValidator(Arc<dyn Fn() -> Validator + Send + Sync>);

impl LazyValidator {
    pub fn resolve(&self) -> Validator {
        (self.0)()
    }
}

impl fmt::Debug for LazyValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Lazy")
    }
}

/// Definition of a validator node.
///
/// This is the closed set of node kinds. Wrapper kinds hold the validator
/// they wrap; composite kinds hold their members in declaration order.
#[derive(Debug, Clone)]
pub enum ValidatorDef {
    Any,
    String { checks: Vec<Check> },
    Number { checks: Vec<Check>, coerce: bool },
    Boolean,
    /// RFC 3339 timestamp or `YYYY-MM-DD` string.
    Date,
    Literal(Value),
    Enum(Vec<String>),
    Array { element: Validator, checks: Vec<Check> },
    Object(Vec<(String, Validator)>),
    Union(Vec<Validator>),
    Optional(Validator),
    Nullable(Validator),
    Default { inner: Validator, value: Value },
    Catch { inner: Validator, value: Value },
    Effects { inner: Validator, effect: Effect },
    Pipe { input: Validator, output: Validator },
    Lazy(LazyValidator),
}

impl ValidatorDef {
    /// Returns the wrapped validator for single-child wrapper kinds.
    pub fn wrapped(&self) -> Option<&Validator> {
        match self {
            ValidatorDef::Optional(inner)
            | ValidatorDef::Nullable(inner)
            | ValidatorDef::Default { inner, .. }
            | ValidatorDef::Catch { inner, .. }
            | ValidatorDef::Effects { inner, .. } => Some(inner),
            ValidatorDef::Array { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Returns every directly reachable validator in declaration order.
    ///
    /// Lazy nodes are resolved.
    pub fn children(&self) -> Vec<Validator> {
        match self {
            ValidatorDef::Any
            | ValidatorDef::String { .. }
            | ValidatorDef::Number { .. }
            | ValidatorDef::Boolean
            | ValidatorDef::Date
            | ValidatorDef::Literal(_)
            | ValidatorDef::Enum(_) => Vec::new(),
            ValidatorDef::Object(fields) => fields.iter().map(|(_, v)| v.clone()).collect(),
            ValidatorDef::Union(options) => options.clone(),
            ValidatorDef::Pipe { input, output } => vec![input.clone(), output.clone()],
            ValidatorDef::Lazy(lazy) => vec![lazy.resolve()],
            other => other.wrapped().into_iter().cloned().collect(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ValidatorDef::Any => "any",
            ValidatorDef::String { .. } => "string",
            ValidatorDef::Number { .. } => "number",
            ValidatorDef::Boolean => "boolean",
            ValidatorDef::Date => "date",
            ValidatorDef::Literal(_) => "literal",
            ValidatorDef::Enum(_) => "enum",
            ValidatorDef::Array { .. } => "array",
            ValidatorDef::Object(_) => "object",
            ValidatorDef::Union(_) => "union",
            ValidatorDef::Optional(_) => "optional",
            ValidatorDef::Nullable(_) => "nullable",
            ValidatorDef::Default { .. } => "default",
            ValidatorDef::Catch { .. } => "catch",
            ValidatorDef::Effects { .. } => "effects",
            ValidatorDef::Pipe { .. } => "pipe",
            ValidatorDef::Lazy(_) => "lazy",
        }
    }
}

/// Custom messages for absent and mistyped input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TypeMessages {
    required: Option<String>,
    invalid_type: Option<String>,
}

struct Node {
    id: ValidatorId,
    def: ValidatorDef,
    metadata: Option<FieldMetadata>,
    messages: TypeMessages,
}

/// Immutable, composable constraint over a JSON value.
///
/// Each node carries an optional [`FieldMetadata`] slot. Every combinator
/// copies the receiver's slot into the node it returns, so metadata attached
/// once survives any chain of transformations.
#[derive(Clone)]
pub struct Validator {
    node: Arc<Node>,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("id", &self.node.id)
            .field("def", &self.node.def)
            .field("metadata", &self.node.metadata)
            .finish()
    }
}

impl Validator {
    fn build(def: ValidatorDef, metadata: Option<FieldMetadata>, messages: TypeMessages) -> Self {
        Self {
            node: Arc::new(Node {
                id: ValidatorId::next(),
                def,
                metadata,
                messages,
            }),
        }
    }

    /// Creates an unannotated validator from a definition.
    pub fn from_def(def: ValidatorDef) -> Self {
        Self::build(def, None, TypeMessages::default())
    }

    /// Builds a new node from `def`, carrying this node's metadata forward.
    ///
    /// Every combinator goes through here.
    fn derive(&self, def: ValidatorDef) -> Self {
        Self::build(def, self.node.metadata.clone(), TypeMessages::default())
    }

    /// Like [`derive`](Self::derive) for a node that replaces this one in
    /// place (narrowing a scalar), so custom type messages carry over too.
    fn derive_in_place(&self, def: ValidatorDef) -> Self {
        Self::build(
            def,
            self.node.metadata.clone(),
            self.node.messages.clone(),
        )
    }

    /// Returns a copy of this node whose metadata slot holds `metadata`.
    pub(crate) fn with_metadata_slot(&self, metadata: Option<FieldMetadata>) -> Self {
        Self::build(self.node.def.clone(), metadata, self.node.messages.clone())
    }

    pub fn any() -> Self {
        Self::from_def(ValidatorDef::Any)
    }

    pub fn string() -> Self {
        Self::from_def(ValidatorDef::String { checks: Vec::new() })
    }

    pub fn number() -> Self {
        Self::from_def(ValidatorDef::Number {
            checks: Vec::new(),
            coerce: false,
        })
    }

    /// Number validator that also accepts numeric strings and booleans.
    pub fn coerce_number() -> Self {
        Self::from_def(ValidatorDef::Number {
            checks: Vec::new(),
            coerce: true,
        })
    }

    pub fn boolean() -> Self {
        Self::from_def(ValidatorDef::Boolean)
    }

    pub fn date() -> Self {
        Self::from_def(ValidatorDef::Date)
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::from_def(ValidatorDef::Literal(value.into()))
    }

    /// String validator restricted to `values`.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_def(ValidatorDef::Enum(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    /// Array whose elements must satisfy `element`.
    pub fn array_of(element: Validator) -> Self {
        Self::from_def(ValidatorDef::Array {
            element,
            checks: Vec::new(),
        })
    }

    /// Object with the given fields, in declaration order.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Validator)>,
        K: Into<String>,
    {
        Self::from_def(ValidatorDef::Object(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Accepts the value if any option accepts it (first match wins).
    pub fn union(options: Vec<Validator>) -> Self {
        Self::from_def(ValidatorDef::Union(options))
    }

    /// Validator produced on demand by `thunk`.
    pub fn lazy<F>(thunk: F) -> Self
    where
        F: Fn() -> Validator + Send + Sync + 'static,
    {
        Self::from_def(ValidatorDef::Lazy(LazyValidator(Arc::new(thunk))))
    }

    pub fn id(&self) -> ValidatorId {
        self.node.id
    }

    pub fn def(&self) -> &ValidatorDef {
        &self.node.def
    }

    /// Metadata stored directly on this node.
    pub fn metadata(&self) -> Option<&FieldMetadata> {
        self.node.metadata.as_ref()
    }

    /// Fields of an object validator, if this is one.
    pub fn object_fields(&self) -> Option<&[(String, Validator)]> {
        match &self.node.def {
            ValidatorDef::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Appends a narrowing check.
    ///
    /// String, number and array nodes take the check directly; any other node
    /// is wrapped in an [`Effect::Check`].
    pub fn check(&self, kind: CheckKind) -> Self {
        let check = Check::new(kind);
        match &self.node.def {
            ValidatorDef::String { checks } => {
                let mut checks = checks.clone();
                checks.push(check);
                self.derive_in_place(ValidatorDef::String { checks })
            }
            ValidatorDef::Number { checks, coerce } => {
                let mut checks = checks.clone();
                checks.push(check);
                self.derive_in_place(ValidatorDef::Number {
                    checks,
                    coerce: *coerce,
                })
            }
            ValidatorDef::Array { element, checks } => {
                let mut checks = checks.clone();
                checks.push(check);
                self.derive_in_place(ValidatorDef::Array {
                    element: element.clone(),
                    checks,
                })
            }
            _ => self.derive(ValidatorDef::Effects {
                inner: self.clone(),
                effect: Effect::Check(check),
            }),
        }
    }

    /// Sets the message of the most recently added check or refinement.
    ///
    /// Returns an equivalent copy when this node has neither.
    pub fn message(&self, message: impl Into<String>) -> Self {
        let message = message.into();
        let with_last = |checks: &[Check]| {
            let mut checks = checks.to_vec();
            if let Some(last) = checks.last_mut() {
                last.message = Some(message.clone());
            }
            checks
        };
        let def = match &self.node.def {
            ValidatorDef::String { checks } => ValidatorDef::String {
                checks: with_last(checks),
            },
            ValidatorDef::Number { checks, coerce } => ValidatorDef::Number {
                checks: with_last(checks),
                coerce: *coerce,
            },
            ValidatorDef::Array { element, checks } => ValidatorDef::Array {
                element: element.clone(),
                checks: with_last(checks),
            },
            ValidatorDef::Effects {
                inner,
                effect: Effect::Check(check),
            } => {
                let mut check = check.clone();
                check.message = Some(message.clone());
                ValidatorDef::Effects {
                    inner: inner.clone(),
                    effect: Effect::Check(check),
                }
            }
            ValidatorDef::Effects {
                inner,
                effect: Effect::Refine { predicate, .. },
            } => ValidatorDef::Effects {
                inner: inner.clone(),
                effect: Effect::Refine {
                    predicate: predicate.clone(),
                    message: message.clone(),
                },
            },
            other => other.clone(),
        };
        self.derive_in_place(def)
    }

    /// Sets the message reported when the value is absent.
    pub fn required_message(&self, message: impl Into<String>) -> Self {
        let mut messages = self.node.messages.clone();
        messages.required = Some(message.into());
        Self::build(self.node.def.clone(), self.node.metadata.clone(), messages)
    }

    /// Sets the message reported when the value has the wrong type.
    pub fn invalid_type_message(&self, message: impl Into<String>) -> Self {
        let mut messages = self.node.messages.clone();
        messages.invalid_type = Some(message.into());
        Self::build(self.node.def.clone(), self.node.metadata.clone(), messages)
    }

    pub fn min(&self, value: f64) -> Self {
        self.check(CheckKind::Min(value))
    }

    pub fn max(&self, value: f64) -> Self {
        self.check(CheckKind::Max(value))
    }

    pub fn length(&self, len: usize) -> Self {
        self.check(CheckKind::Length(len))
    }

    pub fn email(&self) -> Self {
        self.check(CheckKind::Email)
    }

    pub fn url(&self) -> Self {
        self.check(CheckKind::Url)
    }

    pub fn uuid(&self) -> Self {
        self.check(CheckKind::Uuid)
    }

    pub fn regex(&self, pattern: Regex) -> Self {
        self.check(CheckKind::Regex(pattern))
    }

    pub fn starts_with(&self, prefix: impl Into<String>) -> Self {
        self.check(CheckKind::StartsWith(prefix.into()))
    }

    pub fn ends_with(&self, suffix: impl Into<String>) -> Self {
        self.check(CheckKind::EndsWith(suffix.into()))
    }

    pub fn int(&self) -> Self {
        self.check(CheckKind::Int)
    }

    pub fn positive(&self) -> Self {
        self.check(CheckKind::Positive)
    }

    pub fn negative(&self) -> Self {
        self.check(CheckKind::Negative)
    }

    pub fn nonnegative(&self) -> Self {
        self.check(CheckKind::NonNegative)
    }

    pub fn nonpositive(&self) -> Self {
        self.check(CheckKind::NonPositive)
    }

    /// Accepts absence in addition to whatever this validator accepts.
    pub fn optional(&self) -> Self {
        self.derive(ValidatorDef::Optional(self.clone()))
    }

    /// Accepts JSON `null` in addition to whatever this validator accepts.
    pub fn nullable(&self) -> Self {
        self.derive(ValidatorDef::Nullable(self.clone()))
    }

    pub fn nullish(&self) -> Self {
        self.nullable().optional()
    }

    /// Substitutes `value` when the input is absent.
    pub fn default(&self, value: impl Into<Value>) -> Self {
        self.derive(ValidatorDef::Default {
            inner: self.clone(),
            value: value.into(),
        })
    }

    /// Substitutes `value` when validation fails.
    pub fn catch(&self, value: impl Into<Value>) -> Self {
        self.derive(ValidatorDef::Catch {
            inner: self.clone(),
            value: value.into(),
        })
    }

    /// Rejects parsed values for which `predicate` returns `false`.
    pub fn refine<F>(&self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.derive(ValidatorDef::Effects {
            inner: self.clone(),
            effect: Effect::Refine {
                predicate: Arc::new(predicate),
                message: message.into(),
            },
        })
    }

    /// Maps parsed values through `f`.
    pub fn transform<F>(&self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.derive(ValidatorDef::Effects {
            inner: self.clone(),
            effect: Effect::Transform(Arc::new(f)),
        })
    }

    /// Feeds this validator's output into `next`.
    pub fn pipe(&self, next: &Validator) -> Self {
        self.derive(ValidatorDef::Pipe {
            input: self.clone(),
            output: next.clone(),
        })
    }

    /// Array whose elements must satisfy this validator.
    pub fn array(&self) -> Self {
        self.derive(ValidatorDef::Array {
            element: self.clone(),
            checks: Vec::new(),
        })
    }

    /// Validates `input`, returning the (possibly transformed) output.
    ///
    /// `None` means the value is absent. `Ok(None)` means absence was
    /// accepted.
    pub fn parse(&self, input: Option<&Value>) -> Result<Option<Value>, ValidationError> {
        match &self.node.def {
            ValidatorDef::Any => Ok(input.cloned()),
            ValidatorDef::Optional(inner) => match input {
                None => Ok(None),
                Some(_) => inner.parse(input),
            },
            ValidatorDef::Nullable(inner) => match input {
                Some(Value::Null) => Ok(Some(Value::Null)),
                _ => inner.parse(input),
            },
            ValidatorDef::Default { inner, value } => match input {
                None => inner.parse(Some(value)),
                Some(_) => inner.parse(input),
            },
            ValidatorDef::Catch { inner, value } => match inner.parse(input) {
                Ok(out) => Ok(out),
                Err(_) => Ok(Some(value.clone())),
            },
            ValidatorDef::Effects { inner, effect } => {
                let out = inner.parse(input)?;
                apply_effect(effect, out)
            }
            ValidatorDef::Pipe { input: first, output } => {
                let intermediate = first.parse(input)?;
                output.parse(intermediate.as_ref())
            }
            ValidatorDef::Union(options) => {
                for option in options {
                    if let Ok(out) = option.parse(input) {
                        return Ok(out);
                    }
                }
                Err(ValidationError::single("Invalid input"))
            }
            ValidatorDef::Lazy(lazy) => lazy.resolve().parse(input),
            _ => match input {
                None => Err(ValidationError::single(
                    self.node
                        .messages
                        .required
                        .clone()
                        .unwrap_or_else(|| DEFAULT_REQUIRED_MESSAGE.to_string()),
                )),
                Some(value) => self.parse_present(value).map(Some),
            },
        }
    }

    /// Validates a present value.
    pub fn parse_value(&self, value: &Value) -> Result<Option<Value>, ValidationError> {
        self.parse(Some(value))
    }

    fn parse_present(&self, value: &Value) -> Result<Value, ValidationError> {
        match &self.node.def {
            ValidatorDef::String { checks } => match value {
                Value::String(_) => run_checks(checks, value).map(|_| value.clone()),
                other => Err(self.invalid_type("string", other)),
            },
            ValidatorDef::Number { checks, coerce } => {
                let number = match value {
                    Value::Number(n) if n.is_f64() => n.as_f64().and_then(number_value),
                    Value::Number(_) => Some(value.clone()),
                    Value::String(s) if *coerce => parse_number(s.trim()),
                    Value::Bool(b) if *coerce => Some(Value::from(u8::from(*b))),
                    _ => None,
                };
                let number = number.ok_or_else(|| self.invalid_type("number", value))?;
                run_checks(checks, &number)?;
                Ok(number)
            }
            ValidatorDef::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                other => Err(self.invalid_type("boolean", other)),
            },
            ValidatorDef::Date => match value {
                Value::String(s) if is_date(s) => Ok(value.clone()),
                Value::String(_) => Err(ValidationError::single(
                    self.node
                        .messages
                        .invalid_type
                        .clone()
                        .unwrap_or_else(|| "Invalid date".to_string()),
                )),
                other => Err(self.invalid_type("date", other)),
            },
            ValidatorDef::Literal(expected) => {
                if value == expected {
                    Ok(value.clone())
                } else {
                    Err(ValidationError::single(format!(
                        "Invalid literal value, expected {expected}"
                    )))
                }
            }
            ValidatorDef::Enum(values) => match value {
                Value::String(s) if values.iter().any(|v| v == s) => Ok(value.clone()),
                _ => Err(ValidationError::single(format!(
                    "Invalid enum value. Expected {}",
                    values
                        .iter()
                        .map(|v| format!("'{v}'"))
                        .collect::<Vec<_>>()
                        .join(" | ")
                ))),
            },
            ValidatorDef::Array { element, checks } => match value {
                Value::Array(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    let mut issues = Vec::new();
                    for (index, item) in items.iter().enumerate() {
                        match element.parse(Some(item)) {
                            Ok(parsed) => out.push(parsed.unwrap_or(Value::Null)),
                            Err(err) => issues.extend(err.prefixed(&index.to_string()).issues),
                        }
                    }
                    if !issues.is_empty() {
                        return Err(ValidationError { issues });
                    }
                    let out = Value::Array(out);
                    run_checks(checks, &out)?;
                    Ok(out)
                }
                other => Err(self.invalid_type("array", other)),
            },
            ValidatorDef::Object(fields) => match value {
                Value::Object(map) => {
                    let mut out = Map::new();
                    let mut issues = Vec::new();
                    for (key, field) in fields {
                        match field.parse(map.get(key)) {
                            Ok(Some(parsed)) => {
                                out.insert(key.clone(), parsed);
                            }
                            Ok(None) => {}
                            Err(err) => issues.extend(err.prefixed(key).issues),
                        }
                    }
                    if issues.is_empty() {
                        Ok(Value::Object(out))
                    } else {
                        Err(ValidationError { issues })
                    }
                }
                other => Err(self.invalid_type("object", other)),
            },
            // Wrapper kinds are handled in `parse`.
            other => Err(ValidationError::single(format!(
                "unsupported {} node",
                other.name()
            ))),
        }
    }

    fn invalid_type(&self, expected: &str, received: &Value) -> ValidationError {
        ValidationError::single(self.node.messages.invalid_type.clone().unwrap_or_else(|| {
            format!("Expected {expected}, received {}", value_type_name(received))
        }))
    }
}

fn apply_effect(effect: &Effect, out: Option<Value>) -> Result<Option<Value>, ValidationError> {
    let Some(value) = out else {
        return Ok(None);
    };
    match effect {
        Effect::Refine { predicate, message } => {
            if predicate(&value) {
                Ok(Some(value))
            } else {
                Err(ValidationError::single(message.clone()))
            }
        }
        Effect::Transform(f) => Ok(Some(f(value))),
        Effect::Check(check) => check.apply(&value).map(|_| Some(value)),
    }
}

fn run_checks(checks: &[Check], value: &Value) -> Result<(), ValidationError> {
    let issues: Vec<ValidationIssue> = checks
        .iter()
        .filter_map(|check| check.apply(value).err())
        .flat_map(|err| err.issues)
        .collect();
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

fn parse_number(s: &str) -> Option<Value> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::from(i));
    }
    if let Ok(u) = s.parse::<u64>() {
        return Some(Value::from(u));
    }
    s.parse::<f64>().ok().and_then(number_value)
}

fn number_value(f: f64) -> Option<Value> {
    if !f.is_finite() {
        return None;
    }
    if f.fract() == 0.0 && f.abs() < 9.0e15 {
        Some(Value::Number(Number::from(f as i64)))
    } else {
        Number::from_f64(f).map(Value::Number)
    }
}

fn is_date(s: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(s).is_ok()
        || chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
