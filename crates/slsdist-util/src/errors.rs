use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all slsdist operations.
///
/// Product ids and dependency records are carried in their rendered form
/// (`group:name` and `group:name (min, max, rec)`) so this crate stays free of
/// domain types.
#[derive(Debug, Error, Diagnostic)]
pub enum DistError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed project configuration (e.g. slsdist.toml).
    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(slsdist::config),
        help("Check your slsdist.toml for syntax errors")
    )]
    Config { message: String },

    /// A product id string was not of the form `group:name`.
    #[error("Invalid product id '{value}', expected 'group:name'")]
    #[diagnostic(code(slsdist::product_id))]
    InvalidProductId { value: String },

    /// A version string is neither orderable nor non-orderable.
    #[error("{field} must be a valid version, got '{version}' in {context}")]
    #[diagnostic(code(slsdist::version_format))]
    InvalidVersionFormat {
        field: String,
        version: String,
        context: String,
    },

    /// An orderable comparison was requested on a version that is only non-orderable.
    #[error("Cannot order version '{version}' in {context}: only orderable versions can be compared")]
    #[diagnostic(
        code(slsdist::non_orderable),
        help("Use a release, -rcN, -betaN or -N-g<hash> version")
    )]
    NonOrderableVersion { version: String, context: String },

    /// A dependency record is structurally invalid (empty group or name).
    #[error("Invalid product dependency: {message}")]
    #[diagnostic(code(slsdist::invalid_dependency))]
    InvalidProductDependency { message: String },

    /// The consuming product declared a dependency on itself.
    #[error("Invalid for product to declare an explicit dependency on itself, please remove: {dependency}")]
    #[diagnostic(code(slsdist::self_dependency))]
    SelfDependency { product: String, dependency: String },

    /// Two declared records share one product id.
    #[error("Encountered duplicate declared product dependencies for '{product}':\n\t{first}\n\t{second}")]
    #[diagnostic(
        code(slsdist::duplicate_declaration),
        help("Merge the two declarations into one")
    )]
    DuplicateDeclaration {
        product: String,
        first: String,
        second: String,
    },

    /// A declared dependency is also listed as ignored.
    #[error("Encountered product dependency declaration that was also ignored for '{product}', either remove the dependency or ignore: {dependency}")]
    #[diagnostic(code(slsdist::ignored_conflict))]
    IgnoredConflict { product: String, dependency: String },

    /// A declared non-optional dependency is also listed as optional.
    #[error("Encountered product dependency declaration that was also declared as optional for '{product}', either remove the dependency or optional declaration: {dependency}")]
    #[diagnostic(
        code(slsdist::optional_conflict),
        help("Mark the declaration `optional = true`, or set `optional-policy = \"override\"`")
    )]
    OptionalConflict { product: String, dependency: String },

    /// Two records with different ids were handed to the merger.
    #[error("Product dependencies must share an id to be merged: '{left}' vs '{right}'")]
    #[diagnostic(code(slsdist::merge_identity))]
    MismatchedProductIds { left: String, right: String },

    /// The merged minimum exceeds the merged maximum.
    #[error("Could not merge product dependencies for '{product}' as their version ranges do not overlap: minimum {minimum} exceeds maximum {maximum}\n\t{left}\n\t{right}")]
    #[diagnostic(code(slsdist::version_range))]
    VersionRangeConflict {
        product: String,
        minimum: String,
        maximum: String,
        left: String,
        right: String,
    },

    /// A discovered dependency blob could not be decoded.
    #[error("Malformed recommended product dependencies: {message}")]
    #[diagnostic(code(slsdist::blob))]
    InvalidBlob { message: String },

    /// The lockfile could not be parsed.
    #[error("Failed to parse {path} line {line}: {message}")]
    #[diagnostic(code(slsdist::lockfile_parse))]
    LockfileParse {
        path: String,
        line: usize,
        message: String,
    },

    /// Check mode: product dependencies exist but no lockfile does.
    #[error("{path} does not exist, please run `slsdist manifest --write-locks` and commit the resultant file:\n{diff}")]
    #[diagnostic(code(slsdist::lockfile_missing))]
    LockfileMissing { path: String, diff: String },

    /// Check mode: the lockfile differs from the resolved dependencies.
    #[error("{path} is out of date, please run `slsdist manifest --write-locks` to update it:\n{diff}")]
    #[diagnostic(code(slsdist::lockfile_stale))]
    LockfileStale { path: String, diff: String },

    /// Check mode: no product dependencies resolved but a lockfile exists.
    #[error("{path} must not exist, please run `slsdist manifest --write-locks` to delete it")]
    #[diagnostic(code(slsdist::lockfile_stale_empty))]
    StaleEmptyLockfile { path: String },

    /// Manifest extensions tried to define a key the writer owns.
    #[error("Manifest extensions must not define the reserved key '{key}'")]
    #[diagnostic(
        code(slsdist::manifest_reserved_key),
        help("Use [[product-dependencies]] instead of setting 'product-dependencies' in [manifest-extensions]")
    )]
    ReservedManifestKey { key: String },

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Convenience alias for results carrying a [`DistError`].
pub type DistResult<T> = Result<T, DistError>;
