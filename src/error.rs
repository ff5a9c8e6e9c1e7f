//! The crate's error taxonomy.
//!
//! Every fallible operation in Hadar returns [`Result`], whose error variants are taxonomically
//! distinct so that callers (and, in particular, the remote backend's HTTP layer) can match on the
//! specific failure rather than parsing a message string.
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type returned by all fallible Hadar operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A quantity or cost could not be broadcast to `(nb_scn, horizon)`.
    #[error("shape error: {0}")]
    Shape(String),

    /// Two elements attached to the same node share a name.
    #[error("duplicate name '{name}' on node '{node}'")]
    DuplicateName {
        /// The node on which the name collided.
        node: String,
        /// The duplicated element name.
        name: String,
    },

    /// A link refers to a node that was never declared.
    #[error("unknown node '{0}' referenced by a link")]
    UnknownNode(String),

    /// Two pipeline stages could not be composed because the downstream stage's required inputs
    /// are not a subset of the upstream stage's outputs.
    #[error("cannot link stages: inputs {missing:?} are not produced by the upstream stage (which outputs {available:?})")]
    PipelineLink {
        /// Inputs required by the downstream stage but absent from the upstream outputs.
        missing: Vec<String>,
        /// Outputs actually produced by the upstream stage.
        available: Vec<String>,
    },

    /// The LP solver could not find a feasible solution.
    #[error(
        "infeasible problem (scenario {scenario}{}{})",
        node.as_ref().map(|n| format!(", node '{n}'")).unwrap_or_default(),
        time.map(|t| format!(", timestep {t}")).unwrap_or_default()
    )]
    Infeasible {
        /// The scenario in which infeasibility was detected.
        scenario: usize,
        /// The node at which infeasibility was detected, if known.
        node: Option<String>,
        /// The timestep at which infeasibility was detected, if known.
        time: Option<usize>,
    },

    /// A worker failed for a reason other than infeasibility (solver panic, internal error).
    #[error(
        "optimisation worker failed for scenario {scenario}{}{}: {reason}",
        node.as_ref().map(|n| format!(", node '{n}'")).unwrap_or_default(),
        time.map(|t| format!(", timestep {t}")).unwrap_or_default()
    )]
    Optimizer {
        /// The scenario the failing worker was processing.
        scenario: usize,
        /// The node the failing worker was processing, if known.
        node: Option<String>,
        /// The timestep the failing worker was processing, if known.
        time: Option<usize>,
        /// The underlying failure reason.
        reason: String,
    },

    /// The remote backend rejected the request (HTTP 403/404).
    #[error("remote backend authentication/lookup failed: {0}")]
    Auth(String),

    /// The remote backend failed for an I/O-ish reason (HTTP 5xx, connection error).
    #[error("remote backend I/O error: {0}")]
    RemoteIo(String),

    /// The solve did not complete before the requested deadline.
    #[error("solve did not complete within the deadline; {pending} scenario batch(es) still in flight")]
    Timeout {
        /// Number of batches still outstanding when the deadline elapsed.
        pending: usize,
    },

    /// `solve(..., kind)` was called with an unrecognised backend kind.
    #[error("unsupported solve backend: {0}")]
    UnsupportedBackend(String),
}
