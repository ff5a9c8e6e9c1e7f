//! The `solve(study, kind, ...)` facade (§4.9).
use crate::domain::Study;
use crate::error::{Error, Result};
use crate::lp;
use crate::remote;
use crate::result::Result as HadarResult;

/// Which backend `solve` should dispatch to.
#[derive(Clone, Debug)]
pub enum SolveKind {
    /// Solve locally with the batch HiGHS-backed driver (§4.7).
    Lp,
    /// Serialize the study to a remote HTTP endpoint and solve there (§6.2).
    Remote {
        /// Endpoint URL.
        url: String,
        /// Bearer auth token.
        token: String,
    },
}

impl SolveKind {
    /// Resolve a backend name (as might come from a config file or CLI flag) into a
    /// [`SolveKind`].
    ///
    /// `"lp"` needs no further parameters; `"remote"` requires `remote_url` (and an optional
    /// `remote_token`, defaulting to an empty token). Any other name — or `"remote"` without a
    /// url — is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBackend`] for any name other than `"lp"` or `"remote"`, or for
    /// `"remote"` without a `remote_url`.
    pub fn parse(name: &str, remote_url: Option<String>, remote_token: Option<String>) -> Result<Self> {
        match name {
            "lp" => Ok(Self::Lp),
            "remote" => {
                let url = remote_url
                    .ok_or_else(|| Error::UnsupportedBackend("remote backend requires a url".to_string()))?;
                Ok(Self::Remote {
                    url,
                    token: remote_token.unwrap_or_default(),
                })
            }
            other => Err(Error::UnsupportedBackend(other.to_string())),
        }
    }
}

/// Solve `study` with the given backend.
///
/// # Errors
///
/// Whatever [`lp::solve`] or [`remote::solve`] returns for the chosen `kind`.
pub fn solve(study: &Study, kind: &SolveKind, options: &lp::SolveOptions) -> Result<HadarResult> {
    match kind {
        SolveKind::Lp => {
            let values = lp::solve(study, options)?;
            Ok(HadarResult::assemble(study, &values))
        }
        SolveKind::Remote { url, token } => remote::solve(study, url, token, options.deadline),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lp() {
        assert!(matches!(SolveKind::parse("lp", None, None).unwrap(), SolveKind::Lp));
    }

    #[test]
    fn test_parse_remote_requires_url() {
        let err = SolveKind::parse("remote", None, None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedBackend(_)));
    }

    #[test]
    fn test_parse_unknown_backend_errors() {
        let err = SolveKind::parse("quantum", None, None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedBackend(_)));
    }
}
