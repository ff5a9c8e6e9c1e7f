//! Hadar: an adequacy simulator for multi-energy systems.
//!
//! Given a network of nodes with electricity consumptions, productions, storages, and
//! inter-node links, each defined over a time horizon and multiple stochastic scenarios, Hadar
//! computes the least-cost dispatch that satisfies demand subject to production and transmission
//! limits (a linear program solved with [HiGHS](https://highs.dev)).
//!
//! Start with [`StudyBuilder`] to describe a study, then [`solve`] it:
//!
//! ```
//! use hadar::{solve, SolveKind, StudyBuilder};
//! use hadar::lp::SolveOptions;
//!
//! let study = StudyBuilder::new(1, 1)
//!     .network("default").unwrap()
//!     .node("a").unwrap()
//!     .consumption("load", 1.0e6, 100.0).unwrap()
//!     .production("gas", 10.0, 150.0).unwrap()
//!     .build()
//!     .unwrap();
//!
//! let result = solve(&study, &SolveKind::Lp, &SolveOptions::default()).unwrap();
//! ```
//!
//! Before attaching raw input data, it is usually transformed by a [`pipeline::Pipeline`] of
//! [`pipeline::stages`] (clipping, renaming, fault injection, scenario repetition).
#![warn(missing_docs)]

pub mod builder;
pub mod domain;
pub mod error;
pub mod log;
pub mod lp;
pub mod pipeline;
pub mod remote;
pub mod result;
pub mod solve;

pub use builder::StudyBuilder;
pub use domain::{Consumption, IntoMatrix, Link, Network, Node, Production, ScenarioTimeMatrix, Storage, Study};
pub use error::{Error, Result};
pub use pipeline::{Pipeline, Plug, ScenarioTable, Stage};
pub use result::Result as SolveResult;
pub use solve::{solve, SolveKind};
