//! The linear-programming solve backend: domain records, mappers, objective and adequacy
//! builders, and the batch solver driver (§4.3–§4.8).
pub mod adequacy;
pub mod domain;
pub mod driver;
pub mod mapper;
pub mod objective;

pub use driver::{solve, SolveOptions};
