//! # FlatConverter - a flat-model conversion layer for MIP/NLP solver drivers
//!
//! FlatConverter sits between a modeling language's flat output (a pool of
//! variables, an objective, and a pool of algebraic/logical/combinatorial
//! constraints) and a commercial solver's native API. A solver only accepts
//! a subset of the constraint taxonomy a modeling language can emit; this
//! crate iteratively rewrites whatever a target [`ModelAPI`] declares it does
//! not accept into forms it does, until every constraint left in the model
//! is one the solver can ingest natively.
//!
//! The conversion loop ([`FlatConverter::convert_items`]) drains one
//! [`crate::keeper::ConstraintKeeper`] per concrete constraint type, in a
//! fixed round-robin order, until a full pass adds nothing new. Every
//! rewrite rule goes through [`FlatConverter`] so that deduplication, bound
//! propagation, and the [`presolve::ValuePresolver`]'s postsolve DAG stay
//! consistent no matter which rule fired.
//!
//! A solver binding implements two small traits to plug into this: a
//! [`ModelAPI`] (the push side: add variables/constraints/objectives) and a
//! [`backend::Backend`] (the solve side: run, then read back a solution).
//! [`testkit`] provides in-memory implementations of both for use in tests
//! and by `flatconvert-cli`'s demo mode.

pub mod backend;
pub mod bounds;
pub mod constraints;
pub mod context;
pub mod convert;
pub mod error;
pub mod keeper;
pub mod kind;
pub mod model;
pub mod model_api;
pub mod options;
pub mod presolve;
pub mod testkit;
pub mod var;

pub use backend::{Backend, Interrupter, Solution, Status};
pub use context::Context;
pub use convert::{ConvertRule, FlatConverter};
pub use error::ConvertError;
pub use kind::{Acceptance, ConstraintKind};
pub use model::FlatModel;
pub use model_api::ModelAPI;
pub use options::ConvertOptions;
pub use var::{Num, VarId, VarType};
