//! OVALScan Eval - OVAL info-state evaluation engine
//!
//! This crate decides whether a package or OS identity matches an OVAL state:
//! - RPM version decomposition and ordering (`rpmvercmp`)
//! - Scalar and EVR comparators over the OVAL operation vocabulary
//! - Logical operators folding per-field results
//! - `InfoState` with its software and OS-version entry points
//!
//! Everything here is pure and immutable after construction.

pub mod comparator;
pub mod evr;
pub mod observe;
pub mod operation;
pub mod operator;
pub mod state;

pub use comparator::{Comparator, EvrComparator, ScalarComparator};
pub use evr::{compare_evr, rpmvercmp, Evr, EvrParts};
pub use observe::{EvalObserver, NoopObserver, TracingObserver};
pub use operation::{Datatype, Operation};
pub use operator::Operator;
pub use state::{InfoState, InfoStateBuilder, StateField};
