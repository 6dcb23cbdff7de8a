//! Query compilation.
//!
//! The pieces here are pure: they accumulate predicates and payloads and compile them
//! into CQL text plus ordered bind parameters. Execution lives in [`crate::client`].
//!
//! ```ignore
//! use cqlkit::qb::{compile, Condition, Limit, Operation, Predicate, QueryParts};
//!
//! let predicates = vec![Predicate::and("id", Condition::eq(3))];
//! let q = compile(
//!     QueryParts::new(Operation::Select, "users")
//!         .predicates(&predicates)
//!         .limit(Some(Limit::Count(1))),
//! );
//! assert_eq!(q.cql, "SELECT * FROM users WHERE  id = ? LIMIT 1");
//! ```

mod compile;
mod param;
mod payload;
mod predicate;
mod state;

pub use compile::{CompiledQuery, Limit, Operation, QueryParts, compile};
pub use param::{BindParam, BindParams};
pub use payload::{Assignment, Payload};
pub use predicate::{BoolOp, Condition, Operand, Predicate};
pub use state::BuilderState;
