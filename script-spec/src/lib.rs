//! Building a lookup table of Bitcoin Script opcodes from reference tables.
//!
//! The opcode tables on the Bitcoin wiki are written for people: a single
//! row may describe an alias pair (`OP_1, OP_TRUE`), a numbered range
//! (`OP_2-OP_16`), or both at once. This crate normalizes such rows into one
//! [`Opcode`] per mnemonic and collects them into a [`Specification`].
//!
//! ```
//! use script_spec::{build_from_text, CollisionPolicy};
//!
//! let table = "OP_2-OP_16\t82-96\t0x52-0x60\tNothing.\t2-16\tThe number is pushed.";
//! let (spec, _) = build_from_text(table, CollisionPolicy::Warn);
//!
//! let op = spec.get("OP_5").unwrap();
//! assert_eq!(op.code, "0x55");
//! assert_eq!(op.outputs, "5");
//! ```

mod builder;
mod diagnostics;
pub mod disasm;
mod error;
pub mod mnemonic;
mod normalize;
mod opcode;
pub mod rows;

pub use builder::{build_from_text, BuildSummary, CollisionPolicy, SpecBuilder};
pub use diagnostics::{Diagnostic, Diagnostics, LogDiagnostics};
pub use error::{RowError, RowErrorKind};
pub use normalize::{normalize, Normalized, RowStatus};
pub use opcode::{Opcode, Specification};
