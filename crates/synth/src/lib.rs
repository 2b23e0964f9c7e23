//! Declaration description synthesis
//!
//! Turns a declaration's comments and stored members into a
//! [`DescriptionNode`] tree. Everything in this crate is a pure function of
//! its input: no I/O, no shared state, no failure modes.

pub mod alias;
pub mod builder;
pub mod comment;
pub mod filter;
pub mod model;
pub mod node;


pub use alias::resolve;
pub use builder::{build, SynthesisOptions, Synthesizer};
pub use comment::classify;
pub use filter::is_eligible;
pub use model::{AliasTable, CommentBlock, CommentKind, Declaration, Member, StorageKind};
pub use node::DescriptionNode;
