pub mod rbs;

pub use rbs::{NamespacePolicy, Rbs, RbsSpec};
