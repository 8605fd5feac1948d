//! Vela Stub Importer
//!
//! Resolves import paths to hand-assembled package stubs for the checker.
//! A [`Registry`] maps each supported path to a no-argument builder and
//! memoizes the built [`Package`](vela_types::Package); builders are either
//! declarative tables ([`stub`]) or hand-written constructions for cyclic
//! shapes ([`stdlib`]).

#![warn(missing_docs)]

pub mod registry;
pub mod stdlib;
pub mod stub;

pub use registry::{ImportError, Registry};
pub use stdlib::register_stdlib;
pub use stub::{build_stub, PackageStub};
