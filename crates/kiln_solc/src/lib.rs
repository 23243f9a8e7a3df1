//! Standard-JSON interface to the Solidity compiler.
//!
//! [`CompilerInput`] describes one component's build, [`Compiler`] is the
//! capability that turns it into a [`CompilerOutput`], and [`Solc`] is the
//! implementation that runs a `solc` executable. Decoding the output into
//! [`kiln_source::Contract`] records fails with every compiler diagnostic
//! when the compiler reported any.

#![warn(missing_docs)]

pub mod compiler;
pub mod error;
pub mod input;
pub mod output;

pub use compiler::{Compiler, Solc};
pub use error::SolcError;
pub use input::{CompilerInput, MetadataSettings, OptimizerSettings, Settings, SourceEntry};
pub use output::{
    CompiledSources, CompilerOutput, ContractOutput, Diagnostic, EvmOutput, SourceOutput,
};
