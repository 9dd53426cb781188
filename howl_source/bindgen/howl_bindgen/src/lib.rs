//! Binding generator for the Howl scripting runtime. Walks a reflection
//! snapshot of the Forge native modules and emits the script-side class
//! stubs together with the C++ glue that marshals calls across the
//! boundary. [`GeneratorSession`] drives one full run.

pub mod classify;
pub mod config;
pub mod emit;
pub mod error;
pub mod naming;
pub mod paths;
pub mod reflect;
pub mod session;
pub mod stage;

pub use config::BindgenConfig;
pub use error::{GenError, Result};
pub use reflect::ReflectionGraph;
pub use session::{GeneratorSession, RunSummary};
pub use stage::content_digest;
