//! Generated-text emitters. Script stubs are plain strings; C++ glue goes
//! through [`writer::CodeWriter`] so brace depth stays checked. Emitters are
//! pure: the session decides which members are bound and in what order, the
//! emitters only render.

pub mod glue;
pub mod master;
pub mod stubs;
pub mod writer;

use howl_ids::{FunctionId, PropertyId};

pub use master::{master_glue, MasterEntry};
pub use writer::CodeWriter;

/// One bound member of an exported entity, in registration order.
#[derive(Debug, Clone)]
pub struct BoundMember {
    pub binding: MethodBinding,
    pub kind: BoundKind,
}

/// What a bound member dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Method(FunctionId),
    Getter(PropertyId),
    Setter(PropertyId),
}

/// Script and C++ identifiers for one bound member. Two members collide
/// when their script names match, regardless of origin.
#[derive(Debug, Clone)]
pub struct MethodBinding {
    /// Howl-side member name ("take_damage", "hidden?", "hidden_set").
    pub script_name: String,
    /// C++-safe spelling used in generated symbol names ("hidden_Q").
    pub code_name: String,
    pub is_static: bool,
}

impl MethodBinding {
    pub fn new(script_name: String, is_static: bool) -> Self {
        let code_name = crate::naming::code_symbol(&script_name);
        MethodBinding {
            script_name,
            code_name,
            is_static,
        }
    }
}

impl PartialEq for MethodBinding {
    fn eq(&self, other: &Self) -> bool {
        self.script_name == other.script_name
    }
}

impl Eq for MethodBinding {}
