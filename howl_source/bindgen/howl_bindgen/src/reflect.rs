//! Immutable view of a Forge reflection snapshot.
//! The engine's header tool dumps every reflected class/struct/enum (members
//! in declaration order, qualifier flags as raw bitmasks) plus the ordered
//! top-level export requests; this module deserializes that JSON and resolves
//! all name references into typed handles. Member order is a contract: stub
//! and glue output depend on it, so vectors are never reordered.

use bitflags::bitflags;
use howl_ids::{ClassId, EnumId, FunctionId, PropertyId, StructId};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::{GenError, Result};

// === Qualifier flags ===
// Bit values match the masks written by the Forge header tool.

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ClassFlags: u32 {
        /// Class exposes a stable runtime type descriptor from its module.
        const REQUIRED_API = 1 << 0;
        /// Type descriptor exposed through the minimal API surface.
        const MINIMAL_API = 1 << 1;
        /// Derives from the engine's actor branch.
        const ACTOR = 1 << 2;
        const DEPRECATED = 1 << 3;
        const TRANSIENT = 1 << 4;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StructFlags: u32 {
        /// Struct carries default-constructible metadata.
        const HAS_DEFAULTS = 1 << 0;
        /// Struct requires exported linkage.
        const REQUIRED_API = 1 << 1;
        /// Struct has a native copy assignment operator.
        const COPY_NATIVE = 1 << 2;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FunctionFlags: u32 {
        const STATIC = 1 << 0;
        /// Function is itself a delegate signature, not a callable.
        const DELEGATE = 1 << 1;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PropertyFlags: u32 {
        /// Property may be written from outside the owning type.
        const EDITABLE = 1 << 0;
        /// Parameter is an output slot.
        const OUT = 1 << 1;
        /// Parameter is the return slot.
        const RETURN = 1 << 2;
    }
}

macro_rules! impl_flags_deserialize {
    ($flags:ty) => {
        impl<'de> Deserialize<'de> for $flags {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                Ok(Self::from_bits_truncate(u32::deserialize(deserializer)?))
            }
        }
    };
}

impl_flags_deserialize!(ClassFlags);
impl_flags_deserialize!(StructFlags);
impl_flags_deserialize!(FunctionFlags);
impl_flags_deserialize!(PropertyFlags);

// === Raw snapshot (wire format) ===

#[derive(Debug, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub classes: Vec<RawClass>,
    #[serde(default)]
    pub structs: Vec<RawStruct>,
    #[serde(default)]
    pub enums: Vec<RawEnum>,
    #[serde(default)]
    pub requests: Vec<RawRequest>,
}

#[derive(Debug, Deserialize)]
pub struct RawClass {
    pub name: String,
    pub native_name: String,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub flags: ClassFlags,
    #[serde(default)]
    pub properties: Vec<RawProperty>,
    #[serde(default)]
    pub functions: Vec<RawFunction>,
    #[serde(default)]
    pub meta: FxHashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct RawStruct {
    pub name: String,
    pub native_name: String,
    #[serde(default)]
    pub superstruct: Option<String>,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub flags: StructFlags,
    #[serde(default)]
    pub properties: Vec<RawProperty>,
    #[serde(default)]
    pub meta: FxHashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct RawEnum {
    pub name: String,
    pub native_name: String,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub entries: Vec<RawEnumEntry>,
    #[serde(default)]
    pub meta: FxHashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct RawEnumEntry {
    pub name: String,
    /// Stable ordinal; absent when the header tool could not resolve the
    /// entry's token to a fixed value.
    #[serde(default)]
    pub index: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RawProperty {
    pub name: String,
    #[serde(flatten)]
    pub kind: RawTypeRef,
    #[serde(default)]
    pub flags: PropertyFlags,
    #[serde(default)]
    pub meta: FxHashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct RawFunction {
    pub name: String,
    #[serde(default)]
    pub flags: FunctionFlags,
    #[serde(default)]
    pub params: Vec<RawProperty>,
    #[serde(default)]
    pub meta: FxHashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct RawRequest {
    pub class: String,
    #[serde(default)]
    pub header: String,
    #[serde(default = "default_true")]
    pub changed: bool,
}

fn default_true() -> bool {
    true
}

/// Type reference as written by the header tool.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawTypeRef {
    Bool,
    Int,
    Int64,
    Float,
    Double,
    Byte {
        #[serde(default)]
        enum_name: Option<String>,
    },
    Str,
    Name,
    Text,
    Struct {
        struct_name: String,
    },
    Class,
    Object {
        class_name: String,
    },
    WeakObject {
        class_name: String,
    },
    LazyObject {
        class_name: String,
    },
    AssetObject {
        class_name: String,
    },
    AssetClass {
        class_name: String,
    },
    Interface {
        class_name: String,
    },
    Delegate,
    MulticastDelegate,
    Array {
        element: Box<RawTypeRef>,
    },
}

// === Resolved graph ===

/// Closed union of source property kinds. Classification matches over this
/// exhaustively; adding a kind here forces every consumer to decide on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    Bool,
    Int,
    Int64,
    Float,
    Double,
    Byte { enum_ref: Option<EnumId> },
    Str,
    Name,
    Text,
    Struct { struct_ref: StructId },
    Class,
    Object { class_ref: ClassId },
    WeakObject { class_ref: ClassId },
    LazyObject { class_ref: ClassId },
    AssetObject { class_ref: ClassId },
    AssetClass { class_ref: ClassId },
    Interface { class_ref: ClassId },
    Delegate,
    MulticastDelegate,
    Array { element: Box<PropertyKind> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberOwner {
    Class(ClassId),
    Struct(StructId),
    Function(FunctionId),
}

#[derive(Debug)]
pub struct ClassDef {
    pub name: String,
    pub native_name: String,
    pub superclass: Option<ClassId>,
    pub header: String,
    pub flags: ClassFlags,
    pub properties: Vec<PropertyId>,
    pub functions: Vec<FunctionId>,
    pub meta: FxHashMap<String, String>,
}

#[derive(Debug)]
pub struct StructDef {
    pub name: String,
    pub native_name: String,
    pub superstruct: Option<StructId>,
    pub header: String,
    pub flags: StructFlags,
    pub properties: Vec<PropertyId>,
    pub meta: FxHashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    pub name: String,
    pub index: Option<u32>,
}

#[derive(Debug)]
pub struct EnumDef {
    pub name: String,
    pub native_name: String,
    pub header: String,
    pub entries: Vec<EnumEntry>,
    pub meta: FxHashMap<String, String>,
}

#[derive(Debug)]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
    pub flags: PropertyFlags,
    pub owner: MemberOwner,
    pub meta: FxHashMap<String, String>,
}

#[derive(Debug)]
pub struct FunctionDef {
    pub name: String,
    pub owner: ClassId,
    pub flags: FunctionFlags,
    pub params: Vec<PropertyId>,
    pub meta: FxHashMap<String, String>,
}

/// One top-level export request from the host.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub class: ClassId,
    pub header: String,
    pub changed: bool,
}

#[derive(Debug)]
pub struct ReflectionGraph {
    classes: Vec<ClassDef>,
    structs: Vec<StructDef>,
    enums: Vec<EnumDef>,
    functions: Vec<FunctionDef>,
    properties: Vec<PropertyDef>,
    class_by_name: FxHashMap<String, ClassId>,
    struct_by_name: FxHashMap<String, StructId>,
    enum_by_name: FxHashMap<String, EnumId>,
    pub requests: Vec<ExportRequest>,
}

impl ReflectionGraph {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut class_by_name = FxHashMap::default();
        for (i, raw) in snapshot.classes.iter().enumerate() {
            class_by_name.insert(raw.name.clone(), ClassId::new(i));
        }
        let mut struct_by_name = FxHashMap::default();
        for (i, raw) in snapshot.structs.iter().enumerate() {
            struct_by_name.insert(raw.name.clone(), StructId::new(i));
        }
        let mut enum_by_name = FxHashMap::default();
        for (i, raw) in snapshot.enums.iter().enumerate() {
            enum_by_name.insert(raw.name.clone(), EnumId::new(i));
        }

        let enums: Vec<EnumDef> = snapshot
            .enums
            .into_iter()
            .map(|raw| EnumDef {
                name: raw.name,
                native_name: raw.native_name,
                header: raw.header,
                entries: raw
                    .entries
                    .into_iter()
                    .map(|e| EnumEntry {
                        name: e.name,
                        index: e.index,
                    })
                    .collect(),
                meta: raw.meta,
            })
            .collect();

        let names = NameMaps {
            classes: &class_by_name,
            structs: &struct_by_name,
            enums: &enum_by_name,
        };

        let mut properties: Vec<PropertyDef> = Vec::new();
        let mut functions: Vec<FunctionDef> = Vec::new();

        let mut classes: Vec<ClassDef> = Vec::with_capacity(snapshot.classes.len());
        for (i, raw) in snapshot.classes.into_iter().enumerate() {
            let class_id = ClassId::new(i);
            let superclass = match &raw.superclass {
                Some(name) => Some(*class_by_name.get(name).ok_or_else(|| {
                    GenError::DanglingRef {
                        name: name.clone(),
                        referrer: format!("class {}", raw.name),
                    }
                })?),
                None => None,
            };

            let mut prop_ids = Vec::with_capacity(raw.properties.len());
            for rp in raw.properties {
                prop_ids.push(push_property(
                    &mut properties,
                    rp,
                    MemberOwner::Class(class_id),
                    &raw.name,
                    &names,
                )?);
            }

            let mut fn_ids = Vec::with_capacity(raw.functions.len());
            for rf in raw.functions {
                let fn_id = FunctionId::new(functions.len());
                let referrer = format!("{}::{}", raw.name, rf.name);
                let mut param_ids = Vec::with_capacity(rf.params.len());
                for rp in rf.params {
                    param_ids.push(push_property(
                        &mut properties,
                        rp,
                        MemberOwner::Function(fn_id),
                        &referrer,
                        &names,
                    )?);
                }
                functions.push(FunctionDef {
                    name: rf.name,
                    owner: class_id,
                    flags: rf.flags,
                    params: param_ids,
                    meta: rf.meta,
                });
                fn_ids.push(fn_id);
            }

            classes.push(ClassDef {
                name: raw.name,
                native_name: raw.native_name,
                superclass,
                header: raw.header,
                flags: raw.flags,
                properties: prop_ids,
                functions: fn_ids,
                meta: raw.meta,
            });
        }

        let mut structs: Vec<StructDef> = Vec::with_capacity(snapshot.structs.len());
        for (i, raw) in snapshot.structs.into_iter().enumerate() {
            let struct_id = StructId::new(i);
            let superstruct = match &raw.superstruct {
                Some(name) => Some(*struct_by_name.get(name).ok_or_else(|| {
                    GenError::DanglingRef {
                        name: name.clone(),
                        referrer: format!("struct {}", raw.name),
                    }
                })?),
                None => None,
            };

            let mut prop_ids = Vec::with_capacity(raw.properties.len());
            for rp in raw.properties {
                prop_ids.push(push_property(
                    &mut properties,
                    rp,
                    MemberOwner::Struct(struct_id),
                    &raw.name,
                    &names,
                )?);
            }

            structs.push(StructDef {
                name: raw.name,
                native_name: raw.native_name,
                superstruct,
                header: raw.header,
                flags: raw.flags,
                properties: prop_ids,
                meta: raw.meta,
            });
        }

        let mut requests = Vec::with_capacity(snapshot.requests.len());
        for raw in snapshot.requests {
            let class = *class_by_name
                .get(&raw.class)
                .ok_or_else(|| GenError::DanglingRef {
                    name: raw.class.clone(),
                    referrer: "export request".to_string(),
                })?;
            let header = if raw.header.is_empty() {
                classes[class.index()].header.clone()
            } else {
                raw.header
            };
            requests.push(ExportRequest {
                class,
                header,
                changed: raw.changed,
            });
        }

        Ok(Self {
            classes,
            structs,
            enums,
            functions,
            properties,
            class_by_name,
            struct_by_name,
            enum_by_name,
            requests,
        })
    }

    // === Lookup ===

    pub fn class(&self, id: ClassId) -> &ClassDef {
        &self.classes[id.index()]
    }

    pub fn struct_def(&self, id: StructId) -> &StructDef {
        &self.structs[id.index()]
    }

    pub fn enum_def(&self, id: EnumId) -> &EnumDef {
        &self.enums[id.index()]
    }

    pub fn function(&self, id: FunctionId) -> &FunctionDef {
        &self.functions[id.index()]
    }

    pub fn property(&self, id: PropertyId) -> &PropertyDef {
        &self.properties[id.index()]
    }

    pub fn find_class(&self, name: &str) -> Option<ClassId> {
        self.class_by_name.get(name).copied()
    }

    pub fn find_struct(&self, name: &str) -> Option<StructId> {
        self.struct_by_name.get(name).copied()
    }

    pub fn find_enum(&self, name: &str) -> Option<EnumId> {
        self.enum_by_name.get(name).copied()
    }

    // === Traversal ===

    /// Superclass chain, root first, `id` last.
    pub fn class_lineage(&self, id: ClassId) -> Vec<ClassId> {
        let mut lineage = vec![id];
        let mut current = id;
        // Malformed snapshots could cycle; cap at the table size.
        while let Some(superclass) = self.class(current).superclass {
            if lineage.len() > self.classes.len() {
                break;
            }
            lineage.push(superclass);
            current = superclass;
        }
        lineage.reverse();
        lineage
    }

    /// Superstruct chain, root first, `id` last.
    pub fn struct_lineage(&self, id: StructId) -> Vec<StructId> {
        let mut lineage = vec![id];
        let mut current = id;
        while let Some(superstruct) = self.struct_def(current).superstruct {
            if lineage.len() > self.structs.len() {
                break;
            }
            lineage.push(superstruct);
            current = superstruct;
        }
        lineage.reverse();
        lineage
    }

    /// Functions visible on `id`: its own declarations first, then each
    /// ancestor's, in declaration order. Callers filter by owner.
    pub fn class_functions_in_scope(&self, id: ClassId) -> Vec<FunctionId> {
        let mut lineage = self.class_lineage(id);
        lineage.reverse();
        lineage
            .into_iter()
            .flat_map(|cid| self.class(cid).functions.iter().copied())
            .collect()
    }

    /// Properties visible on `id`, own declarations first. Callers filter
    /// by owner.
    pub fn class_properties_in_scope(&self, id: ClassId) -> Vec<PropertyId> {
        let mut lineage = self.class_lineage(id);
        lineage.reverse();
        lineage
            .into_iter()
            .flat_map(|cid| self.class(cid).properties.iter().copied())
            .collect()
    }

    pub fn struct_properties_in_scope(&self, id: StructId) -> Vec<PropertyId> {
        let mut lineage = self.struct_lineage(id);
        lineage.reverse();
        lineage
            .into_iter()
            .flat_map(|sid| self.struct_def(sid).properties.iter().copied())
            .collect()
    }

    /// Return-slot parameter of a function, if any.
    pub fn return_param(&self, id: FunctionId) -> Option<PropertyId> {
        self.function(id)
            .params
            .iter()
            .copied()
            .find(|pid| self.property(*pid).flags.contains(PropertyFlags::RETURN))
    }
}

struct NameMaps<'a> {
    classes: &'a FxHashMap<String, ClassId>,
    structs: &'a FxHashMap<String, StructId>,
    enums: &'a FxHashMap<String, EnumId>,
}

fn push_property(
    arena: &mut Vec<PropertyDef>,
    raw: RawProperty,
    owner: MemberOwner,
    owner_name: &str,
    names: &NameMaps<'_>,
) -> Result<PropertyId> {
    let referrer = format!("{}.{}", owner_name, raw.name);
    let kind = resolve_type_ref(raw.kind, &referrer, names)?;
    let id = PropertyId::new(arena.len());
    arena.push(PropertyDef {
        name: raw.name,
        kind,
        flags: raw.flags,
        owner,
        meta: raw.meta,
    });
    Ok(id)
}

fn resolve_type_ref(raw: RawTypeRef, referrer: &str, names: &NameMaps<'_>) -> Result<PropertyKind> {
    let lookup_class = |name: &str| -> Result<ClassId> {
        names
            .classes
            .get(name)
            .copied()
            .ok_or_else(|| GenError::DanglingRef {
                name: name.to_string(),
                referrer: referrer.to_string(),
            })
    };

    Ok(match raw {
        RawTypeRef::Bool => PropertyKind::Bool,
        RawTypeRef::Int => PropertyKind::Int,
        RawTypeRef::Int64 => PropertyKind::Int64,
        RawTypeRef::Float => PropertyKind::Float,
        RawTypeRef::Double => PropertyKind::Double,
        RawTypeRef::Byte { enum_name } => PropertyKind::Byte {
            enum_ref: match enum_name {
                Some(name) => {
                    Some(
                        names
                            .enums
                            .get(&name)
                            .copied()
                            .ok_or_else(|| GenError::DanglingRef {
                                name,
                                referrer: referrer.to_string(),
                            })?,
                    )
                }
                None => None,
            },
        },
        RawTypeRef::Str => PropertyKind::Str,
        RawTypeRef::Name => PropertyKind::Name,
        RawTypeRef::Text => PropertyKind::Text,
        RawTypeRef::Struct { struct_name } => PropertyKind::Struct {
            struct_ref: names.structs.get(&struct_name).copied().ok_or_else(|| {
                GenError::DanglingRef {
                    name: struct_name,
                    referrer: referrer.to_string(),
                }
            })?,
        },
        RawTypeRef::Class => PropertyKind::Class,
        RawTypeRef::Object { class_name } => PropertyKind::Object {
            class_ref: lookup_class(&class_name)?,
        },
        RawTypeRef::WeakObject { class_name } => PropertyKind::WeakObject {
            class_ref: lookup_class(&class_name)?,
        },
        RawTypeRef::LazyObject { class_name } => PropertyKind::LazyObject {
            class_ref: lookup_class(&class_name)?,
        },
        RawTypeRef::AssetObject { class_name } => PropertyKind::AssetObject {
            class_ref: lookup_class(&class_name)?,
        },
        RawTypeRef::AssetClass { class_name } => PropertyKind::AssetClass {
            class_ref: lookup_class(&class_name)?,
        },
        RawTypeRef::Interface { class_name } => PropertyKind::Interface {
            class_ref: lookup_class(&class_name)?,
        },
        RawTypeRef::Delegate => PropertyKind::Delegate,
        RawTypeRef::MulticastDelegate => PropertyKind::MulticastDelegate,
        RawTypeRef::Array { element } => PropertyKind::Array {
            element: Box::new(resolve_type_ref(*element, referrer, names)?),
        },
    })
}

// === Test graph helpers ===

#[cfg(test)]
pub(crate) mod testkit {
    use super::*;

    pub fn prop(name: &str, kind: RawTypeRef) -> RawProperty {
        RawProperty {
            name: name.to_string(),
            kind,
            flags: PropertyFlags::empty(),
            meta: FxHashMap::default(),
        }
    }

    pub fn prop_flags(name: &str, kind: RawTypeRef, flags: PropertyFlags) -> RawProperty {
        RawProperty {
            flags,
            ..prop(name, kind)
        }
    }

    pub fn ret(kind: RawTypeRef) -> RawProperty {
        prop_flags("ReturnValue", kind, PropertyFlags::RETURN)
    }

    pub fn func(name: &str, params: Vec<RawProperty>) -> RawFunction {
        RawFunction {
            name: name.to_string(),
            flags: FunctionFlags::empty(),
            params,
            meta: FxHashMap::default(),
        }
    }

    pub fn class(name: &str, superclass: Option<&str>) -> RawClass {
        RawClass {
            name: name.to_string(),
            native_name: format!("Fg{name}"),
            superclass: superclass.map(str::to_string),
            header: format!("Forge/{name}.h"),
            flags: ClassFlags::REQUIRED_API,
            properties: Vec::new(),
            functions: Vec::new(),
            meta: FxHashMap::default(),
        }
    }

    /// The universal base class every test graph needs.
    pub fn object_class() -> RawClass {
        class("Object", None)
    }

    pub fn strukt(name: &str, flags: StructFlags) -> RawStruct {
        RawStruct {
            name: name.to_string(),
            native_name: format!("Fg{name}"),
            superstruct: None,
            header: format!("Forge/{name}.h"),
            flags,
            properties: Vec::new(),
            meta: FxHashMap::default(),
        }
    }

    pub fn enum_(name: &str, entries: &[(&str, Option<u32>)]) -> RawEnum {
        RawEnum {
            name: name.to_string(),
            native_name: format!("Fg{name}"),
            header: format!("Forge/{name}.h"),
            entries: entries
                .iter()
                .map(|(entry_name, index)| RawEnumEntry {
                    name: entry_name.to_string(),
                    index: *index,
                })
                .collect(),
            meta: FxHashMap::default(),
        }
    }

    pub fn request(class: &str) -> RawRequest {
        RawRequest {
            class: class.to_string(),
            header: String::new(),
            changed: true,
        }
    }

    pub fn graph(classes: Vec<RawClass>, structs: Vec<RawStruct>, enums: Vec<RawEnum>) -> ReflectionGraph {
        snapshot_graph(classes, structs, enums, Vec::new())
    }

    pub fn snapshot_graph(
        classes: Vec<RawClass>,
        structs: Vec<RawStruct>,
        enums: Vec<RawEnum>,
        requests: Vec<RawRequest>,
    ) -> ReflectionGraph {
        ReflectionGraph::from_snapshot(Snapshot {
            classes,
            structs,
            enums,
            requests,
        })
        .expect("test snapshot failed to resolve")
    }
}

#[cfg(test)]
mod tests {
    use super::testkit::*;
    use super::*;

    #[test]
    fn resolves_members_in_declaration_order() {
        let mut actor = class("Actor", Some("Object"));
        actor.properties = vec![
            prop("Health", RawTypeRef::Float),
            prop("Score", RawTypeRef::Int),
        ];
        actor.functions = vec![func("Jump", vec![]), func("Duck", vec![])];
        let graph = graph(vec![object_class(), actor], vec![], vec![]);

        let actor_id = graph.find_class("Actor").expect("Actor missing");
        let def = graph.class(actor_id);
        let prop_names: Vec<&str> = def
            .properties
            .iter()
            .map(|pid| graph.property(*pid).name.as_str())
            .collect();
        assert_eq!(prop_names, ["Health", "Score"]);
        let fn_names: Vec<&str> = def
            .functions
            .iter()
            .map(|fid| graph.function(*fid).name.as_str())
            .collect();
        assert_eq!(fn_names, ["Jump", "Duck"]);
    }

    #[test]
    fn lineage_is_root_first() {
        let graph = graph(
            vec![
                object_class(),
                class("Actor", Some("Object")),
                class("Pawn", Some("Actor")),
            ],
            vec![],
            vec![],
        );
        let pawn = graph.find_class("Pawn").expect("Pawn missing");
        let names: Vec<&str> = graph
            .class_lineage(pawn)
            .into_iter()
            .map(|id| graph.class(id).name.as_str())
            .collect();
        assert_eq!(names, ["Object", "Actor", "Pawn"]);
    }

    #[test]
    fn in_scope_members_put_own_declarations_first() {
        let mut base = class("Actor", Some("Object"));
        base.functions = vec![func("BaseOnly", vec![])];
        let mut derived = class("Pawn", Some("Actor"));
        derived.functions = vec![func("DerivedOnly", vec![])];
        let graph = graph(vec![object_class(), base, derived], vec![], vec![]);

        let pawn = graph.find_class("Pawn").expect("Pawn missing");
        let names: Vec<&str> = graph
            .class_functions_in_scope(pawn)
            .into_iter()
            .map(|fid| graph.function(fid).name.as_str())
            .collect();
        assert_eq!(names, ["DerivedOnly", "BaseOnly"]);

        let derived_own = graph
            .class_functions_in_scope(pawn)
            .into_iter()
            .filter(|fid| graph.function(*fid).owner == pawn)
            .count();
        assert_eq!(derived_own, 1);
    }

    #[test]
    fn dangling_reference_is_an_error() {
        let mut actor = class("Actor", Some("Object"));
        actor.properties = vec![prop(
            "Target",
            RawTypeRef::Object {
                class_name: "MissingClass".to_string(),
            },
        )];
        let err = ReflectionGraph::from_snapshot(Snapshot {
            classes: vec![object_class(), actor],
            structs: vec![],
            enums: vec![],
            requests: vec![],
        })
        .expect_err("expected dangling reference failure");
        assert!(matches!(err, GenError::DanglingRef { name, .. } if name == "MissingClass"));
    }

    #[test]
    fn snapshot_json_round_trips_through_serde() {
        let json = r#"{
            "classes": [
                {
                    "name": "Object",
                    "native_name": "FgObject",
                    "flags": 1
                },
                {
                    "name": "Actor",
                    "native_name": "FgActor",
                    "superclass": "Object",
                    "header": "GameFramework/Actor.h",
                    "flags": 5,
                    "properties": [
                        { "name": "bHidden", "kind": "bool", "flags": 1 },
                        { "name": "Tags", "kind": "array", "element": { "kind": "name" } }
                    ],
                    "functions": [
                        {
                            "name": "TakeDamage",
                            "params": [
                                { "name": "Amount", "kind": "float" },
                                { "name": "ReturnValue", "kind": "float", "flags": 4 }
                            ],
                            "meta": { "Tooltip": "Apply damage to this actor." }
                        }
                    ]
                }
            ],
            "requests": [ { "class": "Actor", "changed": false } ]
        }"#;

        let graph = ReflectionGraph::from_json_str(json).expect("snapshot failed to parse");
        let actor = graph.find_class("Actor").expect("Actor missing");
        assert!(graph.class(actor).flags.contains(ClassFlags::ACTOR));
        assert_eq!(graph.requests.len(), 1);
        assert!(!graph.requests[0].changed);
        // Request header falls back to the class's own header.
        assert_eq!(graph.requests[0].header, "GameFramework/Actor.h");

        let take_damage = graph.class(actor).functions[0];
        let ret = graph.return_param(take_damage).expect("return slot missing");
        assert_eq!(graph.property(ret).kind, PropertyKind::Float);

        let tags = graph.class(actor).properties[1];
        assert!(matches!(
            &graph.property(tags).kind,
            PropertyKind::Array { element } if **element == PropertyKind::Name
        ));
    }
}
