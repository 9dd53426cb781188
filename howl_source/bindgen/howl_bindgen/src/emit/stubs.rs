//! Howl script stub texts.
//! One `.hwl` file per bound member plus the `!Class.hwl-meta` metadata file;
//! structs add lifecycle stubs and enums a class-data/constructor pair. Every
//! text here is a pure function of the reflection graph.

use std::fmt::Write as _;

use howl_ids::{ClassId, EnumId, FunctionId, PropertyId, StructId};
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::classify::{classify, TypeTag};
use crate::naming;
use crate::reflect::{
    FunctionDef, MemberOwner, PropertyDef, PropertyFlags, ReflectionGraph,
};

const COMMENT_WIDTH: usize = 76;
const TOOLTIP_KEY: &str = "Tooltip";
const CATEGORY_KEY: &str = "Category";

/// `@param FooBar` references inside tooltips get rewritten to the Howl
/// parameter name so the comment matches the stub signature below it.
static PARAM_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(@param\s+)([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Axis-assignment prefixes in default metadata (`X=1,Y=2` -> `1,2`).
static AXIS_ASSIGN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z_]+=").unwrap());

/// Trailing zeros after a nonzero fraction digit (`1.500` -> `1.5`).
static FRACTION_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\.[0-9]*[1-9])0+([^0-9]|$)").unwrap());

/// All-zero fractions keep exactly one zero (`2.000` -> `2.0`).
static ZERO_FRACTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.0+0([^0-9]|$)").unwrap());

// === Comment blocks ===

/// Generated banner shared by every member and metadata stub: the tooltip
/// (when present), the native origin, and the editor category.
pub fn comment_block(kind: &str, origin: &str, meta: &FxHashMap<String, String>) -> String {
    let mut out = String::with_capacity(256);
    if let Some(tooltip) = meta.get(TOOLTIP_KEY) {
        if !tooltip.is_empty() {
            let tooltip = PARAM_REF.replace_all(tooltip, |caps: &regex::Captures<'_>| {
                format!("{}{}", &caps[1], naming::var_name(&caps[2]).0)
            });
            for line in wrap_comment(&tooltip, COMMENT_WIDTH) {
                if line.is_empty() {
                    out.push_str("//\n");
                } else {
                    writeln!(out, "// {line}").unwrap();
                }
            }
        }
    }
    out.push_str("//\n");
    writeln!(out, "// Forge name of this {kind}: {origin}").unwrap();
    if let Some(category) = meta.get(CATEGORY_KEY) {
        writeln!(out, "// Category: {category}").unwrap();
    }
    out.push('\n');
    out
}

fn wrap_comment(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for source_line in text.lines() {
        if source_line.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in source_line.split_whitespace() {
            if !current.is_empty() && current.len() + 1 + word.len() > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

fn property_origin(graph: &ReflectionGraph, property: &PropertyDef) -> String {
    let owner_native = match property.owner {
        MemberOwner::Class(id) => &graph.class(id).native_name,
        MemberOwner::Struct(id) => &graph.struct_def(id).native_name,
        MemberOwner::Function(id) => &graph.class(graph.function(id).owner).native_name,
    };
    format!("{}::{}", owner_native, property.name)
}

// === Entity metadata stubs ===

pub fn class_meta_stub(graph: &ReflectionGraph, id: ClassId) -> String {
    let class = graph.class(id);
    comment_block("class", &class.native_name, &class.meta)
}

pub fn struct_meta_stub(graph: &ReflectionGraph, id: StructId) -> String {
    let struct_def = graph.struct_def(id);
    comment_block("struct", &struct_def.native_name, &struct_def.meta)
}

pub fn enum_meta_stub(graph: &ReflectionGraph, id: EnumId) -> String {
    let enum_def = graph.enum_def(id);
    comment_block("enum", &enum_def.native_name, &enum_def.meta)
}

// === Member stubs ===

/// Interface stub for a bound method: parameter list with resolvable default
/// annotations, then the return type when the method has a return slot.
pub fn method_stub(graph: &ReflectionGraph, id: FunctionId) -> String {
    let function = graph.function(id);
    let owner = graph.class(function.owner);
    let origin = format!("{}::{}", owner.native_name, function.name);
    let mut out = comment_block("method", &origin, &function.meta);

    let mut params = Vec::new();
    let mut return_type = None;
    for &pid in &function.params {
        let param = graph.property(pid);
        let tag = classify(graph, &param.kind);
        if param.flags.contains(PropertyFlags::RETURN) {
            return_type = Some(tag.script_name(graph));
            continue;
        }
        let mut piece = format!(
            "{} {}",
            tag.script_name(graph),
            naming::var_name(&param.name).0
        );
        if let Some(default) = default_annotation(graph, function, param, &tag) {
            piece.push_str(" : ");
            piece.push_str(&default);
        }
        params.push(piece);
    }

    match return_type {
        _ if params.is_empty() && return_type.is_none() => out.push_str("()\n"),
        Some(ret) => writeln!(out, "({}) {}", params.join(", "), ret).unwrap(),
        None => writeln!(out, "({})", params.join(", ")).unwrap(),
    }
    out
}

pub fn getter_stub(graph: &ReflectionGraph, id: PropertyId) -> String {
    let property = graph.property(id);
    let tag = classify(graph, &property.kind);
    let mut out = comment_block("property", &property_origin(graph, property), &property.meta);
    writeln!(out, "() {}", tag.script_name(graph)).unwrap();
    out
}

/// Setter stubs return the owning class so calls chain.
pub fn setter_stub(graph: &ReflectionGraph, id: PropertyId, owner_script_name: &str) -> String {
    let property = graph.property(id);
    let tag = classify(graph, &property.kind);
    let mut out = comment_block("property", &property_origin(graph, property), &property.meta);
    writeln!(
        out,
        "({} {}) {}",
        tag.script_name(graph),
        naming::var_name(&property.name).0,
        owner_script_name
    )
    .unwrap();
    out
}

// === Struct lifecycle stubs ===

pub fn struct_ctor_stub(script_name: &str) -> String {
    format!("() {script_name}\n")
}

pub fn struct_copy_ctor_stub(script_name: &str) -> String {
    format!("({script_name} other) {script_name}\n")
}

pub fn struct_assign_stub(script_name: &str) -> String {
    format!("({script_name} other) {script_name}\n")
}

pub fn struct_dtor_stub() -> String {
    "()\n".to_string()
}

// === Enum stubs ===

/// Class-data declarations, one `@@value` member per stable entry. Entries
/// arrive pre-filtered so sentinel and unresolvable values never show up.
pub fn enum_data_stub(script_name: &str, entries: &[(String, u32)]) -> String {
    let mut out = String::with_capacity(entries.len() * 24);
    for (value, _) in entries {
        writeln!(out, "{script_name} !@@{value}").unwrap();
    }
    out
}

/// Class constructor assigning each entry its stable ordinal.
pub fn enum_ctor_stub(script_name: &str, native_name: &str, entries: &[(String, u32)]) -> String {
    let mut out = String::with_capacity(entries.len() * 32 + 64);
    writeln!(out, "// {script_name}").unwrap();
    writeln!(out, "// Forge enum: {native_name}").unwrap();
    out.push('\n');
    out.push_str("()\n\n");
    out.push_str("  [\n");
    for (value, index) in entries {
        writeln!(out, "  @@{value}: {script_name}!int({index})").unwrap();
    }
    out.push_str("  ]\n");
    out
}

// === Default annotations ===

/// Resolves a parameter default from function metadata. The header tool
/// records defaults under the parameter's native name, falling back to the
/// `Default_`-prefixed key. Unresolvable defaults produce no annotation.
fn default_annotation(
    graph: &ReflectionGraph,
    function: &FunctionDef,
    param: &PropertyDef,
    tag: &TypeTag,
) -> Option<String> {
    let raw = function
        .meta
        .get(&param.name)
        .or_else(|| function.meta.get(&format!("Default_{}", param.name)))?;
    if raw.is_empty() {
        return trivial_default(graph, tag);
    }

    let cleaned = AXIS_ASSIGN.replace_all(raw, "");
    let cleaned = FRACTION_TAIL.replace_all(&cleaned, "${1}${2}");
    let cleaned = ZERO_FRACTION.replace_all(&cleaned, ".0${1}");
    format_default(graph, tag, &cleaned)
}

/// The `Type!` zero-value spelling used when the metadata records a default
/// but no literal text.
fn trivial_default(graph: &ReflectionGraph, tag: &TypeTag) -> Option<String> {
    match tag {
        TypeTag::Integer => Some("0".to_string()),
        TypeTag::Real => Some("0.0".to_string()),
        TypeTag::Boolean => Some("false".to_string()),
        TypeTag::String => Some("\"\"".to_string()),
        TypeTag::Name
        | TypeTag::Vector2
        | TypeTag::Vector3
        | TypeTag::Vector4
        | TypeTag::Rotation
        | TypeTag::RotationAngles
        | TypeTag::Transform
        | TypeTag::Color => Some(format!("{}!", tag.script_name(graph))),
        TypeTag::ClassRef | TypeTag::ObjectRef(_) => {
            Some(format!("{}!null", tag.script_name(graph)))
        }
        TypeTag::Enum(_) | TypeTag::Struct(_) | TypeTag::List(_) | TypeTag::None => None,
    }
}

fn format_default(graph: &ReflectionGraph, tag: &TypeTag, value: &str) -> Option<String> {
    match tag {
        TypeTag::Integer | TypeTag::Real => Some(value.to_string()),
        TypeTag::Boolean => Some(value.to_ascii_lowercase()),
        TypeTag::String => Some(format!("\"{value}\"")),
        TypeTag::Name => Some(format!("Name!(\"{value}\")")),
        TypeTag::Vector2 => Some(format!("Vector2!xy({value})")),
        TypeTag::Vector3 => Some(format!("Vector3!xyz({value})")),
        TypeTag::Vector4 => Some(format!("Vector4!xyzw({value})")),
        TypeTag::RotationAngles => Some(format!("RotationAngles!yaw_pitch_roll({value})")),
        TypeTag::Color => Some(format!("Color!rgba({value})")),
        TypeTag::Enum(id) => {
            let enum_def = graph.enum_def(*id);
            enum_def.entries.iter().find(|e| e.name == value).map(|e| {
                format!(
                    "{}.@@{}",
                    naming::class_name(&enum_def.name),
                    naming::enum_value_name(&e.name)
                )
            })
        }
        TypeTag::ObjectRef(_) => match value {
            // The host passes the world context implicitly on the script side.
            "WorldContext" => Some("@@world".to_string()),
            "None" => Some(format!("{}!null", tag.script_name(graph))),
            _ => None,
        },
        // No Howl literal spelling for these; the annotation is dropped.
        TypeTag::Rotation
        | TypeTag::Transform
        | TypeTag::ClassRef
        | TypeTag::Struct(_)
        | TypeTag::List(_)
        | TypeTag::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::testkit::*;
    use crate::reflect::RawTypeRef;

    fn damage_function() -> crate::reflect::RawFunction {
        let mut f = func(
            "TakeDamage",
            vec![
                prop("Amount", RawTypeRef::Float),
                ret(RawTypeRef::Float),
            ],
        );
        f.meta
            .insert("Tooltip".to_string(), "Apply damage to this actor.".to_string());
        f.meta.insert("Category".to_string(), "Combat".to_string());
        f.meta.insert("Amount".to_string(), "10.000000".to_string());
        f
    }

    #[test]
    fn comment_block_carries_origin_and_category() {
        let mut actor = class("Actor", Some("Object"));
        actor.functions = vec![damage_function()];
        let graph = graph(vec![object_class(), actor], vec![], vec![]);
        let actor_id = graph.find_class("Actor").unwrap();

        let stub = method_stub(&graph, graph.class(actor_id).functions[0]);
        assert!(stub.contains("// Apply damage to this actor.\n"));
        assert!(stub.contains("// Forge name of this method: FgActor::TakeDamage\n"));
        assert!(stub.contains("// Category: Combat\n"));
    }

    #[test]
    fn method_stub_lists_params_defaults_and_return() {
        let mut actor = class("Actor", Some("Object"));
        actor.functions = vec![damage_function()];
        let graph = graph(vec![object_class(), actor], vec![], vec![]);
        let actor_id = graph.find_class("Actor").unwrap();

        let stub = method_stub(&graph, graph.class(actor_id).functions[0]);
        assert!(stub.ends_with("(Real amount : 10.0) Real\n"), "{stub}");
    }

    #[test]
    fn parameterless_void_method_is_a_bare_signature() {
        let mut actor = class("Actor", Some("Object"));
        actor.functions = vec![func("Jump", vec![])];
        let graph = graph(vec![object_class(), actor], vec![], vec![]);
        let actor_id = graph.find_class("Actor").unwrap();

        let stub = method_stub(&graph, graph.class(actor_id).functions[0]);
        assert!(stub.ends_with("()\n"));
        // The banner is still present.
        assert!(stub.contains("// Forge name of this method: FgActor::Jump\n"));
    }

    #[test]
    fn long_tooltips_wrap_into_comment_lines() {
        let mut actor = class("Actor", Some("Object"));
        let mut jump = func("Jump", vec![]);
        jump.meta.insert(
            "Tooltip".to_string(),
            "word ".repeat(40).trim_end().to_string(),
        );
        actor.functions = vec![jump];
        let graph = graph(vec![object_class(), actor], vec![], vec![]);
        let actor_id = graph.find_class("Actor").unwrap();

        let stub = method_stub(&graph, graph.class(actor_id).functions[0]);
        let comment_lines = stub.lines().filter(|l| l.starts_with("// word")).count();
        assert!(comment_lines >= 3, "{stub}");
        for line in stub.lines().filter(|l| l.starts_with("//")) {
            assert!(line.len() <= COMMENT_WIDTH + 3, "overlong line: {line}");
        }
    }

    #[test]
    fn tooltip_param_references_use_howl_names() {
        let mut actor = class("Actor", Some("Object"));
        let mut teleport = func("Teleport", vec![prop("DestLocation", RawTypeRef::Float)]);
        teleport.meta.insert(
            "Tooltip".to_string(),
            "Moves there.\n@param DestLocation where to go".to_string(),
        );
        actor.functions = vec![teleport];
        let graph = graph(vec![object_class(), actor], vec![], vec![]);
        let actor_id = graph.find_class("Actor").unwrap();

        let stub = method_stub(&graph, graph.class(actor_id).functions[0]);
        assert!(stub.contains("@param dest_location where to go"), "{stub}");
    }

    #[test]
    fn accessor_stubs_show_type_and_chainable_owner() {
        let mut actor = class("Actor", Some("Object"));
        actor.properties = vec![prop("bHidden", RawTypeRef::Bool)];
        let graph = graph(vec![object_class(), actor], vec![], vec![]);
        let actor_id = graph.find_class("Actor").unwrap();
        let hidden = graph.class(actor_id).properties[0];

        assert!(getter_stub(&graph, hidden).ends_with("() Boolean\n"));
        assert!(setter_stub(&graph, hidden, "Actor").ends_with("(Boolean hidden) Actor\n"));
    }

    #[test]
    fn struct_lifecycle_stub_texts() {
        assert_eq!(struct_ctor_stub("HitResult"), "() HitResult\n");
        assert_eq!(
            struct_copy_ctor_stub("HitResult"),
            "(HitResult other) HitResult\n"
        );
        assert_eq!(
            struct_assign_stub("HitResult"),
            "(HitResult other) HitResult\n"
        );
        assert_eq!(struct_dtor_stub(), "()\n");
    }

    #[test]
    fn enum_stub_pair_declares_and_assigns_values() {
        let entries = vec![
            ("spot".to_string(), 0),
            ("point".to_string(), 1),
            ("world_".to_string(), 2),
        ];
        let data = enum_data_stub("LightMode", &entries);
        assert_eq!(
            data,
            "LightMode !@@spot\nLightMode !@@point\nLightMode !@@world_\n"
        );

        let ctor = enum_ctor_stub("LightMode", "FgLightMode", &entries);
        assert!(ctor.starts_with("// LightMode\n// Forge enum: FgLightMode\n"));
        assert!(ctor.contains("  @@spot: LightMode!int(0)\n"));
        assert!(ctor.contains("  @@world_: LightMode!int(2)\n"));
        assert!(ctor.trim_end().ends_with(']'));
    }

    #[test]
    fn default_annotations_format_per_type() {
        let mut actor = class("Actor", Some("Object"));
        let mut launch = func(
            "Launch",
            vec![
                prop("Location", RawTypeRef::Struct { struct_name: "Vector".to_string() }),
                prop("Label", RawTypeRef::Str),
                prop("Loud", RawTypeRef::Bool),
            ],
        );
        launch.meta.insert(
            "Location".to_string(),
            "X=1.500000,Y=0.000000,Z=10.000000".to_string(),
        );
        launch.meta.insert("Label".to_string(), "rocket".to_string());
        launch.meta.insert("Default_Loud".to_string(), "True".to_string());
        actor.functions = vec![launch];
        let graph = graph(
            vec![object_class(), actor],
            vec![strukt("Vector", crate::reflect::StructFlags::HAS_DEFAULTS)],
            vec![],
        );
        let actor_id = graph.find_class("Actor").unwrap();

        let stub = method_stub(&graph, graph.class(actor_id).functions[0]);
        assert!(
            stub.contains("Vector3 location : Vector3!xyz(1.5,0.0,10.0)"),
            "{stub}"
        );
        assert!(stub.contains("String label : \"rocket\""), "{stub}");
        assert!(stub.contains("Boolean loud : true"), "{stub}");
    }

    #[test]
    fn enum_defaults_qualify_the_entry() {
        let mut actor = class("Actor", Some("Object"));
        let mut set_mode = func(
            "SetMode",
            vec![prop(
                "Mode",
                RawTypeRef::Byte {
                    enum_name: Some("LightMode".to_string()),
                },
            )],
        );
        set_mode
            .meta
            .insert("Mode".to_string(), "Spot".to_string());
        actor.functions = vec![set_mode];
        let graph = graph(
            vec![object_class(), actor],
            vec![],
            vec![enum_("LightMode", &[("Spot", Some(0)), ("MAX", Some(1))])],
        );
        let actor_id = graph.find_class("Actor").unwrap();

        let stub = method_stub(&graph, graph.class(actor_id).functions[0]);
        assert!(stub.contains("LightMode mode : LightMode.@@spot"), "{stub}");
    }

    #[test]
    fn empty_default_metadata_falls_back_to_zero_values() {
        let mut actor = class("Actor", Some("Object"));
        let mut spawn = func(
            "Spawn",
            vec![
                prop("Count", RawTypeRef::Int),
                prop("At", RawTypeRef::Struct { struct_name: "Vector".to_string() }),
            ],
        );
        spawn.meta.insert("Count".to_string(), String::new());
        spawn.meta.insert("At".to_string(), String::new());
        actor.functions = vec![spawn];
        let graph = graph(
            vec![object_class(), actor],
            vec![strukt("Vector", crate::reflect::StructFlags::HAS_DEFAULTS)],
            vec![],
        );
        let actor_id = graph.find_class("Actor").unwrap();

        let stub = method_stub(&graph, graph.class(actor_id).functions[0]);
        assert!(stub.contains("Integer count : 0"), "{stub}");
        assert!(stub.contains("Vector3 at : Vector3!"), "{stub}");
    }

    #[test]
    fn unresolvable_defaults_are_omitted() {
        let mut actor = class("Actor", Some("Object"));
        actor.functions = vec![func("Jump", vec![prop("Height", RawTypeRef::Float)])];
        let graph = graph(vec![object_class(), actor], vec![], vec![]);
        let actor_id = graph.find_class("Actor").unwrap();

        let stub = method_stub(&graph, graph.class(actor_id).functions[0]);
        assert!(stub.ends_with("(Real height)\n"), "{stub}");
    }
}
