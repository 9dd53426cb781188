//! Maps reflected property kinds to canonical Howl types.
//! Classification is pure: the walker layers export scheduling on top of the
//! returned tag, never this module.

use howl_ids::{ClassId, EnumId, StructId};

use crate::naming;
use crate::reflect::{ClassFlags, PropertyKind, ReflectionGraph, StructFlags};

/// Canonical Howl-side type of one property or parameter. `None` means the
/// owning member cannot be bound. Lists never nest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    None,
    Integer,
    Real,
    Boolean,
    String,
    Name,
    Vector2,
    Vector3,
    Vector4,
    Rotation,
    RotationAngles,
    Transform,
    Color,
    Enum(EnumId),
    Struct(StructId),
    ClassRef,
    ObjectRef(ClassId),
    List(Box<TypeTag>),
}

impl TypeTag {
    pub fn is_supported(&self) -> bool {
        !matches!(self, TypeTag::None)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, TypeTag::Boolean)
    }

    /// Variant name for diagnostics and fatal errors.
    pub fn tag_name(&self) -> &'static str {
        match self {
            TypeTag::None => "None",
            TypeTag::Integer => "Integer",
            TypeTag::Real => "Real",
            TypeTag::Boolean => "Boolean",
            TypeTag::String => "String",
            TypeTag::Name => "Name",
            TypeTag::Vector2 => "Vector2",
            TypeTag::Vector3 => "Vector3",
            TypeTag::Vector4 => "Vector4",
            TypeTag::Rotation => "Rotation",
            TypeTag::RotationAngles => "RotationAngles",
            TypeTag::Transform => "Transform",
            TypeTag::Color => "Color",
            TypeTag::Enum(_) => "Enum",
            TypeTag::Struct(_) => "Struct",
            TypeTag::ClassRef => "ClassRef",
            TypeTag::ObjectRef(_) => "ObjectRef",
            TypeTag::List(_) => "List",
        }
    }

    /// Howl class name this tag appears as in stubs.
    pub fn script_name(&self, graph: &ReflectionGraph) -> String {
        match self {
            TypeTag::None => "nil".to_string(),
            TypeTag::Integer => "Integer".to_string(),
            TypeTag::Real => "Real".to_string(),
            TypeTag::Boolean => "Boolean".to_string(),
            TypeTag::String => "String".to_string(),
            TypeTag::Name => "Name".to_string(),
            TypeTag::Vector2 => "Vector2".to_string(),
            TypeTag::Vector3 => "Vector3".to_string(),
            TypeTag::Vector4 => "Vector4".to_string(),
            TypeTag::Rotation => "Rotation".to_string(),
            TypeTag::RotationAngles => "RotationAngles".to_string(),
            TypeTag::Transform => "Transform".to_string(),
            TypeTag::Color => "Color".to_string(),
            TypeTag::Enum(id) => naming::class_name(&graph.enum_def(*id).name),
            TypeTag::Struct(id) => naming::class_name(&graph.struct_def(*id).name),
            TypeTag::ClassRef => "EntityClass".to_string(),
            TypeTag::ObjectRef(id) => naming::class_name(&graph.class(*id).name),
            TypeTag::List(_) => "List".to_string(),
        }
    }
}

/// A class exposes a stable runtime type descriptor when its module exports
/// one, or when it is the universal base.
pub fn has_static_descriptor(graph: &ReflectionGraph, id: ClassId) -> bool {
    let class = graph.class(id);
    class
        .flags
        .intersects(ClassFlags::REQUIRED_API | ClassFlags::MINIMAL_API)
        || class.superclass.is_none()
}

/// Structs qualify when they carry default-constructible metadata or require
/// exported linkage.
pub fn is_struct_supported(graph: &ReflectionGraph, id: StructId) -> bool {
    graph
        .struct_def(id)
        .flags
        .intersects(StructFlags::HAS_DEFAULTS | StructFlags::REQUIRED_API)
}

pub fn classify(graph: &ReflectionGraph, kind: &PropertyKind) -> TypeTag {
    match kind {
        PropertyKind::Bool => TypeTag::Boolean,
        PropertyKind::Int => TypeTag::Integer,
        PropertyKind::Float => TypeTag::Real,
        PropertyKind::Str => TypeTag::String,
        PropertyKind::Name => TypeTag::Name,
        PropertyKind::Byte { enum_ref } => match enum_ref {
            Some(id) => TypeTag::Enum(*id),
            None => TypeTag::None,
        },
        PropertyKind::Struct { struct_ref } => classify_struct(graph, *struct_ref),
        PropertyKind::Class => TypeTag::ClassRef,
        PropertyKind::Object { class_ref } => {
            if has_static_descriptor(graph, *class_ref) {
                TypeTag::ObjectRef(*class_ref)
            } else {
                TypeTag::None
            }
        }
        PropertyKind::Array { element } => {
            let inner = classify(graph, element);
            if inner.is_supported() && !matches!(inner, TypeTag::List(_)) {
                TypeTag::List(Box::new(inner))
            } else {
                TypeTag::None
            }
        }
        // Everything below has no Howl representation.
        PropertyKind::Int64
        | PropertyKind::Double
        | PropertyKind::Text
        | PropertyKind::WeakObject { .. }
        | PropertyKind::LazyObject { .. }
        | PropertyKind::AssetObject { .. }
        | PropertyKind::AssetClass { .. }
        | PropertyKind::Interface { .. }
        | PropertyKind::Delegate
        | PropertyKind::MulticastDelegate => TypeTag::None,
    }
}

fn classify_struct(graph: &ReflectionGraph, id: StructId) -> TypeTag {
    // Engine math and color types have dedicated Howl classes; identity is
    // matched on the reflected struct name.
    match graph.struct_def(id).name.as_str() {
        "Vector2D" => TypeTag::Vector2,
        "Vector" => TypeTag::Vector3,
        "Vector4" => TypeTag::Vector4,
        "Quat" => TypeTag::Rotation,
        "Rotator" => TypeTag::RotationAngles,
        "Transform" => TypeTag::Transform,
        "Color" | "LinearColor" => TypeTag::Color,
        _ if is_struct_supported(graph, id) => TypeTag::Struct(id),
        _ => TypeTag::None,
    }
}
