//! The master glue translation unit, `HwFg.generated.inl`. The runtime
//! compiles this one file; it pulls in every per-entity header and source
//! and defines the single registration entry point.

use crate::emit::writer::CodeWriter;
use crate::paths;

/// One exported entity, in discovery order. Static class mappings are
/// registered for classes only; structs have no runtime class descriptor.
#[derive(Debug, Clone)]
pub struct MasterEntry {
    pub script_name: String,
    pub is_class: bool,
}

const RUNTIME_INCLUDES: [&str; 7] = [
    "Howl/HwClass.hpp",
    "Howl/HwBrain.hpp",
    "Howl/HwInvokedMethod.hpp",
    "Howl/HwInteger.hpp",
    "Howl/HwReal.hpp",
    "Howl/HwBoolean.hpp",
    "Howl/HwString.hpp",
];

pub fn master_glue(entries: &[MasterEntry]) -> String {
    let mut w = CodeWriter::new();
    w.blank();

    for include in RUNTIME_INCLUDES {
        w.line(&format!("#include \"{include}\""));
    }
    w.blank();

    for entry in entries {
        w.line(&format!(
            "#include \"{}\"",
            paths::glue_header_name(&entry.script_name)
        ));
    }
    w.blank();

    for entry in entries {
        w.line(&format!(
            "#include \"{}\"",
            paths::glue_source_name(&entry.script_name)
        ));
    }
    w.blank();

    w.open("namespace HwFg");
    w.blank();
    w.open("void register_bindings()");
    for entry in entries {
        w.line(&format!("HwFg{}::register_bindings();", entry.script_name));
    }
    w.blank();
    w.line(&format!(
        "HwClassBindingHelper::reset_static_class_mappings({});",
        entries.len()
    ));
    for entry in entries.iter().filter(|e| e.is_class) {
        w.line(&format!(
            "HwClassBindingHelper::add_static_class_mapping(HwFg{}::ms_class_p, HwFg{}::ms_fgclass_p);",
            entry.script_name, entry.script_name
        ));
    }
    w.close("");
    w.blank();
    w.close(" // HwFg");

    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(script_name: &str, is_class: bool) -> MasterEntry {
        MasterEntry {
            script_name: script_name.to_string(),
            is_class,
        }
    }

    #[test]
    fn master_file_includes_and_registers_in_discovery_order() {
        let entries = vec![
            entry("Entity", true),
            entry("Actor", true),
            entry("HitResult", false),
        ];
        let code = master_glue(&entries);

        assert!(code.contains("#include \"Howl/HwBrain.hpp\""));
        assert!(code.contains("#include \"HwFgActor.generated.hpp\""));
        assert!(code.contains("#include \"HwFgActor.generated.inl\""));
        // All headers precede all sources.
        let last_header = code.rfind(".generated.hpp\"").unwrap();
        let first_source = code.find(".generated.inl\"").unwrap();
        assert!(last_header < first_source);
        // Registration preserves discovery order.
        let entity_reg = code.find("HwFgEntity::register_bindings();").unwrap();
        let actor_reg = code.find("HwFgActor::register_bindings();").unwrap();
        let hit_reg = code.find("HwFgHitResult::register_bindings();").unwrap();
        assert!(entity_reg < actor_reg && actor_reg < hit_reg);
    }

    #[test]
    fn static_mappings_count_all_entities_but_list_classes_only() {
        let entries = vec![
            entry("Entity", true),
            entry("Actor", true),
            entry("HitResult", false),
        ];
        let code = master_glue(&entries);

        assert!(code.contains("HwClassBindingHelper::reset_static_class_mappings(3);"));
        assert!(code.contains(
            "HwClassBindingHelper::add_static_class_mapping(HwFgActor::ms_class_p, HwFgActor::ms_fgclass_p);"
        ));
        assert!(!code.contains("add_static_class_mapping(HwFgHitResult"));
    }

    #[test]
    fn empty_export_set_still_produces_a_valid_unit() {
        let code = master_glue(&[]);
        assert!(code.contains("namespace HwFg"));
        assert!(code.contains("void register_bindings()"));
        assert!(code.contains("reset_static_class_mappings(0);"));
    }
}
