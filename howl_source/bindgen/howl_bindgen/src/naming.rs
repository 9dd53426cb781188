//! Native identifier to Howl identifier transforms.
//! All transforms are referentially transparent; results are used as binding
//! lookup keys, so same input must always produce same output.

use phf::phf_set;

use crate::classify::TypeTag;

/// Howl keywords. A transformed identifier may not collide with any of these.
static RESERVED_WORDS: phf::Set<&'static str> = phf_set! {
    "branch", "case", "divert", "else", "exit", "false", "fork", "if",
    "loop", "nil", "race", "rush", "skip", "sync", "this", "this_class",
    "this_code", "true", "unless", "when",
    "and", "nand", "nor", "not", "nxor", "or", "xor",
};

/// Howl global bindings that enum value names must not shadow.
const RESERVED_GLOBALS: &[&str] = &["world", "random"];

/// Class names pass through except for a fixed override table: the universal
/// base and the metaclass get Howl-side aliases, and an engine type named
/// `Enum` would shadow Howl's own Enum class.
pub fn class_name(native: &str) -> String {
    match native {
        "Object" => "Entity".to_string(),
        "Class" => "EntityClass".to_string(),
        "Enum" => "Enum2".to_string(),
        _ => native.to_string(),
    }
}

/// Converts a native variable name to Howl snake_case and reports whether the
/// name carried the boolean `b`-prefix convention (`bVisible` -> `visible`).
/// Case transitions become separators, digits count as uppercase, and a
/// result colliding with a reserved word is suffixed until it no longer does.
pub fn var_name(native: &str) -> (String, bool) {
    let chars: Vec<char> = native.chars().collect();
    let is_boolean =
        chars.len() > 1 && chars[0] == 'b' && chars[1].is_ascii_uppercase();
    let start = usize::from(is_boolean);

    let mut out = String::with_capacity(native.len() + 4);
    let mut prev_was_upper = true;
    let mut prev_was_separator = true;
    for &c in &chars[start..] {
        if c == '_' {
            if !prev_was_separator {
                out.push('_');
            }
            prev_was_upper = false;
            prev_was_separator = true;
            continue;
        }
        let is_upper = c.is_ascii_uppercase() || c.is_ascii_digit();
        if is_upper && !prev_was_upper && !prev_was_separator {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
        prev_was_upper = is_upper;
        prev_was_separator = false;
    }

    (escape_reserved(out), is_boolean)
}

/// Converts a native function name to its Howl method name. Applies the
/// variable transform, strips a versioning prefix (`k2_`-style), rewrites
/// `get_`/`set_` accessor prefixes, and appends `?` when the name implies a
/// predicate and the return type really is boolean.
pub fn method_name(native: &str, return_tag: Option<&TypeTag>) -> String {
    let (converted, mut is_boolean) = var_name(native);
    let mut name = strip_version_prefix(&converted);

    let bytes = name.as_bytes();
    if bytes.len() > 4 && !bytes[4].is_ascii_digit() {
        if name.starts_with("get_") {
            name = name[4..].to_string();
            is_boolean = true;
        } else if name.starts_with("set_") {
            name = format!("{}_set", &name[4..]);
        }
    }

    if name.starts_with("is_") || name.starts_with("has_") || name.starts_with("can_") {
        is_boolean = true;
    }

    let mut name = escape_reserved(name);
    if is_boolean && matches!(return_tag, Some(TypeTag::Boolean)) {
        name.push('?');
    }
    name
}

/// Howl-legal enum value name. Applies the variable transform, then escapes
/// collisions with global bindings like `world`.
pub fn enum_value_name(native: &str) -> String {
    let (mut name, _) = var_name(native);
    while RESERVED_GLOBALS.contains(&name.as_str()) {
        name.push('_');
    }
    name
}

/// `?` is not legal in file names; the convention is `-Q`.
pub fn file_symbol(script_name: &str) -> String {
    script_name.replace('?', "-Q")
}

/// `?` is not legal in native glue symbols; the convention is `_Q`.
pub fn code_symbol(script_name: &str) -> String {
    script_name.replace('?', "_Q")
}

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(name)
}

fn escape_reserved(mut name: String) -> String {
    while RESERVED_WORDS.contains(name.as_str()) {
        name.push('_');
    }
    name
}

/// Strips a two-component versioning prefix (letter + digit + `_`, the
/// `k2_` convention) when the remainder does not start with a digit.
fn strip_version_prefix(name: &str) -> String {
    let bytes = name.as_bytes();
    if bytes.len() > 3
        && bytes[0].is_ascii_lowercase()
        && bytes[1].is_ascii_digit()
        && bytes[2] == b'_'
        && !bytes[3].is_ascii_digit()
    {
        return name[3..].to_string();
    }
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_names_pass_through_except_the_override_table() {
        assert_eq!(class_name("Actor"), "Actor");
        assert_eq!(class_name("Object"), "Entity");
        assert_eq!(class_name("Class"), "EntityClass");
        assert_eq!(class_name("Enum"), "Enum2");
    }

    #[test]
    fn var_names_snake_case_with_digit_boundaries() {
        assert_eq!(var_name("Health").0, "health");
        assert_eq!(var_name("MaxWalkSpeed").0, "max_walk_speed");
        assert_eq!(var_name("Vector2D").0, "vector_2d");
        assert_eq!(var_name("ServerURL").0, "server_url");
        assert_eq!(var_name("Already_Snaked").0, "already_snaked");
        assert_eq!(var_name("Double__Under").0, "double_under");
    }

    #[test]
    fn boolean_prefix_is_stripped_and_flagged() {
        let (name, is_boolean) = var_name("bVisible");
        assert_eq!(name, "visible");
        assert!(is_boolean);

        // A lowercase `b` followed by lowercase is just a name.
        let (name, is_boolean) = var_name("bone");
        assert_eq!(name, "bone");
        assert!(!is_boolean);
    }

    #[test]
    fn reserved_words_are_escaped_until_valid() {
        assert_eq!(var_name("Loop").0, "loop_");
        assert_eq!(var_name("This").0, "this_");
        assert!(!is_reserved_word(&var_name("Case").0));
    }

    #[test]
    fn method_names_strip_versioning_prefix() {
        assert_eq!(method_name("K2_DestroyActor", None), "destroy_actor");
        // Prefix followed by a digit is part of the real name.
        assert_eq!(method_name("K2_2DTransform", None), "k2_2dtransform");
        assert_eq!(method_name("Teleport", None), "teleport");
    }

    #[test]
    fn getter_prefix_implies_predicate_naming() {
        assert_eq!(
            method_name("GetVisible", Some(&TypeTag::Boolean)),
            "visible?"
        );
        // Boolean-style naming without a boolean return keeps the bare name.
        assert_eq!(method_name("GetHealth", Some(&TypeTag::Real)), "health");
        assert_eq!(
            method_name("IsFalling", Some(&TypeTag::Boolean)),
            "is_falling?"
        );
        assert_eq!(
            method_name("HasTag", Some(&TypeTag::Boolean)),
            "has_tag?"
        );
        assert_eq!(method_name("CanJump", None), "can_jump");
    }

    #[test]
    fn setter_prefix_becomes_suffix() {
        assert_eq!(method_name("SetActorLocation", None), "actor_location_set");
        // Too short to be an accessor prefix.
        assert_eq!(method_name("Settle", None), "settle");
    }

    #[test]
    fn stripped_accessor_may_expose_a_reserved_word() {
        assert_eq!(method_name("GetIf", None), "if_");
    }

    #[test]
    fn enum_value_names_avoid_globals() {
        assert_eq!(enum_value_name("World"), "world_");
        assert_eq!(enum_value_name("Random"), "random_");
        assert_eq!(enum_value_name("Spot"), "spot");
    }

    #[test]
    fn question_mark_mangling() {
        assert_eq!(file_symbol("visible?"), "visible-Q");
        assert_eq!(code_symbol("visible?"), "visible_Q");
        assert_eq!(file_symbol("teleport"), "teleport");
    }

    #[test]
    fn transforms_are_deterministic() {
        for name in ["bPendingKill", "K2_GetActorLocation", "SetOwner"] {
            assert_eq!(var_name(name), var_name(name));
            assert_eq!(method_name(name, None), method_name(name, None));
        }
    }
}
