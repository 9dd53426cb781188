//! Native glue emitters: per-entity wrapper headers (`HwFg<Name>.generated.hpp`)
//! and dispatch sources (`HwFg<Name>.generated.inl`).
//!
//! Every dispatch body follows the same plan: fetch arguments out of the
//! invoked-method scope into a flat params struct, call through the Forge
//! reflection entry point, write out-parameters back into the caller's
//! argument instances, then box the return value. The marshalling tables
//! below are deliberately exhaustive over [`TypeTag`]; a tag without a rule
//! is a fatal generator error, never silently skipped code.

use howl_ids::{name_id64, ClassId, FunctionId, PropertyId, StructId};

use crate::classify::{classify, TypeTag};
use crate::emit::writer::CodeWriter;
use crate::emit::{BoundKind, BoundMember, MethodBinding};
use crate::error::{GenError, Result};
use crate::reflect::{PropertyFlags, PropertyKind, ReflectionGraph};

// === Wrapper headers ===

/// Declaration of the binding wrapper for one exported class.
pub fn class_wrapper_header(
    script_name: &str,
    native_name: &str,
    is_actor: bool,
    header_include: Option<&str>,
) -> String {
    let base = if is_actor {
        "HwClassBindingActor"
    } else {
        "HwClassBindingEntity"
    };
    let mut w = CodeWriter::new();
    emit_header_prologue(&mut w, native_name, header_include);
    w.open(&format!(
        "class HwFg{script_name} : public {base}<HwFg{script_name}, {native_name}>"
    ));
    w.raw("public:\n");
    w.line("static void register_bindings();");
    w.close(";");
    w.finish()
}

/// Declaration of the binding wrapper for one exported struct. Structs carry
/// value semantics, so the wrapper states whether native assignment exists
/// and stubs out the assignment dispatch when it does not.
pub fn struct_wrapper_header(
    script_name: &str,
    native_name: &str,
    has_native_assign: bool,
    header_include: Option<&str>,
) -> String {
    let mut w = CodeWriter::new();
    emit_header_prologue(&mut w, native_name, header_include);
    w.open(&format!(
        "class HwFg{script_name} : public HwClassBindingStruct<HwFg{script_name}, {native_name}>"
    ));
    w.raw("public:\n");
    w.line(&format!(
        "enum {{ Binding_has_assign = {has_native_assign} }};"
    ));
    if !has_native_assign {
        w.line("static void mthd_op_assign(HwInvokedMethod * scope_p, HwInstance ** result_pp) {}");
    }
    w.line("static void register_bindings();");
    w.close(";");
    w.finish()
}

fn emit_header_prologue(w: &mut CodeWriter, native_name: &str, header_include: Option<&str>) {
    w.line("#pragma once");
    w.blank();
    w.line("#include <Bindings/HwClassBinding.hpp>");
    match header_include {
        Some(path) => w.line(&format!("#include <{path}>")),
        None => w.line(&format!(
            "// Include path for {native_name} unknown at generation time; the type must already be visible here"
        )),
    }
    w.blank();
}

// === Glue sources ===

/// Dispatch source for one exported class: one static thunk per bound
/// member inside a `HwFg<Name>_Impl` namespace, the registration tables,
/// and the `register_bindings` definition.
pub fn class_glue_source(
    graph: &ReflectionGraph,
    id: ClassId,
    script_name: &str,
    members: &[BoundMember],
    has_descriptor: bool,
) -> Result<String> {
    let class = graph.class(id);
    let mut w = CodeWriter::new();
    w.blank();
    w.open(&format!("namespace HwFg{script_name}_Impl"));
    w.blank();

    for member in members {
        match member.kind {
            BoundKind::Method(fid) => {
                emit_method(&mut w, graph, script_name, &class.native_name, fid, &member.binding)?;
            }
            BoundKind::Getter(pid) => {
                emit_getter(&mut w, graph, script_name, &class.native_name, true, pid, &member.binding)?;
            }
            BoundKind::Setter(pid) => {
                emit_setter(&mut w, graph, script_name, &class.native_name, true, pid, &member.binding)?;
            }
        }
    }

    emit_binding_tables(&mut w, members);
    w.close(&format!(" // HwFg{script_name}_Impl"));
    w.blank();

    w.open(&format!("void HwFg{script_name}::register_bindings()"));
    w.line(&format!(
        "tBindingBase::register_bindings(UINT64_C(0x{:016X})); // \"{script_name}\"",
        name_id64(script_name)
    ));
    w.blank();
    if has_descriptor {
        w.line(&format!("ms_fgclass_p = {}::static_class();", class.native_name));
    } else {
        // No exported descriptor; resolve the class from the registry at
        // startup instead.
        w.line(&format!("ms_fgclass_p = fg_find_class(\"{}\");", class.name));
    }
    emit_bulk_registration(&mut w, script_name, members);
    w.close("");

    Ok(w.finish())
}

/// Dispatch source for one exported struct. Structs bind property accessors
/// only; their lifecycle methods come from the binding base.
pub fn struct_glue_source(
    graph: &ReflectionGraph,
    id: StructId,
    script_name: &str,
    members: &[BoundMember],
) -> Result<String> {
    let struct_def = graph.struct_def(id);
    let mut w = CodeWriter::new();
    w.blank();
    w.open(&format!("namespace HwFg{script_name}_Impl"));
    w.blank();

    for member in members {
        match member.kind {
            BoundKind::Getter(pid) => {
                emit_getter(&mut w, graph, script_name, &struct_def.native_name, false, pid, &member.binding)?;
            }
            BoundKind::Setter(pid) => {
                emit_setter(&mut w, graph, script_name, &struct_def.native_name, false, pid, &member.binding)?;
            }
            BoundKind::Method(_) => {
                debug_assert!(false, "structs bind only property accessors");
            }
        }
    }

    emit_binding_tables(&mut w, members);
    w.close(&format!(" // HwFg{script_name}_Impl"));
    w.blank();

    w.open(&format!("void HwFg{script_name}::register_bindings()"));
    w.line(&format!(
        "tBindingBase::register_bindings(UINT64_C(0x{:016X})); // \"{script_name}\"",
        name_id64(script_name)
    ));
    w.blank();
    w.line(&format!("ms_fgstruct_p = fg_find_struct(\"{}\");", struct_def.name));
    emit_bulk_registration(&mut w, script_name, members);
    w.close("");

    Ok(w.finish())
}

// === Member thunks ===

fn emit_method(
    w: &mut CodeWriter,
    graph: &ReflectionGraph,
    owner_script: &str,
    owner_native: &str,
    id: FunctionId,
    binding: &MethodBinding,
) -> Result<()> {
    let function = graph.function(id);
    let entity = format!("{owner_script}@{}", binding.script_name);
    let has_params = !function.params.is_empty();

    w.open(&thunk_decl(binding));
    if binding.is_static {
        // Static calls still need an object to dispatch through; use the
        // mutable class default instance.
        w.line(&format!(
            "{owner_native} * this_p = fg_mutable_default<{owner_native}>(HwFg{owner_script}::ms_fgclass_p);"
        ));
    } else {
        w.line(&format!(
            "{owner_native} * this_p = scope_p->this_as<HwFg{owner_script}>();"
        ));
    }

    if has_params {
        w.open("struct DispatchParams");
        for &pid in &function.params {
            let param = graph.property(pid);
            w.line(&format!(
                "{} {};",
                native_type_name(graph, &entity, &param.kind)?,
                param.name
            ));
        }
        w.close(" params;");

        for (index, &pid) in function.params.iter().enumerate() {
            let param = graph.property(pid);
            let tag = classify(graph, &param.kind);
            let value = if is_out_only(param.flags, &param.name) {
                out_only_default(graph, &entity, &param.kind, &tag)?
            } else {
                fetch_value(w, graph, &entity, &param.kind, &tag, index + 1)?
            };
            w.line(&format!("params.{} = {value};", param.name));
        }
    }

    w.line(&null_this_assert(owner_script, &binding.script_name));
    w.open("if (this_p)");
    w.line(&format!(
        "static FgFunction * function_p = this_p->find_function_checked(\"{}\");",
        function.name
    ));
    if has_params {
        w.line("FG_ASSERT(function_p->params_size() <= sizeof(DispatchParams));");
        w.line("this_p->call_reflected(function_p, &params);");
    } else {
        w.line("this_p->call_reflected(function_p, nullptr);");
    }
    w.close("");

    for (index, &pid) in function.params.iter().enumerate() {
        let param = graph.property(pid);
        if param.flags.contains(PropertyFlags::OUT) && !param.flags.contains(PropertyFlags::RETURN)
        {
            let tag = classify(graph, &param.kind);
            write_back(
                w,
                graph,
                &entity,
                &param.kind,
                &tag,
                index + 1,
                &format!("params.{}", param.name),
            )?;
        }
    }

    if let Some(ret_id) = graph.return_param(id) {
        let ret = graph.property(ret_id);
        let tag = classify(graph, &ret.kind);
        let boxed = box_value(w, graph, &entity, &ret.kind, &tag, &format!("params.{}", ret.name), 0)?;
        w.line(&format!("if (result_pp) *result_pp = {boxed};"));
    }

    w.close("");
    w.blank();
    Ok(())
}

fn emit_getter(
    w: &mut CodeWriter,
    graph: &ReflectionGraph,
    owner_script: &str,
    owner_native: &str,
    is_class: bool,
    id: PropertyId,
    binding: &MethodBinding,
) -> Result<()> {
    let property = graph.property(id);
    let tag = classify(graph, &property.kind);
    let entity = format!("{owner_script}@{}", binding.script_name);
    let cpp = native_type_name(graph, &entity, &property.kind)?;

    w.open(&thunk_decl(binding));
    if is_class {
        w.line(&format!(
            "{owner_native} * this_p = scope_p->this_as<HwFg{owner_script}>();"
        ));
        w.line(&format!(
            "static FgProperty * property_p = HwClassBindingHelper::find_class_property(HwFg{owner_script}::ms_fgclass_p, \"{}\");",
            property.name
        ));
    } else {
        w.line(&format!(
            "{owner_native} * this_p = &(scope_p->this_as<HwFg{owner_script}>());"
        ));
        w.line(&format!(
            "static FgProperty * property_p = HwFg{owner_script}::ms_fgstruct_p->find_property_by_name(\"{}\");",
            property.name
        ));
    }
    match default_ctor_arg(graph, &entity, &property.kind, &tag)? {
        Some(arg) => w.line(&format!("{cpp} property_value({arg});")),
        None => w.line(&format!("{cpp} property_value;")),
    }
    w.line(&null_this_assert(owner_script, &binding.script_name));
    w.open("if (this_p)");
    w.line("property_p->copy_complete_value(&property_value, property_p->value_ptr_in<void>(this_p));");
    w.close("");
    let boxed = box_value(w, graph, &entity, &property.kind, &tag, "property_value", 0)?;
    w.line(&format!("if (result_pp) *result_pp = {boxed};"));
    w.close("");
    w.blank();
    Ok(())
}

fn emit_setter(
    w: &mut CodeWriter,
    graph: &ReflectionGraph,
    owner_script: &str,
    owner_native: &str,
    is_class: bool,
    id: PropertyId,
    binding: &MethodBinding,
) -> Result<()> {
    let property = graph.property(id);
    let tag = classify(graph, &property.kind);
    let entity = format!("{owner_script}@{}", binding.script_name);
    let cpp = native_type_name(graph, &entity, &property.kind)?;

    w.open(&thunk_decl(binding));
    if is_class {
        w.line(&format!(
            "{owner_native} * this_p = scope_p->this_as<HwFg{owner_script}>();"
        ));
    } else {
        w.line(&format!(
            "{owner_native} * this_p = &(scope_p->this_as<HwFg{owner_script}>());"
        ));
    }
    w.line(&null_this_assert(owner_script, &binding.script_name));
    w.open("if (this_p)");
    if is_class {
        w.line(&format!(
            "static FgProperty * property_p = HwClassBindingHelper::find_class_property(HwFg{owner_script}::ms_fgclass_p, \"{}\");",
            property.name
        ));
    } else {
        w.line(&format!(
            "static FgProperty * property_p = HwFg{owner_script}::ms_fgstruct_p->find_property_by_name(\"{}\");",
            property.name
        ));
    }
    let value = fetch_value(w, graph, &entity, &property.kind, &tag, 1)?;
    w.line(&format!("{cpp} property_value = {value};"));
    w.line("property_p->copy_complete_value(property_p->value_ptr_in<void>(this_p), &property_value);");
    w.close("");
    // Setters return their receiver so calls chain.
    w.open("if (result_pp)");
    w.line("HwInstance * instance = scope_p->get_this();");
    w.line("instance->reference();");
    w.line("*result_pp = instance;");
    w.close("");
    w.close("");
    w.blank();
    Ok(())
}

fn thunk_decl(binding: &MethodBinding) -> String {
    format!(
        "static void mthd{}_{}(HwInvokedMethod * scope_p, HwInstance ** result_pp)",
        if binding.is_static { "c" } else { "" },
        binding.code_name
    )
}

fn null_this_assert(owner_script: &str, script_name: &str) -> String {
    format!(
        "HW_ASSERTX(this_p, \"Tried to invoke method {owner_script}@{script_name} but the {owner_script} is null.\");"
    )
}

fn is_out_only(flags: PropertyFlags, native_name: &str) -> bool {
    flags.contains(PropertyFlags::RETURN)
        || (flags.contains(PropertyFlags::OUT) && native_name.starts_with("Out"))
}

// === Registration ===

fn emit_binding_tables(w: &mut CodeWriter, members: &[BoundMember]) {
    for (suffix, is_static) in [("i", false), ("c", true)] {
        let group: Vec<&BoundMember> = members
            .iter()
            .filter(|m| m.binding.is_static == is_static)
            .collect();
        if group.is_empty() {
            continue;
        }
        w.line(&format!(
            "static const HwClass::MethodInitializerFuncId methods_{suffix}[] ="
        ));
        w.open("");
        for member in group {
            w.line(&format!(
                "{{ UINT64_C(0x{:016X}), mthd{}_{} }},  // \"{}\"",
                name_id64(&member.binding.script_name),
                if is_static { "c" } else { "" },
                member.binding.code_name,
                member.binding.script_name
            ));
        }
        w.close(";");
        w.blank();
    }
}

fn emit_bulk_registration(w: &mut CodeWriter, script_name: &str, members: &[BoundMember]) {
    for (suffix, is_static, flag) in [
        ("i", false, "HwBindFlag_instance_no_rebind"),
        ("c", true, "HwBindFlag_class_no_rebind"),
    ] {
        let count = members
            .iter()
            .filter(|m| m.binding.is_static == is_static)
            .count();
        if count > 0 {
            w.line(&format!(
                "ms_class_p->register_method_func_bulk(HwFg{script_name}_Impl::methods_{suffix}, {count}, {flag});"
            ));
        }
    }
}

// === Marshalling tables ===

/// Runtime instance class an argument of this tag is fetched or written as.
fn binding_class(graph: &ReflectionGraph, entity: &str, tag: &TypeTag) -> Result<String> {
    let name = match tag {
        TypeTag::Integer => "HwInteger".to_string(),
        TypeTag::Real => "HwReal".to_string(),
        TypeTag::Boolean => "HwBoolean".to_string(),
        TypeTag::String => "HwString".to_string(),
        TypeTag::Name => "HwFgName".to_string(),
        TypeTag::Vector2 => "HwVector2".to_string(),
        TypeTag::Vector3 => "HwVector3".to_string(),
        TypeTag::Vector4 => "HwVector4".to_string(),
        TypeTag::Rotation => "HwRotation".to_string(),
        TypeTag::RotationAngles => "HwRotationAngles".to_string(),
        TypeTag::Transform => "HwTransform".to_string(),
        TypeTag::Color => "HwColor".to_string(),
        TypeTag::Enum(_) => "HwEnum".to_string(),
        TypeTag::Struct(_) | TypeTag::ObjectRef(_) => {
            format!("HwFg{}", tag.script_name(graph))
        }
        TypeTag::ClassRef => "HwFgEntityClass".to_string(),
        TypeTag::List(_) => "HwList".to_string(),
        TypeTag::None => return Err(GenError::marshalling_hole(entity, tag.tag_name())),
    };
    Ok(name)
}

/// C++ spelling of a reflected kind in argument or field position.
fn native_type_name(graph: &ReflectionGraph, entity: &str, kind: &PropertyKind) -> Result<String> {
    let name = match kind {
        PropertyKind::Bool => "bool".to_string(),
        PropertyKind::Int => "int32_t".to_string(),
        PropertyKind::Int64 => "int64_t".to_string(),
        PropertyKind::Float => "float".to_string(),
        PropertyKind::Double => "double".to_string(),
        PropertyKind::Byte { enum_ref: Some(id) } => graph.enum_def(*id).native_name.clone(),
        PropertyKind::Byte { enum_ref: None } => "uint8_t".to_string(),
        PropertyKind::Str => "FgString".to_string(),
        PropertyKind::Name => "FgName".to_string(),
        PropertyKind::Text => "FgText".to_string(),
        PropertyKind::Struct { struct_ref } => graph.struct_def(*struct_ref).native_name.clone(),
        PropertyKind::Class | PropertyKind::AssetClass { .. } => "FgClass *".to_string(),
        PropertyKind::Object { class_ref }
        | PropertyKind::WeakObject { class_ref }
        | PropertyKind::LazyObject { class_ref }
        | PropertyKind::AssetObject { class_ref }
        | PropertyKind::Interface { class_ref } => {
            format!("{} *", graph.class(*class_ref).native_name)
        }
        PropertyKind::Array { element } => {
            format!("FgArray<{}>", native_type_name(graph, entity, element)?)
        }
        PropertyKind::Delegate | PropertyKind::MulticastDelegate => {
            return Err(GenError::marshalling_hole(entity, "Delegate"))
        }
    };
    Ok(name)
}

/// Writes any fetch prelude (list conversion loops) and returns the
/// expression producing the parameter value. `arg_index` is 1-based.
fn fetch_value(
    w: &mut CodeWriter,
    graph: &ReflectionGraph,
    entity: &str,
    kind: &PropertyKind,
    tag: &TypeTag,
    arg_index: usize,
) -> Result<String> {
    let expr = match tag {
        TypeTag::Integer | TypeTag::Real => format!(
            "{}(scope_p->get_arg<{}>(HwArg_{arg_index}))",
            native_type_name(graph, entity, kind)?,
            binding_class(graph, entity, tag)?
        ),
        TypeTag::String => {
            format!("FgString(scope_p->get_arg<HwString>(HwArg_{arg_index}).as_cstr())")
        }
        TypeTag::Enum(_) => format!(
            "({})( static_cast<uint8_t>(scope_p->get_arg<HwEnum>(HwArg_{arg_index})) )",
            native_type_name(graph, entity, kind)?
        ),
        TypeTag::List(inner_tag) => {
            let element = match kind {
                PropertyKind::Array { element } => element,
                _ => return Err(GenError::marshalling_hole(entity, tag.tag_name())),
            };
            let inner_cpp = native_type_name(graph, entity, element)?;
            let element_expr = element_fetch_expr(graph, entity, element, inner_tag)?;
            w.line(&format!(
                "HwInstanceArray & param_instances_{arg_index} = scope_p->get_arg<HwList>(HwArg_{arg_index}).get_instances();"
            ));
            w.line(&format!("FgArray<{inner_cpp}> param_arr_{arg_index};"));
            w.line(&format!(
                "uint32_t param_len_{arg_index} = param_instances_{arg_index}.get_length();"
            ));
            w.open(&format!("for (uint32_t i = 0; i < param_len_{arg_index}; ++i)"));
            w.line(&format!("HwInstance * instance = param_instances_{arg_index}[i];"));
            w.line(&format!("param_arr_{arg_index}.add({element_expr});"));
            w.close("");
            format!("param_arr_{arg_index}")
        }
        TypeTag::None => return Err(GenError::marshalling_hole(entity, tag.tag_name())),
        _ => format!(
            "scope_p->get_arg<{}>(HwArg_{arg_index})",
            binding_class(graph, entity, tag)?
        ),
    };
    Ok(expr)
}

/// Expression converting one list element instance to its native value.
fn element_fetch_expr(
    graph: &ReflectionGraph,
    entity: &str,
    kind: &PropertyKind,
    tag: &TypeTag,
) -> Result<String> {
    let expr = match tag {
        TypeTag::Integer | TypeTag::Real => format!(
            "{}(instance->as<{}>())",
            native_type_name(graph, entity, kind)?,
            binding_class(graph, entity, tag)?
        ),
        TypeTag::String => "FgString(instance->as<HwString>().as_cstr())".to_string(),
        TypeTag::Enum(_) => format!(
            "({})( static_cast<uint8_t>(instance->as<HwEnum>()) )",
            native_type_name(graph, entity, kind)?
        ),
        TypeTag::ClassRef => "(FgClass *)(instance->as<HwFgEntityClass>())".to_string(),
        TypeTag::None | TypeTag::List(_) => {
            return Err(GenError::marshalling_hole(entity, tag.tag_name()))
        }
        _ => format!("instance->as<{}>()", binding_class(graph, entity, tag)?),
    };
    Ok(expr)
}

/// Writes any boxing prelude (list build loops) and returns the expression
/// producing the `HwInstance *` for a value. `slot` disambiguates locals
/// when several list conversions share one body; the return slot is 0.
fn box_value(
    w: &mut CodeWriter,
    graph: &ReflectionGraph,
    entity: &str,
    kind: &PropertyKind,
    tag: &TypeTag,
    value: &str,
    slot: usize,
) -> Result<String> {
    if let TypeTag::List(inner_tag) = tag {
        if !matches!(kind, PropertyKind::Array { .. }) {
            return Err(GenError::marshalling_hole(entity, tag.tag_name()));
        }
        let arr_cpp = native_type_name(graph, entity, kind)?;
        let inner_box = box_expr(graph, entity, inner_tag, &format!("out_arr_{slot}[i]"))?;
        w.line(&format!("{arr_cpp} out_arr_{slot} = {value};"));
        w.line(&format!(
            "HwInstance * out_instance_{slot} = HwList::new_instance(out_arr_{slot}.num());"
        ));
        w.line(&format!(
            "HwInstanceList & out_list_{slot} = out_instance_{slot}->as<HwList>();"
        ));
        w.line(&format!(
            "HwInstanceArray & out_instances_{slot} = out_list_{slot}.get_instances();"
        ));
        w.line(&format!("int32_t out_len_{slot} = out_arr_{slot}.num();"));
        w.open(&format!("for (int32_t i = 0; i < out_len_{slot}; ++i)"));
        w.line(&format!("out_instances_{slot}.append(*({inner_box}));"));
        w.close("");
        return Ok(format!("out_instance_{slot}"));
    }
    box_expr(graph, entity, tag, value)
}

/// Expression boxing one non-list native value into an `HwInstance *`.
fn box_expr(graph: &ReflectionGraph, entity: &str, tag: &TypeTag, value: &str) -> Result<String> {
    let expr = match tag {
        TypeTag::String => {
            format!("HwString::new_instance(HwStr({value}.c_str(), {value}.len()))")
        }
        TypeTag::Enum(_) => {
            format!(
                "HwEnum::new_instance((tHwEnum){value}, HwBrain::get_class(\"{}\"))",
                tag.script_name(graph)
            )
        }
        TypeTag::None | TypeTag::List(_) => {
            return Err(GenError::marshalling_hole(entity, tag.tag_name()))
        }
        _ => format!(
            "{}::new_instance({value})",
            binding_class(graph, entity, tag)?
        ),
    };
    Ok(expr)
}

/// Writes the statement(s) copying an out-parameter back into the caller's
/// argument instance.
fn write_back(
    w: &mut CodeWriter,
    graph: &ReflectionGraph,
    entity: &str,
    kind: &PropertyKind,
    tag: &TypeTag,
    arg_index: usize,
    value: &str,
) -> Result<()> {
    match tag {
        TypeTag::List(_) => {
            let instance = box_value(w, graph, entity, kind, tag, value, arg_index)?;
            w.line(&format!(
                "scope_p->get_arg<HwList>(HwArg_{arg_index}) = {instance}->as<HwList>();"
            ));
        }
        TypeTag::String => {
            w.line(&format!(
                "scope_p->get_arg<HwString>(HwArg_{arg_index}) = HwStr({value}.c_str(), {value}.len());"
            ));
        }
        TypeTag::Enum(_) => {
            w.line(&format!(
                "scope_p->get_arg<HwEnum>(HwArg_{arg_index}) = static_cast<tHwEnum>({value});"
            ));
        }
        TypeTag::None => return Err(GenError::marshalling_hole(entity, tag.tag_name())),
        _ => {
            w.line(&format!(
                "scope_p->get_arg<{}>(HwArg_{arg_index}) = {value};",
                binding_class(graph, entity, tag)?
            ));
        }
    }
    Ok(())
}

// === Defaults ===

/// Value expression an out-only parameter is pre-set to before dispatch.
fn out_only_default(
    graph: &ReflectionGraph,
    entity: &str,
    kind: &PropertyKind,
    tag: &TypeTag,
) -> Result<String> {
    let expr = match tag {
        TypeTag::Integer => "0".to_string(),
        TypeTag::Real => "0.0f".to_string(),
        TypeTag::Boolean => "false".to_string(),
        TypeTag::Enum(_) => format!("({})0", native_type_name(graph, entity, kind)?),
        TypeTag::ClassRef | TypeTag::ObjectRef(_) => "nullptr".to_string(),
        TypeTag::Vector2
        | TypeTag::Vector3
        | TypeTag::Vector4
        | TypeTag::Rotation
        | TypeTag::RotationAngles
        | TypeTag::Color => {
            format!("{}(FgZeroInit)", native_type_name(graph, entity, kind)?)
        }
        TypeTag::None => return Err(GenError::marshalling_hole(entity, tag.tag_name())),
        // String, Name, Transform, Struct, List default-construct.
        _ => format!("{}()", native_type_name(graph, entity, kind)?),
    };
    Ok(expr)
}

/// Constructor argument for a getter's local before the copy, `None` when
/// the type default-constructs.
fn default_ctor_arg(
    graph: &ReflectionGraph,
    entity: &str,
    kind: &PropertyKind,
    tag: &TypeTag,
) -> Result<Option<String>> {
    let arg = match tag {
        TypeTag::Integer => Some("0".to_string()),
        TypeTag::Real => Some("0.0f".to_string()),
        TypeTag::Boolean => Some("false".to_string()),
        TypeTag::Enum(_) => Some(format!("({})0", native_type_name(graph, entity, kind)?)),
        TypeTag::ClassRef | TypeTag::ObjectRef(_) => Some("nullptr".to_string()),
        TypeTag::Vector2
        | TypeTag::Vector3
        | TypeTag::Vector4
        | TypeTag::Rotation
        | TypeTag::RotationAngles
        | TypeTag::Color => Some("FgZeroInit".to_string()),
        TypeTag::None => return Err(GenError::marshalling_hole(entity, tag.tag_name())),
        TypeTag::String
        | TypeTag::Name
        | TypeTag::Transform
        | TypeTag::Struct(_)
        | TypeTag::List(_) => None,
    };
    Ok(arg)
}
