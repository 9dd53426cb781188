//! One generation run over a reflection snapshot.
//!
//! `GeneratorSession` owns every policy decision: which requested classes
//! export, which members bind under which script names, which further types
//! get pulled in on demand, and where each artifact lands. The emitters in
//! [`crate::emit`] only render what the session has already decided. A
//! session is built per run and consumed by [`GeneratorSession::run`];
//! regenerating means building a fresh session.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use howl_ids::{ClassId, EnumId, FunctionId, PropertyId, StructId};
use indexmap::{IndexMap, IndexSet};
use log::{debug, info, warn};
use rustc_hash::FxHashSet;
use walkdir::WalkDir;

use crate::classify::{self, TypeTag};
use crate::config::BindgenConfig;
use crate::emit::{glue, master_glue, stubs, BoundKind, BoundMember, MasterEntry, MethodBinding};
use crate::error::Result;
use crate::naming;
use crate::paths;
use crate::reflect::{
    ClassFlags, ExportRequest, FunctionFlags, MemberOwner, PropertyFlags, PropertyKind,
    ReflectionGraph, StructFlags,
};
use crate::stage::OutputStage;

/// Identity of one exported entity in the session's export map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EntityKey {
    Class(ClassId),
    Struct(StructId),
}

/// What one exported entity produced. Records are created the moment an
/// entity's generation begins, which is also what cuts off re-entry when a
/// member type schedules its own owner.
#[derive(Debug, Clone)]
struct ExportRecord {
    script_name: String,
    members: usize,
}

/// A requested class set aside at the initial gate, re-examined against the
/// used-types set at finalization.
#[derive(Debug, Clone)]
struct PendingClass {
    class: ClassId,
    header: String,
}

/// Counters for one finished run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub classes: usize,
    pub structs: usize,
    pub enums: usize,
    /// Bound methods and property accessors across all entities.
    pub members: usize,
    pub staged: usize,
    pub unchanged: usize,
    pub orphans_removed: usize,
    pub elapsed: Duration,
}

pub struct GeneratorSession<'g> {
    graph: &'g ReflectionGraph,
    config: BindgenConfig,
    stage: OutputStage,
    dry_run: bool,
    /// Exported classes and structs. Insertion order is discovery order,
    /// which is also the registration order in the master glue file.
    exported: IndexMap<EntityKey, ExportRecord>,
    exported_enums: FxHashSet<EnumId>,
    /// Classes set aside at the initial gate, in request order.
    pending: Vec<PendingClass>,
    pending_ids: FxHashSet<ClassId>,
    /// Classes referenced as member types or as scripts-path ancestors, in
    /// first-reference order. Generated glue names the wrapper of every
    /// referenced class, so each of these must end up exported.
    used: IndexSet<ClassId>,
}

impl<'g> GeneratorSession<'g> {
    pub fn new(graph: &'g ReflectionGraph, config: BindgenConfig) -> Self {
        Self::with_stage(graph, config, OutputStage::new(), false)
    }

    /// A session that records what a run would change without writing or
    /// deleting anything.
    pub fn dry_run(graph: &'g ReflectionGraph, config: BindgenConfig) -> Self {
        Self::with_stage(graph, config, OutputStage::dry_run(), true)
    }

    fn with_stage(
        graph: &'g ReflectionGraph,
        config: BindgenConfig,
        stage: OutputStage,
        dry_run: bool,
    ) -> Self {
        Self {
            graph,
            config,
            stage,
            dry_run,
            exported: IndexMap::new(),
            exported_enums: FxHashSet::default(),
            pending: Vec::new(),
            pending_ids: FxHashSet::default(),
            used: IndexSet::new(),
        }
    }

    /// Drives the whole pipeline: every request in snapshot order, then the
    /// referenced-class promotions, the master glue file, the orphan sweep,
    /// and the commit. Consumes the session; each run starts from a fresh
    /// one.
    pub fn run(mut self) -> Result<RunSummary> {
        let started = Instant::now();

        let graph = self.graph;
        for request in &graph.requests {
            self.export_requested(request)?;
        }
        self.promote_used()?;
        self.write_master_glue()?;

        let orphans_removed = self.sweep_orphans();
        let staged = self.stage.staged_count();
        let unchanged = self.stage.unchanged_count();

        let mut classes = 0;
        let mut structs = 0;
        let mut members = 0;
        for (key, record) in &self.exported {
            match key {
                EntityKey::Class(_) => classes += 1,
                EntityKey::Struct(_) => structs += 1,
            }
            members += record.members;
        }

        self.stage.commit()?;

        let summary = RunSummary {
            classes,
            structs,
            enums: self.exported_enums.len(),
            members,
            staged,
            unchanged,
            orphans_removed,
            elapsed: started.elapsed(),
        };
        info!(
            "generated {} classes, {} structs, {} enums ({} members): {} staged, {} unchanged",
            summary.classes,
            summary.structs,
            summary.enums,
            summary.members,
            summary.staged,
            summary.unchanged
        );
        Ok(summary)
    }

    // === Class export ===

    /// Initial gate for one top-level request. A class that is skipped by
    /// name or header, carries a deprecation-style flag, or lacks a stable
    /// runtime type descriptor is deferred rather than dropped: if anything
    /// exported ends up referencing it, the generated glue needs its wrapper
    /// to exist, so it gets promoted at finalization.
    fn export_requested(&mut self, request: &ExportRequest) -> Result<()> {
        let class = self.graph.class(request.class);
        if !request.changed {
            // Advisory only; staging re-checks content anyway.
            debug!("host reports {} unchanged", class.name);
        }
        if self.exported.contains_key(&EntityKey::Class(request.class)) {
            return Ok(());
        }

        let gated = self.config.is_skipped_class(&class.name)
            || self.config.is_skipped_header(&request.header)
            || class
                .flags
                .intersects(ClassFlags::DEPRECATED | ClassFlags::TRANSIENT)
            || !classify::has_static_descriptor(self.graph, request.class);
        if gated {
            if self.pending_ids.insert(request.class) {
                debug!("deferring class {}", class.name);
                self.pending.push(PendingClass {
                    class: request.class,
                    header: request.header.clone(),
                });
            }
            return Ok(());
        }

        self.export_class(request.class, &request.header)
    }

    /// Exports every referenced class that is not exported yet, deferred
    /// requests and never-requested classes alike. A promotion marks its own
    /// ancestors and member types used in turn, so the sweep repeats until a
    /// full pass over the used set promotes nothing.
    fn promote_used(&mut self) -> Result<()> {
        loop {
            let mut promoted = false;
            // Promotions append to `used`; entries past the pass boundary
            // are picked up by the next pass.
            for index in 0..self.used.len() {
                let id = self.used[index];
                if self.exported.contains_key(&EntityKey::Class(id)) {
                    continue;
                }
                info!("promoting referenced class {}", self.graph.class(id).name);
                let header = self.promotion_header(id);
                self.export_class(id, &header)?;
                promoted = true;
            }
            if !promoted {
                break;
            }
        }
        Ok(())
    }

    /// Header a promoted class's glue include points at: the one its export
    /// request carried when it was deferred, its own defining header when it
    /// was never requested at all.
    fn promotion_header(&self, id: ClassId) -> String {
        self.pending
            .iter()
            .find(|pending| pending.class == id)
            .map(|pending| pending.header.clone())
            .unwrap_or_else(|| self.graph.class(id).header.clone())
    }

    fn export_class(&mut self, id: ClassId, header: &str) -> Result<()> {
        let graph = self.graph;
        let class = graph.class(id);
        let script_name = naming::class_name(&class.name);
        info!("generating class {script_name}");

        self.exported.insert(
            EntityKey::Class(id),
            ExportRecord {
                script_name: script_name.clone(),
                members: 0,
            },
        );

        let class_dir = self.class_scripts_dir(id);
        self.stage_text(
            class_dir.join(paths::META_FILE),
            stubs::class_meta_stub(graph, id),
        )?;

        let members = self.bind_class_members(id, &script_name, &class_dir)?;

        let include = self.glue_include(header);
        let is_actor = class.flags.contains(ClassFlags::ACTOR);
        self.stage_text(
            self.config.glue_dir.join(paths::glue_header_name(&script_name)),
            glue::class_wrapper_header(
                &script_name,
                &class.native_name,
                is_actor,
                include.as_deref(),
            ),
        )?;
        let has_descriptor = classify::has_static_descriptor(graph, id);
        self.stage_text(
            self.config.glue_dir.join(paths::glue_source_name(&script_name)),
            glue::class_glue_source(graph, id, &script_name, &members, has_descriptor)?,
        )?;

        if let Some(record) = self.exported.get_mut(&EntityKey::Class(id)) {
            record.members = members.len();
        }
        Ok(())
    }

    /// Walks the class's own declarations in order, stages a stub per
    /// accepted member, and returns the bindings in that order. Inherited
    /// members already have stubs in the ancestor's directory and glue in
    /// the ancestor's wrapper, so only own declarations bind here.
    fn bind_class_members(
        &mut self,
        id: ClassId,
        script_name: &str,
        class_dir: &Path,
    ) -> Result<Vec<BoundMember>> {
        let graph = self.graph;
        let mut members: Vec<BoundMember> = Vec::new();

        for fid in graph.class_functions_in_scope(id) {
            let function = graph.function(fid);
            if function.owner != id || function.flags.contains(FunctionFlags::DELEGATE) {
                continue;
            }
            if !self.params_supported(fid) {
                debug!("skipping method {}: unsupported parameter", function.name);
                continue;
            }
            let return_tag = graph
                .return_param(fid)
                .map(|pid| classify::classify(graph, &graph.property(pid).kind));
            let binding = MethodBinding::new(
                naming::method_name(&function.name, return_tag.as_ref()),
                function.flags.contains(FunctionFlags::STATIC),
            );
            if members.iter().any(|member| member.binding == binding) {
                debug!(
                    "skipping method {}: name {} already bound",
                    function.name, binding.script_name
                );
                continue;
            }
            for &pid in &function.params {
                let tag = classify::classify(graph, &graph.property(pid).kind);
                self.schedule_member_type(&tag)?;
            }
            self.stage_text(
                class_dir.join(paths::member_file_name(
                    &binding.script_name,
                    binding.is_static,
                )),
                stubs::method_stub(graph, fid),
            )?;
            members.push(BoundMember {
                binding,
                kind: BoundKind::Method(fid),
            });
        }

        self.bind_properties(
            &graph.class_properties_in_scope(id),
            MemberOwner::Class(id),
            script_name,
            class_dir,
            &mut members,
        )?;
        Ok(members)
    }

    /// Property accessor pass shared by classes and structs. A getter is
    /// always attempted; a setter only for editable properties. Accessors
    /// lose to any earlier member of the same script name.
    fn bind_properties(
        &mut self,
        property_ids: &[PropertyId],
        owner: MemberOwner,
        owner_script_name: &str,
        dir: &Path,
        members: &mut Vec<BoundMember>,
    ) -> Result<()> {
        let graph = self.graph;
        for &pid in property_ids {
            let property = graph.property(pid);
            if property.owner != owner {
                continue;
            }
            let tag = classify::classify(graph, &property.kind);
            if !tag.is_supported() {
                debug!("skipping property {}: unsupported type", property.name);
                continue;
            }

            let getter = MethodBinding::new(naming::method_name(&property.name, Some(&tag)), false);
            if !members.iter().any(|member| member.binding == getter) {
                self.schedule_member_type(&tag)?;
                self.stage_text(
                    dir.join(paths::member_file_name(&getter.script_name, false)),
                    stubs::getter_stub(graph, pid),
                )?;
                members.push(BoundMember {
                    binding: getter,
                    kind: BoundKind::Getter(pid),
                });
            }

            if property.flags.contains(PropertyFlags::EDITABLE) {
                let setter = MethodBinding::new(
                    format!("{}_set", naming::method_name(&property.name, None)),
                    false,
                );
                if !members.iter().any(|member| member.binding == setter) {
                    self.schedule_member_type(&tag)?;
                    self.stage_text(
                        dir.join(paths::member_file_name(&setter.script_name, false)),
                        stubs::setter_stub(graph, pid, owner_script_name),
                    )?;
                    members.push(BoundMember {
                        binding: setter,
                        kind: BoundKind::Setter(pid),
                    });
                }
            }
        }
        Ok(())
    }

    fn params_supported(&self, fid: FunctionId) -> bool {
        let graph = self.graph;
        graph
            .function(fid)
            .params
            .iter()
            .all(|&pid| classify::classify(graph, &graph.property(pid).kind).is_supported())
    }

    /// Classification side channel: referenced enums and structs export on
    /// demand, referenced classes are marked used so deferred ones promote.
    fn schedule_member_type(&mut self, tag: &TypeTag) -> Result<()> {
        match tag {
            TypeTag::Enum(id) => self.export_enum(*id)?,
            TypeTag::Struct(id) => self.export_struct_chain(*id)?,
            TypeTag::ObjectRef(id) => {
                self.used.insert(*id);
            }
            TypeTag::List(inner) => self.schedule_member_type(inner)?,
            _ => {}
        }
        Ok(())
    }

    // === Struct export ===

    /// Exports a struct and every qualifying ancestor. The walk always runs
    /// to the root: an unsupported link may still inherit from a struct that
    /// qualifies on its own. Math structs bind through the core runtime and
    /// are never exported here.
    fn export_struct_chain(&mut self, id: StructId) -> Result<()> {
        let graph = self.graph;
        for sid in graph.struct_lineage(id).into_iter().rev() {
            if self.exported.contains_key(&EntityKey::Struct(sid)) {
                continue;
            }
            let struct_def = graph.struct_def(sid);
            if self.config.is_skipped_class(&struct_def.name) {
                debug!("skipping struct {}: on the skip list", struct_def.name);
                continue;
            }
            let tag = classify::classify(graph, &PropertyKind::Struct { struct_ref: sid });
            match tag {
                TypeTag::Struct(_) => self.export_struct(sid)?,
                _ => debug!("struct {} not exportable here", struct_def.name),
            }
        }
        Ok(())
    }

    fn export_struct(&mut self, id: StructId) -> Result<()> {
        let graph = self.graph;
        let struct_def = graph.struct_def(id);
        let script_name = naming::class_name(&struct_def.name);
        info!("generating struct {script_name}");

        self.exported.insert(
            EntityKey::Struct(id),
            ExportRecord {
                script_name: script_name.clone(),
                members: 0,
            },
        );

        let dir = self
            .config
            .scripts_dir
            .join("Object")
            .join("Struct")
            .join(&script_name);
        self.stage_text(
            dir.join(paths::META_FILE),
            stubs::struct_meta_stub(graph, id),
        )?;
        self.stage_text(
            dir.join(paths::STRUCT_CTOR_FILE),
            stubs::struct_ctor_stub(&script_name),
        )?;
        self.stage_text(
            dir.join(paths::STRUCT_COPY_FILE),
            stubs::struct_copy_ctor_stub(&script_name),
        )?;
        let has_native_assign = struct_def.flags.contains(StructFlags::COPY_NATIVE);
        if has_native_assign {
            self.stage_text(
                dir.join(paths::STRUCT_ASSIGN_FILE),
                stubs::struct_assign_stub(&script_name),
            )?;
        }
        self.stage_text(dir.join(paths::STRUCT_DTOR_FILE), stubs::struct_dtor_stub())?;

        let mut members: Vec<BoundMember> = Vec::new();
        self.bind_properties(
            &graph.struct_properties_in_scope(id),
            MemberOwner::Struct(id),
            &script_name,
            &dir,
            &mut members,
        )?;

        let include = self.glue_include(&struct_def.header);
        self.stage_text(
            self.config.glue_dir.join(paths::glue_header_name(&script_name)),
            glue::struct_wrapper_header(
                &script_name,
                &struct_def.native_name,
                has_native_assign,
                include.as_deref(),
            ),
        )?;
        self.stage_text(
            self.config.glue_dir.join(paths::glue_source_name(&script_name)),
            glue::struct_glue_source(graph, id, &script_name, &members)?,
        )?;

        if let Some(record) = self.exported.get_mut(&EntityKey::Struct(id)) {
            record.members = members.len();
        }
        Ok(())
    }

    // === Enum export ===

    /// Exports an enum's script class at most once per run. The trailing
    /// entry is the header tool's auto-generated count sentinel and never
    /// appears; entries without a stable index are skipped with a warning.
    fn export_enum(&mut self, id: EnumId) -> Result<()> {
        if !self.exported_enums.insert(id) {
            return Ok(());
        }
        let graph = self.graph;
        let enum_def = graph.enum_def(id);
        let script_name = naming::class_name(&enum_def.name);
        info!("generating enum {script_name}");

        let value_count = enum_def.entries.len().saturating_sub(1);
        let mut entries: Vec<(String, u32)> = Vec::with_capacity(value_count);
        for entry in &enum_def.entries[..value_count] {
            match entry.index {
                Some(index) => entries.push((naming::enum_value_name(&entry.name), index)),
                None => warn!(
                    "enum {}: entry {} has no stable index, skipped",
                    enum_def.name, entry.name
                ),
            }
        }

        let dir = self
            .config
            .scripts_dir
            .join("Object")
            .join("Enum")
            .join(&script_name);
        self.stage_text(dir.join(paths::META_FILE), stubs::enum_meta_stub(graph, id))?;
        self.stage_text(
            dir.join(paths::ENUM_DATA_FILE),
            stubs::enum_data_stub(&script_name, &entries),
        )?;
        self.stage_text(
            dir.join(paths::ENUM_CTOR_FILE),
            stubs::enum_ctor_stub(&script_name, &enum_def.native_name, &entries),
        )?;
        Ok(())
    }

    // === Output plumbing ===

    fn stage_text(&mut self, target: PathBuf, content: String) -> Result<()> {
        self.stage.stage(&target, &content)?;
        Ok(())
    }

    /// Directory for a class's stubs, mirroring its superclass chain under
    /// the scripts root. Every ancestor on the path counts as used.
    fn class_scripts_dir(&mut self, id: ClassId) -> PathBuf {
        let graph = self.graph;
        let lineage = graph.class_lineage(id);
        for &ancestor in &lineage[..lineage.len() - 1] {
            self.used.insert(ancestor);
        }

        let mut names = Vec::with_capacity(lineage.len() + 1);
        names.push("Object".to_string());
        for &cid in &lineage {
            names.push(naming::class_name(&graph.class(cid).name));
        }
        let segments = paths::mirrored_dir_segments(names, self.config.scripts_depth);
        paths::join_segments(&self.config.scripts_dir, &segments)
    }

    /// Include path for an entity's defining header with the configured
    /// engine include root applied. Empty means the location is unknown.
    fn glue_include(&self, header: &str) -> Option<String> {
        if header.is_empty() {
            return None;
        }
        if self.config.include_root.is_empty() {
            Some(header.to_string())
        } else {
            Some(format!(
                "{}/{}",
                self.config.include_root,
                header.trim_start_matches('/')
            ))
        }
    }

    fn write_master_glue(&mut self) -> Result<()> {
        let entries: Vec<MasterEntry> = self
            .exported
            .iter()
            .map(|(key, record)| MasterEntry {
                script_name: record.script_name.clone(),
                is_class: matches!(key, EntityKey::Class(_)),
            })
            .collect();
        self.stage_text(
            self.config.glue_dir.join(paths::MASTER_GLUE_FILE),
            master_glue(&entries),
        )
    }

    /// Deletes generated script files this run no longer produces and prunes
    /// directories left empty, so renamed or removed members do not leave
    /// stale stubs behind. Only `.hwl` and `.hwl-meta` files are touched;
    /// glue outputs are already bounded by the master include list. In a dry
    /// run, orphans are counted but left in place.
    fn sweep_orphans(&self) -> usize {
        let scripts_root = &self.config.scripts_dir;
        if !scripts_root.exists() {
            return 0;
        }

        let mut removed = 0;
        let mut seen_dirs: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(scripts_root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("orphan sweep: {err}");
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                seen_dirs.push(entry.path().to_path_buf());
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !name.ends_with(".hwl") && !name.ends_with(".hwl-meta") {
                continue;
            }
            if self.stage.is_known(entry.path()) {
                continue;
            }
            warn!("orphaned stub {}", entry.path().display());
            removed += 1;
            if !self.dry_run {
                if let Err(err) = fs::remove_file(entry.path()) {
                    warn!("could not remove {}: {err}", entry.path().display());
                }
            }
        }

        if !self.dry_run {
            // Deepest first so a chain of emptied parents collapses too.
            seen_dirs.sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));
            for dir in seen_dirs {
                if dir != *scripts_root {
                    let _ = fs::remove_dir(&dir);
                }
            }
        }
        removed
    }
}
