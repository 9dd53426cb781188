use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use howl_bindgen::{content_digest, BindgenConfig, GeneratorSession, ReflectionGraph};

const CONFIG_FILE: &str = "howl_bindgen.toml";
const SNAPSHOT_FILE: &str = "reflection.json";
const HASH_FILE: &str = ".howl_bindgen.hash";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let Some(command) = args.get(1).map(String::as_str) else {
        print_usage();
        process::exit(2);
    };

    let result = match command {
        "generate" => generate_command(&args, &cwd),
        "check" => check_command(&args, &cwd),
        _ => {
            print_usage();
            Err(format!("unknown command `{command}`"))
        }
    };

    if let Err(err) = result {
        eprintln!("{err}");
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  howl_cli generate [--project <dir>] [--snapshot <file>] [--config <file>] [--force]");
    eprintln!("  howl_cli check    [--project <dir>] [--snapshot <file>] [--config <file>]");
    eprintln!();
    eprintln!("Defaults: --project is the current directory, --config is");
    eprintln!("<project>/{CONFIG_FILE}, --snapshot is <project>/{SNAPSHOT_FILE}.");
    eprintln!("`check` walks without writing and fails when outputs are out of date.");
}

fn parse_flag_value(args: &[String], flag: &str) -> Option<String> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1).cloned()
}

struct RunInputs {
    config: BindgenConfig,
    graph: ReflectionGraph,
    snapshot_digest: String,
    hash_path: PathBuf,
}

fn load_inputs(args: &[String], cwd: &Path) -> Result<RunInputs, String> {
    let project_dir = parse_flag_value(args, "--project")
        .map(PathBuf::from)
        .unwrap_or_else(|| cwd.to_path_buf());
    let config_path = parse_flag_value(args, "--config")
        .map(PathBuf::from)
        .unwrap_or_else(|| project_dir.join(CONFIG_FILE));
    let snapshot_path = parse_flag_value(args, "--snapshot")
        .map(PathBuf::from)
        .unwrap_or_else(|| project_dir.join(SNAPSHOT_FILE));

    let mut config = BindgenConfig::load(&config_path)
        .map_err(|err| format!("failed to load config {}: {err}", config_path.display()))?;
    // Relative output dirs in the config are anchored at the project, not
    // at wherever the tool happens to be invoked from.
    config.scripts_dir = anchor_dir(&project_dir, config.scripts_dir);
    config.glue_dir = anchor_dir(&project_dir, config.glue_dir);

    let snapshot = fs::read_to_string(&snapshot_path)
        .map_err(|err| format!("failed to read snapshot {}: {err}", snapshot_path.display()))?;
    let graph = ReflectionGraph::from_json_str(&snapshot)
        .map_err(|err| format!("failed to load snapshot {}: {err}", snapshot_path.display()))?;

    let snapshot_digest = content_digest(snapshot.as_bytes());
    let hash_path = config.glue_dir.join(HASH_FILE);

    Ok(RunInputs {
        config,
        graph,
        snapshot_digest,
        hash_path,
    })
}

fn anchor_dir(project_dir: &Path, dir: PathBuf) -> PathBuf {
    if dir.is_absolute() {
        dir
    } else {
        project_dir.join(dir)
    }
}

fn generate_command(args: &[String], cwd: &Path) -> Result<(), String> {
    let force = args.iter().any(|a| a == "--force");
    let inputs = load_inputs(args, cwd)?;

    if !force && snapshot_unchanged(&inputs.hash_path, &inputs.snapshot_digest) {
        println!("reflection snapshot unchanged; nothing to generate (use --force to override)");
        return Ok(());
    }

    let summary = GeneratorSession::new(&inputs.graph, inputs.config)
        .run()
        .map_err(|err| format!("generation failed: {err}"))?;

    record_snapshot_hash(&inputs.hash_path, &inputs.snapshot_digest)?;

    println!(
        "generated {} classes, {} structs, {} enums ({} members)",
        summary.classes, summary.structs, summary.enums, summary.members
    );
    println!(
        "{} file(s) written, {} unchanged, {} orphan(s) removed in {}ms",
        summary.staged,
        summary.unchanged,
        summary.orphans_removed,
        summary.elapsed.as_millis()
    );
    Ok(())
}

fn check_command(args: &[String], cwd: &Path) -> Result<(), String> {
    // No hash fast path here: a matching snapshot says nothing about
    // outputs someone edited or deleted since the last run.
    let inputs = load_inputs(args, cwd)?;

    let summary = GeneratorSession::dry_run(&inputs.graph, inputs.config)
        .run()
        .map_err(|err| format!("check failed: {err}"))?;

    if summary.staged > 0 || summary.orphans_removed > 0 {
        return Err(format!(
            "generated bindings are out of date: {} file(s) to write, {} orphan(s) to remove; run `howl_cli generate`",
            summary.staged, summary.orphans_removed
        ));
    }

    println!("{} generated file(s) up to date", summary.unchanged);
    Ok(())
}

fn snapshot_unchanged(hash_path: &Path, digest: &str) -> bool {
    match fs::read_to_string(hash_path) {
        Ok(previous) => previous.trim() == digest,
        Err(_) => false,
    }
}

fn record_snapshot_hash(hash_path: &Path, digest: &str) -> Result<(), String> {
    if let Some(parent) = hash_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create {}: {err}", parent.display()))?;
    }
    fs::write(hash_path, format!("{digest}\n"))
        .map_err(|err| format!("failed to record snapshot hash {}: {err}", hash_path.display()))
}
