//! kkc - kakko CLI
//!
//! Thin driver around the transformation core: reads source files, writes
//! the generated header/implementation units, and hands them to an external
//! C++ compiler.

use anyhow::{bail, Context, Result};
use clap::Parser;
use kakko::{contains_main, diagnostics, transpile, KakkoError, Options, Unit};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;

/// kakko - indentation-structured C++ dialect to C++ transpiler
#[derive(Parser, Debug)]
#[command(name = "kkc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Transpile indentation-structured sources to C++", long_about = None)]
struct Cli {
    /// Files to process: .kpp/.cpy sources, pass-through .cpp/.c/.h/.o,
    /// `-` for stdin; unrecognized `-...` values ride along to the compiler
    #[arg(value_name = "FILES", required = true, allow_hyphen_values = true)]
    files: Vec<String>,

    /// Linked output name
    #[arg(short, long, default_value = "a.out")]
    output: String,

    /// Print transformed units to stdout instead of emitting files
    #[arg(short, long)]
    print: bool,

    /// Emit generated files, skip compile and link
    #[arg(short, long)]
    transpile_only: bool,

    /// Emit generated files into this directory (kept afterwards)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Keep the scratch directory around
    #[arg(short, long)]
    keep_dir: bool,

    /// Fold implementation definitions back into the header output
    #[arg(long)]
    no_split: bool,

    /// Enable `for` loop shorthand
    #[arg(long)]
    enable_for: bool,

    /// Enable `rof` loop shorthand
    #[arg(long)]
    enable_rof: bool,

    /// Disable implicit variable declaration
    #[arg(long)]
    disable_implication: bool,

    /// Append source correlation comments to output lines
    #[arg(long)]
    add_source_map: bool,

    /// Emit JSON diagnostics to stderr (on failure only)
    #[arg(long)]
    diag_json: bool,

    /// Status lines to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn options_from(cli: &Cli) -> Options {
    Options {
        extract_impl: !cli.no_split,
        enable_for: cli.enable_for,
        enable_rof: cli.enable_rof,
        disable_implication: cli.disable_implication,
        add_source_map: cli.add_source_map,
    }
}

fn verbose(cli: &Cli, msg: &str) {
    if cli.verbose {
        eprintln!("[kkc] {msg}");
    }
}

/// Guard name for a generated header: path punctuation flattened to
/// underscores, uppercased, `_H` suffix.
fn guard_name(path: &str) -> String {
    let mut name: String = path
        .chars()
        .map(|c| match c {
            '/' | '\\' | '.' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect();
    name.push_str("_H");
    name
}

fn add_guards(path: &str, lines: &mut Vec<String>) {
    let guard = guard_name(path);
    lines.insert(0, format!("#ifndef {guard}\n#define {guard}"));
    lines.push("#endif".to_string());
}

fn is_source_ext(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("kpp") | Some("cpy")
    )
}

fn report_failure(cli: &Cli, err: &KakkoError, file: &Path) {
    let diags = diagnostics::from_error(err, Some(file));
    print!("{}", diags.to_text());
    if cli.diag_json {
        eprintln!("{}", diags.to_json());
    }
}

fn run_cmd(cli: &Cli, program: &str, args: &[String]) -> Result<()> {
    verbose(cli, &format!("{} {}", program, args.join(" ")));
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("failed to run {program}"))?;
    if !output.status.success() {
        eprint!("{}", String::from_utf8_lossy(&output.stderr));
        bail!("{program} exited with {}", output.status);
    }
    Ok(())
}

struct Emitted {
    /// .cpp files to compile
    sources: Vec<PathBuf>,
    /// pre-built objects to link as-is
    objects: Vec<PathBuf>,
}

fn emit_unit(out_dir: &Path, arg: &str, unit: Unit, emitted: &mut Emitted) -> Result<()> {
    let stem = Path::new(arg).with_extension("");
    let h_path = out_dir.join(stem.with_extension("h"));
    let cpp_path = out_dir.join(stem.with_extension("cpp"));
    if let Some(parent) = h_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let is_program = contains_main(&unit.header);

    if !unit.implementation.is_empty() {
        let mut header = unit.header;
        add_guards(arg, &mut header);
        std::fs::write(&h_path, header.join("\n"))?;

        let h_name = h_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unit.h");
        let mut cpp = vec![format!("#include \"{h_name}\"")];
        cpp.extend(unit.implementation);
        std::fs::write(&cpp_path, cpp.join("\n"))?;
        emitted.sources.push(cpp_path);
    } else if is_program {
        std::fs::write(&cpp_path, unit.header.join("\n"))?;
        emitted.sources.push(cpp_path);
    } else {
        let mut header = unit.header;
        add_guards(arg, &mut header);
        std::fs::write(&h_path, header.join("\n"))?;
    }

    Ok(())
}

fn process_files(cli: &Cli, opts: &Options, out_dir: &Path) -> Result<Emitted> {
    let mut emitted = Emitted {
        sources: Vec::new(),
        objects: Vec::new(),
    };

    for arg in &cli.files {
        if arg.starts_with('-') && arg != "-" {
            // compiler flag pass-through, collected by the caller
            continue;
        }

        if arg == "-" {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            match transpile(&source, "<stdin>", opts) {
                Ok(unit) => {
                    println!("{}", unit.header.join("\n"));
                    if !unit.implementation.is_empty() {
                        println!("{}", unit.implementation.join("\n"));
                    }
                }
                Err(err) => {
                    report_failure(cli, &err, Path::new("<stdin>"));
                    std::process::exit(1);
                }
            }
            continue;
        }

        let path = Path::new(arg);
        verbose(cli, &format!("processing {arg}"));

        if is_source_ext(path) {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {arg}"))?;
            let unit = match transpile(&source, arg, opts) {
                Ok(unit) => unit,
                Err(err) => {
                    report_failure(cli, &err, path);
                    std::process::exit(1);
                }
            };

            if cli.print {
                println!("// {arg}");
                println!("{}", unit.header.join("\n"));
                if !unit.implementation.is_empty() {
                    println!("{}", unit.implementation.join("\n"));
                }
                continue;
            }

            emit_unit(out_dir, arg, unit, &mut emitted)?;
        } else {
            match path.extension().and_then(|e| e.to_str()) {
                Some("cpp") | Some("c") | Some("h") => {
                    let dest = out_dir.join(path);
                    if let Some(parent) = dest.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::copy(path, &dest)
                        .with_context(|| format!("cannot copy {arg}"))?;
                    if matches!(path.extension().and_then(|e| e.to_str()), Some("cpp") | Some("c"))
                    {
                        emitted.sources.push(dest);
                    }
                }
                Some("o") => emitted.objects.push(path.to_path_buf()),
                _ => bail!("unrecognized input: {arg}"),
            }
        }
    }

    Ok(emitted)
}

fn compile_and_link(cli: &Cli, emitted: &Emitted, extra_flags: &[String]) -> Result<()> {
    if emitted.sources.is_empty() && emitted.objects.is_empty() {
        return Ok(());
    }

    let cxx = std::env::var("CXX").unwrap_or_else(|_| "g++".to_string());
    let mut flags: Vec<String> = extra_flags.to_vec();
    if let Ok(env_flags) = std::env::var("CXXFLAGS") {
        flags.extend(shlex::split(&env_flags).unwrap_or_default());
    }

    let mut objects: Vec<String> = emitted
        .objects
        .iter()
        .map(|p| p.display().to_string())
        .collect();

    for src in &emitted.sources {
        let obj = src.with_extension("o");
        let mut args = vec![
            "-c".to_string(),
            src.display().to_string(),
            "-o".to_string(),
            obj.display().to_string(),
        ];
        args.extend(flags.iter().cloned());
        run_cmd(cli, &cxx, &args)
            .with_context(|| format!("couldn't compile {}", src.display()))?;
        objects.push(obj.display().to_string());
    }

    let mut args = objects;
    args.push("-o".to_string());
    args.push(cli.output.clone());
    args.extend(flags.iter().cloned());
    run_cmd(cli, &cxx, &args).context("couldn't link")?;
    verbose(cli, &format!("generated {}", cli.output));

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let opts = options_from(&cli);

    // non-file `-...` arguments ride along to the compiler
    let extra_flags: Vec<String> = cli
        .files
        .iter()
        .filter(|a| a.starts_with('-') && a.as_str() != "-")
        .cloned()
        .collect();

    let (out_dir, scratch) = match &cli.out_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            (dir.clone(), false)
        }
        None => {
            let dir = std::env::temp_dir().join(format!("kkc-{}", std::process::id()));
            std::fs::create_dir_all(&dir)?;
            (dir, true)
        }
    };
    verbose(&cli, &format!("working dir is {}", out_dir.display()));

    let result = (|| -> Result<()> {
        let emitted = process_files(&cli, &opts, &out_dir)?;
        if !cli.print && !cli.transpile_only {
            compile_and_link(&cli, &emitted, &extra_flags)?;
        }
        Ok(())
    })();

    if scratch && !cli.keep_dir {
        verbose(&cli, &format!("removing {}", out_dir.display()));
        let _ = std::fs::remove_dir_all(&out_dir);
    } else {
        verbose(&cli, &format!("compiled into {}", out_dir.display()));
    }

    result
}
