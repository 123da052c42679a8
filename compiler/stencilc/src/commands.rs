//! Command handlers for the `stencil` CLI.
//!
//! Every handler prints its result to stdout (or the `-o` file) and exits
//! with status 1 after printing a diagnostic on failure.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use stencil_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use stencil_diagnostic::{ErrorCode, ErrorDocs};
use stencilc::{dump_tree, Config, Environment, FileSystemLoader, MemoryLoader, TemplateError};

/// Extension of template files picked up by `bundle`.
const TEMPLATE_EXTENSION: &str = "stencil";

/// Options shared by the commands that compile.
#[derive(Default)]
pub struct Options {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl Options {
    /// Parse `--config <path>` and `-o <path>`; returns the remaining
    /// positional arguments.
    pub fn parse(args: &[String]) -> (Options, Vec<String>) {
        let mut options = Options::default();
        let mut positional = Vec::new();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--config" if i + 1 < args.len() => {
                    options.config = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                }
                "-o" if i + 1 < args.len() => {
                    options.output = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                }
                arg => {
                    if let Some(path) = arg.strip_prefix("--config=") {
                        options.config = Some(PathBuf::from(path));
                    } else {
                        positional.push(arg.to_string());
                    }
                    i += 1;
                }
            }
        }
        (options, positional)
    }

    fn load_config(&self) -> Config {
        let Some(path) = &self.config else {
            return Config::default();
        };
        Config::load(path).unwrap_or_else(|e| report(&TemplateError::from(e), None))
    }
}

fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Template name for a file: its stem.
fn template_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map_or_else(|| path.to_string(), |s| s.to_string_lossy().into_owned())
}

/// Print `error` as a diagnostic and exit.
fn report(error: &TemplateError, source: Option<&str>) -> ! {
    let stderr = std::io::stderr();
    let is_tty = stderr.is_terminal();
    let mut emitter = TerminalEmitter::with_color_mode(stderr, ColorMode::Auto, is_tty);
    if let Some(source) = source {
        emitter = emitter.with_source(source);
    }
    emitter.emit(&error.to_diagnostic());
    emitter.flush();
    std::process::exit(1);
}

fn write_output(options: &Options, text: &str) {
    match &options.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, text) {
                eprintln!("error writing '{}': {e}", path.display());
                std::process::exit(1);
            }
        }
        None => print!("{text}"),
    }
}

fn single_file_environment(options: &Options) -> Environment {
    Environment::new(options.load_config(), MemoryLoader::new()).unwrap_or_else(|e| report(&e, None))
}

/// `stencil compile <file>`: one template to one Rust module.
pub fn compile_file(path: &str, options: &Options) {
    let source = read_file(path);
    let env = single_file_environment(options);
    let name = template_name(path);
    let module = env
        .compile_source(&name, &source)
        .unwrap_or_else(|e| report(&e, Some(&source)));
    write_output(options, &module);
}

/// `stencil bundle <dir>`: every `*.stencil` file under `dir` into one file
/// with a `register` function.
pub fn bundle_dir(dir: &str, options: &Options) {
    let loader = FileSystemLoader::new(dir, TEMPLATE_EXTENSION);
    let env = Environment::new(options.load_config(), loader.clone()).unwrap_or_else(|e| report(&e, None));
    let names = env.template_names().unwrap_or_else(|e| report(&e, None));
    if names.is_empty() {
        eprintln!("no .{TEMPLATE_EXTENSION} files found under '{dir}'");
        std::process::exit(1);
    }
    match env.compile_bundle(&names) {
        Ok(bundle) => write_output(options, &bundle),
        Err(e) => {
            use stencilc::Loader as _;
            let source = e.template().and_then(|t| loader.fetch_source(t).ok());
            report(&e, source.as_deref());
        }
    }
}

/// `stencil tokens <file>`: the token stream.
pub fn tokens_file(path: &str, options: &Options) {
    let source = read_file(path);
    let env = single_file_environment(options);
    let tokens = env
        .tokenize(&template_name(path), &source)
        .unwrap_or_else(|e| report(&e, Some(&source)));

    println!("Tokens for '{}' ({} tokens):", path, tokens.len());
    for token in &tokens {
        println!("  {:>4}  {:?} {:?}", token.line, token.kind, token.value);
    }
}

/// `stencil ast <file>`: the optimized tree.
pub fn ast_file(path: &str, options: &Options) {
    let source = read_file(path);
    let env = single_file_environment(options);
    let mut arena = env
        .parse(&template_name(path), &source)
        .unwrap_or_else(|e| report(&e, Some(&source)));
    env.optimize(&mut arena);
    print!("{}", dump_tree(&arena, env.registries()));
}

/// `stencil explain <code>`: documentation for an error code.
pub fn explain_error(code_str: &str) {
    let Some(code) = ErrorCode::parse(code_str) else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format EXXXX where X is a digit.");
        eprintln!("Examples: E0001, E1003, E2001, E4001");
        std::process::exit(1);
    };

    if let Some(doc) = ErrorDocs::get(code) {
        println!("{doc}");
    } else {
        eprintln!("No documentation available for {code_str}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests;
