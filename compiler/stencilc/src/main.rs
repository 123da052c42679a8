//! Stencil compiler CLI.

mod commands;

use commands::{ast_file, bundle_dir, compile_file, explain_error, tokens_file, Options};

fn main() {
    stencilc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let (options, positional) = Options::parse(&args[2..]);

    match command.as_str() {
        "compile" => {
            let Some(path) = positional.first() else {
                eprintln!("Usage: stencil compile <file> [--config <json>] [-o <out.rs>]");
                std::process::exit(1);
            };
            compile_file(path, &options);
        }
        "bundle" => {
            let Some(dir) = positional.first() else {
                eprintln!("Usage: stencil bundle <dir> [--config <json>] [-o <out.rs>]");
                std::process::exit(1);
            };
            bundle_dir(dir, &options);
        }
        "tokens" => {
            let Some(path) = positional.first() else {
                eprintln!("Usage: stencil tokens <file> [--config <json>]");
                std::process::exit(1);
            };
            tokens_file(path, &options);
        }
        "ast" => {
            let Some(path) = positional.first() else {
                eprintln!("Usage: stencil ast <file> [--config <json>]");
                std::process::exit(1);
            };
            ast_file(path, &options);
        }
        "explain" => {
            let Some(code) = positional.first() else {
                eprintln!("Usage: stencil explain <error-code>");
                eprintln!("Example: stencil explain E1003");
                std::process::exit(1);
            };
            explain_error(code);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("stencil {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Stencil template compiler");
    println!();
    println!("Usage: stencil <command> [options]");
    println!();
    println!("Commands:");
    println!("  compile <file>     Compile one template to a Rust module");
    println!("  bundle <dir>       Compile every .stencil file under <dir> into one file");
    println!("  tokens <file>      Show the token stream");
    println!("  ast <file>         Show the optimized syntax tree");
    println!("  explain <code>     Explain an error code");
    println!("  help               Show this message");
    println!("  version            Show the version");
    println!();
    println!("Options:");
    println!("  --config <json>    Read configuration from a JSON file");
    println!("  -o <path>          Write output to <path> instead of stdout");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=stencilc=debug) for compiler tracing.");
}
