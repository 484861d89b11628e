use clap::Parser;
use cosmo_lang::treewalk::Interpreter;
use cosmo_lang::{ast_to_json, compile_to_js, tokens_to_json, Error};

use std::io::Write;
use std::{fs, io, process};

/// The Cosmo language: tree-walking interpreter and JavaScript compiler.
#[derive(Parser, Debug)]
#[clap(name = "cosmo", version, about)]
struct Args {
    /// Script to run. Omit to start an interactive session.
    script: Option<String>,

    /// Print the compiled JavaScript instead of running the script.
    #[clap(long)]
    emit_js: bool,

    /// Print the token stream as JSON and exit.
    #[clap(long)]
    dump_tokens: bool,

    /// Print the syntax tree as JSON and exit.
    #[clap(long)]
    dump_ast: bool,
}

fn main() {
    let args = Args::parse();

    match &args.script {
        Some(path) => run_file(&args, path),
        None => run_prompt(),
    }
}

fn run_file(args: &Args, path: &str) {
    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Could not read {}: {}", path, e);
        process::exit(64);
    });

    if args.dump_tokens {
        dump_tokens(&source);
    } else if args.dump_ast {
        dump_ast(&source);
    } else if args.emit_js {
        emit_js(&source);
    } else {
        run_source(&source);
    }
}

fn dump_tokens(source: &str) {
    match tokens_to_json(source) {
        Ok((json, errors)) => {
            println!("{}", json);
            if !errors.is_empty() {
                for error in errors {
                    eprintln!("{}", error);
                }
                process::exit(65);
            }
        }
        Err(e) => exit_with_error(&e, source),
    }
}

fn dump_ast(source: &str) {
    match ast_to_json(source) {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with_error(&e, source),
    }
}

fn emit_js(source: &str) {
    match compile_to_js(source) {
        Ok(js) => print!("{}", js),
        Err(e) => exit_with_error(&e, source),
    }
}

fn run_source(source: &str) {
    let result = cosmo_lang::run_with_sink(source, Box::new(|line: &str| println!("{}", line)));
    if let Err(e) = result {
        exit_with_error(&e, source);
    }
}

fn exit_with_error(error: &Error, source: &str) -> ! {
    eprintln!("{}", error.render(source));
    let code = match error {
        Error::Runtime(_) => 70,
        _ => 65,
    };
    process::exit(code)
}

fn run_prompt() {
    let mut interpreter = Interpreter::new(Box::new(|line: &str| println!("{}", line)));

    loop {
        let mut input = String::new();

        print!("> ");
        io::stdout().flush().expect("Failed to flush stdout.");
        let bytes_read = io::stdin()
            .read_line(&mut input)
            .expect("Failed to read line.");
        if bytes_read == 0 {
            break;
        }

        match cosmo_lang::parse(&input) {
            Ok(tree) => {
                if let Err(e) = interpreter.eval_statements(&tree.stmts) {
                    eprintln!("{}", e.render(&input));
                }
            }
            Err(e) => eprintln!("{}", e.render(&input)),
        }
    }
}
