//! The Quill compiler front-end driver.
//!
//! `quillc <source> <parse-tree-out>` opens an interactive menu:
//!
//! - `0` - exit
//! - `1` - strip comments to `clean_code.txt` and echo the clean source
//! - `2` - list the token stream
//! - `3` - parse and write the parse-tree listing
//! - `4` - run the full pipeline and report wall-clock time
//!
//! Lexical and syntactic errors go to stderr, one line each; they do not
//! change the exit status. Only unusable arguments or an unopenable
//! source file do.

mod comments;

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::Parser;

use quill_common::token::{TokenKind, TokenValue};
use quill_lexer::Lexer;
use quill_parser::{FirstFollow, Grammar, ParseTable};

#[derive(Parser)]
#[command(name = "quillc", version, about = "The Quill compiler front-end")]
struct Cli {
    /// Path to the Quill source file
    source: PathBuf,

    /// Path for the parse-tree listing produced by option 3
    parse_tree_out: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    // Refuse to start a session over a file we cannot read.
    if let Err(e) = File::open(&cli.source) {
        eprintln!("Error: cannot open source file {}: {e}", cli.source.display());
        process::exit(1);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print_menu();
        print!("Enter option: ");
        let _ = io::stdout().flush();

        let Some(Ok(line)) = lines.next() else {
            break; // stdin closed: end the session cleanly
        };
        let option: u32 = match line.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                println!("Invalid input, enter a number 0-4.");
                continue;
            }
        };

        match option {
            0 => break,
            1 => strip_comments(&cli.source),
            2 => list_tokens(&cli.source),
            3 => run_parse(&cli.source, &cli.parse_tree_out),
            4 => run_timed(&cli.source, &cli.parse_tree_out),
            _ => println!("Invalid option, choose 0-4."),
        }
    }
}

fn print_menu() {
    println!();
    println!("0 : Exit");
    println!("1 : Remove comments and print the clean code");
    println!("2 : Print the token list");
    println!("3 : Parse and write the parse tree");
    println!("4 : Run the full pipeline and print the time taken");
}

/// Option 1: write `clean_code.txt` and echo it.
fn strip_comments(source: &Path) {
    let text = match std::fs::read_to_string(source) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: cannot read {}: {e}", source.display());
            return;
        }
    };
    let clean = comments::strip(&text);
    if let Err(e) = std::fs::write("clean_code.txt", &clean) {
        eprintln!("Error: cannot write clean_code.txt: {e}");
        return;
    }
    print!("{clean}");
    let _ = io::stdout().flush();
}

/// Option 2: the full token listing, comments and error tokens included.
fn list_tokens(source: &Path) {
    let file = match File::open(source) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: cannot open {}: {e}", source.display());
            return;
        }
    };

    println!(
        "{:<10}  {:<30}  {:<22}  {:<8}  {}",
        "Line No.", "Lexeme", "Token", "HasVal", "Value"
    );

    let mut count = 0usize;
    let mut errors = 0usize;
    for tok in Lexer::new(file) {
        if tok.kind == TokenKind::Eof {
            break;
        }
        if let Some(err) = &tok.error {
            eprintln!("Line {}\tError: {err}", tok.line);
            errors += 1;
        }
        let (has_val, value) = match tok.value {
            Some(TokenValue::Int(v)) => ("yes", v.to_string()),
            Some(TokenValue::Real(v)) => ("yes", format!("{v:.4}")),
            None => ("no", "----".to_string()),
        };
        println!(
            "{:<10}  {:<30}  {:<22}  {:<8}  {}",
            tok.line,
            tok.lexeme,
            tok.kind.name(),
            has_val,
            value
        );
        count += 1;
    }

    println!("Total tokens listed: {count}");
    if errors > 0 {
        println!("Total lexical errors: {errors}  (details on stderr)");
    }
}

/// Option 3: parse and write the parse-tree listing.
fn run_parse(source: &Path, out_path: &Path) {
    let file = match File::open(source) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: cannot open {}: {e}", source.display());
            return;
        }
    };

    let grammar = Grammar::quill();
    let ff = FirstFollow::compute(&grammar);
    let table = match ParseTable::build(&grammar, &ff) {
        Ok(t) => t,
        Err(e) => {
            // A table conflict means the grammar itself is broken.
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let result = quill_parser::Parser::new(&table, Lexer::new(file)).parse(&grammar);
    for err in &result.errors {
        eprintln!("{err}");
    }
    if result.is_clean() {
        println!("Input source code is syntactically correct");
    }

    let out = match File::create(out_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: cannot create {}: {e}", out_path.display());
            return;
        }
    };
    let mut writer = BufWriter::new(out);
    if let Err(e) = result.tree.write_listing(&mut writer) {
        eprintln!("Error: cannot write {}: {e}", out_path.display());
        return;
    }
    println!("Parse tree written to {}", out_path.display());
}

/// Option 4: everything end to end, with wall-clock timing.
fn run_timed(source: &Path, out_path: &Path) {
    let started = Instant::now();
    run_parse(source, out_path);
    let elapsed = started.elapsed();

    println!("Total wall clock time (ticks)   : {}", elapsed.as_micros());
    println!("Total wall clock time (seconds) : {:.6}", elapsed.as_secs_f64());
}
