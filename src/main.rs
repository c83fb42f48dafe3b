use std::{
    env,
    fs::read_to_string,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use log::info;
use mfront::{
    errors::errors::{Error, ErrorTip},
    get_line_at_location,
    session::{Session, SessionConfig},
};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <file>", args[0]);
        return ExitCode::FAILURE;
    }

    let file = PathBuf::from(&args[1]);
    let source = match read_to_string(&file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Failed to read {}: {}", file.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let name = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("main"));

    let mut session = match Session::new(SessionConfig::default()) {
        Ok(session) => session,
        Err(errors) => {
            for error in errors {
                eprintln!("Error in prelude: {}", error);
            }
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let module = match session.compile(&name, &source) {
        Ok(module) => module.clone(),
        Err(errors) => {
            for error in errors {
                display_error(&error, &source, &file);
            }
            return ExitCode::FAILURE;
        }
    };
    info!("Checked {} in {:?}", name, start.elapsed());

    for statement in module.statements() {
        let Some(declared) = module.ast.declared_name(*statement) else {
            continue;
        };
        if let Some(ty) = session.type_of(&module, *statement) {
            println!("{} : {}", declared, ty.canonical());
        }
    }

    ExitCode::SUCCESS
}

fn display_error(error: &Error, source: &str, file: &Path) {
    /*
        Error: TypeMatchError (Expected type `int`, received `double`)
        -> main.m
          |
        3 | z = x + y
          | --------^
    */

    let location = error.get_location();
    let line_str = location.line.to_string();
    let padding = line_str.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {}", error.get_error_name());
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    println!("-> {}:{}", file.display(), location);

    let Some(line_text) = get_line_at_location(source, location) else {
        return;
    };

    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    println!("{} | {}", line_str, line_text_removed.trim_end());

    let arrows = (location.column as usize).saturating_sub(removed_whitespace).max(1);
    println!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let start = string.chars().take_while(|c| *c == ' ').count();
    (&string[start..], start)
}
