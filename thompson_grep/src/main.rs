use std::env;
use std::io;
use std::process;

use thompson_grep::{args::USAGE, parse_args, run, Command};

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    )
    .init();

    let code = match try_main() {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            eprintln!("thompson-grep: {:#}", err);
            2
        }
    };
    process::exit(code);
}

fn try_main() -> anyhow::Result<bool> {
    match parse_args(env::args().skip(1))? {
        Command::Search(config) => {
            run(&config, io::stdout().lock(), io::stderr().lock())
        }
        Command::Help => {
            print!("{}", USAGE);
            Ok(true)
        }
        Command::Version => {
            println!("thompson-grep {}", env!("CARGO_PKG_VERSION"));
            Ok(true)
        }
    }
}
