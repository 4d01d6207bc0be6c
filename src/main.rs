use bf::{DEFAULT_TAPE_LEN, Interpreter};
use clap::{ArgGroup, Args, Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bf", version, about = "A CLI tool for running Brainfuck commands")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Runs Brainfuck commands
    Run(RunArgs),
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true)))]
struct RunArgs {
    /// Brainfuck commands
    #[arg(short = 's', long = "string", value_name = "CODE", group = "source")]
    string: Option<String>,

    /// Brainfuck file path
    #[arg(short = 'f', long = "file", value_name = "PATH", group = "source")]
    file: Option<PathBuf>,

    /// Initial tape length in cells (fallback BF_TAPE_LEN; default 32)
    #[arg(long = "tape-len", value_name = "N")]
    tape_len: Option<usize>,
}

fn main() {
    // flush whatever made it to the buffers before dying on interrupt
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(130);
    }) {
        eprintln!("error: failed to set ctrl+c handler: {e}");
    }

    let cli = Cli::parse();

    let code = match cli.command {
        Command::Run(args) => run(args),
    };

    std::process::exit(code);
}

fn run(args: RunArgs) -> i32 {
    let code = match load_code(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    let tape_len = resolve_tape_len(args.tape_len, std::env::var("BF_TAPE_LEN").ok().as_deref());

    let mut bf = match Interpreter::new_with_tape_len(code.as_slice(), io::stdout().lock(), tape_len)
    {
        Ok(bf) => bf,
        Err(e) => {
            eprintln!("error: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    };
    bf.set_input(io::stdin().lock());

    let result = bf.exec();
    drop(bf);
    let _ = io::stdout().flush();

    if let Err(e) = result {
        eprintln!("error: {e}");
        let _ = io::stderr().flush();
        return 1;
    }

    0
}

fn load_code(args: &RunArgs) -> io::Result<Vec<u8>> {
    match (&args.string, &args.file) {
        (Some(code), _) => Ok(code.clone().into_bytes()),
        (None, Some(path)) => fs::read(path).map_err(|e| {
            io::Error::new(e.kind(), format!("failed to read file {}: {e}", path.display()))
        }),
        // unreachable: clap requires one member of the source group, but an
        // empty program reads better than a panic if that ever changes
        (None, None) => Ok(Vec::new()),
    }
}

/// Flags win over the `BF_TAPE_LEN` environment variable; both fall back to
/// the library default.
fn resolve_tape_len(flag: Option<usize>, env: Option<&str>) -> usize {
    flag.or_else(|| env.and_then(|s| s.parse().ok()))
        .unwrap_or(DEFAULT_TAPE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tape_len_flag_wins_over_env() {
        assert_eq!(resolve_tape_len(Some(7), Some("100")), 7);
    }

    #[test]
    fn tape_len_env_wins_over_default() {
        assert_eq!(resolve_tape_len(None, Some("100")), 100);
    }

    #[test]
    fn tape_len_falls_back_to_default() {
        assert_eq!(resolve_tape_len(None, None), DEFAULT_TAPE_LEN);
        assert_eq!(resolve_tape_len(None, Some("not a number")), DEFAULT_TAPE_LEN);
    }
}
