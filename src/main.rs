use std::path::PathBuf;

use clap::Parser;

use treeos::config::SystemConfig;
use treeos::desktop::Desktop;
use treeos::log::init_logging;
use treeos::shell::Shell;

// Allow the binary to return its version with a --version flag
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
struct Opts {
    #[clap(short, long)]
    version: bool,
    #[clap(short, long)]
    debug: bool,
    #[clap(short, long)]
    config: Option<PathBuf>,
    #[clap(short, long)]
    script: Option<PathBuf>,
}

fn main() {
    let opts: Opts = Opts::parse();
    if opts.version {
        println!("{}", VERSION);
        return;
    }
    let _guard = init_logging(opts.debug);
    let config = match &opts.config {
        Some(path) => match SystemConfig::load(path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("could not load config: {}", error);
                std::process::exit(1);
            }
        },
        None => SystemConfig::default(),
    };
    let mut shell = Shell::new(Desktop::new(config));
    match &opts.script {
        Some(path) => {
            if let Err(error) = shell.run_script(path) {
                eprintln!("{}", error);
                std::process::exit(1);
            }
        }
        None => shell.run_interactive(),
    }
}
