use std::io;
use std::path::PathBuf;

use clap::Parser;
use rand::Rng;

use crate::session::Session;
use crate::storage::SaveStore;

mod command;
mod render;
mod session;
mod storage;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory where `<name>.ms` saves are written and looked up
    #[arg(short = 'd', long, default_value = ".")]
    save_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // log records reach the subscriber through its log bridge; stdout stays for the game
    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log::debug!("seed: {}", seed);

    let store = SaveStore::new(args.save_dir);
    log::debug!("saves in {}", store.dir().display());

    Session::new(io::stdin().lock(), io::stdout().lock(), store, seed).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    fn level(args: &[&str]) -> LevelFilter {
        let args = Args::try_parse_from(["tripwire"].iter().chain(args)).unwrap();
        args.verbose.tracing_level_filter()
    }

    #[test]
    fn verbosity_maps_to_subscriber_level() {
        assert_eq!(level(&[]), LevelFilter::ERROR);
        assert_eq!(level(&["-vvv"]), LevelFilter::DEBUG);
        assert_eq!(level(&["-vvvv"]), LevelFilter::TRACE);
        assert_eq!(level(&["-q"]), LevelFilter::OFF);
    }
}
