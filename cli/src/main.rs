mod commands;
mod terminal;

use commands::{CommandLine, Commands, info, scan};
use lensguard_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose)?;

    let cfg = Config {
        no_banner: commands.no_banner,
        quiet: commands.quiet,
        json: commands.json,
    };

    print::banner(cfg.no_banner || cfg.json, cfg.quiet);

    let result = match commands.command {
        Commands::Info => {
            print::header("about the network", cfg.quiet);
            info::info(&cfg)
        }
        Commands::Scan(args) => {
            print::header("starting scanner", cfg.quiet);
            scan::scan(args, &cfg).await
        }
    };

    if !cfg.json {
        print::fat_separator();
    }
    result
}
