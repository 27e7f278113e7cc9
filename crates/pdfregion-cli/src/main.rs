mod cli;
mod report_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let result = report_cmd::run(&cli.pdf, cli.page, &cli.bbox, cli.out.as_deref());

    if let Err(code) = result {
        std::process::exit(code);
    }
}
