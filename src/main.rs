use clap::Parser;

mod commands;
mod output;

use commands::rename::{self, RenameArgs, TextObserver};
use commands::GlobalArgs;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "channel-rename")]
#[command(version = VERSION)]
#[command(about = "Bulk-rename public Slack channels from a CSV mapping")]
struct Cli {
    #[command(flatten)]
    rename: RenameArgs,

    /// Print a JSON envelope instead of plain text
    #[arg(long, global = true)]
    json: bool,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs { json: cli.json };

    if global.json {
        let result = rename::run(cli.rename, &global, &mut ());
        let (json_result, exit_code) = output::map_cmd_result_to_json(result);
        if output::print_json_result(json_result).is_err() {
            return std::process::ExitCode::from(1);
        }
        return std::process::ExitCode::from(exit_code_to_u8(exit_code));
    }

    match rename::run(cli.rename, &global, &mut TextObserver) {
        Ok((_report, exit_code)) => std::process::ExitCode::from(exit_code_to_u8(exit_code)),
        Err(err) => {
            output::print_text_error(&err);
            let exit_code = output::exit_code_for_error(err.code);
            std::process::ExitCode::from(exit_code_to_u8(exit_code))
        }
    }
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
