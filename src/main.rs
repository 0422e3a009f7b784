use std::process::ExitCode;

use log::{error, info};

use vpnquery::license::{greeter, LICENSE_TEXT, VERSION};
use vpnquery::outcome::EXIT_INDETERMINATE;
use vpnquery::{authorize, Args, Config};

fn main() -> ExitCode {
    let args = match Args::parse_cli(std::env::args_os()) {
        Ok(args) => args,
        Err(code) => return ExitCode::from(code),
    };
    if args.version {
        println!("{}", VERSION);
        return ExitCode::from(EXIT_INDETERMINATE);
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("{}", greeter());
    if args.license {
        println!("{}", LICENSE_TEXT);
        return ExitCode::from(EXIT_INDETERMINATE);
    }
    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_INDETERMINATE);
        }
    };
    let outcome = authorize(&config);
    outcome.log_summary(config.user());
    ExitCode::from(outcome.exit_code())
}
