use clap::Parser;
use govee_devices::platform_api::GoveeApiArguments;

mod commands;

/// List and control the Govee devices registered to your account
#[derive(clap::Parser, Debug)]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    api_args: GoveeApiArguments,

    #[command(subcommand)]
    cmd: Option<SubCommand>,
}

#[derive(clap::Parser, Debug)]
enum SubCommand {
    /// List the devices on the account. This is the default.
    List(commands::list::ListCommand),
    /// Show the capabilities of a device
    Show(commands::show::ShowCommand),
    /// Send a command to a device
    Control(commands::control::ControlCommand),
}

fn print_api_key_help() {
    println!("Error: GOVEE_API_KEY environment variable is not set");
    println!();
    println!("Run this first:");
    println!("    export GOVEE_API_KEY=\"your-actual-key-here\"");
    println!("or on Windows:");
    println!("    set GOVEE_API_KEY=your-actual-key-here");
}

async fn run(args: &Args) -> anyhow::Result<()> {
    match &args.cmd {
        None => commands::list::ListCommand {}.run(args).await,
        Some(SubCommand::List(cmd)) => cmd.run(args).await,
        Some(SubCommand::Show(cmd)) => cmd.run(args).await,
        Some(SubCommand::Control(cmd)) => cmd.run(args).await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    color_backtrace::install();
    let dotenv = dotenvy::dotenv();
    env_logger::init();
    if let Ok(path) = dotenv {
        log::debug!("Loaded environment overrides from {path:?}");
    }

    let args = Args::parse();

    match args.api_args.opt_api_key() {
        Ok(Some(_)) => {}
        Ok(None) => {
            print_api_key_help();
            std::process::exit(1);
        }
        Err(err) => {
            println!("Error: {err:#}");
            std::process::exit(1);
        }
    }

    if let Err(err) = run(&args).await {
        println!("{err:#}");
        std::process::exit(1);
    }
}
