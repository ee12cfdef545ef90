//! phyled — configure the Ethernet PHY LEDs on BananaPi boards.

use clap::{CommandFactory, Parser};

mod cli;

const LETTERS_HELP: &str = "\
Letters:
   q    Quiet (no informational messages)
   v    Verbose (extra informational messages, repeat up to 3 times)

   b    Blue led configuration
   y    Yellow led configuration
   g    Green led configuration

   l    Switch on when linked at 10Mbps
   m    Switch on when linked at 100Mbps
   h    Switch on when linked at 1000Mbps
   a    Blink with activity (Tx/Rx)

Examples:
   phyled eth0                 show phy leds status
   phyled eth0 b y g           disable all phy leds
   phyled eth0 b yh glmha      disable blue, yellow for 1000Mbps,
                               green for link and activity
   phyled eth0 b               disable blue led";

#[derive(Parser)]
#[command(
    name = "phyled",
    version,
    about = "Configure the RTL8211E Ethernet PHY LEDs",
    after_help = LETTERS_HELP
)]
struct Args {
    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Network interface the PHY is attached to (e.g. eth0)
    interface: Option<String>,

    /// LED configuration letters: [qv] [blmha] [ylmha] [glmha]
    tokens: Vec<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let args = Args::parse();

    let Some(interface) = args.interface else {
        eprintln!("{}", Args::command().render_help());
        std::process::exit(1);
    };

    if let Err(e) = cli::run(&interface, &args.tokens, args.json) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
