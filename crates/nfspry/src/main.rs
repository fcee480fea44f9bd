use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use nfspry::session::{AuthFlavor, Session};
use nfspry::shell::{self, StdinLines};

/// Interactive userland NFSv3 client
#[derive(Parser, Debug)]
#[command(name = "nfspry", version, about = "A raw NFSv3/MOUNTv3 client", long_about = None)]
struct Args {
    /// Disable verbose banners
    #[arg(short = 'v')]
    quiet: bool,

    /// Disable interactive prompting (line-oriented stdin)
    #[arg(short = 'i')]
    no_prompt: bool,

    /// Per-RPC timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Authentication flavor
    #[arg(long, value_enum, default_value_t = AuthArg::Unix)]
    auth: AuthArg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
enum AuthArg {
    Unix,
    Des,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let usage_only = !matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            );
            let _ = e.print();
            return if usage_only {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let flavor = match args.auth {
        AuthArg::Unix => AuthFlavor::Unix,
        AuthArg::Des => AuthFlavor::Des,
    };
    let mut session = Session::new(
        !args.quiet,
        !args.no_prompt,
        Duration::from_secs(args.timeout),
        flavor,
    );
    let mut lines = StdinLines::new(session.interactive);

    match shell::run(&mut session, &mut lines).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(1)
        }
    }
}
