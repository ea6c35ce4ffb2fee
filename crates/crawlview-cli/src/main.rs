use clap::Parser;
use crawlview::{Cli, init_logging, run};

fn main() {
    // Reset SIGPIPE to default behavior to prevent panic on broken pipe
    // (e.g., when piping `crawlview list` into `head`)
    #[cfg(unix)]
    reset_sigpipe();

    let cli = Cli::parse();
    init_logging(cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(unix)]
fn reset_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
