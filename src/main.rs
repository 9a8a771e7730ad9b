// src/main.rs

use backup_runner::{cli, logging, run};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(&args) {
        eprintln!("backup-runner: failed to initialise logging: {err:?}");
    }
    let code = run(args).await;
    std::process::exit(code);
}
