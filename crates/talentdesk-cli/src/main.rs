//! Binary entrypoint for the `talentdesk` CLI.

#[tokio::main]
async fn main() {
    let exit_code = talentdesk_cli::run().await;
    std::process::exit(exit_code);
}
