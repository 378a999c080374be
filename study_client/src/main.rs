use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    study_client::frameworks::cli::run().await
}
