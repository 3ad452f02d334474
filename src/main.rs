use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    framebridge::app::startup::startup().await
}
