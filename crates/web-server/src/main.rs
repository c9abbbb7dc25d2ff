use std::path::Path;

// This main function is the entry point when running `cargo run -p web-server`.
// It loads `config.toml` and hands over to the crate's library.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _guard = configuration::init_tracing("logs", "web-server.log")?;
    let settings = configuration::load_settings(Path::new("config.toml"))?;
    web_server::run_server(settings).await
}
