use anyhow::Context;
use api_client::{HttpSchoolsClient, ImageAttachment};
use clap::{Parser, Subcommand};
use configuration::{DatabaseBackend, ImageBackend, Settings};
use core_types::Field;
use indicatif::{ProgressBar, ProgressStyle};
use pages::{AddSchoolPage, ListingState, ShowSchoolsPage, SubmitStatus};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The entry point for the school registry.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let _guard = configuration::init_tracing("logs", "school-registry.log")?;
            handle_serve(args).await
        }
        Commands::Add(args) => {
            let _guard = configuration::init_tracing("logs", "school-registry-cli.log")?;
            handle_add(args).await
        }
        Commands::List(args) => {
            let _guard = configuration::init_tracing("logs", "school-registry-cli.log")?;
            handle_list(args).await
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Register schools and browse the registry.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Fill in the add-school form and submit it.
    Add(AddArgs),
    /// Show every registered school.
    List(ListArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Path to the TOML settings file. Missing files fall back to defaults.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,

    /// Overrides `images.backend`.
    #[arg(long, value_enum)]
    image_backend: Option<ImageBackend>,

    /// Overrides `database.backend`.
    #[arg(long, value_enum)]
    database_backend: Option<DatabaseBackend>,
}

#[derive(Parser)]
struct AddArgs {
    /// Base URL of a running server.
    #[arg(long, default_value = "http://localhost:3000")]
    api_url: String,

    #[arg(long)]
    name: String,

    #[arg(long)]
    address: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    state: String,

    /// Ten digits, e.g. 5551234567.
    #[arg(long)]
    contact: String,

    #[arg(long)]
    email: String,

    /// Image file to attach (JPEG, PNG or WebP).
    #[arg(long)]
    image: PathBuf,
}

#[derive(Parser)]
struct ListArgs {
    /// Base URL of a running server.
    #[arg(long, default_value = "http://localhost:3000")]
    api_url: String,

    /// How many times to press "Try Again" after a failed load.
    #[arg(long, default_value_t = 0)]
    retries: u32,
}

// ==============================================================================
// Command Logic
// ==============================================================================

impl ServeArgs {
    fn apply(&self, settings: &mut Settings) {
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(backend) = self.image_backend {
            settings.images.backend = backend;
        }
        if let Some(backend) = self.database_backend {
            settings.database.backend = backend;
        }
    }
}

async fn handle_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut settings = configuration::load_unvalidated(&args.config)?;
    args.apply(&mut settings);
    // Validated once, with the overrides in place.
    let settings = settings.finalize()?;
    web_server::run_server(settings).await
}

async fn handle_add(args: AddArgs) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("could not read {}", args.image.display()))?;
    let file_name = args
        .image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let mut page = AddSchoolPage::new();
    page.set(Field::Name, args.name);
    page.set(Field::Address, args.address);
    page.set(Field::City, args.city);
    page.set(Field::State, args.state);
    page.set(Field::Contact, args.contact);
    page.set(Field::EmailId, args.email);
    page.attach_image(ImageAttachment::new(file_name, mime_for(&args.image), bytes));

    let api = HttpSchoolsClient::new(args.api_url);
    let spinner = spinner("Adding School...")?;
    let status = page.submit(&api).await.clone();
    spinner.finish_and_clear();

    println!("{}", page.render());
    match status {
        SubmitStatus::Success(_) => Ok(()),
        SubmitStatus::Error(message) => anyhow::bail!(message),
        SubmitStatus::Idle | SubmitStatus::Submitting => {
            anyhow::bail!("the form has errors, nothing was sent")
        }
    }
}

async fn handle_list(args: ListArgs) -> anyhow::Result<()> {
    let api = HttpSchoolsClient::new(args.api_url);
    let mut page = ShowSchoolsPage::new();

    let spinner = spinner("Loading schools...")?;
    page.load(&api).await;
    let mut attempts = 0;
    while attempts < args.retries && page.retry(&api).await {
        attempts += 1;
        tracing::info!(attempt = attempts, "Retried loading schools.");
    }
    spinner.finish_and_clear();

    println!("{}", page.render());
    if let ListingState::Error(message) = page.state() {
        anyhow::bail!(message.clone());
    }
    Ok(())
}

fn spinner(message: &'static str) -> anyhow::Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Picks the MIME type a browser would send for the file's extension.
fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}
