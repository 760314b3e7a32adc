use address_viability::render::{render_health, render_lookup, render_upload, render_upload_progress};
use address_viability::domain::model::LookupQuery;
use address_viability::utils::error::ErrorCategory;
use address_viability::utils::logger;
use address_viability::{
    ClientSettings, CliConfig, Command, HttpApiClient, Msg, ViabilityApi, ViewController, ViewState,
};
use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };
    tracing::debug!("Resolved settings: {:?}", settings);

    let client = match HttpApiClient::from_config(&settings) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    let exit_code = match config.command {
        Command::Lookup { cep, numero } => lookup(client, &settings, cep, numero).await,
        Command::Upload { path } => upload(client, &settings, path).await,
        Command::Purge { yes } => purge(client, &settings, yes).await?,
        Command::Health => health(client).await,
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

fn controller(client: HttpApiClient, settings: &ClientSettings) -> ViewController<HttpApiClient> {
    ViewController::new(
        client,
        ViewState::with_required_filename(settings.required_filename.clone()),
    )
}

async fn lookup(client: HttpApiClient, settings: &ClientSettings, cep: String, numero: String) -> i32 {
    let query = match LookupQuery::from_input(&cep, &numero) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            return e.exit_code();
        }
    };

    let mut controller = controller(client, settings);
    controller.dispatch(Msg::PostalCodeChanged(cep));
    controller.dispatch(Msg::HouseNumberChanged(numero));

    tracing::info!("Querying {} number {}", query.postal_code, query.house_number);
    controller.dispatch(Msg::LookupSubmitted);
    controller.settle().await;

    let view = controller.view();
    println!("{}", render_lookup(&view));
    if view.result_row.is_some() {
        0
    } else {
        ErrorCategory::Server.exit_code()
    }
}

async fn upload(client: HttpApiClient, settings: &ClientSettings, path: PathBuf) -> i32 {
    let mut controller = controller(client, settings);
    controller.dispatch(Msg::FileChosen(Some(path)));

    if let Some(error) = controller.view().upload_error {
        eprintln!("❌ {}", error);
        return ErrorCategory::Validation.exit_code();
    }

    controller.dispatch(Msg::UploadSubmitted);
    controller
        .settle_with(|msg, view| {
            if *msg == Msg::UploadTick {
                if let Some(line) = render_upload_progress(view) {
                    eprint!("\r⏱  {}", line);
                    let _ = std::io::stderr().flush();
                }
            }
        })
        .await;
    eprintln!();

    let view = controller.view();
    println!("{}", render_upload(&view));
    if view.upload_error.is_some() {
        ErrorCategory::Server.exit_code()
    } else {
        0
    }
}

async fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{}", prompt);
    std::io::stderr().flush().context("flushing prompt")?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await
        .context("reading confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn purge(client: HttpApiClient, settings: &ClientSettings, yes: bool) -> anyhow::Result<i32> {
    let mut controller = controller(client, settings);
    controller.dispatch(Msg::PurgeRequested);

    let confirmed = yes
        || confirm("Purge every record from the database? This cannot be undone. [y/N] ").await?;
    if !confirmed {
        controller.dispatch(Msg::PurgeCancelled);
        println!("Cancelled, nothing was deleted.");
        return Ok(0);
    }

    controller.dispatch(Msg::PurgeConfirmed);
    controller.settle().await;

    let view = controller.view();
    if let Some(notification) = &view.notification {
        println!("{}", notification);
    }
    let failed = view.purge_prompt_open;
    controller.dispatch(Msg::NotificationDismissed);
    if failed {
        controller.dispatch(Msg::PurgeCancelled);
        return Ok(ErrorCategory::Server.exit_code());
    }
    Ok(0)
}

async fn health(client: HttpApiClient) -> i32 {
    match client.health().await {
        Ok(report) => {
            println!("{}", render_health(&report));
            0
        }
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            e.exit_code()
        }
    }
}
