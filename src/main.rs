//! modelgate binary entry point

use color_eyre::Result;
use modelgate::{
    cli::{read_text_arg, Cli, Commands, TargetArgs},
    client::GatewayClient,
    config::Config,
    gateway::{self, AppState, ChatRequest},
    prompts,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Install error handler
    color_eyre::install()?;

    // Credentials may live in a local .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();

    // Set up logging; stdout stays reserved for command output
    let default_filter = if cli.verbose {
        "modelgate=debug"
    } else {
        "modelgate=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Serve { bind, config }) => serve(bind, config).await?,
        None => serve(None, None).await?,
        Some(Commands::Providers { gateway }) => {
            let client = GatewayClient::new(gateway.url);
            for provider in client.providers().await? {
                println!("{provider}");
            }
        }
        Some(Commands::Models { provider, gateway }) => {
            let client = GatewayClient::new(gateway.url);
            for (provider, models) in client.models(provider.as_deref()).await? {
                println!("{provider}: {}", models.join(", "));
            }
        }
        Some(Commands::Chat { target, message }) => {
            let message = read_text_arg(&message)?;
            send(&target, message).await?;
        }
        Some(Commands::Checklist {
            target,
            aspect,
            components,
            dry_run,
        }) => {
            let prompt = prompts::checklist_prompt(
                &aspect.aspect,
                &read_text_arg(&aspect.definition)?,
                &read_text_arg(&components)?,
            );
            if dry_run {
                println!("{prompt}");
            } else {
                send(&target, prompt).await?;
            }
        }
        Some(Commands::Evaluate {
            target,
            aspect,
            source,
            report,
            questions,
            dry_run,
        }) => {
            let prompt = prompts::evaluation_prompt(
                &aspect.aspect,
                &read_text_arg(&aspect.definition)?,
                &read_text_arg(&source)?,
                &read_text_arg(&report)?,
                &read_text_arg(&questions)?,
            );
            if dry_run {
                println!("{prompt}");
            } else {
                send(&target, prompt).await?;
            }
        }
        Some(Commands::Version) => {
            println!("modelgate version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

async fn serve(bind: Option<String>, config_path: Option<std::path::PathBuf>) -> Result<()> {
    let config = match config_path {
        Some(path) => Config::load_from_path(&path)?,
        None => Config::load()?,
    };
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let state = AppState::from_config(&config)?;
    gateway::serve(state, &bind).await?;
    Ok(())
}

async fn send(target: &TargetArgs, message: String) -> Result<()> {
    let client = GatewayClient::new(target.gateway.url.clone());
    let response = client
        .chat(&ChatRequest {
            provider: target.provider.clone(),
            model_name: target.model.clone(),
            message,
        })
        .await?;

    let labelled =
        prompts::label_reply(&response.provider, target.model.as_deref(), &response.message);
    if target.raw {
        println!("{}", prompts::raw_reply(&labelled));
    } else {
        println!("{labelled}");
    }
    Ok(())
}
