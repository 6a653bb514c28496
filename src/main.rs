use clap::Parser;

use fusion_notify::cli::{
    Cli, error_message_key, execute_command, init_logger_from_settings, load_and_merge_config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match load_and_merge_config(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(1);
        }
    };

    let _log_handle = init_logger_from_settings(&settings)?;

    tracing::debug!(
        app = %settings.application.name,
        version = %settings.application.version,
        channels = ?settings.notifications.channels,
        "configuration loaded"
    );

    if let Err(e) = execute_command(&cli, settings).await {
        let message_key = error_message_key(&e);
        tracing::error!(code = e.error_code(), message_key = %message_key, error = %e, "command failed");
        eprintln!("{} ({}): {}", e.error_code(), message_key, e);
        std::process::exit(1);
    }

    Ok(())
}
