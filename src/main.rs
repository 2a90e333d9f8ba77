use tracing::info;

use formbridge::{Config, Database, Mailer, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = formbridge::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
    }

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    let mailer = Mailer::smtp(
        config.mail.smtp_host.clone(),
        config.mail.smtp_port,
        config.mail.username.clone(),
        config.mail.password.clone(),
        config.mail.from_address.clone(),
    );

    info!("formbridge relay service");

    let server = match WebServer::new(&config, db, mailer) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Failed to configure server: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}
