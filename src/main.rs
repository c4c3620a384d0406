mod cli;

use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use vecstore::Store;
use vecstore::config::Config;

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    let config = Config::from_env();

    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None => {
            let store = Store::new(config.store_name);
            cli::run_repl(&store);
        }
        Some("serve") => {
            let bind = args.get(2).cloned().unwrap_or(config.bind);
            let store = web::Data::new(Store::new(config.store_name));
            info!(bind = %bind, store = %store.name(), "vecstore server starting");

            HttpServer::new(move || {
                App::new()
                    .app_data(store.clone())
                    .configure(vecstore::server::config)
            })
            .bind(bind)?
            .run()
            .await?;
        }
        Some(other) => {
            eprintln!("Unknown mode: {}. Usage: vecstore [serve [addr]]", other);
            std::process::exit(1);
        }
    }

    Ok(())
}
