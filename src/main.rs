use tokio_util::sync::CancellationToken;

mod api;
mod config;
mod db;
mod handler;
mod media;
mod server;

fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .filter_module("tunecast", log::LevelFilter::Debug)
        .filter_module("ffmpeg_pipe", log::LevelFilter::Debug)
        .init();
}

#[tokio::main]
async fn main() -> ! {
    init_logging();
    let config = config::config();
    tunecast_db::migrations::migrate(config.db_url())
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error migrating database: {}", e);
            std::process::exit(1);
        });
    db::init_app_db(config.db_url()).await.unwrap_or_else(|e| {
        eprintln!("Error opening database: {}", e);
        std::process::exit(1);
    });

    let cancel = CancellationToken::new();

    api::start_api_server(cancel.clone());
    server::start_media_server(cancel.clone());

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                break;
            },
            _ = tokio::signal::ctrl_c() => {
                cancel.cancel();
            },
        }
    }

    std::process::exit(0);
}
