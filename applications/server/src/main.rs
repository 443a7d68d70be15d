/// Remix Server - shared playlists rebuilt from every member's listening
use clap::{Parser, Subcommand};
use remix_core::types::{Member, MemberId, PlaylistId};
use remix_provider_client::SpotifyClient;
use remix_server::{config::RemixConfig, create_router, state::AppState, RefreshScheduler};
use remix_storage::SqliteCredentialStore;
use remix_sync::PlaylistService;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "remix-server")]
#[command(about = "Remix shared playlist server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server and the periodic refresh job
    Serve,
    /// Register a member with provider credentials
    AddMember {
        /// Provider user id; looked up with the access token when omitted
        #[arg(short, long)]
        id: Option<String>,
        /// Access token
        #[arg(short, long)]
        access_token: String,
        /// Refresh token
        #[arg(short, long)]
        refresh_token: String,
    },
    /// List stored playlists with their members
    ListPlaylists,
    /// Rebuild one playlist, or all of them, and exit
    Refresh {
        /// Playlist id
        playlist_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "remix_server=info,remix_sync=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = match cli.config {
        Some(path) => RemixConfig::load_from(path)?,
        None => RemixConfig::load()?,
    };

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::AddMember {
            id,
            access_token,
            refresh_token,
        } => {
            add_member(config, id, access_token, refresh_token).await?;
        }
        Commands::ListPlaylists => {
            list_playlists(config).await?;
        }
        Commands::Refresh { playlist_id } => {
            refresh(config, playlist_id).await?;
        }
    }

    Ok(())
}

async fn open_store(config: &RemixConfig) -> anyhow::Result<SqliteCredentialStore> {
    let pool = remix_storage::create_pool(&config.storage.database_url).await?;
    remix_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");
    Ok(SqliteCredentialStore::new(pool))
}

async fn build_service(config: &RemixConfig) -> anyhow::Result<Arc<PlaylistService>> {
    config.validate()?;

    let store = open_store(config).await?;
    let provider = SpotifyClient::new(config.to_provider_config())?;
    tracing::info!("Provider client targeting {}", provider.api_url());

    Ok(Arc::new(PlaylistService::new(
        Arc::new(store),
        Arc::new(provider),
        config.to_sync_settings(),
    )))
}

async fn serve(config: RemixConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Remix Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let service = build_service(&config).await?;

    match config.refresh_interval() {
        Some(interval) => {
            RefreshScheduler::new(Arc::clone(&service), interval).start();
        }
        None => tracing::info!("Periodic playlist refresh disabled"),
    }

    let app = create_router(AppState::new(service));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_member(
    config: RemixConfig,
    id: Option<String>,
    access_token: String,
    refresh_token: String,
) -> anyhow::Result<()> {
    let id = match id {
        Some(id) => MemberId::new(id),
        None => {
            config.validate()?;
            let client = SpotifyClient::new(config.to_provider_config())?;
            client.library(&access_token).current_profile().await?.id
        }
    };

    let store = open_store(&config).await?;
    let member = remix_storage::members::upsert(
        store.pool(),
        &Member::new(id, access_token, refresh_token),
    )
    .await?;

    println!("Registered member {}", member.id);
    Ok(())
}

async fn list_playlists(config: RemixConfig) -> anyhow::Result<()> {
    let store = open_store(&config).await?;
    let ids = remix_storage::playlists::list_ids(store.pool()).await?;

    println!("Playlists:");
    for id in ids {
        if let Some(playlist) = remix_storage::playlists::get_by_id(store.pool(), &id).await? {
            let members: Vec<&str> = playlist.members.iter().map(|m| m.id.as_str()).collect();
            println!(
                "  {} - owner {} - members [{}]",
                playlist.id,
                playlist.owner.id,
                members.join(", ")
            );
        }
    }

    Ok(())
}

async fn refresh(config: RemixConfig, playlist_id: Option<String>) -> anyhow::Result<()> {
    let service = build_service(&config).await?;

    match playlist_id {
        Some(id) => match service.refresh_playlist(&PlaylistId::new(id.clone())).await? {
            Some(report) => println!(
                "Refreshed {}: removed {}, inserted {}",
                report.playlist_id,
                report.removed,
                report.inserted.len()
            ),
            None => println!("Playlist {id} not found"),
        },
        None => {
            let summary = service.refresh_all_playlists().await?;
            println!(
                "Refreshed {}, skipped {}, failed {}",
                summary.refreshed, summary.skipped, summary.failed
            );
        }
    }

    Ok(())
}
