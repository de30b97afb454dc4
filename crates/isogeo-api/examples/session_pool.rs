// Fetch several metadata pages concurrently with a pool of sessions.
//
// Each task owns its own session (token and caches included), so the pool
// size is the number of requests in flight.
//
//   ISOGEO_CLIENT_ID=... ISOGEO_CLIENT_SECRET=... ISOGEO_WORKGROUP=... \
//   RUST_LOG=isogeo_api=debug cargo run --example session_pool

use secrecy::SecretString;
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use isogeo_api::{Credentials, Endpoints, Outcome, Platform, Session, TransportConfig};

const POOL_SIZE: u32 = 4;
const PAGE_SIZE: u32 = 50;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let client_id = std::env::var("ISOGEO_CLIENT_ID")?;
    let client_secret = SecretString::from(std::env::var("ISOGEO_CLIENT_SECRET")?);
    let workgroup = std::env::var("ISOGEO_WORKGROUP")?;
    let platform: Platform = std::env::var("ISOGEO_PLATFORM")
        .unwrap_or_else(|_| "qa".into())
        .parse()?;

    let transport = TransportConfig::default();
    let mut tasks = JoinSet::new();

    for worker in 0..POOL_SIZE {
        let credentials = Credentials::ClientCredentials {
            client_id: client_id.clone(),
            client_secret: client_secret.clone(),
        };
        let endpoints = Endpoints::for_platform(platform);
        let transport = transport.clone();
        let workgroup = workgroup.clone();

        tasks.spawn(async move {
            let mut session = Session::connect(endpoints, credentials, &transport).await?;
            let page = session
                .metadata()
                .search_in_workgroup(&workgroup, PAGE_SIZE, worker * PAGE_SIZE)
                .await?;
            Ok::<_, isogeo_api::Error>((worker, page))
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined? {
            Ok((worker, Outcome::Success(page))) => {
                info!(
                    worker,
                    total = page.total,
                    received = page.results.len(),
                    "page fetched"
                );
                for md in &page.results {
                    info!(worker, title = md.title.as_deref().unwrap_or("<untitled>"));
                }
            }
            Ok((worker, other)) => warn!(worker, ?other, "no page"),
            Err(err) => warn!(%err, "worker failed"),
        }
    }

    Ok(())
}
