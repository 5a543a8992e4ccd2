use std::env;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wallet_core::{config::WalletConfig, init_wallet, WalletCache, WalletError, WalletServices};

const DEFAULT_SEED: &str = "0000000000000000000000000000000000000000000000000000000000000001";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wallet_core=debug,wallet_providers=info"));

    let registry = tracing_subscriber::registry().with(filter);
    if env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

/// `WALLET_CONFIG` may point to a JSON configuration, missing sections keep their defaults.
fn load_config() -> Result<WalletConfig, WalletError> {
    let Ok(path) = env::var("WALLET_CONFIG") else {
        return Ok(WalletConfig::default());
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| WalletError::validation(format!("Could not read `{path}`: {e}")))?;
    serde_json::from_str(&content)
        .map_err(|e| WalletError::validation(format!("Invalid configuration `{path}`: {e}")))
}

#[tokio::main]
async fn main() -> Result<(), WalletError> {
    init_logging();

    let config = load_config()?;
    let seed = env::var("WALLET_SEED").unwrap_or_else(|_| DEFAULT_SEED.to_owned());

    let cache = WalletCache::new(8);
    let wallet = cache
        .get_or_init(&seed, || init_wallet(&seed, &config, WalletServices::default()))
        .await?;

    let did = wallet.invoke().get_subject_did(None).await?;
    println!("DID: {did}");

    let credential = wallet
        .invoke()
        .get_test_vc(Some("did:example:d23dd687a7dc6787646f2eb98d0"))
        .await?;
    let signed = wallet.invoke().issue_credential(&credential, None).await?;
    println!("{}", serde_json::to_string_pretty(&signed).unwrap_or_default());

    let verification = wallet.invoke().verify_credential(&signed, None).await?;
    println!(
        "Verified: {} (checks: {:?}, errors: {:?})",
        verification.is_verified(),
        verification.checks,
        verification.errors
    );

    let uri = wallet.invoke().publish_credential(&signed).await?;
    wallet.invoke().add_credential("demo", &uri).await?;
    let stored = wallet.invoke().get_credential("demo").await?;
    println!("Published `{uri}`, read back equal: {}", stored == signed);

    Ok(())
}
