use einvoice_client::{ClientConfig, EInvoiceClient};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // ── 1. Configuration from EINVOICE_* variables ────────────────────
    let config = ClientConfig::from_env()?;
    println!("=== Configuration ===");
    println!("  identity: {}", config.identity_url);
    println!("  proxy:    {}", config.proxy_url);
    println!("  app:      {}", config.app_url);

    let email = std::env::var("EINVOICE_EMAIL")?;
    let password = std::env::var("EINVOICE_PASSWORD")?;

    // ── 2. One login, three authenticated surfaces ────────────────────
    let client = EInvoiceClient::new(config)?;
    let token = client.authenticate(&email, &password)?;
    println!("\n=== Authenticated ===");
    println!("  token: {}…", token.chars().take(8).collect::<String>());
    println!("  all surfaces authenticated: {}", client.is_authenticated());

    // ── 3. Who am I? ──────────────────────────────────────────────────
    let me = client.identity().me()?;
    println!("\n=== Account ===");
    println!("{}", serde_json::to_string_pretty(&me)?);

    let company = client.app().company()?;
    println!("\n=== Company ===");
    println!("{}", serde_json::to_string_pretty(&company)?);

    Ok(())
}
