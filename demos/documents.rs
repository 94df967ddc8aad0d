use einvoice_client::{ClientConfig, DocumentFlags, EInvoiceClient, ListQuery};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: documents <invoice.xml>")?;
    let xml = std::fs::read_to_string(&path)?;

    // EINVOICE_TOKEN must be set; every request is appended to documents.log
    let config = ClientConfig::from_env()?.log_file("documents.log");
    let client = EInvoiceClient::new(config)?;

    // ── 1. Validate before storing ────────────────────────────────────
    println!("=== Validate {path} ===");
    let report = client.proxy().validate_document(&xml)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    // ── 2. Store as draft, then send ──────────────────────────────────
    let created = client
        .proxy()
        .create_document(&xml, &DocumentFlags::new().draft(true))?;
    let id = created["id"].as_str().ok_or("response has no document id")?;
    println!("\n=== Draft {id} ===");

    let sent = client.proxy().send_document(id)?;
    println!("  status: {}", sent["status"]);

    // ── 3. Inbox ──────────────────────────────────────────────────────
    println!("\n=== Inbox ===");
    let inbox = client
        .proxy()
        .list_inbox(&ListQuery::new().page(0).size(10).sort("receivedAt,desc"))?;
    for doc in inbox["content"].as_array().into_iter().flatten() {
        let id = doc["id"].as_str().unwrap_or_default();
        println!("  {id}");
        client.proxy().mark_downloaded(id)?;
    }

    Ok(())
}
