use einvoice_client::{ClientConfig, EInvoiceClient, Error, ErrorKind};

fn describe(result: Result<serde_json::Value, Error>) {
    match result {
        Ok(value) => println!("  ok: {value}"),
        Err(Error::Authentication { .. }) => println!("  not logged in (or token expired), re-authenticate"),
        Err(Error::Server { body, .. }) => println!("  server failure: {body}"),
        Err(Error::Api(e)) => {
            let kind = match e.kind() {
                ErrorKind::Network => "network",
                ErrorKind::Client => "client",
                ErrorKind::Server => "server",
                ErrorKind::Other => "other",
            };
            println!("  [{kind}] {} (status {}, retryable: {})", e.message, e.status_code, e.is_retryable());
        }
        Err(other) => println!("  {other}"),
    }
}

fn main() {
    // ── 1. Unreachable host: classified as a network error ────────────
    println!("=== Network Error ===");
    let config = ClientConfig::default()
        .identity_url("http://127.0.0.1:9/api")
        .proxy_url("http://127.0.0.1:9/api")
        .app_url("http://127.0.0.1:9/api");
    match EInvoiceClient::new(config) {
        Ok(client) => describe(client.app().company()),
        Err(e) => println!("  could not build client: {e}"),
    }

    // ── 2. No token: the API answers 401 ──────────────────────────────
    println!("\n=== Missing Token ===");
    match EInvoiceClient::new(ClientConfig::default()) {
        Ok(client) => describe(client.proxy().get_document("does-not-exist")),
        Err(e) => println!("  could not build client: {e}"),
    }

    // ── 3. Unwritable log file fails at construction ──────────────────
    println!("\n=== Log File ===");
    let config = ClientConfig::default().log_file("/nonexistent/dir/requests.log");
    match EInvoiceClient::new(config) {
        Ok(_) => println!("  built (unexpected)"),
        Err(e) => println!("  {e}"),
    }
}
