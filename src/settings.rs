use ctor::ctor;
use tracing_subscriber::EnvFilter;

#[ctor]
fn init_tracing() {
    if std::env::var("RATWALK_LOG").map_or(true, |v| v == "0" || v == "false" || v.is_empty()) {
        // Logging disabled by default; opt in with RATWALK_LOG=<level>.
        return;
    }

    let filter = EnvFilter::try_from_env("RATWALK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
