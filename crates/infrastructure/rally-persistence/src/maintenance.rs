use camino::Utf8Path;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Moves an unreadable database aside so the next open starts fresh.
pub fn quarantine_corrupt_file(path: &Utf8Path) -> std::io::Result<()> {
    if !path.exists() {
        return Ok(());
    }
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let ts = Utc::now().format("%Y%m%dT%H%M%S%.f");
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let new_name = format!(
        "{}.corrupt.{ts}.{}.{n}",
        path.file_name().unwrap_or(rally_config::DATA_FILE_NAME),
        std::process::id()
    );
    let new_path = path.with_file_name(new_name);
    tracing::warn!(from = %path, to = %new_path, "rally store is corrupt, quarantining");
    std::fs::rename(path, &new_path)?;
    Ok(())
}
