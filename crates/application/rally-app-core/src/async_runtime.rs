use anyhow::Result;
use std::sync::OnceLock;
use tokio::runtime::Handle;

static RUNTIME: OnceLock<std::result::Result<tokio::runtime::Runtime, String>> = OnceLock::new();

/// The ambient runtime when called from async code, otherwise a shared
/// process-wide runtime created on first use.
pub(crate) fn handle() -> Result<Handle> {
    if let Ok(current) = Handle::try_current() {
        return Ok(current);
    }
    match RUNTIME.get_or_init(|| tokio::runtime::Runtime::new().map_err(|e| e.to_string())) {
        Ok(rt) => Ok(rt.handle().clone()),
        Err(message) => Err(anyhow::anyhow!(message.clone())),
    }
}
