//! # Sync Commands
//!
//! Connectivity toggling and queue inspection.
//!
//! ```text
//! set_online(true)
//!      │
//!      ▼
//! gateway drains the queue (oldest first, stops at first failure)
//!      │
//!      ├── replayed > 0  ──► info notice
//!      ├── failed        ──► warning notice, entries stay queued
//!      ▼
//! cache reloaded from the store
//! ```

use tracing::info;

use comptoir_sync::{DrainReport, RemoteBackend, SyncStatus};

use crate::context::AppContext;
use crate::error::ApiResult;

/// Sets the connectivity flag. Returns the drain report when coming back
/// online triggered a drain.
pub async fn set_online<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    online: bool,
) -> ApiResult<Option<DrainReport>> {
    let report = ctx.gateway().set_online(online).await?;
    info!(online, "Connectivity changed");

    if let Some(report) = &report {
        report_drain(ctx, report);
        ctx.reload().await?;
    }
    Ok(report)
}

pub async fn sync_status<R: RemoteBackend>(ctx: &AppContext<R>) -> ApiResult<SyncStatus> {
    Ok(ctx.gateway().status().await?)
}

/// Replays queued writes now. Does nothing while offline.
pub async fn drain_sync_queue<R: RemoteBackend>(ctx: &mut AppContext<R>) -> ApiResult<DrainReport> {
    let report = ctx.gateway().drain_queue().await?;
    report_drain(ctx, &report);
    Ok(report)
}

fn report_drain<R: RemoteBackend>(ctx: &mut AppContext<R>, report: &DrainReport) {
    if report.replayed > 0 {
        ctx.notices_mut()
            .info(format!("{} pending change(s) synced", report.replayed));
    }
    if let Some(reason) = &report.failed {
        ctx.notices_mut().warning(format!(
            "Sync stopped: {} ({} change(s) still pending)",
            reason, report.remaining
        ));
    }
}
