// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Final render worker.
//
// The render itself runs on tokio's blocking pool against an immutable
// snapshot (`Arc` original + `Arc<[Region]>`), so the session stays editable
// while it runs. The session lock is held only to take the snapshot and to
// store the result. A single-permit semaphore owned by the shared session
// keeps at most one render per session in flight, however many workers exist.

use std::sync::{Arc, Mutex, MutexGuard};

use redact_core::{ApplyPolicy, RedactError, RenderProgress, Result};
use redact_engine::{CancelToken, FinalImage, ImageSession, RenderSnapshot};
use tokio::sync::{OwnedSemaphorePermit, Semaphore, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

/// A session shared between the editing thread and render tasks.
///
/// Cloning shares both the session and its render slot, so every worker
/// built on the same session competes for the same single permit.
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<ImageSession>>,
    slot: Arc<Semaphore>,
}

impl SharedSession {
    pub fn new(session: ImageSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
            slot: Arc::new(Semaphore::new(1)),
        }
    }

    /// Lock the session, mapping a poisoned lock to an error.
    pub fn lock(&self) -> Result<MutexGuard<'_, ImageSession>> {
        self.inner
            .lock()
            .map_err(|_| RedactError::RenderFailed("session lock poisoned".into()))
    }

    /// Whether a final render currently holds the session's slot.
    pub fn is_rendering(&self) -> bool {
        self.slot.available_permits() == 0
    }

    fn slot(&self) -> Arc<Semaphore> {
        Arc::clone(&self.slot)
    }
}

/// Wrap a session for sharing.
pub fn share(session: ImageSession) -> SharedSession {
    SharedSession::new(session)
}

/// Lock a shared session, mapping a poisoned lock to an error.
pub fn lock_session(session: &SharedSession) -> Result<MutexGuard<'_, ImageSession>> {
    session.lock()
}

/// A running (or queued) final render.
#[derive(Debug)]
pub struct ApplyHandle {
    progress: watch::Receiver<RenderProgress>,
    cancel: CancelToken,
    join: JoinHandle<Result<FinalImage>>,
}

impl ApplyHandle {
    /// Progress updates. Starts at `0/0` until the render begins.
    pub fn progress(&self) -> watch::Receiver<RenderProgress> {
        self.progress.clone()
    }

    /// Request cancellation. The render stops at the next region boundary
    /// and its output is discarded; the region list is never touched.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Wait for the render to finish.
    pub async fn wait(self) -> Result<FinalImage> {
        self.join
            .await
            .map_err(|e| RedactError::RenderFailed(format!("render task failed: {e}")))?
    }
}

/// Starts final renders for one session.
#[derive(Debug, Clone)]
pub struct RenderWorker {
    session: SharedSession,
    policy: ApplyPolicy,
}

impl RenderWorker {
    pub fn new(session: SharedSession, policy: ApplyPolicy) -> Self {
        Self { session, policy }
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn policy(&self) -> ApplyPolicy {
        self.policy
    }

    /// Whether a render for this session currently holds the slot.
    pub fn is_busy(&self) -> bool {
        self.session.is_rendering()
    }

    /// Start a final render. Must be called from within a tokio runtime.
    ///
    /// With [`ApplyPolicy::Reject`] a render already in flight makes this
    /// fail with [`RedactError::RenderInFlight`]. With [`ApplyPolicy::Queue`]
    /// the new render waits for the slot and snapshots the region list only
    /// once it gets it.
    #[instrument(skip(self), fields(policy = ?self.policy))]
    pub fn start(&self) -> Result<ApplyHandle> {
        let (tx, rx) = watch::channel(RenderProgress::default());
        let cancel = CancelToken::new();

        let join = match self.policy {
            ApplyPolicy::Reject => {
                let permit = self.session.slot().try_acquire_owned().map_err(|_| {
                    warn!("apply rejected: render already in flight");
                    RedactError::RenderInFlight
                })?;
                let snapshot = lock_session(&self.session)?.snapshot();
                let session = self.session.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move { run(session, snapshot, permit, tx, cancel).await })
            }
            ApplyPolicy::Queue => {
                if self.is_busy() {
                    info!("apply queued behind running render");
                }
                let semaphore = self.session.slot();
                let session = self.session.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    let permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| RedactError::RenderFailed("render slot closed".into()))?;
                    if cancel.is_cancelled() {
                        return Err(RedactError::RenderCancelled);
                    }
                    let snapshot = lock_session(&session)?.snapshot();
                    run(session, snapshot, permit, tx, cancel).await
                })
            }
        };

        Ok(ApplyHandle {
            progress: rx,
            cancel,
            join,
        })
    }
}

async fn run(
    session: SharedSession,
    snapshot: RenderSnapshot,
    _permit: OwnedSemaphorePermit,
    progress: watch::Sender<RenderProgress>,
    cancel: CancelToken,
) -> Result<FinalImage> {
    let session_id = snapshot.session_id;
    let region_count = snapshot.regions.len();
    info!(%session_id, region_count, "final render started");

    let render_cancel = cancel.clone();
    let image = tokio::task::spawn_blocking(move || {
        snapshot.render(
            &mut |step: RenderProgress| {
                progress.send_replace(step);
            },
            &render_cancel,
        )
    })
    .await
    .map_err(|e| RedactError::RenderFailed(format!("render thread failed: {e}")))?
    .inspect_err(|e| match e {
        RedactError::RenderCancelled => {}
        other => error!(%session_id, error = %other, "final render failed"),
    })?;

    if cancel.is_cancelled() {
        info!(%session_id, "final render finished after cancellation, output discarded");
        return Err(RedactError::RenderCancelled);
    }

    lock_session(&session)?.store_final(image.clone());
    info!(%session_id, digest = image.digest(), "final render stored");
    Ok(image)
}
