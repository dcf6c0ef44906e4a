//! SyncWorker — background worker keeping the session caches live
//!
//! 1. Connect WebSocket to the Gateway push channel
//! 2. Catch-up refresh of every cache on (re)connect
//! 3. Listen for push frames → re-fetch the affected collection
//! 4. Keepalive ping every 30s
//! 5. Reconnect with exponential backoff on disconnect
//!
//! Push frames are treated as change hints, never as data: the Gateway
//! response to the follow-up fetch is the only thing committed to a
//! cache. Replaying or reordering frames therefore cannot corrupt state.

use std::sync::Arc;

use bls_client::{GatewayClient, GatewayError, PushStream, ReconnectPolicy};
use futures::{SinkExt, StreamExt};
use shared::models::SystemStatus;
use shared::{Notice, PushEvent};
use tokio::sync::{broadcast, watch};
use tokio::time::Duration;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::store::SessionStores;

/// WebSocket keepalive ping interval
const WS_PING_INTERVAL_SECS: u64 = 30;

/// Connection state of the push channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Connected,
}

/// What a push event asks the session to do
#[derive(Debug, PartialEq)]
pub(crate) enum SyncEffect {
    RefreshApplicants,
    RefreshCredentials,
    RefreshBookings,
    ReplaceStatus(SystemStatus),
    Ignore,
}

impl SyncEffect {
    pub(crate) fn of(event: &PushEvent) -> Self {
        match event {
            PushEvent::ApplicantCreated { .. }
            | PushEvent::ApplicantUpdated { .. }
            | PushEvent::ApplicantDeleted { .. } => Self::RefreshApplicants,
            PushEvent::CredentialCreated { .. }
            | PushEvent::CredentialUpdated { .. }
            | PushEvent::CredentialDeleted { .. } => Self::RefreshCredentials,
            PushEvent::SystemStatus { status }
            | PushEvent::SystemStarted { status }
            | PushEvent::SystemStopped { status } => Self::ReplaceStatus(status.clone()),
            PushEvent::BookingCompleted { .. } => Self::RefreshBookings,
            PushEvent::Unknown { .. } => Self::Ignore,
        }
    }
}

/// Re-fetch the applicant list and commit it under a fresh ticket.
pub(crate) async fn refresh_applicants(
    gateway: &GatewayClient,
    stores: &SessionStores,
) -> Result<bool, GatewayError> {
    let ticket = stores.applicants.begin_refresh();
    let applicants = gateway.list_applicants().await?;
    Ok(stores.applicants.commit(ticket, applicants).await)
}

pub(crate) async fn refresh_credentials(
    gateway: &GatewayClient,
    stores: &SessionStores,
) -> Result<bool, GatewayError> {
    let ticket = stores.credentials.begin_refresh();
    let credentials = gateway.list_credentials().await?;
    Ok(stores.credentials.commit(ticket, credentials).await)
}

pub(crate) async fn refresh_bookings(
    gateway: &GatewayClient,
    stores: &SessionStores,
) -> Result<bool, GatewayError> {
    let ticket = stores.bookings.begin_refresh();
    let bookings = gateway.list_bookings().await?;
    Ok(stores.bookings.commit(ticket, bookings).await)
}

pub(crate) async fn refresh_status(
    gateway: &GatewayClient,
    stores: &SessionStores,
) -> Result<bool, GatewayError> {
    let ticket = stores.status.begin_update();
    let status = gateway.system_status().await?;
    Ok(stores.status.commit(ticket, status).await)
}

/// Log a failed refresh and surface it to the operator.
pub(crate) fn report_refresh_failure(
    notices: &broadcast::Sender<Notice>,
    what: &str,
    error: &GatewayError,
) {
    tracing::warn!("failed to refresh {what}: {error}");
    let _ = notices.send(Notice::warning(
        "Refresh failed",
        format!("Could not refresh {what}: {error}"),
    ));
}

pub(crate) struct SyncWorker {
    gateway: Arc<GatewayClient>,
    stores: Arc<SessionStores>,
    notices: broadcast::Sender<Notice>,
    channel_state: watch::Sender<ChannelState>,
    shutdown: CancellationToken,
    reconnect: ReconnectPolicy,
}

impl SyncWorker {
    pub(crate) fn new(
        gateway: Arc<GatewayClient>,
        stores: Arc<SessionStores>,
        notices: broadcast::Sender<Notice>,
        channel_state: watch::Sender<ChannelState>,
        shutdown: CancellationToken,
        reconnect: ReconnectPolicy,
    ) -> Self {
        Self {
            gateway,
            stores,
            notices,
            channel_state,
            shutdown,
            reconnect,
        }
    }

    /// Main run loop — connect the push channel, apply events, reconnect
    /// on failure.
    pub(crate) async fn run(self) {
        tracing::info!("SyncWorker started");
        let mut reconnect_delay = self.reconnect.initial_delay;

        loop {
            // Check shutdown before attempting connection
            if self.shutdown.is_cancelled() {
                break;
            }

            self.set_state(ChannelState::Connecting);
            match self.gateway.connect_push().await {
                Ok(ws) => {
                    reconnect_delay = self.reconnect.initial_delay;
                    self.set_state(ChannelState::Connected);
                    // Events missed while disconnected leave no trace on
                    // the wire, so every connect starts with a full
                    // catch-up refresh.
                    self.refresh_all().await;
                    self.run_push_session(ws).await;
                    self.set_state(ChannelState::Disconnected);
                }
                Err(e) => {
                    self.set_state(ChannelState::Disconnected);
                    tracing::warn!(
                        delay_secs = reconnect_delay.as_secs(),
                        "push channel connection failed, retrying: {e}"
                    );
                }
            }

            // Wait before reconnecting
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(reconnect_delay) => {},
            }
            reconnect_delay = self.reconnect.next_delay(reconnect_delay);
        }

        self.set_state(ChannelState::Disconnected);
        tracing::info!("SyncWorker stopped");
    }

    fn set_state(&self, state: ChannelState) {
        self.channel_state.send_replace(state);
    }

    async fn refresh_all(&self) {
        if let Err(e) = refresh_applicants(&self.gateway, &self.stores).await {
            report_refresh_failure(&self.notices, "applicants", &e);
        }
        if let Err(e) = refresh_credentials(&self.gateway, &self.stores).await {
            report_refresh_failure(&self.notices, "credentials", &e);
        }
        if let Err(e) = refresh_bookings(&self.gateway, &self.stores).await {
            report_refresh_failure(&self.notices, "bookings", &e);
        }
        if let Err(e) = refresh_status(&self.gateway, &self.stores).await {
            report_refresh_failure(&self.notices, "automation status", &e);
        }
    }

    /// Run a single push session until disconnect or shutdown
    async fn run_push_session(&self, ws: PushStream) {
        let (mut ws_sink, mut ws_stream) = ws.split();

        let mut ping_interval =
            tokio::time::interval(Duration::from_secs(WS_PING_INTERVAL_SECS));
        ping_interval.tick().await; // skip immediate tick

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    let _ = ws_sink.close().await;
                    return;
                }

                // Keepalive ping
                _ = ping_interval.tick() => {
                    if ws_sink.send(Message::Ping(vec![].into())).await.is_err() {
                        tracing::warn!("push channel ping failed, disconnecting");
                        return;
                    }
                }

                // Incoming push frame
                msg = ws_stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            self.handle_frame(&text).await;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            let _ = ws_sink.send(Message::Pong(data)).await;
                        }
                        Some(Ok(Message::Close(_))) => {
                            tracing::info!("push channel closed by gateway");
                            return;
                        }
                        Some(Err(e)) => {
                            tracing::warn!("push channel error: {e}");
                            return;
                        }
                        None => {
                            tracing::info!("push channel stream ended");
                            return;
                        }
                        _ => {} // Binary, Pong — ignore
                    }
                }
            }
        }
    }

    /// Parse one frame and apply it. Malformed frames are dropped; the
    /// channel stays up.
    pub(crate) async fn handle_frame(&self, frame: &str) {
        let event = match PushEvent::parse(frame) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("dropping malformed push frame: {e}");
                return;
            }
        };
        self.apply(event).await;
    }

    pub(crate) async fn apply(&self, event: PushEvent) {
        tracing::debug!(event = event.tag(), "applying push event");
        match SyncEffect::of(&event) {
            SyncEffect::RefreshApplicants => {
                if let Err(e) = refresh_applicants(&self.gateway, &self.stores).await {
                    report_refresh_failure(&self.notices, "applicants", &e);
                }
            }
            SyncEffect::RefreshCredentials => {
                if let Err(e) = refresh_credentials(&self.gateway, &self.stores).await {
                    report_refresh_failure(&self.notices, "credentials", &e);
                }
            }
            SyncEffect::RefreshBookings => {
                let _ = self
                    .notices
                    .send(Notice::info("Booking completed", "A booking just completed."));
                if let Err(e) = refresh_bookings(&self.gateway, &self.stores).await {
                    report_refresh_failure(&self.notices, "bookings", &e);
                }
            }
            SyncEffect::ReplaceStatus(status) => {
                let ticket = self.stores.status.begin_update();
                self.stores.status.commit(ticket, status).await;
            }
            SyncEffect::Ignore => {
                tracing::debug!(event = event.tag(), "ignoring unrecognized push event");
            }
        }
    }
}
