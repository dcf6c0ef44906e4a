//! Console session
//!
//! One [`ConsoleSession`] per Gateway connection. It loads the visa
//! catalog up front, owns the session caches, and runs the sync worker
//! in the background until teardown. Everything a rendering surface
//! needs comes off this type: cache snapshots, notice subscriptions,
//! channel state, and draft controllers.

use std::sync::Arc;

use bls_client::{GatewayClient, GatewayConfig};
use shared::Notice;
use shared::models::{Applicant, AutomationAck, Booking, Credential, SystemStatus};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::booking::BookingDraftController;
use crate::error::{ConsoleError, ConsoleResult};
use crate::rules::RuleTable;
use crate::store::SessionStores;
use crate::sync::{self, ChannelState, SyncWorker};

/// Notices buffered per subscriber before the oldest are dropped
const NOTICE_BUFFER: usize = 256;

#[derive(Debug)]
pub struct ConsoleSession {
    gateway: Arc<GatewayClient>,
    rules: Arc<RuleTable>,
    stores: Arc<SessionStores>,
    notices: broadcast::Sender<Notice>,
    channel_state: watch::Receiver<ChannelState>,
    shutdown: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl ConsoleSession {
    /// Connect to the Gateway and start the session.
    ///
    /// Fails when the Gateway is unreachable or serves an unusable visa
    /// catalog. The caches are filled best-effort before returning; the
    /// sync worker keeps them live from here on.
    pub async fn init(config: GatewayConfig) -> ConsoleResult<Self> {
        let gateway = Arc::new(config.build_client()?);

        let catalog = gateway.visa_info().await?;
        let rules = Arc::new(RuleTable::from_visa_info(&catalog)?);

        let stores = Arc::new(SessionStores::new());
        let (notices, _) = broadcast::channel(NOTICE_BUFFER);
        let (state_tx, state_rx) = watch::channel(ChannelState::Disconnected);
        let shutdown = CancellationToken::new();

        let worker = SyncWorker::new(
            gateway.clone(),
            stores.clone(),
            notices.clone(),
            state_tx,
            shutdown.clone(),
            config.reconnect,
        );
        let handle = tokio::spawn(worker.run());

        let session = Self {
            gateway,
            rules,
            stores,
            notices,
            channel_state: state_rx,
            shutdown,
            worker: Some(handle),
        };

        // The worker refreshes again once the push channel is up; this
        // first fill covers Gateways whose WebSocket is unreachable.
        session.refresh_all().await;

        Ok(session)
    }

    /// Refresh every cache, keeping whatever succeeds.
    pub async fn refresh_all(&self) {
        let _ = self.refresh_applicants().await;
        let _ = self.refresh_credentials().await;
        let _ = self.refresh_bookings().await;
        let _ = self.refresh_status().await;
    }

    pub async fn refresh_applicants(&self) -> ConsoleResult<()> {
        sync::refresh_applicants(&self.gateway, &self.stores)
            .await
            .map_err(|e| {
                sync::report_refresh_failure(&self.notices, "applicants", &e);
                ConsoleError::from(e)
            })?;
        Ok(())
    }

    pub async fn refresh_credentials(&self) -> ConsoleResult<()> {
        sync::refresh_credentials(&self.gateway, &self.stores)
            .await
            .map_err(|e| {
                sync::report_refresh_failure(&self.notices, "credentials", &e);
                ConsoleError::from(e)
            })?;
        Ok(())
    }

    pub async fn refresh_bookings(&self) -> ConsoleResult<()> {
        sync::refresh_bookings(&self.gateway, &self.stores)
            .await
            .map_err(|e| {
                sync::report_refresh_failure(&self.notices, "bookings", &e);
                ConsoleError::from(e)
            })?;
        Ok(())
    }

    pub async fn refresh_status(&self) -> ConsoleResult<()> {
        sync::refresh_status(&self.gateway, &self.stores)
            .await
            .map_err(|e| {
                sync::report_refresh_failure(&self.notices, "automation status", &e);
                ConsoleError::from(e)
            })?;
        Ok(())
    }

    /// Ask the Gateway to start the booking automation.
    ///
    /// The ticket is taken before the call, so a status push racing the
    /// acknowledgment wins over the ack's embedded status.
    pub async fn start_automation(&self) -> ConsoleResult<AutomationAck> {
        let ticket = self.stores.status.begin_update();
        let ack = self.gateway.start_automation().await?;
        self.stores.status.commit(ticket, ack.status.clone()).await;
        Ok(ack)
    }

    pub async fn stop_automation(&self) -> ConsoleResult<AutomationAck> {
        let ticket = self.stores.status.begin_update();
        let ack = self.gateway.stop_automation().await?;
        self.stores.status.commit(ticket, ack.status.clone()).await;
        Ok(ack)
    }

    pub async fn applicants(&self) -> Vec<Applicant> {
        self.stores.applicants.snapshot().await
    }

    pub async fn credentials(&self) -> Vec<Credential> {
        self.stores.credentials.snapshot().await
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.stores.bookings.snapshot().await
    }

    /// Automation status, None until the first refresh or push lands.
    pub async fn system_status(&self) -> Option<SystemStatus> {
        self.stores.status.current().await
    }

    pub fn rules(&self) -> Arc<RuleTable> {
        self.rules.clone()
    }

    /// Direct Gateway access for one-shot calls the caches do not cover
    /// (credential tests, captcha, applicant edits).
    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Watch the push channel state for connection indicators.
    pub fn channel_state(&self) -> watch::Receiver<ChannelState> {
        self.channel_state.clone()
    }

    /// Start a booking draft seeded from the catalog defaults.
    pub fn new_draft(&self) -> ConsoleResult<BookingDraftController> {
        BookingDraftController::new(self.rules.clone(), self.gateway.clone(), self.notices.clone())
    }

    /// Stop the sync worker and wait for it to finish.
    pub async fn teardown(&mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.worker.take()
            && let Err(e) = handle.await
        {
            tracing::warn!("sync worker did not shut down cleanly: {e}");
        }
    }
}

impl Drop for ConsoleSession {
    fn drop(&mut self) {
        // Teardown without await; the worker observes the token and exits.
        self.shutdown.cancel();
    }
}
