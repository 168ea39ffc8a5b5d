use std::collections::VecDeque;

use futures_util::{SinkExt, StreamExt};
use rflink_frame::LineCodec;
use rflink_transport::GatewayIo;
use serde::Serialize;
use tokio::io::{ReadHalf, WriteHalf};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, warn};

use crate::command::{Intent, LISTING_REQUEST};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::message::{DeviceInfo, Message};
use crate::record::ChannelRecord;
use crate::registry::{Registry, CHANNEL_COUNT};

/// Lifecycle of a gateway connection. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionState {
    /// Transport open, welcome banner not seen yet.
    Connecting,
    /// The gateway has announced itself.
    Identified,
    /// The transport is gone.
    Closed,
}

#[derive(Debug, Clone)]
struct Link {
    state: ConnectionState,
    device: Option<DeviceInfo>,
}

type Reply<T> = oneshot::Sender<Result<T>>;

enum Request {
    Enumerate {
        done: Reply<Registry>,
    },
    /// The caller gave up waiting; publish whatever the listing has so far.
    ExpireEnumeration {
        current: oneshot::Sender<Registry>,
    },
    Command {
        channel: u8,
        intent: Intent,
        reply: Reply<String>,
    },
    Shutdown,
}

/// Handle to a running gateway connection.
///
/// All protocol state (registry, pending replies, line buffer) lives on a
/// single I/O task spawned by [`Gateway::spawn`]. The handle talks to it
/// through a request queue and observes it through watch channels, so
/// [`Gateway::snapshot`] never sees a half-applied update.
///
/// Replies carry no correlation id: the gateway is assumed to answer
/// commands in the order they were sent, and each acknowledgment resolves
/// the oldest command still waiting.
///
/// A channel listing is collected off to the side and published in one
/// step when the sixteenth record arrives, so commands issued meanwhile
/// keep using the previous registry.
pub struct Gateway {
    requests: mpsc::Sender<Request>,
    link: watch::Receiver<Link>,
    registry: watch::Receiver<Registry>,
    config: GatewayConfig,
    task: JoinHandle<()>,
}

impl Gateway {
    /// Start servicing `io` on a new task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<T: GatewayIo>(io: T, config: GatewayConfig) -> Self {
        let (read, write) = tokio::io::split(io);
        let (request_tx, request_rx) = mpsc::channel(config.request_buffer.max(1));
        let (link_tx, link_rx) = watch::channel(Link {
            state: ConnectionState::Connecting,
            device: None,
        });
        let (registry_tx, registry_rx) = watch::channel(Registry::new());

        let task = IoTask {
            lines: FramedRead::new(read, LineCodec::with_max_line_length(config.max_line_length)),
            sink: FramedWrite::new(write, LineCodec::new()),
            requests: request_rx,
            link: link_tx,
            registry_tx,
            registry: Registry::new(),
            pending: VecDeque::new(),
            listing: None,
        };

        Self {
            requests: request_tx,
            link: link_rx,
            registry: registry_rx,
            config,
            task: tokio::spawn(task.run()),
        }
    }

    /// Wait for the gateway's welcome banner.
    pub async fn connect_and_identify(&self) -> Result<DeviceInfo> {
        let timeout = self.config.identify_timeout;
        let mut link = self.link.clone();
        let waited = tokio::time::timeout(
            timeout,
            link.wait_for(|link| link.state != ConnectionState::Connecting),
        )
        .await;

        match waited {
            Ok(Ok(link)) => match (&link.state, &link.device) {
                (ConnectionState::Identified, Some(device)) => Ok(device.clone()),
                _ => Err(GatewayError::ConnectionLost),
            },
            Ok(Err(_)) => Err(GatewayError::ConnectionLost),
            Err(_) => {
                warn!(?timeout, "timed out waiting for welcome message");
                Err(GatewayError::Timeout {
                    operation: "identification",
                    after: timeout,
                })
            }
        }
    }

    /// Re-read all sixteen channel records from the gateway.
    ///
    /// Calls made while a listing is already running wait for that listing
    /// instead of requesting another. On timeout the records received so far
    /// replace the registry and stay available through [`Gateway::snapshot`].
    pub async fn enumerate_channels(&self) -> Result<Registry> {
        let (done, rx) = oneshot::channel();
        self.submit(Request::Enumerate { done }).await?;

        let timeout = self.config.enumerate_timeout;
        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(GatewayError::ConnectionLost),
            Err(_) => {
                let registry = self.expire_enumeration().await?;
                if registry.is_complete() {
                    return Ok(registry);
                }
                warn!(
                    ?timeout,
                    found = registry.len(),
                    missing = ?registry.missing(),
                    "timed out waiting for channel listing"
                );
                Err(GatewayError::Incomplete {
                    found: registry.len(),
                })
            }
        }
    }

    async fn expire_enumeration(&self) -> Result<Registry> {
        let (current, rx) = oneshot::channel();
        self.submit(Request::ExpireEnumeration { current }).await?;
        rx.await.map_err(|_| GatewayError::ConnectionLost)
    }

    /// Send `intent` on `channel` and wait for the gateway's acknowledgment.
    ///
    /// Unknown channels, and inactive channels for anything but PAIR, are
    /// rejected before anything is written.
    pub async fn send_command(&self, channel: u8, intent: Intent) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.submit(Request::Command {
            channel,
            intent,
            reply,
        })
        .await?;

        let timeout = self.config.command_timeout;
        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(GatewayError::ConnectionLost),
            Err(_) => {
                warn!(channel, %intent, ?timeout, "timed out waiting for acknowledgment");
                Err(GatewayError::Timeout {
                    operation: "command",
                    after: timeout,
                })
            }
        }
    }

    /// Current channel registry.
    pub fn snapshot(&self) -> Registry {
        self.registry.borrow().clone()
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.link.borrow().state
    }

    /// Identity announced by the gateway, once seen.
    pub fn device(&self) -> Option<DeviceInfo> {
        self.link.borrow().device.clone()
    }

    /// Stop the I/O task and release the transport.
    ///
    /// Commands still waiting for a reply fail with [`GatewayError::Closed`].
    pub async fn close(self) {
        let _ = self.requests.send(Request::Shutdown).await;
        if let Err(err) = self.task.await {
            warn!(%err, "gateway I/O task ended abnormally");
        }
    }

    async fn submit(&self, request: Request) -> Result<()> {
        if self.state() == ConnectionState::Closed {
            return Err(GatewayError::Closed);
        }
        self.requests
            .send(request)
            .await
            .map_err(|_| GatewayError::Closed)
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("state", &self.state())
            .field("channels", &self.registry.borrow().len())
            .finish()
    }
}

/// A channel listing in progress.
struct Listing {
    records: Registry,
    waiters: Vec<Reply<Registry>>,
}

/// Owns the transport and every piece of mutable protocol state.
struct IoTask<T> {
    lines: FramedRead<ReadHalf<T>, LineCodec>,
    sink: FramedWrite<WriteHalf<T>, LineCodec>,
    requests: mpsc::Receiver<Request>,
    link: watch::Sender<Link>,
    registry_tx: watch::Sender<Registry>,
    registry: Registry,
    pending: VecDeque<Reply<String>>,
    listing: Option<Listing>,
}

impl<T: GatewayIo> IoTask<T> {
    async fn run(mut self) {
        let requested = loop {
            tokio::select! {
                line = self.lines.next() => match line {
                    Some(Ok(line)) => self.dispatch(&line),
                    Some(Err(err)) => {
                        warn!(%err, "gateway read failed");
                        break false;
                    }
                    None => {
                        info!("gateway closed the connection");
                        break false;
                    }
                },
                request = self.requests.recv() => match request {
                    Some(Request::Enumerate { done }) => self.enumerate(done).await,
                    Some(Request::ExpireEnumeration { current }) => self.expire(current),
                    Some(Request::Command { channel, intent, reply }) => {
                        self.command(channel, intent, reply).await
                    }
                    Some(Request::Shutdown) | None => {
                        debug!("gateway shutting down");
                        break true;
                    }
                },
            }
        };
        self.close(requested);
    }

    fn dispatch(&mut self, line: &str) {
        match Message::classify(line) {
            Message::Record(record) => self.store(record),
            Message::MalformedRecord { line, error } => {
                warn!(%error, line = %line, "discarding malformed channel record");
            }
            Message::Welcome(device) => self.identify(device),
            Message::MalformedWelcome { line, error } => {
                warn!(%error, line = %line, "discarding unreadable welcome message");
            }
            Message::Ack { code, payload } => self.acknowledge(&code, payload),
            Message::Unrecognized(line) => debug!(line = %line, "unrecognized gateway output"),
        }
    }

    fn store(&mut self, record: ChannelRecord) {
        let Some(listing) = self.listing.as_mut() else {
            debug!(%record, "ignoring channel record outside a listing");
            return;
        };
        debug!(%record, "channel record");
        listing.records.insert(record);
        if !listing.records.is_complete() {
            return;
        }

        if let Some(listing) = self.listing.take() {
            info!(channels = CHANNEL_COUNT, "channel listing complete");
            self.registry = listing.records;
            self.publish();
            for done in listing.waiters {
                let _ = done.send(Ok(self.registry.clone()));
            }
        }
    }

    fn identify(&mut self, device: DeviceInfo) {
        if self.link.borrow().state != ConnectionState::Connecting {
            debug!(%device, "ignoring repeated welcome message");
            return;
        }
        info!(%device, "connected to gateway");
        self.link.send_modify(|link| {
            link.state = ConnectionState::Identified;
            link.device = Some(device);
        });
    }

    fn acknowledge(&mut self, code: &str, payload: String) {
        while let Some(slot) = self.pending.pop_front() {
            if slot.is_closed() {
                debug!("dropping reply slot of expired command");
                continue;
            }
            debug!(code, payload = %payload, "command acknowledged");
            let _ = slot.send(Ok(payload));
            return;
        }
        warn!(code, payload = %payload, "acknowledgment with no command waiting");
    }

    async fn enumerate(&mut self, done: Reply<Registry>) {
        if let Some(listing) = self.listing.as_mut() {
            debug!("joining channel listing already in progress");
            listing.waiters.push(done);
            return;
        }

        match self.write(LISTING_REQUEST).await {
            Ok(()) => {
                self.listing = Some(Listing {
                    records: Registry::new(),
                    waiters: vec![done],
                });
            }
            Err(err) => {
                let _ = done.send(Err(err));
            }
        }
    }

    /// Give up on the running listing and publish what it collected.
    fn expire(&mut self, current: oneshot::Sender<Registry>) {
        if let Some(listing) = self.listing.take() {
            let found = listing.records.len();
            self.registry = listing.records;
            self.publish();
            for done in listing.waiters {
                let _ = done.send(Err(GatewayError::Incomplete { found }));
            }
        }
        let _ = current.send(self.registry.clone());
    }

    async fn command(&mut self, channel: u8, intent: Intent, reply: Reply<String>) {
        let frame = match self.encode(channel, intent) {
            Ok(frame) => frame,
            Err(err) => {
                debug!(%err, "command rejected");
                let _ = reply.send(Err(err));
                return;
            }
        };

        self.pending.retain(|slot| !slot.is_closed());
        self.pending.push_back(reply);
        if let Err(err) = self.write(&frame).await {
            if let Some(slot) = self.pending.pop_back() {
                let _ = slot.send(Err(err));
            }
        }
    }

    fn encode(&mut self, channel: u8, intent: Intent) -> Result<String> {
        let record = self
            .registry
            .get_mut(channel)
            .ok_or(GatewayError::UnknownChannel(channel))?;
        if !record.is_active() && intent != Intent::Pair {
            return Err(GatewayError::InactiveChannel(channel));
        }
        let frame = record.encode(intent);
        self.publish();
        Ok(frame)
    }

    async fn write(&mut self, frame: &str) -> Result<()> {
        debug!(frame, "writing to gateway");
        self.sink.send(frame).await?;
        Ok(())
    }

    fn publish(&self) {
        self.registry_tx.send_replace(self.registry.clone());
    }

    /// Enter `Closed` and fail everything still waiting.
    fn close(&mut self, requested: bool) {
        let reason = || {
            if requested {
                GatewayError::Closed
            } else {
                GatewayError::ConnectionLost
            }
        };

        self.link.send_modify(|link| link.state = ConnectionState::Closed);

        let failed = self.pending.len();
        for slot in self.pending.drain(..) {
            let _ = slot.send(Err(reason()));
        }
        for done in self.listing.take().into_iter().flat_map(|l| l.waiters) {
            let _ = done.send(Err(reason()));
        }
        if failed > 0 {
            warn!(failed, reason = %reason(), "failed pending commands");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::DuplexStream;

    use super::*;
    use crate::record::{Address, UNINITIALIZED_ROLLING_CODE};

    const WELCOME: &str = "20;00;Nodo RadioFrequencyLink - RFLink Gateway V1.1 - R46;";

    /// The device end of an in-memory serial line.
    struct FakeGateway {
        lines: FramedRead<ReadHalf<DuplexStream>, LineCodec>,
        sink: FramedWrite<WriteHalf<DuplexStream>, LineCodec>,
    }

    impl FakeGateway {
        async fn say(&mut self, line: &str) {
            self.sink.send(line).await.unwrap();
        }

        async fn heard(&mut self) -> String {
            self.lines.next().await.unwrap().unwrap()
        }

        async fn list_channels(&mut self, inactive: &[u8]) {
            for id in 1..=16u8 {
                let record = if inactive.contains(&id) {
                    ChannelRecord::new(id, Address::UNPAIRED, UNINITIALIZED_ROLLING_CODE)
                } else {
                    ChannelRecord::new(id, Address::new(0x1A2B00 + id as u32), 0x0010)
                };
                self.say(&record.unwrap().listing_line()).await;
            }
        }
    }

    fn start() -> (Gateway, FakeGateway) {
        let (host, device) = tokio::io::duplex(4096);
        let gateway = Gateway::spawn(host, GatewayConfig::default());
        let (read, write) = tokio::io::split(device);
        let fake = FakeGateway {
            lines: FramedRead::new(read, LineCodec::new()),
            sink: FramedWrite::new(write, LineCodec::new()),
        };
        (gateway, fake)
    }

    async fn enumerated(inactive: &[u8]) -> (Gateway, FakeGateway) {
        let (gateway, mut fake) = start();
        let (registry, _) = tokio::join!(gateway.enumerate_channels(), async {
            assert_eq!(fake.heard().await, LISTING_REQUEST);
            fake.list_channels(inactive).await;
        });
        assert!(registry.unwrap().is_complete());
        (gateway, fake)
    }

    #[tokio::test(start_paused = true)]
    async fn identifies_on_welcome() {
        let (gateway, mut fake) = start();
        assert_eq!(gateway.state(), ConnectionState::Connecting);

        fake.say("RFLink booting").await;
        fake.say(WELCOME).await;
        let device = gateway.connect_and_identify().await.unwrap();

        assert_eq!(device.name, "RFLink Gateway V1.1");
        assert_eq!(device.revision, "46");
        assert_eq!(gateway.state(), ConnectionState::Identified);
        assert_eq!(gateway.device(), Some(device));
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_welcome_keeps_first_identity() {
        let (gateway, mut fake) = start();
        fake.say(WELCOME).await;
        gateway.connect_and_identify().await.unwrap();

        fake.say("20;00;Other - Device - R1;").await;
        let device = gateway.connect_and_identify().await.unwrap();
        assert_eq!(device.product, "Nodo RadioFrequencyLink");
    }

    #[tokio::test(start_paused = true)]
    async fn identification_times_out() {
        let (gateway, _fake) = start();
        let err = gateway.connect_and_identify().await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Timeout {
                operation: "identification",
                ..
            }
        ));
        assert_eq!(gateway.state(), ConnectionState::Connecting);
    }

    #[tokio::test(start_paused = true)]
    async fn enumeration_collects_sixteen_records() {
        let (gateway, _fake) = enumerated(&[7]).await;
        let snapshot = gateway.snapshot();
        assert_eq!(snapshot.len(), 16);
        assert!(!snapshot.is_active(7));
        assert!(snapshot.is_active(8));
    }

    #[tokio::test(start_paused = true)]
    async fn enumeration_with_missing_records_fails_but_keeps_partial_registry() {
        let (gateway, mut fake) = start();
        let (result, _) = tokio::join!(gateway.enumerate_channels(), async {
            fake.heard().await;
            for id in 1..=15u8 {
                let record = ChannelRecord::new(id, Address::new(0x100000), 1).unwrap();
                fake.say(&record.listing_line()).await;
            }
            fake.say("RTS Record: 16 Address:").await;
        });

        assert!(matches!(result, Err(GatewayError::Incomplete { found: 15 })));
        assert_eq!(gateway.snapshot().missing(), vec![16]);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_enumeration_replaces_previous_registry() {
        let (gateway, mut fake) = enumerated(&[]).await;
        let (result, _) = tokio::join!(gateway.enumerate_channels(), async {
            fake.heard().await;
            fake.say("RTS Record: 1 Address: 1A2B01 RC: 0011").await;
        });

        assert!(matches!(result, Err(GatewayError::Incomplete { found: 1 })));
        assert_eq!(gateway.snapshot().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn listing_in_progress_is_not_visible() {
        let (gateway, mut fake) = enumerated(&[]).await;

        let (registry, _) = tokio::join!(gateway.enumerate_channels(), async {
            assert_eq!(fake.heard().await, LISTING_REQUEST);
            for id in 1..=5u8 {
                let record = ChannelRecord::new(id, Address::new(0x2B0000 + id as u32), 0x0100);
                fake.say(&record.unwrap().listing_line()).await;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;

            let snapshot = gateway.snapshot();
            assert_eq!(snapshot.len(), 16);
            assert_eq!(snapshot.get(1).unwrap().address(), Address::new(0x1A2B01));

            let (reply, _) = tokio::join!(gateway.send_command(9, Intent::Up), async {
                assert_eq!(fake.heard().await, "10;RTS;1A2B09;9;UP;");
                fake.say("20;06;OK;").await;
            });
            assert_eq!(reply.unwrap(), "OK");

            for id in 6..=16u8 {
                let record = ChannelRecord::new(id, Address::new(0x2B0000 + id as u32), 0x0100);
                fake.say(&record.unwrap().listing_line()).await;
            }
        });

        let registry = registry.unwrap();
        assert_eq!(registry.get(1).unwrap().address(), Address::new(0x2B0001));
        assert_eq!(gateway.snapshot(), registry);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_enumerations_share_one_listing() {
        let (gateway, mut fake) = start();

        let (first, second, _) = tokio::join!(
            gateway.enumerate_channels(),
            gateway.enumerate_channels(),
            async {
                assert_eq!(fake.heard().await, LISTING_REQUEST);
                fake.list_channels(&[]).await;
            }
        );

        assert!(first.unwrap().is_complete());
        assert!(second.unwrap().is_complete());
        assert!(
            tokio::time::timeout(Duration::from_millis(50), fake.heard())
                .await
                .is_err(),
            "only one listing request should be written"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn command_resolves_with_ack_payload() {
        let (gateway, mut fake) = enumerated(&[]).await;
        let (result, _) = tokio::join!(gateway.send_command(3, Intent::Up), async {
            assert_eq!(fake.heard().await, "10;RTS;1A2B03;3;UP;");
            fake.say("20;01;OK;").await;
        });

        assert_eq!(result.unwrap(), "OK");
        assert_eq!(gateway.snapshot().get(3).unwrap().rolling_code(), 0x0011);
    }

    #[tokio::test(start_paused = true)]
    async fn acks_resolve_in_send_order() {
        let (gateway, mut fake) = enumerated(&[]).await;
        let (first, second, _) = tokio::join!(
            gateway.send_command(1, Intent::Up),
            gateway.send_command(2, Intent::Down),
            async {
                assert_eq!(fake.heard().await, "10;RTS;1A2B01;1;UP;");
                assert_eq!(fake.heard().await, "10;RTS;1A2B02;2;DOWN;");
                fake.say("20;02;OK;").await;
                fake.say("20;03;CMD UNKNOWN;").await;
            }
        );

        assert_eq!(first.unwrap(), "OK");
        assert_eq!(second.unwrap(), "CMD UNKNOWN");
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_and_inactive_channels_are_rejected_without_writing() {
        let (gateway, mut fake) = enumerated(&[7]).await;

        assert!(matches!(
            gateway.send_command(17, Intent::Up).await,
            Err(GatewayError::UnknownChannel(17))
        ));
        assert!(matches!(
            gateway.send_command(7, Intent::Up).await,
            Err(GatewayError::InactiveChannel(7))
        ));

        let (result, _) = tokio::join!(gateway.send_command(7, Intent::Pair), async {
            let frame = fake.heard().await;
            let fields: Vec<&str> = frame.split(';').collect();
            assert_eq!(fields[..2], ["10", "RTS"]);
            assert_eq!(fields[2].len(), 6);
            assert_ne!(fields[2], "FFFFFF");
            assert_eq!(fields[3..], ["0001", "7", "PAIR", ""]);
            fake.say("20;04;OK;").await;
        });

        assert_eq!(result.unwrap(), "OK");
        let record = gateway.snapshot().get(7).cloned().unwrap();
        assert!(record.is_active());
        assert_eq!(record.rolling_code(), 0x0002);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_command_slot_is_pruned() {
        let (gateway, mut fake) = enumerated(&[]).await;

        let (result, _) = tokio::join!(gateway.send_command(1, Intent::Stop), async {
            fake.heard().await;
        });
        assert!(matches!(
            result,
            Err(GatewayError::Timeout {
                operation: "command",
                ..
            })
        ));

        let (result, _) = tokio::join!(gateway.send_command(2, Intent::Stop), async {
            fake.heard().await;
            fake.say("20;05;OK;").await;
        });
        assert_eq!(result.unwrap(), "OK");
    }

    #[tokio::test(start_paused = true)]
    async fn transport_closure_fails_pending_commands_and_later_sends() {
        let (gateway, mut fake) = enumerated(&[]).await;

        let (first, second, _) = tokio::join!(
            gateway.send_command(1, Intent::Up),
            gateway.send_command(2, Intent::Up),
            async move {
                fake.heard().await;
                fake.heard().await;
                drop(fake);
            }
        );

        assert!(matches!(first, Err(GatewayError::ConnectionLost)));
        assert!(matches!(second, Err(GatewayError::ConnectionLost)));
        assert_eq!(gateway.state(), ConnectionState::Closed);
        assert!(matches!(
            gateway.send_command(3, Intent::Up).await,
            Err(GatewayError::Closed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn closure_before_welcome_fails_identification() {
        let (gateway, fake) = start();
        drop(fake);
        assert!(matches!(
            gateway.connect_and_identify().await,
            Err(GatewayError::ConnectionLost)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn close_stops_io_task() {
        let (gateway, mut fake) = start();
        gateway.close().await;
        assert!(fake.lines.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn unreadable_banner_does_not_resolve_a_command() {
        let (gateway, mut fake) = enumerated(&[]).await;
        let (result, _) = tokio::join!(gateway.send_command(5, Intent::Up), async {
            fake.heard().await;
            fake.say("20;00;Nodo RadioFrequencyLink - RFLink Gateway V1.1;").await;
            fake.say("20;07;OK;").await;
        });

        assert_eq!(result.unwrap(), "OK");
        assert_eq!(gateway.state(), ConnectionState::Connecting);
    }

    #[tokio::test(start_paused = true)]
    async fn unsolicited_ack_is_ignored() {
        let (gateway, mut fake) = enumerated(&[]).await;
        fake.say("20;09;OK;").await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let (result, _) = tokio::join!(gateway.send_command(4, Intent::Down), async {
            fake.heard().await;
            fake.say("20;0A;OK;").await;
        });
        assert_eq!(result.unwrap(), "OK");
    }
}
