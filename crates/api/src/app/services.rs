use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use dealroom_events::{EventBus, EventEnvelope, InMemoryEventBus};
use dealroom_infra::{
    BusNotifier, Clock, DealroomConfig, InMemoryLeadRepository, NegotiationService,
};
use dealroom_negotiation::{Actor, NegotiationPolicy, NotificationIntent};

pub type NotificationBus = Arc<InMemoryEventBus<EventEnvelope<NotificationIntent>>>;

pub type LeadService = NegotiationService<Arc<InMemoryLeadRepository>, BusNotifier<NotificationBus>>;

/// Notification broadcasted via SSE.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RealtimeMessage {
    pub sequence_number: u64,
    pub intent: NotificationIntent,
}

pub struct AppServices {
    negotiation: LeadService,
    clock: Arc<dyn Clock>,
    realtime_tx: broadcast::Sender<RealtimeMessage>,
}

impl AppServices {
    pub fn negotiation(&self) -> &LeadService {
        &self.negotiation
    }

    pub fn policy(&self) -> &NegotiationPolicy {
        self.negotiation.policy()
    }

    /// The only place request handling reads time.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn realtime_tx(&self) -> &broadcast::Sender<RealtimeMessage> {
        &self.realtime_tx
    }
}

/// Wire the in-memory repository, notification bus and realtime fan-out.
pub fn build_services(config: &DealroomConfig, clock: Arc<dyn Clock>) -> AppServices {
    let bus: NotificationBus = Arc::new(InMemoryEventBus::new());

    // Realtime channel (SSE): lossy broadcast, role-filtered in handlers.
    let (realtime_tx, _realtime_rx) = broadcast::channel::<RealtimeMessage>(256);

    // Background subscriber: bus -> realtime. Ends when the bus is dropped.
    {
        let sub = bus.subscribe();
        let realtime_tx = realtime_tx.clone();
        tokio::task::spawn_blocking(move || {
            while let Ok(env) = sub.recv() {
                let sequence_number = env.sequence_number();
                // No subscribers is fine; intents are best-effort.
                let _ = realtime_tx.send(RealtimeMessage {
                    sequence_number,
                    intent: env.into_payload(),
                });
            }
            tracing::debug!("notification bus closed");
        });
    }

    let negotiation = NegotiationService::new(
        Arc::new(InMemoryLeadRepository::new()),
        BusNotifier::new(bus),
        config.policy,
    );

    AppServices {
        negotiation,
        clock,
        realtime_tx,
    }
}

pub fn notification_sse_stream(
    services: Arc<AppServices>,
    role: Option<Actor>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime_tx().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(move |msg| match msg {
        Ok(m) if role.is_none_or(|r| m.intent.kind.recipients().contains(&r)) => {
            let data = serde_json::to_string(&m).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default()
                .event(m.intent.kind.as_str())
                .id(m.sequence_number.to_string())
                .data(data)))
        }
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = %e, "notification stream lagged");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
