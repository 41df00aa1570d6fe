use std::collections::HashMap;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

struct ClientSession {
    /// Parent of every in-flight token of the client
    token: CancellationToken,
    in_flight: HashMap<String, TrackedSynthesis>,
    next_generation: u64,
}

/// Handle of one tracked synthesis
///
/// The generation tells apart two syntheses started under the same message
/// id, so finishing the older one leaves the newer one cancellable.
#[derive(Debug, Clone)]
pub struct TrackedSynthesis {
    pub token: CancellationToken,
    generation: u64,
}

/// Connected WebSocket clients and their in-flight syntheses
#[derive(Default)]
pub struct SessionRegistry {
    clients: RwLock<HashMap<String, ClientSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new client, returning its id and connection token
    pub async fn register(&self) -> (String, CancellationToken) {
        let client_id = Uuid::new_v4().to_string();
        let token = CancellationToken::new();

        self.clients.write().await.insert(
            client_id.clone(),
            ClientSession {
                token: token.clone(),
                in_flight: HashMap::new(),
                next_generation: 0,
            },
        );

        tracing::info!(client_id = %client_id, "Client connected");
        (client_id, token)
    }

    /// Drop a client and cancel everything it still has in flight
    pub async fn unregister(&self, client_id: &str) {
        if let Some(session) = self.clients.write().await.remove(client_id) {
            session.token.cancel();
            tracing::info!(
                client_id = %client_id,
                cancelled_in_flight = session.in_flight.len(),
                "Client disconnected"
            );
        }
    }

    /// Start tracking a synthesis. Returns None for unknown clients.
    ///
    /// The returned token is a child of the client token, so it also fires
    /// when the client disconnects. Reusing a message id replaces the
    /// previous entry.
    pub async fn track(&self, client_id: &str, message_id: &str) -> Option<TrackedSynthesis> {
        let mut clients = self.clients.write().await;
        let session = clients.get_mut(client_id)?;

        let tracked = TrackedSynthesis {
            token: session.token.child_token(),
            generation: session.next_generation,
        };
        session.next_generation += 1;
        session
            .in_flight
            .insert(message_id.to_string(), tracked.clone());
        Some(tracked)
    }

    /// Stop tracking a synthesis. No-op when the id has since been reused.
    pub async fn finish(&self, client_id: &str, message_id: &str, tracked: &TrackedSynthesis) {
        if let Some(session) = self.clients.write().await.get_mut(client_id) {
            let current = session
                .in_flight
                .get(message_id)
                .is_some_and(|entry| entry.generation == tracked.generation);
            if current {
                session.in_flight.remove(message_id);
            }
        }
    }

    /// Cancel one in-flight synthesis. False when nothing runs under that id.
    pub async fn cancel(&self, client_id: &str, message_id: &str) -> bool {
        let mut clients = self.clients.write().await;
        let token = clients
            .get_mut(client_id)
            .and_then(|session| session.in_flight.remove(message_id));

        match token {
            Some(tracked) => {
                tracked.token.cancel();
                tracing::info!(
                    client_id = %client_id,
                    message_id = %message_id,
                    "Synthesis cancelled"
                );
                true
            }
            None => false,
        }
    }

    pub async fn connected_clients(&self) -> usize {
        self.clients.read().await.len()
    }
}
