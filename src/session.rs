//! Process-wide identity cache for embedders of the planner (client shells,
//! background jobs) that act on behalf of one signed-in user.
//!
//! The provider pushes identity changes; a single listener task is the only
//! writer of the cached value. [`Session::refresh`] hands its re-read value
//! to that task too. Consumers read through [`Session::current`] or a
//! [`watch::Receiver`].

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::auth::{Identity, JwtKeys};
use crate::error::{AppError, AppResult};

/// Source of the current identity and of identity-change notifications.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_identity(&self) -> anyhow::Result<Option<Identity>>;
    fn subscribe(&self) -> broadcast::Receiver<Option<Identity>>;
}

type Refresh = (Option<Identity>, oneshot::Sender<()>);

pub struct Session {
    provider: Arc<dyn IdentityProvider>,
    refreshes: mpsc::Sender<Refresh>,
    rx: watch::Receiver<Option<Identity>>,
    listener: Option<JoinHandle<()>>,
}

impl Session {
    /// Subscribes to identity changes, loads the current identity and starts
    /// the listener task. Must be called from within a tokio runtime.
    pub async fn init(provider: Arc<dyn IdentityProvider>) -> anyhow::Result<Self> {
        // subscribe first so a change racing the initial read is not lost
        let mut events = provider.subscribe();
        let initial = provider.current_identity().await?;
        let (tx, rx) = watch::channel(initial);
        let (refreshes, mut refresh_rx) = mpsc::channel::<Refresh>(4);

        let listener = tokio::spawn(async move {
            loop {
                tokio::select! {
                    event = events.recv() => match event {
                        Ok(identity) => {
                            debug!(signed_in = identity.is_some(), "identity changed");
                            tx.send_replace(identity);
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(skipped, "identity events lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    Some((identity, done)) = refresh_rx.recv() => {
                        debug!(signed_in = identity.is_some(), "identity refreshed");
                        tx.send_replace(identity);
                        let _ = done.send(());
                    }
                }
            }
        });

        Ok(Self {
            provider,
            refreshes,
            rx,
            listener: Some(listener),
        })
    }

    pub fn current(&self) -> Option<Identity> {
        self.rx.borrow().clone()
    }

    /// Read-only handle that is notified on every identity change.
    pub fn watch(&self) -> watch::Receiver<Option<Identity>> {
        self.rx.clone()
    }

    pub fn require_user(&self) -> AppResult<Identity> {
        self.current().ok_or(AppError::NotAuthenticated)
    }

    /// Re-reads the identity from the provider, e.g. after a profile change,
    /// and waits until the listener has published it.
    pub async fn refresh(&self) -> anyhow::Result<Option<Identity>> {
        let identity = self.provider.current_identity().await?;
        let (done, published) = oneshot::channel();
        self.refreshes
            .send((identity.clone(), done))
            .await
            .map_err(|_| anyhow::anyhow!("session listener stopped"))?;
        published
            .await
            .map_err(|_| anyhow::anyhow!("session listener stopped"))?;
        Ok(identity)
    }

    /// Stops listening for identity changes.
    pub async fn teardown(mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
            let _ = listener.await;
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

/// Identity provider holding one bearer token, verified with the service keys.
pub struct TokenIdentityProvider {
    keys: JwtKeys,
    token: RwLock<Option<String>>,
    events: broadcast::Sender<Option<Identity>>,
}

impl TokenIdentityProvider {
    pub fn new(keys: JwtKeys) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            keys,
            token: RwLock::new(None),
            events,
        }
    }

    pub fn sign_in(&self, token: String) -> anyhow::Result<Identity> {
        let identity: Identity = self.keys.verify_access(&token)?.into();
        *self
            .token
            .write()
            .map_err(|_| anyhow::anyhow!("token lock poisoned"))? = Some(token);
        let _ = self.events.send(Some(identity.clone()));
        Ok(identity)
    }

    pub fn sign_out(&self) -> anyhow::Result<()> {
        *self
            .token
            .write()
            .map_err(|_| anyhow::anyhow!("token lock poisoned"))? = None;
        let _ = self.events.send(None);
        Ok(())
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }
}

#[async_trait]
impl IdentityProvider for TokenIdentityProvider {
    async fn current_identity(&self) -> anyhow::Result<Option<Identity>> {
        let token = self
            .token
            .read()
            .map_err(|_| anyhow::anyhow!("token lock poisoned"))?
            .clone();
        Ok(token.and_then(|t| match self.keys.verify_access(&t) {
            Ok(claims) => Some(claims.into()),
            Err(e) => {
                warn!(error = %e, "stored token no longer valid");
                None
            }
        }))
    }

    fn subscribe(&self) -> broadcast::Receiver<Option<Identity>> {
        self.events.subscribe()
    }
}
