//! Application Context
//!
//! Owns the configuration, signed-in session and transport shared by every
//! collection view, and hands out views bound to them.

use std::sync::Arc;

use tracing::info;

use crate::collection::{Collection, CollectionView};
use crate::config::ClientConfig;
use crate::error::SyncError;
use crate::notes::ShoppingNotes;
use crate::pantry::PantryItems;
use crate::session::Session;
use crate::transport::{HttpTransport, Transport};

pub struct AppContext<T: Transport + Clone = HttpTransport> {
    config: ClientConfig,
    session: Arc<Session>,
    transport: T,
}

impl AppContext<HttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, SyncError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport + Clone> AppContext<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let session = Arc::new(Session::default());
        if let Some(user) = config.default_user {
            session.sign_in(user);
        }
        info!(server = %config.server_url, "app context ready");
        Self {
            config,
            session,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn view<C: Collection>(&self) -> CollectionView<C, T> {
        CollectionView::new(
            self.transport.clone(),
            self.config.server_url.clone(),
            Arc::clone(&self.session),
        )
    }

    pub fn items(&self) -> CollectionView<PantryItems, T> {
        self.view()
    }

    pub fn notes(&self) -> CollectionView<ShoppingNotes, T> {
        self.view()
    }

    /// Signs the session out; views still alive refuse further requests.
    pub fn shutdown(&self) {
        self.session.sign_out();
        info!("app context shut down");
    }
}
