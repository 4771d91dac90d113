//! Single-writer, snapshot-published logo gallery.
//!
//! [`LogoStore`] is the only handle that can change the gallery, and every
//! write takes `&mut self`. Each write publishes a brand-new immutable
//! snapshot through a [`tokio::sync::watch`] channel, so readers holding a
//! [`LogoView`] never observe a partially applied change.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::CoreError;
use crate::logo::Logo;
use crate::types::LogoId;

/// An immutable view of the whole gallery at one point in time.
pub type LogoSnapshot = Arc<[Logo]>;

/// Owner of the session's logo collection.
pub struct LogoStore {
    tx: watch::Sender<LogoSnapshot>,
}

/// Read-only subscriber to a [`LogoStore`].
#[derive(Clone)]
pub struct LogoView {
    rx: watch::Receiver<LogoSnapshot>,
}

impl Default for LogoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LogoStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LogoSnapshot::from(Vec::new()));
        Self { tx }
    }

    pub fn subscribe(&self) -> LogoView {
        LogoView {
            rx: self.tx.subscribe(),
        }
    }

    pub fn snapshot(&self) -> LogoSnapshot {
        self.tx.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: LogoId) -> Option<Logo> {
        self.tx.borrow().iter().find(|l| l.id() == id).cloned()
    }

    /// Append one record per URL, numbering them after the current
    /// collection (`len + index + 1`). Returns the new records.
    pub fn append_generated<I, S>(&mut self, urls: I) -> Vec<Logo>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let current = self.snapshot();
        let base = current.len() as LogoId;
        let added: Vec<Logo> = urls
            .into_iter()
            .enumerate()
            .map(|(index, url)| Logo::new(base + index as LogoId + 1, url))
            .collect();

        self.publish(current.iter().cloned().chain(added.iter().cloned()).collect());
        added
    }

    /// Append a placeholder record.
    pub fn add_sample(&mut self) -> Logo {
        let current = self.snapshot();
        let logo = Logo::placeholder(current.len() as LogoId + 1);
        self.publish(
            current
                .iter()
                .cloned()
                .chain(std::iter::once(logo.clone()))
                .collect(),
        );
        logo
    }

    /// Replace the record that shares `logo`'s id.
    ///
    /// The image URL of a record never changes, so a replacement carrying a
    /// different URL is rejected.
    pub fn update(&mut self, logo: Logo) -> Result<(), CoreError> {
        let current = self.snapshot();
        let existing = current
            .iter()
            .find(|l| l.id() == logo.id())
            .ok_or(CoreError::NotFound {
                entity: "Logo",
                id: logo.id(),
            })?;

        if existing.url() != logo.url() {
            return Err(CoreError::Validation(format!(
                "Logo {} image URL cannot change",
                logo.id()
            )));
        }

        self.publish(
            current
                .iter()
                .map(|l| {
                    if l.id() == logo.id() {
                        logo.clone()
                    } else {
                        l.clone()
                    }
                })
                .collect(),
        );
        Ok(())
    }

    /// Drop every record, ending the session's gallery.
    pub fn reset(&mut self) {
        self.publish(Vec::new());
    }

    fn publish(&mut self, logos: Vec<Logo>) {
        self.tx.send_replace(LogoSnapshot::from(logos));
    }
}

impl LogoView {
    pub fn current(&self) -> LogoSnapshot {
        self.rx.borrow().clone()
    }

    /// Wait for the next published snapshot.
    ///
    /// Returns `None` once the owning store has been dropped.
    pub async fn changed(&mut self) -> Option<LogoSnapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
