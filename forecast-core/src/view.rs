//! Presentation-side coordinator.
//!
//! [`ViewService`] keeps a disposable snapshot of the forecast list, drives a
//! [`DataBroker`] for every operation and tells subscribers whenever the
//! snapshot changes.

use std::{fmt, sync::Arc};

use uuid::Uuid;

use crate::{BrokerError, ForecastRecord, broker::DataBroker};

/// Where the snapshot is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing loaded yet, or the last load failed.
    Empty,
    /// List cleared, waiting on the broker.
    Loading,
    Loaded,
}

/// Payload delivered to change subscribers.
#[derive(Debug, Clone, Copy)]
pub enum ListChange<'a> {
    Loading,
    Loaded(&'a [ForecastRecord]),
    Failed(&'a BrokerError),
}

impl<'a> ListChange<'a> {
    /// The list carried by this event; empty unless loaded.
    pub fn records(&self) -> &'a [ForecastRecord] {
        match self {
            ListChange::Loaded(records) => *records,
            ListChange::Loading | ListChange::Failed(_) => &[],
        }
    }
}

pub type ChangeHandler = Box<dyn Fn(&ListChange<'_>) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct ViewService {
    broker: Arc<dyn DataBroker>,
    records: Vec<ForecastRecord>,
    state: ViewState,
    subscribers: Vec<(SubscriptionId, ChangeHandler)>,
    next_subscription: u64,
}

impl ViewService {
    pub fn new(broker: Arc<dyn DataBroker>) -> Self {
        Self {
            broker,
            records: Vec::new(),
            state: ViewState::Empty,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Register `handler`; it runs synchronously after every handler registered before it.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&ListChange<'_>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Reload the list from the broker.
    ///
    /// Always emits two notifications: `Loading`, then `Loaded` or `Failed`.
    pub async fn refresh(&mut self) -> Result<(), BrokerError> {
        self.records.clear();
        self.state = ViewState::Loading;
        self.notify(&ListChange::Loading);

        match self.broker.list().await {
            Ok(records) => {
                self.records = records;
                self.state = ViewState::Loaded;
                self.notify(&ListChange::Loaded(&self.records));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load forecasts");
                self.state = ViewState::Empty;
                self.notify(&ListChange::Failed(&err));
                Err(err)
            }
        }
    }

    /// Add `record` and reload the list.
    ///
    /// A broker failure is returned without reloading; a rejected add
    /// (`Ok(false)`) still reloads so the view shows what the store holds.
    /// The result reflects the add alone: a failed reload only reaches
    /// subscribers as [`ListChange::Failed`].
    pub async fn add_record(&mut self, record: ForecastRecord) -> Result<bool, BrokerError> {
        let added = self.broker.add(record).await?;
        self.reload_after_write().await;
        Ok(added)
    }

    /// Delete the record with `id` and reload the list. Same failure rules as [`Self::add_record`].
    pub async fn delete_record(&mut self, id: Uuid) -> Result<bool, BrokerError> {
        let deleted = self.broker.delete(id).await?;
        self.reload_after_write().await;
        Ok(deleted)
    }

    async fn reload_after_write(&mut self) {
        // The write is already committed; refresh() has announced the failure.
        if self.refresh().await.is_err() {
            tracing::debug!("list reload after write failed");
        }
    }

    fn notify(&self, change: &ListChange<'_>) {
        for (_, handler) in &self.subscribers {
            handler(change);
        }
    }
}

impl fmt::Debug for ViewService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewService")
            .field("broker", &self.broker)
            .field("state", &self.state)
            .field("records", &self.records.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
