//! A table controller wired to a gateway.
//!
//! [`TableSession`] owns one [`TableController`] behind an async mutex,
//! runs page fetches through a [`Gateway`], and publishes a fresh
//! [`TableView`] on a watch channel after every change. Starting a new
//! fetch aborts the one still in flight, so at most one response is ever
//! waited on.

use futures_util::future::{AbortHandle, Abortable, Aborted};
use tokio::sync::{Mutex, watch};
use tracing::{debug, instrument};

use crate::table::{ControllerConfig, FetchOutcome, FetchTicket, TableController, TableView};
use crate::traits::Gateway;

struct SessionState {
    controller: TableController,
    in_flight: Option<(FetchTicket, AbortHandle)>,
}

impl SessionState {
    fn abort_in_flight(&mut self) -> Option<FetchTicket> {
        self.in_flight.take().map(|(ticket, handle)| {
            handle.abort();
            ticket
        })
    }
}

/// One live table backed by a gateway.
pub struct TableSession<G> {
    gateway: G,
    state: Mutex<SessionState>,
    views: watch::Sender<TableView>,
}

impl<G: Gateway> TableSession<G> {
    pub fn new(gateway: G, config: ControllerConfig) -> Self {
        let controller = TableController::new(config);
        let (views, _) = watch::channel(controller.view());
        Self {
            gateway,
            state: Mutex::new(SessionState {
                controller,
                in_flight: None,
            }),
            views,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Receive a new view after every state change.
    pub fn subscribe(&self) -> watch::Receiver<TableView> {
        self.views.subscribe()
    }

    /// The most recently published view.
    pub fn view(&self) -> TableView {
        self.views.borrow().clone()
    }

    fn publish(&self, controller: &TableController) {
        self.views.send_replace(controller.view());
    }

    /// Read the controller state.
    pub async fn read<R>(&self, f: impl FnOnce(&TableController) -> R) -> R {
        let state = self.state.lock().await;
        f(&state.controller)
    }

    /// Mutate the controller and publish the resulting view.
    ///
    /// This does not fetch; call [`TableSession::sync`] afterwards when the
    /// change may have moved to a page that is not loaded.
    pub async fn update<R>(&self, f: impl FnOnce(&mut TableController) -> R) -> R {
        let mut state = self.state.lock().await;
        let result = f(&mut state.controller);
        self.publish(&state.controller);
        result
    }

    /// Fetch the current page only if it is not already shown or loading.
    pub async fn sync(&self) -> Option<FetchOutcome> {
        let needed = self.read(TableController::needs_fetch).await;
        if needed { Some(self.refresh().await) } else { None }
    }

    /// Fetch the current page, aborting any fetch still in flight.
    ///
    /// Follows up automatically when the response moves the page index
    /// (deferred navigation or a shrunken collection). A fetch aborted by a
    /// newer refresh resolves to [`FetchOutcome::Stale`].
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> FetchOutcome {
        loop {
            let (ticket, registration) = {
                let mut state = self.state.lock().await;
                if let Some(superseded) = state.abort_in_flight() {
                    debug!(
                        generation = superseded.generation(),
                        "aborting superseded fetch"
                    );
                }
                let ticket = state.controller.begin_fetch();
                let (handle, registration) = AbortHandle::new_pair();
                state.in_flight = Some((ticket, handle));
                self.publish(&state.controller);
                (ticket, registration)
            };

            let fetched =
                Abortable::new(self.gateway.fetch_page(ticket.query()), registration).await;

            let mut state = self.state.lock().await;
            if state
                .in_flight
                .as_ref()
                .is_some_and(|(current, _)| current.generation() == ticket.generation())
            {
                state.in_flight = None;
            }

            let outcome = match fetched {
                Ok(result) => state.controller.complete_fetch(&ticket, result),
                Err(Aborted) => {
                    debug!(generation = ticket.generation(), "fetch aborted");
                    FetchOutcome::Stale
                }
            };
            self.publish(&state.controller);

            match outcome {
                FetchOutcome::Applied { refetch: true } => continue,
                other => return other,
            }
        }
    }

    /// Abort the fetch in flight, if any, leaving the shown page as it is.
    pub async fn cancel(&self) -> bool {
        let mut state = self.state.lock().await;
        let Some(ticket) = state.abort_in_flight() else {
            return false;
        };
        state.controller.cancel_fetch(&ticket);
        self.publish(&state.controller);
        true
    }
}
