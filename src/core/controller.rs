use crate::core::view::{
    update, Effect, Msg, ViewState, LOOKUP_FAILED, PURGE_FAILED, UPLOAD_FAILED,
};
use crate::core::view_model::AppViewModel;
use crate::domain::ports::ViabilityApi;
use crate::utils::timer::ElapsedTimer;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{Id, JoinError, JoinSet};

const UPLOAD_TICK: Duration = Duration::from_secs(1);

enum Next {
    Joined(Result<(Id, Msg), JoinError>),
    Queued(Option<Msg>),
}

/// Drives a [`ViewState`]: runs the effects `update` asks for and feeds
/// request completions and timer ticks back in, one message at a time.
///
/// Requests run as spawned tasks, so a pending lookup never blocks the purge
/// prompt or an upload. The upload timer is owned here and is aborted when
/// the upload settles or when the controller is dropped. Dropping the
/// controller also aborts every pending request.
pub struct ViewController<A: ViabilityApi + 'static> {
    api: Arc<A>,
    state: ViewState,
    tx: mpsc::UnboundedSender<Msg>,
    rx: mpsc::UnboundedReceiver<Msg>,
    requests: JoinSet<Msg>,
    /// Failure message posted for a request task that panics or is cancelled.
    fallbacks: HashMap<Id, Msg>,
    upload_timer: Option<ElapsedTimer>,
    tick_period: Duration,
    in_flight: usize,
}

impl<A: ViabilityApi + 'static> ViewController<A> {
    pub fn new(api: A, state: ViewState) -> Self {
        Self::with_shared_api(Arc::new(api), state)
    }

    pub fn with_shared_api(api: Arc<A>, state: ViewState) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            state,
            tx,
            rx,
            requests: JoinSet::new(),
            fallbacks: HashMap::new(),
            upload_timer: None,
            tick_period: UPLOAD_TICK,
            in_flight: 0,
        }
    }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Requests started and not yet settled.
    pub fn pending_requests(&self) -> usize {
        self.in_flight
    }

    pub fn is_upload_timer_running(&self) -> bool {
        self.upload_timer
            .as_ref()
            .is_some_and(ElapsedTimer::is_running)
    }

    /// Applies a message and starts whatever it triggers. Must be called
    /// from inside a tokio runtime.
    pub fn dispatch(&mut self, msg: Msg) {
        if msg.is_completion() {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        let state = std::mem::take(&mut self.state);
        let (next, effects) = update(state, msg);
        self.state = next;

        for effect in effects {
            self.run_effect(effect);
        }
    }

    /// Waits for the next request completion or timer tick and applies it.
    pub async fn step(&mut self) -> Option<Msg> {
        let next = tokio::select! {
            Some(joined) = self.requests.join_next_with_id(), if !self.requests.is_empty() => {
                Next::Joined(joined)
            }
            msg = self.rx.recv() => Next::Queued(msg),
        };
        let msg = match next {
            Next::Joined(Ok((id, msg))) => {
                self.fallbacks.remove(&id);
                msg
            }
            Next::Joined(Err(e)) => self.request_failed(e)?,
            Next::Queued(msg) => msg?,
        };
        self.dispatch(msg.clone());
        Some(msg)
    }

    /// Processes messages until no request is pending.
    pub async fn settle(&mut self) {
        self.settle_with(|_, _| {}).await;
    }

    /// Like [`settle`](Self::settle), calling `on_change` after every message.
    pub async fn settle_with<F>(&mut self, mut on_change: F)
    where
        F: FnMut(&Msg, &AppViewModel),
    {
        while self.in_flight > 0 {
            let Some(msg) = self.step().await else {
                break;
            };
            on_change(&msg, &self.view());
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        tracing::debug!("Running effect: {:?}", effect);
        match effect {
            Effect::Lookup(query) => self.spawn_request(
                move |api| async move {
                    let outcome = api.lookup(&query).await;
                    Msg::LookupSettled(outcome.map_err(|e| e.user_friendly_message()))
                },
                Msg::LookupSettled(Err(LOOKUP_FAILED.to_string())),
            ),
            Effect::Upload(file) => self.spawn_request(
                move |api| async move {
                    let outcome = api.upload(&file).await;
                    Msg::UploadSettled(outcome.map_err(|e| e.user_friendly_message()))
                },
                Msg::UploadSettled(Err(UPLOAD_FAILED.to_string())),
            ),
            Effect::Purge => self.spawn_request(
                |api| async move {
                    let outcome = api.purge().await;
                    Msg::PurgeSettled(outcome.map_err(|e| e.user_friendly_message()))
                },
                Msg::PurgeSettled(Err(PURGE_FAILED.to_string())),
            ),
            Effect::StartUploadTimer => {
                let tx = self.tx.clone();
                // Replacing an old timer drops, and so aborts, it.
                self.upload_timer = Some(ElapsedTimer::start(self.tick_period, move || {
                    tx.send(Msg::UploadTick).is_ok()
                }));
            }
            Effect::StopUploadTimer => {
                if let Some(timer) = self.upload_timer.take() {
                    tracing::debug!("Upload timer stopped after {:?}", timer.elapsed());
                    timer.stop();
                }
            }
        }
    }

    fn request_failed(&mut self, error: JoinError) -> Option<Msg> {
        tracing::error!("Request task failed: {}", error);
        self.fallbacks.remove(&error.id())
    }

    fn spawn_request<F, Fut>(&mut self, request: F, on_failure: Msg)
    where
        F: FnOnce(Arc<A>) -> Fut,
        Fut: Future<Output = Msg> + Send + 'static,
    {
        self.in_flight += 1;
        let handle = self.requests.spawn(request(self.api.clone()));
        self.fallbacks.insert(handle.id(), on_failure);
    }
}
