//! The control loop driving filtering and debouncing

use crossbeam_channel::{select, Receiver};

use crate::error::WatchError;

use super::debounce::DebounceTrigger;
use super::event::ChangeEvent;
use super::filter::EventFilter;
use super::shutdown::{ShutdownHandle, StopReason};

/// How the loop ended
#[derive(Debug)]
pub(crate) struct LoopExit {
    pub reason: StopReason,
    pub error: Option<WatchError>,
}

pub(crate) struct WatchLoop<'a> {
    filter: &'a EventFilter,
    trigger: DebounceTrigger,
    shutdown: ShutdownHandle,
}

impl<'a> WatchLoop<'a> {
    pub fn new(filter: &'a EventFilter, trigger: DebounceTrigger, shutdown: ShutdownHandle) -> Self {
        Self {
            filter,
            trigger,
            shutdown,
        }
    }

    /// Block until a shutdown request, a mechanism error or a closed
    /// notification channel.
    pub fn run(
        &mut self,
        events: &Receiver<notify::Event>,
        errors: &Receiver<notify::Error>,
        shutdown: &Receiver<StopReason>,
    ) -> LoopExit {
        loop {
            select! {
                recv(events) -> msg => match msg {
                    Ok(event) => self.handle(&event),
                    Err(_) => {
                        tracing::debug!("event channel closed");
                        self.shutdown.request(StopReason::ChannelClosed);
                        return self.drain(errors, shutdown);
                    }
                },
                recv(errors) -> msg => match msg {
                    Ok(err) => {
                        tracing::error!(error = %err, "watch mechanism error");
                        self.shutdown.request(StopReason::MechanismError);
                        return LoopExit {
                            reason: StopReason::MechanismError,
                            error: Some(WatchError::Mechanism(err)),
                        };
                    }
                    Err(_) => {
                        tracing::debug!("error channel closed");
                        self.shutdown.request(StopReason::ChannelClosed);
                        return self.drain(errors, shutdown);
                    }
                },
                recv(shutdown) -> msg => {
                    let reason = msg.unwrap_or(StopReason::ChannelClosed);
                    return self.stop(reason, errors);
                }
            }
        }
    }

    fn handle(&mut self, event: &notify::Event) {
        for change in ChangeEvent::from_notify(event) {
            if self.filter.accept(&change) {
                tracing::debug!(path = %change.path, "change accepted");
                // Handle is dropped; nothing cancels an accepted change.
                let _ = self.trigger.schedule(change.path);
            } else {
                tracing::trace!(path = %change.path, kind = ?change.kind, "change filtered");
            }
        }
    }

    /// Take the first queued shutdown request after a channel closed.
    fn drain(&self, errors: &Receiver<notify::Error>, shutdown: &Receiver<StopReason>) -> LoopExit {
        let reason = shutdown.try_recv().unwrap_or(StopReason::ChannelClosed);
        self.stop(reason, errors)
    }

    /// A mechanism error already queued wins over a clean stop.
    fn stop(&self, reason: StopReason, errors: &Receiver<notify::Error>) -> LoopExit {
        match errors.try_recv() {
            Ok(err) => {
                tracing::error!(error = %err, "watch mechanism error during shutdown");
                LoopExit {
                    reason: StopReason::MechanismError,
                    error: Some(WatchError::Mechanism(err)),
                }
            }
            Err(_) => LoopExit {
                reason,
                error: None,
            },
        }
    }
}
