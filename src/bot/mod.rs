use std::sync::Arc;

use tokio::{sync::mpsc::UnboundedReceiver, task::JoinSet};

use crate::bot::{dispatcher::dispatcher::{DispatchOutcome, Dispatcher}, invocation::invocation::Invocation};

pub mod state;
pub mod invocation;
pub mod dispatcher;
pub mod commands;
pub mod platforms;
pub mod permissions;
pub mod handler;
pub mod replies;
pub mod uploader;

#[cfg(test)]
pub(crate) mod testing;

/// Dispatches every invocation from `rx` on its own task until the sender side
/// closes, then waits for the in-flight ones. Returns how many were handled.
pub async fn run_event_loop(dispatcher: Arc<Dispatcher>, mut rx: UnboundedReceiver<Invocation>) -> usize {
    let mut tasks: JoinSet<DispatchOutcome> = JoinSet::new();
    let mut handled = 0;

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(invocation) => {
                    let dispatcher = dispatcher.clone();
                    tasks.spawn(async move { dispatcher.handle(invocation).await });
                }
                None => break,
            },
            Some(done) = tasks.join_next(), if !tasks.is_empty() => {
                handled += reap(done);
            }
        }
    }

    while let Some(done) = tasks.join_next().await {
        handled += reap(done);
    }
    handled
}

fn reap(done: Result<DispatchOutcome, tokio::task::JoinError>) -> usize {
    match done {
        Ok(_) => 1,
        Err(e) => {
            tracing::error!("Event error: {e:?}");
            0
        }
    }
}
