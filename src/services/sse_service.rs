use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::state::{SharedState, Subscription};

/// Register a new subscriber on the shared event hub.
pub fn subscribe(state: &SharedState) -> Subscription {
    state.events().subscribe()
}

/// Convert a hub subscription into an SSE response, forwarding frames and
/// deregistering once the client disconnects.
pub fn to_sse_stream(
    state: SharedState,
    mut subscription: Subscription,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    // forwarder task: reads from the hub channel and pushes into the mpsc
    tokio::spawn(async move {
        let id = subscription.id;
        loop {
            tokio::select! {
                _ = tx.closed() => break,
                received = subscription.receiver.recv() => {
                    let Some(payload) = received else { break };

                    let mut event = Event::default().data(payload.data);
                    if let Some(name) = payload.event {
                        event = event.event(name);
                    }

                    if tx.send(Ok(event)).await.is_err() {
                        break;
                    }
                }
            }
        }

        // Deregister whether the client hung up or the hub already pruned
        // us; unsubscribe is idempotent.
        state.events().unsubscribe(id);
        tracing::info!(subscriber = %id, "SSE stream disconnected");
    });

    // response stream reads from the mpsc; when the client disconnects axum
    // drops this stream and the forwarder task winds down
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
