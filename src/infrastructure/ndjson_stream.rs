// Chunked newline-delimited JSON streaming utilities
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use serde::Serialize;
use tokio::sync::watch;

/// Create a chunked response with one JSON document per line
pub fn ndjson_stream<S, T>(stream: S) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = T> + Send + 'static,
    T: Serialize + Send + 'static,
{
    let byte_stream = stream.map(|item| serialize_line(&item));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(byte_stream))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize one item followed by a newline
fn serialize_line<T: Serialize>(item: &T) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(item)?;
    let mut line = BytesMut::with_capacity(json.len() + 1);
    line.put_slice(&json);
    line.put_u8(b'\n');
    Ok(line.freeze())
}

/// Stream the current value of a watch channel and every change after it,
/// ending when the sender is dropped.
pub fn watch_stream<T, U, F>(mut rx: watch::Receiver<T>, mut to_item: F) -> impl Stream<Item = U> + Send
where
    T: Send + Sync + 'static,
    U: Send + 'static,
    F: FnMut(&T) -> U + Send + 'static,
{
    async_stream::stream! {
        let first = to_item(&rx.borrow_and_update());
        yield first;
        while rx.changed().await.is_ok() {
            let next = to_item(&rx.borrow_and_update());
            yield next;
        }
    }
}

/// Helper to create a streaming response from a watch receiver
pub fn stream_from_watch<T, U, F>(rx: watch::Receiver<T>, to_item: F) -> impl IntoResponse
where
    T: Send + Sync + 'static,
    U: Serialize + Send + 'static,
    F: FnMut(&T) -> U + Send + 'static,
{
    match ndjson_stream(watch_stream(rx, to_item)) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_line() {
        let line = serialize_line(&serde_json::json!({"query": "alp"})).unwrap();
        assert_eq!(&line[..], b"{\"query\":\"alp\"}\n");
    }

    #[tokio::test]
    async fn test_watch_stream_yields_current_then_changes() {
        let (tx, rx) = watch::channel(1u32);
        let stream = watch_stream(rx, |v| *v * 10);
        futures::pin_mut!(stream);

        assert_eq!(stream.next().await, Some(10));

        tx.send_replace(2);
        assert_eq!(stream.next().await, Some(20));

        drop(tx);
        assert_eq!(stream.next().await, None);
    }
}
