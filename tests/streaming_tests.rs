//! Behavior of asynchronous sources: streams, entry streams, deferred
//! values, incremental delivery and cancellation.

use async_json::{
    fragment_stream, fragment_stream_with_options, json, to_string, to_string_with_options, Error,
    JsonOptions, JsonValue,
};
use futures::{pin_mut, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn stream_backed_array_encodes_like_a_vec() {
    let value = JsonValue::stream(futures::stream::iter(vec![
        json!(1),
        json!("two"),
        json!([3]),
    ]));
    let text = to_string_with_options(value, JsonOptions::compact())
        .await
        .unwrap();
    assert_eq!(text, "[1, \"two\", [3]]");
}

#[tokio::test]
async fn empty_stream_encodes_as_empty_array() {
    let value = JsonValue::stream(futures::stream::iter(Vec::<JsonValue>::new()));
    let text = to_string(value).await.unwrap();
    assert_eq!(text, "[]");
}

#[tokio::test]
async fn entry_stream_encodes_as_object() {
    let value = JsonValue::entries(futures::stream::iter(vec![
        (json!("a"), json!(1)),
        (json!("b"), json!(2)),
    ]));
    let text = to_string_with_options(value, JsonOptions::compact())
        .await
        .unwrap();
    assert_eq!(text, "{\"a\": 1, \"b\": 2}");
}

#[tokio::test]
async fn entry_stream_with_sort_keys_fails_fast() {
    let value = JsonValue::entries(futures::stream::iter(vec![(json!("a"), json!(1))]));
    let options = JsonOptions::compact().sort_keys(true);
    let error = to_string_with_options(value, options).await.unwrap_err();
    assert!(matches!(error, Error::SortRequiresMaterialized));
}

#[tokio::test]
async fn deferred_values_resolve_in_place() {
    let value = json!([
        JsonValue::deferred(async { json!(1) }),
        JsonValue::deferred(async { json!({"inner": true}) })
    ]);
    let text = to_string_with_options(value, JsonOptions::compact())
        .await
        .unwrap();
    assert_eq!(text, "[1, {\"inner\": true}]");
}

#[tokio::test]
async fn deferred_values_resolve_transitively() {
    let value = JsonValue::deferred(async { JsonValue::deferred(async { json!(42) }) });
    let text = to_string(value).await.unwrap();
    assert_eq!(text, "42");
}

#[tokio::test]
async fn deferred_root_may_be_a_container() {
    let value = JsonValue::deferred(async { json!([1]) });
    let text = to_string_with_options(value, JsonOptions::compact())
        .await
        .unwrap();
    assert_eq!(text, "[1]");
}

#[tokio::test]
async fn failed_deferred_ends_the_stream() {
    let value = json!([
        json!(1),
        JsonValue::try_deferred(async { Err(Error::custom("backend down")) }),
        json!(3)
    ]);
    let stream = fragment_stream_with_options(value, JsonOptions::compact());
    pin_mut!(stream);

    let mut emitted = String::new();
    let mut failure = None;
    while let Some(item) = stream.next().await {
        match item {
            Ok(fragment) => emitted.push_str(&fragment),
            Err(error) => {
                failure = Some(error);
                break;
            }
        }
    }
    // Everything before the failing element was already final.
    assert_eq!(emitted, "[1, ");
    assert!(matches!(failure, Some(Error::Custom(_))));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn failed_stream_element_propagates() {
    let value = JsonValue::try_stream(futures::stream::iter(vec![
        Ok(json!(1)),
        Err(Error::custom("mid-stream failure")),
    ]));
    let error = to_string(value).await.unwrap_err();
    assert!(matches!(error, Error::Custom(_)));
}

#[tokio::test]
async fn fragments_are_delivered_before_later_elements_arrive() {
    // The second element stays blocked on a gate until the consumer has
    // already seen the first element's text.
    let (gate_tx, gate_rx) = tokio::sync::oneshot::channel::<()>();

    let source = async_stream::stream! {
        yield json!("first");
        let _ = gate_rx.await;
        yield json!("second");
    };

    let stream = fragment_stream_with_options(
        JsonValue::stream(source),
        JsonOptions::compact(),
    );
    pin_mut!(stream);

    let mut head = String::new();
    // "[" then the first element.
    head.push_str(&stream.next().await.unwrap().unwrap());
    head.push_str(&stream.next().await.unwrap().unwrap());
    assert_eq!(head, "[\"first\"");

    // Only now does the producer unblock.
    gate_tx.send(()).unwrap();

    let mut tail = String::new();
    while let Some(fragment) = stream.next().await {
        tail.push_str(&fragment.unwrap());
    }
    assert_eq!(tail, ", \"second\"]");
}

#[tokio::test]
async fn async_sources_nest_inside_each_other() {
    let inner = JsonValue::stream(futures::stream::iter(vec![json!(1), json!(2)]));
    let value = JsonValue::entries(futures::stream::iter(vec![(json!("xs"), inner)]));
    let text = to_string_with_options(value, JsonOptions::compact())
        .await
        .unwrap();
    assert_eq!(text, "{\"xs\": [1, 2]}");
}

#[tokio::test]
async fn stream_backed_keys_join_like_arrays() {
    let key = JsonValue::stream(futures::stream::iter(vec![json!("id-"), json!(9)]));
    let value = JsonValue::Object(vec![(key, json!(true))]);
    let text = to_string_with_options(value, JsonOptions::compact())
        .await
        .unwrap();
    assert_eq!(text, "{\"id-9\": true}");
}

#[tokio::test]
async fn custom_key_resolver_overrides_joining() {
    let options = JsonOptions::compact().with_key_resolver(|key: JsonValue| {
        Box::pin(async move {
            let n = key.as_array().map(|items| items.len()).unwrap_or(0);
            Ok(format!("key-of-{n}"))
        })
    });
    let value = JsonValue::Object(vec![(json!([1, 2, 3]), json!(0))]);
    let text = to_string_with_options(value, options).await.unwrap();
    assert_eq!(text, "{\"key-of-3\": 0}");
}

#[tokio::test]
async fn dropping_the_stream_releases_open_sources() {
    struct Guard(Arc<AtomicBool>);
    impl Drop for Guard {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    let dropped = Arc::new(AtomicBool::new(false));
    let guard = Guard(Arc::clone(&dropped));

    let source = async_stream::stream! {
        let _guard = guard;
        yield json!(1);
        yield json!(2);
        // Never reached: the consumer walks away after the first element.
        futures::future::pending::<()>().await;
        yield json!(3);
    };

    {
        let stream = fragment_stream(JsonValue::stream(source));
        pin_mut!(stream);
        // Pull "[" and the first element, then abandon the stream.
        stream.next().await.unwrap().unwrap();
        stream.next().await.unwrap().unwrap();
        stream.next().await.unwrap().unwrap();
    }

    assert!(dropped.load(Ordering::SeqCst));
}

#[tokio::test]
async fn slow_elements_arrive_in_order() {
    let source = async_stream::stream! {
        for i in 0..5 {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
            yield json!(i);
        }
    };
    let text = to_string_with_options(JsonValue::stream(source), JsonOptions::compact())
        .await
        .unwrap();
    assert_eq!(text, "[0, 1, 2, 3, 4]");
}
