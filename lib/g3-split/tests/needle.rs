/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;

use bytes::Bytes;

use g3_split::{SplitCursor, SplitError, Splitter, StreamSource};

type TestSource = StreamSource<tokio_stream::Iter<std::vec::IntoIter<io::Result<Bytes>>>>;

fn stream_splitter(chunks: &[&'static [u8]]) -> Splitter<TestSource> {
    let items = chunks
        .iter()
        .map(|c| io::Result::Ok(Bytes::from_static(*c)))
        .collect::<Vec<_>>();
    Splitter::new(StreamSource::new(tokio_stream::iter(items)))
}

async fn split_all(chunks: &[&'static [u8]], needle: &[u8]) -> Vec<String> {
    let mut splitter = stream_splitter(chunks);
    let mut parts = Vec::new();
    while splitter.has_more().await.unwrap() {
        let data = splitter.read_before_needle(needle, None).await.unwrap();
        parts.push(String::from_utf8(data.to_vec()).unwrap());
    }
    parts
}

#[tokio::test]
async fn hello_world() {
    let chunks: &[&'static [u8]] = &[b"he", b"llo", b" wor", b"ld"];

    assert_eq!(split_all(chunks, b"o").await, ["hell", " w", "rld"]);
    assert_eq!(split_all(chunks, b"l").await, ["he", "", "o wor", "d"]);
    assert_eq!(split_all(chunks, b"world").await, ["hello "]);
    assert_eq!(split_all(chunks, b"xyz").await, ["hello world"]);
    assert_eq!(split_all(&[b"hello world"], b"o").await, ["hell", " w", "rld"]);
}

#[tokio::test]
async fn span_boundary() {
    let mut splitter = stream_splitter(&[b"fo", b"o"]);
    let data = splitter.read_before_needle(b"foo", None).await.unwrap();
    assert!(data.is_empty());
    assert!(!splitter.has_more().await.unwrap());

    let mut splitter = stream_splitter(&[b"abcf", b"o", b"obar"]);
    let data = splitter.read_before_needle(b"foo", None).await.unwrap();
    assert_eq!(data.as_ref(), b"abc");
    assert_eq!(splitter.next_chunk().await.unwrap().unwrap().as_ref(), b"bar");
}

#[tokio::test]
async fn needle_at_tail() {
    assert_eq!(
        split_all(&[b"a--b-", b"-c--"], b"--").await,
        ["a", "b", "c"]
    );
}

#[tokio::test]
async fn partial_output() {
    let mut splitter = stream_splitter(&[b"abcdefgh", b"ij\r\n\r\nrest"]);

    let mut cursor = splitter.split_before_needle(b"\r\n\r\n").unwrap();
    let mut parts = Vec::new();
    while let Some(data) = cursor.pull().await.unwrap() {
        parts.push(data.to_vec());
    }
    assert_eq!(parts.concat(), b"abcdefghij");
    assert!(parts.len() > 1);

    assert_eq!(splitter.next_chunk().await.unwrap().unwrap().as_ref(), b"rest");
}

#[tokio::test]
async fn short_tail() {
    let mut splitter = stream_splitter(&[b"ab"]);
    let data = splitter.read_before_needle(b"abc", None).await.unwrap();
    assert_eq!(data.as_ref(), b"ab");
    assert!(splitter.is_ended());
}

#[tokio::test]
async fn limit() {
    let mut splitter = stream_splitter(&[b"0123456789", b"|"]);
    let r = splitter.read_before_needle(b"|", Some(5)).await;
    assert!(matches!(r, Err(SplitError::LimitExceeded(5))));
}

#[tokio::test]
async fn empty_needle() {
    let mut splitter = stream_splitter(&[b"abc"]);
    assert!(matches!(
        splitter.split_before_needle(b""),
        Err(SplitError::InvalidArgument(_))
    ));
    assert!(matches!(
        splitter.read_before_needle(b"", None).await,
        Err(SplitError::InvalidArgument(_))
    ));
    assert_eq!(splitter.consumed(), 0);
    assert!(splitter.has_more().await.unwrap());
}

#[tokio::test]
async fn terminal_after_match() {
    let mut splitter = stream_splitter(&[b"key=value"]);

    let mut cursor = splitter.split_before_needle(b"=").unwrap();
    assert_eq!(cursor.pull().await.unwrap().unwrap().as_ref(), b"key");
    assert!(cursor.is_terminal());
    assert!(cursor.pull().await.unwrap().is_none());
    assert_eq!(splitter.read_size(16).await.unwrap().as_ref(), b"value");
}
