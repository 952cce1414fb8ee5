/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};

use super::ChunkSource;

/// Use each item of a [`Stream`] as one chunk.
pub struct StreamSource<St> {
    stream: St,
    closed: bool,
}

impl<St> StreamSource<St> {
    pub fn new(stream: St) -> Self {
        StreamSource {
            stream,
            closed: false,
        }
    }

    pub fn into_inner(self) -> St {
        self.stream
    }
}

#[async_trait]
impl<St> ChunkSource for StreamSource<St>
where
    St: Stream<Item = io::Result<Bytes>> + Unpin + Send,
{
    async fn next_chunk(&mut self) -> io::Result<Option<Bytes>> {
        if self.closed {
            return Ok(None);
        }
        match self.stream.next().await {
            Some(r) => r.map(Some),
            None => {
                self.closed = true;
                Ok(None)
            }
        }
    }

    fn cancel(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancel() {
        let stream = tokio_stream::iter(vec![
            io::Result::Ok(Bytes::from_static(b"a")),
            io::Result::Ok(Bytes::from_static(b"b")),
        ]);
        let mut source = StreamSource::new(stream);

        assert_eq!(source.next_chunk().await.unwrap().unwrap().as_ref(), b"a");
        source.cancel();
        assert!(source.next_chunk().await.unwrap().is_none());
    }
}
