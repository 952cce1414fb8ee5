/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::ChunkSource;
use crate::SplitConfig;

/// Turn each `read` on an [`AsyncRead`] into one chunk.
pub struct ReaderSource<R> {
    reader: R,
    buf: BytesMut,
    buffer_size: usize,
    closed: bool,
}

impl<R> ReaderSource<R> {
    pub fn new(reader: R, config: &SplitConfig) -> Self {
        ReaderSource {
            reader,
            buf: BytesMut::new(),
            buffer_size: config.read_buffer_size(),
            closed: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[async_trait]
impl<R> ChunkSource for ReaderSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn next_chunk(&mut self) -> io::Result<Option<Bytes>> {
        if self.closed {
            return Ok(None);
        }

        self.buf.reserve(self.buffer_size);
        let nr = self.reader.read_buf(&mut self.buf).await?;
        if nr == 0 {
            self.closed = true;
            return Ok(None);
        }
        Ok(Some(self.buf.split().freeze()))
    }

    fn cancel(&mut self) {
        self.closed = true;
    }
}
