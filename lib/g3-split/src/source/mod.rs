/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;

use async_trait::async_trait;
use bytes::Bytes;

mod reader;
pub use reader::ReaderSource;

mod stream;
pub use stream::StreamSource;

/// A pull based producer of byte chunks.
///
/// Chunks may be empty, the splitter will skip them.
#[async_trait]
pub trait ChunkSource: Send {
    /// Return the next chunk, or `None` once the source is exhausted.
    async fn next_chunk(&mut self) -> io::Result<Option<Bytes>>;

    /// Called once when the splitter is terminated before the source ends.
    fn cancel(&mut self) {}

    /// Error injection hook.
    ///
    /// The returned error is the one reported to the caller of `Splitter::fail`.
    fn fail(&mut self, e: io::Error) -> io::Error {
        e
    }
}

#[async_trait]
impl<T: ChunkSource + ?Sized> ChunkSource for Box<T> {
    async fn next_chunk(&mut self) -> io::Result<Option<Bytes>> {
        (**self).next_chunk().await
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }

    fn fail(&mut self, e: io::Error) -> io::Error {
        (**self).fail(e)
    }
}
