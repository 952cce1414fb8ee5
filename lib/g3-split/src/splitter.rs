/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;

use bytes::{Bytes, BytesMut};

use crate::cursor::{
    ChunkedHttpBodyCursor, ChunkedHttpBodyState, ChunkedStreamCursor, ChunkedStreamState, Cursor,
    LineCursor, LineState, NeedleCursor, NeedleState, SizeCursor, SizeState, SplitCursor,
};
use crate::{ByteOrder, ChunkSource, ProtocolError, SplitConfig, SplitError};

/// Buffering engine between a [`ChunkSource`] and the cursors created from it.
///
/// Every cursor borrows the splitter mutably, so only one of them can be
/// iterated at a time. A new cursor continues exactly where the last one
/// stopped.
///
/// ```compile_fail
/// use g3_split::{ChunkSource, SplitCursor, Splitter};
///
/// async fn interleave<S: ChunkSource>(splitter: &mut Splitter<S>) {
///     let mut line = splitter.split_line();
///     let mut block = splitter.split_size(4);
///     let _ = line.pull().await;
///     let _ = block.pull().await;
/// }
/// ```
pub struct Splitter<S> {
    source: S,
    config: SplitConfig,
    leftover: Option<Bytes>,
    ended: bool,
    terminated: bool,
    busy: bool,
    consumed: u64,
}

impl<S> Splitter<S> {
    pub fn new(source: S) -> Self {
        Splitter::with_config(source, SplitConfig::default())
    }

    pub fn with_config(source: S, config: SplitConfig) -> Self {
        Splitter {
            source,
            config,
            leftover: None,
            ended: false,
            terminated: false,
            busy: false,
            consumed: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Whether no more data will ever be returned.
    pub fn is_ended(&self) -> bool {
        self.ended && self.leftover.is_none()
    }

    /// Whether [`Splitter::terminate`] has been called, directly or because
    /// of a fatal error.
    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Bytes handed out so far, leftover excluded.
    #[inline]
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Give back the source together with the bytes already pulled from it
    /// but not yet consumed.
    pub fn into_parts(self) -> (S, Option<Bytes>) {
        (self.source, self.leftover)
    }

    pub(crate) fn stash(&mut self, rest: Bytes) {
        if rest.is_empty() {
            return;
        }
        debug_assert!(self.leftover.is_none());
        self.consumed -= rest.len() as u64;
        self.leftover = Some(rest);
    }

    pub fn split_line(&mut self) -> LineCursor<'_, S> {
        Cursor::new(self, LineState::default())
    }

    /// A cursor over the next `size` bytes. A zero size gives a terminal cursor.
    pub fn split_size(&mut self, size: usize) -> SizeCursor<'_, S> {
        let state = SizeState::new(size as u64);
        if size == 0 {
            Cursor::terminal(self, state)
        } else {
            Cursor::new(self, state)
        }
    }

    pub fn split_before_needle(&mut self, needle: &[u8]) -> Result<NeedleCursor<'_, S>, SplitError> {
        let state = NeedleState::new(needle)?;
        Ok(Cursor::new(self, state))
    }

    pub fn split_chunked_http_body(&mut self) -> ChunkedHttpBodyCursor<'_, S> {
        let state = ChunkedHttpBodyState::new(self.config.chunk_line_max_size());
        Cursor::new(self, state)
    }

    pub fn split_chunked_stream(&mut self) -> ChunkedStreamCursor<'_, S> {
        let order = self.config.stream_prefix_order();
        self.split_chunked_stream_with(order)
    }

    pub fn split_chunked_stream_with(&mut self, order: ByteOrder) -> ChunkedStreamCursor<'_, S> {
        Cursor::new(self, ChunkedStreamState::new(order))
    }
}

impl<S: ChunkSource> Splitter<S> {
    /// Mark the start of a pull.
    ///
    /// Returns `Ok(false)` if the splitter has been terminated. A source that
    /// ended by itself still lets the cursor run, so framing checks see the
    /// missing data. A busy mark left over from a pull future that was
    /// dropped before completion is an error, as the bytes it held are lost.
    pub(crate) fn begin(&mut self) -> Result<bool, SplitError> {
        if self.terminated {
            return Ok(false);
        }
        if self.busy {
            log::warn!(
                target: crate::SPLIT_DEBUG_LOG_TARGET,
                "pull started while a previous one was abandoned, {} bytes consumed",
                self.consumed
            );
            self.busy = false;
            self.terminate();
            return Err(SplitError::Interrupted);
        }
        self.busy = true;
        Ok(true)
    }

    pub(crate) fn finish<T>(&mut self, r: Result<T, SplitError>) -> Result<T, SplitError> {
        self.busy = false;
        if let Err(e) = &r {
            if let SplitError::Protocol(pe) = e {
                log::warn!(
                    target: crate::SPLIT_DEBUG_LOG_TARGET,
                    "protocol error after {} bytes: {pe}",
                    self.consumed
                );
            }
            if e.is_fatal() {
                self.terminate();
            }
        }
        r
    }

    /// Return the next non-empty chunk, leftover first.
    pub(crate) async fn advance(&mut self) -> Result<Option<Bytes>, SplitError> {
        if let Some(chunk) = self.leftover.take() {
            self.consumed += chunk.len() as u64;
            return Ok(Some(chunk));
        }
        if self.ended {
            return Ok(None);
        }

        loop {
            match self.source.next_chunk().await? {
                Some(chunk) => {
                    #[cfg(feature = "log-raw-io")]
                    crate::debug::log_chunk(&chunk);
                    if !chunk.is_empty() {
                        self.consumed += chunk.len() as u64;
                        return Ok(Some(chunk));
                    }
                }
                None => {
                    self.ended = true;
                    crate::log_msg!("source ended after {} bytes", self.consumed);
                    return Ok(None);
                }
            }
        }
    }

    /// Return at least `least` bytes in one buffer, or whatever is left if
    /// the source ends first.
    pub(crate) async fn advance_at_least(&mut self, least: usize) -> Result<Bytes, SplitError> {
        let Some(first) = self.advance().await? else {
            return Ok(Bytes::new());
        };
        if first.len() >= least {
            return Ok(first);
        }

        let mut buf = BytesMut::with_capacity(least);
        buf.extend_from_slice(&first);
        while buf.len() < least {
            match self.advance().await? {
                Some(chunk) => buf.extend_from_slice(&chunk),
                None => break,
            }
        }
        Ok(buf.freeze())
    }

    /// Return the next chunk truncated to `remaining` bytes, which is
    /// decreased by the returned length. The rest is stashed.
    pub(crate) async fn advance_limited(
        &mut self,
        remaining: &mut u64,
    ) -> Result<Option<Bytes>, SplitError> {
        if *remaining == 0 {
            return Ok(None);
        }
        let Some(mut chunk) = self.advance().await? else {
            return Ok(None);
        };

        let len = chunk.len() as u64;
        if len < *remaining {
            *remaining -= len;
            return Ok(Some(chunk));
        }

        // remaining <= chunk.len() here
        let rest = chunk.split_off(*remaining as usize);
        *remaining = 0;
        self.stash(rest);
        Ok(Some(chunk))
    }

    /// Pull the next chunk directly, bypassing any cursor.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>, SplitError> {
        if !self.begin()? {
            return Ok(None);
        }
        let r = self.advance().await;
        self.finish(r)
    }

    /// Check whether more data is available, without consuming it.
    pub async fn has_more(&mut self) -> Result<bool, SplitError> {
        if !self.begin()? {
            return Ok(false);
        }
        let r = self.advance().await;
        let r = self.finish(r)?;
        match r {
            Some(chunk) => {
                self.stash(chunk);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Stop consuming. The source is cancelled and every cursor sees end of data.
    pub fn terminate(&mut self) {
        self.leftover = None;
        if self.terminated {
            return;
        }
        self.terminated = true;
        crate::log_msg!("splitter terminated after {} bytes", self.consumed);
        if !self.ended {
            self.ended = true;
            self.source.cancel();
        }
    }

    /// Hand `e` to the source's error hook and terminate.
    pub fn fail(&mut self, e: io::Error) -> SplitError {
        let e = self.source.fail(e);
        crate::log_msg!("splitter failed after {} bytes: {e}", self.consumed);
        self.terminate();
        SplitError::Upstream(e)
    }

    pub async fn read_line(&mut self, max_size: Option<usize>) -> Result<Bytes, SplitError> {
        self.split_line().read_all(max_size).await
    }

    /// Read up to `size` bytes. Fewer are returned if the source ends first.
    pub async fn read_size(&mut self, size: usize) -> Result<Bytes, SplitError> {
        self.split_size(size).read_all(None).await
    }

    /// Read exactly `size` bytes.
    pub async fn read_enough_size(&mut self, size: usize) -> Result<Bytes, SplitError> {
        let data = self.read_size(size).await?;
        if data.len() < size {
            let e = ProtocolError::InsufficientData {
                expected: size as u64,
                received: data.len() as u64,
            };
            return self.finish(Err(e.into()));
        }
        Ok(data)
    }

    pub async fn read_before_needle(
        &mut self,
        needle: &[u8],
        max_size: Option<usize>,
    ) -> Result<Bytes, SplitError> {
        self.split_before_needle(needle)?.read_all(max_size).await
    }

    pub async fn read_chunked_http_body(
        &mut self,
        max_size: Option<usize>,
    ) -> Result<Bytes, SplitError> {
        self.split_chunked_http_body().read_all(max_size).await
    }

    pub async fn read_chunked_stream(
        &mut self,
        max_size: Option<usize>,
    ) -> Result<Bytes, SplitError> {
        self.split_chunked_stream().read_all(max_size).await
    }
}
