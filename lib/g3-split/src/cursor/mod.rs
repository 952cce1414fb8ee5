/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::Stream;

use crate::{ChunkSource, SplitError, Splitter};

mod line;
pub use line::LineState;

mod size;
pub use size::SizeState;

mod needle;
pub use needle::NeedleState;

mod chunked;

mod chunked_http;
pub use chunked_http::ChunkedHttpBodyState;

mod chunked_stream;
pub use chunked_stream::ChunkedStreamState;

pub type LineCursor<'a, S> = Cursor<'a, S, LineState>;
pub type SizeCursor<'a, S> = Cursor<'a, S, SizeState>;
pub type NeedleCursor<'a, S> = Cursor<'a, S, NeedleState>;
pub type ChunkedHttpBodyCursor<'a, S> = Cursor<'a, S, ChunkedHttpBodyState>;
pub type ChunkedStreamCursor<'a, S> = Cursor<'a, S, ChunkedStreamState>;

/// The boundary logic of one cursor kind.
///
/// `Ok(None)` means the boundary has been reached, and all later calls
/// should return `Ok(None)` without touching the splitter.
#[async_trait]
pub trait CursorState<S: ChunkSource>: Send {
    async fn next(&mut self, splitter: &mut Splitter<S>) -> Result<Option<Bytes>, SplitError>;

    /// Whether the boundary is known to be reached without another call to `next`.
    fn is_done(&self) -> bool;
}

/// A bounded view over a [`Splitter`], yielding non-empty slices up to a
/// data defined boundary.
#[async_trait]
pub trait SplitCursor: Send {
    /// Return the next slice, or `None` once the cursor is terminal.
    async fn pull(&mut self) -> Result<Option<Bytes>, SplitError>;

    /// Terminate the underlying splitter.
    fn cancel(&mut self);

    /// Forward `e` to the source error hook and terminate the underlying splitter.
    fn fail(&mut self, e: io::Error) -> SplitError;

    /// Whether the next pull is known to return `None`.
    ///
    /// A source that ended by itself does not make a cursor terminal, as the
    /// next pull may still report missing framing data.
    fn is_terminal(&self) -> bool;

    /// Pull until the cursor is terminal and join all slices.
    async fn read_all(&mut self, max_size: Option<usize>) -> Result<Bytes, SplitError> {
        let mut collector = Collector::new(max_size);
        while let Some(data) = self.pull().await? {
            collector.push(data)?;
        }
        Ok(collector.finish())
    }
}

pub struct Cursor<'a, S, T> {
    splitter: &'a mut Splitter<S>,
    state: T,
    done: bool,
}

impl<'a, S, T> Cursor<'a, S, T> {
    pub(crate) fn new(splitter: &'a mut Splitter<S>, state: T) -> Self {
        Cursor {
            splitter,
            state,
            done: false,
        }
    }

    pub(crate) fn terminal(splitter: &'a mut Splitter<S>, state: T) -> Self {
        Cursor {
            splitter,
            state,
            done: true,
        }
    }
}

#[async_trait]
impl<'a, S, T> SplitCursor for Cursor<'a, S, T>
where
    S: ChunkSource,
    T: CursorState<S>,
{
    async fn pull(&mut self) -> Result<Option<Bytes>, SplitError> {
        if self.done {
            return Ok(None);
        }
        match self.splitter.begin() {
            Ok(true) => {}
            Ok(false) => {
                self.done = true;
                return Ok(None);
            }
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        }

        let r = self.state.next(self.splitter).await;
        let r = self.splitter.finish(r);
        if !matches!(r, Ok(Some(_))) {
            self.done = true;
        }
        r
    }

    fn cancel(&mut self) {
        self.done = true;
        self.splitter.terminate();
    }

    fn fail(&mut self, e: io::Error) -> SplitError {
        self.done = true;
        self.splitter.fail(e)
    }

    fn is_terminal(&self) -> bool {
        self.done || self.splitter.is_terminated() || self.state.is_done()
    }
}

/// Adapt a cursor into a [`Stream`]. The stream ends after the first error.
pub fn into_stream<C>(cursor: C) -> impl Stream<Item = Result<Bytes, SplitError>>
where
    C: SplitCursor,
{
    futures_util::stream::unfold(Some(cursor), |cursor| async move {
        let mut cursor = cursor?;
        match cursor.pull().await {
            Ok(Some(data)) => Some((Ok(data), Some(cursor))),
            Ok(None) => None,
            Err(e) => Some((Err(e), None)),
        }
    })
}

/// Drive a state directly, for cursors that are built from other cursors.
pub(crate) async fn collect<S, T>(
    state: &mut T,
    splitter: &mut Splitter<S>,
    max_size: Option<usize>,
) -> Result<Bytes, SplitError>
where
    S: ChunkSource,
    T: CursorState<S>,
{
    let mut collector = Collector::new(max_size);
    while let Some(data) = state.next(splitter).await? {
        collector.push(data)?;
    }
    Ok(collector.finish())
}

struct Collector {
    max_size: usize,
    size: usize,
    first: Option<Bytes>,
    buf: BytesMut,
}

impl Collector {
    fn new(max_size: Option<usize>) -> Self {
        Collector {
            max_size: max_size.unwrap_or(usize::MAX),
            size: 0,
            first: None,
            buf: BytesMut::new(),
        }
    }

    fn push(&mut self, data: Bytes) -> Result<(), SplitError> {
        self.size = self.size.saturating_add(data.len());
        if self.size > self.max_size {
            return Err(SplitError::LimitExceeded(self.max_size));
        }

        if self.buf.is_empty() {
            match self.first.take() {
                None => {
                    self.first = Some(data);
                    return Ok(());
                }
                Some(first) => {
                    self.buf.reserve(first.len() + data.len());
                    self.buf.extend_from_slice(&first);
                }
            }
        }
        self.buf.extend_from_slice(&data);
        Ok(())
    }

    fn finish(self) -> Bytes {
        match self.first {
            Some(first) => first,
            None => self.buf.freeze(),
        }
    }
}
