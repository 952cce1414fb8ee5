/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use async_trait::async_trait;
use atoi::FromRadix16;
use bytes::Bytes;

use super::chunked::{ChunkedState, stream_payload};
use super::{CursorState, LineState, collect};
use crate::{ChunkSource, ProtocolError, SplitError, Splitter};

// 0x1fffffffffffff, the largest integer an IEEE754 double can hold exactly
const CHUNK_SIZE_MAX_DIGITS: usize = 14;

/// Decode a `Transfer-Encoding: chunked` http body.
///
/// Chunk extensions are ignored, and trailer fields are not supported.
pub struct ChunkedHttpBodyState {
    line_max_size: usize,
    state: ChunkedState,
}

impl ChunkedHttpBodyState {
    pub(crate) fn new(line_max_size: usize) -> Self {
        ChunkedHttpBodyState {
            line_max_size,
            state: ChunkedState::ReadingHeader,
        }
    }

    async fn next_step<S: ChunkSource>(
        &mut self,
        splitter: &mut Splitter<S>,
    ) -> Result<Option<Bytes>, SplitError> {
        loop {
            match self.state {
                ChunkedState::Done | ChunkedState::Failed => return Ok(None),
                ChunkedState::ReadingHeader => {
                    let line = read_chunk_line(splitter, self.line_max_size).await?;
                    let size = parse_chunk_size(&line)?;
                    if size == 0 {
                        read_chunk_end(splitter).await?;
                        self.state = ChunkedState::Done;
                        return Ok(None);
                    }
                    self.state = ChunkedState::payload(size);
                }
                ChunkedState::StreamingPayload {
                    size,
                    mut remaining,
                } => {
                    let r = stream_payload(splitter, size, &mut remaining).await?;
                    self.state = ChunkedState::StreamingPayload { size, remaining };
                    if r.is_some() {
                        return Ok(r);
                    }
                    read_chunk_end(splitter).await?;
                    self.state = ChunkedState::ReadingHeader;
                }
            }
        }
    }
}

#[async_trait]
impl<S: ChunkSource> CursorState<S> for ChunkedHttpBodyState {
    async fn next(&mut self, splitter: &mut Splitter<S>) -> Result<Option<Bytes>, SplitError> {
        let r = self.next_step(splitter).await;
        if r.is_err() {
            self.state = ChunkedState::Failed;
        }
        r
    }

    fn is_done(&self) -> bool {
        self.state.is_finished()
    }
}

async fn read_chunk_line<S: ChunkSource>(
    splitter: &mut Splitter<S>,
    max_size: usize,
) -> Result<Bytes, SplitError> {
    let mut line = LineState::default();
    collect(&mut line, splitter, Some(max_size))
        .await
        .map_err(|e| match e {
            SplitError::LimitExceeded(n) => ProtocolError::ChunkLineTooLong(n).into(),
            e => e,
        })
}

/// The line after the chunk data must be empty. A closed source is tolerated.
async fn read_chunk_end<S: ChunkSource>(splitter: &mut Splitter<S>) -> Result<(), SplitError> {
    let mut line = LineState::default();
    collect(&mut line, splitter, Some(0))
        .await
        .map_err(|e| match e {
            SplitError::LimitExceeded(_) => ProtocolError::InvalidChunkEnd.into(),
            e => e,
        })?;
    Ok(())
}

/// Parse the leading hex digits, anything after them is ignored.
fn parse_chunk_size(line: &[u8]) -> Result<u64, ProtocolError> {
    let digits = line.iter().take_while(|b| b.is_ascii_hexdigit()).count();
    if digits == 0 {
        return Err(ProtocolError::MissingChunkSize);
    }
    if digits > CHUNK_SIZE_MAX_DIGITS || (digits == CHUNK_SIZE_MAX_DIGITS && line[0] > b'1') {
        return Err(ProtocolError::ChunkSizeTooLarge);
    }
    let (size, _) = u64::from_radix_16(&line[..digits]);
    Ok(size)
}
