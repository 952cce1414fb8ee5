/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use async_trait::async_trait;
use bytes::Bytes;

use super::CursorState;
use super::chunked::{ChunkedState, stream_payload};
use crate::{ByteOrder, ChunkSource, ProtocolError, SplitError, Splitter};

const PREFIX_SIZE: usize = 4;

/// Decode frames of a 4 bytes length prefix followed by the payload,
/// until a zero length frame.
pub struct ChunkedStreamState {
    order: ByteOrder,
    state: ChunkedState,
}

impl ChunkedStreamState {
    pub(crate) fn new(order: ByteOrder) -> Self {
        ChunkedStreamState {
            order,
            state: ChunkedState::ReadingHeader,
        }
    }

    async fn read_prefix<S: ChunkSource>(
        &self,
        splitter: &mut Splitter<S>,
    ) -> Result<u32, SplitError> {
        let mut data = splitter.advance_at_least(PREFIX_SIZE).await?;
        if data.len() < PREFIX_SIZE {
            return Err(ProtocolError::InsufficientData {
                expected: PREFIX_SIZE as u64,
                received: data.len() as u64,
            }
            .into());
        }
        splitter.stash(data.split_off(PREFIX_SIZE));

        let mut buf = [0u8; PREFIX_SIZE];
        buf.copy_from_slice(&data);
        Ok(self.order.decode_u32(buf))
    }

    async fn next_step<S: ChunkSource>(
        &mut self,
        splitter: &mut Splitter<S>,
    ) -> Result<Option<Bytes>, SplitError> {
        loop {
            match self.state {
                ChunkedState::Done | ChunkedState::Failed => return Ok(None),
                ChunkedState::ReadingHeader => {
                    let size = self.read_prefix(splitter).await?;
                    if size == 0 {
                        self.state = ChunkedState::Done;
                        return Ok(None);
                    }
                    self.state = ChunkedState::payload(u64::from(size));
                }
                ChunkedState::StreamingPayload {
                    size,
                    mut remaining,
                } => {
                    let r = stream_payload(splitter, size, &mut remaining).await?;
                    if r.is_some() {
                        self.state = ChunkedState::StreamingPayload { size, remaining };
                        return Ok(r);
                    }
                    self.state = ChunkedState::ReadingHeader;
                }
            }
        }
    }
}

#[async_trait]
impl<S: ChunkSource> CursorState<S> for ChunkedStreamState {
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
