/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use bytes::Bytes;

use crate::{ChunkSource, ProtocolError, SplitError, Splitter};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum ChunkedState {
    ReadingHeader,
    StreamingPayload { size: u64, remaining: u64 },
    Done,
    Failed,
}

impl ChunkedState {
    pub(super) fn payload(size: u64) -> Self {
        ChunkedState::StreamingPayload {
            size,
            remaining: size,
        }
    }

    pub(super) fn is_finished(&self) -> bool {
        matches!(self, ChunkedState::Done | ChunkedState::Failed)
    }
}

/// Forward the payload of the current chunk.
///
/// `Ok(None)` is returned once all `size` bytes have been forwarded.
pub(super) async fn stream_payload<S: ChunkSource>(
    splitter: &mut Splitter<S>,
    size: u64,
    remaining: &mut u64,
) -> Result<Option<Bytes>, SplitError> {
    match splitter.advance_limited(remaining).await? {
        Some(data) => Ok(Some(data)),
        None if *remaining == 0 => Ok(None),
        None => Err(ProtocolError::InsufficientData {
            expected: size,
            received: size - *remaining,
        }
        .into()),
    }
}
