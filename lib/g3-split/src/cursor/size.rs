/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use async_trait::async_trait;
use bytes::Bytes;

use super::CursorState;
use crate::{ChunkSource, SplitError, Splitter};

pub struct SizeState {
    remaining: u64,
}

impl SizeState {
    pub(crate) fn new(size: u64) -> Self {
        SizeState { remaining: size }
    }
}

#[async_trait]
impl<S: ChunkSource> CursorState<S> for SizeState {
    async fn next(&mut self, splitter: &mut Splitter<S>) -> Result<Option<Bytes>, SplitError> {
        splitter.advance_limited(&mut self.remaining).await
    }

    fn is_done(&self) -> bool {
        self.remaining == 0
    }
}
