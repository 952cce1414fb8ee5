/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use async_trait::async_trait;
use bytes::Bytes;

use super::CursorState;
use crate::{ChunkSource, SplitError, Splitter};

/// Stop at a `LF` or `CRLF` line break, which is consumed but not returned.
///
/// A `CR` at the end of a chunk needs one more chunk to tell whether it
/// starts a line break. Whatever comes after the line is stashed.
#[derive(Default)]
pub struct LineState {
    done: bool,
}

#[async_trait]
impl<S: ChunkSource> CursorState<S> for LineState {
    async fn next(&mut self, splitter: &mut Splitter<S>) -> Result<Option<Bytes>, SplitError> {
        if self.done {
            return Ok(None);
        }
        let Some(mut chunk) = splitter.advance().await? else {
            self.done = true;
            return Ok(None);
        };

        if let Some(p) = memchr::memchr(b'\n', &chunk) {
            self.done = true;
            splitter.stash(chunk.split_off(p + 1));
            let end = if p > 0 && chunk[p - 1] == b'\r' {
                p - 1
            } else {
                p
            };
            chunk.truncate(end);
            return Ok(non_empty(chunk));
        }

        if chunk.last() != Some(&b'\r') {
            return Ok(Some(chunk));
        }

        match splitter.advance().await? {
            None => {
                // a lone CR at the end is data
                self.done = true;
                Ok(Some(chunk))
            }
            Some(mut next) if next[0] == b'\n' => {
                self.done = true;
                splitter.stash(next.split_off(1));
                chunk.truncate(chunk.len() - 1);
                Ok(non_empty(chunk))
            }
            Some(next) => {
                splitter.stash(next);
                Ok(Some(chunk))
            }
        }
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

#[inline]
pub(super) fn non_empty(data: Bytes) -> Option<Bytes> {
    if data.is_empty() { None } else { Some(data) }
}
