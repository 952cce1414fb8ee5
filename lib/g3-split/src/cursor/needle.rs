/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use async_trait::async_trait;
use bytes::Bytes;

use super::CursorState;
use super::line::non_empty;
use crate::{ChunkSource, SplitError, Splitter};

/// Stop before the first occurrence of a byte pattern, using Horspool's
/// algorithm. The pattern is consumed but not returned.
pub struct NeedleState {
    needle: Box<[u8]>,
    shift: [usize; 256],
    done: bool,
}

impl NeedleState {
    pub(crate) fn new(needle: &[u8]) -> Result<Self, SplitError> {
        if needle.is_empty() {
            return Err(SplitError::InvalidArgument("empty needle"));
        }

        let len = needle.len();
        let mut shift = [len; 256];
        for (i, b) in needle[..len - 1].iter().enumerate() {
            shift[*b as usize] = len - 1 - i;
        }
        Ok(NeedleState {
            needle: needle.into(),
            shift,
            done: false,
        })
    }

    /// Return `Ok(offset)` of the first match, or `Err(offset)` of the first
    /// position that may still start a match once more data arrives.
    fn search(&self, haystack: &[u8]) -> Result<usize, usize> {
        let len = self.needle.len();
        let mut offset = 0;
        while offset + len <= haystack.len() {
            let window = &haystack[offset..offset + len];
            if window.iter().rev().eq(self.needle.iter().rev()) {
                return Ok(offset);
            }
            offset += self.shift[window[len - 1] as usize];
        }
        Err(offset)
    }
}

#[async_trait]
impl<S: ChunkSource> CursorState<S> for NeedleState {
    async fn next(&mut self, splitter: &mut Splitter<S>) -> Result<Option<Bytes>, SplitError> {
        if self.done {
            return Ok(None);
        }

        let mut haystack = splitter.advance_at_least(self.needle.len()).await?;
        if haystack.len() < self.needle.len() {
            // the source has ended, no match is possible
            self.done = true;
            return Ok(non_empty(haystack));
        }

        match self.search(&haystack) {
            Ok(index) => {
                self.done = true;
                splitter.stash(haystack.split_off(index + self.needle.len()));
                haystack.truncate(index);
                Ok(non_empty(haystack))
            }
            Err(offset) => {
                // offset > 0 as the haystack holds at least one full window
                splitter.stash(haystack.split_off(offset));
                Ok(Some(haystack))
            }
        }
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_table() {
        let state = NeedleState::new(b"abcab").unwrap();
        assert_eq!(state.shift[b'a' as usize], 1);
        assert_eq!(state.shift[b'b' as usize], 3);
        assert_eq!(state.shift[b'c' as usize], 2);
        assert_eq!(state.shift[b'z' as usize], 5);
    }

    #[test]
    fn empty_needle() {
        assert!(matches!(
            NeedleState::new(b""),
            Err(SplitError::InvalidArgument(_))
        ));
    }

    #[test]
    fn search() {
        let state = NeedleState::new(b"world").unwrap();
        assert_eq!(state.search(b"hello world"), Ok(6));
        assert_eq!(state.search(b"world"), Ok(0));

        let state = NeedleState::new(b"foo").unwrap();
        // "fo" at the tail may still be the start of a match
        assert_eq!(state.search(b"xxxfo"), Err(3));
        assert_eq!(state.search(b"xxxxx"), Err(3));
        assert_eq!(state.search(b"abc"), Err(3));
    }
}
