/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use log::Level;

pub const SPLIT_DEBUG_LOG_LEVEL: Level = Level::Debug;
pub const SPLIT_DEBUG_LOG_TARGET: &str = "g3_split";

#[macro_export]
macro_rules! log_msg {
    ($s:literal, $($arg:tt)+) => (
        log::log!(target: $crate::SPLIT_DEBUG_LOG_TARGET, $crate::SPLIT_DEBUG_LOG_LEVEL, $s, $($arg)+)
    )
}

#[cfg(feature = "log-raw-io")]
#[inline]
pub(crate) fn log_chunk(chunk: &[u8]) {
    log::trace!(
        target: SPLIT_DEBUG_LOG_TARGET,
        "< {} bytes: {:?}",
        chunk.len(),
        chunk
    );
}
