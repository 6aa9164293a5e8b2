// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for boxes and the per-image box store.

pub mod annotation;
pub mod store;
