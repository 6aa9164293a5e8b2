// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components and pointer interaction for the annotator.

pub mod canvas;
pub mod interaction;
pub mod toolbar;
