// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Template data model: content types, elements, frames and the frame store.

pub mod content_type;
pub mod element;
pub mod frame;
pub mod store;
