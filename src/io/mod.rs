// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O for template blobs, template files and plugin descriptors.

pub mod codec;
pub mod plugin;
pub mod serialization;
