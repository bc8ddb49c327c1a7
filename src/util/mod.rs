// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometry helpers, layout rules and the element constraint engine.

pub mod constraints;
pub mod geometry;
pub mod layout;
