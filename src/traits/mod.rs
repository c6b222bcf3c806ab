// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod adapter;

pub use adapter::BackendAdapter;
pub use crate::backends::AdapterMap;
