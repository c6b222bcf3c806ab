// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod budget;
pub mod driver;
pub mod ranker;

pub use budget::{BudgetPolicy, TimeAllowance, TimeBudget};
pub use driver::{DriverEvent, ExecutionTrace, Orchestrator};
pub use ranker::{Candidate, Ranker};
