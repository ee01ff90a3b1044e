// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Compile diagnostics
//!
//! The compiler narrates progress and degradations through a sink; the
//! console sink formats them with colors, the memory sink captures them for
//! assertions.

use colored::*;
use std::sync::Mutex;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

/// Receives human-readable compile notifications
pub trait DiagnosticSink {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
}

/// Sink printing colored diagnostics to the terminal
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn info(&self, message: &str) {
        println!("{} {}", "::".bright_black(), message);
    }

    fn warning(&self, message: &str) {
        println!("{} {}", "⚠️  Warning:".yellow().bold(), message);
    }
}

/// Sink collecting diagnostics in memory
pub struct MemorySink {
    records: Mutex<Vec<(Severity, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<(Severity, String)> {
        self.records.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(severity, _)| *severity == Severity::Warning)
            .map(|(_, message)| message)
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(severity, _)| *severity == Severity::Info)
            .map(|(_, message)| message)
            .collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn info(&self, message: &str) {
        self.records
            .lock()
            .unwrap()
            .push((Severity::Info, message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.records
            .lock()
            .unwrap()
            .push((Severity::Warning, message.to_string()));
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}
