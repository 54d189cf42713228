//! Scoring engine fake with scripted failures.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::DiagnosisKeysDataMapping;
use crate::error::{EngineError, Error, Result};
use crate::port::outbound::engine::ScoringEngine;

/// Holds an active mapping and records every push.
#[derive(Debug, Default)]
pub struct FakeScoringEngine {
    active: Mutex<DiagnosisKeysDataMapping>,
    set_calls: Mutex<Vec<DiagnosisKeysDataMapping>>,
    read_calls: AtomicUsize,
    reject_next_set: Mutex<Option<i32>>,
    fail_next_read: Mutex<Option<String>>,
    panic_next_read: AtomicBool,
}

impl FakeScoringEngine {
    pub fn new(active: DiagnosisKeysDataMapping) -> Self {
        Self {
            active: Mutex::new(active),
            ..Self::default()
        }
    }

    /// Next push fails with a vendor error carrying `status_code`.
    pub fn reject_next_set(&self, status_code: i32) {
        *self.reject_next_set.lock() = Some(status_code);
    }

    /// Next read fails with [`EngineError::Unavailable`].
    pub fn fail_next_read(&self, message: &str) {
        *self.fail_next_read.lock() = Some(message.to_string());
    }

    /// Next read panics.
    pub fn panic_next_read(&self) {
        self.panic_next_read.store(true, Ordering::SeqCst);
    }

    pub fn active_mapping(&self) -> DiagnosisKeysDataMapping {
        self.active.lock().clone()
    }

    /// Every mapping pushed, including rejected ones.
    pub fn set_calls(&self) -> Vec<DiagnosisKeysDataMapping> {
        self.set_calls.lock().clone()
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoringEngine for FakeScoringEngine {
    async fn diagnosis_keys_data_mapping(&self) -> Result<DiagnosisKeysDataMapping> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_next_read.swap(false, Ordering::SeqCst) {
            panic!("fake engine read panicked");
        }
        if let Some(message) = self.fail_next_read.lock().take() {
            return Err(Error::Engine(EngineError::Unavailable(message)));
        }
        Ok(self.active.lock().clone())
    }

    async fn set_diagnosis_keys_data_mapping(
        &self,
        mapping: &DiagnosisKeysDataMapping,
    ) -> Result<()> {
        self.set_calls.lock().push(mapping.clone());
        if let Some(status_code) = self.reject_next_set.lock().take() {
            return Err(Error::Engine(EngineError::Api {
                status_code,
                message: "rejected by fake engine".into(),
            }));
        }
        *self.active.lock() = mapping.clone();
        Ok(())
    }
}
