//! Shared state handed to every handler

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;

use crate::adapters::JsonStore;
use crate::auth::{Caller, TokenSigner, bearer_token};
use crate::cache::SettingsCache;
use crate::core::models::{Setting, setting_keys};
use crate::core::ports::{
    AttendanceRepository, CashBookRepository, FuneralRepository, LoanRepository,
    MemberRepository, OfficerRepository, SettingsRepository, StoreResult,
};
use crate::core::services::RotationPolicy;

use super::error::ApiError;

/// Username recorded for changes made by the service itself
pub const SYSTEM_USER: &str = "system";

/// Repositories, settings cache and policies for one running service
pub struct AppContext {
    /// Member directory
    pub members: Arc<dyn MemberRepository>,
    /// Loan ledger
    pub loans: Arc<dyn LoanRepository>,
    /// Meeting and common-work attendance
    pub attendance: Arc<dyn AttendanceRepository>,
    /// Funeral events and rotation state
    pub funerals: Arc<dyn FuneralRepository>,
    /// Settings registry (writes)
    pub settings: Arc<dyn SettingsRepository>,
    /// Officer accounts
    pub officers: Arc<dyn OfficerRepository>,
    /// Cash book
    pub cash: Arc<dyn CashBookRepository>,
    /// Settings registry (reads)
    pub settings_cache: SettingsCache,
    /// Duty rotation parameters
    pub rotation: RotationPolicy,
    /// Token verification
    pub tokens: TokenSigner,
    rotation_lock: Mutex<()>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("settings_cache", &self.settings_cache)
            .field("rotation", &self.rotation)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Context with every repository backed by one JSON store
    pub fn with_store(
        store: Arc<JsonStore>,
        tokens: TokenSigner,
        rotation: RotationPolicy,
        settings_ttl: Duration,
    ) -> Self {
        Self {
            members: store.clone(),
            loans: store.clone(),
            attendance: store.clone(),
            funerals: store.clone(),
            settings: store.clone(),
            officers: store.clone(),
            settings_cache: SettingsCache::new(store.clone(), settings_ttl),
            cash: store,
            rotation,
            tokens,
            rotation_lock: Mutex::new(()),
        }
    }

    /// Create the well-known settings that do not exist yet.
    ///
    /// Returns how many were created.
    pub fn seed_settings(&self) -> StoreResult<usize> {
        let mut created = 0;
        for (key, value, description) in setting_keys::DEFAULTS {
            let setting = Setting::new(key, value, Some(description), SYSTEM_USER);
            if self.settings.insert_if_absent(&setting)? {
                log::info!("Seeded setting {key} = {value}");
                created += 1;
            }
        }
        if created > 0 {
            self.settings_cache.invalidate();
        }
        Ok(created)
    }

    /// Hold the lock that serializes rotation changes.
    ///
    /// Planning a funeral reads the rotation cursor and writes it back; two
    /// plans running at once would hand out the same members.
    pub(crate) fn lock_rotation(&self) -> MutexGuard<'_, ()> {
        self.rotation_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve the caller behind an `Authorization` header.
    ///
    /// The token must verify, and the officer it names must still exist and
    /// be active. Roles come from the officer record, not the token.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Caller, ApiError> {
        let header =
            authorization.ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;
        let token =
            bearer_token(header).ok_or_else(|| ApiError::unauthorized("Malformed bearer token"))?;
        let claims = self.tokens.verify(token, Utc::now())?;

        let officer = self
            .officers
            .get(&claims.sub)?
            .ok_or_else(|| ApiError::unauthorized("Unknown officer"))?;
        if !officer.active {
            log::warn!("Refused token for deactivated officer {}", officer.username);
            return Err(ApiError::unauthorized("Officer account is deactivated"));
        }
        Ok(Caller::from_officer(&officer))
    }
}
