//! The TTL controller.
//!
//! Each operation comes in two flavours:
//!
//! - a rich form (`current_ttl`, `apply_ttl`, `persist_ttl`, `persistent_ttl`)
//!   returning [`ttl_core::Result`] so callers can tell a rejected value from
//!   a missing privilege;
//! - the front-end form (`get_current_ttl`, `set_ttl`, `make_ttl_persistent`,
//!   ...) that never fails: errors are logged and collapsed into `false`, the
//!   [`TTL_UNKNOWN`] sentinel, or "not persistent".

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use crate::live::{LiveTtl, ProcTtl};
use crate::privilege::PrivilegeMode;
use crate::store::SysctlStore;
use ttl_core::{ErrorKind, PersistentTtl, Result, Ttl, TtlError, TtlStatus, TTL_UNKNOWN};

/// Reads, applies, verifies and persists the default IPv4 TTL.
pub struct TtlController {
    live: Arc<dyn LiveTtl>,
    store: SysctlStore,
    reload_on_persist: bool,
    // Serialize read-write-verify on the live value.
    live_lock: Mutex<()>,
    // Serialize load-modify-save(-reload) on the persisted file.
    persist_lock: Mutex<()>,
}

impl TtlController {
    /// Build a controller from its ports.
    pub fn new(live: Arc<dyn LiveTtl>, store: SysctlStore) -> Self {
        Self {
            live,
            store,
            reload_on_persist: false,
            live_lock: Mutex::new(()),
            persist_lock: Mutex::new(()),
        }
    }

    /// Controller for the real system paths.
    pub fn system(mode: PrivilegeMode) -> Self {
        let writer = mode.writer();
        Self::new(
            Arc::new(ProcTtl::new(Arc::clone(&writer))),
            SysctlStore::new(writer),
        )
    }

    /// Whether [`TtlController::make_ttl_persistent`] also reloads the file
    /// into the kernel.
    #[must_use]
    pub fn with_reload_on_persist(mut self, reload: bool) -> Self {
        self.reload_on_persist = reload;
        self
    }

    /// Persisted configuration store
    pub const fn store(&self) -> &SysctlStore {
        &self.store
    }

    // ------------------------------------------------------------------
    // Live value
    // ------------------------------------------------------------------

    /// Read the live TTL.
    pub async fn current_ttl(&self) -> Result<u8> {
        self.live.read().await
    }

    /// Read the live TTL, or [`TTL_UNKNOWN`] if it can't be determined.
    pub async fn get_current_ttl(&self) -> i32 {
        match self.current_ttl().await {
            Ok(ttl) => {
                info!(ttl, "current TTL");
                i32::from(ttl)
            }
            Err(e) => {
                error!(error = %e, "error getting current TTL");
                TTL_UNKNOWN
            }
        }
    }

    /// Validate, write and verify a new live TTL.
    ///
    /// Success means the kernel reports `candidate` when read back, not just
    /// that the write call returned.
    #[instrument(skip(self))]
    pub async fn apply_ttl(&self, candidate: i64) -> Result<Ttl> {
        let ttl = Ttl::new(candidate)?;

        let _guard = self.live_lock.lock().await;
        self.live.write(ttl).await?;

        let observed = self.live.read().await?;
        if observed != ttl.get() {
            return Err(TtlError::Mismatch {
                expected: ttl.get(),
                observed,
            });
        }

        info!(%ttl, "successfully set TTL");
        Ok(ttl)
    }

    /// Set the live TTL; `false` on any failure.
    pub async fn set_ttl(&self, candidate: i64) -> bool {
        match self.apply_ttl(candidate).await {
            Ok(_) => true,
            Err(e) => {
                log_failure("set TTL", &e);
                false
            }
        }
    }

    /// Set the live TTL to 65.
    pub async fn set_ttl_to_65(&self) -> bool {
        self.set_ttl(i64::from(Ttl::CARRIER.get())).await
    }

    /// Set the live TTL back to the Linux default of 64.
    pub async fn reset_ttl_to_default(&self) -> bool {
        self.set_ttl(i64::from(Ttl::DEFAULT.get())).await
    }

    /// Whether the live TTL is 65. A read failure reports `false`.
    pub async fn is_ttl_65(&self) -> bool {
        self.get_current_ttl().await == i32::from(Ttl::CARRIER.get())
    }

    // ------------------------------------------------------------------
    // Persisted value
    // ------------------------------------------------------------------

    /// Record `value` in the sysctl configuration, replacing any previous
    /// entry, and optionally load it into the kernel.
    ///
    /// A reload failure is returned as [`TtlError::Reload`] after the file
    /// has already been written.
    #[instrument(skip(self))]
    pub async fn persist_ttl(&self, value: i64, reload: bool) -> Result<Ttl> {
        let ttl = Ttl::new(value)?;

        let _guard = self.persist_lock.lock().await;
        let mut conf = self.store.load().await?;
        let replaced = conf.count_key(ttl_core::TTL_KEY);
        conf.set_ttl(ttl);
        self.store.save(&conf).await?;
        info!(%ttl, replaced, path = %self.store.path().display(), "made TTL persistent across reboots");

        if reload {
            self.store.reload().await?;
            info!(%ttl, "reloaded sysctl configuration");
        }

        Ok(ttl)
    }

    /// Persist `value`; `false` on any failure.
    pub async fn make_ttl_persistent(&self, value: i64) -> bool {
        match self.persist_ttl(value, self.reload_on_persist).await {
            Ok(_) => true,
            Err(e) => {
                log_failure("make TTL persistent", &e);
                false
            }
        }
    }

    /// Scan the persisted configuration for a TTL entry.
    ///
    /// A missing file or an unparseable value is "not persistent".
    pub async fn persistent_ttl(&self) -> Result<PersistentTtl> {
        let conf = self.store.load().await?;
        let Some(raw) = conf.ttl_entry() else {
            return Ok(PersistentTtl::absent());
        };

        match raw.parse::<u8>() {
            Ok(value) => Ok(PersistentTtl::present(value)),
            Err(_) => {
                warn!(value = raw, path = %self.store.path().display(), "ignoring unparseable persisted TTL");
                Ok(PersistentTtl::absent())
            }
        }
    }

    /// Persisted TTL, or "not persistent" on any failure.
    pub async fn get_persistent_ttl(&self) -> PersistentTtl {
        self.persistent_ttl().await.unwrap_or_else(|e| {
            error!(error = %e, "error reading persistent TTL");
            PersistentTtl::absent()
        })
    }

    /// Live and persisted values in one snapshot.
    pub async fn status(&self) -> TtlStatus {
        let current_ttl = match self.current_ttl().await {
            Ok(ttl) => Some(ttl),
            Err(e) => {
                error!(error = %e, "error getting current TTL");
                None
            }
        };

        TtlStatus {
            current_ttl,
            is_ttl_65: current_ttl == Some(Ttl::CARRIER.get()),
            persistent: self.get_persistent_ttl().await,
        }
    }
}

impl std::fmt::Debug for TtlController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlController")
            .field("store", &self.store)
            .field("reload_on_persist", &self.reload_on_persist)
            .finish_non_exhaustive()
    }
}

fn log_failure(operation: &str, err: &TtlError) {
    match err.kind() {
        ErrorKind::Validation => warn!(error = %err, "rejected: cannot {operation}"),
        ErrorKind::Privilege => {
            error!(error = %err, "cannot {operation}: root privileges are required");
        }
        ErrorKind::Io => error!(error = %err, "error trying to {operation}"),
    }
}
