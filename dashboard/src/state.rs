//! Dashboard server state management
//!
//! This module contains the state shared by every request handler.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::RwLock;

use crate::types::RefreshReport;

/// Core dashboard state
#[derive(Debug)]
pub struct DashboardState {
    pub bind_address: SocketAddr,

    // Refresh coordination
    refreshing: AtomicBool,
    pub last_refresh: RwLock<Option<RefreshReport>>,

    pub server_start_time: Instant,
}

impl DashboardState {
    /// Create a new dashboard state
    pub fn new(bind_address: SocketAddr) -> Self {
        Self {
            bind_address,
            refreshing: AtomicBool::new(false),
            last_refresh: RwLock::new(None),
            server_start_time: Instant::now(),
        }
    }

    /// Claim the refresh slot. Returns a guard that releases it on drop,
    /// or `None` when another refresh already holds it.
    pub fn begin_refresh(&self) -> Option<RefreshGuard<'_>> {
        self.refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshGuard { state: self })
    }

    /// Check if a refresh is running
    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    /// Record a completed refresh
    pub async fn record_refresh(&self, report: RefreshReport) {
        let mut last = self.last_refresh.write().await;
        *last = Some(report);
    }

    /// Get the most recent refresh report
    pub async fn last_refresh(&self) -> Option<RefreshReport> {
        self.last_refresh.read().await.clone()
    }

    /// Get server uptime in seconds
    pub fn get_uptime_seconds(&self) -> u64 {
        self.server_start_time.elapsed().as_secs()
    }
}

/// Holds the refresh slot for as long as it lives
#[derive(Debug)]
pub struct RefreshGuard<'a> {
    state: &'a DashboardState,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.state.refreshing.store(false, Ordering::Release);
    }
}
