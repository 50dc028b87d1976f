//! # Dashboard State — single source of truth for the controller
//!
//! Holds the selected tab, the last scan and attack reports, and the request
//! ledger. All of it is process-local and resets on restart.
//!
//! The ledger makes the loading flag authoritative: every request gets a
//! monotonically increasing sequence number per kind at `begin`, and a
//! completion only commits while its ticket is still the latest issued for
//! that kind. Two rapid triggers therefore resolve as "last request issued
//! wins" — the superseded response is dropped on arrival, and a hung request
//! cannot clobber state once a newer one has been started. There is no
//! cancellation: superseded requests run to completion and are discarded.

use crate::report::{AttackReport, ScanReport};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Scan,
    Attack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Scan,
    Attack,
}

/// Proof that a request was begun; required to settle it. Not cloneable, so
/// each ticket settles at most once.
#[derive(Debug)]
pub struct RequestTicket {
    kind: RequestKind,
    seq: u64,
}

impl RequestTicket {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }
}

#[derive(Debug, Default)]
struct Ledger {
    issued: u64,
    settled: u64,
}

struct Inner {
    active_tab: Tab,
    scan_report: Option<ScanReport>,
    attack_report: Option<AttackReport>,
    scan: Ledger,
    attack: Ledger,
}

/// Read-only copy of the controller state, for rendering and for tests that
/// want to inspect arbitrary states directly.
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    pub active_tab: Tab,
    pub scan_loading: bool,
    pub attack_loading: bool,
    pub scan_report: Option<ScanReport>,
    pub attack_report: Option<AttackReport>,
}

pub struct DashboardState {
    inner: RwLock<Inner>,
    requests_begun: AtomicU64,
    requests_committed: AtomicU64,
    requests_failed: AtomicU64,
    requests_superseded: AtomicU64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                active_tab: Tab::Scan,
                scan_report: None,
                attack_report: None,
                scan: Ledger::default(),
                attack: Ledger::default(),
            }),
            requests_begun: AtomicU64::new(0),
            requests_committed: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            requests_superseded: AtomicU64::new(0),
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.inner.read().active_tab
    }

    pub fn set_active_tab(&self, tab: Tab) {
        self.inner.write().active_tab = tab;
    }

    pub fn is_loading(&self, kind: RequestKind) -> bool {
        let inner = self.inner.read();
        let ledger = match kind {
            RequestKind::Scan => &inner.scan,
            RequestKind::Attack => &inner.attack,
        };
        ledger.issued > ledger.settled
    }

    /// Start a request of the given kind. A new `begin` while one is in
    /// flight supersedes it: the earlier ticket becomes stale immediately.
    pub fn begin(&self, kind: RequestKind) -> RequestTicket {
        let mut inner = self.inner.write();
        let ledger = match kind {
            RequestKind::Scan => &mut inner.scan,
            RequestKind::Attack => &mut inner.attack,
        };
        ledger.issued += 1;
        let seq = ledger.issued;
        drop(inner);
        self.requests_begun.fetch_add(1, Ordering::Relaxed);
        debug!(?kind, seq, "Request begun");
        RequestTicket { kind, seq }
    }

    /// Commit a successful scan. Returns false (and changes nothing) when the
    /// ticket has been superseded by a newer request.
    pub fn commit_scan(&self, ticket: RequestTicket, report: ScanReport) -> bool {
        debug_assert_eq!(ticket.kind, RequestKind::Scan);
        let mut inner = self.inner.write();
        if ticket.seq != inner.scan.issued {
            self.requests_superseded.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        inner.scan.settled = ticket.seq;
        inner.scan_report = Some(report);
        drop(inner);
        self.requests_committed.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Commit a successful attack demo. Same supersession contract as
    /// `commit_scan`.
    pub fn commit_attack(&self, ticket: RequestTicket, report: AttackReport) -> bool {
        debug_assert_eq!(ticket.kind, RequestKind::Attack);
        let mut inner = self.inner.write();
        if ticket.seq != inner.attack.issued {
            self.requests_superseded.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        inner.attack.settled = ticket.seq;
        inner.attack_report = Some(report);
        drop(inner);
        self.requests_committed.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Settle a failed request. The prior report (or its absence) is left
    /// untouched — there is no retained error state distinct from "no data".
    pub fn fail(&self, ticket: RequestTicket) -> bool {
        let mut inner = self.inner.write();
        let ledger = match ticket.kind {
            RequestKind::Scan => &mut inner.scan,
            RequestKind::Attack => &mut inner.attack,
        };
        if ticket.seq != ledger.issued {
            self.requests_superseded.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        ledger.settled = ticket.seq;
        drop(inner);
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
        true
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let inner = self.inner.read();
        StateSnapshot {
            active_tab: inner.active_tab,
            scan_loading: inner.scan.issued > inner.scan.settled,
            attack_loading: inner.attack.issued > inner.attack.settled,
            scan_report: inner.scan_report.clone(),
            attack_report: inner.attack_report.clone(),
        }
    }

    pub fn requests_begun(&self) -> u64 {
        self.requests_begun.load(Ordering::Relaxed)
    }

    pub fn requests_superseded(&self) -> u64 {
        self.requests_superseded.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SeverityCounts;

    fn scan_report(config: &str) -> ScanReport {
        ScanReport {
            status: "success".into(),
            config: config.into(),
            summary: SeverityCounts { critical: 1, ..Default::default() },
            ..Default::default()
        }
    }

    #[test]
    fn initial_state() {
        let state = DashboardState::new();
        let snap = state.snapshot();
        assert_eq!(snap.active_tab, Tab::Scan);
        assert!(snap.scan_report.is_none());
        assert!(snap.attack_report.is_none());
        assert!(!snap.scan_loading);
        assert!(!snap.attack_loading);
    }

    #[test]
    fn loading_flag_covers_the_request_cycle() {
        let state = DashboardState::new();

        let ticket = state.begin(RequestKind::Scan);
        assert!(state.is_loading(RequestKind::Scan));
        assert!(!state.is_loading(RequestKind::Attack));

        assert!(state.commit_scan(ticket, scan_report("a")));
        assert!(!state.is_loading(RequestKind::Scan));

        // Failure path clears the flag too.
        let ticket = state.begin(RequestKind::Scan);
        assert!(state.is_loading(RequestKind::Scan));
        assert!(state.fail(ticket));
        assert!(!state.is_loading(RequestKind::Scan));
    }

    #[test]
    fn failure_leaves_previous_report_untouched() {
        let state = DashboardState::new();

        let ticket = state.begin(RequestKind::Scan);
        state.commit_scan(ticket, scan_report("configs/poisoned_config.json"));

        let ticket = state.begin(RequestKind::Scan);
        state.fail(ticket);

        let snap = state.snapshot();
        let report = snap.scan_report.expect("report survives the failed request");
        assert_eq!(report.config, "configs/poisoned_config.json");
        assert_eq!(report.summary.critical, 1);
    }

    #[test]
    fn stale_completion_is_dropped() {
        let state = DashboardState::new();

        let first = state.begin(RequestKind::Scan);
        let second = state.begin(RequestKind::Scan);

        // First response arrives after being superseded: dropped, still loading.
        assert!(!state.commit_scan(first, scan_report("old")));
        assert!(state.is_loading(RequestKind::Scan));
        assert!(state.snapshot().scan_report.is_none());

        // The latest request resolves normally.
        assert!(state.commit_scan(second, scan_report("new")));
        assert!(!state.is_loading(RequestKind::Scan));
        assert_eq!(state.snapshot().scan_report.unwrap().config, "new");
        assert_eq!(state.requests_superseded(), 1);
    }

    #[test]
    fn last_request_issued_wins_even_out_of_order() {
        let state = DashboardState::new();

        let first = state.begin(RequestKind::Scan);
        let second = state.begin(RequestKind::Scan);

        // Newer settles first, then the older response straggles in.
        assert!(state.commit_scan(second, scan_report("new")));
        assert!(!state.commit_scan(first, scan_report("old")));

        assert_eq!(state.snapshot().scan_report.unwrap().config, "new");
        assert!(!state.is_loading(RequestKind::Scan));
    }

    #[test]
    fn stale_failure_cannot_clear_newer_loading() {
        let state = DashboardState::new();

        let first = state.begin(RequestKind::Attack);
        let _second = state.begin(RequestKind::Attack);

        assert!(!state.fail(first));
        assert!(state.is_loading(RequestKind::Attack));
    }

    #[test]
    fn scan_and_attack_ledgers_are_independent() {
        let state = DashboardState::new();

        let scan = state.begin(RequestKind::Scan);
        let attack = state.begin(RequestKind::Attack);
        assert!(state.is_loading(RequestKind::Scan));
        assert!(state.is_loading(RequestKind::Attack));

        state.fail(attack);
        assert!(state.is_loading(RequestKind::Scan));
        assert!(!state.is_loading(RequestKind::Attack));

        state.commit_scan(scan, scan_report("a"));
        assert!(!state.is_loading(RequestKind::Scan));
    }

    #[test]
    fn tab_switch_does_not_disturb_reports() {
        let state = DashboardState::new();
        let ticket = state.begin(RequestKind::Scan);
        state.commit_scan(ticket, scan_report("a"));

        state.set_active_tab(Tab::Attack);
        assert_eq!(state.active_tab(), Tab::Attack);
        assert!(state.snapshot().scan_report.is_some());
    }
}
