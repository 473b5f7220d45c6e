//! Severity model for replication status values.
//!
//! The numeric discriminants are an external contract: the process exit
//! code of `replistat` equals the discriminant of the overall status, so
//! monitoring agents can branch on the exit code alone.

use std::fmt;

/// Replication status of a service, a site, or the whole system.
///
/// The variants form a total order from worst to best; aggregation
/// always keeps the worst status observed (see [`ReplicationStatus::worse_of`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum ReplicationStatus {
    /// System replication is not configured on this site.
    NoReplication = 10,
    /// A service, a site, or the status query itself failed.
    Error = 11,
    /// Role or reachability could not be determined.
    Unknown = 12,
    /// A secondary is still materializing its initial copy.
    Initializing = 13,
    /// A secondary is catching up.
    Syncing = 14,
    /// Replication is fully in sync.
    Active = 15,
}

impl ReplicationStatus {
    /// Position in the severity order. Lower is worse.
    pub fn rank(self) -> i32 {
        self as i32
    }

    /// The lower-ranked (worse) of two statuses.
    ///
    /// Commutative, associative, and idempotent, so reductions over any
    /// collection of statuses are order independent.
    pub fn worse_of(a: ReplicationStatus, b: ReplicationStatus) -> ReplicationStatus {
        if a.rank() <= b.rank() { a } else { b }
    }

    /// Maps raw status text reported by the nameserver.
    ///
    /// Only the canonical uppercase vocabulary is recognized; anything
    /// else (including future states) maps to [`ReplicationStatus::Error`]
    /// so it lowers the overall result instead of being invisible.
    pub fn from_text(text: &str) -> ReplicationStatus {
        match text {
            "ERROR" => ReplicationStatus::Error,
            "UNKNOWN" => ReplicationStatus::Unknown,
            "INITIALIZING" => ReplicationStatus::Initializing,
            "SYNCING" => ReplicationStatus::Syncing,
            "ACTIVE" => ReplicationStatus::Active,
            _ => ReplicationStatus::Error,
        }
    }

    /// Canonical display text. Stable: parsed by external tooling.
    pub fn as_text(self) -> &'static str {
        match self {
            ReplicationStatus::NoReplication => "System Replication not active",
            ReplicationStatus::Error => "ERROR",
            ReplicationStatus::Unknown => "UNKNOWN",
            ReplicationStatus::Initializing => "INITIALIZING",
            ReplicationStatus::Syncing => "SYNCING",
            ReplicationStatus::Active => "ACTIVE",
        }
    }

    /// Process exit code reported for this overall status.
    pub fn exit_code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ReplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

#[cfg(test)]
mod tests {
    use super::ReplicationStatus::{self, *};

    const ALL: [ReplicationStatus; 6] =
        [NoReplication, Error, Unknown, Initializing, Syncing, Active];

    #[test]
    fn severity_order_is_fixed() {
        assert!(NoReplication.rank() < Error.rank());
        assert!(Error.rank() < Unknown.rank());
        assert!(Unknown.rank() < Initializing.rank());
        assert!(Initializing.rank() < Syncing.rank());
        assert!(Syncing.rank() < Active.rank());
    }

    #[test]
    fn worse_of_is_commutative_associative_idempotent() {
        for a in ALL {
            assert_eq!(ReplicationStatus::worse_of(a, a), a);
            for b in ALL {
                assert_eq!(
                    ReplicationStatus::worse_of(a, b),
                    ReplicationStatus::worse_of(b, a)
                );
                for c in ALL {
                    let left = ReplicationStatus::worse_of(ReplicationStatus::worse_of(a, b), c);
                    let right = ReplicationStatus::worse_of(a, ReplicationStatus::worse_of(b, c));
                    assert_eq!(left, right);
                }
            }
        }
    }

    #[test]
    fn canonical_vocabulary_round_trips() {
        for s in [Error, Unknown, Initializing, Syncing, Active] {
            assert_eq!(ReplicationStatus::from_text(s.as_text()), s);
        }
    }

    #[test]
    fn unrecognized_text_defaults_to_error() {
        assert_eq!(ReplicationStatus::from_text("STOPPED"), Error);
        assert_eq!(ReplicationStatus::from_text("active"), Error);
        assert_eq!(ReplicationStatus::from_text(""), Error);
        // The no-replication display text is outside the parse vocabulary.
        assert_eq!(
            ReplicationStatus::from_text(NoReplication.as_text()),
            Error
        );
    }

    #[test]
    fn exit_codes_match_discriminants() {
        assert_eq!(NoReplication.exit_code(), 10);
        assert_eq!(Active.exit_code(), 15);
    }
}
