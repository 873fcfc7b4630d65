//! Builds the connection pool descriptor of a pooled connection factory.
//!
//! Pure function over pool sizing, transaction support, managed pool class
//! and enlistment tracing. Nothing here fails: an unrecognized transaction
//! support value falls back to XA.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// JCA transaction support level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionSupport {
    /// `NoTransaction`
    None,
    /// `LocalTransaction`
    Local,
    /// `XATransaction`
    Xa,
}

impl TransactionSupport {
    /// JCA name of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NoTransaction",
            Self::Local => "LocalTransaction",
            Self::Xa => "XATransaction",
        }
    }

    /// Parse a JCA name, defaulting to XA for anything unrecognized.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|()| {
            warn!(value, "unrecognized transaction support, using XATransaction");
            Self::Xa
        })
    }
}

impl FromStr for TransactionSupport {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NoTransaction" => Ok(Self::None),
            "LocalTransaction" => Ok(Self::Local),
            "XATransaction" => Ok(Self::Xa),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TransactionSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing transaction mode of a pooled connection factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionMode {
    /// `none`
    None,
    /// `local`
    Local,
    /// `xa`
    Xa,
}

impl TransactionMode {
    /// Map the user value, defaulting to `xa` for anything unrecognized.
    ///
    /// The schema default `transaction` also means `xa`.
    #[must_use]
    pub fn from_user_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "local" => Self::Local,
            "xa" | "transaction" => Self::Xa,
            other => {
                warn!(value = other, "unrecognized transaction mode, using xa");
                Self::Xa
            }
        }
    }

    /// Corresponding JCA transaction support level.
    #[must_use]
    pub const fn support(self) -> TransactionSupport {
        match self {
            Self::None => TransactionSupport::None,
            Self::Local => TransactionSupport::Local,
            Self::Xa => TransactionSupport::Xa,
        }
    }
}

/// Flush behavior on connection errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlushStrategy {
    /// Evict only the connection that failed.
    FailingConnectionOnly,
    /// Evict idle connections.
    IdleConnections,
    /// Evict the whole pool.
    EntirePool,
}

/// Connection validation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    /// Validate a connection when it is matched for hand-out.
    pub validate_on_match: bool,
    /// Validate on a background timer.
    pub background_validation: bool,
    /// Custom validator class, if any.
    pub custom_validator: Option<String>,
}

/// XA recovery registration policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryPolicy {
    /// The connection definition is XA capable.
    pub xa_capable: bool,
    /// Keep the definition out of the recovery manager. The broker registers
    /// its own recovery with the right credentials when it activates.
    pub no_recovery: bool,
}

/// Security mode of the connection definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityMode {
    /// Credentials come from the application; pools are keyed by request info.
    ApplicationManaged,
}

/// XA-specific pool flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XaPoolSettings {
    /// Override of `isSameRM`; `None` leaves the resource's answer.
    pub same_rm_override: Option<bool>,
    /// Interleave XA transactions on one connection.
    pub interleaving: bool,
    /// Pad Xids.
    pub pad_xid: bool,
    /// Wrap the XA resource.
    pub wrap_xa_resource: bool,
    /// Keep a separate pool for non-transactional use.
    pub no_tx_separate_pool: bool,
}

impl Default for XaPoolSettings {
    fn default() -> Self {
        Self {
            same_rm_override: None,
            interleaving: false,
            pad_xid: false,
            wrap_xa_resource: true,
            no_tx_separate_pool: false,
        }
    }
}

/// Pool implementation variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolKind {
    /// Plain pool.
    Plain,
    /// XA-aware pool.
    Xa(XaPoolSettings),
}

/// Pool descriptor consumed by the connection runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDescriptor {
    /// Minimum size; `None` means container default.
    pub min_size: Option<u32>,
    /// Maximum size; `None` means container default.
    pub max_size: Option<u32>,
    /// Transaction support level.
    pub transaction_support: TransactionSupport,
    /// Pool variant.
    pub kind: PoolKind,
    /// Pre-fill the pool on start.
    pub prefill: bool,
    /// Never shrink below the minimum.
    pub use_strict_min: bool,
    /// Fair hand-out.
    pub fair: bool,
    /// Flush behavior.
    pub flush_strategy: FlushStrategy,
    /// Validation policy.
    pub validation: ValidationPolicy,
    /// Recovery policy.
    pub recovery: RecoveryPolicy,
    /// Security mode.
    pub security: SecurityMode,
    /// Managed connection pool implementation class.
    pub managed_connection_pool_class_name: Option<String>,
    /// Enlistment tracing; `None` leaves it to the container.
    pub enlistment_trace: Option<bool>,
}

impl PoolDescriptor {
    /// True when the pool is the XA-aware variant.
    #[must_use]
    pub const fn is_xa(&self) -> bool {
        matches!(self.kind, PoolKind::Xa(_))
    }
}

/// Inputs of [`build_pool_descriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolRequest<'a> {
    /// Minimum pool size, `-1` for container default.
    pub min_pool_size: Option<i32>,
    /// Maximum pool size, `-1` for container default.
    pub max_pool_size: Option<i32>,
    /// JCA transaction support name.
    pub transaction_support: &'a str,
    /// Managed connection pool implementation class.
    pub managed_connection_pool_class_name: Option<&'a str>,
    /// Enlistment tracing.
    pub enlistment_trace: Option<bool>,
}

fn normalize_bound(bound: Option<i32>) -> Option<u32> {
    bound.and_then(|v| u32::try_from(v).ok())
}

/// Build the pool descriptor.
#[must_use]
pub fn build_pool_descriptor(request: &PoolRequest<'_>) -> PoolDescriptor {
    let transaction_support = TransactionSupport::parse_lenient(request.transaction_support);
    let kind = if transaction_support == TransactionSupport::Xa {
        PoolKind::Xa(XaPoolSettings::default())
    } else {
        PoolKind::Plain
    };
    let xa_capable = matches!(kind, PoolKind::Xa(_));

    PoolDescriptor {
        min_size: normalize_bound(request.min_pool_size),
        max_size: normalize_bound(request.max_pool_size),
        transaction_support,
        kind,
        prefill: false,
        use_strict_min: false,
        fair: true,
        flush_strategy: FlushStrategy::FailingConnectionOnly,
        validation: ValidationPolicy {
            validate_on_match: true,
            background_validation: false,
            custom_validator: None,
        },
        recovery: RecoveryPolicy {
            xa_capable,
            no_recovery: true,
        },
        security: SecurityMode::ApplicationManaged,
        managed_connection_pool_class_name: request
            .managed_connection_pool_class_name
            .map(str::to_owned),
        enlistment_trace: request.enlistment_trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(tx: &str) -> PoolRequest<'_> {
        PoolRequest {
            min_pool_size: Some(-1),
            max_pool_size: Some(-1),
            transaction_support: tx,
            managed_connection_pool_class_name: None,
            enlistment_trace: None,
        }
    }

    #[test]
    fn test_unbounded_sentinel_is_unset() {
        let pool = build_pool_descriptor(&request("XATransaction"));
        assert_eq!(pool.min_size, None);
        assert_eq!(pool.max_size, None);
    }

    #[test]
    fn test_explicit_bounds_pass_through() {
        let mut req = request("NoTransaction");
        req.min_pool_size = Some(2);
        req.max_pool_size = Some(40);
        let pool = build_pool_descriptor(&req);
        assert_eq!(pool.min_size, Some(2));
        assert_eq!(pool.max_size, Some(40));
        assert_eq!(pool.kind, PoolKind::Plain);
        assert!(!pool.recovery.xa_capable);
    }

    #[test]
    fn test_xa_pool_flags() {
        let pool = build_pool_descriptor(&request("XATransaction"));
        assert!(pool.is_xa());
        assert_eq!(pool.kind, PoolKind::Xa(XaPoolSettings::default()));
        assert!(pool.recovery.xa_capable);
        assert!(pool.recovery.no_recovery);
    }

    #[test]
    fn test_fixed_policies() {
        for tx in ["NoTransaction", "LocalTransaction", "XATransaction"] {
            let pool = build_pool_descriptor(&request(tx));
            assert!(!pool.prefill);
            assert!(!pool.use_strict_min);
            assert_eq!(pool.flush_strategy, FlushStrategy::FailingConnectionOnly);
            assert!(pool.validation.validate_on_match);
            assert!(!pool.validation.background_validation);
            assert_eq!(pool.transaction_support.as_str(), tx);
        }
    }

    #[test]
    fn test_unrecognized_support_defaults_to_xa() {
        let pool = build_pool_descriptor(&request("bogus"));
        assert_eq!(pool.transaction_support, TransactionSupport::Xa);
        assert!(pool.is_xa());
    }

    #[test]
    fn test_user_mode_mapping() {
        assert_eq!(TransactionMode::from_user_str("none").support(), TransactionSupport::None);
        assert_eq!(TransactionMode::from_user_str("LOCAL").support(), TransactionSupport::Local);
        assert_eq!(TransactionMode::from_user_str("xa").support(), TransactionSupport::Xa);
        assert_eq!(TransactionMode::from_user_str("transaction"), TransactionMode::Xa);
        assert_eq!(TransactionMode::from_user_str("bogus"), TransactionMode::Xa);
    }

    #[test]
    fn test_passthrough_fields() {
        let mut req = request("LocalTransaction");
        req.managed_connection_pool_class_name = Some("org.acme.Pool");
        req.enlistment_trace = Some(false);
        let pool = build_pool_descriptor(&req);
        assert_eq!(pool.managed_connection_pool_class_name.as_deref(), Some("org.acme.Pool"));
        assert_eq!(pool.enlistment_trace, Some(false));
    }
}
