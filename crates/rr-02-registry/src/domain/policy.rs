//! # Authorization Policy
//!
//! Every reporter-driven mutation passes two independent checks:
//!
//! 1. **Role**: the capability table below must allow the action.
//! 2. **Identity**: the caller must be the acting reporter's account or the
//!    network authority, and for an existing owned record the acting
//!    reporter must be its creator, hold the Authority role, or the caller
//!    must be the network authority.
//!
//! ## Capability Table
//!
//! | Action | Authority | Publisher | Tracer | Validator | Appraiser |
//! |--------|-----------|-----------|--------|-----------|-----------|
//! | CreateCase, UpdateCase | ✔ | ✔ | | | |
//! | CreateAddress, CreateAsset | ✔ | ✔ | ✔ | | |
//! | UpdateAddress, UpdateAsset | ✔ | ✔ | ✔ | | |
//! | ReassignCase | ✔ | ✔ | | | |
//! | ConfirmAddress, ConfirmAsset | ✔ | ✔ | | ✔ | ✔ |
//!
//! Network administration (reporters, authority, economics) is gated on the
//! network authority identity alone.

use crate::domain::entities::{Network, Reporter};
use crate::domain::value_objects::{Identity, ReporterRole, ReporterStatus};
use crate::errors::{RegistryError, RegistryResult};
use std::fmt;
use uuid::Uuid;

/// Reporter-driven actions subject to the capability table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    CreateCase,
    UpdateCase,
    CreateAddress,
    UpdateAddress,
    ConfirmAddress,
    CreateAsset,
    UpdateAsset,
    ConfirmAsset,
    /// Moving an address or asset to a different case.
    ReassignCase,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateCase => "create case",
            Self::UpdateCase => "update case",
            Self::CreateAddress => "create address",
            Self::UpdateAddress => "update address",
            Self::ConfirmAddress => "confirm address",
            Self::CreateAsset => "create asset",
            Self::UpdateAsset => "update asset",
            Self::ConfirmAsset => "confirm asset",
            Self::ReassignCase => "reassign case",
        };
        f.write_str(name)
    }
}

/// The capability table.
#[must_use]
pub const fn role_allows(role: ReporterRole, action: Action) -> bool {
    use Action::*;
    match role {
        ReporterRole::Authority => true,
        ReporterRole::Publisher => true,
        ReporterRole::Tracer => matches!(
            action,
            CreateAddress | UpdateAddress | CreateAsset | UpdateAsset
        ),
        ReporterRole::Validator | ReporterRole::Appraiser => {
            matches!(action, ConfirmAddress | ConfirmAsset)
        }
    }
}

/// Role check alone.
pub fn check_role(role: ReporterRole, action: Action) -> RegistryResult<()> {
    if role_allows(role, action) {
        return Ok(());
    }
    let reason = match action {
        Action::ReassignCase => "case reassignment not permitted for this role".to_string(),
        other => format!("role {role} may not {other}"),
    };
    Err(RegistryError::Forbidden(reason))
}

/// The caller and the reporter it acts as, within one network.
#[derive(Debug, Clone, Copy)]
pub struct Actor<'a> {
    pub caller: Identity,
    pub reporter: &'a Reporter,
    pub network: &'a Network,
}

impl Actor<'_> {
    /// True if the caller is the network authority.
    #[must_use]
    pub fn is_network_authority(&self) -> bool {
        self.caller == self.network.authority
    }
}

/// Full authorization for a reporter-driven action.
///
/// `owner` is the creating reporter of the record being mutated; `None`
/// for creations and confirmations.
pub fn authorize(
    actor: &Actor<'_>,
    action: Action,
    owner: Option<Uuid>,
    require_active: bool,
) -> RegistryResult<()> {
    if actor.caller != actor.reporter.account && !actor.is_network_authority() {
        return Err(RegistryError::Forbidden(
            "caller is neither the reporter account nor the network authority".into(),
        ));
    }

    check_role(actor.reporter.role, action)?;

    if require_active && actor.reporter.status != ReporterStatus::Active {
        return Err(RegistryError::Forbidden(format!(
            "reporter {} is not active",
            actor.reporter.id
        )));
    }

    if let Some(owner) = owner {
        let owns = owner == actor.reporter.id;
        let privileged =
            actor.reporter.role == ReporterRole::Authority || actor.is_network_authority();
        if !owns && !privileged {
            return Err(RegistryError::Forbidden(
                "only the creating reporter or the authority may modify this record".into(),
            ));
        }
    }

    Ok(())
}

/// Network administration: caller must be the current authority.
pub fn authorize_admin(caller: Identity, network: &Network) -> RegistryResult<()> {
    if caller == network.authority {
        Ok(())
    } else {
        Err(RegistryError::Forbidden(
            "only the network authority may administer the network".into(),
        ))
    }
}

/// Stake management: caller must be the reporter's own account.
pub fn authorize_self(caller: Identity, reporter: &Reporter) -> RegistryResult<()> {
    if caller == reporter.account {
        Ok(())
    } else {
        Err(RegistryError::Forbidden(
            "only the reporter account may manage its stake".into(),
        ))
    }
}

/// A confirmation must come from a reporter other than the original one.
pub fn check_not_self_confirmation(reporter: &Reporter, creator: Uuid) -> RegistryResult<()> {
    if reporter.id == creator {
        Err(RegistryError::Forbidden(
            "reporter may not confirm its own report".into(),
        ))
    } else {
        Ok(())
    }
}
