//! Domain-join option flags

use bitflags::bitflags;

bitflags! {
    /// Flags controlling domain-join behavior on the target instances.
    ///
    /// Numeric values match the NETSETUP join-option constants understood
    /// by the guest agent, so the bitmask passes through to the wire
    /// unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct JoinFlags: u32 {
        /// Join a domain rather than a workgroup
        const JOIN_DOMAIN = 0x1;
        /// Create the machine account during the join
        const ACCT_CREATE = 0x2;
        /// Allow joining from an upgraded legacy install
        const WIN9X_UPGRADE = 0x10;
        /// Succeed when the machine is already joined to the domain
        const DOMAIN_JOIN_IF_JOINED = 0x20;
        /// Perform an unsecured join
        const JOIN_UNSECURE = 0x40;
        /// The machine password is passed instead of a user credential
        const MACHINE_PWD_PASSED = 0x80;
        /// Defer service principal name registration
        const DEFER_SPN_SET = 0x100;
        /// Join under a new computer name set in the same operation
        const JOIN_WITH_NEW_NAME = 0x400;
        /// Join against a read-only domain controller
        const JOIN_READONLY = 0x800;
        /// The join is invoked during installation
        const INSTALL_INVOKE = 0x40000;
    }
}

impl JoinFlags {
    /// Default behavior when a domain join supplies no options: join the
    /// domain, create the machine account, and succeed if already joined.
    pub fn default_join() -> Self {
        Self::JOIN_DOMAIN | Self::ACCT_CREATE | Self::DOMAIN_JOIN_IF_JOINED
    }
}
