//! Portal roles and the capabilities each one is granted.

use std::fmt::{Display, Formatter};

/// One permission checked by the portal facade before any storage access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    ReadSelf,
    ReadAll,
    WriteAttendance,
    ManageRoster,
    ManageStaff,
}

impl Capability {
    /// Stable string id used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadSelf => "read_self",
            Self::ReadAll => "read_all",
            Self::WriteAttendance => "write_attendance",
            Self::ManageRoster => "manage_roster",
            Self::ManageStaff => "manage_staff",
        }
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is using the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortalRole {
    /// Department head.
    Administrator,
    Instructor,
    /// A registered person viewing their own data.
    Individual,
}

impl PortalRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Instructor => "instructor",
            Self::Individual => "individual",
        }
    }

    /// Granted capabilities, in declaration order.
    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::Administrator => &[
                Capability::ReadSelf,
                Capability::ReadAll,
                Capability::ManageStaff,
            ],
            Self::Instructor => &[
                Capability::ReadSelf,
                Capability::ReadAll,
                Capability::WriteAttendance,
                Capability::ManageRoster,
            ],
            Self::Individual => &[Capability::ReadSelf],
        }
    }

    pub fn allows(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl Display for PortalRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Capability, PortalRole};

    #[test]
    fn capability_table_matches_roles() {
        use Capability::*;

        let expected = [
            (ReadSelf, [true, true, true]),
            (ReadAll, [true, true, false]),
            (WriteAttendance, [false, true, false]),
            (ManageRoster, [false, true, false]),
            (ManageStaff, [true, false, false]),
        ];
        let roles = [
            PortalRole::Administrator,
            PortalRole::Instructor,
            PortalRole::Individual,
        ];

        for (capability, allowed) in expected {
            for (role, allowed) in roles.iter().zip(allowed) {
                assert_eq!(
                    role.allows(capability),
                    allowed,
                    "{role} / {capability}"
                );
            }
        }
    }

    #[test]
    fn capability_ids_are_stable() {
        assert_eq!(Capability::ReadSelf.to_string(), "read_self");
        assert_eq!(Capability::WriteAttendance.as_str(), "write_attendance");
        assert_eq!(PortalRole::Individual.capabilities(), &[Capability::ReadSelf]);
    }
}
