pub mod coupon;
pub mod job;
pub mod user;

pub use coupon::Coupon;
pub use job::Job;
pub use user::PortalUser;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::permission::Role;

/// Admin resources addressable by URL and by `resource:operation` grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Jobs,
    Users,
    Coupons,
    Employers,
    Universities,
    Businesses,
    JobSeekers,
    SubAdmins,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Jobs,
        Resource::Users,
        Resource::Coupons,
        Resource::Employers,
        Resource::Universities,
        Resource::Businesses,
        Resource::JobSeekers,
        Resource::SubAdmins,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Jobs => "jobs",
            Resource::Users => "users",
            Resource::Coupons => "coupons",
            Resource::Employers => "employers",
            Resource::Universities => "universities",
            Resource::Businesses => "businesses",
            Resource::JobSeekers => "job-seekers",
            Resource::SubAdmins => "sub-admins",
        }
    }

    /// Account resources are views over the user list narrowed to one role
    pub fn implied_role(&self) -> Option<Role> {
        match self {
            Resource::Employers => Some(Role::Employer),
            Resource::Universities => Some(Role::University),
            Resource::Businesses => Some(Role::Business),
            Resource::JobSeekers => Some(Role::JobSeeker),
            Resource::SubAdmins => Some(Role::SubAdmin),
            Resource::Jobs | Resource::Users | Resource::Coupons => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Resource::ALL
            .iter()
            .find(|r| r.as_str() == normalized)
            .copied()
            .ok_or_else(|| format!("unknown resource '{}'", s))
    }
}
