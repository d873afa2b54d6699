use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::PermissionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[serde(alias = "subadmin", alias = "sub-admin")]
    SubAdmin,
    Recruiter,
    Member,
    #[serde(alias = "jobseeker", alias = "job-seeker")]
    JobSeeker,
    Employer,
    University,
    Business,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SubAdmin => "sub_admin",
            Role::Recruiter => "recruiter",
            Role::Member => "member",
            Role::JobSeeker => "job_seeker",
            Role::Employer => "employer",
            Role::University => "university",
            Role::Business => "business",
        }
    }

    /// Roles that may sign in to the admin panel at all
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::SubAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PermissionError;

    /// Accepts snake, kebab and camel spellings ("sub_admin", "sub-admin", "SubAdmin")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .collect::<String>()
            .to_ascii_lowercase();
        Ok(match key.as_str() {
            "admin" => Role::Admin,
            "subadmin" => Role::SubAdmin,
            "recruiter" => Role::Recruiter,
            "member" => Role::Member,
            "jobseeker" => Role::JobSeeker,
            "employer" => Role::Employer,
            "university" => Role::University,
            "business" => Role::Business,
            _ => return Err(PermissionError::UnknownRole(s.to_string())),
        })
    }
}
