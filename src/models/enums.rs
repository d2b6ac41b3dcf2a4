//! String-backed enums shared by several tables.
//!
//! The stored literals are the ones the mobile clients already display, so
//! they stay in Indonesian even though the Rust names are English.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller role carried in the JWT and stored on the user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "user")]
    #[default]
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
pub enum Religion {
    #[sea_orm(string_value = "Islam")]
    Islam,
    #[sea_orm(string_value = "Kristen")]
    Kristen,
    #[sea_orm(string_value = "Katolik")]
    Katolik,
    #[sea_orm(string_value = "Hindu")]
    Hindu,
    #[sea_orm(string_value = "Buddha")]
    Buddha,
    #[sea_orm(string_value = "Konghucu")]
    Konghucu,
}

impl fmt::Display for Religion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

/// Review lifecycle shared by task claims and reward requests.
///
/// `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[derive(Default)]
pub enum ReviewStatus {
    #[sea_orm(string_value = "Perlu Review")]
    #[serde(rename = "Perlu Review")]
    #[default]
    Pending,
    #[sea_orm(string_value = "Diterima")]
    #[serde(rename = "Diterima")]
    Accepted,
    #[sea_orm(string_value = "Ditolak")]
    #[serde(rename = "Ditolak")]
    Rejected,
}

impl ReviewStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ReviewStatus::Pending)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

/// Source of a point history row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
pub enum PointKind {
    #[sea_orm(string_value = "Task")]
    Task,
    #[sea_orm(string_value = "Submission")]
    Submission,
    #[sea_orm(string_value = "Penalty")]
    Penalty,
    #[sea_orm(string_value = "Reward")]
    Reward,
    #[sea_orm(string_value = "Religion")]
    Religion,
    #[sea_orm(string_value = "Religion Request")]
    #[serde(rename = "Religion Request")]
    ReligionRequest,
}

/// The four claim shapes a user can file for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(24))")]
#[serde(rename_all = "snake_case")]
pub enum ClaimKind {
    /// Proof of a catalog task.
    #[sea_orm(string_value = "task_upload")]
    TaskUpload,
    /// Free-form, self-reported task with its own point value.
    #[sea_orm(string_value = "task_submission")]
    TaskSubmission,
    /// Proof of a religion task.
    #[sea_orm(string_value = "religion_upload")]
    ReligionUpload,
    /// Free-form religious activity with its own point value.
    #[sea_orm(string_value = "religion_request")]
    ReligionRequest,
}

impl ClaimKind {
    /// History kind written when a claim of this shape is accepted.
    pub fn point_kind(self) -> PointKind {
        match self {
            ClaimKind::TaskUpload => PointKind::Task,
            ClaimKind::TaskSubmission => PointKind::Submission,
            ClaimKind::ReligionUpload => PointKind::Religion,
            ClaimKind::ReligionRequest => PointKind::ReligionRequest,
        }
    }

    /// Free-form claims carry their own title and point value.
    pub fn is_free_form(self) -> bool {
        matches!(
            self,
            ClaimKind::TaskSubmission | ClaimKind::ReligionRequest
        )
    }
}
