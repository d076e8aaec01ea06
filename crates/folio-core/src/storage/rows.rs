//! Row shapes of the four portfolio tables
//!
//! Read rows mirror what a relational store hands back: textual and order
//! columns may be null and children come back in no particular order. Insert
//! rows are what the replacer writes and are always fully populated.

use serde::{Deserialize, Serialize};

/// Identifier of the singleton profile row
pub type PortfolioId = i64;

/// The fixed key of the one profile this system manages
pub const PORTFOLIO_ID: PortfolioId = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: PortfolioId,
    pub name: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutRow {
    pub content: Option<String>,
    pub sort_order: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRow {
    pub tag: Option<String>,
    pub sort_order: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRow {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i64>,
    pub tags: Vec<TagRow>,
}

/// Profile row joined with its children, as fetched in one logical read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioRows {
    pub profile: ProfileRow,
    pub abouts: Vec<AboutRow>,
    pub projects: Vec<ProjectRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub id: PortfolioId,
    pub name: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAbout {
    pub portfolio_id: PortfolioId,
    pub content: String,
    pub sort_order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub portfolio_id: PortfolioId,
    pub title: String,
    pub description: String,
    pub sort_order: i64,
}

/// Store-generated id of an inserted project, with its order echoed back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertedProject {
    pub id: i64,
    pub sort_order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub project_id: i64,
    pub tag: String,
    pub sort_order: i64,
}
