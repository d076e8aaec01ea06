//! Replace-all write sequence
//!
//! A replace never diffs against what is stored. The profile row is
//! upserted, then every child row is deleted and the full new set is inserted
//! with `sort_order` taken from array position. Tags are attached to the
//! freshly generated project ids by matching each inserted project's echoed
//! order back to the input array.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::document::ValidDocument;
use crate::storage::rows::{NewAbout, NewProfile, NewProject, NewTag, PortfolioId};
use crate::storage::{RowWriter, StorageError};

/// Logical step of the replace sequence, used to report where a write failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplaceStep {
    /// Starting or running the write job in the backend
    Begin,
    UpsertProfile,
    ClearAbout,
    InsertAbout,
    ClearProjects,
    InsertProjects,
    InsertTags,
    /// Committing the backend transaction
    Commit,
}

impl ReplaceStep {
    /// The user-facing action that failed, e.g. "update about"
    pub fn action(self) -> &'static str {
        match self {
            Self::Begin | Self::UpsertProfile => "save portfolio",
            Self::ClearAbout | Self::InsertAbout => "update about",
            Self::ClearProjects | Self::InsertProjects => "update projects",
            Self::InsertTags => "update project tags",
            Self::Commit => "commit portfolio",
        }
    }
}

impl fmt::Display for ReplaceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Begin => "begin",
            Self::UpsertProfile => "upsert_profile",
            Self::ClearAbout => "clear_about",
            Self::InsertAbout => "insert_about",
            Self::ClearProjects => "clear_projects",
            Self::InsertProjects => "insert_projects",
            Self::InsertTags => "insert_tags",
            Self::Commit => "commit",
        };
        f.write_str(name)
    }
}

/// A store failure during one step of a replace
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("replace failed at {step}: {source}")]
pub struct ReplaceError {
    pub step: ReplaceStep,
    #[source]
    pub source: StorageError,
    rolled_back: bool,
}

impl ReplaceError {
    pub fn at(step: ReplaceStep, source: StorageError) -> Self {
        Self {
            step,
            source,
            rolled_back: false,
        }
    }

    /// Mark that the backend discarded every step of this write
    #[must_use]
    pub fn rolled_back(mut self) -> Self {
        self.rolled_back = true;
        self
    }

    pub fn is_rolled_back(&self) -> bool {
        self.rolled_back
    }

    /// Whether earlier steps may still be applied in the store.
    ///
    /// When true the stored document may match neither the old nor the new
    /// state.
    pub fn may_be_partial(&self) -> bool {
        !self.rolled_back && self.step != ReplaceStep::UpsertProfile
    }
}

/// Row counts written by a successful replace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceReport {
    pub about: usize,
    pub projects: usize,
    pub tags: usize,
}

/// Run the replace sequence for `document` against `writer`.
///
/// Stops at the first failing step. Nothing is retried and nothing already
/// written is undone here; undoing is the backend's job.
pub fn apply(
    writer: &mut dyn RowWriter,
    portfolio_id: PortfolioId,
    document: &ValidDocument,
) -> Result<ReplaceReport, ReplaceError> {
    let mut report = ReplaceReport::default();

    writer
        .upsert_profile(&NewProfile {
            id: portfolio_id,
            name: document.name.clone(),
            title: document.title.clone(),
        })
        .map_err(|e| ReplaceError::at(ReplaceStep::UpsertProfile, e))?;

    let removed = writer
        .delete_abouts(portfolio_id)
        .map_err(|e| ReplaceError::at(ReplaceStep::ClearAbout, e))?;
    debug!(portfolio_id, removed, "Cleared about paragraphs");

    let about_rows: Vec<NewAbout> = document
        .about
        .iter()
        .enumerate()
        .map(|(index, content)| NewAbout {
            portfolio_id,
            content: content.clone(),
            sort_order: index as i64,
        })
        .collect();

    if !about_rows.is_empty() {
        writer
            .insert_abouts(&about_rows)
            .map_err(|e| ReplaceError::at(ReplaceStep::InsertAbout, e))?;
        report.about = about_rows.len();
    }

    let removed = writer
        .delete_projects(portfolio_id)
        .map_err(|e| ReplaceError::at(ReplaceStep::ClearProjects, e))?;
    debug!(portfolio_id, removed, "Cleared projects");

    if document.projects.is_empty() {
        return Ok(report);
    }

    let project_rows: Vec<NewProject> = document
        .projects
        .iter()
        .enumerate()
        .map(|(index, project)| NewProject {
            portfolio_id,
            title: project.title.clone(),
            description: project.description.clone(),
            sort_order: index as i64,
        })
        .collect();

    let inserted = writer
        .insert_projects(&project_rows)
        .map_err(|e| ReplaceError::at(ReplaceStep::InsertProjects, e))?;
    report.projects = inserted.len();

    // Generated ids carry no relation to input positions; the echoed order is
    // the only link back to the input project that owns the tags.
    let ids_by_order: HashMap<i64, i64> = inserted
        .iter()
        .map(|project| (project.sort_order.unwrap_or(0), project.id))
        .collect();

    let mut tag_rows = Vec::new();
    for (index, project) in document.projects.iter().enumerate() {
        let Some(&project_id) = ids_by_order.get(&(index as i64)) else {
            return Err(ReplaceError::at(
                ReplaceStep::InsertProjects,
                StorageError::CorruptedData(format!(
                    "no generated id returned for project at order {index}"
                )),
            ));
        };

        tag_rows.extend(project.tags.iter().enumerate().map(|(tag_index, tag)| NewTag {
            project_id,
            tag: tag.clone(),
            sort_order: tag_index as i64,
        }));
    }

    if !tag_rows.is_empty() {
        writer
            .insert_tags(&tag_rows)
            .map_err(|e| ReplaceError::at(ReplaceStep::InsertTags, e))?;
        report.tags = tag_rows.len();
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, Project};
    use crate::storage::rows::InsertedProject;
    use crate::storage::StorageResult;
    use crate::validation::validate_document;

    /// Records every call and hands out ids in reverse insertion order
    #[derive(Default)]
    struct RecordingWriter {
        calls: Vec<&'static str>,
        abouts: Vec<NewAbout>,
        projects: Vec<NewProject>,
        tags: Vec<NewTag>,
        fail: Option<&'static str>,
    }

    impl RecordingWriter {
        fn step(&mut self, name: &'static str) -> StorageResult<()> {
            self.calls.push(name);
            if self.fail == Some(name) {
                return Err(StorageError::backend(format!("{name} failed")));
            }
            Ok(())
        }
    }

    impl RowWriter for RecordingWriter {
        fn upsert_profile(&mut self, _profile: &NewProfile) -> StorageResult<()> {
            self.step("upsert_profile")
        }

        fn delete_abouts(&mut self, _portfolio_id: PortfolioId) -> StorageResult<usize> {
            self.step("delete_abouts").map(|_| 0)
        }

        fn insert_abouts(&mut self, rows: &[NewAbout]) -> StorageResult<()> {
            self.step("insert_abouts")?;
            self.abouts.extend_from_slice(rows);
            Ok(())
        }

        fn delete_projects(&mut self, _portfolio_id: PortfolioId) -> StorageResult<usize> {
            self.step("delete_projects").map(|_| 0)
        }

        fn insert_projects(&mut self, rows: &[NewProject]) -> StorageResult<Vec<InsertedProject>> {
            self.step("insert_projects")?;
            self.projects.extend_from_slice(rows);
            Ok(rows
                .iter()
                .rev()
                .enumerate()
                .map(|(i, row)| InsertedProject {
                    id: 100 + i as i64,
                    sort_order: Some(row.sort_order),
                })
                .collect())
        }

        fn insert_tags(&mut self, rows: &[NewTag]) -> StorageResult<()> {
            self.step("insert_tags")?;
            self.tags.extend_from_slice(rows);
            Ok(())
        }
    }

    fn sample() -> ValidDocument {
        validate_document(
            &Document::new("Ada", "Engineer")
                .with_about(["first", "second"])
                .with_projects(vec![
                    Project::new("A", "alpha").with_tags(["x", "y"]),
                    Project::new("B", "beta").with_tags(["z"]),
                ]),
        )
        .unwrap()
    }

    #[test]
    fn test_step_sequence() {
        let mut writer = RecordingWriter::default();
        let report = apply(&mut writer, 1, &sample()).unwrap();

        assert_eq!(
            writer.calls,
            vec![
                "upsert_profile",
                "delete_abouts",
                "insert_abouts",
                "delete_projects",
                "insert_projects",
                "insert_tags"
            ]
        );
        assert_eq!(
            report,
            ReplaceReport {
                about: 2,
                projects: 2,
                tags: 3
            }
        );
    }

    #[test]
    fn test_orders_follow_array_position() {
        let mut writer = RecordingWriter::default();
        apply(&mut writer, 1, &sample()).unwrap();

        let orders: Vec<i64> = writer.abouts.iter().map(|r| r.sort_order).collect();
        assert_eq!(orders, vec![0, 1]);
        let orders: Vec<i64> = writer.projects.iter().map(|r| r.sort_order).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn test_tags_remapped_to_generated_ids() {
        let mut writer = RecordingWriter::default();
        apply(&mut writer, 1, &sample()).unwrap();

        // Reverse id assignment: project B (order 1) got id 100, A got 101
        let tags: Vec<(i64, &str, i64)> = writer
            .tags
            .iter()
            .map(|t| (t.project_id, t.tag.as_str(), t.sort_order))
            .collect();
        assert_eq!(tags, vec![(101, "x", 0), (101, "y", 1), (100, "z", 0)]);
    }

    #[test]
    fn test_empty_collections_skip_inserts() {
        let mut writer = RecordingWriter::default();
        let doc = validate_document(&Document::new("Ada", "Engineer")).unwrap();
        apply(&mut writer, 1, &doc).unwrap();

        assert_eq!(
            writer.calls,
            vec!["upsert_profile", "delete_abouts", "delete_projects"]
        );
    }

    #[test]
    fn test_failure_stops_sequence_and_names_step() {
        let mut writer = RecordingWriter {
            fail: Some("delete_projects"),
            ..Default::default()
        };
        let err = apply(&mut writer, 1, &sample()).unwrap_err();

        assert_eq!(err.step, ReplaceStep::ClearProjects);
        assert_eq!(err.step.action(), "update projects");
        assert!(err.may_be_partial());
        assert_eq!(writer.calls.last(), Some(&"delete_projects"));
        assert!(writer.projects.is_empty());
    }

    #[test]
    fn test_rolled_back_is_not_partial() {
        let err = ReplaceError::at(ReplaceStep::InsertTags, StorageError::backend("x")).rolled_back();
        assert!(!err.may_be_partial());

        let err = ReplaceError::at(ReplaceStep::UpsertProfile, StorageError::backend("x"));
        assert!(!err.may_be_partial());
    }
}
