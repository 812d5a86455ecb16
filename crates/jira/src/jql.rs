//! Query construction.

use pipeline::ProjectName;

/// Builds the search query for one project: a project filter clause followed by
/// the configured remainder, e.g. `project = 'Apollo' AND status = Done`.
///
/// Quotes and backslashes in the project name are escaped so a name can never
/// terminate the string literal early.
pub fn project_query(project: &ProjectName, rest: &str) -> String {
    let escaped = project.as_str().replace('\\', "\\\\").replace('\'', "\\'");
    let rest = rest.trim();
    if rest.is_empty() {
        format!("project = '{escaped}'")
    } else {
        format!("project = '{escaped}' {rest}")
    }
}
