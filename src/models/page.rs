//! Wizard page metadata

use serde::{Deserialize, Serialize};

/// The pages of the flat-file import wizard, in navigation order
///
/// `ProsePreview` and `ModifyColumns` are supplied by the embedding host; this
/// crate implements `FileConfig` and `Summary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageKind {
    FileConfig,
    ProsePreview,
    ModifyColumns,
    Summary,
}

impl PageKind {
    /// Page title shown in the wizard header
    pub fn title(&self) -> &'static str {
        match self {
            PageKind::FileConfig => "Specify Input File",
            PageKind::ProsePreview => "Preview Data",
            PageKind::ModifyColumns => "Modify Columns",
            PageKind::Summary => "Summary",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PageKind::FileConfig => "file_config",
            PageKind::ProsePreview => "prose_preview",
            PageKind::ModifyColumns => "modify_columns",
            PageKind::Summary => "summary",
        }
    }
}

impl std::fmt::Display for PageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
