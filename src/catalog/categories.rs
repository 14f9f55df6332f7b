use serde::{Deserialize, Serialize};

use crate::models::StringList;

/// Canonical preset scope identifiers.
///
/// `Everything` is the universal wildcard: once it appears in a selection,
/// category filtering is disabled entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Everything,
    AllEventLogs,
    MftTimeline,
    ApplicationExecution,
    FileFolderOpening,
    DeletedItemsFileExistence,
    BrowserActivity,
    ExternalDeviceUsage,
}

impl Category {
    /// Presentation order, wildcard first.
    pub const ALL: [Category; 8] = [
        Category::Everything,
        Category::AllEventLogs,
        Category::MftTimeline,
        Category::ApplicationExecution,
        Category::FileFolderOpening,
        Category::DeletedItemsFileExistence,
        Category::BrowserActivity,
        Category::ExternalDeviceUsage,
    ];

    /// Canonical identifier string.
    pub fn id(self) -> &'static str {
        match self {
            Category::Everything => "everything",
            Category::AllEventLogs => "all_event_logs",
            Category::MftTimeline => "mft_timeline",
            Category::ApplicationExecution => "application_execution",
            Category::FileFolderOpening => "file_folder_opening",
            Category::DeletedItemsFileExistence => "deleted_items_file_existence",
            Category::BrowserActivity => "browser_activity",
            Category::ExternalDeviceUsage => "external_device_usage",
        }
    }

    /// Display label shown in selection UIs and on the run report.
    pub fn label(self) -> &'static str {
        match self {
            Category::Everything => "Everything",
            Category::AllEventLogs => "All event logs",
            Category::MftTimeline => "MFT timeline",
            Category::ApplicationExecution => "Application execution",
            Category::FileFolderOpening => "File & folder opening",
            Category::DeletedItemsFileExistence => "Deleted items & file existence",
            Category::BrowserActivity => "Browser activity",
            Category::ExternalDeviceUsage => "External device & USB usage",
        }
    }

    /// Textual aliases accepted case-insensitively, in addition to the
    /// canonical identifier.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Category::Everything => &["all", "everything"],
            Category::AllEventLogs => &["all-event-logs", "evtx"],
            Category::MftTimeline => &["mft", "mft-timeline"],
            Category::ApplicationExecution => &["application", "application-execution"],
            Category::FileFolderOpening => &["file-folder", "file"],
            Category::DeletedItemsFileExistence => {
                &["deleted", "deleted-items", "deleted_items", "file-existence"]
            }
            Category::BrowserActivity => &["browser", "browser-activity"],
            Category::ExternalDeviceUsage => &[
                "external",
                "external-device",
                "external_device",
                "usb",
                "usb-usage",
                "usb_usage",
            ],
        }
    }

    /// Resolve one raw selection item to a category.
    ///
    /// Matching precedence: exact canonical identifier, exact display
    /// label, case-insensitive alias, case-insensitive display label.
    /// Anything else falls back to the wildcard.
    pub fn from_input(raw: &str) -> Category {
        let trimmed = raw.trim();

        for category in Category::ALL {
            if trimmed == category.id() {
                return category;
            }
        }
        for category in Category::ALL {
            if trimmed == category.label() {
                return category;
            }
        }

        let lower = trimmed.to_ascii_lowercase();
        for category in Category::ALL {
            if lower == category.id() || category.aliases().contains(&lower.as_str()) {
                return category;
            }
        }
        for category in Category::ALL {
            if lower == category.label().to_ascii_lowercase() {
                return category;
            }
        }

        Category::Everything
    }
}

/// Map raw scope input to an ordered, de-duplicated category set.
///
/// Items may be comma- or newline-delimited inside each string. When the
/// wildcard resolves anywhere in the input, the whole selection collapses
/// to it. `default_to_everything` controls what absence of input means:
/// the legacy wildcard default, or an explicit empty selection (used when
/// the caller intends to run only a dynamically injected preset).
pub fn normalize_scopes(raw: Option<&StringList>, default_to_everything: bool) -> Vec<Category> {
    let Some(raw) = raw else {
        return if default_to_everything {
            vec![Category::Everything]
        } else {
            Vec::new()
        };
    };

    let mut resolved: Vec<Category> = Vec::new();
    for item in raw.items() {
        for part in item.split([',', '\n']) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let category = Category::from_input(part);
            if !resolved.contains(&category) {
                resolved.push(category);
            }
        }
    }

    if resolved.contains(&Category::Everything) {
        return vec![Category::Everything];
    }
    resolved
}
