use lazy_static::lazy_static;

use super::categories::Category;
use crate::constants::{FUNCTION_FLAG, QUERY_SCRIPT};

/// Secondary-transform behavior declared by a preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Pipe primary output through rdump with the global default arguments.
    Default,
    /// Pipe primary output through rdump with preset-specific arguments.
    Override(Vec<String>),
    /// No tabular conversion; the primary output is persisted as-is.
    Disabled,
}

/// One catalog entry: a named extraction operation and its categorization.
///
/// Catalog entries are built once at startup and never mutated; the only
/// transient preset is the one the custom-rule injector synthesizes per
/// run.
#[derive(Debug, Clone)]
pub struct Preset {
    pub name: String,
    /// Console script implementing the primary operation.
    pub script: String,
    pub arguments: Vec<String>,
    pub output_suffix: String,
    pub categories: Vec<Category>,
    pub transform: Transform,
    /// Override for the produced artifact's extension; stage default when
    /// absent.
    pub output_extension: Option<String>,
    /// Override for the produced artifact's data type tag; stage default
    /// when absent.
    pub data_type: Option<String>,
    /// Capture primary output as text instead of raw bytes.
    pub decode_output: bool,
}

impl Preset {
    /// Standard catalog entry: one extraction function, default transform.
    fn query(name: &str, function: &str, suffix: &str, categories: &[Category]) -> Self {
        Preset {
            name: name.to_string(),
            script: QUERY_SCRIPT.to_string(),
            arguments: vec![FUNCTION_FLAG.to_string(), function.to_string()],
            output_suffix: suffix.to_string(),
            categories: categories.to_vec(),
            transform: Transform::Default,
            output_extension: None,
            data_type: None,
            decode_output: false,
        }
    }

    fn with_transform(mut self, arguments: &[&str]) -> Self {
        self.transform = Transform::Override(arguments.iter().map(|a| a.to_string()).collect());
        self
    }

    /// Extraction-function descriptor: the token following the function
    /// selector flag, if any. Presets without one are always considered
    /// available.
    pub fn plugin(&self) -> Option<&str> {
        let index = self.arguments.iter().position(|a| a == FUNCTION_FLAG)?;
        self.arguments.get(index + 1).map(String::as_str)
    }

    /// Whether the primary operation emits record-formatted output that
    /// can be routed to a record sink.
    pub fn exports_records(&self) -> bool {
        self.transform != Transform::Disabled
    }
}

lazy_static! {
    /// The curated sweep catalog, in execution order.
    pub static ref CATALOG: Vec<Preset> = build_catalog();
}

fn build_catalog() -> Vec<Preset> {
    use Category::*;

    vec![
        Preset::query("All event logs", "evtx", "evtx", &[AllEventLogs]),
        Preset::query("Generate a MFT Timeline", "mft.records", "mft_timeline", &[MftTimeline]),
        Preset::query("Shimcache", "shimcache", "shimcache", &[ApplicationExecution]),
        Preset::query("Task Bar Feature Usage", "featureusage", "featureusage", &[ApplicationExecution]),
        Preset::query("Amcache.hve", "amcache", "amcache", &[ApplicationExecution]),
        Preset::query("Jump Lists", "jumplist", "jumplist", &[ApplicationExecution]),
        Preset::query("Open/Save MRU", "mru.opensave", "mru_opensave", &[FileFolderOpening]),
        Preset::query("Recent Files (MRU)", "mru.recentdocs", "mru_recentdocs", &[FileFolderOpening]),
        Preset::query(
            "Shortcut (LNK) Files",
            "lnk",
            "lnk",
            &[FileFolderOpening, DeletedItemsFileExistence, ExternalDeviceUsage],
        ),
        Preset::query(
            "Shell Bags",
            "shellbags",
            "shellbags",
            &[FileFolderOpening, DeletedItemsFileExistence],
        ),
        Preset::query("Office Recent Files", "mru.msoffice", "mru_msoffice", &[FileFolderOpening]),
        Preset::query("Office Trust Records", "trusteddocs", "trusteddocs", &[FileFolderOpening]),
        Preset::query("Last Visited MRU", "mru", "mru", &[ApplicationExecution]),
        Preset::query("RunMRU", "runkeys", "runkeys", &[ApplicationExecution]),
        Preset::query(
            "Windows 10 Timeline (ActivitiesCache.db)",
            "activitiescache",
            "activitiescache",
            &[ApplicationExecution],
        ),
        Preset::query("BAM/DAM", "bam", "bam", &[ApplicationExecution]),
        Preset::query("SRUM (System Resource Usage Monitor)", "sru", "sru", &[ApplicationExecution]),
        Preset::query("Prefetch", "prefetch", "prefetch", &[ApplicationExecution]),
        Preset::query("CapabilityAccessManager", "cam", "cam", &[ApplicationExecution]),
        Preset::query("UserAssist", "userassist", "userassist", &[ApplicationExecution]),
        Preset::query("Installed Services", "services", "services", &[ApplicationExecution]),
        Preset::query("Recycle Bin", "recyclebin", "recyclebin", &[DeletedItemsFileExistence]),
        Preset::query("Thumbcache", "thumbcache", "thumbcache", &[DeletedItemsFileExistence]),
        Preset::query(
            "Internet Explorer file:/// History",
            "iexplore.history",
            "iexplore_history",
            &[DeletedItemsFileExistence],
        ),
        Preset::query("Search - WordWheelQuery", "mru.acmru", "mru_acmru", &[DeletedItemsFileExistence]),
        Preset::query("USB history (registry)", "usb", "usb", &[ExternalDeviceUsage]),
        Preset::query(
            "Removable device activity",
            "evtx",
            "evtx_removable_devices",
            &[ExternalDeviceUsage],
        )
        .with_transform(&[
            "-C",
            "--multi-timestamp",
            "-s",
            "(r.EventID in [4663,4656,6416] and r.Channel == \"Security\") \
             or (r.EventID in [20001,20003] and r.Channel == \"System\") \
             or (r.EventID in [1006])",
        ]),
        Preset::query("Browser (all below)", "browser", "browser", &[BrowserActivity]),
        Preset::query("Browser Cookies", "browser.cookies", "browser_cookies", &[BrowserActivity]),
        Preset::query("Browser Downloads", "browser.downloads", "browser_downloads", &[BrowserActivity]),
        Preset::query("Browser Extensions", "browser.extensions", "browser_extensions", &[BrowserActivity]),
        Preset::query("Browser History", "browser.history", "browser_history", &[BrowserActivity]),
        Preset::query("Browser Passwords", "browser.passwords", "browser_passwords", &[BrowserActivity]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_the_full_bundle() {
        assert_eq!(CATALOG.len(), 33);
    }

    #[test]
    fn every_entry_declares_an_extraction_function() {
        for preset in CATALOG.iter() {
            assert!(
                preset.plugin().is_some(),
                "preset '{}' has no function descriptor",
                preset.name
            );
            assert_eq!(preset.script, QUERY_SCRIPT);
        }
    }

    #[test]
    fn output_suffixes_are_unique() {
        let mut suffixes: Vec<&str> = CATALOG.iter().map(|p| p.output_suffix.as_str()).collect();
        suffixes.sort_unstable();
        suffixes.dedup();
        assert_eq!(suffixes.len(), CATALOG.len());
    }

    #[test]
    fn plugin_is_token_after_function_flag() {
        let preset = Preset::query("t", "mru.opensave", "t", &[]);
        assert_eq!(preset.plugin(), Some("mru.opensave"));
    }

    #[test]
    fn plugin_absent_without_function_flag() {
        let mut preset = Preset::query("t", "evtx", "t", &[]);
        preset.arguments = vec!["--walk".to_string()];
        assert_eq!(preset.plugin(), None);

        preset.arguments = vec![FUNCTION_FLAG.to_string()];
        assert_eq!(preset.plugin(), None);
    }

    #[test]
    fn removable_device_preset_overrides_the_transform() {
        let preset = CATALOG
            .iter()
            .find(|p| p.output_suffix == "evtx_removable_devices")
            .unwrap();
        match &preset.transform {
            Transform::Override(args) => {
                assert_eq!(args[0], "-C");
                assert!(args.iter().any(|a| a.contains("EventID")));
            }
            other => panic!("unexpected transform: {other:?}"),
        }
    }

    #[test]
    fn record_presets_are_export_capable() {
        let preset = Preset::query("t", "evtx", "t", &[]);
        assert!(preset.exports_records());

        let mut text_preset = Preset::query("t", "evtx", "t", &[]);
        text_preset.transform = Transform::Disabled;
        assert!(!text_preset.exports_records());
    }
}
