//! Record-export destination resolution.
//!
//! Resolution happens once at run start. The ambient default destination
//! comes from `RUST_SWEEPER_EXPORT_URI` and is read at that point only;
//! afterwards the resolved target is read-only configuration.

use std::env;

use log::debug;

use crate::constants::{EXPORT_SCHEMES, EXPORT_URI_ENV, RDUMP_WRITE_FLAG};
use crate::errors::{Result, SweepError};

/// Resolved export destination for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    uri: String,
    case_id: Option<String>,
}

impl ExportTarget {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Transform-stage argument vector routing records for `plugin` over
    /// `input_name` to this destination. The originating function, the
    /// input's display name and the optional case identifier ride as
    /// destination tags; their interpretation belongs to the sink.
    pub fn rdump_args(&self, plugin: &str, input_name: &str) -> Vec<String> {
        let separator = if self.uri.contains('?') { '&' } else { '?' };
        let mut destination = format!(
            "{}{}plugin={}&input={}",
            self.uri, separator, plugin, input_name
        );
        if let Some(case) = &self.case_id {
            destination.push_str("&case=");
            destination.push_str(case);
        }
        vec![RDUMP_WRITE_FLAG.to_string(), destination]
    }
}

/// Decide whether this run exports records, and to where.
///
/// The explicit enable flag governs when present; otherwise export turns
/// on exactly when an explicit destination URI was supplied (the ambient
/// default alone never enables it). Export requested without a resolvable
/// destination, or with an unsupported destination scheme, is a
/// configuration failure.
pub fn resolve_export(
    enabled: Option<bool>,
    explicit_uri: Option<&str>,
    case_id: Option<&str>,
) -> Result<Option<ExportTarget>> {
    let ambient = env::var(EXPORT_URI_ENV).ok();
    resolve_export_with_ambient(enabled, explicit_uri, ambient.as_deref(), case_id)
}

pub(crate) fn resolve_export_with_ambient(
    enabled: Option<bool>,
    explicit_uri: Option<&str>,
    ambient_uri: Option<&str>,
    case_id: Option<&str>,
) -> Result<Option<ExportTarget>> {
    let explicit = explicit_uri.map(str::trim).filter(|uri| !uri.is_empty());

    let requested = match enabled {
        Some(flag) => flag,
        None => explicit.is_some(),
    };
    if !requested {
        return Ok(None);
    }

    let ambient = ambient_uri.map(str::trim).filter(|uri| !uri.is_empty());
    let uri = explicit.or(ambient).map(str::to_string).ok_or_else(|| {
        SweepError::Configuration(
            "record export requested but no destination URI is configured".to_string(),
        )
    })?;

    let scheme = match uri.split_once("://") {
        Some((scheme, rest)) if !scheme.is_empty() && !rest.is_empty() => {
            scheme.to_ascii_lowercase()
        }
        _ => {
            return Err(SweepError::Configuration(format!(
                "malformed export destination URI '{uri}'"
            )))
        }
    };
    if !EXPORT_SCHEMES.contains(&scheme.as_str()) {
        return Err(SweepError::Configuration(format!(
            "unsupported export destination scheme '{scheme}'"
        )));
    }

    debug!("record export resolved to {}", uri);
    Ok(Some(ExportTarget {
        uri,
        case_id: case_id.map(str::to_string).filter(|case| !case.is_empty()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const URI: &str = "elastic://search.internal:9200/sweep";

    #[test]
    fn explicit_uri_enables_export_by_default() {
        let target = resolve_export_with_ambient(None, Some(URI), None, None)
            .unwrap()
            .unwrap();
        assert_eq!(target.uri(), URI);
    }

    #[test]
    fn ambient_uri_alone_does_not_enable_export() {
        let resolved = resolve_export_with_ambient(None, None, Some(URI), None).unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn explicit_disable_wins_over_uris() {
        let resolved = resolve_export_with_ambient(Some(false), Some(URI), Some(URI), None).unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn explicit_enable_falls_back_to_the_ambient_uri() {
        let target = resolve_export_with_ambient(Some(true), None, Some(URI), None)
            .unwrap()
            .unwrap();
        assert_eq!(target.uri(), URI);
    }

    #[test]
    fn requested_without_destination_is_a_configuration_error() {
        let error = resolve_export_with_ambient(Some(true), None, None, None).unwrap_err();
        match error {
            SweepError::Configuration(message) => {
                assert!(message.contains("no destination URI"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unsupported_scheme_is_rejected() {
        let error =
            resolve_export_with_ambient(None, Some("ftp://sink/records"), None, None).unwrap_err();
        match error {
            SweepError::Configuration(message) => {
                assert!(message.contains("unsupported export destination scheme 'ftp'"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_uri_is_rejected() {
        let error = resolve_export_with_ambient(None, Some("not-a-uri"), None, None).unwrap_err();
        assert!(matches!(error, SweepError::Configuration(_)));
    }

    #[test]
    fn write_args_tag_plugin_input_and_case() {
        let target = resolve_export_with_ambient(None, Some(URI), None, Some("case-7"))
            .unwrap()
            .unwrap();
        let args = target.rdump_args("evtx", "disk.E01");
        assert_eq!(args[0], "-w");
        assert_eq!(
            args[1],
            format!("{URI}?plugin=evtx&input=disk.E01&case=case-7")
        );
    }

    #[test]
    fn write_args_extend_an_existing_query_string() {
        let uri = "elastic://search.internal:9200/sweep?pipeline=raw";
        let target = resolve_export_with_ambient(None, Some(uri), None, None)
            .unwrap()
            .unwrap();
        let args = target.rdump_args("usb", "disk.E01");
        assert_eq!(args[1], format!("{uri}&plugin=usb&input=disk.E01"));
    }
}
