//! Tests for the resolve subcommand.

use super::parse;
use crate::cli::CliCommand;
use std::path::Path;

#[test]
fn cli_parse_resolve() {
    match parse(&["downgate", "resolve", "https://example.com/report.pdf"]) {
        CliCommand::Resolve {
            url,
            download_dir,
            content_disposition,
            suggested_filename,
            mime_type,
            overwrite,
        } => {
            assert_eq!(url, "https://example.com/report.pdf");
            assert!(download_dir.is_none());
            assert!(content_disposition.is_none());
            assert!(suggested_filename.is_none());
            assert!(mime_type.is_none());
            assert!(!overwrite);
        }
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_parse_resolve_download_dir() {
    match parse(&[
        "downgate",
        "resolve",
        "https://example.com/x",
        "--download-dir",
        "/tmp",
    ]) {
        CliCommand::Resolve { url, download_dir, .. } => {
            assert_eq!(url, "https://example.com/x");
            assert_eq!(download_dir.as_deref(), Some(Path::new("/tmp")));
        }
        _ => panic!("expected Resolve with --download-dir"),
    }
}

#[test]
fn cli_parse_resolve_name_sources() {
    match parse(&[
        "downgate",
        "resolve",
        "https://example.com/x",
        "--content-disposition",
        "attachment; filename=\"a.pdf\"",
        "--suggested-filename",
        "b.pdf",
        "--mime-type",
        "application/pdf",
    ]) {
        CliCommand::Resolve {
            content_disposition,
            suggested_filename,
            mime_type,
            ..
        } => {
            assert_eq!(
                content_disposition.as_deref(),
                Some("attachment; filename=\"a.pdf\"")
            );
            assert_eq!(suggested_filename.as_deref(), Some("b.pdf"));
            assert_eq!(mime_type.as_deref(), Some("application/pdf"));
        }
        _ => panic!("expected Resolve with name sources"),
    }
}

#[test]
fn cli_parse_resolve_overwrite() {
    match parse(&[
        "downgate",
        "resolve",
        "https://example.com/x",
        "--overwrite",
    ]) {
        CliCommand::Resolve { overwrite, .. } => assert!(overwrite),
        _ => panic!("expected Resolve with --overwrite"),
    }
}
