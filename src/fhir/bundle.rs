//! FHIR bundle authoring from CQL sources.
//!
//! A CQL file declares its identity in a header line of the form
//! `library ExampleLib version '1.0.0'`. That identity, the base64-encoded
//! source, and a caller-supplied description are wrapped into a FHIR
//! `Library` resource inside a transaction `Bundle` ready to POST.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};

/// Default FHIR server base URL for authored bundles.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/fhir/";

/// Library identity extracted from a CQL header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryInfo {
    /// Library name from the declaration
    pub name: String,
    /// Version string from the declaration
    pub version: String,
}

/// Extract the library declaration from CQL content.
///
/// Scans for the first line of the form `library <Name> version '<ver>'`
/// with the declaration starting at column zero. Returns `None` when no
/// such line exists.
pub fn extract_library_info(content: &str) -> Option<LibraryInfo> {
    for line in content.lines() {
        if !line.starts_with("library") {
            continue;
        }

        // Everything before the first quote must be exactly
        // `library <Name> version`; the version runs to the closing quote
        // and may contain whitespace.
        let Some((head, rest)) = line.split_once('\'') else {
            continue;
        };
        let tokens: Vec<&str> = head.split_whitespace().collect();
        if tokens.len() != 3 || tokens[0] != "library" || tokens[2] != "version" {
            continue;
        }
        let name = tokens[1];
        if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            continue;
        }
        match rest.split_once('\'') {
            Some((version, _)) if !version.is_empty() => {
                return Some(LibraryInfo {
                    name: name.to_string(),
                    version: version.to_string(),
                });
            }
            _ => continue,
        }
    }

    None
}

/// Base64-encode raw file content for embedding in a `Library` resource.
pub fn encode_content(content: &[u8]) -> String {
    BASE64.encode(content)
}

/// Ensure a base URL ends with a trailing slash.
pub fn normalize_base_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

/// Build a FHIR transaction bundle wrapping one CQL `Library` resource.
pub fn build_fhir_bundle(
    library: &LibraryInfo,
    description: &str,
    base64_content: &str,
    base_url: &str,
) -> Value {
    let base_url = normalize_base_url(base_url);
    let library_resource = json!({
        "resourceType": "Library",
        "id": library.name,
        "url": format!("{base_url}Library/{}", library.name),
        "version": library.version,
        "name": library.name,
        "title": library.name,
        "status": "active",
        "description": description,
        "content": [
            {
                "contentType": "text/cql",
                "data": base64_content,
            }
        ],
    });

    json!({
        "resourceType": "Bundle",
        "type": "transaction",
        "entry": [
            {
                "fullUrl": format!("urn:uuid:{}", library.name),
                "resource": library_resource,
                "request": {
                    "method": "POST",
                    "url": format!("Library/{}", library.name),
                },
            }
        ],
    })
}
