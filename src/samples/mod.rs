//! Embedded sample configuration files.
//!
//! The files under `files/` are compiled into the binary and served by
//! `GET /getconfig/{name}`. The table is immutable.

/// One embedded sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleFile {
    pub name: &'static str,
    pub contents: &'static str,
}

/// Sorted by name.
static SAMPLES: &[SampleFile] = &[
    SampleFile {
        name: "argon-proxy.service",
        contents: include_str!("files/argon-proxy.service"),
    },
    SampleFile {
        name: "argon-proxy.toml",
        contents: include_str!("files/argon-proxy.toml"),
    },
    SampleFile {
        name: "docker-compose.yml",
        contents: include_str!("files/docker-compose.yml"),
    },
    SampleFile {
        name: "nginx.conf",
        contents: include_str!("files/nginx.conf"),
    },
];

pub fn names() -> impl Iterator<Item = &'static str> {
    SAMPLES.iter().map(|sample| sample.name)
}

pub fn find(name: &str) -> Option<&'static SampleFile> {
    SAMPLES.iter().find(|sample| sample.name == name)
}

/// Best-effort content type from the file extension.
pub fn content_type(name: &str) -> &'static str {
    let extension = name.rsplit_once('.').map(|(_, ext)| ext);
    match extension {
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("yaml" | "yml") => "application/yaml",
        _ => "text/plain",
    }
}
