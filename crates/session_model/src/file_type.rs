//
// file_type.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use std::path::Path;
use std::sync::LazyLock;

use anyhow::Context;
use rust_embed::RustEmbed;
use serde::Deserialize;
use serde::Serialize;

#[derive(RustEmbed)]
#[folder = "resources/"]
struct Asset;

/// A kind of file the server knows how to store, identified by extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileType {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Extension")]
    pub file_extension: String,
    #[serde(rename = "UTTypeIdentifier")]
    pub uti: String,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(rename = "MimeType", default, skip_serializing_if = "Option::is_none")]
    pub raw_mime_type: Option<String>,
    #[serde(rename = "IconName", default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
    #[serde(rename = "Importable", default, skip_serializing_if = "is_false")]
    pub is_importable: bool,
    #[serde(rename = "Creatable", default, skip_serializing_if = "is_false")]
    pub is_creatable: bool,
    #[serde(rename = "Executable", default, skip_serializing_if = "is_false")]
    pub is_executable: bool,
    #[serde(rename = "IsSrc", default, skip_serializing_if = "is_false")]
    pub is_source: bool,
    /// Viewable as a rendered document and editable as source
    #[serde(rename = "DualUse", default, skip_serializing_if = "is_false")]
    pub is_dual_use: bool,
    #[serde(rename = "IsTextFile", default, skip_serializing_if = "is_false")]
    pub is_text: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl FileType {
    pub fn is_image(&self) -> bool {
        self.raw_mime_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("image/"))
    }

    pub fn is_editable(&self) -> bool {
        self.is_source || self.is_dual_use
    }

    pub fn mime_type(&self) -> &str {
        match &self.raw_mime_type {
            Some(mime) => mime.as_str(),
            None if self.is_text => "text/plain",
            None => "application/octet-stream",
        }
    }

    /// All known file types, in table order.
    pub fn all() -> &'static [FileType] {
        &table().all
    }

    pub fn image_types() -> &'static [FileType] {
        &table().images
    }

    pub fn text_types() -> &'static [FileType] {
        &table().texts
    }

    pub fn importable_types() -> &'static [FileType] {
        &table().importables
    }

    pub fn creatable_types() -> &'static [FileType] {
        &table().creatables
    }

    /// Exact matches win over case-insensitive ones, so `R` and `r` can
    /// be told apart should both ever be listed.
    pub fn for_extension(extension: &str) -> Option<&'static FileType> {
        let all = Self::all();
        all.iter()
            .find(|file_type| file_type.file_extension == extension)
            .or_else(|| {
                all.iter()
                    .find(|file_type| file_type.file_extension.eq_ignore_ascii_case(extension))
            })
    }

    pub fn for_file_name(name: &str) -> Option<&'static FileType> {
        let extension = Path::new(name).extension()?.to_str()?;
        Self::for_extension(extension)
    }
}

struct FileTypeTable {
    all: Vec<FileType>,
    images: Vec<FileType>,
    texts: Vec<FileType>,
    importables: Vec<FileType>,
    creatables: Vec<FileType>,
}

impl FileTypeTable {
    fn new(all: Vec<FileType>) -> Self {
        let select = |keep: fn(&FileType) -> bool| -> Vec<FileType> {
            all.iter().filter(|file_type| keep(file_type)).cloned().collect()
        };

        Self {
            images: select(FileType::is_image),
            texts: select(|file_type| file_type.is_text),
            importables: select(|file_type| file_type.is_importable),
            creatables: select(|file_type| file_type.is_creatable),
            all,
        }
    }
}

fn table() -> &'static FileTypeTable {
    static FILE_TYPES: LazyLock<FileTypeTable> = LazyLock::new(|| match load_file_types() {
        Ok(file_types) => FileTypeTable::new(file_types),
        Err(err) => {
            // Only reachable with a broken build
            log::error!("{err:?}");
            panic!("Can't load bundled file types: {err:?}");
        },
    });
    &FILE_TYPES
}

fn load_file_types() -> anyhow::Result<Vec<FileType>> {
    let file = Asset::get("file_types.json").context("Missing bundled `file_types.json`")?;
    let file_types: Vec<FileType> =
        serde_json::from_slice(&file.data).context("Can't parse bundled `file_types.json`")?;

    log::info!("Loaded {} file types", file_types.len());
    Ok(file_types)
}
