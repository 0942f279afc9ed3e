use include_dir::{include_dir, Dir};

use crate::error::{ReciteError, Result};

static ASSET_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets");

/// Contents of a bundled asset, e.g. `passages/english.json`.
pub fn read_asset(path: &str) -> Result<&'static str> {
    let file = ASSET_DIR
        .get_file(path)
        .ok_or_else(|| ReciteError::Asset(path.to_string()))?;

    file.contents_utf8()
        .ok_or_else(|| ReciteError::Encoding(path.to_string()))
}

/// Locale asset lookup, mapping a missing file to `UnknownLocale`.
pub fn read_locale_asset(kind: &str, locale: &str) -> Result<&'static str> {
    read_asset(&format!("{kind}/{locale}.json")).map_err(|err| match err {
        ReciteError::Asset(_) => ReciteError::UnknownLocale(locale.to_string()),
        other => other,
    })
}
