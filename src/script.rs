use crate::source::ScriptSource;
use crate::{Result, SqlMigrateError};

/// A migration script discovered for the current run.
///
/// File names follow `V<version>__<description>.sql`. The version defines
/// execution order; the description is a free-form slug kept for the ledger;
/// the file name itself is kept for log context.
#[derive(Debug, Clone)]
pub struct MigrationScript {
    pub version: u32,
    pub description: String,
    pub file_name: String,
    pub content: String,
}

/// Parse `(version, description)` out of a script file name.
///
/// The version is the integer between the leading `V` and the first `__`;
/// the description is everything from there to the file extension. Malformed
/// names are a configuration error and fail the run rather than being
/// skipped, so a typo cannot silently drop a migration.
pub fn parse_script_name(name: &str) -> Result<(u32, String)> {
    let invalid = || SqlMigrateError::InvalidScriptName {
        name: name.to_string(),
    };

    let rest = name.strip_prefix('V').ok_or_else(invalid)?;
    let (version, tail) = rest.split_once("__").ok_or_else(invalid)?;
    let version: u32 = version.parse().map_err(|_| invalid())?;
    let (description, _ext) = tail.rsplit_once('.').ok_or_else(invalid)?;
    if description.is_empty() {
        return Err(invalid());
    }
    Ok((version, description.to_string()))
}

/// Enumerate every script under `source`, sorted by ascending version.
///
/// Duplicate versions among the discovered scripts fail the run; there is no
/// sound way to pick one of two scripts claiming the same slot.
pub fn discover(source: &dyn ScriptSource) -> Result<Vec<MigrationScript>> {
    let mut scripts = Vec::new();
    for (file_name, content) in source.scripts()? {
        let (version, description) = parse_script_name(&file_name)?;
        scripts.push(MigrationScript {
            version,
            description,
            file_name,
            content,
        });
    }

    scripts.sort_by_key(|s| s.version);
    for pair in scripts.windows(2) {
        if pair[0].version == pair[1].version {
            return Err(SqlMigrateError::DuplicateVersion {
                version: pair[0].version,
                first: pair[0].file_name.clone(),
                second: pair[1].file_name.clone(),
            });
        }
    }

    Ok(scripts)
}
