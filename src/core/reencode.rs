//! Shell script generation for re-encoding selected media to HEVC.

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};

/// Quote a path for a single-quoted bash string
fn shell_quote(path: &str) -> String {
    format!("'{}'", path.replace('\'', r"'\''"))
}

/// Build a bash script that re-encodes each file through VAAPI and only
/// replaces the original once ffprobe accepts the new file.
pub fn build_script(files: &[String]) -> String {
    let mut script = format!(
        r#"#!/bin/bash
# Re-encode script for Plex media
# Generated: {generated}
#
# Video is re-encoded to H.265/HEVC with VAAPI (qp=28); audio and subtitle
# streams are copied. Originals are replaced only after verification.

TOTAL_FILES={total}
CURRENT=0

GREEN='\033[0;32m'
YELLOW='\033[1;33m'
RED='\033[0;31m'
NC='\033[0m'

echo "Starting re-encode of $TOTAL_FILES files..."
"#,
        generated = Local::now().format("%Y-%m-%d %H:%M:%S"),
        total = files.len()
    );

    for (idx, file) in files.iter().enumerate() {
        script.push_str(&format!(
            r#"
# File {n}/{total}
CURRENT=$((CURRENT + 1))
INPUT_FILE={quoted}
TEMP_FILE="${{INPUT_FILE}}.tmp.mkv"
echo -e "${{YELLOW}}[$CURRENT/$TOTAL_FILES]${{NC}} Processing: $INPUT_FILE"

if [ ! -f "$INPUT_FILE" ]; then
    echo -e "${{RED}}ERROR:${{NC}} Input file not found, skipping"
elif ffmpeg -y -vaapi_device /dev/dri/renderD128 -i "$INPUT_FILE" \
    -vf 'format=nv12,hwupload' -c:v hevc_vaapi -qp 28 -c:a copy -c:s copy \
    "$TEMP_FILE"; then
    if ffprobe -v error "$TEMP_FILE" >/dev/null 2>&1; then
        ORIGINAL_SIZE=$(stat -c%s "$INPUT_FILE")
        NEW_SIZE=$(stat -c%s "$TEMP_FILE")
        echo -e "${{GREEN}}SUCCESS:${{NC}} $ORIGINAL_SIZE -> $NEW_SIZE bytes"
        mv "$TEMP_FILE" "$INPUT_FILE"
    else
        echo -e "${{RED}}ERROR:${{NC}} Verification failed, keeping original"
        rm -f "$TEMP_FILE"
    fi
else
    echo -e "${{RED}}ERROR:${{NC}} Encoding failed, keeping original"
    rm -f "$TEMP_FILE"
fi
"#,
            n = idx + 1,
            total = files.len(),
            quoted = shell_quote(file)
        ));
    }

    script.push_str("\necho -e \"${GREEN}Re-encoding complete!${NC}\"\n");
    script
}

/// Write `reencode_<label>_<timestamp>.sh` into `dir` and mark it executable
pub fn write_script(dir: &Path, label: &str, files: &[String]) -> Result<PathBuf> {
    if files.is_empty() {
        return Err(SyncError::other("No file paths found for the selected items"));
    }

    let name = format!(
        "reencode_{}_{}.sh",
        label,
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(name);
    fs::write(&path, build_script(files))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    }

    Ok(path)
}
