use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::json;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    PathInvalid,
    NotFound,
    NotADirectory,
    NotAFile,
    DecodeError,
    PermissionDenied,
    IoError,
}

/// Error object carried by every failed envelope.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub code: ErrorCode,
    pub message: String,
    /// The caller-supplied path, unresolved.
    pub path: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl ToolError {
    pub fn new(code: ErrorCode, message: impl Into<String>, path: &str) -> Self {
        Self { code, message: message.into(), path: Some(path.to_string()), details: None }
    }

    /// Permission faults keep their own code; everything else is `IO_ERROR`
    /// with the OS error number when there is one.
    pub fn from_io(err: &io::Error, message: &str, path: &str) -> Self {
        if err.kind() == io::ErrorKind::PermissionDenied {
            return Self::new(ErrorCode::PermissionDenied, "Permission denied.", path);
        }
        Self {
            details: err.raw_os_error().map(|errno| json!({ "errno": errno })),
            ..Self::new(ErrorCode::IoError, message, path)
        }
    }
}

/// Success with a payload or failure with a [`ToolError`], never both.
#[derive(Debug, Clone)]
pub enum Envelope<T> {
    Ok(T),
    Err(ToolError),
}

impl<T> Envelope<T> {
    pub fn error(&self) -> Option<&ToolError> {
        match self {
            Envelope::Ok(_) => None,
            Envelope::Err(e) => Some(e),
        }
    }
}

impl<T> From<Result<T, ToolError>> for Envelope<T> {
    fn from(r: Result<T, ToolError>) -> Self {
        match r {
            Ok(data) => Envelope::Ok(data),
            Err(e) => Envelope::Err(e),
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Envelope", 2)?;
        match self {
            Envelope::Ok(data) => {
                s.serialize_field("ok", &true)?;
                s.serialize_field("data", data)?;
            }
            Envelope::Err(error) => {
                s.serialize_field("ok", &false)?;
                s.serialize_field("error", error)?;
            }
        }
        s.end()
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    /// Files only.
    pub size_bytes: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListFilesData {
    pub folder: String,
    pub entries: Vec<DirEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadFileData {
    pub path: String,
    pub size_bytes: u64,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WriteFileData {
    pub path: String,
    pub bytes_written: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MkdirData {
    pub folder: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_has_no_error_key() {
        let env: Envelope<MkdirData> = Envelope::Ok(MkdirData { folder: "a".into() });
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v, json!({"ok": true, "data": {"folder": "a"}}));
    }

    #[test]
    fn err_envelope_omits_empty_details() {
        let env: Envelope<MkdirData> =
            Envelope::Err(ToolError::new(ErrorCode::NotFound, "File does not exist.", "x.txt"));
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["ok"], json!(false));
        assert!(v.get("data").is_none());
        assert_eq!(v["error"]["code"], "NOT_FOUND");
        assert_eq!(v["error"]["path"], "x.txt");
        assert!(v["error"].get("details").is_none());
    }

    #[test]
    fn io_mapping() {
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert_eq!(ToolError::from_io(&denied, "x", "p").code, ErrorCode::PermissionDenied);

        let os = io::Error::from_raw_os_error(21);
        let e = ToolError::from_io(&os, "Failed to write file.", "p");
        assert_eq!(e.code, ErrorCode::IoError);
        assert_eq!(e.message, "Failed to write file.");
        assert_eq!(e.details, Some(json!({"errno": 21})));

        let bare = ToolError::from_io(&io::Error::from(io::ErrorKind::Other), "x", "p");
        assert_eq!(bare.code, ErrorCode::IoError);
        assert!(bare.details.is_none());
    }

    #[test]
    fn codes_serialize_as_strings() {
        let codes = [
            (ErrorCode::PathInvalid, "PATH_INVALID"),
            (ErrorCode::NotFound, "NOT_FOUND"),
            (ErrorCode::NotADirectory, "NOT_A_DIRECTORY"),
            (ErrorCode::NotAFile, "NOT_A_FILE"),
            (ErrorCode::DecodeError, "DECODE_ERROR"),
            (ErrorCode::PermissionDenied, "PERMISSION_DENIED"),
            (ErrorCode::IoError, "IO_ERROR"),
        ];
        for (code, wire) in codes {
            assert_eq!(serde_json::to_value(code).unwrap(), json!(wire));
        }
    }
}
