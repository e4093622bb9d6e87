use crate::board_file::BoardFile;
use std::collections::HashSet;
use std::fmt;

/// A single validation error with context about where it occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Section of the board file (`database`, `service`, `export`, ...).
    pub section: Option<String>,
    /// Position within an array section.
    pub index: Option<usize>,
    pub message: String,
}

impl ValidationError {
    fn global(message: impl Into<String>) -> Self {
        Self {
            section: None,
            index: None,
            message: message.into(),
        }
    }

    fn in_section(section: &str, message: impl Into<String>) -> Self {
        Self {
            section: Some(section.into()),
            index: None,
            message: message.into(),
        }
    }

    fn in_service(index: usize, message: impl Into<String>) -> Self {
        Self {
            section: Some("service".into()),
            index: Some(index),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.section, self.index) {
            (Some(section), Some(i)) => write!(f, "[{section}#{i}] {}", self.message),
            (Some(section), None) => write!(f, "[{section}] {}", self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

/// Validate a parsed board file. Returns `Ok(())` if valid, or every error found.
pub fn validate_board_file(file: &BoardFile) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if file.page.title.trim().is_empty() {
        errors.push(ValidationError::in_section("page", "title must not be empty"));
    }

    for (section, entity) in [("database", &file.database), ("snapshot", &file.snapshot)] {
        if let Some(name) = &entity.name {
            if name.trim().is_empty() {
                errors.push(ValidationError::in_section(
                    section,
                    "name must not be empty when set",
                ));
            }
        }
    }

    if file.services.is_empty() {
        errors.push(ValidationError::global(
            "board must define at least one service",
        ));
    }

    let mut seen = HashSet::new();
    for (i, service) in file.services.iter().enumerate() {
        match service.name.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push(ValidationError::in_service(i, "service must have a name"));
            }
            Some(name) => {
                if !seen.insert(name) {
                    errors.push(ValidationError::in_service(
                        i,
                        format!("duplicate service name `{name}`"),
                    ));
                }
            }
        }
    }

    if file.export.out_dir.trim().is_empty() {
        errors.push(ValidationError::in_section(
            "export",
            "out_dir must not be empty",
        ));
    }

    if let Err(message) = check_base_path(&file.export.base_path) {
        errors.push(ValidationError::in_section("export", message));
    }

    if file.server.port == 0 {
        errors.push(ValidationError::in_section("server", "port must be > 0"));
    }

    if file.server.host.trim().is_empty() {
        errors.push(ValidationError::in_section(
            "server",
            "host must not be empty",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check the URL sub-path a static page is served from.
///
/// The path is written into the page as-is, so anything outside the
/// characters a URL path may carry unescaped is refused.
///
/// ```
/// use dm_upgrade_config::check_base_path;
///
/// assert!(check_base_path("").is_ok());
/// assert!(check_base_path("/tools/dm").is_ok());
/// assert!(check_base_path("/dm/").is_err());
/// ```
pub fn check_base_path(base: &str) -> Result<(), String> {
    if !base.is_empty() && (!base.starts_with('/') || base.ends_with('/')) {
        return Err(format!(
            "base_path `{base}` must start with `/` and not end with `/` (or be empty)"
        ));
    }
    if !base.chars().all(is_path_char) {
        return Err(format!(
            "base_path `{base}` may only contain letters, digits and `-._~/`"
        ));
    }
    Ok(())
}

/// Characters a base path may use unescaped in a URL.
fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~' | '/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_file::EntityConfig;

    fn service(name: Option<&str>) -> EntityConfig {
        EntityConfig {
            name: name.map(Into::into),
            version: 1,
        }
    }

    #[test]
    fn default_file_is_valid() {
        assert!(validate_board_file(&BoardFile::default()).is_ok());
    }

    #[test]
    fn no_services() {
        let mut file = BoardFile::default();
        file.services.clear();
        let errs = validate_board_file(&file).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("at least one service"));
    }

    #[test]
    fn unnamed_and_duplicate_services() {
        let mut file = BoardFile::default();
        file.services = vec![
            service(Some("Bidder")),
            service(None),
            service(Some("Bidder")),
            service(Some("  ")),
        ];
        let errs = validate_board_file(&file).unwrap_err();
        assert_eq!(errs.len(), 3);
        assert_eq!(errs[0].index, Some(1));
        assert!(errs[1].message.contains("duplicate service name `Bidder`"));
        assert_eq!(errs[1].index, Some(2));
        assert_eq!(errs[2].index, Some(3));
    }

    #[test]
    fn blank_database_name() {
        let mut file = BoardFile::default();
        file.database.name = Some(String::new());
        let errs = validate_board_file(&file).unwrap_err();
        assert_eq!(errs[0].section.as_deref(), Some("database"));
    }

    #[test]
    fn base_path_shape() {
        for ok in ["", "/dm", "/tools/dm"] {
            let mut file = BoardFile::default();
            file.export.base_path = ok.into();
            assert!(validate_board_file(&file).is_ok(), "{ok:?} should be valid");
        }
        for bad in ["dm", "/dm/", "/", "/d m", "/dm\"x"] {
            let mut file = BoardFile::default();
            file.export.base_path = bad.into();
            let errs = validate_board_file(&file).unwrap_err();
            assert_eq!(errs.len(), 1, "{bad:?} should give one error");
            assert_eq!(errs[0].section.as_deref(), Some("export"));
        }
    }

    #[test]
    fn base_path_refuses_markup() {
        let err = check_base_path("/dm\"><script>").unwrap_err();
        assert!(err.contains("may only contain"));
    }

    #[test]
    fn server_and_export_checks() {
        let mut file = BoardFile::default();
        file.server.port = 0;
        file.export.out_dir = " ".into();
        let errs = validate_board_file(&file).unwrap_err();
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn display_with_context() {
        let e = ValidationError::in_service(2, "service must have a name");
        assert_eq!(e.to_string(), "[service#2] service must have a name");
        let e = ValidationError::global("board must define at least one service");
        assert_eq!(e.to_string(), "board must define at least one service");
    }
}
