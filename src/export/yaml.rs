//! YAML Export functionality
//!
//! Exports the member audit log to YAML format for human reading.

use std::io::Write;

use crate::error::{MemberfileError, MemberfileResult};
use crate::export::json::AuditExport;
use crate::models::MemberId;
use crate::storage::Storage;

/// Export the audit log to YAML format
pub fn export_logs_yaml<W: Write>(
    storage: &Storage,
    writer: &mut W,
    member: Option<MemberId>,
) -> MemberfileResult<()> {
    let export = AuditExport::from_storage(storage, member)?;

    writeln!(writer, "# memberfile audit log export")
        .map_err(|e| MemberfileError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| MemberfileError::Export(e.to_string()))?;
    writeln!(writer, "# App Version: {}", export.app_version)
        .map_err(|e| MemberfileError::Export(e.to_string()))?;
    writeln!(writer, "#").map_err(|e| MemberfileError::Export(e.to_string()))?;
    writeln!(writer, "# Contains personal data of members. Handle with care.")
        .map_err(|e| MemberfileError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| MemberfileError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| MemberfileError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarkedRecordPolicy;
    use crate::services::MemberAdminService;
    use crate::test_support::{add_admin, create_test_storage, sample_form};

    #[test]
    fn test_yaml_export() {
        let (_temp, storage) = create_test_storage();
        let admin = add_admin(&storage, "admin");
        MemberAdminService::with_policy(&storage, MarkedRecordPolicy::Accept)
            .create(admin.id, &sample_form())
            .unwrap();

        let mut output = Vec::new();
        export_logs_yaml(&storage, &mut output, None).unwrap();

        let yaml = String::from_utf8(output).unwrap();
        assert!(yaml.starts_with("# memberfile audit log export"));
        assert!(yaml.contains("log_type: INSERT"));
        assert!(yaml.contains("Eindhoven"));

        let parsed: AuditExport = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.logs.len(), 1);
    }
}
