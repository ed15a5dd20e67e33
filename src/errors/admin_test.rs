#[cfg(test)]
mod tests {
    use crate::errors::{AdminVaultError, BootstrapError, LoadError};
    use crate::types::ProviderKind;

    #[test]
    fn test_all_error_variants_have_codes() {
        assert_eq!(AdminVaultError::Uninitialized.code(), "directory_uninitialized");
        assert_eq!(AdminVaultError::AlreadyInitialized.code(), "already_initialized");
        assert_eq!(AdminVaultError::name_taken("bob").code(), "name_taken");
        assert_eq!(
            AdminVaultError::provider_id_taken(ProviderKind::Discord, "123").code(),
            "provider_id_taken"
        );
        assert_eq!(AdminVaultError::not_found("bob").code(), "admin_not_found");
        assert_eq!(
            AdminVaultError::MasterProtected("root".to_string()).code(),
            "master_protected"
        );
        assert_eq!(AdminVaultError::invalid_name("too short").code(), "invalid_name");
        assert_eq!(
            AdminVaultError::invalid_provider_link(ProviderKind::Discord, "id too short").code(),
            "invalid_provider_link"
        );
        assert_eq!(AdminVaultError::InvalidPasswordHash.code(), "invalid_password_hash");
    }

    #[test]
    fn test_error_messages_are_formatted_correctly() {
        let error = AdminVaultError::name_taken("Bob");
        assert_eq!(error.to_string(), "Username already taken: Bob");

        let error = AdminVaultError::provider_id_taken(ProviderKind::Citizenfx, "271816");
        assert_eq!(error.to_string(), "citizenfx ID already taken: 271816");

        let error = AdminVaultError::not_found("ghost");
        assert_eq!(error.to_string(), "Admin not found: ghost");
    }

    #[test]
    fn test_bootstrap_error_wraps_load_error() {
        let error: BootstrapError = LoadError::MasterCountInvalid { count: 2 }.into();

        assert!(matches!(error, BootstrapError::Load(LoadError::MasterCountInvalid { count: 2 })));
        assert!(error.to_string().contains("exactly one master"));
    }
}
