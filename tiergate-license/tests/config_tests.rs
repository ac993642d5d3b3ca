use pretty_assertions::assert_eq;
use tiergate_license::{
    CheckerConfig, DEFAULT_OPERATOR_NAMESPACE, EnforcementMode, FeaturePolicy, LicenseError,
    OperatorLicenseType,
};

// ── Defaults ─────────────────────────────────────────────────────

#[test]
fn default_config() {
    let config = CheckerConfig::default();
    assert_eq!(config.mode, EnforcementMode::Enforced);
    assert_eq!(config.operator_namespace, DEFAULT_OPERATOR_NAMESPACE);
    assert_eq!(config.license_scope, DEFAULT_OPERATOR_NAMESPACE);
    assert_eq!(config.trial_secret_name, "trial-status");
    assert_eq!(config.trial_pubkey_field, "pubkey");
    assert_eq!(config.policy, FeaturePolicy::default());
}

#[test]
fn for_namespace_sets_scope_and_namespace() {
    let config = CheckerConfig::for_namespace("ops");
    assert_eq!(config.operator_namespace, "ops");
    assert_eq!(config.license_scope, "ops");
    assert_eq!(config.mode, EnforcementMode::Enforced);
}

// ── Policy ───────────────────────────────────────────────────────

#[test]
fn default_policy_unlocks_enterprise_and_trial() {
    let policy = FeaturePolicy::default();
    assert!(policy.unlocks(OperatorLicenseType::Enterprise));
    assert!(policy.unlocks(OperatorLicenseType::Trial));
    assert!(!policy.unlocks(OperatorLicenseType::Platinum));
    assert!(!policy.unlocks(OperatorLicenseType::None));
}

#[test]
fn at_least_unlocks_tier_and_above() {
    let policy = FeaturePolicy::at_least(OperatorLicenseType::Platinum);
    assert!(!policy.unlocks(OperatorLicenseType::Gold));
    assert!(policy.unlocks(OperatorLicenseType::Platinum));
    assert!(policy.unlocks(OperatorLicenseType::Enterprise));
    assert!(policy.unlocks(OperatorLicenseType::Trial));
}

#[test]
fn none_tier_never_unlocks() {
    let policy = FeaturePolicy::at_least(OperatorLicenseType::None);
    assert!(!policy.unlocks(OperatorLicenseType::None));
    assert!(policy.unlocks(OperatorLicenseType::Basic));
}

// ── TOML ─────────────────────────────────────────────────────────

#[test]
fn parse_full_toml() {
    let config = CheckerConfig::from_toml_str(
        r#"
        mode = "permissive"
        operator_namespace = "ops"
        license_scope = "licenses"
        trial_secret_name = "trial"
        trial_pubkey_field = "key"

        [policy]
        unlocked_tiers = ["gold", "platinum"]
        "#,
    )
    .unwrap();

    assert_eq!(config.mode, EnforcementMode::Permissive);
    assert_eq!(config.operator_namespace, "ops");
    assert_eq!(config.license_scope, "licenses");
    assert_eq!(config.trial_secret_name, "trial");
    assert_eq!(config.trial_pubkey_field, "key");
    assert_eq!(
        config.policy,
        FeaturePolicy::from_tiers([OperatorLicenseType::Gold, OperatorLicenseType::Platinum])
    );
}

#[test]
fn empty_toml_is_default() {
    let config = CheckerConfig::from_toml_str("").unwrap();
    assert_eq!(config, CheckerConfig::default());
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let config = CheckerConfig::from_toml_str(r#"operator_namespace = "ops""#).unwrap();
    assert_eq!(config.operator_namespace, "ops");
    assert_eq!(config.license_scope, DEFAULT_OPERATOR_NAMESPACE);
    assert_eq!(config.mode, EnforcementMode::Enforced);
}

#[test]
fn unknown_mode_is_config_error() {
    let err = CheckerConfig::from_toml_str(r#"mode = "lenient""#).unwrap_err();
    assert!(matches!(err, LicenseError::Config(_)));
    assert!(err.to_string().contains("invalid license configuration"));
}

#[test]
fn unknown_tier_is_config_error() {
    let err = CheckerConfig::from_toml_str(
        r#"
        [policy]
        unlocked_tiers = ["diamond"]
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, LicenseError::Config(_)));
}

#[test]
fn config_roundtrips_through_toml() {
    let config = CheckerConfig::for_namespace("ops")
        .with_mode(EnforcementMode::Permissive)
        .with_policy(FeaturePolicy::at_least(OperatorLicenseType::Gold));
    let text = toml::to_string(&config).unwrap();
    assert_eq!(CheckerConfig::from_toml_str(&text).unwrap(), config);
}
