use super::*;

#[test]
fn test_invalid_argument_error_creation() {
    let error = CliError::invalid_argument("--config", "File does not exist");

    match error {
        CliError::InvalidArgument {
            ref argument,
            ref message,
        } => {
            assert_eq!(argument, "--config");
            assert_eq!(message, "File does not exist");
        }
        _ => panic!("Expected InvalidArgument error"),
    }

    assert_eq!(
        error.to_string(),
        "invalid argument: --config - File does not exist"
    );
}

#[test]
fn test_missing_dependency_error_creation() {
    let error = CliError::missing_dependency("token", "no GitHub credentials supplied");

    match error {
        CliError::MissingDependency {
            ref dependency,
            ref message,
        } => {
            assert_eq!(dependency, "token");
            assert_eq!(message, "no GitHub credentials supplied");
        }
        _ => panic!("Expected MissingDependency error"),
    }

    assert_eq!(
        error.to_string(),
        "missing dependency: token - no GitHub credentials supplied"
    );
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let cli_error = CliError::from(io_error);

    match cli_error {
        CliError::Io { .. } => {}
        _ => panic!("Expected Io error from std::io::Error"),
    }
}

#[test]
fn test_config_error_conversion() {
    let config_error = nextver_config::ConfigProviderError::ConfigFileNotFound {
        path: std::path::PathBuf::from("missing.yml"),
    };
    let cli_error = CliError::from(config_error);

    match cli_error {
        CliError::Config { .. } => {}
        _ => panic!("Expected Config error from ConfigProviderError"),
    }
}
