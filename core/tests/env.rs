//! Credentials from the environment. Kept in its own test binary, and in a
//! single test, because it mutates process-wide environment variables.

use std::env;

use callfire_core::auth::{PASSWORD_VAR, USERNAME_VAR};
use callfire_core::{ConfigError, Credentials, Error, Transport, CALLFIRE_V2_BASE_URL};

#[test]
fn credentials_are_read_from_environment() {
    // Both set.
    env::set_var(USERNAME_VAR, "username");
    env::set_var(PASSWORD_VAR, "password");

    let credentials = Credentials::from_env().unwrap();
    assert_eq!(credentials, Credentials::new("username", "password"));
    assert_eq!(credentials.basic_auth_header(), "Basic dXNlcm5hbWU6cGFzc3dvcmQ=");

    let transport = Transport::from_env().unwrap();
    assert_eq!(transport.credentials().username(), "username");
    assert_eq!(transport.base_url(), CALLFIRE_V2_BASE_URL);

    // Password missing.
    env::remove_var(PASSWORD_VAR);
    assert!(matches!(
        Credentials::from_env(),
        Err(ConfigError::MissingVar(name)) if name == PASSWORD_VAR
    ));
    let err = Transport::from_env().unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::MissingVar(name)) if name == PASSWORD_VAR));
    assert_eq!(err.to_string(), "environment variable CALLFIRE_PASSWORD is not set");

    // Username missing is reported first.
    env::remove_var(USERNAME_VAR);
    assert!(matches!(
        Credentials::from_env(),
        Err(ConfigError::MissingVar(name)) if name == USERNAME_VAR
    ));

    // Not valid unicode.
    #[cfg(unix)]
    {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        env::set_var(USERNAME_VAR, OsString::from_vec(vec![0x66, 0x6f, 0xff]));
        env::set_var(PASSWORD_VAR, "password");
        assert!(matches!(
            Credentials::from_env(),
            Err(ConfigError::InvalidVar(name)) if name == USERNAME_VAR
        ));
    }

    env::remove_var(USERNAME_VAR);
    env::remove_var(PASSWORD_VAR);
}
