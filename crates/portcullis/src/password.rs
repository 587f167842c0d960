// SPDX-FileCopyrightText: 2026 Portcullis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hash-password` and `verify-password` command implementations.

use std::io::{BufRead, IsTerminal};

use portcullis_config::PortcullisConfig;
use portcullis_core::PortcullisError;
use portcullis_security::{hash_password, verify_password, PasswordParams};
use secrecy::{ExposeSecret, SecretString};

/// Read a password from an interactive prompt, or the first line of piped stdin.
pub fn read_password() -> Result<SecretString, PortcullisError> {
    let stdin = std::io::stdin();
    let password = if stdin.is_terminal() {
        eprint!("Password: ");
        rpassword::read_password()
            .map_err(|e| PortcullisError::Password(format!("failed to read password: {e}")))?
    } else {
        let mut line = String::new();
        stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| PortcullisError::Password(format!("failed to read password: {e}")))?;
        strip_line_ending(line)
    };
    Ok(SecretString::from(password))
}

fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

pub fn hash(config: &PortcullisConfig, password: &SecretString) -> Result<String, PortcullisError> {
    let params = PasswordParams::from(&config.password);
    hash_password(password.expose_secret(), &params)
}

pub fn verify(password: &SecretString, phc: &str) -> Result<bool, PortcullisError> {
    verify_password(password.expose_secret(), phc.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use portcullis_config::load_config_from_str;

    #[test]
    fn strips_one_line_ending_only() {
        assert_eq!(strip_line_ending("pw\n".to_string()), "pw");
        assert_eq!(strip_line_ending("pw\r\n".to_string()), "pw");
        assert_eq!(strip_line_ending("pw ".to_string()), "pw ");
        assert_eq!(strip_line_ending("pw\n\n".to_string()), "pw\n");
    }

    #[test]
    fn hash_then_verify_with_configured_cost() {
        let config = load_config_from_str("[password]\nmemory_cost = 8192\niterations = 1\n").unwrap();
        let secret = SecretString::from("hunter2".to_string());
        let phc = hash(&config, &secret).unwrap();
        assert!(phc.contains("m=8192,t=1,p=1"), "got: {phc}");
        assert!(verify(&secret, &format!("{phc}\n")).unwrap());
        assert!(!verify(&SecretString::from("hunter3".to_string()), &phc).unwrap());
    }

    #[test]
    fn empty_password_is_rejected() {
        let config = PortcullisConfig::default();
        assert!(hash(&config, &SecretString::from(String::new())).is_err());
    }
}
