//! Simulated sign-in. No credentials leave the machine and any password is accepted.

use std::time::{Duration, Instant};

use crate::clock::Delayed;
use crate::error::AuthError;
use crate::models::User;

/// Fixed round-trip time of the pretend auth service.
pub const AUTH_LATENCY: Duration = Duration::from_millis(1000);

/// Display name handed out on login, since there is no account database.
const DEFAULT_NAME: &str = "John Doe";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    Login {
        email: String,
        password: String,
    },
    Signup {
        name: String,
        email: String,
        password: String,
    },
}

impl AuthRequest {
    pub fn validate(&self) -> Result<(), AuthError> {
        let (email, password) = match self {
            Self::Login { email, password } => (email, password),
            Self::Signup {
                name,
                email,
                password,
            } => {
                if name.trim().is_empty() {
                    return Err(AuthError::MissingName);
                }
                (email, password)
            }
        };

        if email.trim().is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidEmail);
        }
        if password.is_empty() {
            return Err(AuthError::MissingPassword);
        }
        Ok(())
    }
}

/// Validate `request` and start the simulated round trip.
pub fn submit(request: AuthRequest, now: Instant) -> Result<Delayed<User>, AuthError> {
    request.validate()?;

    let user = match request {
        AuthRequest::Login { email, .. } => User {
            name: DEFAULT_NAME.to_string(),
            email: email.trim().to_string(),
        },
        AuthRequest::Signup { name, email, .. } => User {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
        },
    };

    Ok(Delayed::new(user, now, AUTH_LATENCY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};

    fn login(email: &str, password: &str) -> AuthRequest {
        AuthRequest::Login {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn login_resolves_after_latency() {
        let clock = ManualClock::new();
        let pending = submit(login("ana@example.com", "secret"), clock.now()).unwrap();

        clock.advance_ms(500);
        assert!(!pending.is_ready(clock.now()));

        clock.advance(AUTH_LATENCY);
        let user = pending.take_if_ready(clock.now()).unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.name, "John Doe");
    }

    #[test]
    fn signup_keeps_typed_name() {
        let clock = ManualClock::new();
        let request = AuthRequest::Signup {
            name: " Ana ".to_string(),
            email: "ana@example.com".to_string(),
            password: "pw".to_string(),
        };
        let pending = submit(request, clock.now()).unwrap();
        clock.advance(AUTH_LATENCY);
        assert_eq!(pending.take_if_ready(clock.now()).unwrap().name, "Ana");
    }

    #[test]
    fn invalid_forms_are_rejected() {
        assert_eq!(login("", "pw").validate(), Err(AuthError::InvalidEmail));
        assert_eq!(login("not-an-email", "pw").validate(), Err(AuthError::InvalidEmail));
        assert_eq!(login("a@b.c", "").validate(), Err(AuthError::MissingPassword));

        let nameless = AuthRequest::Signup {
            name: "  ".to_string(),
            email: "a@b.c".to_string(),
            password: "pw".to_string(),
        };
        assert_eq!(nameless.validate(), Err(AuthError::MissingName));
    }
}
