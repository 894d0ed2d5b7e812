//! Sign-up, sign-in, and session commands.
//!
//! Only the session file is touched locally; signing in talks to the auth
//! service and saves the returned tokens for later commands.

use chrono::Utc;
use clap::{Args, Subcommand};

use recipebook_core::{AuthProvider, Session};

use super::prompt;
use crate::app::AuthContext;
use crate::config::Config;
use crate::session;

const MIN_PASSWORD_LEN: usize = 6;

/// Authentication commands
#[derive(Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Subcommand)]
enum AuthSubcommand {
    /// Create an account and sign in
    Signup {
        /// Email address (prompted for if omitted)
        #[arg(long, short)]
        email: Option<String>,
    },
    /// Sign in with email and password
    Signin {
        /// Email address (prompted for if omitted)
        #[arg(long, short)]
        email: Option<String>,
    },
    /// Sign out and forget the saved session
    Logout,
    /// Show who is signed in
    Status,
}

impl AuthCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            AuthSubcommand::Signup { email } => {
                config.require_api_key()?;
                let (email, password) = read_credentials(email.as_deref())?;
                validate_password(&password)?;

                let context = AuthContext::open(config)?;
                let user = context.auth().sign_up(&email, &password).await?;
                context.persist_session()?;
                println!("Created account for {}", user.email.unwrap_or(email));
                Ok(())
            }
            AuthSubcommand::Signin { email } => {
                config.require_api_key()?;
                let (email, password) = read_credentials(email.as_deref())?;

                let context = AuthContext::open(config)?;
                let user = context.auth().sign_in(&email, &password).await?;
                context.persist_session()?;
                println!("Signed in as {}", user.email.unwrap_or(email));
                Ok(())
            }
            AuthSubcommand::Logout => {
                let path = &config.session_path.value;
                // An unreadable session cannot be signed out of; just drop it.
                if session::load(path).is_err() {
                    session::delete(path)?;
                    println!("Signed out.");
                    return Ok(());
                }

                let context = AuthContext::open(config)?;
                if context.auth().active_user().is_none() {
                    println!("Already signed out.");
                    return Ok(());
                }
                context.auth().sign_out();
                context.persist_session()?;
                println!("Signed out.");
                Ok(())
            }
            AuthSubcommand::Status => {
                let context = AuthContext::open(config)?;
                match context.auth().session() {
                    Some(session) => println!("{}", describe_session(&session)),
                    None => println!("Not signed in. Run 'recipebook auth signin' to sign in."),
                }
                Ok(())
            }
        }
    }
}

fn read_credentials(email: Option<&str>) -> Result<(String, String), String> {
    let email = match email {
        Some(email) => email.trim().to_string(),
        None => prompt("Email: ").map_err(|e| e.to_string())?,
    };
    validate_email(&email)?;

    let password = rpassword::prompt_password("Password: ").map_err(|e| e.to_string())?;
    Ok((email, require_password(password)?))
}

fn require_password(password: String) -> Result<String, String> {
    if password.is_empty() {
        return Err("Password cannot be empty".to_string());
    }
    Ok(password)
}

fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if !email.contains('@') {
        return Err(format!("Invalid email '{}'", email));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    Ok(())
}

fn describe_session(session: &Session) -> String {
    let who = match &session.email {
        Some(email) => format!("{} ({})", email, session.uid),
        None => session.uid.clone(),
    };
    if session.expires_at > Utc::now() {
        format!(
            "Signed in as {}\nToken valid until {}",
            who,
            session.expires_at.format("%Y-%m-%d %H:%M UTC")
        )
    } else {
        format!(
            "Signed in as {}\nToken expired; it will be refreshed on the next sync",
            who
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("cook@example.com").is_ok());
        assert_eq!(validate_email(""), Err("Email cannot be empty".to_string()));
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert_eq!(
            validate_password("12345"),
            Err("Password must be at least 6 characters".to_string())
        );
    }

    #[test]
    fn test_require_password() {
        assert_eq!(require_password(" pass word ".to_string()), Ok(" pass word ".to_string()));
        assert_eq!(
            require_password(String::new()),
            Err("Password cannot be empty".to_string())
        );
    }

    #[test]
    fn test_describe_session() {
        let mut session = Session {
            uid: "user-1".to_string(),
            email: Some("cook@example.com".to_string()),
            id_token: "id".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        };
        let text = describe_session(&session);
        assert!(text.starts_with("Signed in as cook@example.com (user-1)"));
        assert!(text.contains("Token valid until"));

        session.expires_at = Utc::now() - Duration::hours(1);
        assert!(describe_session(&session).contains("Token expired"));
    }
}
